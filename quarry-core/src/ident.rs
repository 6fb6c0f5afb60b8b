//! Identifier validation, cleaning and quoting

/// Keywords that cannot be used as argument names in a binder call
const RESERVED: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final",
    "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Whether `name` is a reserved keyword
pub fn is_keyword(name: &str) -> bool {
    RESERVED.contains(&name)
}

/// Whether `name` is a syntactically valid identifier
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|ch| ch.is_alphanumeric() || ch == '_')
        }
        _ => false,
    }
}

/// Whether `name` can be used as a parameter name
pub fn is_valid_name(name: &str) -> bool {
    is_identifier(name) && !is_keyword(name)
}

/// Escape and double-quote an identifier.
///
/// Doubles `"`, escapes `\` and NUL.
///
/// # Examples
/// ```
/// use quarry_core::ident::quote_ident;
///
/// assert_eq!(quote_ident("user"), "\"user\"");
/// assert_eq!(quote_ident("name\""), "\"name\"\"\"");
/// ```
pub fn quote_ident(ident: &str) -> String {
    let mut quoted = String::with_capacity(ident.len() + 2);
    quoted.push('"');
    for ch in ident.chars() {
        match ch {
            '"' => quoted.push_str("\"\""),
            '\\' => quoted.push_str("\\\\"),
            '\0' => quoted.push_str("\\0"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}

/// Turn an arbitrary name into a usable parameter name.
///
/// Drops every character that is not alphanumeric or `_`, then prefixes `_`
/// when the result still isn't a valid name.
pub fn clean_ident(ident: &str) -> String {
    let clean: String = ident
        .chars()
        .filter(|ch| ch.is_alphanumeric() || *ch == '_')
        .collect();
    if is_valid_name(&clean) {
        clean
    } else {
        format!("_{clean}")
    }
}
