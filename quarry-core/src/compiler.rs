//! Compile token streams into parameterized queries

use serde::{Deserialize, Serialize};

use crate::binder::Binder;
use crate::params::{Diagnostic, ParameterEntry, ParameterTable};
use crate::token::{Block, Token};
use crate::{Error, Result};

/// How positional parameters are written into the query text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    /// `$1, $2, ...` (PostgreSQL)
    #[default]
    Dollar,
    /// `?1, ?2, ...` (SQLite)
    Numbered,
}

impl PlaceholderStyle {
    fn write(&self, out: &mut String, index: usize) {
        let prefix = match self {
            PlaceholderStyle::Dollar => '$',
            PlaceholderStyle::Numbered => '?',
        };
        out.push(prefix);
        out.push_str(&index.to_string());
    }
}

/// Compiler settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    pub placeholder: PlaceholderStyle,
}

/// The result of compiling a token stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledQuery {
    /// Final query text with positional placeholders
    pub text: String,
    /// Parameters in positional order
    pub parameters: Vec<ParameterEntry>,
    /// Non-fatal findings such as conflicting parameter definitions
    pub diagnostics: Vec<Diagnostic>,
}

impl CompiledQuery {
    /// Fail on the first conflicting parameter definition
    pub fn ensure_consistent(&self) -> Result<()> {
        match self.diagnostics.first() {
            Some(Diagnostic::ConflictingParameterDefinition { name, .. }) => {
                Err(Error::ConflictingParameterDefinition { name: name.clone() })
            }
            None => Ok(()),
        }
    }

    /// Wrap into a callable binder
    pub fn into_binder(self) -> Binder {
        Binder::new(self)
    }
}

/// Compile tokens with `$n` placeholders
///
/// # Examples
/// ```
/// use quarry_core::{compile, Token, Variable};
///
/// let id = Variable::new("id").unwrap();
/// let tokens = vec![
///     Token::from("("),
///     Token::from("\"id\""),
///     Token::from("="),
///     Token::from(id),
///     Token::from(")"),
/// ];
/// let query = compile(&tokens);
/// assert_eq!(query.text, "(\"id\" = $1)");
/// assert_eq!(query.parameters.len(), 1);
/// ```
pub fn compile(tokens: &[Token]) -> CompiledQuery {
    compile_with(tokens, &CompileOptions::default())
}

/// Compile tokens with explicit options
pub fn compile_with(tokens: &[Token], options: &CompileOptions) -> CompiledQuery {
    let mut table = ParameterTable::new();
    let mut parts: Vec<String> = Vec::with_capacity(tokens.len());

    for token in tokens {
        match token {
            Token::Literal(text) => parts.push(text.clone()),
            Token::Param(var) => {
                let index = table.register(var);
                let mut marker = String::new();
                options.placeholder.write(&mut marker, index);
                parts.push(marker);
            }
        }
    }

    let text = join_parts(&parts);
    let (parameters, diagnostics) = table.into_parts();
    tracing::debug!(
        sql = %text,
        parameters = parameters.len(),
        diagnostics = diagnostics.len(),
        "compiled query"
    );

    CompiledQuery {
        text,
        parameters,
        diagnostics,
    }
}

/// Flatten a block and compile it into a binder
pub fn mkquery(block: &(impl Block + ?Sized)) -> Binder {
    compile(&block.flatten()).into_binder()
}

/// Join fragments with single spaces, except: no space before `,` or `)`
/// and none after `(`.
fn join_parts(parts: &[String]) -> String {
    let mut query = String::new();
    for part in parts {
        if part == ")" || part == "," {
            let trimmed = query.trim_end().len();
            query.truncate(trimmed);
        }
        query.push_str(part);
        if part != "(" {
            query.push(' ');
        }
    }
    let trimmed = query.trim_end().len();
    query.truncate(trimmed);
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{Column, ExprExt};
    use crate::value::{Value, ValueType};
    use crate::variable::Variable;

    fn literals(parts: &[&str]) -> Vec<Token> {
        parts.iter().map(|p| Token::from(*p)).collect()
    }

    #[test]
    fn test_plain_string() {
        let query = compile(&literals(&["string"]));
        assert_eq!(query.text, "string");
        assert!(query.parameters.is_empty());
    }

    #[test]
    fn test_comma_spacing() {
        assert_eq!(compile(&literals(&["one", ",", "two"])).text, "one, two");
    }

    #[test]
    fn test_bracket_spacing() {
        let query = compile(&literals(&["(", "one", "=", "two", ")"]));
        assert_eq!(query.text, "(one = two)");
    }

    #[test]
    fn test_nested_brackets() {
        let query = compile(&literals(&["(", "(", "a", ")", ",", "b", ")"]));
        assert_eq!(query.text, "((a), b)");
    }

    #[test]
    fn test_empty_stream() {
        let query = compile(&[]);
        assert_eq!(query.text, "");
        assert!(query.parameters.is_empty());
    }

    #[test]
    fn test_repeated_variable_reuses_index() {
        let var = Variable::new("name").unwrap();
        let query = compile(&[Token::from(var.clone()), Token::from(var)]);
        assert_eq!(query.text, "$1 $1");
        assert_eq!(query.parameters.len(), 1);
    }

    #[test]
    fn test_same_variable_in_where_clause() {
        let v = Variable::new("id").unwrap();
        let tokens = vec![
            Token::from(v.clone()),
            Token::from("="),
            Token::from("x"),
            Token::from("OR"),
            Token::from(v),
            Token::from("="),
            Token::from("y"),
        ];
        let query = compile(&tokens);
        assert_eq!(query.text, "$1 = x OR $1 = y");
        assert_eq!(query.text.matches("$1").count(), 2);
        assert_eq!(query.parameters.len(), 1);
        assert!(query.diagnostics.is_empty());
    }

    #[test]
    fn test_positions_follow_first_occurrence() {
        let a = Variable::new("a").unwrap();
        let b = Variable::new("b").unwrap();
        let tokens = vec![
            Token::from(b.clone()),
            Token::from(","),
            Token::from(a),
            Token::from(","),
            Token::from(b),
        ];
        let query = compile(&tokens);
        assert_eq!(query.text, "$1, $2, $1");
        let names: Vec<_> = query.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn test_conflicting_definitions_are_diagnosed() {
        let first = Variable::with_default("n", 1).unwrap();
        let second = Variable::with_default("n", "other").unwrap();
        let query = compile(&[Token::from(first), Token::from(second)]);

        assert_eq!(query.text, "$1 $1");
        assert_eq!(query.parameters.len(), 1);
        assert_eq!(query.parameters[0].default, Some(Value::I32(1)));
        assert_eq!(query.diagnostics.len(), 1);
        assert_eq!(
            query.ensure_consistent(),
            Err(Error::ConflictingParameterDefinition {
                name: "n".to_string()
            })
        );
    }

    #[test]
    fn test_normalized_entries() {
        let tokens = vec![
            Token::from(Variable::new("name").unwrap()),
            Token::from(Variable::with_default("parent", ()).unwrap()),
            Token::from(Variable::with_default("id", ValueType::I64).unwrap()),
            Token::from(Variable::with_default("page", 1).unwrap()),
        ];
        let query = compile(&tokens);
        let entries: Vec<_> = query
            .parameters
            .iter()
            .map(|p| (p.type_hint, p.default.clone()))
            .collect();
        assert_eq!(
            entries,
            vec![
                (None, None),
                (None, Some(Value::Null)),
                (Some(ValueType::I64), None),
                (Some(ValueType::I32), Some(Value::I32(1))),
            ]
        );
    }

    #[test]
    fn test_compile_is_idempotent() {
        let expr = Column::new("age")
            .unwrap()
            .greater_than(18)
            .plus(Column::new("name").unwrap().equals("x"));
        let tokens = expr.flatten();
        let first = compile(&tokens);
        let second = compile(&tokens);
        assert_eq!(first.text, second.text);
        assert_eq!(first, second);
    }

    #[test]
    fn test_numbered_placeholders() {
        let v = Variable::new("id").unwrap();
        let options = CompileOptions {
            placeholder: PlaceholderStyle::Numbered,
        };
        let query = compile_with(&[Token::from("id ="), Token::from(v)], &options);
        assert_eq!(query.text, "id = ?1");
    }

    #[test]
    fn test_multi_digit_placeholders() {
        let tokens: Vec<Token> = (1..=12)
            .map(|i| Token::from(Variable::new(&format!("p{i}")).unwrap()))
            .collect();
        assert!(compile(&tokens).text.ends_with("$10 $11 $12"));
        let options = CompileOptions {
            placeholder: PlaceholderStyle::Numbered,
        };
        assert!(compile_with(&tokens, &options).text.starts_with("?1 ?2"));
    }

    #[test]
    fn test_options_from_json() {
        let options: CompileOptions =
            serde_json::from_str(r#"{"placeholder": "numbered"}"#).unwrap();
        assert_eq!(options.placeholder, PlaceholderStyle::Numbered);
        let options: CompileOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, CompileOptions::default());
    }

    #[test]
    fn test_compiled_query_serializes() {
        let query = compile(&[Token::from(Variable::with_default("id", 7i64).unwrap())]);
        let json = serde_json::to_string(&query).unwrap();
        let decoded: CompiledQuery = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, query);
    }
}
