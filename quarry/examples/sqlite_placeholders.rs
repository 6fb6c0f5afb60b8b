use quarry::{compile_with, from, insert, Args, Block, CompileOptions, PlaceholderStyle, QueryBuilder};

// SQLite accepts `?NNN` placeholders; everything else about the binder stays the same.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Quarry - SQLite Placeholders ===\n");

    let options = CompileOptions {
        placeholder: PlaceholderStyle::Numbered,
    };

    let select_query = from("users")
        .select(("id", "name"))
        .where_(("status", "active"))
        .or_where(("status", "pending"));
    select_query.validate()?;

    let compiled = compile_with(&select_query.flatten(), &options);
    println!("1. SELECT:");
    println!("   SQL: {}", compiled.text);
    for diagnostic in &compiled.diagnostics {
        println!("   Warning: {}", diagnostic);
    }

    let insert_query = insert("users").columns(["name", "email"]);
    insert_query.validate()?;
    let binder = compile_with(&insert_query.flatten(), &options).into_binder();
    let bound = binder.call(Args::new().arg("Jane").named("email", "jane@example.com"))?;

    println!("\n2. INSERT:");
    println!("   SQL: {}", bound.sql);
    println!("   Arguments: {:?}", bound.args);

    Ok(())
}
