use quarry::{delete, from, insert, op, update, Args, QueryBuilder};
use quarry::{col, Column, ExprExt, FunctionCall, SortDirection, Value, ValueType, Variable};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Quarry - Basic Usage Examples ===\n");

    // SELECT with tuple conditions; plain data becomes a defaulted parameter
    let select_query = from("users")
        .select(("id", "name", "email"))
        .where_(("age", op::GT, 18))
        .where_(("status", ValueType::String))
        .and_where(("city", "LIKE", "%York%"))
        .order_by("name", SortDirection::Asc)
        .limit(10)
        .offset(5)
        .to_query()?;

    println!("1. Basic SELECT:");
    println!("   SQL: {}", select_query.sql());
    println!("   Signature: {}", select_query.signature());
    let bound = select_query.call(Args::new().named("status", "active"))?;
    println!("   Arguments: {:?}\n", bound.args);

    // Expressions built from columns
    let age = Column::new("age")?;
    let range_query = from("users")
        .select("*")
        .where_(age.between(18, ValueType::I32))
        .or_where(col("users.role")?.equals("admin"))
        .to_query()?;

    println!("2. Expressions:");
    println!("   SQL: {}", range_query.sql());
    println!("   Signature: {}", range_query.signature());
    let bound = range_query.call_positional([21, 65])?;
    println!("   Arguments: {:?}\n", bound.args);

    // Aggregation
    let count_query = from("orders")
        .select(("user_id", FunctionCall::count_all()))
        .group_by("user_id")
        .order_by("user_id", SortDirection::Desc);

    println!("3. Aggregation:");
    println!("   SQL: {}\n", count_query.to_sql()?);

    // INSERT with one required parameter per column
    let insert_query = insert("users").columns(["name", "email"]).to_query()?;
    println!("4. INSERT:");
    println!("   SQL: {}", insert_query.sql());
    let bound = insert_query.call(
        Args::new()
            .named("email", "john@example.com")
            .named("name", "John Doe"),
    )?;
    println!("   Arguments: {:?}\n", bound.args);

    // UPDATE with a shared variable
    let user_id = Variable::with_default("user_id", ValueType::I64)?;
    let update_query = update("users")
        .set("email")
        .set_value("active", true)
        .where_(col("id")?.equals(user_id))
        .to_query()?;

    println!("5. UPDATE:");
    println!("   SQL: {}", update_query.sql());
    println!("   Signature: {}", update_query.signature());
    let bound = update_query.call_positional([Value::from("new@example.com"), Value::Bool(false), Value::I64(123)])?;
    println!("   Arguments: {:?}\n", bound.args);

    // DELETE
    let delete_query = delete("users")
        .where_(("age", op::LT, 13))
        .or_where(("last_login", op::LT, "2020-01-01"))
        .to_query()?;

    println!("6. DELETE:");
    println!("   SQL: {}", delete_query.sql());
    println!("   Arguments: {:?}\n", delete_query.call(Args::new())?.args);

    // Deferred validation
    println!("7. Deferred Validation:");
    let invalid_query = from("users")
        .where_(("age", "INVALID_OPERATOR", 18))
        .select(("id", "name"));

    match invalid_query.to_sql() {
        Ok(sql) => println!("   Unexpected success: {}", sql),
        Err(e) => println!("   Caught invalid operator: {}", e),
    }

    // Binder errors name the offending argument
    match insert_query.call(Args::new().arg("only a name")) {
        Ok(bound) => println!("   Unexpected success: {:?}", bound),
        Err(e) => println!("   Caught missing argument: {}", e),
    }

    println!("\n=== All examples completed successfully! ===");
    Ok(())
}
