//! Quarry - parameterized SQL statements with callable argument binders
//!
//! Statements are assembled from typed values and compiled into SQL text
//! with positional placeholders. The compiled query is a binder: call it
//! with positional and/or named arguments to get the argument list to hand
//! to a driver.
//!
//! ```
//! use quarry::{from, op, Args, QueryBuilder, Value};
//!
//! let query = from("users")
//!     .select(("id", "name"))
//!     .where_(("age", op::GT, 18))
//!     .to_query()
//!     .unwrap();
//!
//! assert_eq!(query.sql(), "SELECT \"id\", \"name\" FROM \"users\" WHERE \"age\" > $1");
//! let bound = query.call(Args::new().named("age_gt", 21)).unwrap();
//! assert_eq!(bound.args, vec![Value::I32(21)]);
//! ```

pub mod builder;

// Re-export main types
pub use builder::common::{
    IntoColumns, IntoCondition, IntoTable, QueryBuilder, SortDirection, WhereClause,
};
pub use builder::{
    DeleteBuilderComplete, DeleteBuilderInitial, InsertBuilderComplete, InsertBuilderInitial,
    InsertSource, SelectBuilder, UpdateBuilderComplete, UpdateBuilderInitial,
    UpdateBuilderWithSet,
};
pub use quarry_core::{
    all, any, compile, compile_with, group, mkquery, op, Args, Between, Binder, Block, BoundQuery,
    Column, CommaSeparated, CompileOptions, CompiledQuery, Diagnostic, Error, Expr, ExprExt,
    Expression, Function, FunctionCall, IntoOperand, IntoOperator, Operand, Operator,
    ParameterEntry, PlaceholderStyle, Result, Signature, Table, Token, TypedDefault, Value,
    ValueType, Variable,
};

/// Create a new SELECT builder for the given values
pub fn select<C: IntoColumns>(columns: C) -> SelectBuilder {
    SelectBuilder::new().select(columns)
}

/// Create a new SELECT builder for the given table
pub fn from<T: IntoTable>(table: T) -> SelectBuilder {
    SelectBuilder::new().from(table)
}

/// Create a new INSERT builder for the given table
pub fn insert<T: IntoTable>(table: T) -> InsertBuilderInitial {
    InsertBuilderInitial::new(table)
}

/// Create a new UPDATE builder for the given table
pub fn update<T: IntoTable>(table: T) -> UpdateBuilderInitial {
    UpdateBuilderInitial::new(table)
}

/// Create a new DELETE builder for the given table
pub fn delete<T: IntoTable>(table: T) -> DeleteBuilderInitial {
    DeleteBuilderInitial::new(table)
}

/// Create a (possibly table-qualified) column
///
/// # Examples
///
/// ```
/// use quarry::{col, ExprExt, QueryBuilder};
///
/// let query = quarry::from("users")
///     .select("id")
///     .where_(col("users.age").unwrap().greater_equal(21))
///     .to_sql()
///     .unwrap();
/// assert_eq!(query, "SELECT \"id\" FROM \"users\" WHERE \"users\".\"age\" >= $1");
/// ```
pub fn col(name: &str) -> Result<Column> {
    Column::parse(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[test]
    fn test_entry_points() {
        assert_eq!(
            assert_ok!(select("id").from("user").to_sql()),
            "SELECT \"id\" FROM \"user\""
        );
        assert_eq!(from("user").select("id"), select("id").from("user"));
        assert!(insert("user").to_sql().is_err());
        assert!(update("user").to_sql().is_err());
        assert!(delete("user").to_sql().is_err());
    }

    #[test]
    fn test_numbered_placeholders_for_sqlite() {
        let query = from("users").select("*").where_(("id", ValueType::I64));
        let options: CompileOptions =
            serde_json::from_value(serde_json::json!({ "placeholder": "numbered" })).unwrap();
        let compiled = compile_with(&query.flatten(), &options);
        assert_eq!(compiled.text, "SELECT * FROM \"users\" WHERE \"id\" = ?1");
    }

    #[test]
    fn test_shared_parameters_across_clauses() {
        let name = Variable::new("name").unwrap();
        let query = from("users")
            .select("id")
            .where_(col("first").unwrap().equals(name.clone()))
            .or_where(col("last").unwrap().equals(name));
        let binder = assert_ok!(query.to_query());
        assert_eq!(
            binder.sql(),
            "SELECT \"id\" FROM \"users\" WHERE (\"first\" = $1) OR (\"last\" = $1)"
        );
        let bound = assert_ok!(binder.call_positional(["oxy"]));
        assert_eq!(bound.args, vec![Value::from("oxy")]);
    }
}
