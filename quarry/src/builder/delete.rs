//! DELETE statement builder module

use quarry_core::{Block, Error, Operator, Result, Table, Token};

use super::common::{record_error, IntoCondition, IntoTable, QueryBuilder, WhereClause};

/// DELETE builder in initial state (before where_() is called).
/// Cannot be compiled.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteBuilderInitial {
    table: Result<Table>,
}

/// DELETE builder in complete state (after where_() is called)
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteBuilderComplete {
    table: Result<Table>,
    where_clause: WhereClause,
    error: Option<Error>,
}

impl DeleteBuilderInitial {
    /// Create a new DELETE builder in initial state
    pub fn new<T: IntoTable>(table: T) -> Self {
        Self {
            table: table.into_table(),
        }
    }

    /// Add a WHERE condition - transitions to DeleteBuilderComplete
    /// This is required before the query can be compiled
    pub fn where_<C>(self, condition: C) -> DeleteBuilderComplete
    where
        C: IntoCondition,
    {
        DeleteBuilderComplete {
            table: self.table,
            where_clause: WhereClause::default(),
            error: None,
        }
        .where_(condition)
    }
}

impl DeleteBuilderComplete {
    /// Add a WHERE condition
    pub fn where_<C>(self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.push_condition(Operator::And, condition)
    }

    /// Add an AND WHERE condition (same as where_)
    pub fn and_where<C>(self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.where_(condition)
    }

    /// Add an OR WHERE condition
    pub fn or_where<C>(self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.push_condition(Operator::Or, condition)
    }

    fn push_condition<C>(mut self, op: Operator, condition: C) -> Self
    where
        C: IntoCondition,
    {
        match condition.into_condition() {
            Ok(expr) => self.where_clause.push(op, expr),
            Err(err) => record_error(&mut self.error, Err(err)),
        }
        self
    }
}

fn delete_tokens(table: &Result<Table>) -> Vec<Token> {
    let mut tokens = vec![Token::from("DELETE FROM")];
    if let Ok(table) = table {
        tokens.push(table.to_string().into());
    }
    tokens
}

impl Block for DeleteBuilderInitial {
    fn flatten(&self) -> Vec<Token> {
        delete_tokens(&self.table)
    }
}

impl Block for DeleteBuilderComplete {
    fn flatten(&self) -> Vec<Token> {
        let mut tokens = delete_tokens(&self.table);
        self.where_clause.flatten_into(&mut tokens);
        tokens
    }
}

impl QueryBuilder for DeleteBuilderInitial {
    fn validate(&self) -> Result<()> {
        Err(Error::invalid_query(
            "DELETE requires WHERE condition for safety",
        ))
    }
}

impl QueryBuilder for DeleteBuilderComplete {
    fn validate(&self) -> Result<()> {
        self.table.as_ref().map_err(Clone::clone)?;
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delete;
    use quarry_core::{op, Value, ValueType};

    #[test]
    fn test_delete_builder() {
        let query = delete("users").where_(("age", op::LT, 18));
        let sql = query.to_sql().unwrap();
        assert_eq!(sql, "DELETE FROM \"users\" WHERE \"age\" < $1");
    }

    #[test]
    fn test_delete_multiple_conditions() {
        let query = delete("users")
            .where_(("age", op::LT, 18))
            .or_where(("status", "inactive"));
        let sql = query.to_sql().unwrap();
        assert_eq!(
            sql,
            "DELETE FROM \"users\" WHERE (\"age\" < $1) OR (\"status\" = $2)"
        );
    }

    #[test]
    fn test_delete_is_callable() {
        let query = delete("users").where_(("id", ValueType::I64)).to_query().unwrap();
        let bound = query.call_positional([7i64]).unwrap();
        assert_eq!(bound.args, vec![Value::I64(7)]);
        assert!(query.call_positional(Vec::<Value>::new()).is_err());
    }

    #[test]
    fn test_delete_without_where_fails() {
        let query = delete("users");
        let result = query.to_sql();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("DELETE requires WHERE condition for safety"));
    }
}
