//! UPDATE statement builder module

use quarry_core::{
    Block, Column, CommaSeparated, Error, Expr, ExprExt, IntoOperand, Operator, Result, Table,
    Token, TypedDefault,
};

use super::common::{record_error, IntoCondition, IntoTable, QueryBuilder, WhereClause};

/// UPDATE builder in initial state (before set() is called).
/// Cannot be compiled.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateBuilderInitial {
    table: Result<Table>,
}

/// UPDATE builder with at least one assignment. Updates every row.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateBuilderWithSet {
    parts: UpdateParts,
}

/// UPDATE builder with assignments and a WHERE clause
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateBuilderComplete {
    parts: UpdateParts,
}

#[derive(Debug, Clone, PartialEq)]
struct UpdateParts {
    table: Result<Table>,
    assignments: Vec<Expr>,
    where_clause: WhereClause,
    error: Option<Error>,
}

impl UpdateParts {
    fn assign(&mut self, column: &str, value: impl IntoOperand) {
        match Column::parse(column) {
            Ok(column) => self.assignments.push(column.equals(value)),
            Err(err) => record_error(&mut self.error, Err(err)),
        }
    }

    fn push_condition(&mut self, op: Operator, condition: impl IntoCondition) {
        match condition.into_condition() {
            Ok(expr) => self.where_clause.push(op, expr),
            Err(err) => record_error(&mut self.error, Err(err)),
        }
    }

    fn flatten(&self) -> Vec<Token> {
        let mut tokens = vec![Token::from("UPDATE")];
        if let Ok(table) = &self.table {
            tokens.push(table.to_string().into());
        }
        tokens.push("SET".into());
        tokens.extend(CommaSeparated::new(self.assignments.iter().cloned()).flatten());
        self.where_clause.flatten_into(&mut tokens);
        tokens
    }

    fn validate(&self) -> Result<()> {
        self.table.as_ref().map_err(Clone::clone)?;
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl UpdateBuilderInitial {
    /// Create a new UPDATE builder in initial state
    pub fn new<T: IntoTable>(table: T) -> Self {
        Self {
            table: table.into_table(),
        }
    }

    fn into_parts(self) -> UpdateParts {
        UpdateParts {
            table: self.table,
            assignments: Vec::new(),
            where_clause: WhereClause::default(),
            error: None,
        }
    }

    /// Assign a column from a required parameter named after it
    ///
    /// # Examples
    /// ```
    /// use quarry::{update, QueryBuilder, Value, ValueType};
    ///
    /// let query = update("user")
    ///     .set("name")
    ///     .where_(("id", ValueType::I64))
    ///     .to_query()
    ///     .unwrap();
    /// assert_eq!(query.sql(), "UPDATE \"user\" SET \"name\" = $1 WHERE \"id\" = $2");
    ///
    /// let bound = query.call_positional([Value::from("oxy"), Value::I64(123)]).unwrap();
    /// assert_eq!(bound.args, vec![Value::from("oxy"), Value::I64(123)]);
    /// ```
    pub fn set(self, column: &str) -> UpdateBuilderWithSet {
        UpdateBuilderWithSet {
            parts: self.into_parts(),
        }
        .set(column)
    }

    /// Assign a column from a value or expression
    pub fn set_value<V: IntoOperand>(self, column: &str, value: V) -> UpdateBuilderWithSet {
        UpdateBuilderWithSet {
            parts: self.into_parts(),
        }
        .set_value(column, value)
    }
}

impl UpdateBuilderWithSet {
    /// Assign another column from a required parameter named after it
    pub fn set(mut self, column: &str) -> Self {
        self.parts.assign(column, TypedDefault::NoDefault);
        self
    }

    /// Assign another column from a value or expression
    pub fn set_value<V: IntoOperand>(mut self, column: &str, value: V) -> Self {
        self.parts.assign(column, value);
        self
    }

    /// Add a WHERE condition - transitions to UpdateBuilderComplete
    pub fn where_<C>(mut self, condition: C) -> UpdateBuilderComplete
    where
        C: IntoCondition,
    {
        self.parts.push_condition(Operator::And, condition);
        UpdateBuilderComplete { parts: self.parts }
    }
}

impl UpdateBuilderComplete {
    /// Add a WHERE condition
    pub fn where_<C>(mut self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.parts.push_condition(Operator::And, condition);
        self
    }

    /// Add an AND WHERE condition (same as where_)
    pub fn and_where<C>(self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.where_(condition)
    }

    /// Add an OR WHERE condition
    pub fn or_where<C>(mut self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.parts.push_condition(Operator::Or, condition);
        self
    }
}

impl Block for UpdateBuilderInitial {
    fn flatten(&self) -> Vec<Token> {
        let mut tokens = vec![Token::from("UPDATE")];
        if let Ok(table) = &self.table {
            tokens.push(table.to_string().into());
        }
        tokens
    }
}

impl Block for UpdateBuilderWithSet {
    fn flatten(&self) -> Vec<Token> {
        self.parts.flatten()
    }
}

impl Block for UpdateBuilderComplete {
    fn flatten(&self) -> Vec<Token> {
        self.parts.flatten()
    }
}

impl QueryBuilder for UpdateBuilderInitial {
    fn validate(&self) -> Result<()> {
        Err(Error::invalid_query("UPDATE requires SET clauses"))
    }
}

impl QueryBuilder for UpdateBuilderWithSet {
    fn validate(&self) -> Result<()> {
        self.parts.validate()
    }
}

impl QueryBuilder for UpdateBuilderComplete {
    fn validate(&self) -> Result<()> {
        self.parts.validate()
    }
}
