//! SELECT statement builder

use quarry_core::{any, Block, CommaSeparated, Error, Expr, Operator, Result, Table, Token};

use super::common::{
    record_error, IntoColumns, IntoCondition, IntoTable, QueryBuilder, SortDirection, WhereClause,
};

/// SELECT statement builder.
///
/// # Examples
/// ```
/// use quarry::{select, QueryBuilder};
///
/// let query = select(("id", "name", "pwhash")).from("user").to_query().unwrap();
/// assert_eq!(query.sql(), "SELECT \"id\", \"name\", \"pwhash\" FROM \"user\"");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectBuilder {
    columns: Vec<Expr>,
    distinct: bool,
    table: Option<Table>,
    where_clause: WhereClause,
    group_by: Vec<Expr>,
    order_by: Vec<(Expr, SortDirection)>,
    limit_value: Option<u64>,
    offset_value: Option<u64>,
    error: Option<Error>,
}

impl SelectBuilder {
    /// Create an empty SELECT builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add values to select; plain strings become columns
    pub fn select<C>(mut self, columns: C) -> Self
    where
        C: IntoColumns,
    {
        match columns.into_columns() {
            Ok(columns) => self.columns.extend(columns),
            Err(err) => record_error(&mut self.error, Err(err)),
        }
        self
    }

    /// Choose the table to query from
    pub fn from<T>(mut self, table: T) -> Self
    where
        T: IntoTable,
    {
        match table.into_table() {
            Ok(table) => self.table = Some(table),
            Err(err) => record_error(&mut self.error, Err(err)),
        }
        self
    }

    /// Add SELECT DISTINCT
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Add a WHERE condition, joined to earlier ones with AND
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

    /// Add a group of conditions joined with OR, itself joined with AND
    pub fn where_any<I, C>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: IntoCondition,
    {
        let group = conditions
            .into_iter()
            .map(IntoCondition::into_condition)
            .collect::<Result<Vec<_>>>()
            .and_then(any);
        match group {
            Ok(expr) => self.where_clause.push(Operator::And, expr),
            Err(err) => record_error(&mut self.error, Err(err)),
        }
        self
    }

    /// Add GROUP BY columns
    pub fn group_by<C>(mut self, columns: C) -> Self
    where
        C: IntoColumns,
    {
        match columns.into_columns() {
            Ok(columns) => self.group_by.extend(columns),
            Err(err) => record_error(&mut self.error, Err(err)),
        }
        self
    }

    /// Add an ORDER BY column with direction
    pub fn order_by<C>(mut self, column: C, direction: SortDirection) -> Self
    where
        C: IntoColumns,
    {
        match column.into_columns() {
            Ok(columns) => self
                .order_by
                .extend(columns.into_iter().map(|column| (column, direction))),
            Err(err) => record_error(&mut self.error, Err(err)),
        }
        self
    }

    /// Add a LIMIT clause
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit_value = Some(limit);
        self
    }

    /// Add an OFFSET clause
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset_value = Some(offset);
        self
    }

    /// Selected values
    pub fn columns(&self) -> &[Expr] {
        &self.columns
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

impl Block for SelectBuilder {
    fn flatten(&self) -> Vec<Token> {
        let mut tokens = vec![Token::from("SELECT")];
        if self.distinct {
            tokens.push("DISTINCT".into());
        }
        tokens.extend(CommaSeparated::new(self.columns.iter().cloned()).flatten());

        if let Some(table) = &self.table {
            tokens.push("FROM".into());
            tokens.push(table.to_string().into());
        }

        self.where_clause.flatten_into(&mut tokens);

        if !self.group_by.is_empty() {
            tokens.push("GROUP BY".into());
            tokens.extend(CommaSeparated::new(self.group_by.iter().cloned()).flatten());
        }

        for (i, (column, direction)) in self.order_by.iter().enumerate() {
            tokens.push(if i == 0 { "ORDER BY" } else { "," }.into());
            tokens.extend(column.flatten());
            tokens.push(direction.to_string().into());
        }

        if let Some(limit) = self.limit_value {
            tokens.push("LIMIT".into());
            tokens.push(limit.to_string().into());
        }
        if let Some(offset) = self.offset_value {
            tokens.push("OFFSET".into());
            tokens.push(offset.to_string().into());
        }

        tokens
    }
}

impl QueryBuilder for SelectBuilder {
    fn validate(&self) -> Result<()> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        if self.columns.is_empty() {
            return Err(Error::invalid_query("SELECT requires at least one column"));
        }
        Ok(())
    }
}
