//! Common types and traits shared across all statement builders

use std::fmt;

use quarry_core::{
    compile, Binder, Block, Column, CompiledQuery, Expr, ExprExt, FunctionCall, IntoOperand,
    IntoOperator, Operator, Result, Table,
};

/// Core trait for all statement builders.
///
/// A builder is a [`Block`]: it only produces tokens. Compilation and
/// argument binding are shared.
pub trait QueryBuilder: Block {
    /// Check the builder for misuse recorded while it was assembled
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Compile into query text plus parameter table
    fn compile(&self) -> Result<CompiledQuery> {
        self.validate()?;
        Ok(compile(&self.flatten()))
    }

    /// Compile into a callable binder
    fn to_query(&self) -> Result<Binder> {
        Ok(self.compile()?.into_binder())
    }

    /// Generate the SQL query string
    fn to_sql(&self) -> Result<String> {
        Ok(self.compile()?.text)
    }
}

/// Trait for conditions that can be used in WHERE clauses
pub trait IntoCondition {
    fn into_condition(self) -> Result<Expr>;
}

impl IntoCondition for Expr {
    fn into_condition(self) -> Result<Expr> {
        Ok(self)
    }
}

// Shorthand equality: where_(("age", 18))
impl<T> IntoCondition for (&str, T)
where
    T: IntoOperand,
{
    fn into_condition(self) -> Result<Expr> {
        Ok(Column::parse(self.0)?.equals(self.1))
    }
}

// Explicit operators: where_(("age", op::GT, 18)) or where_(("age", ">", 18))
impl<O, T> IntoCondition for (&str, O, T)
where
    O: IntoOperator,
    T: IntoOperand,
{
    fn into_condition(self) -> Result<Expr> {
        let op = self.1.into_operator()?;
        Ok(Expr::from(Column::parse(self.0)?).compare(op, self.2))
    }
}

/// Trait to convert various types into a list of selected values
pub trait IntoColumns {
    fn into_columns(self) -> Result<Vec<Expr>>;
}

/// `*` selects everything; any other name is a (possibly dotted) column
fn column_expr(name: &str) -> Result<Expr> {
    if name == "*" {
        return Ok(Expr::literal("*"));
    }
    Ok(Column::parse(name)?.into())
}

impl IntoColumns for &str {
    fn into_columns(self) -> Result<Vec<Expr>> {
        Ok(vec![column_expr(self)?])
    }
}

impl IntoColumns for String {
    fn into_columns(self) -> Result<Vec<Expr>> {
        self.as_str().into_columns()
    }
}

impl IntoColumns for Vec<&str> {
    fn into_columns(self) -> Result<Vec<Expr>> {
        self.into_iter().map(column_expr).collect()
    }
}

impl<const N: usize> IntoColumns for [&str; N] {
    fn into_columns(self) -> Result<Vec<Expr>> {
        self.into_iter().map(column_expr).collect()
    }
}

impl IntoColumns for Expr {
    fn into_columns(self) -> Result<Vec<Expr>> {
        Ok(vec![self])
    }
}

impl IntoColumns for Vec<Expr> {
    fn into_columns(self) -> Result<Vec<Expr>> {
        Ok(self)
    }
}

impl IntoColumns for Column {
    fn into_columns(self) -> Result<Vec<Expr>> {
        Ok(vec![self.into()])
    }
}

impl IntoColumns for Vec<Column> {
    fn into_columns(self) -> Result<Vec<Expr>> {
        Ok(self.into_iter().map(Expr::from).collect())
    }
}

impl IntoColumns for FunctionCall {
    fn into_columns(self) -> Result<Vec<Expr>> {
        Ok(vec![self.into()])
    }
}

impl IntoColumns for (&str, &str) {
    fn into_columns(self) -> Result<Vec<Expr>> {
        [self.0, self.1].into_columns()
    }
}

impl IntoColumns for (&str, &str, &str) {
    fn into_columns(self) -> Result<Vec<Expr>> {
        [self.0, self.1, self.2].into_columns()
    }
}

impl IntoColumns for (&str, &str, &str, &str) {
    fn into_columns(self) -> Result<Vec<Expr>> {
        [self.0, self.1, self.2, self.3].into_columns()
    }
}

// Mixed selections: select(("name", FunctionCall::count_all()))
impl IntoColumns for (&str, FunctionCall) {
    fn into_columns(self) -> Result<Vec<Expr>> {
        Ok(vec![column_expr(self.0)?, self.1.into()])
    }
}

/// Trait for names that identify a table
pub trait IntoTable {
    fn into_table(self) -> Result<Table>;
}

impl IntoTable for &str {
    fn into_table(self) -> Result<Table> {
        Table::new(self)
    }
}

impl IntoTable for String {
    fn into_table(self) -> Result<Table> {
        Table::new(&self)
    }
}

impl IntoTable for Table {
    fn into_table(self) -> Result<Table> {
        Ok(self)
    }
}

/// Sort direction for ORDER BY clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// A WHERE clause built up one condition at a time.
///
/// Conditions are folded left to right, so `a AND b OR c` reads
/// `(a AND b) OR c`. The first error seen while converting a condition is
/// kept and reported when the statement is compiled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereClause {
    constraint: Option<Expr>,
}

impl WhereClause {
    pub fn push(&mut self, op: Operator, condition: Expr) {
        self.constraint = Some(match self.constraint.take() {
            None => condition,
            Some(prev) => match op {
                Operator::Or => prev.or_else(condition),
                _ => prev.and_also(condition),
            },
        });
    }

    pub fn is_empty(&self) -> bool {
        self.constraint.is_none()
    }

    pub fn constraint(&self) -> Option<&Expr> {
        self.constraint.as_ref()
    }

    /// `WHERE <constraint>` tokens, or nothing
    pub fn flatten_into(&self, tokens: &mut Vec<quarry_core::Token>) {
        if let Some(constraint) = &self.constraint {
            tokens.push("WHERE".into());
            tokens.extend(constraint.flatten());
        }
    }
}

/// Keep the first error reported while a builder is assembled
pub(crate) fn record_error(slot: &mut Option<quarry_core::Error>, result: Result<()>) {
    if let Err(err) = result {
        if slot.is_none() {
            tracing::debug!(error = %err, "statement builder recorded an error");
            *slot = Some(err);
        }
    }
}
