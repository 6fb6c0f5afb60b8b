//! Combinators over lists of values

use crate::expr::{Expr, Expression};
use crate::operator::Operator;
use crate::{Error, Result};

/// Fold values left to right with `op`: `((a op b) op c) ...`.
///
/// A single value is returned unchanged.
///
/// # Examples
/// ```
/// use quarry_core::{group, Block, Column, ExprExt, Operator, compile};
///
/// let a = Column::new("a").unwrap().equals(1);
/// let b = Column::new("b").unwrap().equals(2);
/// let c = Column::new("c").unwrap().equals(3);
/// let expr = group(vec![a, b, c], Operator::Or).unwrap();
/// assert_eq!(
///     compile(&expr.flatten()).text,
///     "((\"a\" = $1) OR (\"b\" = $2)) OR (\"c\" = $3)"
/// );
/// ```
pub fn group<I, E>(values: I, op: Operator) -> Result<Expr>
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    let mut values = values.into_iter().map(Into::into);
    let first = values.next().ok_or(Error::EmptyGroup)?;
    Ok(values.fold(first, |acc, next| {
        Expr::Expression(Expression::new(acc, op, next))
    }))
}

/// AND all values together
pub fn all<I, E>(values: I) -> Result<Expr>
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    group(values, Operator::And)
}

/// OR all values together
pub fn any<I, E>(values: I) -> Result<Expr>
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    group(values, Operator::Or)
}
