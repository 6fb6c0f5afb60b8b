//! SQL operator types and conversions

use std::fmt::{self, Display};
use std::str::FromStr;

use crate::Error;

/// Binary SQL operator used in expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Le,
    Lt,
    Ge,
    Gt,
    And,
    Or,
    Like,
}

impl Operator {
    /// Get the SQL spelling of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Le => "<=",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Gt => ">",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Like => "LIKE",
        }
    }

    /// Short name used as suffix when a parameter name is synthesized
    /// from a comparison, e.g. `age_gt`
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Add => "add",
            Operator::Sub => "sub",
            Operator::Mul => "mul",
            Operator::Div => "truediv",
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Le => "le",
            Operator::Lt => "lt",
            Operator::Ge => "ge",
            Operator::Gt => "gt",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Like => "like",
        }
    }

    /// Whether an expression built with this operator yields a boolean
    pub fn is_boolean(&self) -> bool {
        matches!(
            self,
            Operator::And
                | Operator::Or
                | Operator::Le
                | Operator::Lt
                | Operator::Ge
                | Operator::Gt
                | Operator::Ne
                | Operator::Eq
        )
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse the SQL spelling of an operator
impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s {
            "+" => Operator::Add,
            "-" => Operator::Sub,
            "*" => Operator::Mul,
            "/" => Operator::Div,
            "=" => Operator::Eq,
            "<>" | "!=" => Operator::Ne,
            "<=" => Operator::Le,
            "<" => Operator::Lt,
            ">=" => Operator::Ge,
            ">" => Operator::Gt,
            "AND" | "and" => Operator::And,
            "OR" | "or" => Operator::Or,
            "LIKE" | "like" => Operator::Like,
            _ => return Err(Error::UnknownOperator { op: s.to_string() }),
        };
        Ok(op)
    }
}

/// Types that can name an operator: an [`Operator`] or its SQL spelling
pub trait IntoOperator {
    fn into_operator(self) -> Result<Operator, Error>;
}

impl IntoOperator for Operator {
    fn into_operator(self) -> Result<Operator, Error> {
        Ok(self)
    }
}

impl IntoOperator for &str {
    fn into_operator(self) -> Result<Operator, Error> {
        self.parse()
    }
}

/// Convenience module for operator constants
pub mod op {
    use super::Operator;

    pub const ADD: Operator = Operator::Add;
    pub const SUB: Operator = Operator::Sub;
    pub const MUL: Operator = Operator::Mul;
    pub const DIV: Operator = Operator::Div;
    pub const EQ: Operator = Operator::Eq;
    pub const NEQ: Operator = Operator::Ne;
    pub const LTE: Operator = Operator::Le;
    pub const LT: Operator = Operator::Lt;
    pub const GTE: Operator = Operator::Ge;
    pub const GT: Operator = Operator::Gt;
    pub const AND: Operator = Operator::And;
    pub const OR: Operator = Operator::Or;
    pub const LIKE: Operator = Operator::Like;
}
