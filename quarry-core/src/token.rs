//! The token stream consumed by the compiler

use crate::variable::Variable;

/// A single unit of compiler input: a literal SQL fragment or a parameter
/// placeholder that is resolved to a positional marker during compilation
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Literal(String),
    Param(Variable),
}

impl Token {
    /// Create a literal token
    pub fn literal(text: impl Into<String>) -> Self {
        Token::Literal(text.into())
    }

    /// Get the literal text, if this is a literal token
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Token::Literal(text) => Some(text),
            Token::Param(_) => None,
        }
    }
}

impl From<&str> for Token {
    fn from(text: &str) -> Self {
        Token::Literal(text.to_string())
    }
}

impl From<String> for Token {
    fn from(text: String) -> Self {
        Token::Literal(text)
    }
}

impl From<Variable> for Token {
    fn from(var: Variable) -> Self {
        Token::Param(var)
    }
}

/// Anything that can be linearized into a token stream.
///
/// Expressions and statement builders implement this; the compiler only ever
/// sees the flattened tokens.
pub trait Block {
    fn flatten(&self) -> Vec<Token>;
}

impl Block for [Token] {
    fn flatten(&self) -> Vec<Token> {
        self.to_vec()
    }
}

impl Block for Vec<Token> {
    fn flatten(&self) -> Vec<Token> {
        self.clone()
    }
}
