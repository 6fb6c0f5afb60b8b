//! Error types for Quarry

use thiserror::Error;

/// The main error type for Quarry operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Name is not usable as a variable, column or table identifier
    #[error("Cannot use '{name}' as an identifier")]
    InvalidIdentifier { name: String },

    /// A grouping helper was given nothing to combine
    #[error("Cannot group an empty list of values")]
    EmptyGroup,

    /// A values list does not line up with its column list
    #[error("Expected {expected} values but {found} were given")]
    ArityMismatch { expected: usize, found: usize },

    /// Two variables share a name but declare different types or defaults
    #[error("Parameter '{name}' has conflicting definitions")]
    ConflictingParameterDefinition { name: String },

    /// More positional arguments than the query has parameters
    #[error("Query takes {expected} arguments but {given} were given")]
    TooManyArguments { expected: usize, given: usize },

    /// A parameter without default was neither passed positionally nor by name
    #[error("Query missing a required argument: '{name}'")]
    MissingRequiredArgument { name: String },

    /// Keyword arguments that do not name an unfilled parameter
    #[error("Query got unexpected keyword arguments {names:?}")]
    UnexpectedKeywordArgument { names: Vec<String> },

    /// Operator string not recognised
    #[error("Unknown operator '{op}'")]
    UnknownOperator { op: String },

    /// Invalid query configuration
    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    /// A driver cannot bind this kind of value
    #[error("Cannot bind a parameter of type {type_name}")]
    UnsupportedParameter { type_name: &'static str },
}

/// Convenience Result type for Quarry operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new invalid identifier error
    pub fn invalid_identifier(name: impl Into<String>) -> Self {
        Self::InvalidIdentifier { name: name.into() }
    }

    /// Create a new arity mismatch error
    pub fn arity_mismatch(expected: usize, found: usize) -> Self {
        Self::ArityMismatch { expected, found }
    }

    /// Create a new missing argument error
    pub fn missing_argument(name: impl Into<String>) -> Self {
        Self::MissingRequiredArgument { name: name.into() }
    }

    /// Create a new invalid query error
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }
}
