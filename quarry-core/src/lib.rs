//! Quarry Core - expression model, compiler and argument binder
//!
//! Queries are built from [`Block`]s that flatten into a stream of
//! [`Token`]s. The compiler turns a token stream into SQL text with
//! positional placeholders plus an ordered parameter table, and a
//! [`Binder`] maps call arguments onto those positions.
//!
//! ```
//! use quarry_core::{mkquery, Args, Column, ExprExt, Value};
//!
//! let query = mkquery(&Column::new("age").unwrap().greater_than(18));
//! assert_eq!(query.sql(), "\"age\" > $1");
//!
//! let bound = query.call(Args::new()).unwrap();
//! assert_eq!(bound.args, vec![Value::I32(18)]);
//! ```

pub mod binder;
pub mod compiler;
pub mod error;
pub mod expr;
pub mod helpers;
pub mod ident;
pub mod list;
pub mod operator;
pub mod params;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod token;
pub mod value;
pub mod variable;

// Re-export main types
pub use binder::{Args, Binder, BoundQuery, Signature};
pub use compiler::{compile, compile_with, mkquery, CompileOptions, CompiledQuery, PlaceholderStyle};
pub use error::{Error, Result};
pub use expr::{
    Between, Column, Expr, ExprExt, Expression, Function, FunctionCall, IntoOperand, Operand,
    Table,
};
pub use helpers::{all, any, group};
pub use list::CommaSeparated;
pub use operator::{op, IntoOperator, Operator};
pub use params::{Diagnostic, ParameterEntry, ParameterTable};
pub use token::{Block, Token};
pub use value::{Value, ValueType};
pub use variable::{TypedDefault, Variable, VariableId};

/// Commonly used imports
pub mod prelude {
    pub use crate::{
        mkquery, Args, Block, Column, Expr, ExprExt, FunctionCall, Table, Value, ValueType,
        Variable,
    };
}
