//! Named query variables (bound parameters)

use std::fmt::{self, Display};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::ident::is_valid_name;
use crate::params::ParameterEntry;
use crate::token::{Block, Token};
use crate::value::{Value, ValueType};
use crate::{Error, Result};

static NEXT_VARIABLE_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque handle identifying one constructed variable.
///
/// Clones of a [`Variable`] share the handle, separately constructed
/// variables never do, even when their names are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariableId(u64);

impl VariableId {
    fn next() -> Self {
        VariableId(NEXT_VARIABLE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Declared default of a variable
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TypedDefault {
    /// Required, any type
    #[default]
    NoDefault,
    /// Optional, defaults to NULL, any type
    Null,
    /// Required, with an expected type
    Typed(ValueType),
    /// Optional, defaults to this value; the type is taken from the value
    Value(Value),
}

impl TypedDefault {
    /// Whether a caller has to supply a value for this default
    pub fn is_required(&self) -> bool {
        matches!(self, TypedDefault::NoDefault | TypedDefault::Typed(_))
    }
}

impl From<Value> for TypedDefault {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => TypedDefault::Null,
            value => TypedDefault::Value(value),
        }
    }
}

impl From<ValueType> for TypedDefault {
    fn from(ty: ValueType) -> Self {
        TypedDefault::Typed(ty)
    }
}

impl<T> From<Option<T>> for TypedDefault
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        Value::from(opt).into()
    }
}

macro_rules! typed_default_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for TypedDefault {
                fn from(val: $ty) -> Self {
                    Value::from(val).into()
                }
            }
        )*
    };
}

typed_default_from_value!((), bool, i32, i64, f32, f64, String, &str, Vec<u8>, serde_json::Value);

#[cfg(feature = "uuid-support")]
typed_default_from_value!(uuid::Uuid);

#[cfg(feature = "datetime-support")]
typed_default_from_value!(chrono::DateTime<chrono::Utc>);

#[cfg(feature = "decimal-support")]
typed_default_from_value!(rust_decimal::Decimal);

/// A bound query parameter.
///
/// The name is only used to address the parameter when calling a compiled
/// query; the SQL text refers to it by position.
#[derive(Debug, Clone)]
pub struct Variable {
    id: VariableId,
    name: String,
    default: TypedDefault,
}

impl Variable {
    /// Create a required variable
    ///
    /// # Examples
    /// ```
    /// use quarry_core::Variable;
    ///
    /// let name = Variable::new("name").unwrap();
    /// assert!(Variable::new("while").is_err());
    /// ```
    pub fn new(name: &str) -> Result<Self> {
        Self::with_default(name, TypedDefault::NoDefault)
    }

    /// Create a variable with a default, a NULL default or a type marker
    ///
    /// # Examples
    /// ```
    /// use quarry_core::{Variable, ValueType};
    ///
    /// let page = Variable::with_default("page", 1).unwrap();
    /// let id = Variable::with_default("id", ValueType::I64).unwrap();
    /// let parent = Variable::with_default("parent", None::<i64>).unwrap();
    /// ```
    pub fn with_default(name: &str, default: impl Into<TypedDefault>) -> Result<Self> {
        if !is_valid_name(name) {
            return Err(Error::invalid_identifier(name));
        }
        Ok(Self::synthesized(name.to_string(), default.into()))
    }

    /// Build a variable from a name already known to be valid
    pub(crate) fn synthesized(name: String, default: TypedDefault) -> Self {
        debug_assert!(is_valid_name(&name), "synthesized invalid name {name:?}");
        Self {
            id: VariableId::next(),
            name,
            default,
        }
    }

    pub fn id(&self) -> VariableId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default(&self) -> &TypedDefault {
        &self.default
    }

    /// A variable is boolean when its default is a boolean value
    pub fn is_boolean(&self) -> bool {
        matches!(&self.default, TypedDefault::Value(value) if value.is_bool())
    }

    /// Normalize the declaration into the entry stored in a parameter table
    pub fn entry(&self) -> ParameterEntry {
        let (type_hint, default) = match &self.default {
            TypedDefault::NoDefault => (None, None),
            TypedDefault::Null => (None, Some(Value::Null)),
            TypedDefault::Typed(ty) => (Some(*ty), None),
            TypedDefault::Value(value) => (value.value_type(), Some(value.clone())),
        };
        ParameterEntry {
            name: self.name.clone(),
            type_hint,
            default,
        }
    }
}

/// Variables compare structurally; identity is only consulted by the compiler
impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.default == other.default
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.default {
            TypedDefault::NoDefault => write!(f, "Variable({})", self.name),
            TypedDefault::Null => write!(f, "Variable({}, NULL)", self.name),
            TypedDefault::Typed(ty) => write!(f, "Variable({}: {ty})", self.name),
            TypedDefault::Value(value) => write!(f, "Variable({}, {value})", self.name),
        }
    }
}

impl Block for Variable {
    fn flatten(&self) -> Vec<Token> {
        vec![Token::Param(self.clone())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_variable_names() {
        for name in ["while", "1take", "a-b", "i>1", "oxy's"] {
            let err = Variable::new(name).unwrap_err();
            assert_eq!(err, Error::invalid_identifier(name));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Variable::new("name").unwrap().to_string(), "Variable(name)");
        assert_eq!(
            Variable::with_default("name", "value").unwrap().to_string(),
            "Variable(name, 'value')"
        );
    }

    #[test]
    fn test_flatten_is_single_param() {
        let var = Variable::with_default("name", "value").unwrap();
        assert_eq!(var.flatten(), vec![Token::Param(var.clone())]);
    }

    #[test]
    fn test_identity_vs_equality() {
        let a = Variable::new("id").unwrap();
        let b = Variable::new("id").unwrap();
        assert_eq!(a, b);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
    }

    #[test]
    fn test_null_value_normalizes_to_null_default() {
        let var = Variable::with_default("parent", Value::Null).unwrap();
        assert_eq!(var.default(), &TypedDefault::Null);
        let var = Variable::with_default("parent", None::<i32>).unwrap();
        assert_eq!(var.default(), &TypedDefault::Null);
    }

    #[test]
    fn test_entry_normalization() {
        let entry = Variable::new("name").unwrap().entry();
        assert_eq!((entry.type_hint, entry.default), (None, None));

        let entry = Variable::with_default("id", ()).unwrap().entry();
        assert_eq!((entry.type_hint, entry.default), (None, Some(Value::Null)));

        let entry = Variable::with_default("id", ValueType::I64).unwrap().entry();
        assert_eq!((entry.type_hint, entry.default), (Some(ValueType::I64), None));

        let entry = Variable::with_default("id", 101i64).unwrap().entry();
        assert_eq!(
            (entry.type_hint, entry.default),
            (Some(ValueType::I64), Some(Value::I64(101)))
        );
    }

    #[test]
    fn test_boolean_flag() {
        assert!(Variable::with_default("active", true).unwrap().is_boolean());
        assert!(!Variable::with_default("count", 1).unwrap().is_boolean());
        assert!(!Variable::new("flag").unwrap().is_boolean());
    }
}
