//! Runtime values handed to database drivers

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A SQL value that can be bound to a query parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 32-bit integer
    I32(i32),
    /// 64-bit integer
    I64(i64),
    /// 32-bit float
    F32(f32),
    /// 64-bit float
    F64(f64),
    /// String value
    String(String),
    /// Bytes value
    Bytes(Vec<u8>),
    /// JSON value
    Json(serde_json::Value),
    /// Array of values
    Array(Vec<Value>),
    /// UUID value
    #[cfg(feature = "uuid-support")]
    Uuid(uuid::Uuid),
    /// Timestamp with time zone
    #[cfg(feature = "datetime-support")]
    Timestamp(chrono::DateTime<chrono::Utc>),
    /// Arbitrary precision decimal
    #[cfg(feature = "decimal-support")]
    Decimal(rust_decimal::Decimal),
}

/// The type of a non-null [`Value`], used as a parameter type hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Bool,
    I32,
    I64,
    F32,
    F64,
    String,
    Bytes,
    Json,
    Array,
    #[cfg(feature = "uuid-support")]
    Uuid,
    #[cfg(feature = "datetime-support")]
    Timestamp,
    #[cfg(feature = "decimal-support")]
    Decimal,
}

impl ValueType {
    /// Get the SQL type name for this type
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Bool => "BOOLEAN",
            ValueType::I32 => "INTEGER",
            ValueType::I64 => "BIGINT",
            ValueType::F32 => "REAL",
            ValueType::F64 => "DOUBLE PRECISION",
            ValueType::String => "TEXT",
            ValueType::Bytes => "BYTEA",
            ValueType::Json => "JSON",
            ValueType::Array => "ARRAY",
            #[cfg(feature = "uuid-support")]
            ValueType::Uuid => "UUID",
            #[cfg(feature = "datetime-support")]
            ValueType::Timestamp => "TIMESTAMPTZ",
            #[cfg(feature = "decimal-support")]
            ValueType::Decimal => "NUMERIC",
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Get the type of this value, `None` for NULL
    pub fn value_type(&self) -> Option<ValueType> {
        let ty = match self {
            Value::Null => return None,
            Value::Bool(_) => ValueType::Bool,
            Value::I32(_) => ValueType::I32,
            Value::I64(_) => ValueType::I64,
            Value::F32(_) => ValueType::F32,
            Value::F64(_) => ValueType::F64,
            Value::String(_) => ValueType::String,
            Value::Bytes(_) => ValueType::Bytes,
            Value::Json(_) => ValueType::Json,
            Value::Array(_) => ValueType::Array,
            #[cfg(feature = "uuid-support")]
            Value::Uuid(_) => ValueType::Uuid,
            #[cfg(feature = "datetime-support")]
            Value::Timestamp(_) => ValueType::Timestamp,
            #[cfg(feature = "decimal-support")]
            Value::Decimal(_) => ValueType::Decimal,
        };
        Some(ty)
    }

    /// Get the SQL type name for this value
    pub fn type_name(&self) -> &'static str {
        self.value_type().map_or("NULL", |ty| ty.name())
    }

    /// Extract array values if this is an Array variant
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }
}

/// Renders the value as an inline SQL literal. Only used for display
/// purposes such as binder signatures; queries always bind values.
impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(true) => f.write_str("TRUE"),
            Value::Bool(false) => f.write_str("FALSE"),
            Value::I32(n) => write!(f, "{n}"),
            Value::I64(n) => write!(f, "{n}"),
            Value::F32(n) => write!(f, "{n}"),
            Value::F64(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Bytes(bytes) => {
                f.write_str("X'")?;
                for byte in bytes {
                    write!(f, "{byte:02X}")?;
                }
                f.write_str("'")
            }
            Value::Json(json) => write!(f, "'{}'", json.to_string().replace('\'', "''")),
            Value::Array(values) => {
                f.write_str("ARRAY[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
            #[cfg(feature = "uuid-support")]
            Value::Uuid(id) => write!(f, "'{id}'"),
            #[cfg(feature = "datetime-support")]
            Value::Timestamp(ts) => write!(f, "'{}'", ts.to_rfc3339()),
            #[cfg(feature = "decimal-support")]
            Value::Decimal(d) => write!(f, "{d}"),
        }
    }
}

// Implement From for common types
impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Value::Bool(val)
    }
}

impl From<i32> for Value {
    fn from(val: i32) -> Self {
        Value::I32(val)
    }
}

impl From<i64> for Value {
    fn from(val: i64) -> Self {
        Value::I64(val)
    }
}

impl From<f32> for Value {
    fn from(val: f32) -> Self {
        Value::F32(val)
    }
}

impl From<f64> for Value {
    fn from(val: f64) -> Self {
        Value::F64(val)
    }
}

impl From<String> for Value {
    fn from(val: String) -> Self {
        Value::String(val)
    }
}

impl From<&str> for Value {
    fn from(val: &str) -> Self {
        Value::String(val.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(val: Vec<u8>) -> Self {
        Value::Bytes(val)
    }
}

impl From<serde_json::Value> for Value {
    fn from(val: serde_json::Value) -> Self {
        Value::Json(val)
    }
}

#[cfg(feature = "uuid-support")]
impl From<uuid::Uuid> for Value {
    fn from(val: uuid::Uuid) -> Self {
        Value::Uuid(val)
    }
}

#[cfg(feature = "datetime-support")]
impl From<chrono::DateTime<chrono::Utc>> for Value {
    fn from(val: chrono::DateTime<chrono::Utc>) -> Self {
        Value::Timestamp(val)
    }
}

#[cfg(feature = "decimal-support")]
impl From<rust_decimal::Decimal> for Value {
    fn from(val: rust_decimal::Decimal) -> Self {
        Value::Decimal(val)
    }
}

impl<T> From<&[T]> for Value
where
    T: Clone + Into<Value>,
{
    fn from(vals: &[T]) -> Self {
        Value::Array(vals.iter().cloned().map(|v| v.into()).collect())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_creation() {
        assert_eq!(Value::from(42i32), Value::I32(42));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from("hello"), Value::String("hello".to_string()));
        assert_eq!(Value::from(()), Value::Null);
    }

    #[test]
    fn test_slice_conversion() {
        let arr: &[i32] = &[1, 2, 3];
        let value = Value::from(arr);
        assert_eq!(
            value,
            Value::Array(vec![Value::I32(1), Value::I32(2), Value::I32(3)])
        );
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(Some(42i32)), Value::I32(42));
        assert_eq!(Value::from(None::<i32>), Value::Null);
    }

    #[test]
    fn test_value_types() {
        assert_eq!(Value::I64(101).value_type(), Some(ValueType::I64));
        assert_eq!(Value::Bool(true).value_type(), Some(ValueType::Bool));
        assert_eq!(Value::Null.value_type(), None);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::I32(42).type_name(), "INTEGER");
        assert_eq!(Value::String("test".to_string()).type_name(), "TEXT");
        assert_eq!(Value::Bool(true).type_name(), "BOOLEAN");
        assert_eq!(Value::Null.type_name(), "NULL");
    }

    #[test]
    fn test_display_inline() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Bool(false).to_string(), "FALSE");
        assert_eq!(Value::I64(-100).to_string(), "-100");
        assert_eq!(Value::from("O'Brien").to_string(), "'O''Brien'");
        assert_eq!(Value::Bytes(vec![0x48, 0x49]).to_string(), "X'4849'");
        assert_eq!(
            Value::from(&[1, 2][..]).to_string(),
            "ARRAY[1, 2]"
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let value = Value::Json(serde_json::json!({"tags": ["a", "b"]}));
        let encoded = serde_json::to_string(&value).unwrap();
        let decoded: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, value);
    }
}
