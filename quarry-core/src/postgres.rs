//! Hand-off of bound queries to sqlx (PostgreSQL)

use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;

use crate::binder::BoundQuery;
use crate::value::{Value, ValueType};
use crate::{Error, Result};

impl BoundQuery {
    /// Build an sqlx query with every argument bound in positional order.
    ///
    /// NULL arguments are typed after the parameter's declared type, or as
    /// TEXT when it has none. The query is not executed.
    pub fn to_postgres(&self) -> Result<Query<'_, Postgres, PgArguments>> {
        let mut query = sqlx::query(&self.sql);
        for (i, arg) in self.args.iter().enumerate() {
            let hint = self.type_hints.get(i).copied().flatten();
            query = bind_value(query, arg, hint)?;
        }
        Ok(query)
    }
}

fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &'q Value,
    hint: Option<ValueType>,
) -> Result<Query<'q, Postgres, PgArguments>> {
    Ok(match value {
        Value::Null => bind_null(query, hint)?,
        Value::Bool(b) => query.bind(*b),
        Value::I32(i) => query.bind(*i),
        Value::I64(i) => query.bind(*i),
        Value::F32(f) => query.bind(*f),
        Value::F64(f) => query.bind(*f),
        Value::String(s) => query.bind(s.as_str()),
        Value::Bytes(b) => query.bind(b.as_slice()),
        Value::Json(j) => query.bind(sqlx::types::Json(j)),
        #[cfg(feature = "uuid-support")]
        Value::Uuid(id) => query.bind(*id),
        #[cfg(feature = "datetime-support")]
        Value::Timestamp(ts) => query.bind(*ts),
        #[cfg(feature = "decimal-support")]
        Value::Decimal(d) => query.bind(*d),
        Value::Array(_) => {
            return Err(Error::UnsupportedParameter {
                type_name: value.type_name(),
            })
        }
    })
}

fn bind_null(
    query: Query<'_, Postgres, PgArguments>,
    hint: Option<ValueType>,
) -> Result<Query<'_, Postgres, PgArguments>> {
    Ok(match hint {
        None | Some(ValueType::String) => query.bind(None::<String>),
        Some(ValueType::Bool) => query.bind(None::<bool>),
        Some(ValueType::I32) => query.bind(None::<i32>),
        Some(ValueType::I64) => query.bind(None::<i64>),
        Some(ValueType::F32) => query.bind(None::<f32>),
        Some(ValueType::F64) => query.bind(None::<f64>),
        Some(ValueType::Bytes) => query.bind(None::<Vec<u8>>),
        Some(ValueType::Json) => query.bind(None::<sqlx::types::Json<serde_json::Value>>),
        #[cfg(feature = "uuid-support")]
        Some(ValueType::Uuid) => query.bind(None::<uuid::Uuid>),
        #[cfg(feature = "datetime-support")]
        Some(ValueType::Timestamp) => query.bind(None::<chrono::DateTime<chrono::Utc>>),
        #[cfg(feature = "decimal-support")]
        Some(ValueType::Decimal) => query.bind(None::<rust_decimal::Decimal>),
        Some(ValueType::Array) => {
            return Err(Error::UnsupportedParameter {
                type_name: ValueType::Array.name(),
            })
        }
    })
}
