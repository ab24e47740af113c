//! SQLite column conversions. UUIDs are stored as hyphenated TEXT.
//!
//! Compiled, and tested, only with the `sqlite` feature.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Value, ValueRef};
use uuid::Uuid;

use crate::dynamic::DynTagged;
use crate::primitive::{Primitive, PrimitiveKind, RawValue, parse_uuid};
use crate::tag::Marker;
use crate::value::Tagged;

impl RawValue {
    #[must_use]
    pub fn into_sql_value(self) -> Value {
        match self {
            Self::Text(value) => Value::Text(value),
            Self::Int32(value) => Value::Integer(i64::from(value)),
            Self::Int64(value) => Value::Integer(value),
            Self::Uuid(value) => Value::Text(value.hyphenated().to_string()),
        }
    }

    /// Read a non-null column as `kind`.
    pub fn from_sql(kind: PrimitiveKind, value: ValueRef<'_>) -> FromSqlResult<Self> {
        match kind {
            PrimitiveKind::Text => value.as_str().map(|text| Self::Text(text.to_owned())),
            PrimitiveKind::Int32 => {
                let wide = value.as_i64()?;
                i32::try_from(wide)
                    .map(Self::Int32)
                    .map_err(|_| FromSqlError::OutOfRange(wide))
            }
            PrimitiveKind::Int64 => value.as_i64().map(Self::Int64),
            PrimitiveKind::Uuid => match value {
                ValueRef::Text(_) => {
                    let text = value.as_str()?;
                    parse_uuid(text)
                        .map(Self::Uuid)
                        .map_err(|err| FromSqlError::Other(Box::new(err)))
                }
                ValueRef::Blob(bytes) => Uuid::from_slice(bytes)
                    .map(Self::Uuid)
                    .map_err(|_| FromSqlError::InvalidBlobSize {
                        expected_size: 16,
                        blob_size: bytes.len(),
                    }),
                _ => Err(FromSqlError::InvalidType),
            },
        }
    }
}

impl ToSql for RawValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Owned(self.clone().into_sql_value()))
    }
}

impl<P: Primitive, T: Marker> ToSql for Tagged<P, T> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Owned(
            self.value().clone().into_raw().into_sql_value(),
        ))
    }
}

impl<P: Primitive, T: Marker> FromSql for Tagged<P, T> {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = RawValue::from_sql(P::KIND, value)?;
        P::from_raw(raw)
            .map(Self::new)
            .map_err(|err| FromSqlError::Other(Box::new(err)))
    }
}

impl<P: Primitive> ToSql for DynTagged<P> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Owned(
            self.value().clone().into_raw().into_sql_value(),
        ))
    }
}

impl ToSql for DynTagged<RawValue> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.value().to_sql()
    }
}
