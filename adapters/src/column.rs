//! Null-safe column mapping between SQLite values and tagged attributes.

use std::marker::PhantomData;

use rusqlite::Row;
use rusqlite::types::{FromSqlError, FromSqlResult, Value, ValueRef};
use tagkit_resolver::{ResolveTag, Signature};
use tagkit_types::{
    DynTagged, EffectiveIdentity, Marker, Primitive, RawValue, TagDescriptor, TagError, Tagged,
};

/// Bidirectional conversion between a persisted column and an attribute.
///
/// `NULL` maps to `None` and `None` maps to `NULL`; everything else goes
/// through the tagged value's bare primitive.
pub trait ColumnMapping {
    type Attribute;

    fn to_column(&self, attribute: Option<&Self::Attribute>) -> Result<Value, TagError>;

    fn to_attribute(&self, column: ValueRef<'_>) -> FromSqlResult<Option<Self::Attribute>>;

    /// Read column `index` of `row` through this mapping.
    fn read(&self, row: &Row<'_>, index: usize) -> rusqlite::Result<Option<Self::Attribute>> {
        let column = row.get_ref(index)?;
        self.to_attribute(column).map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(index, column.data_type(), Box::new(err))
        })
    }
}

/// Mapping for a statically known `Tagged<P, T>` column.
pub struct TaggedColumn<P, T>(PhantomData<fn() -> (P, T)>);

impl<P, T> TaggedColumn<P, T> {
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<P, T> Default for TaggedColumn<P, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Primitive, T: Marker> ColumnMapping for TaggedColumn<P, T> {
    type Attribute = Tagged<P, T>;

    fn to_column(&self, attribute: Option<&Tagged<P, T>>) -> Result<Value, TagError> {
        Ok(attribute.map_or(Value::Null, |tagged| {
            tagged.value().clone().into_raw().into_sql_value()
        }))
    }

    fn to_attribute(&self, column: ValueRef<'_>) -> FromSqlResult<Option<Tagged<P, T>>> {
        if matches!(column, ValueRef::Null) {
            return Ok(None);
        }
        let raw = RawValue::from_sql(P::KIND, column)?;
        P::from_raw(raw)
            .map(|value| Some(Tagged::new(value)))
            .map_err(|err| FromSqlError::Other(Box::new(err)))
    }
}

/// Mapping for a column whose descriptor was resolved at runtime.
#[derive(Debug, Clone, Copy)]
pub struct DescribedColumn {
    descriptor: TagDescriptor,
}

impl DescribedColumn {
    #[must_use]
    pub const fn new(descriptor: TagDescriptor) -> Self {
        Self { descriptor }
    }

    /// Resolve the column's declared attribute type.
    pub fn resolve<R: ResolveTag>(
        resolver: &R,
        context: &str,
        signature: &Signature,
    ) -> Result<Self, TagError> {
        resolver.resolve(context, signature).map(Self::new)
    }

    #[must_use]
    pub const fn descriptor(&self) -> TagDescriptor {
        self.descriptor
    }
}

impl ColumnMapping for DescribedColumn {
    type Attribute = DynTagged;

    fn to_column(&self, attribute: Option<&DynTagged>) -> Result<Value, TagError> {
        let Some(attribute) = attribute else {
            return Ok(Value::Null);
        };
        let found = attribute.effective_descriptor();
        if found != self.descriptor {
            return Err(TagError::mismatch(
                self.descriptor.to_string(),
                found.to_string(),
            ));
        }
        Ok(attribute.value().clone().into_sql_value())
    }

    fn to_attribute(&self, column: ValueRef<'_>) -> FromSqlResult<Option<DynTagged>> {
        if matches!(column, ValueRef::Null) {
            return Ok(None);
        }
        let raw = RawValue::from_sql(self.descriptor.kind(), column)?;
        Ok(Some(DynTagged::new(raw, self.descriptor.tag())))
    }
}
