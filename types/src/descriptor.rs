//! A resolved (primitive kind, marker) pair and the constructors it drives.

use std::fmt;

use serde::de::{self, DeserializeSeed, Deserializer, Visitor};

use crate::dynamic::DynTagged;
use crate::error::TagError;
use crate::primitive::{Primitive, PrimitiveKind, RawValue, parse_uuid};
use crate::tag::{Marker, TypeTag};

/// Everything a boundary needs to build a tagged value from a bare primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagDescriptor {
    kind: PrimitiveKind,
    tag: TypeTag,
}

impl TagDescriptor {
    #[must_use]
    pub const fn new(kind: PrimitiveKind, tag: TypeTag) -> Self {
        Self { kind, tag }
    }

    /// Descriptor of `Tagged<P, T>`, known statically.
    #[must_use]
    pub fn of<P: Primitive, T: Marker>() -> Self {
        Self::new(P::KIND, TypeTag::of::<T>())
    }

    #[must_use]
    pub const fn kind(self) -> PrimitiveKind {
        self.kind
    }

    #[must_use]
    pub const fn tag(self) -> TypeTag {
        self.tag
    }

    /// Tag an already-typed raw value. The kind must match.
    pub fn create(self, value: RawValue) -> Result<DynTagged, TagError> {
        value.expect_kind(self.kind)?;
        Ok(DynTagged::new(value, self.tag))
    }

    /// Strictly parse `raw` as this descriptor's kind and tag it.
    pub fn parse(self, raw: &str) -> Result<DynTagged, TagError> {
        let value = self.kind.parse(raw)?;
        Ok(DynTagged::new(value, self.tag))
    }

    /// Deserialize a bare primitive and tag it with this descriptor.
    #[must_use]
    pub const fn seed(self) -> DescriptorSeed {
        DescriptorSeed(self)
    }
}

impl fmt::Display for TagDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tagged<{}, {}>", self.kind, self.tag)
    }
}

/// [`DeserializeSeed`] producing a [`DynTagged`] for an explicit descriptor.
///
/// The serialized form never carries the tag, so it has to come from here.
#[derive(Debug, Clone, Copy)]
pub struct DescriptorSeed(TagDescriptor);

impl<'de> DeserializeSeed<'de> for DescriptorSeed {
    type Value = DynTagged;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        let descriptor = self.0;
        let value = match descriptor.kind {
            PrimitiveKind::Text => deserializer.deserialize_string(TextVisitor)?,
            PrimitiveKind::Int32 => deserializer.deserialize_i32(IntVisitor(PrimitiveKind::Int32))?,
            PrimitiveKind::Int64 => deserializer.deserialize_i64(IntVisitor(PrimitiveKind::Int64))?,
            PrimitiveKind::Uuid => deserializer.deserialize_str(UuidVisitor)?,
        };
        Ok(DynTagged::new(value, descriptor.tag))
    }
}

struct TextVisitor;

impl Visitor<'_> for TextVisitor {
    type Value = RawValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<RawValue, E> {
        Ok(RawValue::Text(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<RawValue, E> {
        Ok(RawValue::Text(v))
    }
}

struct IntVisitor(PrimitiveKind);

impl IntVisitor {
    fn build<E: de::Error>(&self, v: i64) -> Result<RawValue, E> {
        match self.0 {
            PrimitiveKind::Int32 => i32::try_from(v)
                .map(RawValue::Int32)
                .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), self)),
            _ => Ok(RawValue::Int64(v)),
        }
    }
}

impl Visitor<'_> for IntVisitor {
    type Value = RawValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "an integer in {} range", self.0)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<RawValue, E> {
        self.build(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<RawValue, E> {
        let signed =
            i64::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))?;
        self.build(signed)
    }
}

struct UuidVisitor;

impl Visitor<'_> for UuidVisitor {
    type Value = RawValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a hyphenated UUID string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<RawValue, E> {
        parse_uuid(v).map(RawValue::Uuid).map_err(E::custom)
    }
}
