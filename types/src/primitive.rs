//! The closed set of primitive representations a tagged value may carry.

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ParseError, TagError};

/// Length of the canonical hyphenated UUID text form.
const UUID_TEXT_LEN: usize = 36;

/// Primitive kind of a tagged value's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Text,
    Int32,
    Int64,
    Uuid,
}

impl PrimitiveKind {
    /// Name of the Rust type carrying this kind, as written in signatures.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Text => "String",
            Self::Int32 => "i32",
            Self::Int64 => "i64",
            Self::Uuid => "Uuid",
        }
    }

    /// Inverse of [`PrimitiveKind::type_name`].
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "String" => Some(Self::Text),
            "i32" => Some(Self::Int32),
            "i64" => Some(Self::Int64),
            "Uuid" => Some(Self::Uuid),
            _ => None,
        }
    }

    /// Strictly parse `raw` as this kind. Whitespace is never trimmed.
    pub fn parse(self, raw: &str) -> Result<RawValue, ParseError> {
        match self {
            Self::Text => Ok(RawValue::Text(raw.to_owned())),
            Self::Int32 => raw
                .parse::<i32>()
                .map(RawValue::Int32)
                .map_err(|err| ParseError::new(self, raw, err)),
            Self::Int64 => raw
                .parse::<i64>()
                .map(RawValue::Int64)
                .map_err(|err| ParseError::new(self, raw, err)),
            Self::Uuid => parse_uuid(raw).map(RawValue::Uuid),
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Accepts only the 36-character hyphenated form (either hex case).
pub(crate) fn parse_uuid(raw: &str) -> Result<Uuid, ParseError> {
    if raw.len() != UUID_TEXT_LEN {
        return Err(ParseError::new(
            PrimitiveKind::Uuid,
            raw,
            format!("expected {UUID_TEXT_LEN} characters, found {}", raw.len()),
        ));
    }
    Uuid::try_parse(raw).map_err(|err| ParseError::new(PrimitiveKind::Uuid, raw, err))
}

/// A primitive payload whose kind is only known at runtime.
///
/// Values of different kinds are unordered and never equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Text(String),
    Int32(i32),
    Int64(i64),
    Uuid(Uuid),
}

impl RawValue {
    #[must_use]
    pub const fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Text(_) => PrimitiveKind::Text,
            Self::Int32(_) => PrimitiveKind::Int32,
            Self::Int64(_) => PrimitiveKind::Int64,
            Self::Uuid(_) => PrimitiveKind::Uuid,
        }
    }

    pub(crate) fn expect_kind(&self, expected: PrimitiveKind) -> Result<(), TagError> {
        if self.kind() == expected {
            Ok(())
        } else {
            Err(TagError::mismatch(expected.type_name(), self.kind().type_name()))
        }
    }
}

impl PartialOrd for RawValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Int32(a), Self::Int32(b)) => Some(a.cmp(b)),
            (Self::Int64(a), Self::Int64(b)) => Some(a.cmp(b)),
            (Self::Uuid(a), Self::Uuid(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::Int32(value) => fmt::Display::fmt(value, f),
            Self::Int64(value) => fmt::Display::fmt(value, f),
            Self::Uuid(value) => fmt::Display::fmt(&value.hyphenated(), f),
        }
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for String {}
    impl Sealed for i32 {}
    impl Sealed for i64 {}
    impl Sealed for uuid::Uuid {}
}

/// One of the four fixed representations a variant may carry.
pub trait Primitive:
    sealed::Sealed + Clone + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    const KIND: PrimitiveKind;

    fn into_raw(self) -> RawValue;

    /// Fails with `TypeMismatch` when `raw` holds a different kind.
    fn from_raw(raw: RawValue) -> Result<Self, TagError>;

    fn parse_strict(raw: &str) -> Result<Self, ParseError> {
        let value = Self::KIND.parse(raw)?;
        // `KIND.parse` always yields `KIND`.
        Self::from_raw(value).map_err(|err| ParseError::new(Self::KIND, raw, err))
    }
}

macro_rules! primitive {
    ($ty:ty, $variant:ident) => {
        impl Primitive for $ty {
            const KIND: PrimitiveKind = PrimitiveKind::$variant;

            fn into_raw(self) -> RawValue {
                RawValue::$variant(self)
            }

            fn from_raw(raw: RawValue) -> Result<Self, TagError> {
                match raw {
                    RawValue::$variant(value) => Ok(value),
                    other => Err(TagError::mismatch(
                        Self::KIND.type_name(),
                        other.kind().type_name(),
                    )),
                }
            }
        }
    };
}

primitive!(String, Text);
primitive!(i32, Int32);
primitive!(i64, Int64);
primitive!(Uuid, Uuid);

/// A payload that may be compared inside a runtime-tagged value.
///
/// Implemented for the four primitives and for [`RawValue`]; open to other
/// comparable payloads.
pub trait Comparable: PartialOrd {
    /// Name reported when two payloads turn out to be incomparable.
    fn kind_name(&self) -> &'static str;
}

impl<P: Primitive> Comparable for P {
    fn kind_name(&self) -> &'static str {
        P::KIND.type_name()
    }
}

impl Comparable for RawValue {
    fn kind_name(&self) -> &'static str {
        self.kind().type_name()
    }
}
