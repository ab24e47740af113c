//! The runtime-tag-bearing form of a tagged value.
//!
//! Used at boundaries where the marker is only known as data: a descriptor
//! resolved from a declared signature, or passed explicitly by the caller.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

use crate::error::TagError;
use crate::primitive::{Comparable, Primitive, RawValue};
use crate::tag::{Marker, TypeTag};
use crate::value::{Tagged, TaggedValue};

/// A value paired with the runtime descriptor of its marker.
///
/// Equality requires both the value and the tag to match, and the hash
/// covers both. Values with different tags are unordered.
#[derive(Clone)]
pub struct DynTagged<V = RawValue> {
    value: V,
    tag: TypeTag,
}

impl<V> DynTagged<V> {
    #[must_use]
    pub const fn new(value: V, tag: TypeTag) -> Self {
        Self { value, tag }
    }

    #[must_use]
    pub const fn value(&self) -> &V {
        &self.value
    }

    #[must_use]
    pub const fn tag(&self) -> TypeTag {
        self.tag
    }

    #[must_use]
    pub fn into_value(self) -> V {
        self.value
    }

    /// Recover the compile-time form. Fails when the carried tag is not `T`.
    pub fn downcast<T: Marker>(self) -> Result<Tagged<V, T>, TagError> {
        if self.tag.is::<T>() {
            Ok(Tagged::new(self.value))
        } else {
            Err(TagError::mismatch(T::name(), self.tag.name()))
        }
    }
}

impl DynTagged<RawValue> {
    /// Pin the payload to primitive `P`. Fails when the kinds disagree.
    pub fn narrow<P: Primitive>(self) -> Result<DynTagged<P>, TagError> {
        let tag = self.tag;
        P::from_raw(self.value).map(|value| DynTagged::new(value, tag))
    }
}

impl<P: Primitive> DynTagged<P> {
    #[must_use]
    pub fn widen(self) -> DynTagged<RawValue> {
        DynTagged::new(self.value.into_raw(), self.tag)
    }
}

impl<V: Comparable> DynTagged<V> {
    fn checked_cmp(&self, other: &Self) -> Result<Ordering, TagError> {
        if self.tag != other.tag {
            return Err(TagError::mismatch(self.tag.name(), other.tag.name()));
        }
        self.value
            .partial_cmp(&other.value)
            .ok_or_else(|| TagError::mismatch(self.value.kind_name(), other.value.kind_name()))
    }
}

impl<V: Comparable> TaggedValue for DynTagged<V> {
    type Value = V;

    fn value(&self) -> &V {
        &self.value
    }

    fn tag(&self) -> TypeTag {
        self.tag
    }

    fn compare_to(&self, other: &Self) -> Result<Ordering, TagError> {
        self.checked_cmp(other)
    }
}

impl<V: PartialEq> PartialEq for DynTagged<V> {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.value == other.value
    }
}

impl<V: Eq> Eq for DynTagged<V> {}

impl<V: Comparable> PartialOrd for DynTagged<V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.checked_cmp(other).ok()
    }
}

impl<V: Hash> Hash for DynTagged<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
        self.tag.hash(state);
    }
}

impl<V: fmt::Debug> fmt::Debug for DynTagged<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(self.tag.name()).field(&self.value).finish()
    }
}

impl<V: fmt::Display> fmt::Display for DynTagged<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl<V: Serialize> Serialize for DynTagged<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<P: Primitive, T: Marker> From<Tagged<P, T>> for DynTagged<RawValue> {
    fn from(tagged: Tagged<P, T>) -> Self {
        tagged.erase().widen()
    }
}
