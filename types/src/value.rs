//! The tagged value itself, in its compile-time-only form.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::dynamic::DynTagged;
use crate::error::{ParseError, TagError};
use crate::primitive::Primitive;
use crate::tag::{Marker, TypeTag};

/// Contract shared by both tagged-value models.
///
/// [`Tagged`] keeps its marker purely at the type level; [`DynTagged`] carries
/// a [`TypeTag`] at runtime. Calling code written against this trait works with
/// either.
pub trait TaggedValue {
    type Value;

    fn value(&self) -> &Self::Value;

    fn tag(&self) -> TypeTag;

    /// Orders two values sharing a tag. Differently tagged values yield
    /// `TypeMismatch`.
    fn compare_to(&self, other: &Self) -> Result<Ordering, TagError>;
}

/// A primitive `value` bearing the marker `T`.
///
/// The marker exists only for the type checker: two `Tagged` values with
/// different markers are different types, so mixing them up is a compile
/// error rather than a runtime one.
///
/// ```compile_fail
/// use tagkit_types::{define_markers, TextTagged};
/// define_markers! { User; Product; }
///
/// let user = TextTagged::<User>::new("42".to_owned());
/// let product = TextTagged::<Product>::new("42".to_owned());
/// let _ = user == product;
/// ```
///
/// ```compile_fail
/// use tagkit_types::{define_markers, IntTagged};
/// define_markers! { Counter; Gauge; }
///
/// let counter = IntTagged::<Counter>::new(1);
/// let gauge = IntTagged::<Gauge>::new(1);
/// let _ = counter.cmp(&gauge);
/// ```
///
/// ```compile_fail
/// use tagkit_types::{define_markers, LongTagged};
/// define_markers! { Order; Invoice; }
///
/// fn load(_id: LongTagged<Order>) {}
/// load(LongTagged::<Invoice>::new(7));
/// ```
#[repr(transparent)]
pub struct Tagged<V, T: Marker> {
    value: V,
    tag: PhantomData<fn() -> T>,
}

impl<V, T: Marker> Tagged<V, T> {
    /// Wrap `value` without validation. Validation belongs to [`Tagged::parse`].
    #[must_use]
    pub const fn new(value: V) -> Self {
        Self {
            value,
            tag: PhantomData,
        }
    }

    #[must_use]
    pub const fn value(&self) -> &V {
        &self.value
    }

    #[must_use]
    pub fn into_value(self) -> V {
        self.value
    }

    #[must_use]
    pub fn tag(&self) -> TypeTag {
        TypeTag::of::<T>()
    }

    /// Move the marker from the type into a runtime descriptor.
    #[must_use]
    pub fn erase(self) -> DynTagged<V> {
        DynTagged::new(self.value, TypeTag::of::<T>())
    }
}

impl<P: Primitive, T: Marker> Tagged<P, T> {
    /// Strictly parse the textual form of `P`.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        P::parse_strict(raw).map(Self::new)
    }
}

impl<V, T: Marker> TaggedValue for Tagged<V, T>
where
    V: Ord,
{
    type Value = V;

    fn value(&self) -> &V {
        &self.value
    }

    fn tag(&self) -> TypeTag {
        TypeTag::of::<T>()
    }

    fn compare_to(&self, other: &Self) -> Result<Ordering, TagError> {
        Ok(self.value.cmp(&other.value))
    }
}

impl<P: Primitive, T: Marker> FromStr for Tagged<P, T> {
    type Err = ParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

impl<V: Clone, T: Marker> Clone for Tagged<V, T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<V: Copy, T: Marker> Copy for Tagged<V, T> {}

impl<V: PartialEq, T: Marker> PartialEq for Tagged<V, T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<V: Eq, T: Marker> Eq for Tagged<V, T> {}

impl<V: PartialOrd, T: Marker> PartialOrd for Tagged<V, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl<V: Ord, T: Marker> Ord for Tagged<V, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

// The marker is fixed by the type, so only the value feeds the hash.
impl<V: Hash, T: Marker> Hash for Tagged<V, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<V: fmt::Debug, T: Marker> fmt::Debug for Tagged<V, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(T::name()).field(&self.value).finish()
    }
}

impl<V: fmt::Display, T: Marker> fmt::Display for Tagged<V, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl<V: Serialize, T: Marker> Serialize for Tagged<V, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, V: Deserialize<'de>, T: Marker> Deserialize<'de> for Tagged<V, T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        V::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;
    use std::collections::HashSet;

    use super::{Tagged, TaggedValue};
    use crate::ids::{IntTagged, TextTagged};
    use crate::tag::TypeTag;

    crate::define_markers! {
        User;
        Counter;
    }

    #[test]
    fn accessors_return_what_was_given() {
        let id = TextTagged::<User>::new("42".to_owned());
        assert_eq!(id.value(), "42");
        assert_eq!(id.tag(), TypeTag::of::<User>());
        assert_eq!(id.into_value(), "42");
    }

    #[test]
    fn ordering_follows_value() {
        let one = IntTagged::<Counter>::new(1);
        let two = IntTagged::<Counter>::new(2);
        assert!(one < two);
        assert_eq!(one.compare_to(&two), Ok(Ordering::Less));
        assert_eq!(two.compare_to(&one), Ok(Ordering::Greater));
        assert_eq!(one.compare_to(&one), Ok(Ordering::Equal));
    }

    #[test]
    fn display_renders_value_only() {
        let id = TextTagged::<User>::new("user-7".to_owned());
        assert_eq!(id.to_string(), "user-7");
        assert_eq!(format!("{id:?}"), "User(\"user-7\")");
    }

    #[test]
    fn equal_values_hash_alike() {
        let mut seen = HashSet::new();
        seen.insert(IntTagged::<Counter>::new(5));
        assert!(seen.contains(&IntTagged::<Counter>::new(5)));
        assert!(!seen.insert(IntTagged::<Counter>::new(5)));
    }

    #[test]
    fn parse_is_strict() {
        assert_eq!(
            IntTagged::<Counter>::parse("12").unwrap(),
            IntTagged::<Counter>::new(12)
        );
        assert!(IntTagged::<Counter>::parse("not-a-number").is_err());
        assert!("".parse::<IntTagged<Counter>>().is_err());
    }

    #[test]
    fn marker_costs_nothing_at_runtime() {
        assert_eq!(size_of::<Tagged<i64, User>>(), size_of::<i64>());
    }

    #[test]
    fn serializes_as_bare_value() {
        let id = TextTagged::<User>::new("user-1".to_owned());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"user-1\"");
        let back: TextTagged<User> = serde_json::from_str("\"user-1\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn erase_keeps_value_and_tag() {
        let erased = IntTagged::<Counter>::new(3).erase();
        assert_eq!(*erased.value(), 3);
        assert_eq!(erased.tag(), TypeTag::of::<Counter>());
    }
}
