//! Marker types and their runtime descriptors.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A compile-time marker distinguishing one logical domain from another.
///
/// Markers are never instantiated. Declare them with [`define_markers!`]
/// (uninhabited enums) or implement the trait on any `'static` type.
pub trait Marker: 'static {
    /// Short name used in diagnostics and signature lookup.
    fn name() -> &'static str {
        short_name(type_name::<Self>())
    }
}

fn short_name(full: &'static str) -> &'static str {
    full.rsplit("::").next().unwrap_or(full)
}

/// Declare one or more uninhabited marker types.
///
/// ```
/// tagkit_types::define_markers! {
///     /// Customer accounts.
///     pub User;
///     pub Product;
/// }
///
/// use tagkit_types::Marker;
/// assert_eq!(User::name(), "User");
/// ```
#[macro_export]
macro_rules! define_markers {
    ($($(#[$meta:meta])* $vis:vis $name:ident;)+) => {
        $(
            $(#[$meta])*
            #[derive(Debug)]
            $vis enum $name {}

            impl $crate::Marker for $name {}
        )+
    };
}

/// Runtime descriptor of a marker type.
///
/// Descriptors obtained separately for the same marker are interchangeable:
/// equality and hashing use the marker's `TypeId` only.
#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    #[must_use]
    pub fn of<T: Marker>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: T::name(),
        }
    }

    #[must_use]
    pub const fn id(self) -> TypeId {
        self.id
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn is<T: Marker>(self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({})", self.name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::{Marker, TypeTag};

    crate::define_markers! {
        User;
        Product;
    }

    mod billing {
        crate::define_markers! {
            pub User;
        }
    }

    struct Custom;

    impl Marker for Custom {
        fn name() -> &'static str {
            "custom-marker"
        }
    }

    #[test]
    fn descriptors_for_same_marker_are_equal() {
        assert_eq!(TypeTag::of::<User>(), TypeTag::of::<User>());
        assert!(TypeTag::of::<User>().is::<User>());
    }

    #[test]
    fn descriptors_for_distinct_markers_differ() {
        assert_ne!(TypeTag::of::<User>(), TypeTag::of::<Product>());
        assert!(!TypeTag::of::<User>().is::<Product>());
    }

    #[test]
    fn same_short_name_in_other_module_is_distinct() {
        let local = TypeTag::of::<User>();
        let other = TypeTag::of::<billing::User>();
        assert_eq!(local.name(), other.name());
        assert_ne!(local, other);
    }

    #[test]
    fn name_defaults_to_last_path_segment() {
        assert_eq!(User::name(), "User");
        assert_eq!(TypeTag::of::<Product>().to_string(), "Product");
    }

    #[test]
    fn name_can_be_overridden() {
        assert_eq!(TypeTag::of::<Custom>().name(), "custom-marker");
        assert_eq!(format!("{:?}", TypeTag::of::<Custom>()), "TypeTag(custom-marker)");
    }
}
