//! Name to marker lookup used when a signature names its marker as text.

use std::collections::HashMap;

use tagkit_types::{Marker, TagError, TypeTag};

/// Markers a resolver is allowed to recover, by name.
///
/// A marker is registered under [`Marker::name`] and, optionally, under extra
/// aliases such as a fully qualified path. A name binds to exactly one marker.
#[derive(Debug, Clone, Default)]
pub struct MarkerRegistry {
    markers: HashMap<String, TypeTag>,
}

impl MarkerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Marker>(&mut self) -> Result<(), TagError> {
        self.register_as::<T>(T::name())
    }

    pub fn register_as<T: Marker>(&mut self, name: impl Into<String>) -> Result<(), TagError> {
        let tag = TypeTag::of::<T>();
        let name = name.into();
        match self.markers.get(&name) {
            Some(existing) if *existing != tag => Err(TagError::mismatch(
                format!("`{name}` bound to {existing:?}"),
                format!("{tag:?}"),
            )),
            Some(_) => Ok(()),
            None => {
                self.markers.insert(name, tag);
                Ok(())
            }
        }
    }

    /// Builder form of [`MarkerRegistry::register`].
    pub fn with<T: Marker>(mut self) -> Result<Self, TagError> {
        self.register::<T>()?;
        Ok(self)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<TypeTag> {
        self.markers.get(name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
