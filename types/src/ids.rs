//! Fixed-representation variants of [`Tagged`].
//!
//! Each alias pins the payload to one primitive kind. A variant is a plain
//! `Tagged`, so it is usable anywhere a `Tagged` of that kind is expected.

use uuid::Uuid;

use crate::tag::Marker;
use crate::value::Tagged;

/// Free-form text identifier. Parsing never fails.
pub type TextTagged<T> = Tagged<String, T>;

/// 32-bit signed integer identifier.
pub type IntTagged<T> = Tagged<i32, T>;

/// 64-bit signed integer identifier.
pub type LongTagged<T> = Tagged<i64, T>;

/// UUID identifier. Parsing accepts only the hyphenated 36-character form.
pub type UuidTagged<T> = Tagged<Uuid, T>;

impl<T: Marker> Tagged<String, T> {
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.value()
    }
}

impl<T: Marker> From<&str> for Tagged<String, T> {
    fn from(value: &str) -> Self {
        Self::new(value.to_owned())
    }
}

impl<T: Marker> Tagged<Uuid, T> {
    /// Mint a fresh random (v4) identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4())
    }
}
