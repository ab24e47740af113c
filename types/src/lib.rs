//! Tagged primitive values for tagkit.
//!
//! A tagged value pairs a primitive (text, `i32`, `i64`, UUID) with a marker
//! type, so a user id and a product id stored as the same string are still
//! different types. This crate holds the value types only: no IO, no async.
//!
//! Two forms share one contract ([`TaggedValue`]):
//!
//! - [`Tagged`] keeps the marker at the type level. It has the same runtime
//!   layout as its payload and mixing markers is a compile error.
//! - [`DynTagged`] carries a [`TypeTag`] at runtime, for boundaries where the
//!   marker is only known as data. Mixing markers there is a
//!   [`TagError::TypeMismatch`].
//!
//! The `sqlite` feature adds rusqlite `ToSql`/`FromSql` impls. Their tests
//! only build with it on: `cargo test -p tagkit-types --features sqlite`.
//!
//! ```
//! use tagkit_types::{define_markers, TextTagged, TypeTag};
//!
//! define_markers! {
//!     pub User;
//!     pub Product;
//! }
//!
//! let user = TextTagged::<User>::from("42");
//! let product = TextTagged::<Product>::from("42");
//! assert_eq!(user.value(), product.value());
//! assert_eq!(user.tag(), TypeTag::of::<User>());
//! assert_ne!(user.erase(), product.erase());
//! ```

mod descriptor;
mod dynamic;
mod error;
mod identity;
mod ids;
mod primitive;
#[cfg(feature = "sqlite")]
mod sql;
mod tag;
mod value;

pub use descriptor::{DescriptorSeed, TagDescriptor};
pub use dynamic::DynTagged;
pub use error::{ParseError, TagError};
pub use identity::EffectiveIdentity;
pub use ids::{IntTagged, LongTagged, TextTagged, UuidTagged};
pub use primitive::{Comparable, Primitive, PrimitiveKind, RawValue};
pub use tag::{Marker, TypeTag};
pub use value::{Tagged, TaggedValue};

pub use uuid::Uuid;
