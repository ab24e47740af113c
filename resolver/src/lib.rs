//! Marker recovery for tagkit boundaries.
//!
//! A boundary holding a bare primitive also holds, somewhere, a declaration
//! of what that primitive is: a parameter declared as `LongTagged<Order>`, a
//! column mapped to `Tagged<Uuid, Invoice>`. This crate turns such a
//! declaration into a [`TagDescriptor`](tagkit_types::TagDescriptor).
//!
//! [`TagResolver`] inspects [`Signature`]s against a [`MarkerRegistry`] and
//! memoizes the result per declaration. [`ExplicitOnly`] is the drop-in for
//! hosts that cannot inspect declarations and only accept descriptors passed
//! in by the caller.

mod registry;
mod resolver;
mod signature;

pub use registry::MarkerRegistry;
pub use resolver::{ExplicitOnly, ResolveTag, TagResolver};
pub use signature::{Signature, SignatureError, TypeArg};
