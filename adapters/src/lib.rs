//! Boundary adapters for tagged values.
//!
//! Every boundary sees only the bare primitive. The tag is recovered from
//! the Rust type, an explicit [`TagDescriptor`](tagkit_types::TagDescriptor),
//! or a declared [`Signature`](tagkit_resolver::Signature) resolved at the
//! edge:
//!
//! - [`json`]: serialize as the bare primitive, deserialize strictly.
//! - [`column`]: null-safe SQLite column mapping.
//! - [`predicate`]: marker-checked query predicates over tagged columns.
//! - [`binding`]: path and query parameter binding from strings.

pub mod binding;
pub mod column;
pub mod json;
pub mod predicate;

pub use binding::{BindError, ParameterBinder};
pub use column::{ColumnMapping, DescribedColumn, TaggedColumn};
pub use json::{
    JsonError, from_json, from_json_declared, from_json_described, from_json_str, to_json,
    to_json_string,
};
pub use predicate::{Field, Predicate, Record, SqlFragment, TaggedField};
