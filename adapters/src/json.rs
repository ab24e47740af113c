//! JSON boundary.
//!
//! A tagged value is written as its bare primitive. Reading one back needs the
//! descriptor from somewhere else: the static type, an explicit descriptor, or
//! a declared signature run through a resolver.

use serde::Serialize;
use serde::de::DeserializeSeed;
use serde_json::Value;
use tagkit_resolver::{ResolveTag, Signature};
use tagkit_types::{DynTagged, Marker, Primitive, TagDescriptor, TagError, Tagged, TaggedValue};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Tag(#[from] TagError),
}

pub fn to_json<V>(tagged: &V) -> Result<Value, JsonError>
where
    V: TaggedValue + Serialize,
{
    Ok(serde_json::to_value(tagged)?)
}

pub fn to_json_string<V>(tagged: &V) -> Result<String, JsonError>
where
    V: TaggedValue + Serialize,
{
    Ok(serde_json::to_string(tagged)?)
}

/// Read a bare primitive with an explicit descriptor.
pub fn from_json_described(json: &Value, descriptor: TagDescriptor) -> Result<DynTagged, JsonError> {
    Ok(descriptor.seed().deserialize(json)?)
}

/// Read a bare primitive as `Tagged<P, T>`, with the same strictness as the
/// described path.
pub fn from_json<P: Primitive, T: Marker>(json: &Value) -> Result<Tagged<P, T>, JsonError> {
    let tagged = from_json_described(json, TagDescriptor::of::<P, T>())?;
    Ok(tagged.narrow::<P>()?.downcast::<T>()?)
}

pub fn from_json_str<P: Primitive, T: Marker>(json: &str) -> Result<Tagged<P, T>, JsonError> {
    let value: Value = serde_json::from_str(json)?;
    from_json(&value)
}

/// Read a bare primitive whose declaration is only known as a signature.
pub fn from_json_declared<R: ResolveTag>(
    resolver: &R,
    context: &str,
    signature: &Signature,
    json: &Value,
) -> Result<DynTagged, JsonError> {
    let descriptor = resolver.resolve(context, signature)?;
    from_json_described(json, descriptor)
}
