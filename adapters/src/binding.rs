//! String binding for path and query parameters.
//!
//! Each parameter is declared with a signature. Binding resolves that
//! signature and parses the raw text with the matching variant. There is no
//! fallback conversion: an undeclared parameter or an untagged declaration
//! fails the binding.

use std::collections::HashMap;

use tagkit_config::TagkitConfig;
use tagkit_resolver::{MarkerRegistry, ResolveTag, Signature, TagResolver};
use tagkit_types::{DynTagged, Marker, Primitive, TagDescriptor, TagError, Tagged};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("cannot bind parameter `{parameter}`: {source}")]
pub struct BindError {
    parameter: String,
    #[source]
    source: TagError,
}

impl BindError {
    fn new(parameter: &str, source: TagError) -> Self {
        tracing::debug!("Rejected binding for parameter {}: {}", parameter, source);
        Self {
            parameter: parameter.to_owned(),
            source,
        }
    }

    #[must_use]
    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    #[must_use]
    pub fn tag_error(&self) -> &TagError {
        &self.source
    }
}

/// Binds raw parameter text to tagged values using declared signatures.
#[derive(Debug)]
pub struct ParameterBinder<R = TagResolver> {
    resolver: R,
    parameters: HashMap<String, Signature>,
}

impl ParameterBinder<TagResolver> {
    /// Binder over the parameters declared in `config`.
    #[must_use]
    pub fn from_config(config: &TagkitConfig, registry: MarkerRegistry) -> Self {
        let resolver = TagResolver::new(registry).with_cache(config.cache_enabled());
        let mut binder = Self::new(resolver);
        for (name, signature) in config.parameters() {
            binder.declare(name, signature.clone());
        }
        binder
    }
}

impl<R: ResolveTag> ParameterBinder<R> {
    #[must_use]
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            parameters: HashMap::new(),
        }
    }

    pub fn declare(&mut self, name: impl Into<String>, signature: Signature) -> &mut Self {
        self.parameters.insert(name.into(), signature);
        self
    }

    #[must_use]
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Descriptor for a declared parameter.
    pub fn descriptor(&self, name: &str) -> Result<TagDescriptor, BindError> {
        let signature = self.parameters.get(name).ok_or_else(|| {
            BindError::new(name, TagError::missing(name, "parameter is not declared"))
        })?;
        self.resolver
            .resolve(&context(name), signature)
            .map_err(|err| BindError::new(name, err))
    }

    pub fn bind(&self, name: &str, raw: &str) -> Result<DynTagged, BindError> {
        let descriptor = self.descriptor(name)?;
        Self::bind_with(name, descriptor, raw)
    }

    /// Bind against a descriptor the caller already holds.
    pub fn bind_with(
        name: &str,
        descriptor: TagDescriptor,
        raw: &str,
    ) -> Result<DynTagged, BindError> {
        descriptor
            .parse(raw)
            .map_err(|err| BindError::new(name, err))
    }

    /// Bind into the compile-time form. The declaration must describe
    /// exactly `Tagged<P, T>`.
    pub fn bind_typed<P: Primitive, T: Marker>(
        &self,
        name: &str,
        raw: &str,
    ) -> Result<Tagged<P, T>, BindError> {
        let expected = TagDescriptor::of::<P, T>();
        let declared = self.descriptor(name)?;
        if declared != expected {
            return Err(BindError::new(
                name,
                TagError::mismatch(expected.to_string(), declared.to_string()),
            ));
        }
        Tagged::parse(raw).map_err(|err| BindError::new(name, err.into()))
    }
}

fn context(name: &str) -> String {
    format!("param:{name}")
}

#[cfg(test)]
mod tests {
    use tagkit_config::TagkitConfig;
    use tagkit_resolver::{ExplicitOnly, MarkerRegistry, Signature};
    use tagkit_types::{
        IntTagged, LongTagged, RawValue, TagDescriptor, TypeTag, Uuid, UuidTagged, define_markers,
    };

    use super::ParameterBinder;

    define_markers! {
        Order;
        Counter;
        User;
    }

    const ORDER_UUID: &str = "123e4567-e89b-12d3-a456-426614174000";

    fn registry() -> MarkerRegistry {
        MarkerRegistry::new()
            .with::<Order>()
            .and_then(MarkerRegistry::with::<Counter>)
            .and_then(MarkerRegistry::with::<User>)
            .unwrap()
    }

    fn binder() -> ParameterBinder {
        let config = TagkitConfig::from_toml_str(
            r#"
            [bindings.parameters]
            order_id = "UuidTagged<Order>"
            count = "IntTagged<Counter>"
            seq = "Tagged<i64, Order>"
            raw = "Tagged"
            loose = "Tagged<_, User>"
            plain = "i64"
            "#,
        )
        .unwrap();
        ParameterBinder::from_config(&config, registry())
    }

    #[test]
    fn binds_declared_parameter() {
        let bound = binder().bind("order_id", ORDER_UUID).unwrap();
        assert_eq!(bound.tag(), TypeTag::of::<Order>());
        assert_eq!(
            bound.value(),
            &RawValue::Uuid(Uuid::parse_str(ORDER_UUID).unwrap())
        );
    }

    #[test]
    fn binds_typed_parameter() {
        let binder = binder();
        let id: UuidTagged<Order> = binder.bind_typed("order_id", ORDER_UUID).unwrap();
        assert_eq!(id.to_string(), ORDER_UUID);
        let seq: LongTagged<Order> = binder.bind_typed("seq", "77").unwrap();
        assert_eq!(*seq.value(), 77);
    }

    #[test]
    fn typed_binding_rejects_other_declaration() {
        let err = binder()
            .bind_typed::<i32, Order>("count", "1")
            .unwrap_err();
        assert!(err.tag_error().is_mismatch());
        assert_eq!(err.parameter(), "count");
    }

    #[test]
    fn parse_failure_is_a_binding_failure() {
        let err = binder().bind("count", "not-a-number").unwrap_err();
        assert!(err.tag_error().is_parse());
        assert!(binder().bind_typed::<i32, Counter>("count", " 3").is_err());
        let count: IntTagged<Counter> = binder().bind_typed("count", "3").unwrap();
        assert_eq!(*count.value(), 3);
    }

    #[test]
    fn untagged_declarations_fail_instead_of_defaulting() {
        let binder = binder();
        for name in ["raw", "loose", "plain", "undeclared"] {
            let err = binder.bind(name, "1").unwrap_err();
            assert!(err.tag_error().is_missing_tag(), "{name}: {err}");
        }
    }

    #[test]
    fn explicit_only_binder_needs_explicit_descriptors() {
        let mut binder = ParameterBinder::new(ExplicitOnly);
        binder.declare("count", Signature::parse("IntTagged<Counter>").unwrap());
        assert!(binder.bind("count", "1").unwrap_err().tag_error().is_missing_tag());

        let bound =
            ParameterBinder::<ExplicitOnly>::bind_with("count", TagDescriptor::of::<i32, Counter>(), "1")
                .unwrap();
        assert_eq!(bound.value(), &RawValue::Int32(1));
    }

    #[test]
    fn resolutions_are_memoized_per_parameter() {
        let binder = binder();
        binder.bind("count", "1").unwrap();
        binder.bind("count", "2").unwrap();
        binder.bind("order_id", ORDER_UUID).unwrap();
        assert_eq!(binder.resolver().cached_entries(), 2);
    }

    #[test]
    fn error_message_names_parameter() {
        let err = binder().bind("count", "x").unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot bind parameter `count`: cannot parse \"x\" as i32: invalid digit found in string"
        );
    }
}
