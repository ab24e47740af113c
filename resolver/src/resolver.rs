//! Recovering a [`TagDescriptor`] from a declared signature.
//!
//! Resolution never looks at data. If the declaration does not name a
//! concrete marker, the answer is `MissingTypeTag`, every time.

use std::sync::Arc;

use dashmap::DashMap;
use tagkit_types::{PrimitiveKind, TagDescriptor, TagError, TypeTag};

use crate::registry::MarkerRegistry;
use crate::signature::{Signature, TypeArg};

/// Recovers marker descriptors at a boundary.
///
/// `context` is the stable identity of the declaration being inspected (a
/// parameter name, a column path). Implementations may memoize by it.
pub trait ResolveTag {
    fn resolve(&self, context: &str, signature: &Signature) -> Result<TagDescriptor, TagError>;

    /// A descriptor the caller already holds is already resolved.
    fn resolve_explicit(&self, descriptor: TagDescriptor) -> TagDescriptor {
        descriptor
    }
}

/// How a tagged-shaped head fixes its arguments.
#[derive(Debug, Clone, Copy)]
enum Shape {
    /// `Tagged<V, T>`
    Generic,
    /// `TextTagged<T>` and friends.
    Fixed(PrimitiveKind),
}

impl Shape {
    fn of(head: &str) -> Option<Self> {
        match head {
            "Tagged" => Some(Self::Generic),
            "TextTagged" => Some(Self::Fixed(PrimitiveKind::Text)),
            "IntTagged" => Some(Self::Fixed(PrimitiveKind::Int32)),
            "LongTagged" => Some(Self::Fixed(PrimitiveKind::Int64)),
            "UuidTagged" => Some(Self::Fixed(PrimitiveKind::Uuid)),
            _ => None,
        }
    }

    const fn arity(self) -> usize {
        match self {
            Self::Generic => 2,
            Self::Fixed(_) => 1,
        }
    }
}

/// Memo key: the declaring context together with what it declared.
type CacheKey = (String, Signature);

/// Signature-inspecting resolver with a per-declaration memo.
///
/// The memo is keyed by context and signature, written at most once per key
/// and never evicted. Two contexts that happen to share a name but declare
/// different types never share an entry. Failures are not memoized.
#[derive(Debug)]
pub struct TagResolver {
    registry: MarkerRegistry,
    cache: Option<DashMap<CacheKey, TagDescriptor>>,
}

impl TagResolver {
    #[must_use]
    pub fn new(registry: MarkerRegistry) -> Self {
        Self {
            registry,
            cache: Some(DashMap::new()),
        }
    }

    #[must_use]
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(DashMap::new);
        self
    }

    #[must_use]
    pub fn registry(&self) -> &MarkerRegistry {
        &self.registry
    }

    /// Number of memoized declarations (always 0 with the cache disabled).
    #[must_use]
    pub fn cached_entries(&self) -> usize {
        self.cache.as_ref().map_or(0, DashMap::len)
    }

    /// Inspect `signature` without consulting or filling the memo.
    pub fn inspect(&self, context: &str, signature: &Signature) -> Result<TagDescriptor, TagError> {
        let head = signature.head();
        let Some(shape) = Shape::of(head) else {
            return Err(TagError::missing(
                context,
                format!("`{signature}` is not a tagged value type"),
            ));
        };

        let args = signature.args();
        if signature.is_raw() {
            return Err(TagError::missing(
                context,
                format!("raw `{head}` declares no marker argument"),
            ));
        }
        if args.len() != shape.arity() {
            return Err(TagError::missing(
                context,
                format!(
                    "`{head}` takes {} type argument(s), found {}",
                    shape.arity(),
                    args.len()
                ),
            ));
        }

        let (kind, marker) = match shape {
            Shape::Generic => (primitive_kind(context, &args[0])?, &args[1]),
            Shape::Fixed(kind) => (kind, &args[0]),
        };
        let tag = self.marker(context, marker)?;
        Ok(TagDescriptor::new(kind, tag))
    }

    fn marker(&self, context: &str, arg: &TypeArg) -> Result<TypeTag, TagError> {
        let signature = match arg {
            TypeArg::Wildcard => {
                return Err(TagError::missing(context, "marker argument is a wildcard"));
            }
            TypeArg::Type(signature) => signature,
        };
        if !signature.is_raw() {
            return Err(TagError::missing(
                context,
                format!("marker `{signature}` is not a plain type"),
            ));
        }
        self.registry.get(signature.path()).ok_or_else(|| {
            TagError::missing(
                context,
                format!("marker `{signature}` is not registered"),
            )
        })
    }
}

fn primitive_kind(context: &str, arg: &TypeArg) -> Result<PrimitiveKind, TagError> {
    let signature = match arg {
        TypeArg::Wildcard => {
            return Err(TagError::missing(context, "raw-value argument is a wildcard"));
        }
        TypeArg::Type(signature) => signature,
    };
    let kind = if signature.is_raw() {
        PrimitiveKind::from_type_name(signature.head())
    } else {
        None
    };
    kind.ok_or_else(|| TagError::mismatch("String, i32, i64 or Uuid", signature.to_string()))
}

impl ResolveTag for TagResolver {
    fn resolve(&self, context: &str, signature: &Signature) -> Result<TagDescriptor, TagError> {
        let Some(cache) = &self.cache else {
            return self.inspect(context, signature);
        };

        let key = (context.to_owned(), signature.clone());
        if let Some(hit) = cache.get(&key) {
            tracing::trace!("type tag cache hit for {context} ({signature}): {}", *hit);
            return Ok(*hit);
        }

        let descriptor = self.inspect(context, signature)?;
        tracing::debug!("resolved {context} ({signature}) to {descriptor}");
        Ok(*cache.entry(key).or_insert(descriptor))
    }
}

/// Resolver for hosts without signature information.
///
/// Every signature is refused; only explicit descriptors get through.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitOnly;

impl ResolveTag for ExplicitOnly {
    fn resolve(&self, context: &str, signature: &Signature) -> Result<TagDescriptor, TagError> {
        Err(TagError::missing(
            context,
            format!("cannot inspect `{signature}` here; pass an explicit descriptor"),
        ))
    }
}

impl<R: ResolveTag + ?Sized> ResolveTag for &R {
    fn resolve(&self, context: &str, signature: &Signature) -> Result<TagDescriptor, TagError> {
        (**self).resolve(context, signature)
    }
}

impl<R: ResolveTag + ?Sized> ResolveTag for Arc<R> {
    fn resolve(&self, context: &str, signature: &Signature) -> Result<TagDescriptor, TagError> {
        (**self).resolve(context, signature)
    }
}
