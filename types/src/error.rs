//! Failure taxonomy shared by every tagkit boundary.

use std::borrow::Cow;

use thiserror::Error;

use crate::primitive::PrimitiveKind;

/// A raw external representation could not be converted to a primitive kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse {raw:?} as {kind}: {reason}")]
pub struct ParseError {
    kind: PrimitiveKind,
    raw: String,
    reason: String,
}

impl ParseError {
    #[must_use]
    pub fn new(kind: PrimitiveKind, raw: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            kind,
            raw: raw.into(),
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// Errors surfaced by construction, resolution and comparison of tagged values.
///
/// None of these are recovered internally. A boundary adapter decides how to
/// present them (binding failure, query construction error, deserialization
/// error).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The declared context carries no concrete marker argument.
    #[error("missing type tag for {context}: {reason}")]
    MissingTypeTag {
        context: String,
        reason: Cow<'static, str>,
    },

    /// Two tags, or two primitive kinds, disagree.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: Cow<'static, str>,
        found: Cow<'static, str>,
    },
}

impl TagError {
    pub fn missing(context: impl Into<String>, reason: impl Into<Cow<'static, str>>) -> Self {
        Self::MissingTypeTag {
            context: context.into(),
            reason: reason.into(),
        }
    }

    pub fn mismatch(
        expected: impl Into<Cow<'static, str>>,
        found: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    #[must_use]
    pub fn is_missing_tag(&self) -> bool {
        matches!(self, Self::MissingTypeTag { .. })
    }

    #[must_use]
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }

    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}
