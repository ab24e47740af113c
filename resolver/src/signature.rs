//! Declared type signatures, as written at a boundary.
//!
//! A signature is the textual form of a declared type, e.g.
//! `LongTagged<Order>` or `tagkit_types::Tagged<String, User>`. Arguments may
//! be `_` or `?` when the declaration leaves them open.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tagkit_types::{Marker, Primitive};
use thiserror::Error;

/// Deepest type-argument nesting a signature may have.
const MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid signature {input:?} at byte {position}: {reason}")]
pub struct SignatureError {
    input: String,
    position: usize,
    reason: &'static str,
}

impl SignatureError {
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }
}

/// A type argument: either a concrete type or an explicit wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeArg {
    Wildcard,
    Type(Signature),
}

impl fmt::Display for TypeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wildcard => f.write_str("_"),
            Self::Type(signature) => fmt::Display::fmt(signature, f),
        }
    }
}

/// A parsed declared type: a path plus optional type arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Signature {
    path: String,
    args: Vec<TypeArg>,
}

impl Signature {
    pub fn parse(input: &str) -> Result<Self, SignatureError> {
        let mut parser = Parser {
            input,
            pos: 0,
            depth: 0,
        };
        let signature = parser.signature()?;
        parser.skip_whitespace();
        if parser.pos != input.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(signature)
    }

    /// Signature of `Tagged<P, T>`, as the type checker sees it.
    #[must_use]
    pub fn of<P: Primitive, T: Marker>() -> Self {
        Self {
            path: "Tagged".to_owned(),
            args: vec![
                TypeArg::Type(Self::bare(P::KIND.type_name())),
                TypeArg::Type(Self::bare(T::name())),
            ],
        }
    }

    fn bare(path: &str) -> Self {
        Self {
            path: path.to_owned(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last segment of the path, which is what shape matching looks at.
    #[must_use]
    pub fn head(&self) -> &str {
        self.path.rsplit("::").next().unwrap_or(&self.path)
    }

    #[must_use]
    pub fn args(&self) -> &[TypeArg] {
        &self.args
    }

    /// True when no type arguments were written at all.
    #[must_use]
    pub fn is_raw(&self) -> bool {
        self.args.is_empty()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if let Some((first, rest)) = self.args.split_first() {
            write!(f, "<{first}")?;
            for arg in rest {
                write!(f, ", {arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl FromStr for Signature {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Signature {
    type Error = SignatureError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Signature> for String {
    fn from(value: Signature) -> Self {
        value.to_string()
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn error(&self, reason: &'static str) -> SignatureError {
        SignatureError {
            input: self.input.to_owned(),
            position: self.pos,
            reason,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek()
            && ch.is_whitespace()
        {
            self.pos += ch.len_utf8();
        }
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.input[self.pos..].starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Result<&str, SignatureError> {
        let start = self.pos;
        match self.peek() {
            Some(ch) if ch.is_alphabetic() || ch == '_' => self.pos += ch.len_utf8(),
            _ => return Err(self.error("expected an identifier")),
        }
        while let Some(ch) = self.peek()
            && (ch.is_alphanumeric() || ch == '_')
        {
            self.pos += ch.len_utf8();
        }
        Ok(&self.input[start..self.pos])
    }

    fn path(&mut self) -> Result<String, SignatureError> {
        self.skip_whitespace();
        let mut path = self.ident()?.to_owned();
        while self.eat("::") {
            path.push_str("::");
            path.push_str(self.ident()?);
        }
        Ok(path)
    }

    fn signature(&mut self) -> Result<Signature, SignatureError> {
        let path = self.path()?;
        if path == "_" {
            return Err(self.error("wildcard is only allowed as a type argument"));
        }
        self.skip_whitespace();
        let mut args = Vec::new();
        if self.eat("<") {
            if self.depth == MAX_DEPTH {
                return Err(self.error("signature nested too deeply"));
            }
            self.depth += 1;
            loop {
                args.push(self.arg()?);
                self.skip_whitespace();
                if self.eat(",") {
                    continue;
                }
                if self.eat(">") {
                    break;
                }
                return Err(self.error("expected `,` or `>`"));
            }
            self.depth -= 1;
        }
        Ok(Signature { path, args })
    }

    fn arg(&mut self) -> Result<TypeArg, SignatureError> {
        self.skip_whitespace();
        if self.eat("?") {
            return Ok(TypeArg::Wildcard);
        }
        let start = self.pos;
        if self.eat("_") && !self.peek().is_some_and(|ch| ch.is_alphanumeric() || ch == '_') {
            return Ok(TypeArg::Wildcard);
        }
        self.pos = start;
        if matches!(self.peek(), Some(',' | '>') | None) {
            return Err(self.error("expected a type argument"));
        }
        self.signature().map(TypeArg::Type)
    }
}

#[cfg(test)]
mod tests {
    use tagkit_types::define_markers;

    use super::{MAX_DEPTH, Signature, TypeArg};

    define_markers! {
        Order;
    }

    #[test]
    fn parses_generic_form() {
        let sig = Signature::parse("Tagged<i64, Order>").unwrap();
        assert_eq!(sig.head(), "Tagged");
        assert_eq!(sig.args().len(), 2);
        assert_eq!(sig.to_string(), "Tagged<i64, Order>");
    }

    #[test]
    fn parses_qualified_paths() {
        let sig = Signature::parse("tagkit_types::LongTagged< app::Order >").unwrap();
        assert_eq!(sig.path(), "tagkit_types::LongTagged");
        assert_eq!(sig.head(), "LongTagged");
        assert_eq!(sig.to_string(), "tagkit_types::LongTagged<app::Order>");
    }

    #[test]
    fn parses_wildcards() {
        let sig = Signature::parse("Tagged<_, ?>").unwrap();
        assert_eq!(sig.args(), &[TypeArg::Wildcard, TypeArg::Wildcard]);
        assert_eq!(sig.to_string(), "Tagged<_, _>");
    }

    #[test]
    fn underscore_prefixed_ident_is_not_a_wildcard() {
        let sig = Signature::parse("TextTagged<_Internal>").unwrap();
        assert!(matches!(&sig.args()[0], TypeArg::Type(inner) if inner.path() == "_Internal"));
    }

    #[test]
    fn raw_signature_has_no_args() {
        let sig = Signature::parse("Tagged").unwrap();
        assert!(sig.is_raw());
    }

    #[test]
    fn nested_arguments() {
        let sig = Signature::parse("Option<UuidTagged<Order>>").unwrap();
        assert_eq!(sig.head(), "Option");
        assert_eq!(sig.to_string(), "Option<UuidTagged<Order>>");
    }

    #[test]
    fn rejects_malformed_input() {
        for input in ["", "<i64>", "Tagged<", "Tagged<>", "Tagged<i64,>", "Tagged<i64> x", "_"] {
            assert!(Signature::parse(input).is_err(), "{input:?} should not parse");
        }
        let err = Signature::parse("Tagged<i64 Order>").unwrap_err();
        assert_eq!(err.position(), 11);
    }

    #[test]
    fn nesting_is_bounded() {
        let nested = |depth: usize| format!("{}X{}", "A<".repeat(depth), ">".repeat(depth));

        assert!(Signature::parse(&nested(MAX_DEPTH)).is_ok());
        let err = Signature::parse(&nested(MAX_DEPTH + 1)).unwrap_err();
        assert_eq!(err.position(), 2 * (MAX_DEPTH + 1));
        assert!(Signature::parse(&nested(200_000)).is_err());
    }

    #[test]
    fn signature_of_concrete_type() {
        let sig = Signature::of::<i64, Order>();
        assert_eq!(sig, Signature::parse("Tagged<i64, Order>").unwrap());
    }

    #[test]
    fn serde_uses_text_form() {
        let sig: Signature = serde_json::from_str("\"UuidTagged<Order>\"").unwrap();
        assert_eq!(serde_json::to_string(&sig).unwrap(), "\"UuidTagged<Order>\"");
        assert!(serde_json::from_str::<Signature>("\"Tagged<\"").is_err());
    }
}
