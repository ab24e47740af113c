//! Configuration for tagkit boundaries.
//!
//! ```toml
//! [resolver]
//! cache = true
//!
//! [bindings.parameters]
//! order_id = "LongTagged<Order>"
//! user_id = "TextTagged<User>"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tagkit_resolver::Signature;
use thiserror::Error;

/// Serde helper for fields that default to `true`.
#[must_use]
pub const fn default_true() -> bool {
    true
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Default, Deserialize)]
pub struct TagkitConfig {
    pub resolver: Option<ResolverConfig>,
    pub bindings: Option<BindingsConfig>,
}

#[derive(Debug, Deserialize)]
pub struct ResolverConfig {
    /// Memoize resolved descriptors per declaration.
    #[serde(default = "default_true")]
    pub cache: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { cache: true }
    }
}

/// Declared signatures of string-bound parameters, by parameter name.
#[derive(Debug, Default, Deserialize)]
pub struct BindingsConfig {
    #[serde(default)]
    pub parameters: BTreeMap<String, Signature>,
}

impl TagkitConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| {
            tracing::warn!("Failed to read config at {:?}: {}", path, source);
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        Self::from_toml_str(&content).inspect_err(|err| {
            tracing::warn!("Failed to parse config at {:?}: {}", path, err);
        })
    }

    #[must_use]
    pub fn cache_enabled(&self) -> bool {
        self.resolver.as_ref().is_none_or(|resolver| resolver.cache)
    }

    pub fn parameters(&self) -> impl Iterator<Item = (&str, &Signature)> {
        self.bindings
            .iter()
            .flat_map(|bindings| bindings.parameters.iter())
            .map(|(name, signature)| (name.as_str(), signature))
    }
}
