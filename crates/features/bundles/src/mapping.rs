//! The bundle key→location store.
//!
//! A TOML file of ordered `[[bundle]]` entries:
//!
//! ```toml
//! [[bundle]]
//! key = "en"
//! location = "/srv/static/scripts/app.js"
//! ```
//!
//! The file is re-read on every resolve so edits take effect without a
//! restart; it is never cached here. Lookup is case-insensitive and
//! first-match-wins in configured order.

use crate::error::BundleError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One configured logical bundle.
#[derive(Debug, Clone, Deserialize)]
pub struct BundleReference {
    pub key: String,
    pub location: String,
}

#[derive(Debug, Default, Deserialize)]
struct MappingFile {
    #[serde(default, rename = "bundle")]
    bundles: Vec<BundleReference>,
}

/// Read-only lookup over the mapping store at an injected path.
#[derive(Debug, Clone)]
pub struct BundleMapping {
    path: PathBuf,
}

impl BundleMapping {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The store's own path; doubles as the fixed invalidation dependency.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-reads the store and returns all entries in configured order.
    pub fn entries(&self) -> Result<Vec<BundleReference>, BundleError> {
        let raw =
            fs::read_to_string(&self.path).map_err(|e| BundleError::io(&self.path, e))?;
        let parsed: MappingFile = toml::from_str(&raw)
            .map_err(|source| BundleError::Mapping { path: self.path.clone(), source })?;
        Ok(parsed.bundles)
    }

    /// Case-insensitive lookup, first match wins.
    pub fn resolve(&self, key: &str) -> Result<Option<BundleReference>, BundleError> {
        Ok(self.entries()?.into_iter().find(|b| b.key.eq_ignore_ascii_case(key)))
    }
}
