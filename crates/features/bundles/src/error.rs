use std::path::PathBuf;

/// A specialized [`BundleError`] enum of this crate.
///
/// `UnknownKey` is expected traffic and is never logged as an error; the
/// remaining variants are fatal for the request that hit them.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// The requested bundle key has no configuration entry.
    #[error("no bundle configured for key '{0}'")]
    UnknownKey(String),

    /// No source files resolve for a known key, even via the directory fallback.
    #[error("no source files resolve for '{spec}'")]
    NotFound { spec: String },

    /// The bundle mapping store could not be parsed.
    #[error("malformed bundle mapping {}: {source}", path.display())]
    Mapping { path: PathBuf, source: toml::de::Error },

    /// Filesystem failure while reading or inspecting a source file.
    #[error("filesystem error at {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
}

impl BundleError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
