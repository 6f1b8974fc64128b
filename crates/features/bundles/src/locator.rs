//! Resolves a location spec to the concrete set of files backing a bundle.
//!
//! A spec is a comma-joined list of candidate absolute paths. Candidates that
//! exist as regular files are kept in input order. When none exist, the
//! locator falls back to listing the first candidate's parent directory,
//! keeping files that share the first candidate's extension.

use crate::error::BundleError;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// One physical file contributing to a bundle, snapshotted at request time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub modified: SystemTime,
}

impl SourceFile {
    fn from_path(path: &Path) -> Result<Option<Self>, BundleError> {
        let Ok(meta) = fs::metadata(path) else {
            return Ok(None);
        };
        if !meta.is_file() {
            return Ok(None);
        }
        let modified = meta.modified().map_err(|e| BundleError::io(path, e))?;
        Ok(Some(Self { path: path.to_path_buf(), modified }))
    }

    /// Lowercased file extension, empty when there is none.
    #[must_use]
    pub fn extension(&self) -> String {
        extension_of(&self.path)
    }
}

pub(crate) fn extension_of(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

/// Locates the ordered file set for `spec`.
///
/// # Errors
/// [`BundleError::NotFound`] when neither the explicit candidates nor the
/// directory fallback yield any file.
pub fn locate(spec: &str) -> Result<Vec<SourceFile>, BundleError> {
    let candidates: Vec<&str> =
        spec.split(',').map(str::trim).filter(|c| !c.is_empty()).collect();

    let mut files = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
        if let Some(file) = SourceFile::from_path(Path::new(candidate))? {
            files.push(file);
        }
    }
    if !files.is_empty() {
        return Ok(files);
    }

    let not_found = || BundleError::NotFound { spec: spec.to_owned() };

    // Glob fallback keyed off the first candidate's extension.
    let first = Path::new(candidates.first().ok_or_else(not_found)?);
    let ext = extension_of(first);
    let dir = first.parent().filter(|d| !d.as_os_str().is_empty()).ok_or_else(not_found)?;
    let entries = fs::read_dir(dir).map_err(|_| not_found())?;

    let mut fallback = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| BundleError::io(dir, e))?;
        let path = entry.path();
        if extension_of(&path) == ext
            && let Some(file) = SourceFile::from_path(&path)?
        {
            fallback.push(file);
        }
    }
    // read_dir order is platform-defined; sort for a stable bundle order.
    fallback.sort_by(|a, b| a.path.cmp(&b.path));

    if fallback.is_empty() { Err(not_found()) } else { Ok(fallback) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn keeps_existing_candidates_in_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.js");
        let b = dir.path().join("b.js");
        fs::write(&a, "a").unwrap();
        fs::write(&b, "b").unwrap();

        let spec = format!("{},{}", b.display(), a.display());
        let files = locate(&spec).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, b);
        assert_eq!(files[1].path, a);
    }

    #[test]
    fn skips_missing_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.js");
        fs::write(&a, "a").unwrap();

        let spec = format!("{},{}", dir.path().join("missing.js").display(), a.display());
        let files = locate(&spec).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, a);
    }

    #[test]
    fn falls_back_to_directory_listing_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("one.js"), "1").unwrap();
        fs::write(dir.path().join("two.js"), "2").unwrap();
        fs::write(dir.path().join("readme.txt"), "x").unwrap();

        let spec = dir.path().join("gone.js").display().to_string();
        let files = locate(&spec).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.extension() == "js"));
        assert!(files[0].path < files[1].path);
    }

    #[test]
    fn empty_fallback_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let spec = dir.path().join("gone.js").display().to_string();
        let err = locate(&spec).unwrap_err();
        assert!(matches!(err, BundleError::NotFound { .. }));
    }

    #[test]
    fn missing_directory_is_not_found() {
        let err = locate("/definitely/not/here/app.js").unwrap_err();
        assert!(matches!(err, BundleError::NotFound { .. }));
    }
}
