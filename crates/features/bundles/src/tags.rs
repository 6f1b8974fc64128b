//! Versioned `<script>` tag helper for templates.
//!
//! The version token is memoized per relative path for the process lifetime,
//! with the physical file and the mapping store as invalidation
//! dependencies, so templates never stat the filesystem on a warm path.

use crate::cache::DependencySnapshot;
use crate::error::BundleError;
use crate::version::VersionTag;
use moka::sync::Cache;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
struct TagEntry {
    token: String,
    snapshot: DependencySnapshot,
}

/// Process-wide memo of version tokens keyed by site-relative path.
#[derive(Debug, Clone)]
pub struct ScriptTagCache {
    inner: Cache<String, Arc<TagEntry>>,
    static_dir: PathBuf,
    mapping_path: PathBuf,
}

impl ScriptTagCache {
    #[must_use]
    pub fn new(static_dir: PathBuf, mapping_path: PathBuf, capacity: u64) -> Self {
        Self { inner: Cache::builder().max_capacity(capacity).build(), static_dir, mapping_path }
    }

    /// Renders `<script type='text/javascript' src='<relative>?v=<token>'></script>`,
    /// using `&v=` when the path already carries a query string.
    ///
    /// # Errors
    /// [`BundleError::Io`] when the referenced file cannot be stat'd.
    pub fn tag_for(&self, relative: &str) -> Result<String, BundleError> {
        let file_part = relative.split('?').next().unwrap_or(relative);
        let token = self.token_for(file_part)?;
        let separator = if relative.contains('?') { '&' } else { '?' };
        Ok(format!(
            "<script type='text/javascript' src='{relative}{separator}v={token}'></script>"
        ))
    }

    fn token_for(&self, file_part: &str) -> Result<String, BundleError> {
        if let Some(entry) = self.inner.get(file_part) {
            if entry.snapshot.is_current() {
                return Ok(entry.token.clone());
            }
            debug!(path = file_part, "Script tag dependencies changed, recomputing token");
            self.inner.invalidate(file_part);
        }

        let physical = self.physical_path(file_part);
        let modified = fs::metadata(&physical)
            .and_then(|m| m.modified())
            .map_err(|e| BundleError::io(&physical, e))?;
        let token = VersionTag::from_system_time(modified).stamp().to_owned();
        let snapshot = DependencySnapshot::capture(
            [physical.as_path(), self.mapping_path.as_path()],
        );

        self.inner
            .insert(file_part.to_owned(), Arc::new(TagEntry { token: token.clone(), snapshot }));
        Ok(token)
    }

    fn physical_path(&self, file_part: &str) -> PathBuf {
        let trimmed = file_part.trim_start_matches(['/', '~']);
        self.static_dir.join(Path::new(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::{Duration, UNIX_EPOCH};

    fn fixture() -> (tempfile::TempDir, ScriptTagCache) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("scripts")).unwrap();
        let script = dir.path().join("scripts/app.js");
        fs::write(&script, "alert(1);").unwrap();
        File::options()
            .write(true)
            .open(&script)
            .unwrap()
            .set_modified(UNIX_EPOCH + Duration::from_secs(1_704_103_200))
            .unwrap();

        let mapping = dir.path().join("bundles.toml");
        fs::write(&mapping, "").unwrap();
        let cache = ScriptTagCache::new(dir.path().to_path_buf(), mapping, 16);
        (dir, cache)
    }

    #[test]
    fn renders_tag_with_query_separator() {
        let (_dir, cache) = fixture();
        let tag = cache.tag_for("/scripts/app.js").unwrap();
        assert_eq!(
            tag,
            "<script type='text/javascript' src='/scripts/app.js?v=20240101100000'></script>"
        );

        let tag = cache.tag_for("/scripts/app.js?lang=en").unwrap();
        assert!(tag.contains("src='/scripts/app.js?lang=en&v=20240101100000'"));
    }

    #[test]
    fn token_is_memoized_until_file_changes() {
        let (dir, cache) = fixture();
        let first = cache.tag_for("/scripts/app.js").unwrap();
        assert_eq!(cache.tag_for("/scripts/app.js").unwrap(), first);

        let script = dir.path().join("scripts/app.js");
        File::options()
            .write(true)
            .open(&script)
            .unwrap()
            .set_modified(UNIX_EPOCH + Duration::from_secs(1_704_103_500))
            .unwrap();

        let second = cache.tag_for("/scripts/app.js").unwrap();
        assert_ne!(second, first);
        assert!(second.contains("v=20240101100500"));
    }

    #[test]
    fn mapping_store_change_invalidates_token() {
        let (dir, cache) = fixture();
        let first = cache.tag_for("/scripts/app.js").unwrap();

        let mapping = dir.path().join("bundles.toml");
        fs::write(&mapping, "# changed").unwrap();
        File::options()
            .write(true)
            .open(&mapping)
            .unwrap()
            .set_modified(UNIX_EPOCH + Duration::from_secs(1_704_200_000))
            .unwrap();

        // Token value is unchanged (same file mtime) but it was recomputed,
        // not served from a stale memo.
        assert_eq!(cache.tag_for("/scripts/app.js").unwrap(), first);
        cache.inner.run_pending_tasks();
        assert_eq!(cache.inner.entry_count(), 1);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let (_dir, cache) = fixture();
        let err = cache.tag_for("/scripts/missing.js").unwrap_err();
        assert!(matches!(err, BundleError::Io { .. }));
    }
}
