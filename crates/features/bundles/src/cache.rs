//! Process-wide bundle content cache with mtime-snapshot invalidation.
//!
//! Entries live for the process lifetime; there is no size- or time-based
//! eviction policy beyond the capacity bound. Before a hit is returned, the
//! recorded dependency paths are stat'd and compared against the stored
//! snapshot; any difference (including a vanished file) drops the entry and
//! recomputes. Concurrent recomputation for the same key is tolerated: the
//! output is deterministic for a given filesystem state, so the last writer
//! wins.

use crate::error::BundleError;
use crate::locator::SourceFile;
use moka::sync::Cache;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, trace};

/// Modification times of a set of dependency paths at one point in time.
///
/// `None` records a path that could not be stat'd; a later successful stat
/// (or vice versa) counts as a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySnapshot(Vec<(PathBuf, Option<SystemTime>)>);

impl DependencySnapshot {
    pub fn capture<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Self {
        Self(
            paths
                .into_iter()
                .map(|p| (p.to_path_buf(), fs::metadata(p).and_then(|m| m.modified()).ok()))
                .collect(),
        )
    }

    /// Re-stats every recorded path and compares against the snapshot.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.0
            .iter()
            .all(|(path, recorded)| fs::metadata(path).and_then(|m| m.modified()).ok() == *recorded)
    }

    /// The recorded dependency paths.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.0.iter().map(|(p, _)| p.as_path())
    }
}

/// A cached, fully assembled bundle body plus its invalidation snapshot.
#[derive(Debug)]
pub struct CacheEntry {
    pub content: String,
    snapshot: DependencySnapshot,
}

impl CacheEntry {
    #[must_use]
    pub fn snapshot(&self) -> &DependencySnapshot {
        &self.snapshot
    }
}

/// Constructor-injected content cache, one entry per distinct bundle key.
#[derive(Debug, Clone)]
pub struct BundleCache {
    inner: Cache<String, Arc<CacheEntry>>,
}

impl BundleCache {
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self { inner: Cache::builder().max_capacity(max_capacity).build() }
    }

    /// Returns the cached content for `key`, recomputing when absent or when
    /// any dependency's modification time no longer matches the snapshot.
    ///
    /// Content is the concatenation of every located file whose extension
    /// matches `content_ext`, each followed by a newline. Files with other
    /// extensions stay out of the body but are tracked as dependencies.
    pub fn get_or_compute(
        &self,
        key: &str,
        files: &[SourceFile],
        content_ext: &str,
    ) -> Result<Arc<CacheEntry>, BundleError> {
        if let Some(entry) = self.inner.get(key) {
            if entry.snapshot.is_current() {
                trace!(key, "Bundle cache hit");
                return Ok(entry);
            }
            debug!(key, "Bundle dependencies changed, invalidating cache entry");
            self.inner.invalidate(key);
        }

        let content = assemble(files, content_ext)?;
        let snapshot = DependencySnapshot::capture(files.iter().map(|f| f.path.as_path()));
        let entry = Arc::new(CacheEntry { content, snapshot });
        self.inner.insert(key.to_owned(), Arc::clone(&entry));
        debug!(key, bytes = entry.content.len(), "Bundle cache entry stored");
        Ok(entry)
    }

    /// Number of live entries (diagnostics only).
    #[must_use]
    pub fn len(&self) -> u64 {
        self.inner.entry_count()
    }
}

fn assemble(files: &[SourceFile], content_ext: &str) -> Result<String, BundleError> {
    let mut body = String::with_capacity(1024);
    for file in files {
        if file.extension() != content_ext {
            continue;
        }
        let text =
            fs::read_to_string(&file.path).map_err(|e| BundleError::io(&file.path, e))?;
        body.push_str(&text);
        body.push('\n');
    }
    Ok(body)
}
