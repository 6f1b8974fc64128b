//! Cache-busting version tags derived from file modification times.

use crate::locator::SourceFile;
use chrono::{DateTime, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

const STAMP_FORMAT: &str = "%Y%m%d%H%M%S";
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Version token for a file set: the maximum modification time across the
/// set, truncated to whole seconds and normalized to UTC.
///
/// Two file sets with identical mtimes yield an identical tag; any mtime
/// advance changes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTag {
    timestamp: DateTime<Utc>,
    formatted: String,
}

impl VersionTag {
    /// Derives the tag for a located file set.
    #[must_use]
    pub fn compute(files: &[SourceFile]) -> Self {
        let latest = files.iter().map(|f| f.modified).max().unwrap_or(UNIX_EPOCH);
        Self::from_system_time(latest)
    }

    #[must_use]
    pub fn from_system_time(time: SystemTime) -> Self {
        let exact = DateTime::<Utc>::from(time);
        // Whole-second resolution, to match the precision of If-Modified-Since.
        let timestamp = DateTime::from_timestamp(exact.timestamp(), 0).unwrap_or_default();
        let formatted = timestamp.format(STAMP_FORMAT).to_string();
        Self { timestamp, formatted }
    }

    /// The second-truncated UTC timestamp this tag was derived from.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// The fixed-width `YYYYMMDDHHMMSS` rendering.
    #[must_use]
    pub fn stamp(&self) -> &str {
        &self.formatted
    }

    /// RFC 1123 rendering for the `Last-Modified` header.
    #[must_use]
    pub fn http_date(&self) -> String {
        http_date(self.timestamp)
    }

    /// Rewrites `location` with a `v_<stamp>/` segment inserted immediately
    /// after the last path separator.
    #[must_use]
    pub fn rewrite_path(&self, location: &str) -> String {
        let at = location.rfind('/').map_or(0, |i| i + 1);
        format!("{}v_{}/{}", &location[..at], self.formatted, &location[at..])
    }
}

/// Formats a UTC timestamp as an HTTP date.
#[must_use]
pub fn http_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format(HTTP_DATE_FORMAT).to_string()
}
