//! Conditional GET evaluation against the current version timestamp.

use chrono::{DateTime, Utc};
use tracing::debug;

/// Outcome of evaluating a client's `If-Modified-Since` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The client copy is current; respond 304 with an empty body.
    NotModified,
    /// Serve the full content.
    MustServe,
}

/// Compares the client-supplied HTTP date against `current`.
///
/// Absent or unparseable headers always yield [`Decision::MustServe`]; a
/// malformed header must never fail the request. Both sides are compared at
/// whole-second resolution in UTC.
#[must_use]
pub fn evaluate(header: Option<&str>, current: DateTime<Utc>) -> Decision {
    let Some(raw) = header.map(str::trim).filter(|h| !h.is_empty()) else {
        return Decision::MustServe;
    };

    match DateTime::parse_from_rfc2822(raw) {
        Ok(client) if client.with_timezone(&Utc).timestamp() == current.timestamp() => {
            Decision::NotModified
        },
        Ok(_) => Decision::MustServe,
        Err(error) => {
            debug!(header = raw, %error, "Ignoring malformed If-Modified-Since header");
            Decision::MustServe
        },
    }
}
