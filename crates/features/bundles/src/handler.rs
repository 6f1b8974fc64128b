//! The request-serving pipeline: key resolution, file location, version
//! computation, conditional short-circuit, cache, headers.

use crate::cache::{BundleCache, CacheEntry};
use crate::conditional::{self, Decision};
use crate::error::BundleError;
use crate::locator::{self, extension_of};
use crate::mapping::BundleMapping;
use crate::tags::ScriptTagCache;
use crate::version::{self, VersionTag};
use axum::Router;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderName, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use bhub_domain::config::BundlesConfig;
use bhub_domain::constants::{DEFAULT_BUNDLE_KEY, FILE_VERSION_HEADER};
use chrono::{Days, Utc};
use serde::Deserialize;
use std::ops::Deref;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Fixed extension→MIME table for served bundle types.
const MIME_TYPES: &[(&str, &str)] = &[("js", "application/javascript")];
const FALLBACK_MIME: &str = "application/octet-stream";
/// Shared + private cacheable, immutable until the version token changes.
const CACHE_POLICY: &str = "public, max-age=31536000";

fn mime_for(extension: &str) -> Option<&'static str> {
    MIME_TYPES.iter().find(|(ext, _)| *ext == extension).map(|(_, mime)| *mime)
}

/// Body decision for one request.
#[derive(Debug)]
pub enum ServeBody {
    /// Serve the assembled bundle.
    Content(Arc<CacheEntry>),
    /// The client copy is current; serve 304 with an empty body.
    NotModified,
}

/// Everything the transport layer needs to write the response.
#[derive(Debug)]
pub struct BundleResponse {
    pub body: ServeBody,
    pub content_type: &'static str,
    pub version: VersionTag,
    pub versioned_path: String,
}

#[derive(Debug)]
pub struct BundleServiceInner {
    mapping: BundleMapping,
    cache: BundleCache,
    tags: ScriptTagCache,
    default_key: String,
}

/// Orchestrates bundle serving; cheap to clone, state lives behind an [`Arc`].
///
/// Holds no per-request state: each call re-reads the mapping store and
/// snapshots the file set, per the freshness contract.
#[derive(Debug, Clone)]
pub struct BundleService {
    inner: Arc<BundleServiceInner>,
}

impl Deref for BundleService {
    type Target = BundleServiceInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl BundleService {
    #[must_use]
    pub fn builder() -> BundleServiceBuilder {
        BundleServiceBuilder::default()
    }

    /// Convenience constructor from the domain config section.
    #[must_use]
    pub fn from_config(cfg: &BundlesConfig) -> Self {
        Self::builder()
            .mapping(cfg.mapping.clone())
            .static_dir(cfg.static_dir.clone())
            .default_key(cfg.default_key.clone())
            .cache_capacity(cfg.cache_capacity)
            .build()
    }

    /// Runs the full pipeline for one request.
    ///
    /// `request_path` only contributes its extension (MIME selection); any
    /// `v_<stamp>/` segment in it is cosmetic and does not gate resolution,
    /// which is keyed by `source`.
    ///
    /// # Errors
    /// * [`BundleError::UnknownKey`] when the key has no mapping entry.
    /// * [`BundleError::NotFound`] when no source files resolve.
    /// * [`BundleError::Io`] / [`BundleError::Mapping`] on filesystem or
    ///   store failures. No partial content is ever produced.
    pub fn serve(
        &self,
        request_path: &str,
        source: Option<&str>,
        if_modified_since: Option<&str>,
    ) -> Result<BundleResponse, BundleError> {
        // ResolveKey
        let key = source.map(str::trim).filter(|s| !s.is_empty()).unwrap_or(&self.default_key);
        let reference = self
            .mapping
            .resolve(key)?
            .ok_or_else(|| BundleError::UnknownKey(key.to_owned()))?;

        // LocateFiles: the mapping store rides along as a dependency trigger.
        let spec = format!("{},{}", reference.location, self.mapping.path().display());
        let files = locator::locate(&spec)?;

        // ComputeVersion
        let version = VersionTag::compute(&files);
        let versioned_path = version.rewrite_path(&reference.location);

        let content_ext = {
            let ext = extension_of(&reference.location);
            if ext.is_empty() { "js".to_owned() } else { ext }
        };
        let request_ext = extension_of(request_path);
        let content_type =
            mime_for(&request_ext).or_else(|| mime_for(&content_ext)).unwrap_or(FALLBACK_MIME);

        // EvaluateConditional: always before any cache read or write.
        let body = match conditional::evaluate(if_modified_since, version.timestamp()) {
            Decision::NotModified => ServeBody::NotModified,
            Decision::MustServe => {
                let entry =
                    self.cache.get_or_compute(&key.to_ascii_lowercase(), &files, &content_ext)?;
                ServeBody::Content(entry)
            },
        };

        Ok(BundleResponse { body, content_type, version, versioned_path })
    }

    /// Renders a versioned `<script>` tag for a site-relative path.
    pub fn script_tag(&self, relative: &str) -> Result<String, BundleError> {
        self.tags.tag_for(relative)
    }
}

/// A fluent builder for configuring the [`BundleService`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct BundleServiceBuilder {
    mapping: Option<PathBuf>,
    static_dir: Option<PathBuf>,
    default_key: Option<String>,
    cache_capacity: Option<u64>,
}

impl BundleServiceBuilder {
    /// Path of the key→location mapping store.
    pub fn mapping(mut self, path: impl Into<PathBuf>) -> Self {
        self.mapping = Some(path.into());
        self
    }

    /// Root directory for site-relative paths used by the script-tag helper.
    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    /// Fallback key when a request carries no caller discriminator.
    pub fn default_key(mut self, key: impl Into<String>) -> Self {
        self.default_key = Some(key.into());
        self
    }

    pub const fn cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    pub fn build(self) -> BundleService {
        let mapping = BundleMapping::new(self.mapping.unwrap_or_else(|| "bundles.toml".into()));
        let static_dir = self.static_dir.unwrap_or_else(|| "public".into());
        let default_key = self
            .default_key
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BUNDLE_KEY.to_owned());
        let capacity = self.cache_capacity.unwrap_or(64).max(1);

        info!(
            mapping = %mapping.path().display(),
            %default_key,
            "Bundle service initialized"
        );

        BundleService {
            inner: Arc::new(BundleServiceInner {
                tags: ScriptTagCache::new(static_dir, mapping.path().to_path_buf(), capacity),
                cache: BundleCache::new(capacity),
                mapping,
                default_key,
            }),
        }
    }
}

// --- Axum glue ---

#[derive(Debug, Deserialize)]
struct BundleQuery {
    s: Option<String>,
}

/// Routes for the bundle slice, self-contained with their own state.
pub fn router(service: BundleService) -> Router {
    Router::new().route("/bundles/{*path}", get(serve_bundle)).with_state(service)
}

async fn serve_bundle(
    State(service): State<BundleService>,
    Path(path): Path<String>,
    Query(query): Query<BundleQuery>,
    headers: HeaderMap,
) -> Result<Response, BundleError> {
    let if_modified_since =
        headers.get(header::IF_MODIFIED_SINCE).and_then(|v| v.to_str().ok());

    let outcome = service.serve(&path, query.s.as_deref(), if_modified_since)?;

    // SetHeaders runs on both branches; only the body differs.
    let response_headers = [
        (header::CONTENT_TYPE, outcome.content_type.to_owned()),
        (header::LAST_MODIFIED, outcome.version.http_date()),
        (header::CACHE_CONTROL, CACHE_POLICY.to_owned()),
        (header::EXPIRES, version::http_date(far_future_expiry())),
        (HeaderName::from_static(FILE_VERSION_HEADER), outcome.versioned_path),
    ];

    let response = match outcome.body {
        ServeBody::Content(entry) => {
            (StatusCode::OK, response_headers, Body::from(entry.content.clone())).into_response()
        },
        ServeBody::NotModified => {
            (StatusCode::NOT_MODIFIED, response_headers, Body::empty()).into_response()
        },
    };
    Ok(response)
}

fn far_future_expiry() -> chrono::DateTime<Utc> {
    Utc::now().checked_add_days(Days::new(365)).unwrap_or_else(Utc::now)
}

impl IntoResponse for BundleError {
    fn into_response(self) -> Response {
        match self {
            // Expected traffic: defer to the host default, write nothing.
            Self::UnknownKey(key) => {
                debug!(key, "Request for unconfigured bundle key");
                StatusCode::NOT_FOUND.into_response()
            },
            err => {
                error!(error = %err, "Bundle request failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_table_covers_js() {
        assert_eq!(mime_for("js"), Some("application/javascript"));
        assert_eq!(mime_for("css"), None);
    }

    #[test]
    fn builder_defaults_are_applied() {
        let service = BundleService::builder().build();
        assert_eq!(service.default_key, "en");
        assert_eq!(service.mapping.path(), std::path::Path::new("bundles.toml"));
    }

    #[test]
    fn blank_default_key_falls_back_to_constant() {
        let service = BundleService::builder().default_key("  ").build();
        assert_eq!(service.default_key, "en");
    }
}
