//! Bundle serving feature slice.
//!
//! Serves named JavaScript bundles with content-derived version tokens,
//! conditional-GET handling, and an mtime-invalidated process cache.
//!
//! ## Pipeline
//! `ResolveKey → LocateFiles → ComputeVersion → EvaluateConditional →
//! {ServeNotModified | ServeContent} → SetHeaders`
//!
//! ## Example
//! ```rust,no_run
//! use bhub_bundles::BundleService;
//!
//! let service = BundleService::builder()
//!     .mapping("/etc/bundlehub/bundles.toml")
//!     .default_key("en")
//!     .build();
//! let router = bhub_bundles::router(service);
//! ```

mod cache;
mod conditional;
mod error;
mod handler;
mod locator;
mod mapping;
mod tags;
mod version;

pub use cache::{BundleCache, CacheEntry, DependencySnapshot};
pub use conditional::{Decision, evaluate};
pub use error::BundleError;
pub use handler::{BundleResponse, BundleService, BundleServiceBuilder, ServeBody, router};
pub use locator::{SourceFile, locate};
pub use mapping::{BundleMapping, BundleReference};
pub use tags::ScriptTagCache;
pub use version::VersionTag;
