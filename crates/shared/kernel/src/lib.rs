//! Kernel utilities shared across slices.
//! Keep this crate lightweight; it re-exports ergonomic helpers for config
//! loading and the server-side application state.
//!
//! ## Config loading
//! ```rust,ignore
//! use bhub_kernel::config::load_config;
//! let cfg: ApiConfig = load_config(Some("server")).unwrap();
//! ```

pub mod config;
pub mod prelude;
#[cfg(feature = "server")]
pub mod server;

pub use bhub_domain as domain;
