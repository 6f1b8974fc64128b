//! Facade crate for `BundleHub` features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `bhub` with the desired feature flags (`server`).
//! - Call `bhub::init` (server) to construct the bundle service from config.

pub use bhub_domain as domain;
pub use bhub_kernel as kernel;

#[cfg(feature = "server")]
pub use bhub_bundles as bundles;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        pub use bhub_kernel::server::router::system_router;
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "server")]
        "server",
        #[cfg(feature = "server")]
        "bundles",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Initialize all enabled features for server mode.
#[cfg(feature = "server")]
#[must_use]
pub fn init(config: &domain::config::ApiConfig) -> bundles::BundleService {
    bundles::BundleService::from_config(&config.bundles)
}
