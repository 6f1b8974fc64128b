//! Convenience re-exports for downstream crates.

pub use crate::config::load_config;
pub use bhub_domain::config::ApiConfig;
pub use bhub_domain::constants::*;

#[cfg(feature = "server")]
pub use crate::server::{ApiState, ApiStateError};
