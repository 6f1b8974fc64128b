//! Shared constants used across slices.

/// OpenAPI tag for system endpoints.
pub const SYSTEM_TAG: &str = "system";

/// Fallback bundle key when the request carries no caller discriminator.
pub const DEFAULT_BUNDLE_KEY: &str = "en";

/// Query parameter that identifies the calling application.
pub const SOURCE_PARAM: &str = "s";

/// Response header carrying the version-rewritten bundle path.
pub const FILE_VERSION_HEADER: &str = "fileversion";
