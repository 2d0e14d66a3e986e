// Error types module

use thiserror::Error;

use crate::config::ConfigError;
use crate::engine::ParamError;
use crate::security::SecurityError;

/// Centralized error type for the image core
///
/// Categorizes errors into the three failure classes callers handle
/// differently: configuration problems (fatal to construction), security
/// rejections (bad input, surfaced verbatim), and parameter validation
/// (aggregate of every violated rule). All errors are synchronous and
/// deterministic; nothing here is transient or retryable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapkitError {
    /// Missing or malformed CDN configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Path or URL failed security validation
    #[error(transparent)]
    Security(#[from] SecurityError),

    /// Image request parameters violated one or more rules
    #[error(transparent)]
    Params(#[from] ParamError),
}
