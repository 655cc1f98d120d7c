use super::error::StreamError;

/// Type alias for Result with anyhow::Error as the error type.
/// Used by the configuration and CLI layers.
pub type Result<T> = std::result::Result<T, anyhow::Error>;

/// Result of a stream operation, keeping the typed error so callers
/// can branch on its severity.
pub type StreamResult<T> = std::result::Result<T, StreamError>;
