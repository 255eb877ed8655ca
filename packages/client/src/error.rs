//! Error types for the welcome notifier.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The page location cannot be turned into an endpoint
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    /// The runtime could not be driven (signal handling, task join)
    #[error("Runtime error: {0}")]
    Runtime(String),
}
