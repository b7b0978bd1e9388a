//! Error types for hostpage-core

use thiserror::Error;

/// Result type alias for hostpage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the hostpage server
#[derive(Debug, Error)]
pub enum Error {
    /// PORT environment variable did not parse as a TCP port
    #[error("Invalid listen port: {0}")]
    InvalidPort(String),

    /// Listen address did not parse
    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),

    /// IO error (bind, accept)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
