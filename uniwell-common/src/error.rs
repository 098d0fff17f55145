//! Common error types for UniWell

use thiserror::Error;

/// Common result type for UniWell operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across UniWell services
///
/// The upstream variants carry the remote status and body verbatim so the
/// API layer can pass them through to the caller unmodified.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Identity provider rejected a grant (exchange or refresh)
    #[error("Identity provider returned {status}: {body}")]
    UpstreamAuth { status: u16, body: String },

    /// An upstream call exceeded its time bound
    #[error("Upstream timeout: {0}")]
    UpstreamTimeout(String),

    /// Upstream service reachable but returned an error
    #[error("Upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
