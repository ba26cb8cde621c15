//! Error types for webotron
//!
//! Errors are grouped by what the caller can do about them, and each
//! group maps onto a process exit code.

use thiserror::Error;

/// Result alias used across the webotron crates
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by webotron operations
#[derive(Debug, Error)]
pub enum Error {
    /// Local filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport or unclassified provider failure
    #[error("Network error: {0}")]
    Network(String),

    /// Credentials missing, invalid, or not permitted
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Bucket or object does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bucket creation was refused because the caller already owns the bucket
    #[error("Bucket already owned by you: {0}")]
    BucketAlreadyOwned(String),

    /// Resource exists and belongs to someone else
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Local path does not exist or cannot be used as a sync root
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Configuration file or option is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    General(String),
}

impl Error {
    /// Exit code the CLI should terminate with for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::General(_) | Error::Io(_) => 1,
            Error::InvalidPath(_) | Error::Config(_) => 2,
            Error::Network(_) => 3,
            Error::Auth(_) => 4,
            Error::NotFound(_) => 5,
            Error::Conflict(_) | Error::BucketAlreadyOwned(_) => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::General("x".into()).exit_code(), 1);
        assert_eq!(Error::InvalidPath("x".into()).exit_code(), 2);
        assert_eq!(Error::Network("x".into()).exit_code(), 3);
        assert_eq!(Error::Auth("x".into()).exit_code(), 4);
        assert_eq!(Error::NotFound("x".into()).exit_code(), 5);
        assert_eq!(Error::Conflict("x".into()).exit_code(), 6);
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("denied"));
    }
}
