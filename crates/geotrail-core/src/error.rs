//! Error types for geotrail.

use thiserror::Error;

/// Result type alias using geotrail's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for geotrail operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource absent or not owned by the caller. The two cases are
    /// intentionally indistinguishable so existence of other users' data
    /// never leaks.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate username/email or repeated device registration
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Malformed or out-of-range input, missing required fields,
    /// ceiling violations
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Bad credentials or invalid/expired token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("Track not found".to_string());
        assert_eq!(err.to_string(), "Not found: Track not found");
    }

    #[test]
    fn test_error_display_conflict() {
        let err = Error::Conflict("Username already taken".to_string());
        assert_eq!(err.to_string(), "Conflict: Username already taken");
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("latitude out of range".to_string());
        assert_eq!(err.to_string(), "Invalid input: latitude out of range");
    }

    #[test]
    fn test_error_display_unauthorized() {
        let err = Error::Unauthorized("Incorrect username or password".to_string());
        assert_eq!(
            err.to_string(),
            "Unauthorized: Incorrect username or password"
        );
    }

    #[test]
    fn test_error_display_internal() {
        let err = Error::Internal("unexpected state".to_string());
        assert_eq!(err.to_string(), "Internal error: unexpected state");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn test_result_type_ok() {
        fn get_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(get_result().unwrap(), 42);
    }
}
