//! API error type and response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

/// Error type returned by handlers, mapped onto HTTP status codes.
#[derive(Debug)]
pub enum ApiError {
    /// Unexpected persistence or internal failure; surfaces as 500.
    Internal(geotrail_core::Error),
    /// Missing/invalid credentials or token.
    Unauthorized(String),
    /// Absent resource, or one owned by another user (indistinguishable).
    NotFound(String),
    /// Malformed input, missing required fields, ceiling violations.
    BadRequest(String),
    /// Duplicate username/email or repeated device registration.
    /// Rendered as 400, matching the public contract.
    Conflict(String),
}

impl From<geotrail_core::Error> for ApiError {
    fn from(err: geotrail_core::Error) -> Self {
        match err {
            geotrail_core::Error::NotFound(msg) => ApiError::NotFound(msg),
            geotrail_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            geotrail_core::Error::Conflict(msg) => ApiError::Conflict(msg),
            geotrail_core::Error::Unauthorized(msg) => ApiError::Unauthorized(msg),
            other => ApiError::Internal(other),
        }
    }
}

impl ApiError {
    /// HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Internal(err) => {
                // Internal detail goes to the log, not the client.
                tracing::error!(subsystem = "api", error = %err, "Request failed");
                "Internal server error".to_string()
            }
            ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Conflict(msg) => msg,
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotrail_core::Error;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Conflict("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Internal(Error::Internal("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_core_error_mapping() {
        assert!(matches!(
            ApiError::from(Error::NotFound("t".into())),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(Error::InvalidInput("t".into())),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(Error::Conflict("t".into())),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(Error::Unauthorized("t".into())),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from(Error::Internal("t".into())),
            ApiError::Internal(_)
        ));
    }
}
