//! Authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use geotrail_core::{TokenRepository, User, UserRepository};

use crate::error::ApiError;
use crate::state::AppState;

/// Extractor that resolves the bearer token to the authenticated user.
///
/// Rejects the request with 401 when the Authorization header is missing,
/// malformed, or the token is unknown or expired.
///
/// Usage:
/// ```ignore
/// async fn my_handler(auth: RequireUser) -> impl IntoResponse {
///     let user_id = auth.user.id;
///     // ... handler logic
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireUser {
    pub user: User,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let token = match auth_header {
            Some(header) if header.starts_with("Bearer ") => {
                header.trim_start_matches("Bearer ").trim()
            }
            _ => {
                return Err(ApiError::Unauthorized(
                    "Authentication required".to_string(),
                ))
            }
        };

        let user_id = state
            .db
            .tokens
            .resolve(token)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        let user = state
            .db
            .users
            .get(user_id)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(RequireUser { user })
    }
}
