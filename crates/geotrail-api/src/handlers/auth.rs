//! Registration, login, and identity handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Form, Json};

use geotrail_core::{
    validate_email, validate_password, validate_username, LoginForm, LoginResponse,
    RegisterRequest, TokenRepository, User, UserRepository,
};

use crate::error::ApiError;
use crate::extract::RequireUser;
use crate::state::AppState;

/// Fixed username of the one-shot device account.
pub const DEVICE_USERNAME: &str = "gps_tracker";
const DEVICE_EMAIL: &str = "gps_tracker@device.local";
const DEVICE_PASSWORD: &str = "tracker123";

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<User>, ApiError> {
    validate_username(&req.username)?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;

    let user = state
        .db
        .users
        .create(&req.username, &req.email, &req.password)
        .await?;

    tracing::info!(
        subsystem = "api",
        component = "auth",
        op = "register",
        user_id = %user.id,
        "User registered"
    );

    Ok(Json(user))
}

/// POST /api/v1/auth/register-device
///
/// One-shot bootstrap of the GPS device account with a fixed username.
pub async fn register_device(State(state): State<AppState>) -> Result<Json<User>, ApiError> {
    if state
        .db
        .users
        .get_by_username(DEVICE_USERNAME)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "GPS device already registered".to_string(),
        ));
    }

    let user = state
        .db
        .users
        .create(DEVICE_USERNAME, DEVICE_EMAIL, DEVICE_PASSWORD)
        .await?;

    Ok(Json(user))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .db
        .users
        .verify_credentials(&form.username, &form.password)
        .await?;

    let access_token = state
        .db
        .tokens
        .create(user.id, state.config.token_lifetime())
        .await?;

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: state.config.token_lifetime_seconds(),
        user,
    }))
}

/// GET /api/v1/auth/me
pub async fn me(auth: RequireUser) -> impl IntoResponse {
    Json(auth.user)
}
