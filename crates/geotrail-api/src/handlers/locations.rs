//! Location handlers: history CRUD plus the current-location view.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use geotrail_core::{validate_coordinates, Location, LocationCreate, LocationRepository};

use crate::error::ApiError;
use crate::extract::RequireUser;
use crate::handlers::Pagination;
use crate::state::AppState;

/// GET /api/v1/locations
pub async fn list(
    State(state): State<AppState>,
    auth: RequireUser,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Location>>, ApiError> {
    let locations = state
        .db
        .locations
        .list(auth.user.id, page.skip, page.limit())
        .await?;
    Ok(Json(locations))
}

/// GET /api/v1/locations/current
pub async fn current(
    State(state): State<AppState>,
    auth: RequireUser,
) -> Result<Json<Location>, ApiError> {
    let location = state
        .db
        .locations
        .current(auth.user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No location data found".to_string()))?;
    Ok(Json(location))
}

/// POST /api/v1/locations
pub async fn create(
    State(state): State<AppState>,
    auth: RequireUser,
    Json(req): Json<LocationCreate>,
) -> Result<Json<Location>, ApiError> {
    validate_coordinates(req.latitude, req.longitude)?;
    let location = state.db.locations.create(auth.user.id, &req).await?;
    Ok(Json(location))
}

/// PUT /api/v1/locations/current
///
/// Updates the most-recent location row in place, or creates one when
/// the user has no location history yet.
pub async fn update_current(
    State(state): State<AppState>,
    auth: RequireUser,
    Json(req): Json<LocationCreate>,
) -> Result<Json<Location>, ApiError> {
    validate_coordinates(req.latitude, req.longitude)?;
    let location = state.db.locations.upsert_current(auth.user.id, &req).await?;
    Ok(Json(location))
}

/// GET /api/v1/locations/:id
pub async fn get(
    State(state): State<AppState>,
    auth: RequireUser,
    Path(location_id): Path<Uuid>,
) -> Result<Json<Location>, ApiError> {
    let location = state
        .db
        .locations
        .get(location_id, auth.user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Location not found".to_string()))?;
    Ok(Json(location))
}

/// DELETE /api/v1/locations/:id
pub async fn delete(
    State(state): State<AppState>,
    auth: RequireUser,
    Path(location_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = state.db.locations.delete(location_id, auth.user.id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Location not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
