//! Map view handlers. Data access and ownership checks happen here; the
//! rendering itself is delegated to [`crate::maps`].

use axum::extract::{Path, State};
use axum::response::Html;
use uuid::Uuid;

use geotrail_core::{LocationRepository, TrackPoint, TrackPointRepository, TrackRepository};

use crate::error::ApiError;
use crate::extract::RequireUser;
use crate::maps;
use crate::state::AppState;

/// GET /api/v1/maps/current-location
pub async fn current_location_map(
    State(state): State<AppState>,
    auth: RequireUser,
) -> Result<Html<String>, ApiError> {
    let location = state
        .db
        .locations
        .current(auth.user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No location data found".to_string()))?;

    Ok(Html(maps::location_map(&location)))
}

/// GET /api/v1/maps/track/:id
pub async fn track_map(
    State(state): State<AppState>,
    auth: RequireUser,
    Path(track_id): Path<Uuid>,
) -> Result<Html<String>, ApiError> {
    let track = state
        .db
        .tracks
        .get(track_id, auth.user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Track not found".to_string()))?;

    let points = state.db.track_points.list(track_id).await?;
    Ok(Html(maps::track_map(&track, &points)))
}

/// GET /api/v1/maps/tracks
pub async fn tracks_map(
    State(state): State<AppState>,
    auth: RequireUser,
) -> Result<Html<String>, ApiError> {
    let tracks = state
        .db
        .tracks
        .list_with_counts(auth.user.id, 0, 100)
        .await?;
    if tracks.is_empty() {
        return Err(ApiError::NotFound("No tracks found".to_string()));
    }

    let mut with_points: Vec<(geotrail_core::Track, Vec<TrackPoint>)> =
        Vec::with_capacity(tracks.len());
    for track in tracks {
        let points = state.db.track_points.list(track.id).await?;
        with_points.push((track, points));
    }

    Ok(Html(maps::multi_track_map(&with_points)))
}

/// GET /api/v1/maps/locations
pub async fn locations_map(
    State(state): State<AppState>,
    auth: RequireUser,
) -> Result<Html<String>, ApiError> {
    let locations = state.db.locations.list(auth.user.id, 0, 100).await?;
    if locations.is_empty() {
        return Err(ApiError::NotFound("No locations found".to_string()));
    }

    Ok(Html(maps::locations_map(&locations)))
}
