//! Track handlers: CRUD, derived metrics, bulk upload, and the chunked
//! device ingestion protocol.
//!
//! Known inconsistency: the whole-track upload bounds-checks coordinates
//! and enforces point ceilings, while the chunked device path and the
//! point-append endpoints do not.

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use geotrail_core::{
    total_distance, total_duration, validate_bulk_append, validate_chunk_upload,
    validate_track_name, validate_track_upload, BulkAppendResponse, ChunkUploadResponse, Track,
    TrackChunkUpload, TrackCreate, TrackPoint, TrackPointCreate, TrackPointRepository, TrackRecent,
    TrackRepository, TrackUpload, TrackWithPoints,
};

use crate::error::ApiError;
use crate::extract::RequireUser;
use crate::handlers::Pagination;
use crate::state::AppState;

/// Number of tracks returned by the recent-tracks listing.
const RECENT_TRACKS_LIMIT: i64 = 3;

/// GET /api/v1/tracks
pub async fn list(
    State(state): State<AppState>,
    auth: RequireUser,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Track>>, ApiError> {
    let tracks = state
        .db
        .tracks
        .list_with_counts(auth.user.id, page.skip, page.limit())
        .await?;
    Ok(Json(tracks))
}

/// GET /api/v1/tracks/recent
///
/// Up to three tracks, each annotated with total distance and duration
/// computed on demand from its points in stored order.
pub async fn recent(
    State(state): State<AppState>,
    auth: RequireUser,
) -> Result<Json<Vec<TrackRecent>>, ApiError> {
    let tracks = state
        .db
        .tracks
        .list_with_counts(auth.user.id, 0, RECENT_TRACKS_LIMIT)
        .await?;

    let mut result = Vec::with_capacity(tracks.len());
    for track in tracks {
        let points = state.db.track_points.list(track.id).await?;
        result.push(TrackRecent {
            id: track.id,
            name: track.name,
            description: track.description,
            created_at: track.created_at,
            distance: total_distance(&points),
            duration: total_duration(&points),
        });
    }
    Ok(Json(result))
}

/// POST /api/v1/tracks
pub async fn create(
    State(state): State<AppState>,
    auth: RequireUser,
    Json(req): Json<TrackCreate>,
) -> Result<Json<Track>, ApiError> {
    validate_track_name(&req.name)?;
    let track = state
        .db
        .tracks
        .create(auth.user.id, &req.name, req.description.as_deref())
        .await?;
    Ok(Json(track))
}

/// GET /api/v1/tracks/:id
pub async fn get(
    State(state): State<AppState>,
    auth: RequireUser,
    Path(track_id): Path<Uuid>,
) -> Result<Json<TrackWithPoints>, ApiError> {
    let track = state
        .db
        .tracks
        .get(track_id, auth.user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Track not found".to_string()))?;

    let track_points = state.db.track_points.list(track_id).await?;

    Ok(Json(TrackWithPoints {
        id: track.id,
        user_id: track.user_id,
        name: track.name,
        description: track.description,
        created_at: track.created_at,
        track_points,
    }))
}

/// DELETE /api/v1/tracks/:id
pub async fn delete(
    State(state): State<AppState>,
    auth: RequireUser,
    Path(track_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state.db.tracks.delete(track_id, auth.user.id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Track not found".to_string()));
    }
    Ok(Json(serde_json::json!({
        "message": "Track deleted successfully"
    })))
}

/// POST /api/v1/tracks/upload
///
/// Whole-track upload: validated up front (non-empty, point ceiling,
/// coordinate bounds with the offending index named), then written as a
/// single transaction.
pub async fn upload(
    State(state): State<AppState>,
    auth: RequireUser,
    Json(upload): Json<TrackUpload>,
) -> Result<Json<Track>, ApiError> {
    validate_track_name(&upload.name)?;
    validate_track_upload(&upload.points)?;

    let track = state
        .db
        .tracks
        .create_with_points(auth.user.id, &upload)
        .await?;
    Ok(Json(track))
}

/// POST /api/v1/tracks/:id/points
pub async fn add_point(
    State(state): State<AppState>,
    auth: RequireUser,
    Path(track_id): Path<Uuid>,
    Json(point): Json<TrackPointCreate>,
) -> Result<Json<TrackPoint>, ApiError> {
    state
        .db
        .tracks
        .get(track_id, auth.user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Track not found".to_string()))?;

    let created = state.db.track_points.append_one(track_id, &point).await?;
    Ok(Json(created))
}

/// POST /api/v1/tracks/:id/points/bulk
pub async fn add_points_bulk(
    State(state): State<AppState>,
    auth: RequireUser,
    Path(track_id): Path<Uuid>,
    Json(points): Json<Vec<TrackPointCreate>>,
) -> Result<Json<BulkAppendResponse>, ApiError> {
    state
        .db
        .tracks
        .get(track_id, auth.user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Track not found".to_string()))?;

    validate_bulk_append(points.len())?;

    let added = state.db.track_points.append_bulk(track_id, &points).await?;

    Ok(Json(BulkAppendResponse {
        message: format!("Successfully added {added} points to track {track_id}"),
        track_id,
        points_added: added,
    }))
}

/// GET /api/v1/tracks/:id/points
///
/// Returns an empty list — not an error — when the track is absent or
/// owned by someone else.
pub async fn get_points(
    State(state): State<AppState>,
    auth: RequireUser,
    Path(track_id): Path<Uuid>,
) -> Result<Json<Vec<TrackPoint>>, ApiError> {
    let owned = state.db.tracks.get(track_id, auth.user.id).await?.is_some();
    if !owned {
        return Ok(Json(Vec::new()));
    }

    let points = state.db.track_points.list(track_id).await?;
    Ok(Json(points))
}

/// POST /api/v1/tracks/load_from_tracker
///
/// Chunked upload from a constrained device. The first chunk creates the
/// track; later chunks reference it by the returned `track_id`. Each
/// chunk's points are appended atomically. There is no server-side chunk
/// session: a retried chunk will duplicate its points.
pub async fn load_from_tracker(
    State(state): State<AppState>,
    auth: RequireUser,
    Json(chunk): Json<TrackChunkUpload>,
) -> Result<Json<ChunkUploadResponse>, ApiError> {
    validate_chunk_upload(&chunk)?;

    let track_id = if chunk.is_first_chunk {
        let track = state
            .db
            .tracks
            .create(
                auth.user.id,
                chunk.name.as_deref().unwrap_or_default(),
                chunk.description.as_deref(),
            )
            .await?;
        track.id
    } else {
        let track_id = chunk.track_id.ok_or_else(|| {
            ApiError::BadRequest("track_id required for non-first chunk".to_string())
        })?;
        state
            .db
            .tracks
            .get(track_id, auth.user.id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Track not found".to_string()))?;
        track_id
    };

    if !chunk.points.is_empty() {
        state
            .db
            .track_points
            .append_chunk(track_id, &chunk.points)
            .await?;
    }

    tracing::debug!(
        subsystem = "api",
        component = "tracks",
        op = "load_from_tracker",
        track_id = %track_id,
        point_count = chunk.points.len(),
        is_first_chunk = chunk.is_first_chunk,
        is_last_chunk = chunk.is_last_chunk,
        "Chunk ingested"
    );

    Ok(Json(ChunkUploadResponse {
        track_id,
        status: "ok".to_string(),
        is_last_chunk: chunk.is_last_chunk,
    }))
}
