//! Core data models for geotrail.
//!
//! Entities hold only the id of their owner; owned items are obtained via
//! explicit queries, never through back-pointers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// USERS
// =============================================================================

/// A registered account (human or device). The password hash never leaves
/// the database layer and is not part of this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Registration request body.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login form body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

// =============================================================================
// LOCATIONS
// =============================================================================

/// A single point-in-time position owned by one user. The "current"
/// location is the row with the greatest timestamp, not a flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}

/// Request body for creating or upserting a location.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationCreate {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub name: Option<String>,
}

// =============================================================================
// TRACKS
// =============================================================================

/// A named collection of ordered GPS points owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Aggregate point count; populated by list queries, `None` elsewhere.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_count: Option<i64>,
}

/// Request body for creating a track.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Track summary with derived metrics, for the recent-tracks listing.
/// `distance` and `duration` are recomputed on demand, never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRecent {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Total distance in meters over the stored point order.
    pub distance: f64,
    /// Elapsed seconds between first and last stored point.
    pub duration: f64,
}

/// A track together with its points in stored order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackWithPoints {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub track_points: Vec<TrackPoint>,
}

// =============================================================================
// TRACK POINTS
// =============================================================================

/// One GPS sample belonging to a track. The BIGSERIAL `id` carries the
/// stored traversal order; points are not required to be in timestamp
/// order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackPoint {
    pub id: i64,
    pub track_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
    pub altitude: Option<f64>,
    pub speed: Option<f64>,
}

/// Request body for appending a single point (or one of a bulk batch).
/// The timestamp is always server-assigned on this path.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackPointCreate {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: Option<f64>,
    #[serde(default)]
    pub speed: Option<f64>,
}

/// One GPS sample in an upload payload. A missing timestamp defaults to
/// server-now at insertion, explicitly in the ingestion logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub altitude: Option<f64>,
    #[serde(default)]
    pub speed: Option<f64>,
}

/// Whole-track bulk upload payload.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackUpload {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub points: Vec<GpsPoint>,
}

/// One chunk of a chunked device upload. The caller carries all protocol
/// state: the first chunk names the track, later chunks reference it by
/// `track_id` from the first chunk's response.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackChunkUpload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub track_id: Option<Uuid>,
    pub points: Vec<GpsPoint>,
    #[serde(default)]
    pub is_first_chunk: bool,
    #[serde(default)]
    pub is_last_chunk: bool,
}

/// Response to a chunk upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkUploadResponse {
    pub track_id: Uuid,
    pub status: String,
    pub is_last_chunk: bool,
}

/// Response to a bulk point append.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkAppendResponse {
    pub message: String,
    pub track_id: Uuid,
    pub points_added: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_upload_flags_default_false() {
        let chunk: TrackChunkUpload = serde_json::from_str(r#"{"points": []}"#).unwrap();
        assert!(!chunk.is_first_chunk);
        assert!(!chunk.is_last_chunk);
        assert!(chunk.name.is_none());
        assert!(chunk.track_id.is_none());
        assert!(chunk.points.is_empty());
    }

    #[test]
    fn test_gps_point_optional_fields() {
        let point: GpsPoint =
            serde_json::from_str(r#"{"latitude": 1.5, "longitude": -2.5}"#).unwrap();
        assert_eq!(point.latitude, 1.5);
        assert!(point.timestamp.is_none());
        assert!(point.altitude.is_none());
        assert!(point.speed.is_none());
    }

    #[test]
    fn test_track_points_count_skipped_when_none() {
        let track = Track {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            name: "Morning run".to_string(),
            description: None,
            created_at: Utc::now(),
            points_count: None,
        };
        let json = serde_json::to_value(&track).unwrap();
        assert!(json.get("points_count").is_none());
    }
}
