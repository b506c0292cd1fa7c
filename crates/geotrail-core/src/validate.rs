//! Boundary validation for request payloads.
//!
//! Validation happens before any write. Note the asymmetry: whole-track
//! uploads are bounds- and ceiling-checked here, while the chunked device
//! path and the point-append endpoints are not.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::models::{GpsPoint, TrackChunkUpload};

/// Maximum points accepted in a whole-track upload.
pub const MAX_TRACK_UPLOAD_POINTS: usize = 10_000;

/// Maximum points accepted per bulk append call.
pub const MAX_BULK_APPEND_POINTS: usize = 1_000;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Username: 3-50 characters.
pub fn validate_username(username: &str) -> Result<()> {
    let len = username.chars().count();
    if !(3..=50).contains(&len) {
        return Err(Error::InvalidInput(
            "Username must be between 3 and 50 characters".to_string(),
        ));
    }
    Ok(())
}

/// Email: basic well-formedness.
pub fn validate_email(email: &str) -> Result<()> {
    if !EMAIL_RE.is_match(email) {
        return Err(Error::InvalidInput("Invalid email address".to_string()));
    }
    Ok(())
}

/// Password: at least 6 characters.
pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < 6 {
        return Err(Error::InvalidInput(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

/// Track name: 1-100 characters.
pub fn validate_track_name(name: &str) -> Result<()> {
    let len = name.chars().count();
    if !(1..=100).contains(&len) {
        return Err(Error::InvalidInput(
            "Track name must be between 1 and 100 characters".to_string(),
        ));
    }
    Ok(())
}

/// Coordinate bounds: latitude in [-90, 90], longitude in [-180, 180].
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(Error::InvalidInput(format!(
            "Invalid latitude: {latitude}"
        )));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(Error::InvalidInput(format!(
            "Invalid longitude: {longitude}"
        )));
    }
    Ok(())
}

/// Bounds-check every point of a whole-track upload, naming the offending
/// index and value in the error message.
pub fn validate_points(points: &[GpsPoint]) -> Result<()> {
    for (i, point) in points.iter().enumerate() {
        if !(-90.0..=90.0).contains(&point.latitude) {
            return Err(Error::InvalidInput(format!(
                "Invalid latitude at point {}: {}",
                i, point.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&point.longitude) {
            return Err(Error::InvalidInput(format!(
                "Invalid longitude at point {}: {}",
                i, point.longitude
            )));
        }
    }
    Ok(())
}

/// Whole-track upload payload: non-empty, under the point ceiling, every
/// coordinate in bounds.
pub fn validate_track_upload(points: &[GpsPoint]) -> Result<()> {
    if points.is_empty() {
        return Err(Error::InvalidInput(
            "Track must contain at least one point".to_string(),
        ));
    }
    if points.len() > MAX_TRACK_UPLOAD_POINTS {
        return Err(Error::InvalidInput(
            "Track cannot contain more than 10,000 points".to_string(),
        ));
    }
    validate_points(points)
}

/// Bulk append batch size: non-empty and under the per-call ceiling.
/// Coordinates are not bounds-checked on this path.
pub fn validate_bulk_append(count: usize) -> Result<()> {
    if count == 0 {
        return Err(Error::InvalidInput("No points provided".to_string()));
    }
    if count > MAX_BULK_APPEND_POINTS {
        return Err(Error::InvalidInput(
            "Cannot add more than 1000 points at once".to_string(),
        ));
    }
    Ok(())
}

/// Chunk protocol shape: the first chunk must carry a name and points,
/// later chunks must carry the track id. Chunk points themselves are not
/// bounds-checked.
pub fn validate_chunk_upload(chunk: &TrackChunkUpload) -> Result<()> {
    if chunk.is_first_chunk {
        let named = chunk.name.as_deref().map_or(false, |n| !n.is_empty());
        if !named || chunk.points.is_empty() {
            return Err(Error::InvalidInput(
                "Name and points required for first chunk".to_string(),
            ));
        }
    } else if chunk.track_id.is_none() {
        return Err(Error::InvalidInput(
            "track_id required for non-first chunk".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gps(lat: f64, lon: f64) -> GpsPoint {
        GpsPoint {
            latitude: lat,
            longitude: lon,
            timestamp: None,
            altitude: None,
            speed: None,
        }
    }

    #[test]
    fn test_username_bounds() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username("abc").is_ok());
        assert!(validate_username(&"x".repeat(50)).is_ok());
        assert!(validate_username(&"x".repeat(51)).is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("rider@example.com").is_ok());
        assert!(validate_email("gps_tracker@device.local").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a@b.co").is_ok());
    }

    #[test]
    fn test_password_minimum() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn test_track_name_bounds() {
        assert!(validate_track_name("").is_err());
        assert!(validate_track_name("T").is_ok());
        assert!(validate_track_name(&"n".repeat(100)).is_ok());
        assert!(validate_track_name(&"n".repeat(101)).is_err());
    }

    #[test]
    fn test_coordinate_bounds() {
        assert!(validate_coordinates(90.0, 180.0).is_ok());
        assert!(validate_coordinates(-90.0, -180.0).is_ok());
        assert!(validate_coordinates(90.001, 0.0).is_err());
        assert!(validate_coordinates(0.0, -180.001).is_err());
    }

    #[test]
    fn test_points_error_names_index_and_value() {
        let points = vec![gps(10.0, 20.0), gps(91.0, 0.0)];
        let err = validate_points(&points).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("point 1"), "{msg}");
        assert!(msg.contains("91"), "{msg}");

        let points = vec![gps(0.0, 0.0), gps(0.0, 0.0), gps(45.0, -200.0)];
        let err = validate_points(&points).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("longitude at point 2"), "{msg}");
    }

    #[test]
    fn test_points_all_valid() {
        let points: Vec<GpsPoint> = (0..100).map(|i| gps(i as f64 * 0.5, -50.0)).collect();
        assert!(validate_points(&points).is_ok());
    }

    #[test]
    fn test_track_upload_rejects_empty() {
        let err = validate_track_upload(&[]).unwrap_err();
        assert!(err.to_string().contains("at least one point"), "{err}");
    }

    #[test]
    fn test_track_upload_point_ceiling() {
        let at_limit: Vec<GpsPoint> = (0..MAX_TRACK_UPLOAD_POINTS).map(|_| gps(1.0, 2.0)).collect();
        assert!(validate_track_upload(&at_limit).is_ok());

        let over: Vec<GpsPoint> = (0..MAX_TRACK_UPLOAD_POINTS + 1).map(|_| gps(1.0, 2.0)).collect();
        let err = validate_track_upload(&over).unwrap_err();
        assert!(err.to_string().contains("10,000"), "{err}");
    }

    #[test]
    fn test_bulk_append_ceiling() {
        assert!(validate_bulk_append(1).is_ok());
        assert!(validate_bulk_append(MAX_BULK_APPEND_POINTS).is_ok());

        let err = validate_bulk_append(0).unwrap_err();
        assert!(err.to_string().contains("No points provided"), "{err}");

        let err = validate_bulk_append(MAX_BULK_APPEND_POINTS + 1).unwrap_err();
        assert!(err.to_string().contains("more than 1000"), "{err}");
    }

    fn chunk(
        name: Option<&str>,
        track_id: Option<uuid::Uuid>,
        points: Vec<GpsPoint>,
        is_first_chunk: bool,
    ) -> TrackChunkUpload {
        TrackChunkUpload {
            name: name.map(String::from),
            description: None,
            track_id,
            points,
            is_first_chunk,
            is_last_chunk: false,
        }
    }

    #[test]
    fn test_first_chunk_requires_name_and_points() {
        let err = validate_chunk_upload(&chunk(None, None, vec![gps(1.0, 2.0)], true)).unwrap_err();
        assert!(err.to_string().contains("Name and points required"), "{err}");

        let err = validate_chunk_upload(&chunk(Some(""), None, vec![gps(1.0, 2.0)], true)).unwrap_err();
        assert!(err.to_string().contains("Name and points required"), "{err}");

        let err = validate_chunk_upload(&chunk(Some("Ride"), None, vec![], true)).unwrap_err();
        assert!(err.to_string().contains("Name and points required"), "{err}");

        assert!(validate_chunk_upload(&chunk(Some("Ride"), None, vec![gps(1.0, 2.0)], true)).is_ok());
    }

    #[test]
    fn test_non_first_chunk_requires_track_id() {
        let err = validate_chunk_upload(&chunk(None, None, vec![gps(1.0, 2.0)], false)).unwrap_err();
        assert!(err.to_string().contains("track_id required"), "{err}");

        let id = uuid::Uuid::new_v4();
        assert!(validate_chunk_upload(&chunk(None, Some(id), vec![], false)).is_ok());
    }
}
