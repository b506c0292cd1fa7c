//! Derived track metrics.
//!
//! Both computations treat the slice order — the stored query order — as
//! the traversal order. Points are never sorted by timestamp here, so
//! `total_duration` can be negative when the stored order is not
//! chronological. That literal semantics is deliberate.

use crate::geo::haversine_distance;
use crate::models::TrackPoint;

/// Total distance in meters: the sum of pairwise haversine distances
/// between consecutive points. Zero for fewer than two points.
pub fn total_distance(points: &[TrackPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| {
            haversine_distance(
                pair[0].latitude,
                pair[0].longitude,
                pair[1].latitude,
                pair[1].longitude,
            )
        })
        .sum()
}

/// Elapsed seconds between the last and first point in stored order.
/// Zero for fewer than two points.
pub fn total_duration(points: &[TrackPoint]) -> f64 {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() > 1 => {
            (last.timestamp - first.timestamp).num_milliseconds() as f64 / 1000.0
        }
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn point(seq: i64, lat: f64, lon: f64, offset_secs: i64) -> TrackPoint {
        TrackPoint {
            id: seq,
            track_id: Uuid::nil(),
            latitude: lat,
            longitude: lon,
            timestamp: Utc::now() + Duration::seconds(offset_secs),
            altitude: None,
            speed: None,
        }
    }

    #[test]
    fn test_empty_and_single_point() {
        assert_eq!(total_distance(&[]), 0.0);
        assert_eq!(total_duration(&[]), 0.0);

        let single = [point(1, 10.0, 20.0, 0)];
        assert_eq!(total_distance(&single), 0.0);
        assert_eq!(total_duration(&single), 0.0);
    }

    #[test]
    fn test_distance_is_pairwise_sum() {
        let points = [
            point(1, 0.0, 0.0, 0),
            point(2, 0.0, 1.0, 60),
            point(3, 1.0, 1.0, 120),
        ];
        let expected = haversine_distance(0.0, 0.0, 0.0, 1.0) + haversine_distance(0.0, 1.0, 1.0, 1.0);
        let got = total_distance(&points);
        assert!((got - expected).abs() < 1e-9);
    }

    #[test]
    fn test_duration_last_minus_first() {
        let points = [
            point(1, 0.0, 0.0, 0),
            point(2, 0.0, 0.1, 90),
            point(3, 0.0, 0.2, 300),
        ];
        assert!((total_duration(&points) - 300.0).abs() < 0.001);
    }

    #[test]
    fn test_duration_negative_when_order_not_chronological() {
        // Stored order is the traversal order; a track whose last stored
        // point predates its first yields a negative duration.
        let points = [point(1, 0.0, 0.0, 100), point(2, 0.0, 0.1, 40)];
        assert!((total_duration(&points) + 60.0).abs() < 0.001);
    }

    #[test]
    fn test_distance_ignores_timestamps() {
        let forward = [point(1, 0.0, 0.0, 0), point(2, 0.0, 1.0, 10)];
        let reversed_time = [point(1, 0.0, 0.0, 10), point(2, 0.0, 1.0, 0)];
        assert_eq!(total_distance(&forward), total_distance(&reversed_time));
    }
}
