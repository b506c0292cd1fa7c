//! Track point repository implementation.
//!
//! Points are append-only. Every multi-point append runs in one
//! transaction so concurrent readers never observe a partial chunk.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use geotrail_core::{
    Error, GpsPoint, Result, TrackPoint, TrackPointCreate, TrackPointRepository,
};

/// PostgreSQL implementation of TrackPointRepository.
#[derive(Clone)]
pub struct PgTrackPointRepository {
    pool: Pool<Postgres>,
}

impl PgTrackPointRepository {
    /// Create a new PgTrackPointRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn row_to_point(row: &sqlx::postgres::PgRow) -> TrackPoint {
        TrackPoint {
            id: row.get("id"),
            track_id: row.get("track_id"),
            latitude: row.get("latitude"),
            longitude: row.get("longitude"),
            timestamp: row.get("timestamp"),
            altitude: row.get("altitude"),
            speed: row.get("speed"),
        }
    }
}

#[async_trait]
impl TrackPointRepository for PgTrackPointRepository {
    async fn list(&self, track_id: Uuid) -> Result<Vec<TrackPoint>> {
        let rows = sqlx::query(
            "SELECT id, track_id, latitude, longitude, timestamp, altitude, speed
             FROM track_points
             WHERE track_id = $1
             ORDER BY id",
        )
        .bind(track_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(Self::row_to_point).collect())
    }

    async fn append_one(&self, track_id: Uuid, point: &TrackPointCreate) -> Result<TrackPoint> {
        let now = Utc::now();

        let row = sqlx::query(
            "INSERT INTO track_points (track_id, latitude, longitude, timestamp, altitude, speed)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(track_id)
        .bind(point.latitude)
        .bind(point.longitude)
        .bind(now)
        .bind(point.altitude)
        .bind(point.speed)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(TrackPoint {
            id: row.get("id"),
            track_id,
            latitude: point.latitude,
            longitude: point.longitude,
            timestamp: now,
            altitude: point.altitude,
            speed: point.speed,
        })
    }

    async fn append_bulk(&self, track_id: Uuid, points: &[TrackPointCreate]) -> Result<usize> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        for point in points {
            sqlx::query(
                "INSERT INTO track_points (track_id, latitude, longitude, timestamp, altitude, speed)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(track_id)
            .bind(point.latitude)
            .bind(point.longitude)
            .bind(now)
            .bind(point.altitude)
            .bind(point.speed)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)?;

        tracing::debug!(
            subsystem = "database",
            component = "track_points",
            op = "append_bulk",
            track_id = %track_id,
            point_count = points.len(),
            "Bulk points appended"
        );

        Ok(points.len())
    }

    async fn append_chunk(&self, track_id: Uuid, points: &[GpsPoint]) -> Result<usize> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        for point in points {
            sqlx::query(
                "INSERT INTO track_points (track_id, latitude, longitude, timestamp, altitude, speed)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(track_id)
            .bind(point.latitude)
            .bind(point.longitude)
            .bind(point.timestamp.unwrap_or(now))
            .bind(point.altitude)
            .bind(point.speed)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)?;

        Ok(points.len())
    }
}
