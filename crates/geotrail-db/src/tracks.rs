//! Track repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use geotrail_core::{Error, Result, Track, TrackRepository, TrackUpload};

/// PostgreSQL implementation of TrackRepository.
#[derive(Clone)]
pub struct PgTrackRepository {
    pool: Pool<Postgres>,
}

impl PgTrackRepository {
    /// Create a new PgTrackRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrackRepository for PgTrackRepository {
    async fn create(&self, user_id: Uuid, name: &str, description: Option<&str>) -> Result<Track> {
        let id = Uuid::now_v7();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO tracks (id, user_id, name, description, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(user_id)
        .bind(name)
        .bind(description)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(Track {
            id,
            user_id,
            name: name.to_string(),
            description: description.map(String::from),
            created_at: now,
            points_count: None,
        })
    }

    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<Track>> {
        let row = sqlx::query(
            "SELECT id, user_id, name, description, created_at
             FROM tracks
             WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(|r| Track {
            id: r.get("id"),
            user_id: r.get("user_id"),
            name: r.get("name"),
            description: r.get("description"),
            created_at: r.get("created_at"),
            points_count: None,
        }))
    }

    async fn list_with_counts(&self, user_id: Uuid, skip: i64, limit: i64) -> Result<Vec<Track>> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.user_id, t.name, t.description, t.created_at,
                   COUNT(p.id) AS points_count
            FROM tracks t
            LEFT JOIN track_points p ON p.track_id = t.id
            WHERE t.user_id = $1
            GROUP BY t.id
            ORDER BY t.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|r| Track {
                id: r.get("id"),
                user_id: r.get("user_id"),
                name: r.get("name"),
                description: r.get("description"),
                created_at: r.get("created_at"),
                points_count: Some(r.get("points_count")),
            })
            .collect())
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        // Points first, then the track row; the ownership filter on the
        // track decides whether anything happened at all.
        sqlx::query(
            "DELETE FROM track_points
             WHERE track_id IN (SELECT id FROM tracks WHERE id = $1 AND user_id = $2)",
        )
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        let result = sqlx::query("DELETE FROM tracks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(
                subsystem = "database",
                component = "tracks",
                op = "delete",
                track_id = %id,
                "Track deleted with its points"
            );
        }
        Ok(deleted)
    }

    async fn create_with_points(&self, user_id: Uuid, upload: &TrackUpload) -> Result<Track> {
        let id = Uuid::now_v7();
        let now = Utc::now();

        // Track row and every point in one transaction; an early return
        // drops the transaction and rolls the track row back with it.
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        sqlx::query(
            "INSERT INTO tracks (id, user_id, name, description, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(user_id)
        .bind(&upload.name)
        .bind(&upload.description)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        for point in &upload.points {
            sqlx::query(
                "INSERT INTO track_points (track_id, latitude, longitude, timestamp, altitude, speed)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(id)
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

        tracing::info!(
            subsystem = "database",
            component = "tracks",
            op = "create_with_points",
            track_id = %id,
            point_count = upload.points.len(),
            "Track created with points"
        );

        Ok(Track {
            id,
            user_id,
            name: upload.name.clone(),
            description: upload.description.clone(),
            created_at: now,
            points_count: Some(upload.points.len() as i64),
        })
    }
}
