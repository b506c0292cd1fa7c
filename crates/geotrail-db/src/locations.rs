//! Location repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use geotrail_core::{Error, Location, LocationCreate, LocationRepository, Result};

/// Name assigned to locations created without one.
const DEFAULT_LOCATION_NAME: &str = "Current Location";

/// PostgreSQL implementation of LocationRepository.
#[derive(Clone)]
pub struct PgLocationRepository {
    pool: Pool<Postgres>,
}

impl PgLocationRepository {
    /// Create a new PgLocationRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn row_to_location(row: &sqlx::postgres::PgRow) -> Location {
        Location {
            id: row.get("id"),
            user_id: row.get("user_id"),
            name: row.get("name"),
            latitude: row.get("latitude"),
            longitude: row.get("longitude"),
            timestamp: row.get("timestamp"),
        }
    }
}

#[async_trait]
impl LocationRepository for PgLocationRepository {
    async fn create(&self, user_id: Uuid, location: &LocationCreate) -> Result<Location> {
        let id = Uuid::now_v7();
        // Timestamp defaulting is an explicit step here, not a storage
        // engine default.
        let now = Utc::now();
        let name = location
            .name
            .clone()
            .unwrap_or_else(|| DEFAULT_LOCATION_NAME.to_string());

        sqlx::query(
            "INSERT INTO locations (id, user_id, name, latitude, longitude, timestamp)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(id)
        .bind(user_id)
        .bind(&name)
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(Location {
            id,
            user_id,
            name,
            latitude: location.latitude,
            longitude: location.longitude,
            timestamp: now,
        })
    }

    async fn list(&self, user_id: Uuid, skip: i64, limit: i64) -> Result<Vec<Location>> {
        let rows = sqlx::query(
            "SELECT id, user_id, name, latitude, longitude, timestamp
             FROM locations
             WHERE user_id = $1
             ORDER BY id
             LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(Self::row_to_location).collect())
    }

    async fn current(&self, user_id: Uuid) -> Result<Option<Location>> {
        let row = sqlx::query(
            "SELECT id, user_id, name, latitude, longitude, timestamp
             FROM locations
             WHERE user_id = $1
             ORDER BY timestamp DESC
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(|r| Self::row_to_location(&r)))
    }

    async fn upsert_current(&self, user_id: Uuid, location: &LocationCreate) -> Result<Location> {
        match self.current(user_id).await? {
            Some(existing) => {
                // Update the row in place: id stays, timestamp is not
                // touched, and a missing name keeps the stored one.
                let name = location.name.clone().unwrap_or(existing.name);

                sqlx::query(
                    "UPDATE locations SET name = $1, latitude = $2, longitude = $3
                     WHERE id = $4",
                )
                .bind(&name)
                .bind(location.latitude)
                .bind(location.longitude)
                .bind(existing.id)
                .execute(&self.pool)
                .await
                .map_err(Error::Database)?;

                Ok(Location {
                    id: existing.id,
                    user_id,
                    name,
                    latitude: location.latitude,
                    longitude: location.longitude,
                    timestamp: existing.timestamp,
                })
            }
            None => self.create(user_id, location).await,
        }
    }

    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<Location>> {
        let row = sqlx::query(
            "SELECT id, user_id, name, latitude, longitude, timestamp
             FROM locations
             WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(|r| Self::row_to_location(&r)))
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(result.rows_affected() > 0)
    }
}
