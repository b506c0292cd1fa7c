//! # geotrail-db
//!
//! PostgreSQL database layer for geotrail.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for users, tokens, locations, tracks,
//!   and track points
//! - Embedded schema migrations
//!
//! ## Example
//!
//! ```rust,ignore
//! use geotrail_db::{Database, UserRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/geotrail").await?;
//!     db.migrate().await?;
//!
//!     let user = db.users.create("rider", "rider@example.com", "hunter22").await?;
//!     println!("Created user: {}", user.id);
//!     Ok(())
//! }
//! ```

pub mod locations;
pub mod pool;
pub mod tokens;
pub mod track_points;
pub mod tracks;
pub mod users;

// Test fixtures are always compiled so integration tests (in tests/) can
// use DEFAULT_TEST_DATABASE_URL.
pub mod test_fixtures;

// Re-export core types
pub use geotrail_core::*;

pub use locations::PgLocationRepository;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};
pub use tokens::PgTokenRepository;
pub use track_points::PgTrackPointRepository;
pub use tracks::PgTrackRepository;
pub use users::PgUserRepository;

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// User accounts and credential verification.
    pub users: PgUserRepository,
    /// Bearer access tokens.
    pub tokens: PgTokenRepository,
    /// Point-in-time locations.
    pub locations: PgLocationRepository,
    /// Tracks and aggregate views.
    pub tracks: PgTrackRepository,
    /// Track point storage.
    pub track_points: PgTrackPointRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            tokens: PgTokenRepository::new(pool.clone()),
            locations: PgLocationRepository::new(pool.clone()),
            tracks: PgTrackRepository::new(pool.clone()),
            track_points: PgTrackPointRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect to PostgreSQL with default pool settings.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        Ok(Self::new(pool))
    }

    /// Run pending schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Internal(format!("Migration failed: {e}")))?;
        Ok(())
    }
}
