//! Repository traits for the entity store.
//!
//! These traits define the interfaces the PostgreSQL layer implements,
//! keeping the API crate decoupled from the storage engine. Every
//! read/write of a Location, Track, or TrackPoint is scoped by the
//! requesting user's id; "absent" and "not owned" are indistinguishable
//! to callers.

use async_trait::async_trait;
use chrono::Duration;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

/// User accounts and credential verification.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user, hashing the password with a slow adaptive scheme.
    /// Fails with `Conflict` when the username or email is already taken.
    async fn create(&self, username: &str, email: &str, password: &str) -> Result<User>;

    /// Look up a user by id.
    async fn get(&self, id: Uuid) -> Result<Option<User>>;

    /// Look up a user by username.
    async fn get_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Verify a username/password pair. An unknown username and a wrong
    /// password both fail with the same `Unauthorized` error.
    async fn verify_credentials(&self, username: &str, password: &str) -> Result<User>;
}

/// Opaque bearer access tokens.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Issue a token for a user with the given lifetime, returning the
    /// plaintext token. Only its hash is stored.
    async fn create(&self, user_id: Uuid, lifetime: Duration) -> Result<String>;

    /// Resolve a bearer token to the owning user id. `None` for unknown
    /// or expired tokens.
    async fn resolve(&self, token: &str) -> Result<Option<Uuid>>;
}

/// Point-in-time locations.
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Create a location row; the timestamp is assigned server-side here,
    /// not by the storage engine.
    async fn create(&self, user_id: Uuid, location: &LocationCreate) -> Result<Location>;

    /// List a user's locations with skip/limit paging.
    async fn list(&self, user_id: Uuid, skip: i64, limit: i64) -> Result<Vec<Location>>;

    /// The location with the greatest timestamp, or `None`.
    async fn current(&self, user_id: Uuid) -> Result<Option<Location>>;

    /// Update the current location's fields in place (id and timestamp
    /// unchanged), or create a new row when the user has none.
    async fn upsert_current(&self, user_id: Uuid, location: &LocationCreate) -> Result<Location>;

    /// Fetch one location scoped to its owner.
    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<Location>>;

    /// Delete a location scoped to its owner; false when absent/not owned.
    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool>;
}

/// Tracks and their aggregate views.
#[async_trait]
pub trait TrackRepository: Send + Sync {
    /// Create an empty track.
    async fn create(&self, user_id: Uuid, name: &str, description: Option<&str>) -> Result<Track>;

    /// Fetch one track scoped to its owner.
    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<Track>>;

    /// List a user's tracks, each annotated with its point count.
    async fn list_with_counts(&self, user_id: Uuid, skip: i64, limit: i64) -> Result<Vec<Track>>;

    /// Delete a track and all of its points in one transaction; false
    /// when absent/not owned.
    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool>;

    /// Create a track plus all of its points atomically. If anything
    /// fails after the track row is written, the whole operation rolls
    /// back. Missing point timestamps default to server-now.
    async fn create_with_points(&self, user_id: Uuid, upload: &TrackUpload) -> Result<Track>;
}

/// Track point storage. Points are never updated; they are only appended
/// and deleted via their parent track.
#[async_trait]
pub trait TrackPointRepository: Send + Sync {
    /// A track's points in stored (insertion) order. Ownership of the
    /// track must be checked by the caller beforehand.
    async fn list(&self, track_id: Uuid) -> Result<Vec<TrackPoint>>;

    /// Append one point with a server-assigned timestamp.
    async fn append_one(&self, track_id: Uuid, point: &TrackPointCreate) -> Result<TrackPoint>;

    /// Append a batch of points in order within one transaction, all
    /// timestamps server-assigned.
    async fn append_bulk(&self, track_id: Uuid, points: &[TrackPointCreate]) -> Result<usize>;

    /// Append one chunk's points in order within one transaction. Each
    /// point's own timestamp wins; missing ones default to server-now.
    async fn append_chunk(&self, track_id: Uuid, points: &[GpsPoint]) -> Result<usize>;
}
