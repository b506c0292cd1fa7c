//! # geotrail-core
//!
//! Core types, traits, and abstractions for the geotrail location
//! tracking backend.
//!
//! This crate provides the foundational data structures and trait
//! definitions that the database and API crates depend on.

pub mod config;
pub mod error;
pub mod geo;
pub mod metrics;
pub mod models;
pub mod traits;
pub mod validate;

// Re-export commonly used types at crate root
pub use config::Config;
pub use error::{Error, Result};
pub use geo::haversine_distance;
pub use metrics::{total_distance, total_duration};
pub use models::*;
pub use traits::*;
pub use validate::{
    validate_bulk_append, validate_chunk_upload, validate_coordinates, validate_email,
    validate_password, validate_points, validate_track_name, validate_track_upload,
    validate_username, MAX_BULK_APPEND_POINTS, MAX_TRACK_UPLOAD_POINTS,
};
