//! Application state shared across handlers.

use std::sync::Arc;

use geotrail_core::Config;
use geotrail_db::Database;

/// Shared state: database context plus the process configuration built
/// once at startup.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}
