//! geotrail-api - HTTP API server for geotrail
//!
//! Routing, request extraction, and error mapping live here; all entity
//! semantics live in `geotrail-db` behind the repository traits.

mod error;
mod extract;
mod handlers;
mod maps;
mod state;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use geotrail_core::Config;
use geotrail_db::Database;

use handlers::{auth, health_check, locations, maps as map_views, root, tracks};
use state::AppState;

/// Initialize tracing with configurable output.
///
/// Environment variables:
///   LOG_FORMAT - "json" or "text" (default: "text")
///   RUST_LOG   - standard env filter (default: "geotrail_api=debug,tower_http=debug")
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "geotrail_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Build the CORS layer from the configured origin whitelist.
fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the application router.
fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        // Service info and health check
        .route("/", get(root))
        .route("/health", get(health_check))
        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/register-device", post(auth::register_device))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/me", get(auth::me))
        // Locations
        .route(
            "/api/v1/locations",
            get(locations::list).post(locations::create),
        )
        .route(
            "/api/v1/locations/current",
            get(locations::current).put(locations::update_current),
        )
        .route(
            "/api/v1/locations/:id",
            get(locations::get).delete(locations::delete),
        )
        // Tracks
        .route("/api/v1/tracks", get(tracks::list).post(tracks::create))
        .route("/api/v1/tracks/recent", get(tracks::recent))
        .route("/api/v1/tracks/upload", post(tracks::upload))
        .route(
            "/api/v1/tracks/load_from_tracker",
            post(tracks::load_from_tracker),
        )
        .route("/api/v1/tracks/:id", get(tracks::get).delete(tracks::delete))
        .route(
            "/api/v1/tracks/:id/points",
            get(tracks::get_points).post(tracks::add_point),
        )
        .route(
            "/api/v1/tracks/:id/points/bulk",
            post(tracks::add_points_bulk),
        )
        // Maps
        .route(
            "/api/v1/maps/current-location",
            get(map_views::current_location_map),
        )
        .route("/api/v1/maps/track/:id", get(map_views::track_map))
        .route("/api/v1/maps/tracks", get(map_views::tracks_map))
        .route("/api/v1/maps/locations", get(map_views::locations_map))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // Configuration is read once here and passed down explicitly.
    let config = Config::from_env();
    info!(
        host = %config.host,
        port = config.port,
        token_lifetime_minutes = config.token_lifetime_minutes,
        debug = config.debug,
        "Configuration loaded"
    );

    info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;
    info!("Database connected");

    info!("Running database migrations...");
    db.migrate().await?;
    info!("Database migrations complete");

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(db, config);
    let app = app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("geotrail API listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
