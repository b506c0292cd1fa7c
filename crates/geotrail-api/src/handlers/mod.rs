//! Request handlers, grouped by resource.

pub mod auth;
pub mod locations;
pub mod maps;
pub mod tracks;

use axum::Json;
use serde::Deserialize;

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_LIMIT: i64 = 100;

/// Skip/limit paging query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    pub limit: Option<i64>,
}

impl Pagination {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_LIMIT)
    }
}

/// Service front door: name, version, and where to look next.
pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "geotrail API",
        "version": env!("CARGO_PKG_VERSION"),
        "health": "/health",
    }))
}

/// Service health probe.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "geotrail-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let p: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(p.skip, 0);
        assert_eq!(p.limit(), DEFAULT_PAGE_LIMIT);

        let p: Pagination = serde_json::from_str(r#"{"skip": 10, "limit": 5}"#).unwrap();
        assert_eq!(p.skip, 10);
        assert_eq!(p.limit(), 5);
    }

    #[tokio::test]
    async fn test_root_and_health_payloads() {
        let Json(root) = root().await;
        assert_eq!(root["message"], "geotrail API");
        assert_eq!(root["health"], "/health");
        assert!(root["version"].is_string());

        let Json(health) = health_check().await;
        assert_eq!(health["status"], "healthy");
        assert_eq!(health["service"], "geotrail-api");
    }
}
