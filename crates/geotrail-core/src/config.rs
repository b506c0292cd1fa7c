//! Process configuration.
//!
//! A `Config` is constructed once in `main` from environment variables and
//! handed to the components that need it. There is no ambient global
//! settings object; everything downstream receives the struct explicitly.

use chrono::Duration;

/// Default access token lifetime in minutes.
pub const DEFAULT_TOKEN_LIFETIME_MINUTES: i64 = 30;

/// Default bind port.
pub const DEFAULT_PORT: u16 = 3000;

/// Server configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Lifetime of issued access tokens, in minutes.
    pub token_lifetime_minutes: i64,
    /// Allowed CORS origins.
    pub allowed_origins: Vec<String>,
    /// When true, error responses include internal detail.
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/geotrail".to_string(),
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            token_lifetime_minutes: DEFAULT_TOKEN_LIFETIME_MINUTES,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            debug: false,
        }
    }
}

impl Config {
    /// Build configuration from environment variables, falling back to
    /// defaults for anything unset.
    ///
    /// Variables: `DATABASE_URL`, `HOST`, `PORT`, `TOKEN_LIFETIME_MINUTES`,
    /// `ALLOWED_ORIGINS` (comma-separated), `DEBUG`.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            token_lifetime_minutes: std::env::var("TOKEN_LIFETIME_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.token_lifetime_minutes),
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|v| parse_origins(&v))
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.allowed_origins),
            debug: std::env::var("DEBUG")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.debug),
        }
    }

    /// Access token lifetime as a chrono duration.
    pub fn token_lifetime(&self) -> Duration {
        Duration::minutes(self.token_lifetime_minutes)
    }

    /// Access token lifetime in seconds, as reported to login clients.
    pub fn token_lifetime_seconds(&self) -> i64 {
        self.token_lifetime_minutes * 60
    }
}

/// Parse a comma-separated origin list, dropping empty entries.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.token_lifetime_minutes, 30);
        assert!(!config.debug);
        assert_eq!(config.allowed_origins.len(), 2);
    }

    #[test]
    fn test_token_lifetime_seconds() {
        let config = Config::default();
        assert_eq!(config.token_lifetime_seconds(), 1800);
        assert_eq!(config.token_lifetime(), Duration::minutes(30));
    }

    #[test]
    fn test_parse_origins() {
        let origins = parse_origins("http://a.example, http://b.example ,,");
        assert_eq!(origins, vec!["http://a.example", "http://b.example"]);
    }

    #[test]
    fn test_parse_origins_empty() {
        assert!(parse_origins("").is_empty());
        assert!(parse_origins(" , ").is_empty());
    }
}
