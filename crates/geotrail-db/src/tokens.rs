//! Bearer access token repository.
//!
//! Tokens are opaque `gt_at_`-prefixed random strings. Only the SHA-256
//! hash is stored; resolving a token checks the hash and expiry in one
//! query.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use geotrail_core::{Error, Result, TokenRepository};

/// Prefix identifying geotrail access tokens.
const TOKEN_PREFIX: &str = "gt_at_";

/// Length of the random token secret.
const TOKEN_SECRET_LEN: usize = 48;

/// PostgreSQL implementation of TokenRepository.
#[derive(Clone)]
pub struct PgTokenRepository {
    pool: Pool<Postgres>,
}

impl PgTokenRepository {
    /// Create a new PgTokenRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn generate_secret(length: usize) -> String {
        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
        let mut rng = rand::thread_rng();
        (0..length)
            .map(|_| {
                let idx = rng.gen_range(0..CHARSET.len());
                CHARSET[idx] as char
            })
            .collect()
    }

    fn hash_secret(secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[async_trait]
impl TokenRepository for PgTokenRepository {
    async fn create(&self, user_id: Uuid, lifetime: Duration) -> Result<String> {
        let now = Utc::now();
        let id = Uuid::now_v7();

        let token = format!("{TOKEN_PREFIX}{}", Self::generate_secret(TOKEN_SECRET_LEN));
        let token_hash = Self::hash_secret(&token);

        sqlx::query(
            "INSERT INTO auth_token (id, token_hash, user_id, expires_at, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(&token_hash)
        .bind(user_id)
        .bind(now + lifetime)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        tracing::debug!(
            subsystem = "database",
            component = "tokens",
            op = "create",
            user_id = %user_id,
            "Access token issued"
        );

        Ok(token)
    }

    async fn resolve(&self, token: &str) -> Result<Option<Uuid>> {
        if !token.starts_with(TOKEN_PREFIX) {
            return Ok(None);
        }

        let hash = Self::hash_secret(token);
        let now = Utc::now();

        let row = sqlx::query(
            "SELECT user_id FROM auth_token
             WHERE token_hash = $1 AND expires_at > $2",
        )
        .bind(&hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        if row.is_some() {
            sqlx::query("UPDATE auth_token SET last_used_at = $1 WHERE token_hash = $2")
                .bind(now)
                .bind(&hash)
                .execute(&self.pool)
                .await
                .map_err(Error::Database)?;
        }

        Ok(row.map(|r| r.get("user_id")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secret_length_and_charset() {
        let secret = PgTokenRepository::generate_secret(48);
        assert_eq!(secret.len(), 48);
        assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_secret_unique() {
        let a = PgTokenRepository::generate_secret(48);
        let b = PgTokenRepository::generate_secret(48);
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_secret_stable_hex() {
        let h1 = PgTokenRepository::hash_secret("gt_at_abc");
        let h2 = PgTokenRepository::hash_secret("gt_at_abc");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
        assert!(h1.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(h1, PgTokenRepository::hash_secret("gt_at_abd"));
    }
}
