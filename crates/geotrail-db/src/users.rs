//! User repository implementation.
//!
//! Passwords are stored as salted Argon2id PHC strings and verified with
//! the same scheme; plaintext never touches the database.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use geotrail_core::{Error, Result, User, UserRepository};

/// PostgreSQL implementation of UserRepository.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    /// Create a new PgUserRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| Error::Internal(format!("Password hashing failed: {e}")))
    }

    fn verify_password(password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Pick the conflict message from the unique index that fired, so a
    /// concurrent registration losing the insert race reports the same
    /// field the pre-checks would have.
    fn conflict_for_unique_violation(constraint: Option<&str>) -> Error {
        match constraint {
            Some(c) if c.contains("email") => {
                Error::Conflict("Email already registered".to_string())
            }
            _ => Error::Conflict("Username already taken".to_string()),
        }
    }

    fn row_to_user(row: &sqlx::postgres::PgRow) -> User {
        User {
            id: row.get("id"),
            username: row.get("username"),
            email: row.get("email"),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, username: &str, email: &str, password: &str) -> Result<User> {
        // Pre-checks pick which conflict message the client sees; the
        // unique indexes back-stop concurrent registrations.
        let email_taken = sqlx::query("SELECT 1 FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        if email_taken.is_some() {
            return Err(Error::Conflict("Email already registered".to_string()));
        }

        let username_taken = sqlx::query("SELECT 1 FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        if username_taken.is_some() {
            return Err(Error::Conflict("Username already taken".to_string()));
        }

        let id = Uuid::now_v7();
        let now = Utc::now();
        let password_hash = Self::hash_password(password)?;

        let insert = sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(username)
        .bind(email)
        .bind(&password_hash)
        .bind(now)
        .execute(&self.pool)
        .await;

        if let Err(e) = insert {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return Err(Self::conflict_for_unique_violation(db_err.constraint()));
                }
            }
            return Err(Error::Database(e));
        }

        tracing::info!(
            subsystem = "database",
            component = "users",
            op = "create",
            user_id = %id,
            "User created"
        );

        Ok(User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            created_at: now,
        })
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, username, email, created_at FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row.map(|r| Self::row_to_user(&r)))
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let row =
            sqlx::query("SELECT id, username, email, created_at FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await
                .map_err(Error::Database)?;

        Ok(row.map(|r| Self::row_to_user(&r)))
    }

    async fn verify_credentials(&self, username: &str, password: &str) -> Result<User> {
        let row = sqlx::query(
            "SELECT id, username, email, password_hash, created_at
             FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        // Unknown user and bad password produce the same error.
        let auth_failure = || Error::Unauthorized("Incorrect username or password".to_string());

        let row = row.ok_or_else(auth_failure)?;
        let hash: String = row.get("password_hash");
        if !Self::verify_password(password, &hash) {
            return Err(auth_failure());
        }

        Ok(Self::row_to_user(&row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = PgUserRepository::hash_password("tracker123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(PgUserRepository::verify_password("tracker123", &hash));
        assert!(!PgUserRepository::verify_password("tracker124", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = PgUserRepository::hash_password("same-password").unwrap();
        let b = PgUserRepository::hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!PgUserRepository::verify_password("pw", "not-a-phc-string"));
    }

    #[test]
    fn test_unique_violation_message_follows_constraint() {
        let err = PgUserRepository::conflict_for_unique_violation(Some("users_email_key"));
        assert_eq!(err.to_string(), "Conflict: Email already registered");

        let err = PgUserRepository::conflict_for_unique_violation(Some("users_username_key"));
        assert_eq!(err.to_string(), "Conflict: Username already taken");

        // No constraint name reported: fall back to the username message.
        let err = PgUserRepository::conflict_for_unique_violation(None);
        assert_eq!(err.to_string(), "Conflict: Username already taken");
    }
}
