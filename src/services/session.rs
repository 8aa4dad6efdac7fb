//! Bearer session management.
//!
//! ARCHITECTURE
//! ============
//! Admin logins mint an opaque 32-byte random token. Only its SHA-256 digest
//! is stored, so a leaked `sessions` table cannot be replayed. Tokens expire
//! after `SESSION_TTL_MINUTES`; expired rows are swept on every login.

use std::fmt::Write;

use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{PgPool, Row};

use crate::services::admin::{AdminProfile, AdminRole};

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// SHA-256 hex digest of a bearer token, used as the storage key.
#[must_use]
pub fn hash_token(token: &str) -> String {
    bytes_to_hex(&Sha256::digest(token.as_bytes()))
}

/// Create a session for the given admin, returning the plaintext token.
pub async fn create_session(pool: &PgPool, admin_id: i64, ttl_minutes: i64) -> Result<String, sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
        .execute(pool)
        .await?;

    let token = generate_token();
    sqlx::query(
        "INSERT INTO sessions (token_hash, admin_id, expires_at)
         VALUES ($1, $2, now() + make_interval(mins => $3))",
    )
    .bind(hash_token(&token))
    .bind(admin_id)
    .bind(i32::try_from(ttl_minutes).unwrap_or(i32::MAX))
    .execute(pool)
    .await?;
    Ok(token)
}

/// Validate a session token and return the associated admin.
///
/// Inactive admins are still returned; the caller decides how to reject them.
pub async fn validate_session(pool: &PgPool, token: &str) -> Result<Option<AdminProfile>, sqlx::Error> {
    let row = sqlx::query(
        r"SELECT a.id, a.username, a.email, a.display_name, a.role, a.is_master, a.is_active
          FROM sessions s
          JOIN admins a ON a.id = s.admin_id
          WHERE s.token_hash = $1 AND s.expires_at > now()",
    )
    .bind(hash_token(token))
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| AdminProfile {
        id: r.get("id"),
        username: r.get("username"),
        email: r.get("email"),
        display_name: r.get("display_name"),
        role: AdminRole::parse(r.get::<&str, _>("role")).unwrap_or(AdminRole::Editor),
        is_master: r.get("is_master"),
        is_active: r.get("is_active"),
    }))
}

/// Delete a session by token.
pub async fn delete_session(pool: &PgPool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
        .bind(hash_token(token))
        .execute(pool)
        .await?;
    Ok(())
}

/// Drop every session of an admin (after password change or deactivation).
pub async fn delete_admin_sessions(pool: &PgPool, admin_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE admin_id = $1")
        .bind(admin_id)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
