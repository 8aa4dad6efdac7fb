//! Admin accounts: login, password changes, account management and the
//! env-synced master admin.
//!
//! DESIGN
//! ======
//! Exactly one row carries `is_master`. It is created or re-synced from the
//! `MASTER_ADMIN_*` variables on every startup, cannot be deleted or
//! deactivated, and cannot change its own password through the API.
//!
//! PERMISSIONS
//! ===========
//! - list: master or admin role
//! - create / delete: master only
//! - update: master, or the admin editing their own profile; role and
//!   `is_active` are only applied when the actor is master and the target is
//!   not the master row

use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use time::OffsetDateTime;

use crate::config::AppConfig;
use crate::services::password::{self, MIN_PASSWORD_LEN};
use crate::services::{activity, session, verification};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("Ungültige Anmeldedaten")]
    InvalidCredentials,
    #[error("Account ist deaktiviert")]
    Deactivated,
    #[error("Admin nicht gefunden")]
    NotFound,
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    Invalid(String),
    #[error("password hash error: {0}")]
    Hash(#[from] password::PasswordError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    Master,
    Admin,
    Editor,
}

impl AdminRole {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Admin => "admin",
            Self::Editor => "editor",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "master" => Some(Self::Master),
            "admin" => Some(Self::Admin),
            "editor" => Some(Self::Editor),
            _ => None,
        }
    }
}

/// The authenticated admin as seen by handlers and `GET /api/auth/me`.
#[derive(Debug, Clone, Serialize)]
pub struct AdminProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub role: AdminRole,
    pub is_master: bool,
    #[serde(skip)]
    pub is_active: bool,
}

impl AdminProfile {
    #[must_use]
    pub fn is_master_role(&self) -> bool {
        self.role == AdminRole::Master
    }

    #[must_use]
    pub fn can_manage_admins(&self) -> bool {
        matches!(self.role, AdminRole::Master | AdminRole::Admin)
    }
}

/// Full admin record for the admin management screens.
#[derive(Debug, Clone, Serialize)]
pub struct AdminRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub role: AdminRole,
    pub is_active: bool,
    pub is_master: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: String,
    #[serde(default = "default_role")]
    pub role: AdminRole,
}

fn default_role() -> AdminRole {
    AdminRole::Admin
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminPatch {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub role: Option<AdminRole>,
    pub is_active: Option<bool>,
}

const ADMIN_COLUMNS: &str =
    "id, username, email, display_name, role, is_active, is_master, created_at, last_login";

fn record_from_row(r: &sqlx::postgres::PgRow) -> AdminRecord {
    AdminRecord {
        id: r.get("id"),
        username: r.get("username"),
        email: r.get("email"),
        display_name: r.get("display_name"),
        role: AdminRole::parse(r.get::<&str, _>("role")).unwrap_or(AdminRole::Editor),
        is_active: r.get("is_active"),
        is_master: r.get("is_master"),
        created_at: r.get("created_at"),
        last_login: r.get("last_login"),
    }
}

async fn fetch_record(pool: &PgPool, admin_id: i64) -> Result<Option<AdminRecord>, sqlx::Error> {
    let row = sqlx::query(&format!("SELECT {ADMIN_COLUMNS} FROM admins WHERE id = $1"))
        .bind(admin_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(record_from_row))
}

// =============================================================================
// AUTH
// =============================================================================

/// Authenticate by username or email and open a session.
///
/// # Errors
///
/// `InvalidCredentials` for unknown users or wrong passwords, `Deactivated`
/// for disabled accounts.
pub async fn login(
    pool: &PgPool,
    username_or_email: &str,
    password: &str,
    session_ttl_minutes: i64,
) -> Result<(String, AdminProfile), AdminError> {
    let login = username_or_email.trim();
    let row = sqlx::query(
        r"SELECT id, username, email, display_name, role, is_master, is_active, password_hash
          FROM admins
          WHERE username = $1 OR lower(email) = lower($1)
          ORDER BY (username = $1) DESC
          LIMIT 1",
    )
    .bind(login)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Err(AdminError::InvalidCredentials);
    };
    let stored_hash: String = row.get("password_hash");
    if !password::verify_password(password, &stored_hash) {
        return Err(AdminError::InvalidCredentials);
    }

    let profile = AdminProfile {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        display_name: row.get("display_name"),
        role: AdminRole::parse(row.get::<&str, _>("role")).unwrap_or(AdminRole::Editor),
        is_master: row.get("is_master"),
        is_active: row.get("is_active"),
    };
    if !profile.is_active {
        return Err(AdminError::Deactivated);
    }

    sqlx::query("UPDATE admins SET last_login = now() WHERE id = $1")
        .bind(profile.id)
        .execute(pool)
        .await?;

    let token = session::create_session(pool, profile.id, session_ttl_minutes).await?;
    activity::record(
        pool,
        Some(profile.id),
        "LOGIN",
        &format!("{} hat sich angemeldet", profile.display_name),
        None,
    )
    .await;

    tracing::info!(admin_id = profile.id, username = %profile.username, "admin logged in");
    Ok((token, profile))
}

/// Change the actor's own password.
///
/// # Errors
///
/// `Forbidden` for the master admin, `Invalid` for a wrong current password
/// or a too-short new password.
pub async fn change_password(
    pool: &PgPool,
    actor: &AdminProfile,
    current_password: &str,
    new_password: &str,
) -> Result<(), AdminError> {
    if actor.is_master {
        return Err(AdminError::Forbidden(
            "Der Master admin ist nicht befugt sein Passwort zu ändern. Verwaltung liegt bei Astra Capital e.U.",
        ));
    }

    let stored_hash: String = sqlx::query_scalar("SELECT password_hash FROM admins WHERE id = $1")
        .bind(actor.id)
        .fetch_optional(pool)
        .await?
        .ok_or(AdminError::NotFound)?;
    if !password::verify_password(current_password, &stored_hash) {
        return Err(AdminError::Invalid("Aktuelles Passwort ist falsch".into()));
    }
    validate_password(new_password)?;

    let new_hash = password::hash_password(new_password)?;
    sqlx::query("UPDATE admins SET password_hash = $2 WHERE id = $1")
        .bind(actor.id)
        .bind(new_hash)
        .execute(pool)
        .await?;

    activity::record(
        pool,
        Some(actor.id),
        "PASSWORD_CHANGE",
        &format!("{} hat das Passwort geändert", actor.display_name),
        None,
    )
    .await;
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AdminError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AdminError::Invalid(format!(
            "Passwort muss mindestens {MIN_PASSWORD_LEN} Zeichen lang sein"
        )));
    }
    Ok(())
}

// =============================================================================
// ADMIN MANAGEMENT
// =============================================================================

/// List all admins.
///
/// # Errors
///
/// `Forbidden` for editors.
pub async fn list_admins(pool: &PgPool, actor: &AdminProfile) -> Result<Vec<AdminRecord>, AdminError> {
    if !actor.can_manage_admins() {
        return Err(AdminError::Forbidden(crate::services::NO_PERMISSION));
    }
    let rows = sqlx::query(&format!("SELECT {ADMIN_COLUMNS} FROM admins ORDER BY id"))
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(record_from_row).collect())
}

/// Create a new (non-master) admin.
///
/// # Errors
///
/// `Forbidden` unless the actor is master; `Invalid` for duplicate
/// username/email, malformed email, weak password or the `master` role.
pub async fn create_admin(pool: &PgPool, actor: &AdminProfile, input: NewAdmin) -> Result<AdminRecord, AdminError> {
    if !actor.is_master_role() {
        return Err(AdminError::Forbidden("Nur Master-Admin kann Admins erstellen"));
    }

    let username = input.username.trim();
    if username.is_empty() {
        return Err(AdminError::Invalid("Benutzername darf nicht leer sein".into()));
    }
    let email = verification::normalize_email(&input.email)
        .ok_or_else(|| AdminError::Invalid("Ungültige E-Mail-Adresse".into()))?;
    if input.role == AdminRole::Master {
        return Err(AdminError::Invalid("Es kann nur einen Master-Admin geben".into()));
    }
    validate_password(&input.password)?;

    if username_taken(pool, username, None).await? {
        return Err(AdminError::Invalid("Benutzername bereits vergeben".into()));
    }
    if email_taken(pool, &email, None).await? {
        return Err(AdminError::Invalid("E-Mail bereits vergeben".into()));
    }

    let password_hash = password::hash_password(&input.password)?;
    let display_name = input.display_name.trim();
    let row = sqlx::query(&format!(
        "INSERT INTO admins (username, email, password_hash, display_name, role, is_master)
         VALUES ($1, $2, $3, $4, $5, FALSE)
         RETURNING {ADMIN_COLUMNS}"
    ))
    .bind(username)
    .bind(&email)
    .bind(password_hash)
    .bind(if display_name.is_empty() { username } else { display_name })
    .bind(input.role.as_str())
    .fetch_one(pool)
    .await?;
    let record = record_from_row(&row);

    activity::record(
        pool,
        Some(actor.id),
        "ADMIN_CREATE",
        &format!("Admin '{}' erstellt", record.display_name),
        Some(("admin", record.id)),
    )
    .await;
    Ok(record)
}

/// Update an admin's profile, role or active flag.
///
/// # Errors
///
/// `NotFound`, `Forbidden` (non-master editing someone else), or `Invalid`
/// when trying to deactivate the master admin or reuse an email.
pub async fn update_admin(
    pool: &PgPool,
    actor: &AdminProfile,
    admin_id: i64,
    patch: AdminPatch,
) -> Result<AdminRecord, AdminError> {
    let target = fetch_record(pool, admin_id).await?.ok_or(AdminError::NotFound)?;

    if !actor.is_master_role() && actor.id != admin_id {
        return Err(AdminError::Forbidden(crate::services::NO_PERMISSION));
    }
    if target.is_master && patch.is_active == Some(false) {
        return Err(AdminError::Invalid("Master-Admin kann nicht deaktiviert werden".into()));
    }

    let email = match patch.email.as_deref() {
        Some(raw) => {
            let email = verification::normalize_email(raw)
                .ok_or_else(|| AdminError::Invalid("Ungültige E-Mail-Adresse".into()))?;
            if email_taken(pool, &email, Some(admin_id)).await? {
                return Err(AdminError::Invalid("E-Mail bereits vergeben".into()));
            }
            Some(email)
        }
        None => None,
    };

    let master_may_manage = actor.is_master_role() && !target.is_master;
    let role = patch
        .role
        .filter(|r| master_may_manage && *r != AdminRole::Master)
        .map(AdminRole::as_str);
    let is_active = patch.is_active.filter(|_| master_may_manage);
    let display_name = patch
        .display_name
        .map(|n| n.trim().to_owned())
        .filter(|n| !n.is_empty());

    let row = sqlx::query(&format!(
        "UPDATE admins SET
             email = COALESCE($2, email),
             display_name = COALESCE($3, display_name),
             role = COALESCE($4, role),
             is_active = COALESCE($5, is_active)
         WHERE id = $1
         RETURNING {ADMIN_COLUMNS}"
    ))
    .bind(admin_id)
    .bind(email)
    .bind(display_name)
    .bind(role)
    .bind(is_active)
    .fetch_one(pool)
    .await?;
    let record = record_from_row(&row);

    if is_active == Some(false) {
        session::delete_admin_sessions(pool, admin_id).await?;
    }

    activity::record(
        pool,
        Some(actor.id),
        "ADMIN_UPDATE",
        &format!("Admin '{}' aktualisiert", record.display_name),
        Some(("admin", record.id)),
    )
    .await;
    Ok(record)
}

/// Delete a non-master admin.
///
/// # Errors
///
/// `Forbidden` unless the actor is master, `NotFound`, or `Invalid` for the
/// master row.
pub async fn delete_admin(pool: &PgPool, actor: &AdminProfile, admin_id: i64) -> Result<(), AdminError> {
    if !actor.is_master_role() {
        return Err(AdminError::Forbidden("Nur Master-Admin kann Admins löschen"));
    }
    let target = fetch_record(pool, admin_id).await?.ok_or(AdminError::NotFound)?;
    if target.is_master {
        return Err(AdminError::Invalid("Master-Admin kann nicht gelöscht werden".into()));
    }

    sqlx::query("DELETE FROM admins WHERE id = $1")
        .bind(admin_id)
        .execute(pool)
        .await?;

    activity::record(
        pool,
        Some(actor.id),
        "ADMIN_DELETE",
        &format!("Admin '{}' gelöscht", target.display_name),
        None,
    )
    .await;
    Ok(())
}

async fn username_taken(pool: &PgPool, username: &str, except: Option<i64>) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM admins WHERE username = $1 AND ($2::bigint IS NULL OR id <> $2))")
        .bind(username)
        .bind(except)
        .fetch_one(pool)
        .await
}

async fn email_taken(pool: &PgPool, email: &str, except: Option<i64>) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM admins WHERE lower(email) = lower($1) AND ($2::bigint IS NULL OR id <> $2))",
    )
    .bind(email)
    .bind(except)
    .fetch_one(pool)
    .await
}

// =============================================================================
// MASTER ADMIN
// =============================================================================

/// Create the master admin, or re-sync its username, email and password
/// from configuration.
///
/// Without `MASTER_ADMIN_PASSWORD` an existing master keeps its password and
/// a missing master is not created.
///
/// # Errors
///
/// Returns an error if hashing or the database fails.
pub async fn ensure_master_admin(pool: &PgPool, config: &AppConfig) -> Result<(), AdminError> {
    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM admins WHERE is_master LIMIT 1")
        .fetch_optional(pool)
        .await?;

    let password_hash = match config.master_password.as_deref() {
        Some(pw) => Some(password::hash_password(pw)?),
        None => None,
    };

    match (existing, password_hash) {
        (Some(id), hash) => {
            sqlx::query(
                "UPDATE admins SET username = $2, email = $3,
                     password_hash = COALESCE($4, password_hash),
                     role = 'master', is_active = TRUE
                 WHERE id = $1",
            )
            .bind(id)
            .bind(&config.master_username)
            .bind(&config.master_email)
            .bind(hash)
            .execute(pool)
            .await?;
            tracing::info!(username = %config.master_username, "master admin synced");
        }
        (None, Some(hash)) => {
            sqlx::query(
                "INSERT INTO admins (username, email, password_hash, display_name, role, is_master, is_active)
                 VALUES ($1, $2, $3, 'Master Administrator', 'master', TRUE, TRUE)",
            )
            .bind(&config.master_username)
            .bind(&config.master_email)
            .bind(hash)
            .execute(pool)
            .await?;
            tracing::info!(username = %config.master_username, "master admin created");
        }
        (None, None) => {
            tracing::warn!("MASTER_ADMIN_PASSWORD not set; no master admin created");
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "admin_test.rs"]
mod tests;
