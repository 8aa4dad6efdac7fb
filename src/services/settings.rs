//! Key/value application settings stored in `app_settings`.
//!
//! Anyone signed in may read a setting; only the master role writes. A
//! missing key reads as `null` rather than 404 so the admin UI can show an
//! empty field.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::services::admin::AdminProfile;
use crate::services::{ContentError, activity};

/// Comma separated recipients of the public contact form.
pub const CONTACT_EMAILS_KEY: &str = "contact_emails";

const MASTER_ONLY: &str = "Nur Master-Admin kann Einstellungen ändern";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Setting {
    pub key: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingUpdate {
    #[serde(default)]
    pub value: Option<String>,
}

pub async fn get(pool: &PgPool, key: &str) -> Result<Setting, ContentError> {
    let value: Option<Option<String>> = sqlx::query_scalar("SELECT value FROM app_settings WHERE key = $1")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(Setting { key: key.to_owned(), value: value.flatten() })
}

/// Create or overwrite a setting.
///
/// # Errors
///
/// `Forbidden` unless the actor has the master role.
pub async fn set(pool: &PgPool, actor: &AdminProfile, key: &str, value: Option<String>) -> Result<Setting, ContentError> {
    if !actor.is_master_role() {
        return Err(ContentError::Forbidden(MASTER_ONLY));
    }
    let key = key.trim();
    if key.is_empty() {
        return Err(ContentError::Invalid("Schlüssel darf nicht leer sein".into()));
    }

    sqlx::query(
        "INSERT INTO app_settings (key, value) VALUES ($1, $2)
         ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = now()",
    )
    .bind(key)
    .bind(value.as_deref())
    .execute(pool)
    .await?;

    let shown = value.as_deref().filter(|v| !v.is_empty()).unwrap_or("(leer)");
    activity::record(
        pool,
        Some(actor.id),
        "SETTINGS_UPDATE",
        &format!("Einstellung '{key}' aktualisiert auf: {shown}"),
        None,
    )
    .await;
    tracing::info!(admin_id = actor.id, key, "setting updated");

    Ok(Setting { key: key.to_owned(), value })
}

/// Split a comma separated address list, dropping blanks.
#[must_use]
pub fn split_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_owned)
        .collect()
}

pub async fn contact_recipients(pool: &PgPool) -> Result<Vec<String>, ContentError> {
    let setting = get(pool, CONTACT_EMAILS_KEY).await?;
    Ok(setting.value.as_deref().map(split_recipients).unwrap_or_default())
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
