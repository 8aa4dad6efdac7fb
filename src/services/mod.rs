//! Domain services.
//!
//! ARCHITECTURE
//! ============
//! Services own SQL and business rules. Route handlers stay thin: they
//! extract input, call a service, and map the typed error into `ApiError`.

pub mod activity;
pub mod admin;
pub mod catalogue;
pub mod contact;
pub mod events;
pub mod lva;
pub mod mail;
pub mod news;
pub mod password;
pub mod seed;
pub mod session;
pub mod settings;
pub mod stats;
pub mod study;
pub mod verification;

/// Error shared by the content services (news, events, study, LVAs, codes,
/// settings). Details are user-facing German messages.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    Invalid(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub(crate) const NO_PERMISSION: &str = "Keine Berechtigung";

/// Deserialize a field that distinguishes "absent" (`None`) from an explicit
/// `null` (`Some(None)`). Use with `#[serde(default, deserialize_with = ...)]`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    <Option<T> as serde::Deserialize>::deserialize(deserializer).map(Some)
}

pub(crate) fn require_text(value: &str, field: &str) -> Result<(), ContentError> {
    if value.trim().is_empty() {
        return Err(ContentError::Invalid(format!("{field} darf nicht leer sein")));
    }
    Ok(())
}

/// Trim optional free text, mapping blank strings to `None`.
pub(crate) fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
