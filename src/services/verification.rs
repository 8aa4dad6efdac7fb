//! Anonymous LVA rating verification.
//!
//! DESIGN
//! ======
//! A student requests a short code for one LVA; the code is mailed to their
//! university address and the address is never linked to the rating.
//! Admin ("universal") codes work for any LVA and carry a use budget.
//!
//! Code lookup and consumption run in one transaction with the admin code
//! row locked, so concurrent submissions cannot overspend a budget.

use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use time::OffsetDateTime;

use crate::rate_limit::RateLimitError;
use crate::services::admin::AdminProfile;
use crate::services::mail;
use crate::services::{ContentError, activity, clean_optional};
use crate::state::AppState;

pub const CODE_LEN: usize = 5;
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const CODE_NOT_FOUND: &str = "Code nicht gefunden";
const MAX_GENERATE_ATTEMPTS: usize = 16;
const MAX_EXPIRY_DAYS: i64 = 3650;

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("Ungültige E-Mail-Adresse")]
    InvalidEmail,
    #[error(
        "Du bist nicht berechtigt. Erlaubte E-Mail-Endungen: {domains}. Bei Fragen melde dich unter wirtschaft@oeh.jku.at"
    )]
    DomainNotAllowed { domains: String },
    #[error("LVA nicht gefunden")]
    LvaNotFound,
    #[error("Zu viele Anfragen. Bitte warte einige Minuten und versuche es erneut.")]
    RateLimited(#[source] RateLimitError),
    #[error("E-Mail konnte nicht gesendet werden. Bitte versuche es später erneut.")]
    MailFailed(String),
    #[error("Bewertungen müssen zwischen 1 und 5 liegen")]
    RatingOutOfRange,
    #[error("Code wurde bereits vollständig verwendet")]
    CodeExhausted,
    #[error("Code ist abgelaufen. Bitte fordere einen neuen Code an.")]
    CodeExpired,
    #[error("Ungültiger Code")]
    InvalidCode,
    #[error("Ungültiger oder bereits verwendeter Code")]
    InvalidOrUsedCode,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

// =============================================================================
// NORMALIZATION
// =============================================================================

/// Trimmed, lowercased address with exactly one `@` and non-empty parts.
#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_lowercase();
    let (local, domain) = normalized.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') || normalized.contains(char::is_whitespace) {
        return None;
    }
    Some(normalized)
}

/// Uppercase code of `CODE_LEN` characters from `CODE_ALPHABET`.
#[must_use]
pub fn normalize_code(code: &str) -> Option<String> {
    let normalized = code.trim().to_ascii_uppercase();
    if normalized.len() != CODE_LEN || !normalized.bytes().all(|b| CODE_ALPHABET.contains(&b)) {
        return None;
    }
    Some(normalized)
}

#[must_use]
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LEN)
        .map(|_| char::from(CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())]))
        .collect()
}

#[must_use]
pub fn domain_allowed(email: &str, domains: &[String]) -> bool {
    domains.iter().any(|d| email.ends_with(d.as_str()))
}

// =============================================================================
// REQUEST TYPES
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CodeRequest {
    pub email: String,
    pub lva_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodeCheck {
    pub email: Option<String>,
    pub code: String,
    pub lva_id: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RatingSubmission {
    pub email: Option<String>,
    pub code: String,
    pub lva_id: i64,
    pub effort_rating: i32,
    pub difficulty_rating: i32,
}

/// Which kind of code matched a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedCode {
    User { id: i64 },
    Admin { id: i64 },
}

impl MatchedCode {
    #[must_use]
    pub fn is_admin_code(self) -> bool {
        matches!(self, Self::Admin { .. })
    }
}

// =============================================================================
// CODE CHECKS
// =============================================================================

fn check_expiry(expires_at: OffsetDateTime, now: OffsetDateTime) -> Result<(), VerificationError> {
    if expires_at < now {
        return Err(VerificationError::CodeExpired);
    }
    Ok(())
}

fn check_admin_budget(
    max_uses: i32,
    use_count: i32,
    expires_at: OffsetDateTime,
    now: OffsetDateTime,
) -> Result<(), VerificationError> {
    if use_count >= max_uses.max(1) {
        return Err(VerificationError::CodeExhausted);
    }
    check_expiry(expires_at, now)
}

#[must_use]
pub fn valid_rating(value: i32) -> bool {
    (1..=5).contains(&value)
}

/// Look up a user code first (when an email is given), then an admin code.
/// Admin code rows are locked until the surrounding transaction ends.
async fn find_code(
    conn: &mut PgConnection,
    email: Option<&str>,
    code: &str,
    lva_id: i64,
    not_found: VerificationError,
) -> Result<MatchedCode, VerificationError> {
    let Some(code) = normalize_code(code) else {
        return Err(not_found);
    };
    let now = OffsetDateTime::now_utc();

    if let Some(email) = email.and_then(normalize_email) {
        let user: Option<(i64, OffsetDateTime)> = sqlx::query_as(
            "SELECT id, expires_at FROM verification_codes
             WHERE email = $1 AND code = $2 AND lva_id = $3 AND NOT is_used AND NOT is_admin_code
             ORDER BY created_at DESC
             LIMIT 1",
        )
        .bind(&email)
        .bind(&code)
        .bind(lva_id)
        .fetch_optional(&mut *conn)
        .await?;
        if let Some((id, expires_at)) = user {
            check_expiry(expires_at, now)?;
            return Ok(MatchedCode::User { id });
        }
    }

    let admin: Option<(i64, i32, i32, OffsetDateTime)> = sqlx::query_as(
        "SELECT id, max_uses, use_count, expires_at FROM verification_codes
         WHERE code = $1 AND is_admin_code
         FOR UPDATE",
    )
    .bind(&code)
    .fetch_optional(&mut *conn)
    .await?;
    match admin {
        Some((id, max_uses, use_count, expires_at)) => {
            check_admin_budget(max_uses, use_count, expires_at, now)?;
            Ok(MatchedCode::Admin { id })
        }
        None => Err(not_found),
    }
}

// =============================================================================
// PUBLIC FLOW
// =============================================================================

/// Issue a new code for `(email, lva)` and mail it. Returns the validity in
/// minutes.
pub async fn request_code(state: &AppState, request: CodeRequest) -> Result<i64, VerificationError> {
    let config = &state.config;
    let email = normalize_email(&request.email).ok_or(VerificationError::InvalidEmail)?;
    if !domain_allowed(&email, &config.allowed_email_domains) {
        return Err(VerificationError::DomainNotAllowed { domains: config.allowed_email_domains.join(", ") });
    }
    state
        .rate_limiter
        .check_and_record(&email)
        .map_err(VerificationError::RateLimited)?;

    let lva_name: Option<String> = sqlx::query_scalar("SELECT name FROM lvas WHERE id = $1 AND is_active")
        .bind(request.lva_id)
        .fetch_optional(&state.pool)
        .await?;
    let lva_name = lva_name.ok_or(VerificationError::LvaNotFound)?;

    let code = generate_code();
    let mut tx = state.pool.begin().await?;
    sqlx::query(
        "UPDATE verification_codes SET is_used = TRUE
         WHERE email = $1 AND lva_id = $2 AND NOT is_used AND NOT is_admin_code",
    )
    .bind(&email)
    .bind(request.lva_id)
    .execute(&mut *tx)
    .await?;
    sqlx::query(
        "INSERT INTO verification_codes (email, code, lva_id, expires_at)
         VALUES ($1, $2, $3, now() + make_interval(mins => $4))",
    )
    .bind(&email)
    .bind(&code)
    .bind(request.lva_id)
    .bind(i32::try_from(config.code_ttl_minutes).unwrap_or(i32::MAX))
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    match &state.mailer {
        Some(mailer) => {
            let message = mail::verification_mail(&email, &code, &lva_name, config.code_ttl_minutes);
            mailer
                .send(message)
                .await
                .map_err(|e| VerificationError::MailFailed(e.to_string()))?;
        }
        None => {
            tracing::warn!(lva_id = request.lva_id, "mail not configured; verification code not delivered");
            tracing::debug!(code = %code, "undelivered verification code");
        }
    }

    tracing::info!(lva_id = request.lva_id, "verification code issued");
    Ok(config.code_ttl_minutes)
}

/// Check a code without consuming it.
pub async fn verify_code(pool: &PgPool, check: CodeCheck) -> Result<MatchedCode, VerificationError> {
    let mut tx = pool.begin().await?;
    let matched = find_code(
        &mut tx,
        check.email.as_deref(),
        &check.code,
        check.lva_id,
        VerificationError::InvalidCode,
    )
    .await?;
    tx.rollback().await?;
    Ok(matched)
}

/// Consume a code and store the rating. The rating row carries no email.
pub async fn submit_rating(pool: &PgPool, submission: RatingSubmission) -> Result<(), VerificationError> {
    if !valid_rating(submission.effort_rating) || !valid_rating(submission.difficulty_rating) {
        return Err(VerificationError::RatingOutOfRange);
    }

    let mut tx = pool.begin().await?;
    let matched = find_code(
        &mut tx,
        submission.email.as_deref(),
        &submission.code,
        submission.lva_id,
        VerificationError::InvalidOrUsedCode,
    )
    .await?;

    let lva_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM lvas WHERE id = $1)")
        .bind(submission.lva_id)
        .fetch_one(&mut *tx)
        .await?;
    if !lva_exists {
        return Err(VerificationError::LvaNotFound);
    }

    match matched {
        MatchedCode::User { id } => {
            sqlx::query("UPDATE verification_codes SET is_used = TRUE, use_count = use_count + 1 WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        MatchedCode::Admin { id } => {
            sqlx::query(
                "UPDATE verification_codes
                 SET use_count = use_count + 1,
                     is_used = (use_count + 1 >= max_uses)
                 WHERE id = $1",
            )
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }
    }

    sqlx::query("INSERT INTO lva_ratings (lva_id, effort_rating, difficulty_rating) VALUES ($1, $2, $3)")
        .bind(submission.lva_id)
        .bind(submission.effort_rating)
        .bind(submission.difficulty_rating)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!(lva_id = submission.lva_id, admin_code = matched.is_admin_code(), "rating submitted");
    Ok(())
}

// =============================================================================
// ADMIN CODES
// =============================================================================

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AdminCode {
    pub id: i64,
    pub code: String,
    pub name: Option<String>,
    pub max_uses: i32,
    pub use_count: i32,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminCodeInput {
    pub name: Option<String>,
    #[serde(default = "default_max_uses")]
    pub max_uses: i32,
    #[serde(default = "default_expires_in_days")]
    pub expires_in_days: i64,
}

fn default_max_uses() -> i32 {
    1
}

fn default_expires_in_days() -> i64 {
    30
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminCodePatch {
    pub max_uses: Option<i32>,
    pub expires_in_days: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedCode {
    pub id: i64,
    pub code: String,
    pub name: Option<String>,
    pub max_uses: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

/// A code's budget never drops below one or below what was already used.
#[must_use]
pub fn clamp_max_uses(requested: i32, use_count: i32) -> i32 {
    requested.max(1).max(use_count)
}

fn expiry_days(requested: i64) -> i32 {
    i32::try_from(requested.clamp(1, MAX_EXPIRY_DAYS)).unwrap_or(1)
}

pub async fn list_admin_codes(pool: &PgPool) -> Result<Vec<AdminCode>, ContentError> {
    Ok(sqlx::query_as::<_, AdminCode>(
        "SELECT id, code, name, max_uses, use_count,
                (use_count < max_uses AND expires_at > now()) AS is_active,
                expires_at, created_at
         FROM verification_codes
         WHERE is_admin_code
         ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?)
}

pub async fn create_admin_code(
    pool: &PgPool,
    actor: &AdminProfile,
    input: AdminCodeInput,
) -> Result<CreatedCode, ContentError> {
    let name = clean_optional(input.name);
    let max_uses = clamp_max_uses(input.max_uses, 0);
    let days = expiry_days(input.expires_in_days);

    for _ in 0..MAX_GENERATE_ATTEMPTS {
        let code = generate_code();
        let taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM verification_codes WHERE code = $1)")
            .bind(&code)
            .fetch_one(pool)
            .await?;
        if taken {
            continue;
        }

        let inserted: Option<(i64, OffsetDateTime)> = sqlx::query_as(
            "INSERT INTO verification_codes
                 (code, name, max_uses, use_count, is_admin_code, created_by_admin_id, expires_at)
             VALUES ($1, $2, $3, 0, TRUE, $4, now() + make_interval(days => $5))
             ON CONFLICT (code) WHERE is_admin_code DO NOTHING
             RETURNING id, expires_at",
        )
        .bind(&code)
        .bind(&name)
        .bind(max_uses)
        .bind(actor.id)
        .bind(days)
        .fetch_optional(pool)
        .await?;
        let Some((id, expires_at)) = inserted else {
            continue;
        };

        let name_info = name.as_deref().map(|n| format!(" ({n})")).unwrap_or_default();
        activity::record(
            pool,
            Some(actor.id),
            "CODE_CREATE",
            &format!("Admin-Code erstellt: {code}{name_info} (max. {max_uses}x)"),
            Some(("code", id)),
        )
        .await;
        return Ok(CreatedCode { id, code, name, max_uses, expires_at });
    }

    tracing::error!("could not generate a unique admin code");
    Err(ContentError::Invalid("Code konnte nicht erzeugt werden. Bitte erneut versuchen.".into()))
}

pub async fn update_admin_code(
    pool: &PgPool,
    actor: &AdminProfile,
    code_id: i64,
    patch: AdminCodePatch,
) -> Result<(), ContentError> {
    let row: Option<(String, i32)> =
        sqlx::query_as("SELECT code, use_count FROM verification_codes WHERE id = $1 AND is_admin_code")
            .bind(code_id)
            .fetch_optional(pool)
            .await?;
    let (code, use_count) = row.ok_or(ContentError::NotFound(CODE_NOT_FOUND))?;

    let max_uses = patch.max_uses.map(|m| clamp_max_uses(m, use_count));
    sqlx::query(
        "UPDATE verification_codes SET
             max_uses = COALESCE($2, max_uses),
             is_used = CASE WHEN $2::INTEGER IS NULL THEN is_used ELSE use_count >= $2 END,
             expires_at = CASE WHEN $3::INTEGER IS NULL THEN expires_at
                               ELSE now() + make_interval(days => $3) END,
             name = CASE WHEN $4 THEN $5 ELSE name END
         WHERE id = $1",
    )
    .bind(code_id)
    .bind(max_uses)
    .bind(patch.expires_in_days.map(expiry_days))
    .bind(patch.name.is_some())
    .bind(clean_optional(patch.name))
    .execute(pool)
    .await?;

    activity::record(
        pool,
        Some(actor.id),
        "CODE_UPDATE",
        &format!("Admin-Code aktualisiert: {code}"),
        Some(("code", code_id)),
    )
    .await;
    Ok(())
}

pub async fn delete_admin_code(pool: &PgPool, actor: &AdminProfile, code_id: i64) -> Result<(), ContentError> {
    let code: Option<String> =
        sqlx::query_scalar("DELETE FROM verification_codes WHERE id = $1 AND is_admin_code RETURNING code")
            .bind(code_id)
            .fetch_optional(pool)
            .await?;
    let code = code.ok_or(ContentError::NotFound(CODE_NOT_FOUND))?;
    activity::record(pool, Some(actor.id), "CODE_DELETE", &format!("Admin-Code gelöscht: {code}"), None).await;
    Ok(())
}

#[cfg(test)]
#[path = "verification_test.rs"]
mod tests;
