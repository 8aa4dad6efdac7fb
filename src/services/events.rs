//! Calendar events.
//!
//! DESIGN
//! ======
//! Public queries only ever see `is_public` events. Filters combine with AND:
//! a month+year or year-only date window, a case-insensitive tag substring,
//! and a case-insensitive search over title and description.
//!
//! Updates load the stored event, apply the patch in memory and validate the
//! merged result (e.g. end before start) before writing it back.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime};

use crate::services::admin::AdminProfile;
use crate::services::{ContentError, NO_PERMISSION, activity, clean_optional, nullable};

const NOT_FOUND: &str = "Event nicht gefunden";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventColor {
    #[default]
    Blue,
    Gold,
    Green,
    Red,
    Purple,
    Pink,
    Teal,
    Orange,
}

impl EventColor {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Gold => "gold",
            Self::Green => "green",
            Self::Red => "red",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Teal => "teal",
            Self::Orange => "orange",
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CalendarEvent {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub start_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub end_date: Option<OffsetDateTime>,
    pub all_day: bool,
    pub location: Option<String>,
    pub color: String,
    pub tags: Option<String>,
    pub is_public: bool,
    pub created_by: Option<i64>,
    pub creator_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFilter {
    pub month: Option<u8>,
    pub year: Option<i32>,
    pub tag: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventInput {
    pub title: String,
    pub description: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    #[serde(default)]
    pub all_day: bool,
    pub location: Option<String>,
    #[serde(default)]
    pub color: EventColor,
    pub tags: Option<String>,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

fn default_public() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPatch {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub end_date: Option<Option<String>>,
    pub all_day: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub location: Option<Option<String>>,
    pub color: Option<EventColor>,
    #[serde(default, deserialize_with = "nullable")]
    pub tags: Option<Option<String>>,
    pub is_public: Option<bool>,
}

const EVENT_SELECT: &str = r"
    SELECT e.id, e.title, e.description, e.start_date, e.end_date, e.all_day, e.location, e.color,
           e.tags, e.is_public, e.created_by, COALESCE(a.display_name, 'Unbekannt') AS creator_name,
           e.created_at, e.updated_at
    FROM calendar_events e
    LEFT JOIN admins a ON a.id = e.created_by";

// =============================================================================
// PARSING
// =============================================================================

/// Parse an RFC 3339 timestamp, or a naive `YYYY-MM-DDTHH:MM[:SS]` /
/// `YYYY-MM-DD` value interpreted as UTC.
///
/// # Errors
///
/// `Invalid` when none of the accepted formats match.
pub fn parse_event_time(raw: &str) -> Result<OffsetDateTime, ContentError> {
    let raw = raw.trim();
    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(parsed);
    }
    let with_seconds = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    let without_seconds = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    if let Ok(naive) = PrimitiveDateTime::parse(raw, with_seconds)
        .or_else(|_| PrimitiveDateTime::parse(raw, without_seconds))
    {
        return Ok(naive.assume_utc());
    }
    if let Ok(date) = Date::parse(raw, format_description!("[year]-[month]-[day]")) {
        return Ok(date.midnight().assume_utc());
    }
    Err(ContentError::Invalid(format!("Ungültiges Datum: {raw}")))
}

/// Half-open `[start, end)` window for a month+year or a whole year.
///
/// A month without a year applies no window.
///
/// # Errors
///
/// `Invalid` for a month outside 1..=12 or an unrepresentable year.
pub fn date_window(month: Option<u8>, year: Option<i32>) -> Result<Option<(OffsetDateTime, OffsetDateTime)>, ContentError> {
    let invalid = || ContentError::Invalid("Ungültiger Zeitraum".into());
    let Some(year) = year else {
        return Ok(None);
    };
    let (start, end) = match month {
        Some(m) => {
            let month = Month::try_from(m).map_err(|_| invalid())?;
            let start = Date::from_calendar_date(year, month, 1).map_err(|_| invalid())?;
            let end = if month == Month::December {
                Date::from_calendar_date(year + 1, Month::January, 1)
            } else {
                Date::from_calendar_date(year, month.next(), 1)
            }
            .map_err(|_| invalid())?;
            (start, end)
        }
        None => (
            Date::from_calendar_date(year, Month::January, 1).map_err(|_| invalid())?,
            Date::from_calendar_date(year + 1, Month::January, 1).map_err(|_| invalid())?,
        ),
    };
    Ok(Some((start.midnight().assume_utc(), end.midnight().assume_utc())))
}

/// Sorted, de-duplicated tags from comma separated tag strings.
#[must_use]
pub fn collect_tags<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    raw.into_iter()
        .flat_map(|tags| tags.split(','))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn validate_range(start: OffsetDateTime, end: Option<OffsetDateTime>) -> Result<(), ContentError> {
    if end.is_some_and(|end| end < start) {
        return Err(ContentError::Invalid("Enddatum darf nicht vor dem Startdatum liegen".into()));
    }
    Ok(())
}

// =============================================================================
// QUERIES
// =============================================================================

pub async fn list_public(pool: &PgPool, filter: &EventFilter) -> Result<Vec<CalendarEvent>, ContentError> {
    let window = date_window(filter.month, filter.year)?;

    let mut query: QueryBuilder<'_, Postgres> = QueryBuilder::new(EVENT_SELECT);
    query.push(" WHERE e.is_public");
    if let Some((start, end)) = window {
        query.push(" AND e.start_date >= ").push_bind(start);
        query.push(" AND e.start_date < ").push_bind(end);
    }
    if let Some(tag) = filter.tag.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        query
            .push(" AND strpos(lower(COALESCE(e.tags, '')), lower(")
            .push_bind(tag.to_owned())
            .push(")) > 0");
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        query
            .push(" AND (strpos(lower(e.title), lower(")
            .push_bind(search.to_owned())
            .push(")) > 0 OR strpos(lower(COALESCE(e.description, '')), lower(")
            .push_bind(search.to_owned())
            .push(")) > 0)");
    }
    query.push(" ORDER BY e.start_date ASC, e.id ASC");

    Ok(query.build_query_as::<CalendarEvent>().fetch_all(pool).await?)
}

/// Tags of public events, sorted and unique.
pub async fn public_tags(pool: &PgPool) -> Result<Vec<String>, ContentError> {
    let rows: Vec<String> =
        sqlx::query_scalar("SELECT tags FROM calendar_events WHERE is_public AND tags IS NOT NULL AND tags <> ''")
            .fetch_all(pool)
            .await?;
    Ok(collect_tags(rows.iter().map(String::as_str)))
}

pub async fn get_public(pool: &PgPool, event_id: i64) -> Result<CalendarEvent, ContentError> {
    let event = fetch(pool, event_id).await?;
    if !event.is_public {
        return Err(ContentError::NotFound(NOT_FOUND));
    }
    Ok(event)
}

/// All events including private ones, latest start first.
pub async fn list_all(pool: &PgPool) -> Result<Vec<CalendarEvent>, ContentError> {
    let sql = format!("{EVENT_SELECT} ORDER BY e.start_date DESC, e.id DESC");
    Ok(sqlx::query_as::<_, CalendarEvent>(&sql).fetch_all(pool).await?)
}

async fn fetch(pool: &PgPool, event_id: i64) -> Result<CalendarEvent, ContentError> {
    let sql = format!("{EVENT_SELECT} WHERE e.id = $1");
    sqlx::query_as::<_, CalendarEvent>(&sql)
        .bind(event_id)
        .fetch_optional(pool)
        .await?
        .ok_or(ContentError::NotFound(NOT_FOUND))
}

fn ensure_can_edit(actor: &AdminProfile, event: &CalendarEvent) -> Result<(), ContentError> {
    if event.created_by != Some(actor.id) && !actor.is_master_role() {
        return Err(ContentError::Forbidden(NO_PERMISSION));
    }
    Ok(())
}

// =============================================================================
// MUTATIONS
// =============================================================================

pub async fn create_event(pool: &PgPool, actor: &AdminProfile, input: EventInput) -> Result<CalendarEvent, ContentError> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(ContentError::Invalid("Titel darf nicht leer sein".into()));
    }
    let start = parse_event_time(&input.start_date)?;
    let end = clean_optional(input.end_date)
        .map(|raw| parse_event_time(&raw))
        .transpose()?;
    validate_range(start, end)?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO calendar_events
             (title, description, start_date, end_date, all_day, location, color, tags, is_public, created_by)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
         RETURNING id",
    )
    .bind(title)
    .bind(clean_optional(input.description))
    .bind(start)
    .bind(end)
    .bind(input.all_day)
    .bind(clean_optional(input.location))
    .bind(input.color.as_str())
    .bind(clean_optional(input.tags))
    .bind(input.is_public)
    .bind(actor.id)
    .fetch_one(pool)
    .await?;

    let event = fetch(pool, id).await?;
    activity::record(
        pool,
        Some(actor.id),
        "EVENT_CREATE",
        &format!("Event '{}' erstellt", event.title),
        Some(("event", id)),
    )
    .await;
    Ok(event)
}

pub async fn update_event(
    pool: &PgPool,
    actor: &AdminProfile,
    event_id: i64,
    patch: EventPatch,
) -> Result<CalendarEvent, ContentError> {
    let mut event = fetch(pool, event_id).await?;
    ensure_can_edit(actor, &event)?;

    if let Some(title) = patch.title {
        let title = title.trim();
        if title.is_empty() {
            return Err(ContentError::Invalid("Titel darf nicht leer sein".into()));
        }
        title.clone_into(&mut event.title);
    }
    if let Some(description) = patch.description {
        event.description = clean_optional(description);
    }
    if let Some(start) = patch.start_date {
        event.start_date = parse_event_time(&start)?;
    }
    if let Some(end) = patch.end_date {
        event.end_date = clean_optional(end).map(|raw| parse_event_time(&raw)).transpose()?;
    }
    if let Some(all_day) = patch.all_day {
        event.all_day = all_day;
    }
    if let Some(location) = patch.location {
        event.location = clean_optional(location);
    }
    if let Some(color) = patch.color {
        event.color = color.as_str().to_owned();
    }
    if let Some(tags) = patch.tags {
        event.tags = clean_optional(tags);
    }
    if let Some(is_public) = patch.is_public {
        event.is_public = is_public;
    }
    validate_range(event.start_date, event.end_date)?;

    sqlx::query(
        "UPDATE calendar_events SET
             title = $2, description = $3, start_date = $4, end_date = $5, all_day = $6,
             location = $7, color = $8, tags = $9, is_public = $10, updated_at = now()
         WHERE id = $1",
    )
    .bind(event_id)
    .bind(&event.title)
    .bind(&event.description)
    .bind(event.start_date)
    .bind(event.end_date)
    .bind(event.all_day)
    .bind(&event.location)
    .bind(&event.color)
    .bind(&event.tags)
    .bind(event.is_public)
    .execute(pool)
    .await?;

    let event = fetch(pool, event_id).await?;
    activity::record(
        pool,
        Some(actor.id),
        "EVENT_UPDATE",
        &format!("Event '{}' aktualisiert", event.title),
        Some(("event", event_id)),
    )
    .await;
    Ok(event)
}

pub async fn delete_event(pool: &PgPool, actor: &AdminProfile, event_id: i64) -> Result<(), ContentError> {
    let event = fetch(pool, event_id).await?;
    ensure_can_edit(actor, &event)?;

    sqlx::query("DELETE FROM calendar_events WHERE id = $1")
        .bind(event_id)
        .execute(pool)
        .await?;
    activity::record(
        pool,
        Some(actor.id),
        "EVENT_DELETE",
        &format!("Event '{}' gelöscht", event.title),
        None,
    )
    .await;
    Ok(())
}

#[cfg(test)]
#[path = "events_test.rs"]
mod tests;
