//! Public contact form.

use axum::extract::State;
use axum::response::Json;
use axum_extra::extract::WithRejection;

use crate::error::{ApiError, ApiJson};
use crate::services::contact::{self, ContactForm, ContactReceipt};
use crate::state::AppState;

/// `POST /api/contact`
pub async fn submit(
    State(state): State<AppState>,
    WithRejection(Json(form), _): ApiJson<ContactForm>,
) -> Result<Json<ContactReceipt>, ApiError> {
    Ok(Json(contact::submit(&state, form).await?))
}

#[cfg(test)]
#[path = "contact_test.rs"]
mod tests;
