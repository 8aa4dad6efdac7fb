//! ÖHli, the keyword chatbot. Answers come from the embedded knowledge base
//! and never touch the database.

use axum::extract::State;
use axum::response::Json;
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use oehli::{Button, Reply};

use crate::error::{ApiError, ApiJson};
use crate::state::AppState;

const EMPTY_QUESTION: &str = "Frage darf nicht leer sein";

#[derive(Debug, Deserialize)]
pub struct AskBody {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct QuickActions {
    pub actions: Vec<Button>,
}

/// `POST /api/oehli/ask`: best matching answer, or the fallback.
pub async fn ask(
    State(state): State<AppState>,
    WithRejection(Json(body), _): ApiJson<AskBody>,
) -> Result<Json<Reply>, ApiError> {
    let reply = state.oehli.find_response(&body.query).ok_or_else(|| ApiError::bad_request(EMPTY_QUESTION))?;
    tracing::debug!(query_len = body.query.len(), "oehli answered");
    Ok(Json(reply))
}

pub async fn greeting(State(state): State<AppState>) -> Json<Reply> {
    Json(state.oehli.greeting())
}

pub async fn quick_actions(State(state): State<AppState>) -> Json<QuickActions> {
    Json(QuickActions { actions: state.oehli.quick_actions().to_vec() })
}

#[cfg(test)]
#[path = "oehli_test.rs"]
mod tests;
