use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::chat::record::{AnswerMode, AssistantPayload};
use crate::chat::{normalize, render};
use crate::core::errors::ApiError;
use crate::security::require_api_key;
use crate::state::AppState;

const DEFAULT_SESSION_ID: &str = "default";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: Option<String>,
    pub message: String,
    pub mode: Option<String>,
}

/// One user turn: append the message, run retrieval, normalize the raw
/// result into a display record, append it and return both the record and
/// its rendered elements.
pub async fn post_chat(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<ChatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_api_key(&headers, &state.session_token)?;

    let message = payload.message.trim();
    if message.is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }

    let mode = payload
        .mode
        .as_deref()
        .map(AnswerMode::from_str)
        .unwrap_or_default();
    let session_id = payload
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SESSION_ID.to_string());

    state.sessions.append_user_turn(&session_id, message)?;

    let raw = state.retrieval.ask(message, mode).await?;
    tracing::debug!(
        "Retrieval returned {} passages for mode {}",
        raw.context.len(),
        mode.as_str()
    );

    let record = match mode {
        AnswerMode::DocumentSearch => normalize::document_search(&raw),
        AnswerMode::Inquiry => normalize::inquiry(&raw),
    };
    let elements = render::record(&record);

    state
        .sessions
        .append_assistant_turn(&session_id, AssistantPayload::Record(record.clone()))?;

    Ok(Json(json!({
        "session_id": session_id,
        "mode": mode.as_str(),
        "record": record,
        "elements": elements,
    })))
}
