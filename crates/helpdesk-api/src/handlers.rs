//! Route handler functions for all API endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use helpdesk_chat::{ChatHistory, ChatReply};

use crate::error::ApiError;
use crate::state::AppState;

pub const SERVICE_NAME: &str = "AI Customer Support Agent";
pub const API_VERSION: &str = "1.0.0";

// =============================================================================
// Request / response types
// =============================================================================

/// Request body for POST /api/chat.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionsResponse {
    pub message: String,
    pub sessions: Vec<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET / - service banner.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: format!("{} API", SERVICE_NAME),
        version: API_VERSION.to_string(),
    })
}

/// GET /api/health - liveness check.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

/// POST /api/chat - handle one chat turn.
///
/// Always answers 200 for a well-formed body; store and generation failures
/// are absorbed by the orchestrator.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected chat request body");
        ApiError::BadRequest(rejection.body_text())
    })?;

    debug!(
        session_id = request.session_id.as_deref().unwrap_or("<new>"),
        message_len = request.message.len(),
        "Chat request"
    );

    let reply = state
        .orchestrator
        .handle_chat(&request.message, request.session_id)
        .await;
    Ok(Json(reply))
}

/// GET /api/chat/history/{session_id} - conversation and ordered messages.
pub async fn history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ChatHistory>, ApiError> {
    let history = state.orchestrator.get_history(&session_id).await?;
    Ok(Json(history))
}

/// GET /api/chat/sessions - placeholder; listing is not supported.
pub async fn sessions() -> Json<SessionsResponse> {
    Json(SessionsResponse {
        message: "Session listing is not implemented".to_string(),
        sessions: Vec::new(),
    })
}
