//! HTTP Handlers

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use host_core::{CapabilityDescriptor, ChatSession, HostError, ThreadId};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub model_reachable: bool,
    pub tools: usize,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub thread_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub thread_id: String,
    pub model_calls: usize,
    pub tool_calls: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(err: &HostError) -> ApiError {
    let (status, code) = match err {
        HostError::ReasoningUnavailable(_) | HostError::ReasoningTimeout(_) => {
            (StatusCode::BAD_GATEWAY, "REASONING_UNAVAILABLE")
        }
        HostError::Provider(_) => (StatusCode::BAD_GATEWAY, "REASONING_REJECTED"),
        HostError::MaxIterationsExceeded(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "TOOL_CYCLE_LIMIT")
        }
        HostError::Cancelled => (StatusCode::INTERNAL_SERVER_ERROR, "CANCELLED"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "AGENT_ERROR"),
    };

    (
        status,
        Json(ErrorResponse {
            error: err.user_message(),
            code: code.into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/tools", get(list_tools))
        .route("/api/chat", post(chat_handler))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let model_reachable = state.agent.provider().health_check().await.unwrap_or(false);
    let tools = state.agent.capabilities().await.map_or(0, |caps| caps.len());

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        model_reachable,
        tools,
    })
}

/// Capability catalog as presented to the model
pub async fn list_tools(
    State(state): State<AppState>,
) -> Result<Json<Vec<CapabilityDescriptor>>, ApiError> {
    state.agent.capabilities().await.map(Json).map_err(|e| {
        tracing::error!(error = %e, "failed to list tools");
        api_error(&e)
    })
}

/// Run one turn on a thread, creating the thread when none is given
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let thread_id = payload
        .thread_id
        .map_or_else(ThreadId::new, ThreadId::from_string);

    let _turn = state.turns.lock().await;

    let mut chat = ChatSession::open(state.agent.clone(), Some(state.store.clone()), thread_id)
        .await
        .map_err(|e| api_error(&e))?;

    let outcome = chat
        .send(&payload.message, &CancellationToken::new())
        .await
        .map_err(|e| {
            tracing::error!(thread_id = %chat.thread_id(), error = %e, "turn failed");
            api_error(&e)
        })?;

    Ok(Json(ChatResponse {
        message: outcome.text,
        thread_id: chat.thread_id().to_string(),
        model_calls: outcome.model_calls,
        tool_calls: outcome.tool_calls,
    }))
}
