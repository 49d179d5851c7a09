// HTTP request handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use super::AppServer;
use crate::chat::HistoryTurn;

/// Create the main application router
pub fn create_router(server: Arc<AppServer>) -> Router {
    Router::new()
        .route("/chat", post(handle_chat))
        .route("/health", get(health_check))
        .with_state(server)
}

/// One prior turn supplied by the frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// "user" or "assistant"
    pub role: String,
    pub content: String,
}

/// Request body for POST /chat
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// Response body for POST /chat
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    /// Reserved for direct data attachment; currently always null
    pub data: Option<Vec<Value>>,
}

/// Handle POST /chat - main conversation endpoint
async fn handle_chat(
    State(server): State<Arc<AppServer>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let history: Vec<HistoryTurn> = request
        .history
        .iter()
        .map(|turn| HistoryTurn {
            role: turn.role.clone(),
            content: turn.content.clone(),
        })
        .collect();

    let response = server
        .orchestrator()
        .run_turn(&request.message, &history)
        .await?;

    Ok(Json(ChatResponse {
        response,
        data: None,
    }))
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
}

/// Handle GET /health - liveness endpoint
async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        timestamp: Local::now().to_rfc3339(),
    })
}

/// Application error wrapper for proper HTTP error responses
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "Request failed");

        let body = serde_json::json!({
            "error": {
                "message": self.0.to_string(),
                "type": "api_error"
            }
        });

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_history_defaults_empty() {
        let request: ChatRequest =
            serde_json::from_str(r#"{"message": "quantas turmas temos?"}"#).unwrap();
        assert!(request.history.is_empty());
    }

    #[test]
    fn test_chat_response_serializes_null_data() {
        let response = ChatResponse {
            response: "Temos 12 turmas.".to_string(),
            data: None,
        };
        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["data"], Value::Null);
        assert_eq!(body["response"], "Temos 12 turmas.");
    }
}
