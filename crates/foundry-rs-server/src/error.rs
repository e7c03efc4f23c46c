use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use foundry_rs_agents::AgentError;
use foundry_rs_memory::MemoryError;
use foundry_rs_protocol::ErrorBody;
use log::error;

/// Body sent for every failed request.
const INTERNAL_ERROR: &str = "Internal server error";

/// Failures while handling a request or running the listener.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("request body rejected: {0}")]
    Body(String),
    #[error(transparent)]
    Memory(#[from] MemoryError),
    #[error("agent run failed: {0}")]
    Agent(#[from] AgentError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        error!("request failed: {self}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: INTERNAL_ERROR.to_string(),
            }),
        )
            .into_response()
    }
}
