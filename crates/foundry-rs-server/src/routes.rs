//! Chat and health routes.

use crate::error::ServerError;
use crate::state::AppState;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use foundry_rs_agents::{Persona, faith_foundry, hobby_farm};
use foundry_rs_protocol::{ChatRequest, ChatResponse, generate_conversation_id, parse_history};
use log::info;
use serde_json::{Value, json};

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/faith-foundry", post(faith_foundry_chat))
        .route("/api/small-business", post(small_business_chat))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn faith_foundry_chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ServerError> {
    let Json(request) = body.map_err(|rejection| ServerError::Body(rejection.body_text()))?;
    run_turn(&state, Scenario::FaithFoundry, request).await.map(Json)
}

async fn small_business_chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ServerError> {
    let Json(request) = body.map_err(|rejection| ServerError::Body(rejection.body_text()))?;
    run_turn(&state, Scenario::SmallBusiness, request).await.map(Json)
}

#[derive(Debug, Clone, Copy)]
enum Scenario {
    FaithFoundry,
    SmallBusiness,
}

impl Scenario {
    fn id_prefix(self) -> &'static str {
        match self {
            Self::FaithFoundry => "faith",
            Self::SmallBusiness => "biz",
        }
    }
}

/// One chat turn: run the persona, then archive what it produced.
async fn run_turn(
    state: &AppState,
    scenario: Scenario,
    request: ChatRequest,
) -> Result<ChatResponse, ServerError> {
    let conversation_id = request
        .conversation_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| generate_conversation_id(scenario.id_prefix()));
    let working_state = match scenario {
        Scenario::FaithFoundry => Some(
            request
                .state
                .as_deref()
                .map(str::trim)
                .filter(|state| !state.is_empty())
                .unwrap_or(state.settings.default_state.as_str())
                .to_string(),
        ),
        Scenario::SmallBusiness => None,
    };

    let _guard = state.locks.acquire(&conversation_id).await;
    let record = state.journal.get_memory(&conversation_id).await?;
    let persona: Persona = match &working_state {
        Some(working_state) => faith_foundry(Some(&record.index_id), working_state),
        None => hobby_farm(Some(&record.index_id)),
    }
    .with_max_results(state.settings.max_results);

    let output = state
        .runner
        .run(&persona, request.messages, &conversation_id)
        .await?;
    let record = state
        .journal
        .persist(&conversation_id, &parse_history(&output.history), Some(record))
        .await?;
    info!(
        "chat turn completed (scenario={:?}, conversation_id={}, history_len={}, stored_count={})",
        scenario,
        conversation_id,
        output.history.len(),
        record.stored_count
    );

    Ok(ChatResponse {
        response: output.final_output,
        history: output.history,
        conversation_id,
        memory_vector_store_id: record.index_id,
        state: working_state,
    })
}
