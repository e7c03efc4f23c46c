//! Request and response bodies for the advisor chat routes.

use crate::ConversationId;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body accepted by the chat routes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Full message sequence to run the agent on.
    #[serde(default)]
    pub messages: Vec<Value>,
    /// Existing conversation id; a fresh one is generated when absent or empty.
    #[serde(default, deserialize_with = "lenient_string")]
    pub conversation_id: Option<ConversationId>,
    /// Working state for scenarios that use one.
    #[serde(default, deserialize_with = "lenient_string")]
    pub state: Option<String>,
}

/// Body returned by the chat routes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// Final agent output for this turn.
    pub response: String,
    /// Updated history to send back on the next turn.
    pub history: Vec<Value>,
    pub conversation_id: ConversationId,
    /// Search index holding this conversation's archived turns.
    pub memory_vector_store_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Generic failure body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

/// Accept strings; treat any other JSON type as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        _ => None,
    })
}
