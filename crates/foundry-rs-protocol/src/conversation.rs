//! Conversation identifiers.

use uuid::Uuid;

/// Caller-supplied token grouping turns into one logical session.
pub type ConversationId = String;

/// Number of hex characters kept from the random component.
const ID_HEX_LEN: usize = 24;

/// Generate a fresh conversation id such as `faith_3f2a...`.
pub fn generate_conversation_id(prefix: &str) -> ConversationId {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &hex[..ID_HEX_LEN])
}
