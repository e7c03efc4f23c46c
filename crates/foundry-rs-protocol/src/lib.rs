//! Wire types shared by the Foundry memory journal, agents, and HTTP routes.

mod chat;
mod conversation;
mod history;

pub use chat::{ChatRequest, ChatResponse, ErrorBody};
pub use conversation::{ConversationId, generate_conversation_id};
pub use history::{ContentPart, HistoryItem, MessageContent, parse_history};
