//! Incremental conversation memory for Foundry.
//!
//! A [`ConversationJournal`] archives the turns of a conversation into an
//! external search index, checkpointing how many history items it has already
//! shipped so repeated requests never re-index the same turn.

pub mod error;
pub mod index;
pub mod journal;
pub mod locks;
pub mod model;
pub mod store;
pub mod transcript;

/// Memory and index error types.
pub use error::{IndexError, MemoryError};
/// Search index abstraction and the hosted vector-store client.
pub use index::{
    IndexFile, OpenAiIndexOptions, OpenAiVectorStoreIndex, SearchIndex, api_key_from_env,
};
/// Journal writer.
pub use journal::ConversationJournal;
/// Per-conversation serialization.
pub use locks::{ConversationGuard, ConversationLocks};
/// Checkpoint record model.
pub use model::ConversationMemoryRecord;
/// Record store interface and backings.
pub use store::{FileRecordStore, InMemoryRecordStore, RecordStore};
