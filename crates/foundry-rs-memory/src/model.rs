//! Checkpoint record persisted per conversation.

use serde::{Deserialize, Serialize};

/// Indexing checkpoint for one conversation.
///
/// `index_id` is fixed once assigned. `stored_count` is the number of history
/// items already archived and marks where the next archiving slice starts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationMemoryRecord {
    /// Search index holding this conversation's archived turns.
    pub index_id: String,
    /// Number of history items already archived.
    pub stored_count: usize,
}

impl ConversationMemoryRecord {
    /// Fresh record pointing at `index_id` with nothing archived.
    pub fn new(index_id: impl Into<String>) -> Self {
        Self {
            index_id: index_id.into(),
            stored_count: 0,
        }
    }

    /// Copy of this record with the checkpoint moved to `stored_count`.
    pub fn advanced_to(&self, stored_count: usize) -> Self {
        Self {
            index_id: self.index_id.clone(),
            stored_count,
        }
    }
}
