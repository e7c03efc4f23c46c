//! Journal writer archiving new conversation turns into the search index.

use crate::error::MemoryError;
use crate::index::{IndexFile, SearchIndex};
use crate::model::ConversationMemoryRecord;
use crate::store::RecordStore;
use crate::transcript::{LINE_SEPARATOR, render_lines};
use chrono::Utc;
use foundry_rs_protocol::HistoryItem;
use log::{debug, info, warn};
use std::sync::Arc;

/// Archives conversation history incrementally.
///
/// Every history item is shipped to the index at most once and in order.
/// The checkpoint only advances after the index accepted the transcript, so
/// a failed call can be retried with the same inputs. Calls for one
/// conversation must be serialized by the caller (see
/// [`ConversationLocks`](crate::ConversationLocks)).
pub struct ConversationJournal {
    store: Arc<dyn RecordStore>,
    index: Arc<dyn SearchIndex>,
    /// Index assigned to conversations without a record.
    default_index_id: String,
}

impl ConversationJournal {
    pub fn new(
        store: Arc<dyn RecordStore>,
        index: Arc<dyn SearchIndex>,
        default_index_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            index,
            default_index_id: default_index_id.into(),
        }
    }

    pub fn default_index_id(&self) -> &str {
        &self.default_index_id
    }

    /// Load the record for a conversation, synthesizing a default when absent.
    ///
    /// The synthesized record is not stored; it is written on the first
    /// successful [`persist`](Self::persist).
    pub async fn get_memory(
        &self,
        conversation_id: &str,
    ) -> Result<ConversationMemoryRecord, MemoryError> {
        Ok(self
            .store
            .get(conversation_id)
            .await?
            .unwrap_or_else(|| ConversationMemoryRecord::new(self.default_index_id.clone())))
    }

    /// Archive the items of `history` that follow the record's checkpoint.
    pub async fn persist(
        &self,
        conversation_id: &str,
        history: &[HistoryItem],
        existing: Option<ConversationMemoryRecord>,
    ) -> Result<ConversationMemoryRecord, MemoryError> {
        let record = match existing {
            Some(record) => record,
            None => self.get_memory(conversation_id).await?,
        };
        let total = history.len();

        let Some(new_items) = history.get(record.stored_count..) else {
            // History shrank below the checkpoint; nothing left to archive.
            warn!(
                "checkpoint beyond history, resetting \
                 (conversation_id={}, stored_count={}, history_len={})",
                conversation_id,
                record.stored_count,
                total
            );
            return self.checkpoint(conversation_id, &record, total).await;
        };
        if new_items.is_empty() {
            debug!(
                "memory checkpoint current (conversation_id={}, stored_count={})",
                conversation_id, record.stored_count
            );
            return Ok(record);
        }

        let lines = render_lines(new_items);
        if lines.is_empty() {
            debug!(
                "no archivable content in new items (conversation_id={}, new_items={})",
                conversation_id,
                new_items.len()
            );
            return self.checkpoint(conversation_id, &record, total).await;
        }

        let transcript = lines.join(LINE_SEPARATOR);
        let file = IndexFile::new(artifact_name(conversation_id), transcript);
        self.index.append_file(&record.index_id, file).await?;
        info!(
            "archived conversation turns \
             (conversation_id={}, index_id={}, lines={}, stored_count={})",
            conversation_id,
            record.index_id,
            lines.len(),
            total
        );
        self.checkpoint(conversation_id, &record, total).await
    }

    /// Store `record` advanced to `stored_count` and return it.
    async fn checkpoint(
        &self,
        conversation_id: &str,
        record: &ConversationMemoryRecord,
        stored_count: usize,
    ) -> Result<ConversationMemoryRecord, MemoryError> {
        let updated = record.advanced_to(stored_count);
        self.store.set(conversation_id, &updated).await?;
        Ok(updated)
    }
}

/// Unique artifact name derived from the conversation id and current time.
fn artifact_name(conversation_id: &str) -> String {
    format!("{conversation_id}-{}.txt", Utc::now().timestamp_millis())
}
