//! Record stores mapping conversation ids to their indexing checkpoint.

use crate::error::MemoryError;
use crate::model::ConversationMemoryRecord;
use async_trait::async_trait;
use log::{debug, info};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[async_trait]
/// Key-value store for conversation checkpoints.
///
/// Writes are last-write-wins per key; callers serialize access per
/// conversation when they need read-modify-write consistency.
pub trait RecordStore: Send + Sync {
    /// Load the record for a conversation, if one was stored.
    async fn get(
        &self,
        conversation_id: &str,
    ) -> Result<Option<ConversationMemoryRecord>, MemoryError>;

    /// Store the record for a conversation, replacing any previous value.
    async fn set(
        &self,
        conversation_id: &str,
        record: &ConversationMemoryRecord,
    ) -> Result<(), MemoryError>;
}

/// Process-local record store.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<String, ConversationMemoryRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of conversations with a stored record.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get(
        &self,
        conversation_id: &str,
    ) -> Result<Option<ConversationMemoryRecord>, MemoryError> {
        Ok(self.records.read().get(conversation_id).cloned())
    }

    async fn set(
        &self,
        conversation_id: &str,
        record: &ConversationMemoryRecord,
    ) -> Result<(), MemoryError> {
        self.records
            .write()
            .insert(conversation_id.to_string(), record.clone());
        Ok(())
    }
}

/// File-backed record store keeping one JSON document per conversation.
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    /// Directory holding the record files.
    root: PathBuf,
}

impl FileRecordStore {
    /// Create a store under `root`, creating the directory if needed.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, MemoryError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        info!("initialized file record store (root={})", root.display());
        Ok(Self { root })
    }

    /// Path of the record file for a conversation.
    fn record_path(&self, conversation_id: &str) -> PathBuf {
        self.root
            .join(format!("{}.json", encode_file_stem(conversation_id)))
    }
}

#[async_trait]
impl RecordStore for FileRecordStore {
    async fn get(
        &self,
        conversation_id: &str,
    ) -> Result<Option<ConversationMemoryRecord>, MemoryError> {
        let path = self.record_path(conversation_id);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let record = serde_json::from_str(&contents)?;
        Ok(Some(record))
    }

    /// Replace the record atomically through a temp file and rename.
    async fn set(
        &self,
        conversation_id: &str,
        record: &ConversationMemoryRecord,
    ) -> Result<(), MemoryError> {
        let path = self.record_path(conversation_id);
        let temp_path = path.with_extension("json.tmp");
        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&temp_path)?;
            let contents = serde_json::to_string(record)?;
            file.write_all(contents.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &path)?;
        debug!(
            "stored memory record (conversation_id={}, stored_count={})",
            conversation_id, record.stored_count
        );
        Ok(())
    }
}

/// Map a conversation id to a unique, filesystem-safe file stem.
///
/// ASCII alphanumerics and `_` pass through; every other byte becomes `-xx`.
fn encode_file_stem(conversation_id: &str) -> String {
    let mut stem = String::with_capacity(conversation_id.len());
    for byte in conversation_id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' {
            stem.push(byte as char);
        } else {
            let _ = write!(stem, "-{byte:02x}");
        }
    }
    stem
}
