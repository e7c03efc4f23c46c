//! External search index abstraction.

mod openai;

pub use openai::{OpenAiIndexOptions, OpenAiVectorStoreIndex, api_key_from_env};

use crate::error::IndexError;
use async_trait::async_trait;

/// File-like artifact appended to a search index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexFile {
    /// Artifact name, unique per append.
    pub name: String,
    pub content: Vec<u8>,
}

impl IndexFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Content as UTF-8 text, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

#[async_trait]
/// Append-only store of archived transcripts supporting later retrieval.
pub trait SearchIndex: Send + Sync {
    /// Append a file to the index and wait until it is searchable.
    ///
    /// Returning `Ok` means the artifact was accepted; any error means the
    /// caller must treat the append as not having happened.
    async fn append_file(&self, index_id: &str, file: IndexFile) -> Result<(), IndexError>;
}
