use async_trait::async_trait;
use foundry_rs_memory::{IndexError, IndexFile, SearchIndex};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Search index that records every appended file.
#[derive(Clone, Default)]
pub struct RecordingIndex {
    files: Arc<Mutex<Vec<(String, IndexFile)>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent appends fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// `(index_id, file)` pairs in append order.
    pub fn files(&self) -> Vec<(String, IndexFile)> {
        self.files.lock().clone()
    }

    /// Transcript text of every appended file.
    pub fn transcripts(&self) -> Vec<String> {
        self.files.lock().iter().map(|(_, file)| file.text()).collect()
    }

    pub fn len(&self) -> usize {
        self.files.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.lock().is_empty()
    }
}

#[async_trait]
impl SearchIndex for RecordingIndex {
    async fn append_file(&self, index_id: &str, file: IndexFile) -> Result<(), IndexError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(IndexError::Other("index unavailable".to_string()));
        }
        self.files.lock().push((index_id.to_string(), file));
        Ok(())
    }
}
