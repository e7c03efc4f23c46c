//! Error types for memory operations.

/// Errors returned by record stores and the journal writer.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// IO error from a file-backed store.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Record (de)serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// A credential required by an external service is not set.
    #[error("{0} is required to store conversation memory")]
    MissingCredential(String),
    /// Appending to the search index failed; the checkpoint was not advanced.
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Errors returned by search index clients.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Transport-level failure.
    #[error("index request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The index service answered with a non-success status.
    #[error("index returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// The service accepted the file but failed to index it.
    #[error("indexing {file_id} ended with status {status}: {message}")]
    Rejected {
        file_id: String,
        status: String,
        message: String,
    },
    /// Indexing did not finish within the polling budget.
    #[error("indexing {file_id} still in progress after {attempts} polls")]
    Timeout { file_id: String, attempts: u32 },
    /// Response body did not have the expected shape.
    #[error("malformed index response: {0}")]
    Malformed(String),
    /// Failure reported by a non-HTTP index implementation.
    #[error("index error: {0}")]
    Other(String),
}
