//! OpenAI vector-store client used as the conversation search index.

use super::{IndexFile, SearchIndex};
use crate::error::{IndexError, MemoryError};
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

/// Default delay between indexing status polls.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Default number of polls before giving up.
const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 120;

/// Connection and polling settings for [`OpenAiVectorStoreIndex`].
#[derive(Debug, Clone)]
pub struct OpenAiIndexOptions {
    /// API root, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub api_key: String,
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
}

impl OpenAiIndexOptions {
    /// Options with default polling behaviour.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }
}

/// Read a required API key from the environment.
pub fn api_key_from_env(var: &str) -> Result<String, MemoryError> {
    std::env::var(var)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| MemoryError::MissingCredential(var.to_string()))
}

/// Search index backed by OpenAI vector stores.
///
/// Each append uploads the transcript as a file, attaches it to the vector
/// store, and polls until indexing finishes.
#[derive(Debug, Clone)]
pub struct OpenAiVectorStoreIndex {
    client: Client,
    options: OpenAiIndexOptions,
}

impl OpenAiVectorStoreIndex {
    /// Build a client around a shared HTTP client.
    pub fn new(client: Client, options: OpenAiIndexOptions) -> Self {
        Self { client, options }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.options.base_url.trim_end_matches('/'))
    }

    /// Upload the artifact and return its file id.
    async fn upload(&self, file: IndexFile) -> Result<String, IndexError> {
        let part = Part::bytes(file.content)
            .file_name(file.name)
            .mime_str("text/plain")?;
        let form = Form::new().text("purpose", "assistants").part("file", part);
        let response = self
            .client
            .post(self.url("files"))
            .bearer_auth(&self.options.api_key)
            .multipart(form)
            .send()
            .await?;
        let uploaded: FileObject = read_json(response).await?;
        Ok(uploaded.id)
    }

    /// Attach an uploaded file to a vector store.
    async fn attach(&self, index_id: &str, file_id: &str) -> Result<VectorStoreFile, IndexError> {
        let response = self
            .client
            .post(self.url(&format!("vector_stores/{index_id}/files")))
            .bearer_auth(&self.options.api_key)
            .json(&json!({ "file_id": file_id }))
            .send()
            .await?;
        read_json(response).await
    }

    async fn status(&self, index_id: &str, file_id: &str) -> Result<VectorStoreFile, IndexError> {
        let response = self
            .client
            .get(self.url(&format!("vector_stores/{index_id}/files/{file_id}")))
            .bearer_auth(&self.options.api_key)
            .send()
            .await?;
        read_json(response).await
    }
}

#[async_trait]
impl SearchIndex for OpenAiVectorStoreIndex {
    async fn append_file(&self, index_id: &str, file: IndexFile) -> Result<(), IndexError> {
        let bytes = file.content.len();
        let file_id = self.upload(file).await?;
        debug!(
            "uploaded transcript file (index_id={}, file_id={}, bytes={})",
            index_id, file_id, bytes
        );

        let mut entry = self.attach(index_id, &file_id).await?;
        let mut attempts = 0;
        loop {
            match entry.status.as_str() {
                "completed" => {
                    info!(
                        "transcript indexed (index_id={}, file_id={}, polls={})",
                        index_id, file_id, attempts
                    );
                    return Ok(());
                }
                "in_progress" => {
                    if attempts >= self.options.max_poll_attempts {
                        warn!(
                            "indexing timed out (index_id={}, file_id={})",
                            index_id, file_id
                        );
                        return Err(IndexError::Timeout { file_id, attempts });
                    }
                    attempts += 1;
                    tokio::time::sleep(self.options.poll_interval).await;
                    entry = self.status(index_id, &file_id).await?;
                }
                other => {
                    return Err(IndexError::Rejected {
                        file_id,
                        status: other.to_string(),
                        message: entry
                            .last_error
                            .map(|error| error.message)
                            .unwrap_or_default(),
                    });
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct FileObject {
    id: String,
}

#[derive(Debug, Deserialize)]
struct VectorStoreFile {
    status: String,
    #[serde(default)]
    last_error: Option<LastError>,
}

#[derive(Debug, Deserialize)]
struct LastError {
    #[serde(default)]
    message: String,
}

/// Decode a success body, turning error statuses into [`IndexError::Status`].
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, IndexError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(IndexError::Status {
            status: status.as_u16(),
            body,
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|err| IndexError::Malformed(err.to_string()))
}
