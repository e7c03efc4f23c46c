//! Public surface for Foundry.
//!
//! Re-exports the building blocks and wires them into a ready-to-serve
//! [`AppState`](server::AppState) from configuration.

/// Re-export for convenience.
pub use foundry_rs_agents as agents;
pub use foundry_rs_config as config;
/// Re-export for convenience.
pub use foundry_rs_memory as memory;
pub use foundry_rs_protocol as protocol;
pub use foundry_rs_server as server;

use anyhow::Context;
use foundry_rs_agents::{ResponsesOptions, ResponsesRunner};
use foundry_rs_config::FoundryConfig;
use foundry_rs_memory::{
    ConversationJournal, FileRecordStore, InMemoryRecordStore, OpenAiIndexOptions,
    OpenAiVectorStoreIndex, RecordStore,
};
use foundry_rs_server::{AppState, ChatSettings};
use log::info;
use std::sync::Arc;
use std::time::Duration;

/// Initialize logging through env_logger; repeated calls are ignored.
pub fn init_logging() {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();
}

/// Build handler state from configuration and an OpenAI API key.
///
/// Records live under `memory.store_path` when set and in process memory
/// otherwise.
pub fn build_state(config: &FoundryConfig, api_key: &str) -> anyhow::Result<AppState> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.openai.timeout_secs))
        .build()
        .context("failed to build HTTP client")?;

    let store: Arc<dyn RecordStore> = match config.memory.store_path.as_ref() {
        Some(path) => Arc::new(
            FileRecordStore::new(path).context("failed to open conversation record store")?,
        ),
        None => {
            info!("memory.store_path not set; conversation records are kept in memory");
            Arc::new(InMemoryRecordStore::new())
        }
    };
    let index = OpenAiVectorStoreIndex::new(
        client.clone(),
        OpenAiIndexOptions {
            poll_interval: Duration::from_millis(config.memory.poll_interval_ms),
            max_poll_attempts: config.memory.max_poll_attempts,
            ..OpenAiIndexOptions::new(&config.openai.base_url, api_key)
        },
    );
    let journal = ConversationJournal::new(
        store,
        Arc::new(index),
        config.memory.default_index_id.clone(),
    );
    let runner = ResponsesRunner::new(
        client,
        ResponsesOptions {
            base_url: config.openai.base_url.clone(),
            api_key: api_key.to_string(),
            default_model: config.openai.model.clone(),
        },
    );
    info!(
        "foundry state ready (default_index_id={}, model={})",
        journal.default_index_id(),
        config.openai.model
    );

    Ok(AppState::new(
        Arc::new(journal),
        Arc::new(runner),
        ChatSettings::from_config(config),
    ))
}
