use foundry_rs_agents::AgentRunner;
use foundry_rs_config::FoundryConfig;
use foundry_rs_memory::{ConversationJournal, ConversationLocks};
use std::sync::Arc;

/// Per-request knobs taken from configuration.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    /// Working state when a request leaves it blank.
    pub default_state: String,
    /// Cap on memory search results offered to personas.
    pub max_results: u32,
}

impl ChatSettings {
    pub fn from_config(config: &FoundryConfig) -> Self {
        Self {
            default_state: config.scenarios.default_state.clone(),
            max_results: config.memory.max_results,
        }
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self::from_config(&FoundryConfig::default())
    }
}

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub journal: Arc<ConversationJournal>,
    pub runner: Arc<dyn AgentRunner>,
    pub locks: ConversationLocks,
    pub settings: ChatSettings,
}

impl AppState {
    pub fn new(
        journal: Arc<ConversationJournal>,
        runner: Arc<dyn AgentRunner>,
        settings: ChatSettings,
    ) -> Self {
        Self {
            journal,
            runner,
            locks: ConversationLocks::new(),
            settings,
        }
    }
}
