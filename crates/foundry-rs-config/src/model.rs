//! Configuration schema for Foundry.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Shared search index used when a conversation has no dedicated one.
pub const DEFAULT_INDEX_ID: &str = "vs_68fffb393e7c81918c53643ecf212d0f";
/// Environment variable that overrides `memory.default_index_id`.
pub const INDEX_ID_ENV: &str = "OPENAI_VECTOR_STORE_ID";

/// Root config for the Foundry service.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FoundryConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub scenarios: ScenariosConfig,
}

impl FoundryConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> FoundryConfigBuilder {
        FoundryConfigBuilder::new()
    }
}

/// Builder for assembling a `FoundryConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct FoundryConfigBuilder {
    config: FoundryConfig,
}

impl FoundryConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: FoundryConfig::default(),
        }
    }

    /// Replace the HTTP server configuration.
    pub fn server(mut self, server: ServerConfig) -> Self {
        self.config.server = server;
        self
    }

    /// Replace the OpenAI client configuration.
    pub fn openai(mut self, openai: OpenAiConfig) -> Self {
        self.config.openai = openai;
        self
    }

    /// Replace the conversation memory configuration.
    pub fn memory(mut self, memory: MemoryConfig) -> Self {
        self.config.memory = memory;
        self
    }

    /// Replace the scenario defaults.
    pub fn scenarios(mut self, scenarios: ScenariosConfig) -> Self {
        self.config.scenarios = scenarios;
        self
    }

    /// Finalize and return the built `FoundryConfig`.
    pub fn build(self) -> FoundryConfig {
        self.config
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

/// Hosted OpenAI API settings shared by the agent runner and search index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpenAiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_model() -> String {
    "gpt-4.1".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

/// Conversation memory journal settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemoryConfig {
    /// Index assigned to conversations on first reference.
    #[serde(default = "default_index_id")]
    pub default_index_id: String,
    /// Directory for checkpoint records; in-memory when unset.
    #[serde(default)]
    pub store_path: Option<PathBuf>,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
    /// Result cap for the memory search tool exposed to personas.
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            default_index_id: default_index_id(),
            store_path: None,
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_attempts: default_max_poll_attempts(),
            max_results: default_max_results(),
        }
    }
}

fn default_index_id() -> String {
    DEFAULT_INDEX_ID.to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_max_poll_attempts() -> u32 {
    120
}

fn default_max_results() -> u32 {
    8
}

/// Defaults for the advisor scenarios.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScenariosConfig {
    /// Working state for Faith Foundry when the request names none.
    #[serde(default = "default_state")]
    pub default_state: String,
}

impl Default for ScenariosConfig {
    fn default() -> Self {
        Self {
            default_state: default_state(),
        }
    }
}

fn default_state() -> String {
    "Connecticut".to_string()
}
