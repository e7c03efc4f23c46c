//! Agent execution interface.

use crate::error::AgentError;
use crate::persona::Persona;
use async_trait::async_trait;
use serde_json::Value;

/// Result of running a persona over a message sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    /// Final text answer for the turn.
    pub final_output: String,
    /// Input items followed by every item produced during the run.
    pub history: Vec<Value>,
}

#[async_trait]
/// Executes a persona over the conversation so far.
pub trait AgentRunner: Send + Sync {
    /// Run one turn. `group_id` ties runs of the same conversation together.
    async fn run(
        &self,
        persona: &Persona,
        input: Vec<Value>,
        group_id: &str,
    ) -> Result<RunOutput, AgentError>;
}
