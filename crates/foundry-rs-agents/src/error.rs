//! Error types for agent execution.

use thiserror::Error;

/// Errors returned by agent runners.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Transport-level failure talking to the agent engine.
    #[error("agent request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The engine answered with a non-success status.
    #[error("agent engine returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// Response body did not have the expected shape.
    #[error("malformed agent response: {0}")]
    Malformed(String),
    /// Failure reported by a non-HTTP runner.
    #[error("agent execution failed: {0}")]
    Execution(String),
}
