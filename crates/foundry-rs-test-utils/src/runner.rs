use async_trait::async_trait;
use foundry_rs_agents::{AgentError, AgentRunner, Persona, RunOutput};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

use crate::history::assistant_message;

/// Runner that answers every turn with a fixed reply.
#[derive(Clone)]
pub struct ScriptedRunner {
    reply: String,
    fail: bool,
    calls: Arc<Mutex<Vec<(Persona, Vec<Value>, String)>>>,
}

impl ScriptedRunner {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            fail: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new("")
        }
    }

    /// `(persona, input, group_id)` for each call.
    pub fn calls(&self) -> Vec<(Persona, Vec<Value>, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl AgentRunner for ScriptedRunner {
    async fn run(
        &self,
        persona: &Persona,
        input: Vec<Value>,
        group_id: &str,
    ) -> Result<RunOutput, AgentError> {
        self.calls
            .lock()
            .push((persona.clone(), input.clone(), group_id.to_string()));
        if self.fail {
            return Err(AgentError::Execution("scripted failure".to_string()));
        }
        let mut history = input;
        history.push(assistant_message(&self.reply));
        Ok(RunOutput {
            final_output: self.reply.clone(),
            history,
        })
    }
}
