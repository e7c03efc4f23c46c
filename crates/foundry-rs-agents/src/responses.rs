//! Agent runner backed by the OpenAI Responses API.

use crate::error::AgentError;
use crate::persona::Persona;
use crate::runner::{AgentRunner, RunOutput};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

/// Connection settings for [`ResponsesRunner`].
#[derive(Debug, Clone)]
pub struct ResponsesOptions {
    /// API root, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub api_key: String,
    /// Model used when the persona does not name one.
    pub default_model: String,
}

/// Runs personas as single Responses API calls.
///
/// Memory search is exposed as the hosted `file_search` tool over the
/// persona's index.
#[derive(Debug, Clone)]
pub struct ResponsesRunner {
    client: Client,
    options: ResponsesOptions,
}

impl ResponsesRunner {
    pub fn new(client: Client, options: ResponsesOptions) -> Self {
        Self { client, options }
    }

    /// Request body for one turn.
    fn request_body(&self, persona: &Persona, input: &[Value], group_id: &str) -> Value {
        let model = persona
            .model
            .as_deref()
            .unwrap_or(&self.options.default_model);
        let mut body = json!({
            "model": model,
            "instructions": persona.instructions,
            "input": input,
            "metadata": { "group_id": group_id, "agent": persona.name },
        });
        if let Some(memory) = &persona.memory_search {
            body["tools"] = json!([{
                "type": "file_search",
                "vector_store_ids": [memory.index_id],
                "max_num_results": memory.max_results,
            }]);
            body["include"] = json!(["file_search_call.results"]);
        }
        body
    }
}

#[async_trait]
impl AgentRunner for ResponsesRunner {
    async fn run(
        &self,
        persona: &Persona,
        input: Vec<Value>,
        group_id: &str,
    ) -> Result<RunOutput, AgentError> {
        let body = self.request_body(persona, &input, group_id);
        debug!(
            "running persona (agent={}, group_id={}, input_items={})",
            persona.name,
            group_id,
            input.len()
        );
        let url = format!("{}/responses", self.options.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.options.api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let reply: ResponsesReply = response
            .json()
            .await
            .map_err(|err| AgentError::Malformed(err.to_string()))?;

        let final_output = final_output(&reply.output);
        info!(
            "persona run completed (agent={}, group_id={}, output_items={})",
            persona.name,
            group_id,
            reply.output.len()
        );
        let mut history = input;
        history.extend(reply.output);
        Ok(RunOutput {
            final_output,
            history,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ResponsesReply {
    #[serde(default)]
    output: Vec<Value>,
}

/// Text of the last assistant message among the output items.
fn final_output(output: &[Value]) -> String {
    output
        .iter()
        .rev()
        .filter(|item| item["type"] == "message")
        .find_map(|item| {
            let parts = item["content"].as_array()?;
            let text: String = parts
                .iter()
                .filter(|part| part["type"] == "output_text")
                .filter_map(|part| part["text"].as_str())
                .collect();
            (!text.is_empty()).then_some(text)
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{ResponsesOptions, ResponsesRunner, final_output};
    use crate::{AgentError, AgentRunner, faith_foundry, hobby_farm};
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use std::sync::Arc;

    #[derive(Default)]
    struct MockEngine {
        requests: Mutex<Vec<Value>>,
        fail: bool,
    }

    async fn respond(
        State(engine): State<Arc<MockEngine>>,
        Json(body): Json<Value>,
    ) -> Result<Json<Value>, StatusCode> {
        engine.requests.lock().push(body);
        if engine.fail {
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
        Ok(Json(json!({
            "id": "resp_1",
            "output": [
                { "type": "file_search_call", "id": "fs_1", "status": "completed" },
                {
                    "type": "message",
                    "role": "assistant",
                    "content": [{ "type": "output_text", "text": "Plan ready." }]
                }
            ]
        })))
    }

    async fn spawn_engine(engine: Arc<MockEngine>) -> String {
        let app = Router::new()
            .route("/v1/responses", post(respond))
            .with_state(engine);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });
        format!("http://{addr}/v1/")
    }

    fn runner(base_url: String) -> ResponsesRunner {
        ResponsesRunner::new(
            reqwest::Client::new(),
            ResponsesOptions {
                base_url,
                api_key: "sk-test".to_string(),
                default_model: "gpt-4.1-mini".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn run_appends_output_items_to_history() {
        let engine = Arc::new(MockEngine::default());
        let base_url = spawn_engine(engine.clone()).await;
        let input = vec![json!({ "type": "message", "role": "user", "content": "Hello" })];

        let output = runner(base_url)
            .run(&faith_foundry(Some("vs_1"), "TX"), input.clone(), "faith_1")
            .await
            .expect("run");

        assert_eq!(output.final_output, "Plan ready.");
        assert_eq!(output.history.len(), 3);
        assert_eq!(output.history[0], input[0]);
        assert_eq!(output.history[1]["type"], "file_search_call");

        let requests = engine.requests.lock();
        let request = &requests[0];
        assert_eq!(request["model"], "gpt-4.1");
        assert_eq!(request["metadata"]["group_id"], "faith_1");
        assert_eq!(
            request["tools"],
            json!([{
                "type": "file_search",
                "vector_store_ids": ["vs_1"],
                "max_num_results": 8
            }])
        );
        assert_eq!(request["input"], json!(input));
    }

    #[tokio::test]
    async fn persona_without_memory_sends_no_tools_and_default_model() {
        let engine = Arc::new(MockEngine::default());
        let base_url = spawn_engine(engine.clone()).await;

        runner(base_url)
            .run(&hobby_farm(None), Vec::new(), "biz_1")
            .await
            .expect("run");

        let requests = engine.requests.lock();
        assert_eq!(requests[0]["model"], "gpt-4.1-mini");
        assert!(requests[0].get("tools").is_none());
    }

    #[tokio::test]
    async fn error_status_is_surfaced() {
        let engine = Arc::new(MockEngine {
            fail: true,
            ..MockEngine::default()
        });
        let base_url = spawn_engine(engine).await;

        let err = runner(base_url)
            .run(&hobby_farm(None), Vec::new(), "biz_1")
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Status { status: 500, .. }));
    }

    #[test]
    fn final_output_prefers_last_assistant_message() {
        let output = vec![
            json!({ "type": "message", "content": [{ "type": "output_text", "text": "first" }] }),
            json!({ "type": "message", "content": [
                { "type": "output_text", "text": "second " },
                { "type": "refusal", "refusal": "no" },
                { "type": "output_text", "text": "part" }
            ] }),
            json!({ "type": "reasoning" }),
        ];
        assert_eq!(final_output(&output), "second part");
        assert_eq!(final_output(&[]), "");
    }
}
