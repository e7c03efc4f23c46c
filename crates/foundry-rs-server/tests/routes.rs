use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use foundry_rs_memory::{ConversationJournal, InMemoryRecordStore, RecordStore};
use foundry_rs_server::{AppState, ChatSettings, router, start};
use foundry_rs_test_utils::{RecordingIndex, ScriptedRunner, user_message};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

const DEFAULT_INDEX: &str = "vs_default";

struct Harness {
    state: AppState,
    store: Arc<InMemoryRecordStore>,
    index: RecordingIndex,
    runner: ScriptedRunner,
}

fn harness(runner: ScriptedRunner) -> Harness {
    let store = Arc::new(InMemoryRecordStore::new());
    let index = RecordingIndex::new();
    let journal = ConversationJournal::new(store.clone(), Arc::new(index.clone()), DEFAULT_INDEX);
    let state = AppState::new(
        Arc::new(journal),
        Arc::new(runner.clone()),
        ChatSettings {
            default_state: "Connecticut".to_string(),
            max_results: 4,
        },
    );
    Harness {
        state,
        store,
        index,
        runner,
    }
}

async fn post_json(state: &AppState, path: &str, body: &str) -> Response {
    router(state.clone())
        .oneshot(
            Request::post(path)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
        .expect("response")
}

async fn read_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

#[tokio::test]
async fn faith_foundry_turn_generates_id_and_archives_history() {
    let h = harness(ScriptedRunner::new("Status: ready"));
    let body = json!({ "messages": [user_message("Hello")] }).to_string();

    let response = post_json(&h.state, "/api/faith-foundry", &body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let reply = read_json(response).await;

    let conversation_id = reply["conversationId"].as_str().expect("id").to_string();
    let suffix = conversation_id.strip_prefix("faith_").expect("prefix");
    assert_eq!(suffix.len(), 24);
    assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(reply["response"], "Status: ready");
    assert_eq!(reply["state"], "Connecticut");
    assert_eq!(reply["memoryVectorStoreId"], DEFAULT_INDEX);
    assert_eq!(reply["history"].as_array().expect("history").len(), 2);

    assert_eq!(
        h.index.transcripts(),
        vec!["USER: Hello\n\nASSISTANT: Status: ready"]
    );
    let record = h.store.get(&conversation_id).await.expect("get").expect("record");
    assert_eq!(record.stored_count, 2);

    let calls = h.runner.calls();
    assert_eq!(calls[0].2, conversation_id);
    let memory = calls[0].0.memory_search.clone().expect("memory");
    assert_eq!(memory.index_id, DEFAULT_INDEX);
    assert_eq!(memory.max_results, 4);
}

#[tokio::test]
async fn follow_up_turn_only_archives_new_items() {
    let h = harness(ScriptedRunner::new("Noted"));
    let first = json!({ "messages": [user_message("Hi")], "conversationId": "faith_abc" });
    let response = post_json(&h.state, "/api/faith-foundry", &first.to_string()).await;
    let reply = read_json(response).await;

    let mut history = reply["history"].as_array().expect("history").clone();
    history.push(user_message("Switch to Texas"));
    let second = json!({
        "messages": history,
        "conversationId": "faith_abc",
        "state": " TX "
    });
    let response = post_json(&h.state, "/api/faith-foundry", &second.to_string()).await;
    let reply = read_json(response).await;

    assert_eq!(reply["conversationId"], "faith_abc");
    assert_eq!(reply["state"], "TX");
    assert_eq!(
        h.index.transcripts(),
        vec![
            "USER: Hi\n\nASSISTANT: Noted",
            "USER: Switch to Texas\n\nASSISTANT: Noted"
        ]
    );
    assert!(h.runner.calls()[1].0.instructions.contains("Texas (TX)"));
    let record = h.store.get("faith_abc").await.expect("get").expect("record");
    assert_eq!(record.stored_count, 4);
}

#[tokio::test]
async fn small_business_uses_biz_prefix_and_omits_state() {
    let h = harness(ScriptedRunner::new("Checklist"));
    let body = json!({ "messages": [user_message("Eggs?")], "state": "Texas" }).to_string();

    let reply = read_json(post_json(&h.state, "/api/small-business", &body).await).await;
    assert!(
        reply["conversationId"]
            .as_str()
            .expect("id")
            .starts_with("biz_")
    );
    assert!(reply.get("state").is_none());
    assert_eq!(h.runner.calls()[0].0.name, "Hobby Farm Control Center");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_turns_for_one_conversation_archive_once() {
    let h = harness(ScriptedRunner::new("Collect eggs at dawn"));
    let body = json!({ "messages": [user_message("Plan my week")], "conversationId": "biz_c1" });

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let state = h.state.clone();
        let body = body.to_string();
        tasks.push(tokio::spawn(async move {
            post_json(&state, "/api/small-business", &body).await.status()
        }));
    }
    for task in tasks {
        assert_eq!(task.await.expect("task"), StatusCode::OK);
    }

    assert_eq!(
        h.index.transcripts(),
        vec!["USER: Plan my week\n\nASSISTANT: Collect eggs at dawn"]
    );
    let record = h.store.get("biz_c1").await.expect("get").expect("record");
    assert_eq!(record.stored_count, 2);
    assert_eq!(h.runner.calls().len(), 8);
}

#[tokio::test]
async fn runner_failure_is_internal_error_and_archives_nothing() {
    let h = harness(ScriptedRunner::failing());
    let body = json!({ "messages": [user_message("Hello")], "conversationId": "biz_1" });

    let response = post_json(&h.state, "/api/small-business", &body.to_string()).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        read_json(response).await,
        json!({ "error": "Internal server error" })
    );
    assert!(h.index.is_empty());
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn index_failure_is_internal_error_and_keeps_checkpoint() {
    let h = harness(ScriptedRunner::new("Hi"));
    h.index.set_failing(true);
    let body = json!({ "messages": [user_message("Hello")], "conversationId": "faith_x" });

    let response = post_json(&h.state, "/api/faith-foundry", &body.to_string()).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(h.store.get("faith_x").await.expect("get"), None);
}

#[tokio::test]
async fn malformed_body_is_internal_error() {
    let h = harness(ScriptedRunner::new("Hi"));
    let response = post_json(&h.state, "/api/faith-foundry", "{not json").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        read_json(response).await,
        json!({ "error": "Internal server error" })
    );
    assert!(h.runner.calls().is_empty());
}

#[tokio::test]
async fn served_health_check_and_shutdown() {
    let h = harness(ScriptedRunner::new("Hi"));
    let handle = start(h.state.clone(), "127.0.0.1:0").await.expect("start");

    let health: Value = reqwest::get(format!("http://127.0.0.1:{}/health", handle.port))
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert_eq!(health, json!({ "status": "ok" }));

    handle.shutdown().await.expect("shutdown");
}
