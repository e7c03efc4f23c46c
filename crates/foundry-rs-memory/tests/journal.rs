use foundry_rs_memory::{
    ConversationJournal, ConversationMemoryRecord, InMemoryRecordStore, MemoryError, RecordStore,
};
use foundry_rs_protocol::{HistoryItem, parse_history};
use foundry_rs_test_utils::{
    RecordingIndex, assistant_message, tool_call, tool_result, user_message,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;

const DEFAULT_INDEX: &str = "vs_default";

struct Harness {
    store: Arc<InMemoryRecordStore>,
    index: RecordingIndex,
    journal: ConversationJournal,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryRecordStore::new());
    let index = RecordingIndex::new();
    let journal = ConversationJournal::new(store.clone(), Arc::new(index.clone()), DEFAULT_INDEX);
    Harness {
        store,
        index,
        journal,
    }
}

fn history(values: &[Value]) -> Vec<HistoryItem> {
    parse_history(values)
}

#[tokio::test]
async fn first_turns_are_archived_then_only_new_items() {
    let h = harness();
    let turn_one = vec![user_message("Hello"), assistant_message("Hi there")];

    let record = h
        .journal
        .persist("c1", &history(&turn_one), None)
        .await
        .expect("persist");
    assert_eq!(record, ConversationMemoryRecord::new(DEFAULT_INDEX).advanced_to(2));
    assert_eq!(h.index.transcripts(), vec!["USER: Hello\n\nASSISTANT: Hi there"]);

    let mut turn_two = turn_one.clone();
    turn_two.push(user_message("Thanks"));
    let record = h
        .journal
        .persist("c1", &history(&turn_two), Some(record))
        .await
        .expect("persist");
    assert_eq!(record.stored_count, 3);
    assert_eq!(h.index.transcripts()[1], "USER: Thanks");

    let files = h.index.files();
    assert!(files.iter().all(|(index_id, _)| index_id == DEFAULT_INDEX));
    assert!(files[0].1.name.starts_with("c1-"));
    assert!(files[0].1.name.ends_with(".txt"));
    assert_eq!(
        h.store.get("c1").await.expect("get"),
        Some(ConversationMemoryRecord::new(DEFAULT_INDEX).advanced_to(3))
    );
}

#[tokio::test]
async fn repeated_persist_does_not_reindex() {
    let h = harness();
    let items = history(&[user_message("Hello")]);

    let first = h.journal.persist("c1", &items, None).await.expect("persist");
    let second = h
        .journal
        .persist("c1", &items, Some(first.clone()))
        .await
        .expect("persist");

    assert_eq!(first, second);
    assert_eq!(h.index.len(), 1);
}

#[tokio::test]
async fn index_failure_leaves_checkpoint_untouched() {
    let h = harness();
    let items = history(&[user_message("Hello"), assistant_message("Hi")]);
    h.index.set_failing(true);

    let err = h.journal.persist("c1", &items, None).await.unwrap_err();
    assert!(matches!(err, MemoryError::Index(_)));
    assert_eq!(h.store.get("c1").await.expect("get"), None);

    h.index.set_failing(false);
    let record = h.journal.persist("c1", &items, None).await.expect("retry");
    assert_eq!(record.stored_count, 2);
    assert_eq!(h.index.transcripts(), vec!["USER: Hello\n\nASSISTANT: Hi"]);
}

#[tokio::test]
async fn items_without_content_advance_without_indexing() {
    let h = harness();
    let items = history(&[
        json!({ "type": "reasoning", "summary": [] }),
        json!({ "type": "message", "role": "assistant", "content": "   " }),
    ]);

    let record = h.journal.persist("c1", &items, None).await.expect("persist");
    assert_eq!(record.stored_count, 2);
    assert!(h.index.is_empty());
    assert_eq!(h.store.get("c1").await.expect("get"), Some(record));
}

#[tokio::test]
async fn tool_activity_is_rendered_in_order() {
    let h = harness();
    let items = history(&[
        user_message("Find my notes"),
        tool_call("farm_memory_search", json!({ "query": "hens" })),
        tool_result("call_1", json!("two hens laying")),
        assistant_message("Both hens are laying."),
    ]);

    h.journal.persist("c1", &items, None).await.expect("persist");
    assert_eq!(
        h.index.transcripts(),
        vec![
            "USER: Find my notes\n\n\
             TOOL_CALL farm_memory_search({\"query\":\"hens\"})\n\n\
             TOOL_RESULT call_1: two hens laying\n\n\
             ASSISTANT: Both hens are laying."
        ]
    );
}

#[tokio::test]
async fn stored_record_keeps_its_index() {
    let h = harness();
    h.store
        .set("c1", &ConversationMemoryRecord::new("vs_custom").advanced_to(1))
        .await
        .expect("set");

    let record = h.journal.get_memory("c1").await.expect("get");
    assert_eq!(record.index_id, "vs_custom");

    let items = history(&[user_message("old"), user_message("new")]);
    let record = h.journal.persist("c1", &items, None).await.expect("persist");
    assert_eq!(record.index_id, "vs_custom");
    assert_eq!(record.stored_count, 2);
    assert_eq!(h.index.files()[0].0, "vs_custom");
    assert_eq!(h.index.transcripts(), vec!["USER: new"]);
}

#[tokio::test]
async fn unknown_conversation_gets_default_record_without_storing() {
    let h = harness();
    let record = h.journal.get_memory("fresh").await.expect("get");
    assert_eq!(record, ConversationMemoryRecord::new(DEFAULT_INDEX));
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn shrunken_history_resets_checkpoint() {
    let h = harness();
    let record = ConversationMemoryRecord::new(DEFAULT_INDEX).advanced_to(5);

    let record = h
        .journal
        .persist("c1", &history(&[user_message("restart")]), Some(record))
        .await
        .expect("persist");
    assert_eq!(record.stored_count, 1);
    assert!(h.index.is_empty());

    let record = h
        .journal
        .persist(
            "c1",
            &history(&[user_message("restart"), assistant_message("ok")]),
            Some(record),
        )
        .await
        .expect("persist");
    assert_eq!(record.stored_count, 2);
    assert_eq!(h.index.transcripts(), vec!["ASSISTANT: ok"]);
}
