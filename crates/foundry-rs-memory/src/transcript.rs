//! Rendering of history items into archived transcript lines.

use foundry_rs_protocol::{ContentPart, HistoryItem, MessageContent};
use serde_json::Value;

/// Separator placed between lines of one archived transcript.
pub const LINE_SEPARATOR: &str = "\n\n";

/// Render items to transcript lines, skipping items that produce none.
pub fn render_lines(items: &[HistoryItem]) -> Vec<String> {
    items.iter().filter_map(render_item).collect()
}

/// Render a single item to at most one line.
pub fn render_item(item: &HistoryItem) -> Option<String> {
    match item {
        HistoryItem::Message { role, content } => {
            let text = message_text(content);
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return None;
            }
            Some(format!("{}: {trimmed}", role.to_uppercase()))
        }
        HistoryItem::ToolCall { name, arguments } => Some(format!(
            "TOOL_CALL {}({})",
            name.as_deref().unwrap_or("unknown"),
            render_arguments(arguments.as_ref())
        )),
        HistoryItem::ToolResult { call_id, output } => {
            let output = tool_output_text(output);
            if output.is_empty() {
                return None;
            }
            Some(format!(
                "TOOL_RESULT {}: {output}",
                call_id.as_deref().unwrap_or_default()
            ))
        }
        HistoryItem::Other => None,
    }
}

/// Extract the text of a message; structured parts are joined by newlines.
pub fn message_text(content: &MessageContent) -> String {
    match content {
        MessageContent::Text(text) => text.clone(),
        MessageContent::Parts(parts) => parts
            .iter()
            .filter_map(part_text)
            .collect::<Vec<_>>()
            .join("\n"),
        MessageContent::Empty => String::new(),
    }
}

/// First non-empty of text, transcript, refusal.
fn part_text(part: &ContentPart) -> Option<&str> {
    [&part.text, &part.transcript, &part.refusal]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .find(|text| !text.is_empty())
}

/// String arguments pass through; structured ones are serialized as JSON.
fn render_arguments(arguments: Option<&Value>) -> String {
    match arguments {
        None => String::new(),
        Some(Value::String(raw)) => raw.clone(),
        Some(value) => value.to_string(),
    }
}

/// Resolve tool output text: a plain string, else a `text` or `data` field.
fn tool_output_text(output: &Value) -> &str {
    match output {
        Value::String(text) => text,
        Value::Object(map) => map
            .get("text")
            .and_then(Value::as_str)
            .or_else(|| map.get("data").and_then(Value::as_str))
            .unwrap_or_default(),
        _ => "",
    }
}
