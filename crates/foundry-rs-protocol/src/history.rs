//! Conversation history items produced by agent runs.
//!
//! Agent engines hand back history as loosely shaped JSON. Only three item
//! shapes matter to the memory journal; everything else classifies as
//! [`HistoryItem::Other`] so new item kinds never break archiving.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Role assumed for message items that do not carry one.
const DEFAULT_ROLE: &str = "assistant";

/// Classified view of a single history item.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryItem {
    /// User, assistant, or system message.
    Message {
        role: String,
        content: MessageContent,
    },
    /// Function call emitted by the model.
    ToolCall {
        name: Option<String>,
        /// Raw arguments: either a JSON string or a structured value.
        arguments: Option<Value>,
    },
    /// Output returned for a previous tool call.
    ToolResult {
        call_id: Option<String>,
        output: Value,
    },
    /// Any item shape the journal does not archive.
    Other,
}

/// Message body: plain text or a list of typed parts.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
    /// Content missing or of an unsupported shape.
    Empty,
}

/// Text-bearing fields of a single content part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentPart {
    pub text: Option<String>,
    pub transcript: Option<String>,
    pub refusal: Option<String>,
}

impl HistoryItem {
    /// Build a plain-text message item.
    pub fn message(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Message {
            role: role.into(),
            content: MessageContent::Text(text.into()),
        }
    }

    /// Classify a raw JSON item.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::Other;
        };
        match map.get("type").and_then(Value::as_str) {
            Some("message") => message_from_map(map),
            // Shorthand input messages carry a role but no type.
            None if map.contains_key("role") => message_from_map(map),
            Some("function_call") => Self::ToolCall {
                name: string_field(map, "name"),
                arguments: map.get("arguments").cloned(),
            },
            Some("function_call_result") | Some("function_call_output") => Self::ToolResult {
                call_id: string_field(map, "callId").or_else(|| string_field(map, "call_id")),
                output: map.get("output").cloned().unwrap_or(Value::Null),
            },
            _ => Self::Other,
        }
    }
}

impl From<&Value> for HistoryItem {
    fn from(value: &Value) -> Self {
        Self::from_value(value)
    }
}

impl<'de> Deserialize<'de> for HistoryItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

impl ContentPart {
    /// Classify a raw content part; non-object parts carry no text.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };
        Self {
            text: string_field(map, "text"),
            transcript: string_field(map, "transcript"),
            refusal: string_field(map, "refusal"),
        }
    }
}

impl MessageContent {
    /// Classify raw message content.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(text)) => Self::Text(text.clone()),
            Some(Value::Array(parts)) => {
                Self::Parts(parts.iter().map(ContentPart::from_value).collect())
            }
            _ => Self::Empty,
        }
    }
}

/// Classify every item of a raw history, preserving order.
pub fn parse_history(items: &[Value]) -> Vec<HistoryItem> {
    items.iter().map(HistoryItem::from_value).collect()
}

fn message_from_map(map: &Map<String, Value>) -> HistoryItem {
    HistoryItem::Message {
        role: string_field(map, "role").unwrap_or_else(|| DEFAULT_ROLE.to_string()),
        content: MessageContent::from_value(map.get("content")),
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}
