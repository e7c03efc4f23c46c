use serde_json::{Value, json};

pub fn user_message(text: &str) -> Value {
    json!({ "type": "message", "role": "user", "content": text })
}

pub fn assistant_message(text: &str) -> Value {
    json!({
        "type": "message",
        "role": "assistant",
        "content": [{ "type": "output_text", "text": text }]
    })
}

pub fn tool_call(name: &str, arguments: Value) -> Value {
    json!({ "type": "function_call", "name": name, "arguments": arguments })
}

pub fn tool_result(call_id: &str, output: Value) -> Value {
    json!({ "type": "function_call_result", "callId": call_id, "output": output })
}
