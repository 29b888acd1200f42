#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::ResponseTemplate;

pub const TOKEN: &str = "123:test-token";

/// Load test fixture from file
pub fn load_fixture(filename: &str) -> String {
    std::fs::read_to_string(filename)
        .unwrap_or_else(|_| panic!("Failed to load test fixture: {filename}"))
}

/// A streaming completion response built from a fixture.
pub fn sse_response(fixture: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(load_fixture(fixture))
        .insert_header("content-type", "text/event-stream")
        .insert_header("cache-control", "no-cache")
}

/// Path of a Bot API method on the mock server.
pub fn bot_path(method: &str) -> String {
    format!("/bot{TOKEN}/{method}")
}

/// Successful Bot API envelope.
pub fn telegram_ok(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": result}))
}

/// The message object Telegram returns for `sendMessage`.
pub fn sent_message(chat_id: i64, text: &str) -> Value {
    json!({
        "message_id": 99,
        "date": 1752000000,
        "chat": {"id": chat_id, "type": "private"},
        "text": text
    })
}

/// A text message update as returned by `getUpdates`.
pub fn text_update(update_id: i64, chat_id: i64, text: &str) -> Value {
    json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id * 10,
            "date": 1752000000,
            "from": {"id": chat_id, "is_bot": false, "first_name": "Ada"},
            "chat": {"id": chat_id, "type": "private", "first_name": "Ada"},
            "text": text
        }
    })
}
