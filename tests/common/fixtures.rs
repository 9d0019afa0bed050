//! Test data factories for integration tests.
#![allow(dead_code)]

use serde_json::{Value, json};
use wiremock::ResponseTemplate;

/// The probe endpoint path appended to a mock server's base URL.
pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// A minimal successful chat-completions body.
///
/// The probe ignores response bodies, but upstreams send one.
#[must_use]
pub fn completion_body(model: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": model,
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": "好" },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 9, "completion_tokens": 1, "total_tokens": 10 }
    })
}

/// A 200 response carrying all four rate-limit headers.
#[must_use]
pub fn quota_response(
    model: &str,
    limit: i64,
    remaining: i64,
    model_limit: i64,
    model_remaining: i64,
) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(completion_body(model))
        .insert_header("modelscope-ratelimit-requests-limit", limit.to_string())
        .insert_header(
            "modelscope-ratelimit-requests-remaining",
            remaining.to_string(),
        )
        .insert_header(
            "modelscope-ratelimit-model-requests-limit",
            model_limit.to_string(),
        )
        .insert_header(
            "modelscope-ratelimit-model-requests-remaining",
            model_remaining.to_string(),
        )
}

/// A 200 response with no rate-limit headers at all.
#[must_use]
pub fn bare_response(model: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(completion_body(model))
}
