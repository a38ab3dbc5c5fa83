//! Reply extraction from upstream response bodies.
//!
//! `OpenAI`-compatible providers do not agree on where the reply text
//! lives. Extraction is an ordered list of probes, each returning an
//! optional string; the first hit wins and the raw body serialized as
//! JSON is the guaranteed last resort.

use serde_json::Value;

type Extractor = fn(&Value) -> Option<String>;

/// Probes tried in order against the raw upstream body.
const EXTRACTORS: &[Extractor] = &[chat_message_content, completion_text, output_content];

/// Extract the assistant reply from a raw upstream response body.
///
/// Never fails: when no known layout matches, the serialized body itself
/// stands in as the reply so the failure is at least inspectable.
#[must_use]
pub fn reply_text(raw: &Value) -> String {
    EXTRACTORS
        .iter()
        .find_map(|probe| probe(raw))
        .unwrap_or_else(|| raw.to_string())
}

/// Chat completions layout: `choices[0].message.content`.
fn chat_message_content(raw: &Value) -> Option<String> {
    raw.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

/// Legacy completions layout: `choices[0].text`.
fn completion_text(raw: &Value) -> Option<String> {
    raw.pointer("/choices/0/text")
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

/// Responses-style layout: `output[0].content`.
fn output_content(raw: &Value) -> Option<String> {
    raw.pointer("/output/0/content")
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

/// Error message reported by a failed upstream response.
///
/// Checks `error.message` first, then a top-level `message`.
#[must_use]
pub fn upstream_error_message(raw: &Value) -> Option<String> {
    raw.pointer("/error/message")
        .and_then(Value::as_str)
        .or_else(|| raw.get("message").and_then(Value::as_str))
        .map(ToString::to_string)
}
