//! Turning an LLM reply into typed steps.
//!
//! Models rarely return the tagged form verbatim: replies arrive inside
//! ```json fences, wrapped in a `{"steps": [...]}` object, or in shorthand
//! like `{"navigate": "https://..."}`. Everything is normalized into the
//! tagged form before deserializing into the closed `Step` set; anything that
//! still does not fit rejects the whole reply.

use crate::error::{Error, Result};
use regex::Regex;
use scout_core::Step;
use serde_json::{Map, Value};

/// Step kinds that accept the `{"<action>": "<selector-or-url>"}` shorthand.
const SHORTHAND_ACTIONS: &[&str] = &[
    "navigate",
    "click",
    "fill",
    "press_enter",
    "wait_for_selector",
    "extract_result",
];

/// Legacy aliases some models produce for our action names.
fn canonical_action(name: &str) -> &str {
    match name {
        "type" => "fill",
        "wait" => "wait_for_selector",
        "extract_text" | "extract" => "extract_result",
        other => other,
    }
}

/// Strip a ```json fence if the reply carries one.
fn extract_json_block(reply: &str) -> &str {
    let fence = Regex::new(r"(?s)```(?:json)?\s*(.*?)```").expect("fence regex");
    match fence.captures(reply) {
        Some(caps) => caps.get(1).map(|m| m.as_str().trim()).unwrap_or(reply),
        None => reply,
    }
}

/// Parse the reply as JSON, tolerating fences and surrounding prose.
pub fn parse_json_reply(reply: &str) -> Result<Value> {
    let body = extract_json_block(reply).trim();
    if let Ok(value) = serde_json::from_str(body) {
        return Ok(value);
    }
    // Fall back to the first JSON object or array embedded in prose.
    let embedded = Regex::new(r"(?s)(\{.*\}|\[.*\])").expect("embedded regex");
    if let Some(m) = embedded.find(body) {
        if let Ok(value) = serde_json::from_str(m.as_str()) {
            return Ok(value);
        }
    }
    Err(Error::BadResponse("no JSON found in reply".to_string()))
}

/// Normalize a raw reply value into typed steps.
pub fn normalize_steps(raw: Value) -> Result<Vec<Step>> {
    let entries = match raw {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("steps") {
            Some(Value::Array(entries)) => entries,
            _ => return Err(Error::BadResponse("reply has no steps array".to_string())),
        },
        _ => return Err(Error::BadResponse("reply is not a steps array".to_string())),
    };
    if entries.is_empty() {
        return Err(Error::EmptyPlan);
    }

    let mut steps = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let Value::Object(obj) = entry else {
            return Err(Error::BadResponse(format!(
                "step {index} is not an object"
            )));
        };
        let tagged = normalize_step(obj)
            .ok_or_else(|| Error::BadResponse(format!("step {index} has no known action")))?;
        let step = serde_json::from_value::<Step>(Value::Object(tagged)).map_err(|err| {
            Error::BadResponse(format!("step {index} is malformed: {err}"))
        })?;
        steps.push(step);
    }
    Ok(steps)
}

/// Rewrite one step object into the tagged `{"action": ...}` form.
fn normalize_step(mut obj: Map<String, Value>) -> Option<Map<String, Value>> {
    // Already tagged: canonicalize the action name and parameter aliases.
    if let Some(Value::String(action)) = obj.get("action").cloned() {
        obj.insert(
            "action".to_string(),
            Value::String(canonical_action(&action).to_string()),
        );
        rename_key(&mut obj, "text", "value");
        return Some(obj);
    }

    // Shorthand: the action name is a key, e.g. {"navigate": "https://..."}.
    let (key, value) = SHORTHAND_ACTIONS
        .iter()
        .chain(["type", "wait", "extract_text"].iter())
        .find_map(|name| obj.get(*name).cloned().map(|v| ((*name).to_string(), v)))?;

    let action = canonical_action(&key).to_string();
    let mut tagged = Map::new();
    tagged.insert("action".to_string(), Value::String(action.clone()));
    match action.as_str() {
        "navigate" => {
            tagged.insert("url".to_string(), value);
        }
        "press_enter" => {}
        _ => {
            tagged.insert("selector".to_string(), value);
        }
    }
    // Carry over remaining parameters (e.g. a sibling "text"/"value" on fill).
    obj.remove(&key);
    for (k, v) in obj {
        let k = if k == "text" { "value".to_string() } else { k };
        tagged.entry(k).or_insert(v);
    }
    Some(tagged)
}

fn rename_key(obj: &mut Map<String, Value>, from: &str, to: &str) {
    if let Some(value) = obj.remove(from) {
        obj.entry(to.to_string()).or_insert(value);
    }
}

/// Full pipeline: reply text to typed steps.
pub fn steps_from_reply(reply: &str) -> Result<Vec<Step>> {
    normalize_steps(parse_json_reply(reply)?)
}
