// Provider-independent request preparation
// Author: kelexine (https://github.com/kelexine)

use crate::error::{Result, TranslateError};
use crate::models::TranslationRequest;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Option keys that steer the pipeline itself and are never sent.
const RESERVED_KEYS: [&str; 2] = ["ignore", "join"];

/// How a provider spells its parameter names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyConvention {
    /// `splitSentences` -> `split_sentences` (DeepL)
    SnakeCase,
    /// Sent exactly as given (Microsoft, Google)
    Verbatim,
}

impl KeyConvention {
    pub fn apply(&self, key: &str) -> String {
        match self {
            KeyConvention::SnakeCase => to_snake_case(key),
            KeyConvention::Verbatim => key.to_string(),
        }
    }
}

/// Convert a camel-case key to snake case. Keys already in snake case pass
/// through unchanged.
pub fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev_lower = false;
    for c in key.chars() {
        if c.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Flatten passthrough options into query or form pairs.
///
/// Arrays become one pair per element, in order. Null and empty values are
/// omitted, as are the reserved pipeline keys.
pub fn passthrough_pairs(
    extra: &BTreeMap<String, Value>,
    convention: KeyConvention,
) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in extra {
        if RESERVED_KEYS.contains(&key.as_str()) {
            continue;
        }
        let name = convention.apply(key);
        match value {
            Value::Array(items) => {
                pairs.extend(
                    items
                        .iter()
                        .filter_map(scalar_to_string)
                        .map(|v| (name.clone(), v)),
                );
            }
            other => {
                if let Some(v) = scalar_to_string(other) {
                    pairs.push((name, v));
                }
            }
        }
    }
    pairs
}

/// Append passthrough pairs to `fields`, dropping any whose converted name
/// is already present. Fields the builder set always win.
pub fn extend_passthrough(
    fields: &mut Vec<(String, String)>,
    extra: &BTreeMap<String, Value>,
    convention: KeyConvention,
) {
    let emitted: Vec<String> = fields.iter().map(|(name, _)| name.clone()).collect();
    for (name, value) in passthrough_pairs(extra, convention) {
        if emitted.contains(&name) {
            debug!("Dropping passthrough option {}: already set", name);
            continue;
        }
        fields.push((name, value));
    }
}

/// Passthrough options as JSON object members, for providers taking a JSON
/// body.
pub fn passthrough_json(
    extra: &BTreeMap<String, Value>,
    convention: KeyConvention,
) -> Map<String, Value> {
    extra
        .iter()
        .filter(|(key, value)| !RESERVED_KEYS.contains(&key.as_str()) && !value.is_null())
        .map(|(key, value)| (convention.apply(key), value.clone()))
        .collect()
}

/// Validate `request` and return its ordered input segments.
pub fn request_segments(request: &TranslationRequest) -> Result<Vec<String>> {
    if request.target.trim().is_empty() {
        return Err(TranslateError::InvalidRequest(
            "target language is required".to_string(),
        ));
    }

    let segments = request.text.clone().into_segments();
    if segments.is_empty() {
        return Err(TranslateError::InvalidRequest(
            "at least one text segment is required".to_string(),
        ));
    }

    debug!(
        "Preparing {} segments for target {}",
        segments.len(),
        request.target
    );
    Ok(segments)
}

/// The caller's source language, treating blank as absent.
pub fn source_language(request: &TranslationRequest) -> Option<&str> {
    request
        .source
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
