// Google Cloud Translation v2 and legacy endpoint type definitions
// Author: kelexine (https://github.com/kelexine)

use crate::error::{Result, TranslateError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Text,
    Html,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Text => "text",
            Format::Html => "html",
        }
    }
}

/// Typed Google v2 translate options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GoogleOptions {
    /// Forced to `html` when ignore patterns are supplied. Google treats a
    /// missing format as `html`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,

    /// `base` or `nmt`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// JSON body of `POST /language/translate/v2`.
#[derive(Debug, Clone, Serialize)]
pub struct V2TranslateBody {
    pub q: Vec<String>,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Every v2 response is wrapped in a `data` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct V2Envelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct V2Translations {
    pub translations: Vec<V2Translation>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V2Translation {
    pub translated_text: String,
    /// Only present when the request omitted `source`.
    #[serde(default)]
    pub detected_source_language: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct V2Detections {
    pub detections: Vec<Vec<V2Detection>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V2Detection {
    pub language: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub is_reliable: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct V2Languages {
    pub languages: Vec<V2Language>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct V2Language {
    pub language: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Decoded legacy (`translate_a/single`) response.
///
/// The wire shape is a positional tuple:
/// `[[[translation, original, ...], ...], null, detected_language, ...]`.
/// Long inputs are split into several sentence chunks, which are
/// concatenated back together here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct V1Response {
    pub translation: String,
    pub detected_language: String,
}

impl V1Response {
    pub fn from_value(value: &Value) -> Result<Self> {
        let chunks = value
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| {
                TranslateError::Provider("Legacy response is missing its sentence list".to_string())
            })?;

        let translation: String = chunks
            .iter()
            .filter_map(|chunk| chunk.get(0).and_then(Value::as_str))
            .collect();

        let detected_language = value
            .get(2)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            translation,
            detected_language,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_v1_single_sentence() {
        let value = json!([[["¿Dónde está el baño?", "Where is the bathroom?", null, null, 10]], null, "en"]);
        let parsed = V1Response::from_value(&value).unwrap();
        assert_eq!(parsed.translation, "¿Dónde está el baño?");
        assert_eq!(parsed.detected_language, "en");
    }

    #[test]
    fn test_v1_multiple_chunks_are_concatenated() {
        let value = json!([
            [["Hola. ", "Hello. "], ["¿Cómo estás?", "How are you?"], [null, null, "transliteration"]],
            null,
            "en"
        ]);
        let parsed = V1Response::from_value(&value).unwrap();
        assert_eq!(parsed.translation, "Hola. ¿Cómo estás?");
    }

    #[test]
    fn test_v1_malformed_response() {
        assert!(V1Response::from_value(&json!({"error": "nope"})).is_err());
    }

    #[test]
    fn test_v2_envelope_parsing() {
        let value = json!({"data": {"translations": [
            {"translatedText": "Hola", "detectedSourceLanguage": "en"}
        ]}});
        let envelope: V2Envelope<V2Translations> = serde_json::from_value(value).unwrap();
        assert_eq!(envelope.data.translations[0].translated_text, "Hola");
    }
}
