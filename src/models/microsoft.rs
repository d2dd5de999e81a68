// Microsoft Translator v3.0 type definitions
// Author: kelexine (https://github.com/kelexine)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextType {
    Plain,
    Html,
}

impl TextType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextType::Plain => "plain",
            TextType::Html => "html",
        }
    }
}

/// Typed Microsoft translate options. Keys are sent in camel case, exactly
/// as named here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MicrosoftOptions {
    /// Forced to `html` when ignore patterns are supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_type: Option<TextType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub profanity_action: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub profanity_marker: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_alignment: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_sentence_length: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_from: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_fallback: Option<bool>,
}

/// Element of the JSON array body sent to `/translate` and `/detect`.
#[derive(Debug, Clone, Serialize)]
pub struct TextItem {
    pub text: String,
}

/// One element of the `/translate` response array.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateItem {
    /// Absent when the request named a `from` language.
    #[serde(default)]
    pub detected_language: Option<DetectedLanguage>,
    pub translations: Vec<TranslationEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetectedLanguage {
    pub language: String,
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslationEntry {
    pub text: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub transliteration: Option<TransliterationText>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransliterationText {
    pub text: String,
    #[serde(default)]
    pub script: String,
}

/// Response from `GET /languages`; only the requested scope is populated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LanguagesResponse {
    pub translation: BTreeMap<String, TranslationLanguage>,
    pub transliteration: BTreeMap<String, TransliterationEntry>,
    pub dictionary: BTreeMap<String, DictionaryEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationLanguage {
    pub name: String,
    #[serde(default)]
    pub native_name: String,
    #[serde(default)]
    pub dir: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransliterationEntry {
    pub name: String,
    #[serde(default)]
    pub native_name: String,
    #[serde(default)]
    pub scripts: Vec<Script>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub native_name: String,
    #[serde(default)]
    pub dir: String,
    #[serde(default)]
    pub to_scripts: Vec<Script>,
}

/// A `dictionary` scope entry: source language and its lookup targets.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryEntry {
    pub name: String,
    #[serde(default)]
    pub native_name: String,
    #[serde(default)]
    pub dir: String,
    #[serde(default)]
    pub translations: Vec<DictionaryTarget>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryTarget {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub native_name: String,
    #[serde(default)]
    pub dir: String,
}

/// One element of the `/detect` response array.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectItem {
    pub language: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub is_translation_supported: Option<bool>,
}
