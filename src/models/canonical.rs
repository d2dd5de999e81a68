// Provider-independent request and result types
// Author: kelexine (https://github.com/kelexine)

use super::deepl::DeepLOptions;
use super::google::GoogleOptions;
use super::microsoft::MicrosoftOptions;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Input text: one string or an ordered list of strings.
///
/// Order is significant and is preserved through the whole pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Text {
    Single(String),
    Many(Vec<String>),
}

impl Text {
    /// Flatten into the ordered segment list every adapter works on.
    pub fn into_segments(self) -> Vec<String> {
        match self {
            Text::Single(text) => vec![text],
            Text::Many(texts) => texts,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Text::Single(_) => 1,
            Text::Many(texts) => texts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for Text {
    fn from(text: &str) -> Self {
        Text::Single(text.to_string())
    }
}

impl From<String> for Text {
    fn from(text: String) -> Self {
        Text::Single(text)
    }
}

impl From<Vec<String>> for Text {
    fn from(texts: Vec<String>) -> Self {
        Text::Many(texts)
    }
}

impl From<Vec<&str>> for Text {
    fn from(texts: Vec<&str>) -> Self {
        Text::Many(texts.into_iter().map(str::to_string).collect())
    }
}

/// Spans that must not be translated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnorePatterns {
    /// Unicode property names, e.g. `Extended_Pictographic` or `Script=Greek`.
    pub unicode: Vec<String>,
    /// Regular expressions in `regex` crate syntax.
    pub regex: Vec<String>,
}

impl IgnorePatterns {
    pub fn is_empty(&self) -> bool {
        self.unicode.is_empty() && self.regex.is_empty()
    }
}

/// Options shared by every provider, plus typed per-provider option bags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TranslateOptions {
    pub ignore: IgnorePatterns,

    /// Collapse the result list into one space-joined string.
    pub join: bool,

    #[serde(skip_serializing_if = "is_default")]
    pub deepl: DeepLOptions,

    #[serde(skip_serializing_if = "is_default")]
    pub microsoft: MicrosoftOptions,

    #[serde(skip_serializing_if = "is_default")]
    pub google: GoogleOptions,

    /// Unmodeled provider fields, keyed by their camel-case name and passed
    /// through verbatim under the receiving provider's key convention.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

impl TranslateOptions {
    pub fn with_ignore(mut self, ignore: IgnorePatterns) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn joined(mut self) -> Self {
        self.join = true;
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// The canonical translation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    pub text: Text,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub options: TranslateOptions,
}

impl TranslationRequest {
    pub fn new(text: impl Into<Text>, target: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target: target.into(),
            source: None,
            options: TranslateOptions::default(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_options(mut self, options: TranslateOptions) -> Self {
        self.options = options;
        self
    }
}

/// One translated segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub translation: String,
    pub detected_language: String,
    /// The caller's input segment after whitespace normalization.
    pub original: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transliteration: Option<String>,
}

/// What `translate` returns: one result per input segment, or a single
/// string when `join` was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranslationOutput {
    Segments(Vec<TranslationResult>),
    Joined(String),
}

impl TranslationOutput {
    pub fn segments(&self) -> Option<&[TranslationResult]> {
        match self {
            TranslationOutput::Segments(results) => Some(results),
            TranslationOutput::Joined(_) => None,
        }
    }

    pub fn joined(&self) -> Option<&str> {
        match self {
            TranslationOutput::Joined(text) => Some(text),
            TranslationOutput::Segments(_) => None,
        }
    }

    pub fn into_segments(self) -> Option<Vec<TranslationResult>> {
        match self {
            TranslationOutput::Segments(results) => Some(results),
            TranslationOutput::Joined(_) => None,
        }
    }
}

/// A language a provider can translate from or into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supports_formality: Option<bool>,
}

/// Result of language detection for one input segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub language: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reliable: Option<bool>,
}

/// Character quota for the current billing period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub character_count: u64,
    pub character_limit: u64,
}

/// Writing-system codes needed by transliteration-capable requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptPair {
    pub from_script: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_script: Option<String>,
}
