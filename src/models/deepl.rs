// DeepL API v2 type definitions
// Author: kelexine (https://github.com/kelexine)

use serde::{Deserialize, Serialize};

/// How DeepL should interpret inline markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagHandling {
    Xml,
    Html,
}

impl TagHandling {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagHandling::Xml => "xml",
            TagHandling::Html => "html",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formality {
    Default,
    More,
    Less,
    PreferMore,
    PreferLess,
}

impl Formality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Formality::Default => "default",
            Formality::More => "more",
            Formality::Less => "less",
            Formality::PreferMore => "prefer_more",
            Formality::PreferLess => "prefer_less",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitSentences {
    #[serde(rename = "0")]
    Off,
    #[serde(rename = "1")]
    On,
    #[serde(rename = "nonewlines")]
    NoNewlines,
}

impl SplitSentences {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitSentences::Off => "0",
            SplitSentences::On => "1",
            SplitSentences::NoNewlines => "nonewlines",
        }
    }
}

/// Typed DeepL translate options. Anything not modeled here goes through
/// `TranslateOptions::extra`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeepLOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formality: Option<Formality>,

    /// Ignored when ignore patterns are supplied: masking forces `xml`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_handling: Option<TagHandling>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_sentences: Option<SplitSentences>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_formatting: Option<bool>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignore_tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub glossary_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Response from `POST /v2/translate`.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslateResponse {
    pub translations: Vec<Translation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Translation {
    pub text: String,
    #[serde(default)]
    pub detected_source_language: Option<String>,
}

/// One entry of `GET /v2/languages`.
#[derive(Debug, Clone, Deserialize)]
pub struct LanguageEntry {
    pub language: String,
    pub name: String,
    #[serde(default)]
    pub supports_formality: Option<bool>,
}

/// Response from `GET /v2/usage`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UsageResponse {
    pub character_count: u64,
    pub character_limit: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_response_parsing() {
        let raw = r#"{"translations":[{"detected_source_language":"EN","text":"Hallo"}]}"#;
        let response: TranslateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.translations[0].text, "Hallo");
        assert_eq!(
            response.translations[0].detected_source_language.as_deref(),
            Some("EN")
        );
    }

    #[test]
    fn test_options_use_camel_case() {
        let options: DeepLOptions = serde_json::from_str(
            r#"{"splitSentences":"nonewlines","formality":"prefer_less","ignoreTags":["x"]}"#,
        )
        .unwrap();
        assert_eq!(options.split_sentences, Some(SplitSentences::NoNewlines));
        assert_eq!(options.formality, Some(Formality::PreferLess));
        assert_eq!(options.ignore_tags, vec!["x"]);
    }
}
