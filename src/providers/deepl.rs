//! DeepL API v2 adapter.
//!
//! Segments are sent in one form-encoded `POST /v2/translate`. Protected
//! spans use XML markup, with `tag_handling=xml` and the `ignore` tag listed
//! in `ignore_tags`.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use super::{instrumented, Capabilities, ProviderConfig, ProviderKind, Translator};
use crate::error::Result;
use crate::masking::{mask, Masked, MarkupStyle, XML_IGNORE_TAG};
use crate::metrics;
use crate::models::deepl::{LanguageEntry, TagHandling, TranslateResponse, UsageResponse};
use crate::models::{Language, TranslationOutput, TranslationRequest, Usage};
use crate::transport::{Transport, WireRequest};
use crate::translation::request::source_language;
use crate::translation::{
    extend_passthrough, normalize, request_segments, KeyConvention, NormalizeOptions,
    RawTranslation,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

pub const FREE_BASE_URL: &str = "https://api-free.deepl.com";
pub const PRO_BASE_URL: &str = "https://api.deepl.com";

const NAME: &str = "deepl";

/// Endpoint for a key's tier. Free-tier keys end in `:fx`.
pub fn base_url_for(api_key: &str) -> &'static str {
    if api_key.ends_with(":fx") {
        FREE_BASE_URL
    } else {
        PRO_BASE_URL
    }
}

/// Rewrite target codes DeepL rejects into the variant it accepts.
///
/// Bare `en` and `pt` are deprecated as targets; they become `en-us` and
/// `pt-pt`. Any other code is returned unchanged.
pub fn correct_target(target: &str) -> String {
    let corrected = match target.to_ascii_lowercase().as_str() {
        "en" => "en-us",
        "pt" => "pt-pt",
        _ => return target.to_string(),
    };
    warn!(
        "DeepL does not accept target {:?}; sending {:?} instead",
        target, corrected
    );
    metrics::record_target_rewrite(NAME, target, corrected);
    corrected.to_string()
}

pub struct DeepL {
    config: ProviderConfig,
    transport: Arc<dyn Transport>,
}

impl DeepL {
    /// Create an adapter. Without `base_url` the endpoint follows the key
    /// tier.
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let api_key = api_key.into();
        let base_url = base_url.unwrap_or_else(|| base_url_for(&api_key).to_string());
        Self {
            config: ProviderConfig {
                kind: ProviderKind::DeepL,
                credential: Some(api_key),
                base_url,
                region: None,
                capabilities: Capabilities {
                    languages: true,
                    detect: false,
                    usage: true,
                    transliteration: false,
                },
            },
            transport,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn authorized(&self, request: WireRequest) -> WireRequest {
        request.header(
            "Authorization",
            format!("DeepL-Auth-Key {}", self.config.credential()),
        )
    }

    /// Build the `/v2/translate` call for already-masked segments.
    pub fn build_translate_request(
        &self,
        request: &TranslationRequest,
        masked: &Masked,
    ) -> WireRequest {
        let options = &request.options.deepl;
        let mut fields: Vec<(String, String)> = masked
            .segments
            .iter()
            .map(|s| ("text".to_string(), s.masked.clone()))
            .collect();

        fields.push(("target_lang".to_string(), correct_target(&request.target)));
        if let Some(source) = source_language(request) {
            fields.push(("source_lang".to_string(), source.to_string()));
        }

        let mut ignore_tags = options.ignore_tags.clone();
        let tag_handling = if masked.is_active() {
            if !ignore_tags.iter().any(|t| t == XML_IGNORE_TAG) {
                ignore_tags.push(XML_IGNORE_TAG.to_string());
            }
            Some(TagHandling::Xml)
        } else {
            options.tag_handling
        };
        if let Some(tag_handling) = tag_handling {
            fields.push(("tag_handling".to_string(), tag_handling.as_str().to_string()));
        }
        let mut seen = Vec::new();
        for tag in ignore_tags.into_iter().filter(|t| !t.is_empty()) {
            if !seen.contains(&tag) {
                seen.push(tag.clone());
                fields.push(("ignore_tags".to_string(), tag));
            }
        }

        if let Some(formality) = options.formality {
            fields.push(("formality".to_string(), formality.as_str().to_string()));
        }
        if let Some(split) = options.split_sentences {
            fields.push(("split_sentences".to_string(), split.as_str().to_string()));
        }
        if let Some(preserve) = options.preserve_formatting {
            let flag = if preserve { "1" } else { "0" };
            fields.push(("preserve_formatting".to_string(), flag.to_string()));
        }
        if let Some(glossary) = options.glossary_id.as_ref().filter(|g| !g.is_empty()) {
            fields.push(("glossary_id".to_string(), glossary.clone()));
        }
        if let Some(context) = options.context.as_ref().filter(|c| !c.is_empty()) {
            fields.push(("context".to_string(), context.clone()));
        }

        extend_passthrough(&mut fields, &request.options.extra, KeyConvention::SnakeCase);

        let url = format!("{}/v2/translate", self.config.trimmed_base());
        self.authorized(WireRequest::post(NAME, url).form(fields))
    }

    async fn translate_inner(&self, request: &TranslationRequest) -> Result<TranslationOutput> {
        let segments = request_segments(request)?;
        let masked = mask(&segments, &request.options.ignore, MarkupStyle::Xml);
        let wire = self.build_translate_request(request, &masked);

        let value = self.transport.send(wire).await?;
        let response: TranslateResponse = serde_json::from_value(value)?;
        debug!("DeepL returned {} translations", response.translations.len());

        let raw = response
            .translations
            .into_iter()
            .map(|t| RawTranslation::new(t.text).detected(t.detected_source_language))
            .collect();

        normalize(
            raw,
            &masked,
            &NormalizeOptions {
                join: request.options.join,
                decode_entities: masked.is_active(),
                fallback_language: source_language(request).map(str::to_string),
            },
        )
    }

    async fn languages(&self, kind: &str) -> Result<Vec<Language>> {
        let url = format!("{}/v2/languages", self.config.trimmed_base());
        let wire = self.authorized(WireRequest::get(NAME, url).query_pair("type", kind));
        let entries: Vec<LanguageEntry> = serde_json::from_value(self.transport.send(wire).await?)?;

        Ok(entries
            .into_iter()
            .map(|e| Language {
                code: e.language,
                name: e.name,
                supports_formality: e.supports_formality,
            })
            .collect())
    }
}

#[async_trait]
impl Translator for DeepL {
    fn kind(&self) -> ProviderKind {
        ProviderKind::DeepL
    }

    fn capabilities(&self) -> Capabilities {
        self.config.capabilities
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationOutput> {
        instrumented(NAME, self.translate_inner(request)).await
    }

    async fn source_languages(&self) -> Result<Vec<Language>> {
        self.languages("source").await
    }

    async fn target_languages(&self) -> Result<Vec<Language>> {
        self.languages("target").await
    }

    async fn usage(&self) -> Result<Usage> {
        let url = format!("{}/v2/usage", self.config.trimmed_base());
        let wire = self.authorized(WireRequest::get(NAME, url));
        let usage: UsageResponse = serde_json::from_value(self.transport.send(wire).await?)?;

        Ok(Usage {
            character_count: usage.character_count,
            character_limit: usage.character_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::deepl::{Formality, SplitSentences};
    use crate::models::{IgnorePatterns, TranslateOptions};
    use serde_json::Value;

    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        async fn send(&self, _request: WireRequest) -> Result<Value> {
            unreachable!("builder tests never send")
        }
    }

    fn adapter(key: &str) -> DeepL {
        DeepL::new(key, None, Arc::new(Unreachable))
    }

    fn build(request: &TranslationRequest) -> WireRequest {
        let segments = request.text.clone().into_segments();
        let masked = mask(&segments, &request.options.ignore, MarkupStyle::Xml);
        adapter("abc:fx").build_translate_request(request, &masked)
    }

    #[test]
    fn test_base_url_follows_key_tier() {
        assert_eq!(adapter("abc:fx").config().base_url, FREE_BASE_URL);
        assert_eq!(adapter("abc").config().base_url, PRO_BASE_URL);
    }

    #[test]
    fn test_target_correction() {
        assert_eq!(correct_target("EN"), "en-us");
        assert_eq!(correct_target("pt"), "pt-pt");
        assert_eq!(correct_target("en-GB"), "en-GB");
        assert_eq!(correct_target("de"), "de");
    }

    #[test]
    fn test_plain_request() {
        let request = TranslationRequest::new(vec!["Hello", "World"], "EN").with_source("de");
        let wire = build(&request);

        assert_eq!(wire.url, "https://api-free.deepl.com/v2/translate");
        assert_eq!(wire.form_values("text"), vec!["Hello", "World"]);
        assert_eq!(wire.form_value("target_lang"), Some("en-us"));
        assert_eq!(wire.form_value("source_lang"), Some("de"));
        assert_eq!(wire.form_value("tag_handling"), None);
        assert_eq!(wire.header_value("Authorization"), Some("DeepL-Auth-Key abc:fx"));
    }

    #[test]
    fn test_masking_forces_xml_tag_handling() {
        let mut options = TranslateOptions::default().with_ignore(IgnorePatterns {
            unicode: vec!["Extended_Pictographic".to_string()],
            regex: Vec::new(),
        });
        options.deepl.ignore_tags = vec!["x".to_string(), "ignore".to_string()];
        let request = TranslationRequest::new("Nice 😀", "de").with_options(options);
        let wire = build(&request);

        assert_eq!(wire.form_value("tag_handling"), Some("xml"));
        assert_eq!(wire.form_values("ignore_tags"), vec!["x", "ignore"]);
        assert_eq!(wire.form_value("text"), Some("Nice <ignore>😀</ignore>"));
    }

    #[test]
    fn test_typed_options_and_extras() {
        let mut options = TranslateOptions::default()
            .joined()
            .with_extra("outlineDetection", false);
        options.deepl.formality = Some(Formality::PreferLess);
        options.deepl.split_sentences = Some(SplitSentences::NoNewlines);
        options.deepl.preserve_formatting = Some(true);
        let request = TranslationRequest::new("Hi", "fr").with_options(options);
        let wire = build(&request);

        assert_eq!(wire.form_value("formality"), Some("prefer_less"));
        assert_eq!(wire.form_value("split_sentences"), Some("nonewlines"));
        assert_eq!(wire.form_value("preserve_formatting"), Some("1"));
        assert_eq!(wire.form_value("outline_detection"), Some("false"));
        assert_eq!(wire.form_value("join"), None);
    }

    #[test]
    fn test_caller_tag_handling_cannot_undo_masking() {
        let request: TranslationRequest = serde_json::from_value(serde_json::json!({
            "text": "Hi 😀",
            "target": "de",
            "options": {
                "ignore": {"unicode": ["Extended_Pictographic"]},
                "tagHandling": "html",
                "targetLang": "fr"
            }
        }))
        .unwrap();
        let wire = build(&request);

        assert_eq!(wire.form_values("tag_handling"), vec!["xml"]);
        assert_eq!(wire.form_values("target_lang"), vec!["de"]);
    }

    #[test]
    fn test_caller_tag_handling_passes_without_masking() {
        let options = TranslateOptions::default().with_extra("tagHandling", "html");
        let request = TranslationRequest::new("<b>Hi</b>", "de").with_options(options);
        let wire = build(&request);

        assert_eq!(wire.form_values("tag_handling"), vec!["html"]);
    }
}
