//! Microsoft Translator v3.0 adapter.
//!
//! Translation is two-phase: the transliteration table is fetched to pick
//! `fromScript`/`toScript` for the target, then all segments go out in one
//! `POST /translate`. Protected spans use HTML `notranslate` markup.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod catalog;

pub use catalog::{DictionaryLanguage, TransliterationLanguage};

use super::{instrumented, Capabilities, ProviderConfig, ProviderKind, Translator};
use crate::error::{Result, TranslateError};
use crate::masking::{mask, Masked, MarkupStyle};
use crate::models::microsoft::{DetectItem, TextItem, TextType, TranslateItem};
use crate::models::{
    Detection, Language, ScriptPair, TranslationOutput, TranslationRequest,
};
use crate::transport::{Transport, WireRequest};
use crate::translation::request::source_language;
use crate::translation::{
    extend_passthrough, normalize, request_segments, KeyConvention, NormalizeOptions,
    RawTranslation,
};
use async_trait::async_trait;
use catalog::API_VERSION;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

pub const DEFAULT_BASE_URL: &str = "https://api.cognitive.microsofttranslator.com";

const NAME: &str = "microsoft";

pub struct Microsoft {
    config: ProviderConfig,
    transport: Arc<dyn Transport>,
}

impl Microsoft {
    pub fn new(
        api_key: impl Into<String>,
        region: Option<String>,
        base_url: Option<String>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            config: ProviderConfig {
                kind: ProviderKind::Microsoft,
                credential: Some(api_key.into()),
                base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                region: region.filter(|r| !r.is_empty()),
                capabilities: Capabilities {
                    languages: true,
                    detect: true,
                    usage: false,
                    transliteration: true,
                },
            },
            transport,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn authorized(&self, mut request: WireRequest) -> WireRequest {
        request = request
            .header("Ocp-Apim-Subscription-Key", self.config.credential())
            .header("X-ClientTraceId", Uuid::new_v4().to_string());
        if let Some(region) = &self.config.region {
            request = request.header("Ocp-Apim-Subscription-Region", region.clone());
        }
        request
    }

    /// Writing systems for `target`, from a freshly fetched catalog.
    pub async fn resolve_scripts(&self, target: &str) -> Result<Option<ScriptPair>> {
        catalog::resolve_scripts(self.transport.as_ref(), self.config.trimmed_base(), target).await
    }

    pub async fn transliteration_languages(&self) -> Result<Vec<TransliterationLanguage>> {
        catalog::transliteration_languages(self.transport.as_ref(), self.config.trimmed_base())
            .await
    }

    /// Source languages of the dictionary lookup table and their targets.
    pub async fn dictionary_languages(&self) -> Result<Vec<DictionaryLanguage>> {
        catalog::dictionary_languages(self.transport.as_ref(), self.config.trimmed_base()).await
    }

    /// Build the `/translate` call for already-masked segments.
    pub fn build_translate_request(
        &self,
        request: &TranslationRequest,
        masked: &Masked,
        scripts: Option<&ScriptPair>,
    ) -> Result<WireRequest> {
        let options = &request.options.microsoft;
        let mut query: Vec<(String, String)> =
            vec![("api-version".to_string(), API_VERSION.to_string())];

        if let Some(source) = source_language(request) {
            query.push(("from".to_string(), source.to_string()));
        }
        query.push(("to".to_string(), request.target.clone()));

        if let Some(scripts) = scripts {
            query.push(("fromScript".to_string(), scripts.from_script.clone()));
            if let Some(to_script) = &scripts.to_script {
                query.push(("toScript".to_string(), to_script.clone()));
            }
        }

        let text_type = if masked.is_active() {
            Some(TextType::Html)
        } else {
            options.text_type
        };
        if let Some(text_type) = text_type {
            query.push(("textType".to_string(), text_type.as_str().to_string()));
        }

        let typed = [
            ("category", options.category.clone()),
            ("profanityAction", options.profanity_action.clone()),
            ("profanityMarker", options.profanity_marker.clone()),
            ("includeAlignment", options.include_alignment.map(|b| b.to_string())),
            (
                "includeSentenceLength",
                options.include_sentence_length.map(|b| b.to_string()),
            ),
            ("suggestedFrom", options.suggested_from.clone()),
            ("allowFallback", options.allow_fallback.map(|b| b.to_string())),
        ];
        query.extend(
            typed
                .into_iter()
                .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key.to_string(), v))),
        );
        extend_passthrough(&mut query, &request.options.extra, KeyConvention::Verbatim);

        let body: Vec<TextItem> = masked
            .segments
            .iter()
            .map(|s| TextItem {
                text: s.masked.clone(),
            })
            .collect();

        let url = format!("{}/translate", self.config.trimmed_base());
        Ok(self.authorized(WireRequest::post(NAME, url).query_pairs(query).json(&body)?))
    }

    async fn translate_inner(&self, request: &TranslationRequest) -> Result<TranslationOutput> {
        let segments = request_segments(request)?;
        let scripts = self.resolve_scripts(&request.target).await?;
        let masked = mask(&segments, &request.options.ignore, MarkupStyle::Html);
        let wire = self.build_translate_request(request, &masked, scripts.as_ref())?;

        let items: Vec<TranslateItem> = serde_json::from_value(self.transport.send(wire).await?)?;
        debug!("Microsoft returned {} items", items.len());

        let raw = items
            .into_iter()
            .map(|item| -> Result<RawTranslation> {
                let detected = item.detected_language.map(|d| d.language);
                let entry = item.translations.into_iter().next().ok_or_else(|| {
                    TranslateError::Provider("translation item without translations".to_string())
                })?;
                Ok(RawTranslation::new(entry.text)
                    .detected(detected)
                    .transliterated(entry.transliteration.map(|t| t.text)))
            })
            .collect::<Result<Vec<_>>>()?;

        let decode = masked.is_active() || request.options.microsoft.text_type == Some(TextType::Html);
        normalize(
            raw,
            &masked,
            &NormalizeOptions {
                join: request.options.join,
                decode_entities: decode,
                fallback_language: source_language(request).map(str::to_string),
            },
        )
    }

    async fn translation_languages(&self) -> Result<Vec<Language>> {
        let response =
            catalog::fetch_languages(self.transport.as_ref(), self.config.trimmed_base(), "translation")
                .await?;
        Ok(response
            .translation
            .into_iter()
            .map(|(code, language)| Language {
                code,
                name: language.name,
                supports_formality: None,
            })
            .collect())
    }
}

#[async_trait]
impl Translator for Microsoft {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Microsoft
    }

    fn capabilities(&self) -> Capabilities {
        self.config.capabilities
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationOutput> {
        instrumented(NAME, self.translate_inner(request)).await
    }

    async fn source_languages(&self) -> Result<Vec<Language>> {
        self.translation_languages().await
    }

    async fn target_languages(&self) -> Result<Vec<Language>> {
        self.translation_languages().await
    }

    async fn detect_language(&self, texts: &[String]) -> Result<Vec<Detection>> {
        let body: Vec<TextItem> = texts
            .iter()
            .map(|t| TextItem { text: t.clone() })
            .collect();
        let url = format!("{}/detect", self.config.trimmed_base());
        let wire = self.authorized(
            WireRequest::post(NAME, url)
                .query_pair("api-version", API_VERSION)
                .json(&body)?,
        );

        let items: Vec<DetectItem> = serde_json::from_value(self.transport.send(wire).await?)?;
        Ok(items
            .into_iter()
            .map(|item| Detection {
                language: item.language,
                score: item.score,
                reliable: None,
            })
            .collect())
    }
}
