// Google Cloud Translation v2 (API key) adapter
// Author: kelexine (https://github.com/kelexine)

use super::NAME;
use crate::error::{Result, TranslateError};
use crate::masking::{mask, Masked, MarkupStyle};
use crate::models::google::{
    Format, V2Detections, V2Envelope, V2Languages, V2TranslateBody, V2Translations,
};
use crate::models::{Detection, Language, TranslationOutput, TranslationRequest};
use crate::providers::{Capabilities, ProviderConfig, ProviderKind};
use crate::transport::{Method, Transport, WireRequest};
use crate::translation::request::source_language;
use crate::translation::{
    normalize, passthrough_json, request_segments, KeyConvention, NormalizeOptions,
    RawTranslation,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://translation.googleapis.com";

const TRANSLATE_PATH: &str = "/language/translate/v2";

/// Display language for catalog names when the caller does not pick one.
pub const DEFAULT_DISPLAY_LANGUAGE: &str = "en";

pub struct GoogleV2 {
    config: ProviderConfig,
    transport: Arc<dyn Transport>,
}

impl GoogleV2 {
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            config: ProviderConfig {
                kind: ProviderKind::Google,
                credential: Some(api_key.into()),
                base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                region: None,
                capabilities: Capabilities {
                    languages: true,
                    detect: true,
                    usage: false,
                    transliteration: false,
                },
            },
            transport,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn endpoint(&self, method: Method, suffix: &str) -> WireRequest {
        let url = format!("{}{}{}", self.config.trimmed_base(), TRANSLATE_PATH, suffix);
        let request = match method {
            Method::Post => WireRequest::post(NAME, url),
            Method::Get => WireRequest::get(NAME, url),
        };
        request.query_pair("key", self.config.credential())
    }

    /// Build the translate call for already-masked segments.
    pub fn build_translate_request(
        &self,
        request: &TranslationRequest,
        masked: &Masked,
    ) -> Result<WireRequest> {
        let options = &request.options.google;
        let body = V2TranslateBody {
            q: masked.masked_texts(),
            target: request.target.clone(),
            source: source_language(request).map(str::to_string),
            format: if masked.is_active() {
                Some(Format::Html)
            } else {
                options.format
            },
            model: options.model.clone().filter(|m| !m.is_empty()),
        };

        let mut body = serde_json::to_value(&body)?;
        if let Value::Object(members) = &mut body {
            for (key, value) in passthrough_json(&request.options.extra, KeyConvention::Verbatim) {
                members.entry(key).or_insert(value);
            }
        }

        self.endpoint(Method::Post, "").json(&body)
    }

    pub(super) async fn translate(&self, request: &TranslationRequest) -> Result<TranslationOutput> {
        let segments = request_segments(request)?;
        let masked = mask(&segments, &request.options.ignore, MarkupStyle::Html);
        let wire = self.build_translate_request(request, &masked)?;

        let envelope: V2Envelope<V2Translations> =
            serde_json::from_value(self.transport.send(wire).await?)?;
        debug!("Google v2 returned {} translations", envelope.data.translations.len());

        let raw = envelope
            .data
            .translations
            .into_iter()
            .map(|t| RawTranslation::new(t.translated_text).detected(t.detected_source_language))
            .collect();

        // Output is HTML-escaped unless plain text was requested.
        let decode = masked.is_active() || request.options.google.format != Some(Format::Text);
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

    pub(super) async fn detect_language(&self, texts: &[String]) -> Result<Vec<Detection>> {
        let wire = self.endpoint(Method::Post, "/detect").json(&json!({ "q": texts }))?;
        let envelope: V2Envelope<V2Detections> =
            serde_json::from_value(self.transport.send(wire).await?)?;

        envelope
            .data
            .detections
            .into_iter()
            .map(|candidates| -> Result<Detection> {
                let best = candidates.into_iter().next().ok_or_else(|| {
                    TranslateError::Provider("detection without candidates".to_string())
                })?;
                Ok(Detection {
                    language: best.language,
                    score: best.confidence,
                    reliable: best.is_reliable,
                })
            })
            .collect()
    }

    /// Supported languages, with names written in `display_language`.
    pub async fn languages(&self, display_language: &str) -> Result<Vec<Language>> {
        let wire = self
            .endpoint(Method::Get, "/languages")
            .query_pair("target", display_language);
        let envelope: V2Envelope<V2Languages> =
            serde_json::from_value(self.transport.send(wire).await?)?;

        Ok(envelope
            .data
            .languages
            .into_iter()
            .map(|l| Language {
                name: l.name.unwrap_or_else(|| l.language.clone()),
                code: l.language,
                supports_formality: None,
            })
            .collect())
    }
}
