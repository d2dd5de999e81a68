// Keyless legacy Google endpoint (translate_a/single)
// Author: kelexine (https://github.com/kelexine)

use super::NAME;
use crate::error::Result;
use crate::masking::{mask, MarkupStyle};
use crate::models::google::V1Response;
use crate::models::{IgnorePatterns, TranslationOutput, TranslationRequest};
use crate::providers::{Capabilities, ProviderConfig, ProviderKind};
use crate::transport::{Transport, WireRequest};
use crate::translation::request::source_language;
use crate::translation::{normalize, request_segments, NormalizeOptions, RawTranslation};
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://translate.googleapis.com";

/// `sl` value asking the endpoint to detect the source.
const AUTO_SOURCE: &str = "auto";

pub struct GoogleV1 {
    config: ProviderConfig,
    transport: Arc<dyn Transport>,
}

impl GoogleV1 {
    pub fn new(base_url: Option<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: ProviderConfig {
                kind: ProviderKind::Google,
                credential: None,
                base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                region: None,
                capabilities: Capabilities::default(),
            },
            transport,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// One GET per segment.
    pub fn build_segment_request(&self, segment: &str, target: &str, source: Option<&str>) -> WireRequest {
        let url = format!("{}/translate_a/single", self.config.trimmed_base());
        WireRequest::get(NAME, url).query_pairs([
            ("client", "gtx"),
            ("dt", "t"),
            ("sl", source.unwrap_or(AUTO_SOURCE)),
            ("tl", target),
            ("q", segment),
        ])
    }

    pub(super) async fn translate(&self, request: &TranslationRequest) -> Result<TranslationOutput> {
        let segments = request_segments(request)?;
        if !request.options.ignore.is_empty() {
            warn!("The keyless Google endpoint cannot protect spans; ignore patterns are skipped");
        }
        if !request.options.extra.is_empty() {
            warn!(
                "The keyless Google endpoint takes no extra options; skipping {} keys",
                request.options.extra.len()
            );
        }

        let masked = mask(&segments, &IgnorePatterns::default(), MarkupStyle::Html);
        let source = source_language(request);

        let calls = masked.segments.iter().map(|segment| {
            let wire = self.build_segment_request(&segment.plain, &request.target, source);
            async move {
                let value = self.transport.send(wire).await?;
                V1Response::from_value(&value)
            }
        });
        let responses = try_join_all(calls).await?;
        debug!("Google v1 translated {} segments", responses.len());

        let raw = responses
            .into_iter()
            .map(|r| RawTranslation::new(r.translation).detected(Some(r.detected_language)))
            .collect();

        normalize(
            raw,
            &masked,
            &NormalizeOptions {
                join: request.options.join,
                decode_entities: false,
                fallback_language: source.map(str::to_string),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TranslateError;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    /// Answers each segment with its uppercase form, detected as `en`.
    struct Uppercase;

    #[async_trait]
    impl Transport for Uppercase {
        async fn send(&self, request: WireRequest) -> Result<Value> {
            let q = request.query_value("q").unwrap_or_default();
            if q == "fail" {
                return Err(TranslateError::Transport {
                    status: 429,
                    status_text: "Too Many Requests".to_string(),
                    body: String::new(),
                });
            }
            Ok(json!([[[q.to_uppercase(), q]], null, "en"]))
        }
    }

    #[test]
    fn test_segment_request_defaults_to_auto() {
        let adapter = GoogleV1::new(None, Arc::new(Uppercase));
        let wire = adapter.build_segment_request("Hello", "es", None);

        assert_eq!(wire.url, "https://translate.googleapis.com/translate_a/single");
        assert_eq!(wire.query_value("client"), Some("gtx"));
        assert_eq!(wire.query_value("dt"), Some("t"));
        assert_eq!(wire.query_value("sl"), Some("auto"));
        assert_eq!(wire.query_value("tl"), Some("es"));
        assert_eq!(wire.query_value("q"), Some("Hello"));
    }

    #[tokio::test]
    async fn test_fan_out_preserves_order() {
        let adapter = GoogleV1::new(None, Arc::new(Uppercase));
        let request = TranslationRequest::new(vec!["one", "two", "three"], "xx");

        let results = adapter
            .translate(&request)
            .await
            .unwrap()
            .into_segments()
            .unwrap();
        let translations: Vec<_> = results.iter().map(|r| r.translation.as_str()).collect();
        assert_eq!(translations, vec!["ONE", "TWO", "THREE"]);
        assert!(results.iter().all(|r| r.detected_language == "en"));
    }

    #[tokio::test]
    async fn test_one_failure_fails_the_call() {
        let adapter = GoogleV1::new(None, Arc::new(Uppercase));
        let request = TranslationRequest::new(vec!["ok", "fail"], "xx");

        let err = adapter.translate(&request).await.unwrap_err();
        assert_eq!(err.status(), Some(429));
    }
}
