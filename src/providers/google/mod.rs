//! Google Translate adapter.
//!
//! With an API key, Cloud Translation v2 is used. Without one, requests go
//! to the keyless legacy endpoint, which translates one segment per call and
//! offers no catalog operations.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod v1;
pub mod v2;

pub use v1::GoogleV1;
pub use v2::{GoogleV2, DEFAULT_DISPLAY_LANGUAGE};

use super::{instrumented, Capabilities, ProviderKind, Translator};
use crate::error::{Result, TranslateError};
use crate::models::{Detection, Language, TranslationOutput, TranslationRequest};
use crate::transport::Transport;
use async_trait::async_trait;
use std::sync::Arc;

pub(crate) const NAME: &str = "google";

pub enum Google {
    V2(GoogleV2),
    V1(GoogleV1),
}

impl Google {
    pub fn v2(
        api_key: impl Into<String>,
        base_url: Option<String>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Google::V2(GoogleV2::new(api_key, base_url, transport))
    }

    pub fn v1(base_url: Option<String>, transport: Arc<dyn Transport>) -> Self {
        Google::V1(GoogleV1::new(base_url, transport))
    }

    pub fn version(&self) -> &'static str {
        match self {
            Google::V2(_) => "v2",
            Google::V1(_) => "v1",
        }
    }
}

#[async_trait]
impl Translator for Google {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    fn capabilities(&self) -> Capabilities {
        match self {
            Google::V2(v2) => v2.config().capabilities,
            Google::V1(v1) => v1.config().capabilities,
        }
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationOutput> {
        match self {
            Google::V2(v2) => instrumented(NAME, v2.translate(request)).await,
            Google::V1(v1) => instrumented(NAME, v1.translate(request)).await,
        }
    }

    async fn source_languages(&self) -> Result<Vec<Language>> {
        match self {
            Google::V2(v2) => v2.languages(DEFAULT_DISPLAY_LANGUAGE).await,
            Google::V1(_) => Err(TranslateError::unsupported(NAME, "source_languages")),
        }
    }

    async fn target_languages(&self) -> Result<Vec<Language>> {
        match self {
            Google::V2(v2) => v2.languages(DEFAULT_DISPLAY_LANGUAGE).await,
            Google::V1(_) => Err(TranslateError::unsupported(NAME, "target_languages")),
        }
    }

    async fn detect_language(&self, texts: &[String]) -> Result<Vec<Detection>> {
        match self {
            Google::V2(v2) => v2.detect_language(texts).await,
            Google::V1(_) => Err(TranslateError::unsupported(NAME, "detect_language")),
        }
    }
}
