//! Provider adapters behind one translation contract.
//!
//! Every adapter implements [`Translator`]. `translate` is mandatory; the
//! catalog operations default to [`TranslateError::Unsupported`] and are
//! overridden by the providers that offer them, as advertised by
//! [`Capabilities`].
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod deepl;
pub mod google;
pub mod microsoft;

pub use deepl::DeepL;
pub use google::{Google, GoogleV1, GoogleV2};
pub use microsoft::Microsoft;

use crate::error::{Result, TranslateError};
use crate::models::{Detection, Language, TranslationOutput, TranslationRequest, Usage};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[value(name = "deepl")]
    DeepL,
    Microsoft,
    Google,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::DeepL => "deepl",
            ProviderKind::Microsoft => "microsoft",
            ProviderKind::Google => "google",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional operations a provider offers beyond `translate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub languages: bool,
    pub detect: bool,
    pub usage: bool,
    pub transliteration: bool,
}

/// Everything an adapter needs, resolved once at construction.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    /// `None` only for the keyless Google endpoint.
    pub credential: Option<String>,
    pub base_url: String,
    /// Microsoft only.
    pub region: Option<String>,
    pub capabilities: Capabilities,
}

impl ProviderConfig {
    pub(crate) fn trimmed_base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub(crate) fn credential(&self) -> &str {
        self.credential.as_deref().unwrap_or_default()
    }
}

/// The canonical translation contract.
#[async_trait]
pub trait Translator: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    fn capabilities(&self) -> Capabilities;

    /// Translate every segment of `request` into `request.target`.
    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationOutput>;

    async fn source_languages(&self) -> Result<Vec<Language>> {
        Err(TranslateError::unsupported(self.name(), "source_languages"))
    }

    async fn target_languages(&self) -> Result<Vec<Language>> {
        Err(TranslateError::unsupported(self.name(), "target_languages"))
    }

    /// Detect the language of each input, index-aligned.
    async fn detect_language(&self, _texts: &[String]) -> Result<Vec<Detection>> {
        Err(TranslateError::unsupported(self.name(), "detect_language"))
    }

    async fn usage(&self) -> Result<Usage> {
        Err(TranslateError::unsupported(self.name(), "usage"))
    }
}

/// Run `call` and count its outcome under `provider`.
pub(crate) async fn instrumented<F>(provider: &'static str, call: F) -> Result<TranslationOutput>
where
    F: std::future::Future<Output = Result<TranslationOutput>>,
{
    let result = call.await;
    crate::metrics::record_translate(provider, result.is_ok());
    if let Err(e) = &result {
        tracing::warn!(provider, "translate failed: {}", e);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    #[async_trait]
    impl Translator for Bare {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Google
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities::default()
        }

        async fn translate(&self, _request: &TranslationRequest) -> Result<TranslationOutput> {
            Ok(TranslationOutput::Joined(String::new()))
        }
    }

    #[tokio::test]
    async fn test_defaults_are_unsupported() {
        let bare = Bare;
        let err = bare.usage().await.unwrap_err();
        assert_eq!(err.to_string(), "google does not support usage");
        assert!(bare.source_languages().await.is_err());
        assert!(bare.detect_language(&["x".to_string()]).await.is_err());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ProviderKind::DeepL.to_string(), "deepl");
        assert_eq!(
            serde_json::to_value(ProviderKind::Microsoft).unwrap(),
            serde_json::json!("microsoft")
        );
    }
}
