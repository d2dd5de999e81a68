//! Configuration data structures for polytrans.
//!
//! This module defines the schema for the application settings: provider
//! credentials and endpoints, the shared HTTP client, and logging.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use serde::{Deserialize, Serialize};

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Credentials and endpoints for each translation provider.
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Shared HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub deepl: DeepLConfig,

    #[serde(default)]
    pub microsoft: MicrosoftConfig,

    #[serde(default)]
    pub google: GoogleConfig,
}

/// Settings for DeepL API v2.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeepLConfig {
    /// Authentication key. Keys ending in `:fx` belong to the free tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Overrides the endpoint derived from the key tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Settings for Microsoft Translator v3.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MicrosoftConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Azure region of the Translator resource.
    /// Default: `centralus`
    #[serde(default = "default_region")]
    pub region: String,

    /// Default: `https://api.cognitive.microsofttranslator.com`
    #[serde(default = "default_microsoft_base_url")]
    pub base_url: String,
}

/// Settings for Google Translate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// Cloud Translation API key. Without one the keyless legacy endpoint
    /// is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default: `https://translation.googleapis.com`
    #[serde(default = "default_google_base_url")]
    pub base_url: String,

    /// Default: `https://translate.googleapis.com`
    #[serde(default = "default_google_legacy_base_url")]
    pub legacy_base_url: String,
}

/// Settings for the pooled HTTP client shared by every adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Maximum number of idle connections kept per host.
    /// Default: `16`
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    /// Default: `polytrans/<version>`
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`, `compact`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Whether to mask API keys in logged request lines.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub sanitize_tokens: bool,
}

impl Default for MicrosoftConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            region: default_region(),
            base_url: default_microsoft_base_url(),
        }
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_google_base_url(),
            legacy_base_url: default_google_legacy_base_url(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            sanitize_tokens: true,
        }
    }
}

// Helper functions for serde defaults and shared constants
pub(crate) fn default_region() -> String {
    "centralus".to_string()
}

fn default_microsoft_base_url() -> String {
    "https://api.cognitive.microsofttranslator.com".to_string()
}

fn default_google_base_url() -> String {
    "https://translation.googleapis.com".to_string()
}

fn default_google_legacy_base_url() -> String {
    "https://translate.googleapis.com".to_string()
}

fn default_pool_size() -> usize {
    16
}

fn default_user_agent() -> String {
    concat!("polytrans/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
