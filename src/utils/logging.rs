//! Structured logging and credential-safe trace utilities.
//!
//! This module configures the `tracing` ecosystem for the application,
//! supporting multiple output formats and providing utilities to prevent
//! provider API keys from leaking into logs.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::LoggingConfig;
use crate::error::Result;
use regex::Regex;
use std::sync::OnceLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber for the application.
///
/// Supports three output formats:
/// - `json`: Structured JSON logs for ingestion.
/// - `compact`: Single-line human-readable output.
/// - `pretty` (default): Multi-line, colorized output for development.
///
/// Logs go to stderr so that JSON written to stdout by the CLI stays clean.
/// Log levels are controlled via the `RUST_LOG` environment variable or
/// the provided `LoggingConfig`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        "compact" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}

static SECRET_PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();

fn secret_patterns() -> &'static [(Regex, &'static str)] {
    SECRET_PATTERNS.get_or_init(|| {
        vec![
            // Google API keys travel as a `key` query parameter
            (
                Regex::new(r#"([?&]key=)[^&\s"']+"#).expect("Invalid regex pattern"),
                "${1}[REDACTED_API_KEY]",
            ),
            // DeepL authorization header
            (
                Regex::new(r#"(DeepL-Auth-Key\s+)[^\s"',]+"#).expect("Invalid regex pattern"),
                "${1}[REDACTED_API_KEY]",
            ),
            // Microsoft subscription key header, in `name: value` or debug tuple form
            (
                Regex::new(r#"(?i)(Ocp-Apim-Subscription-Key"?\s*[:=,]\s*"?)[^\s"',)]+"#)
                    .expect("Invalid regex pattern"),
                "${1}[REDACTED_API_KEY]",
            ),
        ]
    })
}

/// Sanitizes provider credentials from log messages.
///
/// Scans for the places an API key shows up in a request (the Google `key`
/// query parameter, the DeepL `Authorization` header and the Microsoft
/// subscription header) and replaces the secret with a placeholder.
///
/// # Arguments
///
/// * `input` - The raw string that may contain sensitive data.
///
/// # Returns
///
/// A new string where all detected secrets have been replaced.
pub fn sanitize(input: &str) -> String {
    secret_patterns()
        .iter()
        .fold(input.to_string(), |acc, (pattern, replacement)| {
            pattern.replace_all(&acc, *replacement).into_owned()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_google_key() {
        let input = "POST https://translation.googleapis.com/language/translate/v2?key=AIzaSyD-secret&target=es";
        let output = sanitize(input);
        assert!(output.contains("key=[REDACTED_API_KEY]&target=es"));
        assert!(!output.contains("AIzaSyD-secret"));
    }

    #[test]
    fn test_sanitize_deepl_header() {
        let input = r#"("Authorization", "DeepL-Auth-Key 1234-abcd:fx")"#;
        let output = sanitize(input);
        assert!(output.contains("[REDACTED_API_KEY]"));
        assert!(!output.contains("1234-abcd:fx"));
    }

    #[test]
    fn test_sanitize_microsoft_header() {
        let input = r#"("Ocp-Apim-Subscription-Key", "0123456789abcdef")"#;
        let output = sanitize(input);
        assert!(!output.contains("0123456789abcdef"));
    }

    #[test]
    fn test_sanitize_leaves_plain_text_alone() {
        assert_eq!(sanitize("translate 3 segments"), "translate 3 segments");
    }
}
