// CLI module for polytrans
// Author: kelexine (https://github.com/kelexine)

use crate::factory::Credentials;
use crate::models::{IgnorePatterns, TranslateOptions, TranslationRequest};
use crate::providers::ProviderKind;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListKind {
    Source,
    Target,
}

/// polytrans - translate text through DeepL, Microsoft Translator or Google
#[derive(Parser, Debug)]
#[command(name = "polytrans", version, about, long_about = None)]
pub struct Args {
    /// Provider to use
    #[arg(short, long, value_enum, default_value_t = ProviderKind::Google)]
    pub provider: ProviderKind,

    /// Target language code
    #[arg(short, long, default_value = "en")]
    pub target: String,

    /// Source language code (detected when omitted)
    #[arg(short, long)]
    pub source: Option<String>,

    /// Unicode property whose characters must not be translated (repeatable)
    #[arg(long = "ignore-unicode", value_name = "NAME")]
    pub ignore_unicode: Vec<String>,

    /// Regular expression whose matches must not be translated (repeatable)
    #[arg(long = "ignore-regex", value_name = "RE")]
    pub ignore_regex: Vec<String>,

    /// Print one space-joined string instead of a result list
    #[arg(long)]
    pub join: bool,

    /// List the provider's source or target languages instead of translating
    #[arg(long, value_enum)]
    pub list: Option<ListKind>,

    /// Detect the language of TEXT instead of translating
    #[arg(long)]
    pub detect: bool,

    /// Print DeepL character usage
    #[arg(long)]
    pub usage: bool,

    /// Print Prometheus metrics to stderr before exiting
    #[arg(long)]
    pub metrics: bool,

    /// Configuration file (default: ~/.polytrans/config.toml)
    #[arg(long, env = "POLYTRANS_CONFIG")]
    pub config: Option<PathBuf>,

    /// API key for the selected provider; overrides environment and config
    #[arg(long)]
    pub api_key: Option<String>,

    /// Azure region for Microsoft Translator
    #[arg(long)]
    pub region: Option<String>,

    /// Text segments to translate
    pub text: Vec<String>,
}

impl Args {
    /// Explicit credentials given on the command line.
    pub fn credentials(&self) -> Credentials {
        let mut credentials = Credentials {
            microsoft_region: self.region.clone(),
            ..Default::default()
        };
        let key = self.api_key.clone();
        match self.provider {
            ProviderKind::DeepL => credentials.deepl = key,
            ProviderKind::Microsoft => credentials.microsoft = key,
            ProviderKind::Google => credentials.google = key,
        }
        credentials
    }

    pub fn request(&self) -> TranslationRequest {
        let mut options = TranslateOptions::default().with_ignore(IgnorePatterns {
            unicode: self.ignore_unicode.clone(),
            regex: self.ignore_regex.clone(),
        });
        options.join = self.join;

        let request = TranslationRequest::new(self.text.clone(), self.target.clone())
            .with_options(options);
        match &self.source {
            Some(source) => request.with_source(source.clone()),
            None => request,
        }
    }
}
