//! Data models for the canonical contract and each provider's wire format.
//!
//! This module contains the type definitions used by:
//! - The provider-independent request/result contract (`canonical`)
//! - DeepL API v2 (`deepl`)
//! - Microsoft Translator v3.0 (`microsoft`)
//! - Google Cloud Translation v2 and the legacy keyless endpoint (`google`)

// Author: kelexine (https://github.com/kelexine)

pub mod canonical;
pub mod deepl;
pub mod google;
pub mod microsoft;

pub use canonical::{
    Detection, IgnorePatterns, Language, ScriptPair, Text, TranslateOptions, TranslationOutput,
    TranslationRequest, TranslationResult, Usage,
};
pub use deepl::DeepLOptions;
pub use google::GoogleOptions;
pub use microsoft::MicrosoftOptions;
