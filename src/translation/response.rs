// Response normalization (provider results -> canonical results)
// Author: kelexine (https://github.com/kelexine)

use crate::error::{Result, TranslateError};
use crate::masking::{decode_entities, strip_markup, Masked};
use crate::models::{TranslationOutput, TranslationResult};
use tracing::debug;

/// One translated segment as the provider reported it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTranslation {
    pub text: String,
    pub detected_language: Option<String>,
    pub transliteration: Option<String>,
}

impl RawTranslation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn detected(mut self, language: Option<String>) -> Self {
        self.detected_language = language;
        self
    }

    pub fn transliterated(mut self, text: Option<String>) -> Self {
        self.transliteration = text;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    /// Collapse the results into one space-joined string.
    pub join: bool,
    /// Decode character references. Set when the provider was asked to
    /// treat the input as markup.
    pub decode_entities: bool,
    /// Used when the provider does not report a detected language.
    pub fallback_language: Option<String>,
}

fn clean(text: &str, decode: bool) -> String {
    let stripped = strip_markup(text);
    if decode {
        decode_entities(&stripped)
    } else {
        stripped
    }
}

/// Zip provider results with the masked input into canonical results.
///
/// Fails when the provider returned a different number of translations than
/// segments were sent.
pub fn normalize(
    raw: Vec<RawTranslation>,
    masked: &Masked,
    options: &NormalizeOptions,
) -> Result<TranslationOutput> {
    if raw.len() != masked.len() {
        return Err(TranslateError::Provider(format!(
            "expected {} translations, received {}",
            masked.len(),
            raw.len()
        )));
    }

    let results: Vec<TranslationResult> = raw
        .into_iter()
        .zip(&masked.segments)
        .map(|(item, segment)| TranslationResult {
            translation: clean(&item.text, options.decode_entities),
            detected_language: item
                .detected_language
                .filter(|l| !l.is_empty())
                .or_else(|| options.fallback_language.clone())
                .unwrap_or_default(),
            original: segment.plain.clone(),
            transliteration: item
                .transliteration
                .map(|t| clean(&t, options.decode_entities))
                .filter(|t| !t.is_empty()),
        })
        .collect();

    debug!("Normalized {} translations", results.len());

    if options.join {
        let joined = results
            .iter()
            .map(|r| r.translation.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        return Ok(TranslationOutput::Joined(joined));
    }

    Ok(TranslationOutput::Segments(results))
}
