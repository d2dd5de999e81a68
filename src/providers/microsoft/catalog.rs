// Microsoft transliteration catalog and script resolution
// Author: kelexine (https://github.com/kelexine)

use crate::error::Result;
use crate::models::microsoft::{DictionaryEntry, LanguagesResponse, TransliterationEntry};
use crate::models::ScriptPair;
use crate::transport::{Transport, WireRequest};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

pub const API_VERSION: &str = "3.0";

/// One row of the transliteration table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransliterationLanguage {
    pub code: String,
    pub name: String,
    pub native_name: String,
    /// The language is written in more than one script.
    pub is_duplex: bool,
    pub primary_script: String,
    /// First script the primary script can be transliterated into.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_script: Option<String>,
}

impl TransliterationLanguage {
    pub fn script_pair(&self) -> ScriptPair {
        ScriptPair {
            from_script: self.primary_script.clone(),
            to_script: if self.is_duplex {
                self.to_script.clone()
            } else {
                None
            },
        }
    }
}

/// Flatten the `transliteration` scope of `/languages` into one row per
/// language. Languages listing no scripts are skipped.
pub fn linearize(table: &BTreeMap<String, TransliterationEntry>) -> Vec<TransliterationLanguage> {
    table
        .iter()
        .filter_map(|(code, entry)| {
            let primary = entry.scripts.first()?;
            Some(TransliterationLanguage {
                code: code.clone(),
                name: entry.name.clone(),
                native_name: entry.native_name.clone(),
                is_duplex: entry.scripts.len() > 1,
                primary_script: primary.code.clone(),
                to_script: primary.to_scripts.first().map(|s| s.code.clone()),
            })
        })
        .collect()
}

/// One source language of the dictionary lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryLanguage {
    pub code: String,
    pub name: String,
    pub native_name: String,
    /// Codes the source can be looked up into, in catalog order.
    pub targets: Vec<String>,
}

pub fn dictionary_rows(table: &BTreeMap<String, DictionaryEntry>) -> Vec<DictionaryLanguage> {
    table
        .iter()
        .map(|(code, entry)| DictionaryLanguage {
            code: code.clone(),
            name: entry.name.clone(),
            native_name: entry.native_name.clone(),
            targets: entry.translations.iter().map(|t| t.code.clone()).collect(),
        })
        .collect()
}

/// Scripts to request for `target`, or `None` when the target has no
/// transliteration entry.
pub fn script_pair(languages: &[TransliterationLanguage], target: &str) -> Option<ScriptPair> {
    languages
        .iter()
        .find(|l| l.code.eq_ignore_ascii_case(target))
        .map(TransliterationLanguage::script_pair)
}

/// `GET /languages` for one scope.
pub async fn fetch_languages(
    transport: &dyn Transport,
    base_url: &str,
    scope: &str,
) -> Result<LanguagesResponse> {
    let request = WireRequest::get("microsoft", format!("{}/languages", base_url))
        .query_pair("api-version", API_VERSION)
        .query_pair("scope", scope);
    let value = transport.send(request).await?;
    Ok(serde_json::from_value(value)?)
}

/// Fetch and linearize the transliteration table. Not cached.
pub async fn transliteration_languages(
    transport: &dyn Transport,
    base_url: &str,
) -> Result<Vec<TransliterationLanguage>> {
    let response = fetch_languages(transport, base_url, "transliteration").await?;
    let languages = linearize(&response.transliteration);
    debug!("Loaded {} transliteration languages", languages.len());
    Ok(languages)
}

/// Fetch the `dictionary` scope of `/languages`.
pub async fn dictionary_languages(
    transport: &dyn Transport,
    base_url: &str,
) -> Result<Vec<DictionaryLanguage>> {
    let response = fetch_languages(transport, base_url, "dictionary").await?;
    Ok(dictionary_rows(&response.dictionary))
}

/// Resolve the script pair for `target` against a freshly fetched table.
pub async fn resolve_scripts(
    transport: &dyn Transport,
    base_url: &str,
    target: &str,
) -> Result<Option<ScriptPair>> {
    let languages = transliteration_languages(transport, base_url).await?;
    let pair = script_pair(&languages, target);
    if pair.is_none() {
        debug!("No transliteration entry for {}", target);
    }
    Ok(pair)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table() -> BTreeMap<String, TransliterationEntry> {
        let response: LanguagesResponse = serde_json::from_value(json!({
            "transliteration": {
                "ja": {
                    "name": "Japanese",
                    "nativeName": "日本語",
                    "scripts": [
                        {"code": "Jpan", "name": "Japanese", "nativeName": "日本語", "dir": "ltr",
                         "toScripts": [{"code": "Latn", "name": "Latin", "nativeName": "Latin", "dir": "ltr"}]},
                        {"code": "Latn", "name": "Latin", "nativeName": "Latin", "dir": "ltr",
                         "toScripts": [{"code": "Jpan", "name": "Japanese", "nativeName": "日本語", "dir": "ltr"}]}
                    ]
                },
                "as": {
                    "name": "Assamese",
                    "nativeName": "অসমীয়া",
                    "scripts": [
                        {"code": "Beng", "name": "Bengali", "nativeName": "বাংলা", "dir": "ltr",
                         "toScripts": [{"code": "Latn", "name": "Latin", "nativeName": "Latin", "dir": "ltr"}]}
                    ]
                },
                "xx": {"name": "Empty", "nativeName": "Empty", "scripts": []}
            }
        }))
        .unwrap();
        response.transliteration
    }

    #[test]
    fn test_linearize() {
        let languages = linearize(&table());
        assert_eq!(languages.len(), 2);

        let ja = languages.iter().find(|l| l.code == "ja").unwrap();
        assert!(ja.is_duplex);
        assert_eq!(ja.primary_script, "Jpan");
        assert_eq!(ja.to_script.as_deref(), Some("Latn"));
    }

    #[test]
    fn test_dictionary_rows() {
        let response: LanguagesResponse = serde_json::from_value(json!({
            "dictionary": {
                "af": {
                    "name": "Afrikaans",
                    "nativeName": "Afrikaans",
                    "dir": "ltr",
                    "translations": [
                        {"name": "English", "nativeName": "English", "dir": "ltr", "code": "en"}
                    ]
                },
                "en": {
                    "name": "English",
                    "nativeName": "English",
                    "dir": "ltr",
                    "translations": [
                        {"name": "Afrikaans", "nativeName": "Afrikaans", "dir": "ltr", "code": "af"},
                        {"name": "Spanish", "nativeName": "Español", "dir": "ltr", "code": "es"}
                    ]
                }
            }
        }))
        .unwrap();

        let rows = dictionary_rows(&response.dictionary);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].code, "af");
        assert_eq!(rows[0].targets, vec!["en"]);
        assert_eq!(rows[1].name, "English");
        assert_eq!(rows[1].targets, vec!["af", "es"]);
        assert!(response.transliteration.is_empty());
    }

    #[test]
    fn test_script_pair_duplex_only_gets_to_script() {
        let languages = linearize(&table());

        let ja = script_pair(&languages, "ja").unwrap();
        assert_eq!(ja.from_script, "Jpan");
        assert_eq!(ja.to_script.as_deref(), Some("Latn"));

        let assamese = script_pair(&languages, "AS").unwrap();
        assert_eq!(assamese.from_script, "Beng");
        assert_eq!(assamese.to_script, None);

        assert!(script_pair(&languages, "es").is_none());
    }
}
