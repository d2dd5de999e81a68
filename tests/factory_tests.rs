// Adapter factory tests
// Author: kelexine (https://github.com/kelexine)

use async_trait::async_trait;
use polytrans::config::AppConfig;
use polytrans::factory::{create_adapters, AdapterFactory, Credentials};
use polytrans::transport::{Transport, WireRequest};
use polytrans::{ProviderKind, Result};
use serde_json::Value;
use std::sync::Arc;

struct Offline;

#[async_trait]
impl Transport for Offline {
    async fn send(&self, _request: WireRequest) -> Result<Value> {
        Ok(Value::Null)
    }
}

fn config_with_keys() -> AppConfig {
    let mut config = AppConfig::default();
    config.providers.deepl.api_key = Some("config-deepl".to_string());
    config.providers.microsoft.api_key = Some("config-ms".to_string());
    config.providers.google.api_key = Some("config-google".to_string());
    config
}

#[test]
fn test_no_credentials_leaves_only_keyless_google() {
    let adapters = create_adapters(
        &Credentials::default(),
        &AppConfig::default(),
        Credentials::default(),
        Arc::new(Offline),
    );

    assert!(adapters.deepl.is_none());
    assert!(adapters.microsoft.is_none());
    assert!(adapters.get(ProviderKind::DeepL).is_none());
    assert_eq!(adapters.google.version(), "v1");
    assert_eq!(adapters.available(), vec![ProviderKind::Google]);
}

#[test]
fn test_explicit_beats_environment_beats_config() {
    let factory = AdapterFactory::new(config_with_keys(), Arc::new(Offline)).with_environment(
        Credentials {
            deepl: Some("env-deepl:fx".to_string()),
            microsoft: Some("env-ms".to_string()),
            ..Default::default()
        },
    );
    let explicit = Credentials {
        deepl: Some("explicit-deepl".to_string()),
        ..Default::default()
    };

    let resolved = factory.resolve(&explicit);
    assert_eq!(resolved.deepl.as_deref(), Some("explicit-deepl"));
    assert_eq!(resolved.microsoft.as_deref(), Some("env-ms"));
    assert_eq!(resolved.google.as_deref(), Some("config-google"));
    assert_eq!(resolved.microsoft_region.as_deref(), Some("centralus"));

    let adapters = factory.create(&explicit);
    let deepl = adapters.deepl.as_ref().unwrap();
    assert_eq!(deepl.config().credential.as_deref(), Some("explicit-deepl"));
    assert_eq!(deepl.config().base_url, "https://api.deepl.com");
    assert_eq!(adapters.google.version(), "v2");
    assert_eq!(
        adapters.available(),
        vec![ProviderKind::DeepL, ProviderKind::Microsoft, ProviderKind::Google]
    );
}

#[test]
fn test_free_tier_key_selects_free_endpoint() {
    let adapters = create_adapters(
        &Credentials {
            deepl: Some("abc:fx".to_string()),
            ..Default::default()
        },
        &AppConfig::default(),
        Credentials::default(),
        Arc::new(Offline),
    );
    assert_eq!(
        adapters.deepl.unwrap().config().base_url,
        "https://api-free.deepl.com"
    );
}

#[test]
fn test_environment_region_reaches_microsoft() {
    let adapters = create_adapters(
        &Credentials::default(),
        &AppConfig::default(),
        Credentials {
            microsoft: Some("env-ms".to_string()),
            microsoft_region: Some("westeurope".to_string()),
            ..Default::default()
        },
        Arc::new(Offline),
    );
    assert!(adapters.get(ProviderKind::Microsoft).is_some());
    let microsoft = adapters.microsoft.unwrap();
    assert_eq!(microsoft.config().region.as_deref(), Some("westeurope"));
}
