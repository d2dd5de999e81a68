//! Adapter construction from credentials.
//!
//! Each provider slot resolves its credential from, in order: an explicit
//! value, the process environment, then the loaded [`AppConfig`]. DeepL and
//! Microsoft stay empty without a key; Google always resolves, falling back
//! to the keyless endpoint.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::{AppConfig, ProvidersConfig};
use crate::providers::{DeepL, Google, Microsoft, ProviderKind, Translator};
use crate::transport::Transport;
use std::sync::Arc;
use tracing::{debug, info};

pub const DEEPL_API_KEY: &str = "DEEPL_API_KEY";
pub const MICROSOFT_API_KEY: &str = "MICROSOFT_API_KEY";
pub const MICROSOFT_REGION: &str = "MICROSOFT_REGION";
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";

/// Provider credentials. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub deepl: Option<String>,
    pub microsoft: Option<String>,
    pub microsoft_region: Option<String>,
    pub google: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl Credentials {
    /// Read the well-known provider variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            deepl: present(lookup(DEEPL_API_KEY)),
            microsoft: present(lookup(MICROSOFT_API_KEY)),
            microsoft_region: present(lookup(MICROSOFT_REGION)),
            google: present(lookup(GOOGLE_API_KEY)),
        }
    }

    pub fn from_config(config: &ProvidersConfig) -> Self {
        Self {
            deepl: present(config.deepl.api_key.clone()),
            microsoft: present(config.microsoft.api_key.clone()),
            microsoft_region: present(Some(config.microsoft.region.clone())),
            google: present(config.google.api_key.clone()),
        }
    }

    /// Fill every empty slot of `self` from `fallback`.
    pub fn or(self, fallback: Credentials) -> Self {
        Self {
            deepl: present(self.deepl).or(fallback.deepl),
            microsoft: present(self.microsoft).or(fallback.microsoft),
            microsoft_region: present(self.microsoft_region).or(fallback.microsoft_region),
            google: present(self.google).or(fallback.google),
        }
    }
}

/// One adapter per provider. Google is always available.
pub struct Adapters {
    pub deepl: Option<DeepL>,
    pub microsoft: Option<Microsoft>,
    pub google: Google,
}

impl Adapters {
    pub fn get(&self, kind: ProviderKind) -> Option<&dyn Translator> {
        match kind {
            ProviderKind::DeepL => self.deepl.as_ref().map(|a| a as &dyn Translator),
            ProviderKind::Microsoft => self.microsoft.as_ref().map(|a| a as &dyn Translator),
            ProviderKind::Google => Some(&self.google),
        }
    }

    /// Providers that resolved a usable adapter.
    pub fn available(&self) -> Vec<ProviderKind> {
        [ProviderKind::DeepL, ProviderKind::Microsoft, ProviderKind::Google]
            .into_iter()
            .filter(|kind| self.get(*kind).is_some())
            .collect()
    }
}

/// Builds [`Adapters`] sharing one transport.
pub struct AdapterFactory {
    config: AppConfig,
    environment: Credentials,
    transport: Arc<dyn Transport>,
}

impl AdapterFactory {
    /// Create a factory that reads the process environment.
    pub fn new(config: AppConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            environment: Credentials::from_env(),
            transport,
        }
    }

    /// Replace the environment-sourced credentials.
    pub fn with_environment(mut self, environment: Credentials) -> Self {
        self.environment = environment;
        self
    }

    /// Resolve credentials with precedence explicit > environment > config.
    pub fn resolve(&self, explicit: &Credentials) -> Credentials {
        explicit
            .clone()
            .or(self.environment.clone())
            .or(Credentials::from_config(&self.config.providers))
    }

    pub fn create(&self, explicit: &Credentials) -> Adapters {
        let credentials = self.resolve(explicit);
        let providers = &self.config.providers;

        let deepl = credentials.deepl.map(|key| {
            DeepL::new(key, providers.deepl.base_url.clone(), self.transport.clone())
        });

        let microsoft = credentials.microsoft.map(|key| {
            Microsoft::new(
                key,
                credentials.microsoft_region.clone(),
                Some(providers.microsoft.base_url.clone()),
                self.transport.clone(),
            )
        });

        let google = match credentials.google {
            Some(key) => Google::v2(
                key,
                Some(providers.google.base_url.clone()),
                self.transport.clone(),
            ),
            None => {
                debug!("No Google API key; using the keyless endpoint");
                Google::v1(
                    Some(providers.google.legacy_base_url.clone()),
                    self.transport.clone(),
                )
            }
        };

        let adapters = Adapters {
            deepl,
            microsoft,
            google,
        };
        info!(
            "Providers available: {}",
            adapters
                .available()
                .iter()
                .map(ProviderKind::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
        adapters
    }
}

/// Shorthand for [`AdapterFactory::create`] with an explicit environment.
pub fn create_adapters(
    explicit: &Credentials,
    config: &AppConfig,
    environment: Credentials,
    transport: Arc<dyn Transport>,
) -> Adapters {
    AdapterFactory::new(config.clone(), transport)
        .with_environment(environment)
        .create(explicit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_from_lookup_ignores_blank_values() {
        let vars: HashMap<&str, &str> = [(DEEPL_API_KEY, "  "), (GOOGLE_API_KEY, "g")].into();
        let credentials = Credentials::from_lookup(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(credentials.deepl, None);
        assert_eq!(credentials.google.as_deref(), Some("g"));
    }

    #[test]
    fn test_or_prefers_self() {
        let explicit = Credentials {
            deepl: Some("explicit".to_string()),
            ..Default::default()
        };
        let env = Credentials {
            deepl: Some("env".to_string()),
            microsoft: Some("env-ms".to_string()),
            ..Default::default()
        };

        let merged = explicit.or(env);
        assert_eq!(merged.deepl.as_deref(), Some("explicit"));
        assert_eq!(merged.microsoft.as_deref(), Some("env-ms"));
    }
}
