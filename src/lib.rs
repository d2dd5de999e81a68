// polytrans - one translation contract over DeepL, Microsoft Translator and Google
// Author: kelexine (https://github.com/kelexine)

pub mod cli;
pub mod config;
pub mod error;
pub mod factory;
pub mod masking;
pub mod metrics;
pub mod models;
pub mod providers;
pub mod translation;
pub mod transport;
pub mod utils;

pub use error::{Result, TranslateError};
pub use factory::{AdapterFactory, Adapters, Credentials};
pub use models::{TranslationOutput, TranslationRequest, TranslationResult};
pub use providers::{ProviderKind, Translator};
pub use transport::{HttpTransport, Transport};
