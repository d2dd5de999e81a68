// polytrans - one translation contract over DeepL, Microsoft Translator and Google
// Author: kelexine (https://github.com/kelexine)

use anyhow::{anyhow, Result};
use clap::Parser;
use polytrans::cli::{Args, ListKind};
use polytrans::config::AppConfig;
use polytrans::factory::AdapterFactory;
use polytrans::metrics::gather_metrics;
use polytrans::transport::HttpTransport;
use polytrans::utils::logging;
use polytrans::Translator;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Phase 1: Pick up credentials from .env before anything reads the environment
    let dotenv = dotenvy::dotenv().ok();

    let args = Args::parse();

    // Phase 2: Load configuration
    let config = AppConfig::load(args.config.as_deref())?;

    // Phase 3: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting polytrans v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = dotenv {
        debug!("Loaded environment from {}", path.display());
    }

    // Phase 4: Build adapters over one pooled client
    let transport =
        HttpTransport::new(&config.http)?.sanitize_logs(config.logging.sanitize_tokens);
    let factory = AdapterFactory::new(config, Arc::new(transport));
    let adapters = factory.create(&args.credentials());

    let translator = adapters.get(args.provider).ok_or_else(|| {
        anyhow!(
            "{} is not configured; pass --api-key or set its API key in the environment",
            args.provider
        )
    })?;

    // Phase 5: Dispatch
    let outcome = run(translator, &args).await;

    if args.metrics {
        eprintln!("{}", gather_metrics());
    }

    outcome
}

async fn run(translator: &dyn Translator, args: &Args) -> Result<()> {
    if let Some(list) = args.list {
        let languages = match list {
            ListKind::Source => translator.source_languages().await?,
            ListKind::Target => translator.target_languages().await?,
        };
        return print_json(&languages);
    }

    if args.usage {
        return print_json(&translator.usage().await?);
    }

    if args.text.is_empty() {
        return Err(anyhow!("no text given"));
    }

    if args.detect {
        return print_json(&translator.detect_language(&args.text).await?);
    }

    let output = translator.translate(&args.request()).await?;
    print_json(&output)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
