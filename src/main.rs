use clap::Parser;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod classifier;
mod cli;
mod commands;
mod config;
mod core;
mod display;
mod generator;
mod input;
mod orchestrator;
mod providers;
mod utils;

use crate::app::Application;
use crate::classifier::ScoringClassifier;
use crate::cli::Args;
use crate::commands::{SessionState, create_command_registry};
use crate::config::{Config, Provider};
use crate::core::error::FactChatError;
use crate::generator::AnswerGenerator;
use crate::orchestrator::TurnOrchestrator;
use crate::providers::factory::ProviderFactory;

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "factchat=debug" } else { "factchat=warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_orchestrator(args: &Args, config: &Config) -> Result<TurnOrchestrator, FactChatError> {
    let provider = match args.provider.as_deref() {
        Some(name) => Provider::from_str(name)
            .ok_or_else(|| FactChatError::Config(format!("Unsupported provider: {}", name)))?,
        None => config.active_provider.unwrap_or_default(),
    };

    let mut provider_config = config.provider_config(provider);
    if let Some(model) = &args.model {
        provider_config.model = Some(model.clone());
    }

    let timeout = Duration::from_secs(config.generation.timeout_secs);
    let llm = ProviderFactory::new().create(&provider, &provider_config, Some(timeout))?;
    tracing::info!(provider = ?provider, model = llm.model(), "Answering provider ready");

    let scoring_url = args
        .scoring_url
        .clone()
        .or_else(|| config.classifier.scoring_url.clone())
        .ok_or_else(|| {
            FactChatError::Config(format!(
                "No classifier scoring URL. Set AZURE_ML_SCORING_URL, pass --scoring-url, or add classifier.scoring_url to {}",
                Config::config_path().display()
            ))
        })?;
    let classifier_key = config.classifier.api_key.clone().unwrap_or_else(|| {
        tracing::warn!("No classifier API key configured, sending an empty bearer token");
        String::new()
    });
    let classifier = ScoringClassifier::new(scoring_url.clone(), &classifier_key)?;
    tracing::info!(
        scoring_url = %scoring_url,
        timeout_secs = ?classifier.timeout().map(|t| t.as_secs()),
        "Fact-check classifier ready"
    );

    Ok(TurnOrchestrator::new(
        AnswerGenerator::new(llm, config.generation.max_completion_tokens),
        Box::new(classifier),
    ))
}

async fn run(args: Args) -> Result<(), FactChatError> {
    let config = Config::load()?;
    let orchestrator = build_orchestrator(&args, &config)?;

    let mut app = Application::new(
        args,
        SessionState::new(orchestrator),
        create_command_registry(),
    );
    app.run().await
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args).await {
        display::display_error(&e.to_string());
        std::process::exit(1);
    }
}
