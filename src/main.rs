// Allow dead code for functions that are part of the API surface but not
// used in all code paths
#![allow(dead_code)]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod ai;
mod batch;
mod cascade;
mod cli;
mod competitor;
mod config;
mod corrections;
mod export;
mod logger;
mod normalizer;
mod overrides;
mod rate_limit;
mod region;
mod registry;
mod scorer;
mod taxonomy;
mod websearch;

use ai::GeminiClient;
use batch::BatchSummary;
use cascade::{Cascade, ResolverState};
use cli::{Cli, Commands, CorrectionCommands};
use config::AppConfig;
use corrections::{CorrectionStore, CustomSectorStore};
use logger::{BatchLogger, VerbosityLevel};
use normalizer::InputNormalizer;
use rate_limit::SharedRateLimiter;
use registry::GouvRegistryClient;
use websearch::DuckDuckGoClient;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle --init first (before any other processing)
    if cli.init {
        match AppConfig::create_default_config() {
            Ok(path) => {
                println!("Created default configuration file at: {}", path.display());
                println!("Edit this file to customize settings, then run sectorfinder again.");
                std::process::exit(0);
            }
            Err(e) => {
                eprintln!("Failed to create configuration file: {}", e);
                std::process::exit(1);
            }
        }
    }

    init_tracing(cli.verbose);

    // Load configuration, offering to create it interactively
    let app_config = match AppConfig::load() {
        Ok(cfg) => cfg,
        Err(config::ConfigError::FileNotFound(path)) => {
            match AppConfig::prompt_create_config() {
                Ok(Some(created_path)) => {
                    println!("Created default configuration file at: {}", created_path.display());
                    AppConfig::load()?
                }
                Ok(None) => {
                    tracing::debug!(
                        "Configuration file not found at {}, using built-in defaults",
                        path.display()
                    );
                    AppConfig::builtin()
                }
                Err(e) => {
                    eprintln!("Failed to create configuration file: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let cascade = build_cascade(&app_config)?;

    match cli.command {
        Some(Commands::Classify { input }) => classify_one(&cascade, &input).await,
        Some(Commands::Batch { file, format, output }) => {
            run_batch(&cascade, &app_config, &file, &format, output.as_deref(), cli.verbose).await
        }
        Some(Commands::Corrections { action }) => handle_corrections(&cascade, action),
        Some(Commands::Sectors) => {
            cascade.state().reload();
            for sector in cascade.state().allowed_sectors() {
                println!("{}", sector);
            }
            Ok(())
        }
        None => match cli.input {
            Some(input) => classify_one(&cascade, &input).await,
            None => {
                eprintln!("Nothing to do. Try 'sectorfinder classify \"ACME\"' or --help.");
                std::process::exit(2);
            }
        },
    }
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "sectorfinder=warn",
        1 => "sectorfinder=info",
        _ => "sectorfinder=debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Wire the cascade to the production adapters and the persisted stores
fn build_cascade(config: &AppConfig) -> Result<Cascade> {
    let state = ResolverState {
        corrections: CorrectionStore::load(&config.data.corrections_path())?,
        custom_sectors: CustomSectorStore::load(&config.data.custom_sectors_path())?,
    };

    Ok(Cascade::new(
        InputNormalizer::with_extra_domains(&config.input.personal_email_domains),
        Box::new(GouvRegistryClient::new(config)?),
        Box::new(DuckDuckGoClient::new(config)?),
        Box::new(GeminiClient::new(config)?),
        state,
    ))
}

async fn classify_one(cascade: &Cascade, input: &str) -> Result<()> {
    let result = cascade.classify(input).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn run_batch(
    cascade: &Cascade,
    config: &AppConfig,
    file: &std::path::Path,
    format: &str,
    output: Option<&str>,
    verbose: u8,
) -> Result<()> {
    let inputs = batch::parse_input_file(file)?;
    if inputs.is_empty() {
        println!("No inputs found in {}", file.display());
        return Ok(());
    }

    let limiter = SharedRateLimiter::per_minute(config.rate_limit.batch_items_per_minute);
    let logger = BatchLogger::new(VerbosityLevel::from_verbose_count(verbose));

    let started_at = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let start = std::time::Instant::now();
    let results = batch::run_batch(cascade, &inputs, &limiter, &logger).await;
    let summary = BatchSummary::from_results(&results, started_at, start.elapsed().as_secs_f64());

    match (output, format) {
        (Some(path), "json") => export::export_json(&results, &summary, path)?,
        (Some(path), _) => export::export_csv(&results, path)?,
        (None, "json") => {
            let payload = serde_json::json!({ "summary": &summary, "results": &results });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        (None, _) => {
            for result in &results {
                println!(
                    "{}\t{}\t{}\t{}",
                    result.input, result.sector, result.source, result.score
                );
            }
        }
    }

    export::print_summary(&summary);
    Ok(())
}

fn handle_corrections(cascade: &Cascade, action: CorrectionCommands) -> Result<()> {
    let state = cascade.state();
    state.reload();

    match action {
        CorrectionCommands::List => {
            let all = state.corrections.all();
            if all.is_empty() {
                println!("No corrections stored.");
            } else {
                let mut entries: Vec<_> = all.into_iter().collect();
                entries.sort();
                for (key, sector) in entries {
                    println!("{} -> {}", key, sector);
                }
            }
            Ok(())
        }
        CorrectionCommands::Add { name, sector } => {
            state.record_correction(&name, &sector)?;
            println!("Saved correction: {} -> {}", name, sector);
            Ok(())
        }
    }
}
