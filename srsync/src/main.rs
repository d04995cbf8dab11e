//! srsync - tagged-passage to flashcard synchronisation
//!
//! `scan` finds tagged passages and stages generated cards; `commit` adds the
//! staged cards to the deck and marks their passages processed. Running the
//! phases separately leaves room to review the staging file in between.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

use srsync::config::{Overrides, Phase, SyncConfig};
use srsync::services::{AnkiConnectClient, NotionClient, OpenAiClient};
use srsync::workflow::staging::validate_staging_path;
use srsync::workflow::{run_commit, run_scan, DiscoveryOptions, StagingStore};
use srsync::SyncError;
use srsync_common::config::{load_toml_config, resolve_config_path};
use srsync_common::logging::init_tracing;

/// Command-line arguments for srsync
#[derive(Parser, Debug)]
#[command(name = "srsync")]
#[command(about = "Turn tagged Notion passages into Anki cloze cards")]
#[command(version)]
struct Cli {
    /// Configuration file (default: <config dir>/srsync/config.toml)
    #[arg(short, long, global = true, env = "SRSYNC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Discover tagged passages, generate cards and stage them
    Scan(ScanArgs),
    /// Add staged cards to the deck and mark their passages processed
    Commit(CommitArgs),
}

#[derive(Args, Debug)]
struct ScanArgs {
    /// Staging file (.json)
    #[arg(value_parser = parse_staging_path)]
    staging_file: PathBuf,

    /// Search documents edited within this many days
    #[arg(long)]
    days: Option<u32>,

    /// Tag marker text
    #[arg(long)]
    tag: Option<String>,
}

#[derive(Args, Debug)]
struct CommitArgs {
    /// Staging file (.json)
    #[arg(value_parser = parse_staging_path)]
    staging_file: PathBuf,

    /// Destination deck
    #[arg(long)]
    deck: Option<String>,
}

fn parse_staging_path(value: &str) -> Result<PathBuf, String> {
    validate_staging_path(&PathBuf::from(value)).map_err(|e| e.to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config_path = resolve_config_path(cli.config.as_deref());
    let toml = load_toml_config(config_path.as_deref()).context("Failed to load configuration")?;
    init_tracing(&toml.logging).context("Failed to initialise logging")?;

    info!("Starting srsync v{}", env!("CARGO_PKG_VERSION"));
    match config_path.as_deref() {
        Some(path) if path.exists() => info!("Using configuration {}", path.display()),
        _ => warn!("No configuration file found, using defaults"),
    }

    match cli.command {
        Command::Scan(args) => {
            let overrides = Overrides {
                search_period_days: args.days,
                tag_marker: args.tag,
                deck_name: None,
            };
            let config = SyncConfig::resolve(&toml, &overrides, Phase::Scan)?;
            scan(&config, args.staging_file).await
        }
        Command::Commit(args) => {
            let overrides = Overrides {
                deck_name: args.deck,
                ..Overrides::default()
            };
            let config = SyncConfig::resolve(&toml, &overrides, Phase::Commit)?;
            commit(&config, args.staging_file).await
        }
    }
}

async fn scan(config: &SyncConfig, staging_file: PathBuf) -> Result<ExitCode> {
    let staging = StagingStore::new(&staging_file)?;
    let notion = NotionClient::new(config.notion_api_key.clone(), &config.notion_base_url)?;
    let generator = OpenAiClient::new(
        config.openai_api_key()?.to_string(),
        &config.openai_base_url,
        &config.openai_model,
    )?;

    info!(model = %generator.model(), "Text generator ready");

    let options = DiscoveryOptions {
        threshold: config.search_threshold(Utc::now())?,
        tag_marker: &config.tag_marker,
        search_query: config.search_query.as_deref(),
    };

    let report = run_scan(&notion, &generator, &staging, &options)
        .await
        .context("Scan failed")?;

    println!(
        "Discovered {} tagged passage(s): {} new card(s), {} already staged, {} skipped.",
        report.discovered,
        report.generated,
        report.already_staged,
        report.skipped.len()
    );
    for skipped in &report.skipped {
        println!("  skipped {}: {}", skipped.block_id, skipped.reason);
    }
    println!(
        "{} card(s) staged in {}",
        report.staged_total,
        staging.path().display()
    );

    Ok(ExitCode::SUCCESS)
}

async fn commit(config: &SyncConfig, staging_file: PathBuf) -> Result<ExitCode> {
    let staging = StagingStore::new(&staging_file)?;
    let notion = NotionClient::new(config.notion_api_key.clone(), &config.notion_base_url)?;
    let deck = AnkiConnectClient::new(&config.anki_connect_url, &config.deck_name)?;

    let report = match run_commit(&notion, &deck, &staging).await {
        Ok(report) => report,
        Err(SyncError::NoStagedCards(path)) => {
            println!("No staged cards in {}; run `srsync scan` first.", path.display());
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => return Err(e).context("Commit failed"),
    };

    println!(
        "Committed {} card(s) to '{}' ({} already present).",
        report.committed, config.deck_name, report.duplicates
    );

    if report.is_complete() {
        return Ok(ExitCode::SUCCESS);
    }

    for failed in &report.failed {
        println!("  failed {}: {}", failed.block_id, failed.reason);
    }
    println!(
        "{} card(s) remain staged in {}; rerun commit to retry.",
        report.failed.len(),
        staging.path().display()
    );
    Ok(ExitCode::FAILURE)
}
