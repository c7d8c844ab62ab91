//! `sculptor` command-line entry point.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use log::info;
use sculptor_rs::config::SculptorConfig;
use sculptor_rs::core::{GenerationInput, Pipeline, UserConfig};
use sculptor_rs::memory::{ArtifactStore, SqliteArtifactStore};
use sculptor_rs::server::{AppState, RecordSummary};
use std::path::PathBuf;

/// Command-line options for the Sculptor service.
#[derive(Parser)]
#[command(name = "sculptor", version)]
#[command(about = "Turn text prompts into images and 3D models, with prompt memory")]
struct Cli {
    /// Extra sculptor.json5 files applied over the discovered layers
    #[arg(long, global = true)]
    config: Vec<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service
    Serve {
        /// Listen address (overrides server.host)
        #[arg(long)]
        host: Option<String>,
        /// Listen port (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run one generation and print the result
    Generate {
        /// Text prompt to generate from
        prompt: String,
        /// User id whose app configuration applies
        #[arg(long)]
        user: Option<String>,
    },
    /// List past generations, newest first
    History {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sculptor_rs::init_logging();

    let cli = Cli::parse();
    let cwd = std::env::current_dir().context("cwd")?;
    info!(
        "starting sculptor (cwd={}, runtime_configs={})",
        cwd.display(),
        cli.config.len()
    );
    let mut config = sculptor_rs::load_config(&cwd, &cli.config)?;

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let state = AppState::from_config(&config).context("failed to initialize service")?;
            sculptor_rs::server::serve(&config.server, state).await
        }
        Command::Generate { prompt, user } => generate(&config, prompt, user).await,
        Command::History { json } => history(&config, json).await,
    }
}

async fn generate(
    config: &SculptorConfig,
    prompt: String,
    user: Option<String>,
) -> anyhow::Result<()> {
    if prompt.trim().is_empty() {
        bail!("prompt must not be empty");
    }
    let pipeline = Pipeline::from_config(config).context("failed to initialize pipeline")?;
    let user_id = user.unwrap_or_else(|| config.generation.default_user.clone());
    let outcome = pipeline
        .run(
            GenerationInput::new(prompt, user_id),
            &UserConfig::from_generation(&config.generation),
        )
        .await?;

    println!("{}", outcome.message);
    println!("enhanced prompt: {}", outcome.enhanced_prompt);
    println!("image: {}", outcome.image_ref);
    println!("model: {}", outcome.model_ref);
    println!("total generations: {}", outcome.memory.total_generations);
    Ok(())
}

async fn history(config: &SculptorConfig, json: bool) -> anyhow::Result<()> {
    let store = SqliteArtifactStore::open(config.storage.database_path())
        .context("failed to open generation history")?;
    let records = store.list_all().await?;
    if json {
        let summaries: Vec<RecordSummary> = records
            .into_iter()
            .map(|record| RecordSummary::from_record(record, false))
            .collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }
    if records.is_empty() {
        println!("no generations recorded");
        return Ok(());
    }
    for record in records {
        println!(
            "{}\t{}\t{}\t{}",
            record.id,
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            record.original_prompt,
            record.model_ref
        );
    }
    Ok(())
}
