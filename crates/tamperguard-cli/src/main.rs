//! Tamperguard CLI: check a video for tampering with the analysis service.
//!
//! Set TAMPERGUARD_SERVICE_URL (default http://127.0.0.1:5000). Other settings:
//! TAMPERGUARD_API_KEY, TAMPERGUARD_UPLOAD_TIMEOUT_SECS,
//! TAMPERGUARD_DOWNLOAD_TIMEOUT_SECS, TAMPERGUARD_DOWNLOAD_DIR.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tamperguard_api_client::ApiClient;
use tamperguard_cli::{
    candidate_from_path, init_tracing, render_outcome_details, spawn_progress, ConsoleNotifier,
};
use tamperguard_core::{ClientConfig, WorkflowError};
use tamperguard_transfer::{FileSystemSaver, Outcome, SavedArtifact, TransferController};

#[derive(Parser)]
#[command(name = "tamperguard", about = "Video tampering check client")]
struct Cli {
    /// Base URL of the analysis service
    #[arg(long, global = true)]
    service_url: Option<String>,

    /// Upload timeout in seconds
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    upload_timeout: Option<u64>,

    /// Download timeout in seconds
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    download_timeout: Option<u64>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a video and report whether it was tampered with
    Check {
        /// Path to the .mp4 file
        file: PathBuf,
    },
    /// Download the encrypted copy of a previously uploaded video
    Download {
        /// Path to the original .mp4 file
        file: PathBuf,
        /// Directory to save into
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Check a video, then download its encrypted copy
    Run {
        /// Path to the .mp4 file
        file: PathBuf,
        /// Directory to save into
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct RunOutput<'a> {
    outcome: &'a Outcome,
    artifact: &'a SavedArtifact,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

fn print_outcome(outcome: &Outcome) {
    // The message itself was already shown by the notifier.
    if let Some(details) = render_outcome_details(outcome) {
        println!("{}", details);
    }
}

fn build_controller(
    config: &ClientConfig,
    out: Option<PathBuf>,
    quiet: bool,
) -> anyhow::Result<TransferController> {
    let client = ApiClient::from_config(config).context("Failed to create HTTP client")?;
    let dir = out.unwrap_or_else(|| config.download_dir.clone());
    let saver = FileSystemSaver::new(client.clone(), dir);

    Ok(TransferController::new(
        Arc::new(client),
        Arc::new(saver),
        Arc::new(ConsoleNotifier { quiet }),
    )
    .with_timeouts(config.upload_timeout(), config.download_timeout()))
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        // Workflow errors were already shown by the notifier.
        Err(e) if e.downcast_ref::<WorkflowError>().is_some() => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = ClientConfig::from_env().context("Invalid configuration")?;
    if let Some(url) = cli.service_url {
        config.service_url = url.trim_end_matches('/').to_string();
    }
    if let Some(secs) = cli.upload_timeout {
        config.upload_timeout_secs = secs;
    }
    if let Some(secs) = cli.download_timeout {
        config.download_timeout_secs = secs;
    }
    tracing::debug!(service_url = %config.service_url, "Configuration loaded");

    let (file, out) = match &cli.command {
        Commands::Check { file } => (file.clone(), None),
        Commands::Download { file, out } | Commands::Run { file, out } => {
            (file.clone(), out.clone())
        }
    };

    let controller = build_controller(&config, out, cli.json)?;
    let candidate = candidate_from_path(&file).await?;
    controller.select_file(candidate)?;

    let _progress = (!cli.json).then(|| spawn_progress(controller.subscribe()));

    match cli.command {
        Commands::Check { .. } => {
            let outcome = controller.upload().await?;
            if cli.json {
                print_json(&outcome)?;
            } else {
                print_outcome(&outcome);
            }
        }
        Commands::Download { .. } => {
            let saved = controller.download().await?;
            if cli.json {
                print_json(&saved)?;
            }
        }
        Commands::Run { .. } => {
            let outcome = controller.upload().await?;
            if !cli.json {
                print_outcome(&outcome);
            }
            let saved = controller.download().await?;
            if cli.json {
                print_json(&RunOutput {
                    outcome: &outcome,
                    artifact: &saved,
                })?;
            }
        }
    }

    Ok(())
}
