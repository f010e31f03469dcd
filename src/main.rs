#![forbid(unsafe_code)]

//! `dumpdock` — crash-dump directory and analysis CLI.
//!
//! Thin shell around [`DumpService`]: loads configuration, initializes
//! tracing, and maps one subcommand to one service operation, printing the
//! result as JSON. Transport concerns (HTTP, auth) live in an outer layer;
//! this binary stands in for that collaborator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use dumpdock::config::GlobalConfig;
use dumpdock::service::DumpService;
use dumpdock::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "dumpdock", about = "Crash-dump directory and analysis", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Base URL used when constructing artifact links.
    #[arg(long, default_value = "http://localhost/dumps")]
    base_url: String,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// List all dump artifacts.
    List,
    /// Show metadata for one dump artifact.
    Get {
        /// Artifact file name (e.g. `w3wp-1234.dmp`).
        name: String,
    },
    /// Delete one dump artifact.
    Delete {
        /// Artifact file name.
        name: String,
    },
    /// Run the configured analyzer against one dump artifact.
    Analyze {
        /// Artifact file name.
        name: String,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    let config = GlobalConfig::load_from_path(&args.config)?;
    let service = DumpService::new(&config);
    info!(dumps_dir = %config.dumps_dir.display(), "dumpdock ready");

    match args.command {
        CliCommand::List => {
            let dumps = service.list_dumps(&args.base_url).await?;
            print_json(&dumps)?;
        }
        CliCommand::Get { name } => {
            let dump = service.get_dump(&name, &args.base_url).await?;
            print_json(&dump)?;
        }
        CliCommand::Delete { name } => {
            service.delete_dump(&name).await?;
            info!(name, "deleted");
        }
        CliCommand::Analyze { name } => {
            // Ctrl-C takes the forced-termination path so the analyzer
            // never outlives an abandoned request.
            let cancel = CancellationToken::new();
            let signal_cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("interrupt received, cancelling analysis");
                    signal_cancel.cancel();
                }
            });

            let report = service.analyze_dump(&name, &cancel).await?;
            print_json(&report)?;
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| AppError::Io(format!("cannot render result: {err}")))?;
    println!("{rendered}");
    Ok(())
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
