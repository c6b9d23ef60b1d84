use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use typecast_core::Settings;
use typecast_mcp::run_server;

#[derive(Parser, Debug)]
#[command(name = "typecast-mcp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "MCP server for the Typecast text-to-speech API")]
struct Args {
    /// Load environment variables from this file instead of ./.env
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Directory for log files (default: ~/.typecast-mcp/logs)
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Directory for generated audio, overriding TYPECAST_OUTPUT_DIR
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    load_env(args.env_file.as_deref())?;
    let _guard = setup_tracing(args.log_dir)?;

    let mut settings = Settings::from_env()?;
    if let Some(output_dir) = args.output_dir {
        settings = settings.with_output_dir(output_dir);
    }
    info!(?settings, "Configuration loaded");

    run_server(settings).await
}

fn load_env(env_file: Option<&Path>) -> Result<()> {
    match env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load env file {}", path.display()))?;
        }
        None => match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e).context("Failed to load .env"),
        },
    }
    Ok(())
}

/// Log to daily rolling files; stdout carries the MCP stream.
fn setup_tracing(log_dir: Option<PathBuf>) -> Result<WorkerGuard> {
    use tracing_subscriber::fmt;

    let log_dir = match log_dir {
        Some(dir) => dir,
        None => dirs::home_dir()
            .context("Failed to get home directory")?
            .join(".typecast-mcp")
            .join("logs"),
    };
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "typecast-mcp.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();

    info!("Tracing initialized to {:?}", log_dir);
    Ok(guard)
}
