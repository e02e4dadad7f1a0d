use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueHint};
use session_core::loader::DEFAULT_DATASET_PATH;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod routes;

use routes::ServerState;

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive dashboard over per-session performance data", long_about = None)]
struct Args {
    /// CSV exported by the analysis notebook
    #[arg(long, default_value = DEFAULT_DATASET_PATH, value_hint = ValueHint::FilePath)]
    data: PathBuf,

    /// Address to listen on (loopback by default)
    #[arg(long, default_value = "127.0.0.1:8050")]
    addr: SocketAddr,

    /// TOML file overriding column names and category labels
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = session_core::load_config(args.config.as_deref())
        .context("failed to load dashboard configuration")?;

    let state = match session_core::load_dataset(&args.data, &config.columns) {
        Ok(dataset) => {
            let caps: Vec<_> = dataset.table.capabilities().fields().collect();
            info!(
                subjects = dataset.subjects.len(),
                records = dataset.table.len(),
                fields = ?caps,
                "dataset ready"
            );
            ServerState::ready(dataset, config)
        }
        Err(err) => {
            error!("{err}");
            for (idx, step) in err.remediation().iter().enumerate() {
                warn!("  {}. {step}", idx + 1);
            }
            warn!("starting in degraded mode; the page will show these steps");
            ServerState::degraded(&err, config)
        }
    };

    let app = routes::router(state);
    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("failed to bind {}", args.addr))?;
    info!("dashboard listening on http://{} (Ctrl+C to stop)", args.addr);
    axum::serve(listener, app).await.context("server failed")?;
    Ok(())
}
