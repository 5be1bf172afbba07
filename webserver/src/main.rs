//! WebServer entry point
//!
//! Single-process deployment: hosts the upload/processing endpoints and
//! the tracking callbacks over one shared ledger. Exactly one dispatch
//! run executes at a time; the dispatcher serializes invocations
//! internally.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::signal;
use tracing::info;

use dispatcher::{logging, SenderConfig};
use webserver::state::ProductionState;
use webserver::{router, WebServerError, WebServerResult};

/// HTTP front end for the outreach dispatcher
#[derive(Parser, Debug)]
#[command(name = "webserver")]
#[command(about = "Upload, tracking, and statistics endpoints for the dispatcher")]
struct Args {
    /// Bind address for the HTTP server
    #[arg(long, default_value = "0.0.0.0:5000")]
    addr: String,

    /// Directory holding the durable state documents
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Directory where uploaded CSV files are stored
    #[arg(long, default_value = "uploads")]
    upload_dir: PathBuf,

    /// Base URL for tracking links (overrides APP_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> WebServerResult<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    logging::init_tracing(Some(&args.log_level));

    let addr: SocketAddr = args
        .addr
        .parse()
        .map_err(|e| WebServerError::invalid_request(format!("Invalid bind address: {e}")))?;

    let mut config = SenderConfig::from_env().with_data_dir(args.data_dir);
    if let Some(base_url) = args.base_url {
        config = config.with_base_url(base_url);
    }

    let state = ProductionState::production(config, args.upload_dir);
    let app = router(state);

    info!("🌐 WebServer starting on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("🛑 WebServer stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if signal::ctrl_c().await.is_ok() {
        info!("Received Ctrl+C signal");
    }
}
