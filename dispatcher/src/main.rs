//! Command-line entry point for the dispatcher
//!
//! Runs a single dispatch over a recipient CSV, or prints the current
//! quota position when no CSV is given. The webserver binary hosts the
//! upload and tracking endpoints; this binary exists for cron-style
//! scheduled sending.

use std::path::PathBuf;

use clap::Parser;

use dispatcher::config::DEFAULT_BATCH_SIZE;
use dispatcher::services::{OutreachPersonalizer, RandomizedPacing, SendGridMailer};
use dispatcher::{logging, Dispatcher, DispatcherResult, SenderConfig};

/// Bulk email-outreach dispatcher
#[derive(Parser)]
#[command(name = "dispatcher")]
#[command(about = "Rate-limited bulk email dispatch over a recipient CSV")]
struct Args {
    /// Recipient CSV to process; prints the quota snapshot when omitted
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Number of recipients per batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Directory holding the durable state documents
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Base URL for tracking links (overrides APP_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> DispatcherResult<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    logging::init_tracing(Some(&args.log_level));

    let mut config = SenderConfig::from_env().with_data_dir(args.data_dir);
    if let Some(base_url) = args.base_url {
        config = config.with_base_url(base_url);
    }

    let mailer = SendGridMailer::new(
        config.api_key.clone(),
        config.from_address.clone(),
        config.from_name.clone(),
        config.base_url.clone(),
    );
    let personalizer = OutreachPersonalizer::new(config.base_url.clone());
    let dispatcher = Dispatcher::new(config, mailer, personalizer, RandomizedPacing::default());

    match args.csv {
        Some(csv_path) => {
            let summary = dispatcher.run(&csv_path, args.batch_size).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        None => {
            let snapshot = dispatcher.quota().await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }

    Ok(())
}
