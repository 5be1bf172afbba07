//! Tracing setup shared by the dispatcher CLI and the webserver

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the stdout tracing subscriber with an optional base level
pub fn init_tracing(log_level: Option<&str>) {
    let base_level = log_level.unwrap_or("info");
    let filter = format!(
        "dispatcher={base_level},webserver={base_level},tower=warn,hyper=warn,reqwest=warn"
    );

    fmt()
        .with_env_filter(EnvFilter::new(&filter))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
