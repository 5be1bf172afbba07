//! Sending configuration: caps, pacing bounds, identity, and paths
//!
//! Values mirror the deployed outreach campaign defaults. The weekly caps
//! table implements the progressive warm-up schedule; everything else is
//! a hard limit or a politeness delay.

use std::path::PathBuf;
use std::time::Duration;

use crate::quota::WeeklyCaps;

/// Hard monthly sending cap across all weeks
pub const MONTHLY_EMAIL_CAP: u32 = 60_000;

/// Default number of recipients processed per batch
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Minimum delay between individual sends
pub const MIN_DELAY: Duration = Duration::from_secs(5);

/// Maximum delay between individual sends
pub const MAX_DELAY: Duration = Duration::from_secs(15);

/// Pause between batches, jittered by +/- 10s at runtime
pub const BATCH_PAUSE: Duration = Duration::from_secs(60);

/// Configuration for a dispatcher instance
#[derive(Debug, Clone)]
pub struct SenderConfig {
    /// Directory holding the durable JSON documents
    pub data_dir: PathBuf,

    /// Base URL embedded in tracking pixel / click / unsubscribe links
    pub base_url: String,

    /// Sender identity
    pub from_address: String,
    pub from_name: String,

    /// SendGrid API key (normally from SENDGRID_API_KEY)
    pub api_key: String,

    /// Hard monthly cap
    pub monthly_cap: u32,

    /// Progressive warm-up schedule
    pub weekly_caps: WeeklyCaps,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            base_url: "http://localhost:5000".to_string(),
            from_address: "outreach@routepricing.com".to_string(),
            from_name: "RoutePricing Support".to_string(),
            api_key: String::new(),
            monthly_cap: MONTHLY_EMAIL_CAP,
            weekly_caps: WeeklyCaps::default(),
        }
    }
}

impl SenderConfig {
    /// Overlay environment-provided values (API key and application URL)
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(key) = std::env::var("SENDGRID_API_KEY") {
            config.api_key = key;
        }
        if let Ok(url) = std::env::var("APP_URL") {
            config.base_url = url;
        }
        config
    }

    pub fn with_data_dir(mut self, data_dir: PathBuf) -> Self {
        self.data_dir = data_dir;
        self
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}
