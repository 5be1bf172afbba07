//! Core library for the bulk email-outreach dispatcher
//!
//! Reads recipient lists from CSV uploads, throttles sending against the
//! progressive warm-up schedule and the daily/monthly caps, dispatches
//! through SendGrid, and records delivery/open/click/unsubscribe events
//! for reporting. All mutable state lives in durable JSON documents so a
//! restart never re-sends to an already-contacted address.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod filter;
pub mod ledger;
pub mod logging;
pub mod quota;
pub mod services;
pub mod source;
pub mod stats;
pub mod tracking;
pub mod traits;

pub use config::SenderConfig;
pub use dispatch::{Dispatcher, QuotaSnapshot, RunSummary};
pub use error::{DispatcherError, DispatcherResult};
pub use ledger::{Ledger, LedgerState, MessageRecord, SendProgress, SendingSchedule};
pub use quota::WeeklyCaps;
pub use stats::StatsSnapshot;
pub use tracking::TrackingRecorder;
pub use traits::{EmailContent, Mailer, OutboundEmail, PacingPolicy, Personalizer};
