//! Durable state ledger
//!
//! Five self-contained JSON documents under one data directory: send
//! progress counters, the progressive sending schedule, the set of
//! already-sent addresses, the set of unsubscribed addresses, and the
//! per-message tracking history. Missing or corrupt documents are
//! replaced by defaults rather than failing the run; a warning is
//! logged so operators can spot discarded files.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::warn;

use crate::error::DispatcherResult;

pub const PROGRESS_FILE: &str = "email_progress.json";
pub const SCHEDULE_FILE: &str = "sending_schedule.json";
pub const SENT_EMAILS_FILE: &str = "sent_emails.json";
pub const UNSUBSCRIBED_FILE: &str = "unsubscribed.json";
pub const HISTORY_FILE: &str = "email_history.json";

/// Send progress counters, reset on day/month rollover
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendProgress {
    /// Legacy cursor kept for document compatibility, no longer consulted
    #[serde(default)]
    pub last_sent_index: u64,
    pub emails_sent_this_month: u32,
    pub emails_sent_today: u32,
    pub last_sent_date: NaiveDate,
}

impl SendProgress {
    pub fn starting_on(date: NaiveDate) -> Self {
        Self {
            last_sent_index: 0,
            emails_sent_this_month: 0,
            emails_sent_today: 0,
            last_sent_date: date,
        }
    }
}

impl Default for SendProgress {
    fn default() -> Self {
        Self::starting_on(Local::now().date_naive())
    }
}

/// Progressive warm-up schedule position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendingSchedule {
    pub start_date: NaiveDate,
    pub current_week: u32,
    pub weekly_sent: u32,
    pub last_sent_date: NaiveDate,
}

impl SendingSchedule {
    pub fn starting_on(date: NaiveDate) -> Self {
        Self {
            start_date: date,
            current_week: 1,
            weekly_sent: 0,
            last_sent_date: date,
        }
    }
}

impl Default for SendingSchedule {
    fn default() -> Self {
        Self::starting_on(Local::now().date_naive())
    }
}

/// Tracking record for one sent message, keyed by tracking identifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    pub email: String,
    pub sent_at: DateTime<Utc>,
    pub opened: bool,
    pub opened_at: Option<DateTime<Utc>>,
    pub clicked: bool,
    pub clicked_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub unsubscribed: bool,
    #[serde(default)]
    pub unsubscribed_at: Option<DateTime<Utc>>,
}

impl MessageRecord {
    pub fn sent_now(email: String) -> Self {
        Self {
            email,
            sent_at: Utc::now(),
            opened: false,
            opened_at: None,
            clicked: false,
            clicked_at: None,
            unsubscribed: false,
            unsubscribed_at: None,
        }
    }
}

/// All mutable state for one dispatch run, loaded together
#[derive(Debug, Default)]
pub struct LedgerState {
    pub progress: SendProgress,
    pub schedule: SendingSchedule,
    pub sent: HashSet<String>,
    pub unsubscribed: HashSet<String>,
    pub history: HashMap<String, MessageRecord>,
}

/// Durable store for the five outreach documents
#[derive(Debug, Clone)]
pub struct Ledger {
    data_dir: PathBuf,
}

impl Ledger {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Read a document, substituting the default when missing or corrupt
    async fn read_document<T: DeserializeOwned>(&self, file_name: &str) -> Option<T> {
        let path = self.data_dir.join(file_name);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(_) => return None,
        };

        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Error decoding {}: {e}. Reinitializing.", path.display());
                None
            }
        }
    }

    async fn write_document<T: Serialize>(
        &self,
        file_name: &str,
        value: &T,
        pretty: bool,
    ) -> DispatcherResult<()> {
        fs::create_dir_all(&self.data_dir).await?;
        let content = if pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        fs::write(self.data_dir.join(file_name), content).await?;
        Ok(())
    }

    pub async fn load_progress(&self) -> SendProgress {
        self.read_document(PROGRESS_FILE).await.unwrap_or_default()
    }

    pub async fn save_progress(&self, progress: &SendProgress) -> DispatcherResult<()> {
        self.write_document(PROGRESS_FILE, progress, false).await
    }

    pub async fn load_schedule(&self) -> SendingSchedule {
        self.read_document(SCHEDULE_FILE).await.unwrap_or_default()
    }

    pub async fn save_schedule(&self, schedule: &SendingSchedule) -> DispatcherResult<()> {
        self.write_document(SCHEDULE_FILE, schedule, false).await
    }

    pub async fn load_sent(&self) -> HashSet<String> {
        self.read_document(SENT_EMAILS_FILE).await.unwrap_or_default()
    }

    pub async fn save_sent(&self, sent: &HashSet<String>) -> DispatcherResult<()> {
        self.write_document(SENT_EMAILS_FILE, sent, false).await
    }

    pub async fn load_unsubscribed(&self) -> HashSet<String> {
        self.read_document(UNSUBSCRIBED_FILE).await.unwrap_or_default()
    }

    pub async fn save_unsubscribed(&self, unsubscribed: &HashSet<String>) -> DispatcherResult<()> {
        self.write_document(UNSUBSCRIBED_FILE, unsubscribed, false).await
    }

    pub async fn load_history(&self) -> HashMap<String, MessageRecord> {
        self.read_document(HISTORY_FILE).await.unwrap_or_default()
    }

    pub async fn save_history(
        &self,
        history: &HashMap<String, MessageRecord>,
    ) -> DispatcherResult<()> {
        self.write_document(HISTORY_FILE, history, true).await
    }

    /// Load everything a dispatch run reads or mutates
    pub async fn load_state(&self) -> LedgerState {
        LedgerState {
            progress: self.load_progress().await,
            schedule: self.load_schedule().await,
            sent: self.load_sent().await,
            unsubscribed: self.load_unsubscribed().await,
            history: self.load_history().await,
        }
    }

    /// Persist the documents a dispatch run mutates
    ///
    /// Called after every batch; this is the crash-recovery checkpoint.
    /// The unsubscribed set is owned by the tracking recorder and is not
    /// written here.
    pub async fn save_checkpoint(&self, state: &LedgerState) -> DispatcherResult<()> {
        self.save_progress(&state.progress).await?;
        self.save_schedule(&state.schedule).await?;
        self.save_sent(&state.sent).await?;
        self.save_history(&state.history).await?;
        Ok(())
    }
}
