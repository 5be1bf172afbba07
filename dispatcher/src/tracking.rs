//! Tracking identifiers and the tracking recorder
//!
//! Identifiers are collision-resistant digests embedded in tracking
//! URLs. The recorder applies open/click/unsubscribe events against the
//! message history; each operation is a full load-mutate-save cycle
//! under a mutex so concurrent pixel hits cannot lose updates.

use chrono::Utc;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::error::DispatcherResult;
use crate::ledger::Ledger;

/// Fresh tracking identifier for one message to `email`
///
/// sha256 over address + timestamp + random component, truncated to 16
/// hex characters. Unique per message, opaque to recipients.
pub fn generate_tracking_id(email: &str) -> String {
    let timestamp = Utc::now().format("%Y%m%d%H%M%S");
    let nonce = Uuid::new_v4().simple().to_string();
    let seed = format!("{email}-{timestamp}-{}", &nonce[..8]);

    let digest = Sha256::digest(seed.as_bytes());
    digest
        .iter()
        .take(8)
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

/// Records tracking events against the message history
///
/// All three operations are idempotent-friendly mutators keyed by
/// tracking identifier; an unknown identifier is a silent no-op and
/// never creates a history entry (forged ids must not grow the map).
pub struct TrackingRecorder {
    ledger: Ledger,
    guard: Mutex<()>,
}

impl TrackingRecorder {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger,
            guard: Mutex::new(()),
        }
    }

    /// Mark a message opened; first open wins
    pub async fn record_open(&self, tracking_id: &str) -> DispatcherResult<()> {
        let _lock = self.guard.lock().await;

        let mut history = self.ledger.load_history().await;
        if let Some(record) = history.get_mut(tracking_id) {
            if !record.opened {
                record.opened = true;
                record.opened_at = Some(Utc::now());
                self.ledger.save_history(&history).await?;
                debug!("👀 Recorded open for {tracking_id}");
            }
        }
        Ok(())
    }

    /// Mark a message clicked; every hit refreshes the timestamp
    pub async fn record_click(&self, tracking_id: &str) -> DispatcherResult<()> {
        let _lock = self.guard.lock().await;

        let mut history = self.ledger.load_history().await;
        if let Some(record) = history.get_mut(tracking_id) {
            record.clicked = true;
            record.clicked_at = Some(Utc::now());
            self.ledger.save_history(&history).await?;
            debug!("🔗 Recorded click for {tracking_id}");
        }
        Ok(())
    }

    /// Opt an address out of all future sends
    ///
    /// The unsubscribed set always grows; the history record is marked
    /// only when the id resolves and only on the first transition.
    pub async fn record_unsubscribe(
        &self,
        email: &str,
        tracking_id: Option<&str>,
    ) -> DispatcherResult<()> {
        let _lock = self.guard.lock().await;

        let mut unsubscribed = self.ledger.load_unsubscribed().await;
        if unsubscribed.insert(email.to_string()) {
            self.ledger.save_unsubscribed(&unsubscribed).await?;
            debug!("🚫 Unsubscribed {email}");
        }

        if let Some(tracking_id) = tracking_id {
            let mut history = self.ledger.load_history().await;
            if let Some(record) = history.get_mut(tracking_id) {
                if !record.unsubscribed {
                    record.unsubscribed = true;
                    record.unsubscribed_at = Some(Utc::now());
                    self.ledger.save_history(&history).await?;
                }
            }
        }
        Ok(())
    }
}
