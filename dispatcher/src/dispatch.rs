//! Dispatch loop
//!
//! The orchestrator of a sending run: pulls eligible recipients up to
//! the quota, partitions them into fixed-size batches, sends each with
//! pacing delays, and checkpoints all durable state after every batch so
//! a crash loses at most one batch of bookkeeping and never re-sends to
//! an already-contacted address.

use std::path::Path;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::SenderConfig;
use crate::error::{DispatcherError, DispatcherResult};
use crate::filter;
use crate::ledger::{Ledger, MessageRecord};
use crate::quota;
use crate::source;
use crate::tracking::generate_tracking_id;
use crate::traits::{Mailer, OutboundEmail, PacingPolicy, Personalizer};

/// Result summary of one dispatch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub sent: usize,
    /// Reserved for pre-filter skip classification; always 0 from this loop
    pub skipped: usize,
    pub remaining_today: i64,
    pub batches_processed: usize,
    pub week_number: u32,
    pub weekly_sent: u32,
    pub weekly_limit: u32,
    pub weekly_remaining: i64,
}

/// Current quota position, for display before a run is launched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaSnapshot {
    pub admissible: i64,
    pub sent_today: u32,
    pub sent_this_month: u32,
    pub week_number: u32,
    pub weekly_sent: u32,
    pub weekly_limit: u32,
}

/// Serial, rate-limited email dispatcher
///
/// Exactly one run executes at a time; the internal mutex serializes
/// concurrent invocations so they cannot race on the ledger files.
pub struct Dispatcher<M, P, D> {
    ledger: Ledger,
    config: SenderConfig,
    mailer: M,
    personalizer: P,
    pacing: D,
    run_lock: Mutex<()>,
}

impl<M, P, D> Dispatcher<M, P, D>
where
    M: Mailer,
    P: Personalizer,
    D: PacingPolicy,
{
    pub fn new(config: SenderConfig, mailer: M, personalizer: P, pacing: D) -> Self {
        let ledger = Ledger::new(config.data_dir.clone());
        Self {
            ledger,
            config,
            mailer,
            personalizer,
            pacing,
            run_lock: Mutex::new(()),
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Process a recipient CSV, sending up to the current quota
    pub async fn run(&self, csv_path: &Path, batch_size: usize) -> DispatcherResult<RunSummary> {
        let _guard = self.run_lock.lock().await;

        if batch_size == 0 {
            return Err(DispatcherError::config("batch_size must be positive"));
        }

        // Input errors abort before any state is touched
        let recipients = source::load_recipients(csv_path)?;
        if recipients.is_empty() {
            return Err(DispatcherError::NoRecipients);
        }

        let mut state = self.ledger.load_state().await;
        let today = Local::now().date_naive();

        let daily_quota = quota::admissible_now(
            &mut state.progress,
            &mut state.schedule,
            &self.config.weekly_caps,
            self.config.monthly_cap,
            today,
        );

        let weekly_limit = self.config.weekly_caps.limit_for(state.schedule.current_week);
        info!(
            "🚀 Week {}: {}/{} emails sent this week",
            state.schedule.current_week, state.schedule.weekly_sent, weekly_limit
        );
        info!("🚀 Daily email limit: {daily_quota}");

        let eligible = filter::eligible(&recipients, &state.sent, &state.unsubscribed);
        info!("Found {} valid emails to process", eligible.len());

        let to_process = (daily_quota.max(0) as usize).min(eligible.len());
        let num_batches = to_process.div_ceil(batch_size);
        info!(
            "Will process {to_process} emails in {num_batches} batches of up to {batch_size} emails each"
        );

        let mut sent_count = 0;
        for (batch_index, batch) in eligible[..to_process].chunks(batch_size).enumerate() {
            info!(
                "Processing batch {}/{} ({} emails)",
                batch_index + 1,
                num_batches,
                batch.len()
            );

            let mut batch_successful = 0;
            for email in batch {
                // Intra-run dedup: a duplicate later in the same list was
                // inserted into the sent set by its first occurrence.
                if state.sent.contains(email) {
                    continue;
                }

                let tracking_id = generate_tracking_id(email);
                let content = self.personalizer.personalize(email, &tracking_id);
                let message = OutboundEmail {
                    to: email.clone(),
                    subject: content.subject,
                    html_body: content.html_body,
                    text_body: content.text_body,
                    tracking_id: tracking_id.clone(),
                };

                match self.mailer.send(&message).await {
                    Ok(()) => {
                        state
                            .history
                            .insert(tracking_id, MessageRecord::sent_now(email.clone()));
                        state.sent.insert(email.clone());
                        state.progress.emails_sent_today += 1;
                        state.progress.emails_sent_this_month += 1;
                        state.schedule.weekly_sent += 1;
                        sent_count += 1;
                        batch_successful += 1;
                    }
                    Err(e) => {
                        // Non-fatal: neither marked sent nor quota-charged
                        warn!("❌ Failed to send email to {email}: {e}");
                    }
                }

                self.pacing.pause_between_sends().await;
            }

            info!(
                "Batch {} complete: {}/{} emails sent successfully",
                batch_index + 1,
                batch_successful,
                batch.len()
            );

            // Crash-recovery checkpoint
            self.ledger.save_checkpoint(&state).await?;

            if batch_index + 1 < num_batches {
                self.pacing.pause_between_batches().await;
            }
        }

        // Final save, idempotent with the last in-loop checkpoint; also
        // persists the rollovers when the quota left nothing to process.
        self.ledger.save_checkpoint(&state).await?;

        let weekly_limit = self.config.weekly_caps.limit_for(state.schedule.current_week);
        Ok(RunSummary {
            sent: sent_count,
            skipped: 0,
            remaining_today: daily_quota - sent_count as i64,
            batches_processed: num_batches,
            week_number: state.schedule.current_week,
            weekly_sent: state.schedule.weekly_sent,
            weekly_limit,
            weekly_remaining: weekly_limit as i64 - state.schedule.weekly_sent as i64,
        })
    }

    /// Current quota position without sending anything
    ///
    /// Rollovers triggered by the date check are persisted so repeated
    /// queries stay consistent.
    pub async fn quota(&self) -> DispatcherResult<QuotaSnapshot> {
        let _guard = self.run_lock.lock().await;

        let mut progress = self.ledger.load_progress().await;
        let mut schedule = self.ledger.load_schedule().await;
        let today = Local::now().date_naive();

        let admissible = quota::admissible_now(
            &mut progress,
            &mut schedule,
            &self.config.weekly_caps,
            self.config.monthly_cap,
            today,
        );

        self.ledger.save_progress(&progress).await?;
        self.ledger.save_schedule(&schedule).await?;

        Ok(QuotaSnapshot {
            admissible,
            sent_today: progress.emails_sent_today,
            sent_this_month: progress.emails_sent_this_month,
            week_number: schedule.current_week,
            weekly_sent: schedule.weekly_sent,
            weekly_limit: self.config.weekly_caps.limit_for(schedule.current_week),
        })
    }
}
