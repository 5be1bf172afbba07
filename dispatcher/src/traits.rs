//! Trait definitions with mockall annotations for testing
//!
//! Seams for the dispatch loop's external collaborators: the mail
//! delivery provider, the content personalizer, and the pacing policy
//! that spaces sends out in time. All three are injected so tests can
//! run with mocks and zero delays.

use crate::error::DispatcherResult;

/// A fully rendered message ready for delivery
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
    /// Opaque identifier keyed into the message history
    pub tracking_id: String,
}

/// Rendered content for one recipient
#[derive(Debug, Clone)]
pub struct EmailContent {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Mail delivery provider abstraction
///
/// Delivery is a single boolean outcome: `Ok(())` on acceptance, an
/// error for any non-2xx response or transport failure. No retry or
/// partial-success granularity.
#[mockall::automock]
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &OutboundEmail) -> DispatcherResult<()>;
}

/// Per-recipient content rendering
///
/// Deterministic except for the randomized subject-line choice, which
/// exists for outreach variety, not correctness.
#[mockall::automock]
pub trait Personalizer: Send + Sync {
    fn personalize(&self, recipient: &str, tracking_id: &str) -> EmailContent;
}

/// Pacing policy between sends and between batches
///
/// The production policy sleeps for real wall-clock durations; tests
/// substitute [`crate::services::NoPacing`].
#[mockall::automock]
#[async_trait::async_trait]
pub trait PacingPolicy: Send + Sync {
    /// Pause after each individual send attempt
    async fn pause_between_sends(&self);

    /// Pause between consecutive batches
    async fn pause_between_batches(&self);
}
