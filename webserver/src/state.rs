//! Shared application state for the HTTP handlers

use std::path::PathBuf;
use std::sync::Arc;

use dispatcher::services::{OutreachPersonalizer, RandomizedPacing, SendGridMailer};
use dispatcher::traits::{Mailer, PacingPolicy, Personalizer};
use dispatcher::{Dispatcher, Ledger, SenderConfig, TrackingRecorder};

/// State shared across all handlers
///
/// Generic over the collaborator implementations so tests can inject
/// mocks; production uses [`ProductionState`].
pub struct AppState<M, P, D> {
    pub dispatcher: Arc<Dispatcher<M, P, D>>,
    pub recorder: Arc<TrackingRecorder>,
    pub ledger: Ledger,
    pub upload_dir: PathBuf,
}

pub type ProductionState = AppState<SendGridMailer, OutreachPersonalizer, RandomizedPacing>;

impl<M, P, D> Clone for AppState<M, P, D> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: Arc::clone(&self.dispatcher),
            recorder: Arc::clone(&self.recorder),
            ledger: self.ledger.clone(),
            upload_dir: self.upload_dir.clone(),
        }
    }
}

impl<M, P, D> AppState<M, P, D>
where
    M: Mailer,
    P: Personalizer,
    D: PacingPolicy,
{
    pub fn new(config: SenderConfig, dispatcher: Dispatcher<M, P, D>, upload_dir: PathBuf) -> Self {
        let ledger = Ledger::new(config.data_dir.clone());
        let recorder = TrackingRecorder::new(ledger.clone());
        Self {
            dispatcher: Arc::new(dispatcher),
            recorder: Arc::new(recorder),
            ledger,
            upload_dir,
        }
    }
}

impl ProductionState {
    /// Wire the production collaborators from a sender configuration
    pub fn production(config: SenderConfig, upload_dir: PathBuf) -> Self {
        let mailer = SendGridMailer::new(
            config.api_key.clone(),
            config.from_address.clone(),
            config.from_name.clone(),
            config.base_url.clone(),
        );
        let personalizer = OutreachPersonalizer::new(config.base_url.clone());
        let dispatcher = Dispatcher::new(
            config.clone(),
            mailer,
            personalizer,
            RandomizedPacing::default(),
        );
        Self::new(config, dispatcher, upload_dir)
    }
}
