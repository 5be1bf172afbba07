//! Shared fixtures for dispatcher integration tests

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use dispatcher::services::{NoPacing, OutreachPersonalizer};
use dispatcher::traits::MockMailer;
use dispatcher::{Dispatcher, Ledger, SenderConfig, WeeklyCaps};

pub type TestDispatcher = Dispatcher<MockMailer, OutreachPersonalizer, NoPacing>;

/// Dispatcher wired with a mock mailer, zero-delay pacing, and a
/// temp-dir ledger
pub fn build_dispatcher(mailer: MockMailer, temp: &TempDir) -> TestDispatcher {
    build_dispatcher_with_caps(mailer, temp, WeeklyCaps::default())
}

pub fn build_dispatcher_with_caps(
    mailer: MockMailer,
    temp: &TempDir,
    weekly_caps: WeeklyCaps,
) -> TestDispatcher {
    let mut config = SenderConfig::default()
        .with_data_dir(temp.path().to_path_buf())
        .with_base_url("http://localhost:5000".to_string());
    config.weekly_caps = weekly_caps;

    let personalizer = OutreachPersonalizer::new(config.base_url.clone());
    Dispatcher::new(config, mailer, personalizer, NoPacing)
}

/// Mailer that accepts every message
pub fn accepting_mailer() -> MockMailer {
    let mut mailer = MockMailer::new();
    mailer.expect_send().returning(|_| Ok(()));
    mailer
}

pub fn test_ledger(temp: &TempDir) -> Ledger {
    Ledger::new(temp.path().to_path_buf())
}

/// Write a recipient CSV with an `email` header
pub fn write_csv(dir: &Path, name: &str, addresses: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut content = String::from("email\n");
    for address in addresses {
        content.push_str(address);
        content.push('\n');
    }
    std::fs::write(&path, content).unwrap();
    path
}

pub async fn seed_unsubscribed(ledger: &Ledger, addresses: &[&str]) {
    let set: HashSet<String> = addresses.iter().map(|a| a.to_string()).collect();
    ledger.save_unsubscribed(&set).await.unwrap();
}
