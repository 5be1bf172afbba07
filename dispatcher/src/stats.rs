//! Campaign statistics over the message history

use serde::{Deserialize, Serialize};

use crate::ledger::{LedgerState, MessageRecord};

/// Number of recent-activity records reported
const RECENT_ACTIVITY_LIMIT: usize = 50;

/// Aggregate statistics snapshot for reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_sent: usize,
    pub total_opened: usize,
    pub total_clicked: usize,
    pub total_unsubscribed: usize,
    pub open_rate: f64,
    pub click_rate: f64,
    pub sent_today: u32,
    pub sent_this_month: u32,
    /// Most recent sends first, capped at 50
    pub recent_activity: Vec<MessageRecord>,
}

impl StatsSnapshot {
    pub fn compute(state: &LedgerState) -> Self {
        let total_sent = state.sent.len();
        let total_opened = state.history.values().filter(|r| r.opened).count();
        let total_clicked = state.history.values().filter(|r| r.clicked).count();

        let rate = |count: usize| {
            if total_sent > 0 {
                count as f64 / total_sent as f64 * 100.0
            } else {
                0.0
            }
        };

        let mut recent_activity: Vec<MessageRecord> = state.history.values().cloned().collect();
        recent_activity.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        recent_activity.truncate(RECENT_ACTIVITY_LIMIT);

        Self {
            total_sent,
            total_opened,
            total_clicked,
            total_unsubscribed: state.unsubscribed.len(),
            open_rate: rate(total_opened),
            click_rate: rate(total_clicked),
            sent_today: state.progress.emails_sent_today,
            sent_this_month: state.progress.emails_sent_this_month,
            recent_activity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn record(email: &str, age_minutes: i64, opened: bool, clicked: bool) -> MessageRecord {
        let mut record = MessageRecord::sent_now(email.to_string());
        record.sent_at = Utc::now() - Duration::minutes(age_minutes);
        record.opened = opened;
        record.clicked = clicked;
        record
    }

    #[test]
    fn test_totals_and_rates() {
        let mut state = LedgerState::default();
        for i in 0..4 {
            state.sent.insert(format!("user{i}@example.com"));
        }
        state
            .history
            .insert("a".to_string(), record("user0@example.com", 3, true, true));
        state
            .history
            .insert("b".to_string(), record("user1@example.com", 2, true, false));
        state
            .history
            .insert("c".to_string(), record("user2@example.com", 1, false, false));
        state.unsubscribed.insert("gone@example.com".to_string());

        let stats = StatsSnapshot::compute(&state);
        assert_eq!(stats.total_sent, 4);
        assert_eq!(stats.total_opened, 2);
        assert_eq!(stats.total_clicked, 1);
        assert_eq!(stats.total_unsubscribed, 1);
        assert_eq!(stats.open_rate, 50.0);
        assert_eq!(stats.click_rate, 25.0);
    }

    #[test]
    fn test_rates_zero_when_nothing_sent() {
        let stats = StatsSnapshot::compute(&LedgerState::default());
        assert_eq!(stats.open_rate, 0.0);
        assert_eq!(stats.click_rate, 0.0);
    }

    #[test]
    fn test_recent_activity_sorted_and_capped() {
        let mut state = LedgerState::default();
        for i in 0..60 {
            state
                .history
                .insert(format!("id{i}"), record(&format!("user{i}@example.com"), i, false, false));
        }

        let stats = StatsSnapshot::compute(&state);
        assert_eq!(stats.recent_activity.len(), 50);
        // Newest first
        assert_eq!(stats.recent_activity[0].email, "user0@example.com");
        for pair in stats.recent_activity.windows(2) {
            assert!(pair[0].sent_at >= pair[1].sent_at);
        }
    }
}
