//! Quota engine
//!
//! Pure computation over the ledger's counters answering "how many sends
//! are permitted right now". Three simultaneously-active limits: the
//! daily limit derived from the progressive weekly cap, the weekly cap
//! itself, and the hard monthly cap. Rollovers (day, week, month) are
//! applied to the counters in place before the answer is computed, so
//! callers must persist both records afterwards.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use tracing::info;

use crate::ledger::{SendProgress, SendingSchedule};

/// Progressive warm-up schedule: week number -> emails permitted that week
///
/// Weeks beyond the highest defined entry saturate at that entry's value.
#[derive(Debug, Clone)]
pub struct WeeklyCaps {
    caps: BTreeMap<u32, u32>,
}

impl Default for WeeklyCaps {
    fn default() -> Self {
        // Week 1: 100/day, doubling each week until the monthly cap governs.
        Self::new([(1, 700), (2, 1400), (3, 2800), (4, 5600), (5, 11200)])
    }
}

impl WeeklyCaps {
    pub fn new(entries: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let caps: BTreeMap<u32, u32> = entries.into_iter().collect();
        assert!(!caps.is_empty(), "weekly caps table must not be empty");
        Self { caps }
    }

    /// Cap for the given week, saturating at the highest defined week
    pub fn limit_for(&self, week: u32) -> u32 {
        match self.caps.get(&week) {
            Some(cap) => *cap,
            // BTreeMap is never empty per the constructor assert
            None => *self.caps.last_key_value().map(|(_, cap)| cap).unwrap_or(&0),
        }
    }
}

/// Advance the schedule to the week containing `today`
///
/// Resets `weekly_sent` exactly once per week transition; repeated calls
/// on the same day are no-ops. Must run before any quota computation.
pub fn roll_schedule(schedule: &mut SendingSchedule, today: NaiveDate) {
    let days_since_start = (today - schedule.start_date).num_days().max(0);
    let computed_week = (days_since_start / 7) as u32 + 1;

    if computed_week > schedule.current_week {
        info!("📅 Starting new week: Week {computed_week}");
        schedule.current_week = computed_week;
        schedule.weekly_sent = 0;
    }

    if today != schedule.last_sent_date {
        schedule.last_sent_date = today;
    }
}

/// Reset daily/monthly counters when `today` crosses a day or month
/// boundary relative to the stored date
///
/// Both checks use the pre-update stored date to detect the transition;
/// the date field is advanced afterwards.
pub fn roll_progress(progress: &mut SendProgress, today: NaiveDate) {
    let stored = progress.last_sent_date;

    if today != stored {
        progress.emails_sent_today = 0;
    }
    if (today.year(), today.month()) != (stored.year(), stored.month()) {
        progress.emails_sent_this_month = 0;
    }

    progress.last_sent_date = today;
}

/// Maximum number of additional sends permitted right now
///
/// Applies all rollovers to `progress` and `schedule` in place, then
/// returns min(daily remaining, weekly remaining, monthly remaining).
/// The result may be zero or negative; callers clamp before batching.
pub fn admissible_now(
    progress: &mut SendProgress,
    schedule: &mut SendingSchedule,
    caps: &WeeklyCaps,
    monthly_cap: u32,
    today: NaiveDate,
) -> i64 {
    roll_progress(progress, today);
    roll_schedule(schedule, today);

    let weekly_limit = caps.limit_for(schedule.current_week) as i64;
    let daily_limit = weekly_limit / 7;

    let remaining_daily = daily_limit - progress.emails_sent_today as i64;
    let remaining_weekly = weekly_limit - schedule.weekly_sent as i64;
    let remaining_monthly = monthly_cap as i64 - progress.emails_sent_this_month as i64;

    remaining_daily.min(remaining_weekly).min(remaining_monthly)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MONTHLY_EMAIL_CAP;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekly_caps_lookup_and_saturation() {
        let caps = WeeklyCaps::default();
        assert_eq!(caps.limit_for(1), 700);
        assert_eq!(caps.limit_for(4), 5600);
        // Beyond the table, saturate at the highest defined week
        assert_eq!(caps.limit_for(6), 11200);
        assert_eq!(caps.limit_for(99), 11200);
    }

    #[test]
    fn test_single_entry_table_saturates_at_that_entry() {
        let caps = WeeklyCaps::new([(1, 700)]);
        assert_eq!(caps.limit_for(6), 700);
    }

    #[test]
    fn test_week_rollover_resets_weekly_sent_once() {
        let mut schedule = SendingSchedule::starting_on(date(2026, 8, 1));
        schedule.weekly_sent = 300;

        // Day 8 is in week 2
        roll_schedule(&mut schedule, date(2026, 8, 9));
        assert_eq!(schedule.current_week, 2);
        assert_eq!(schedule.weekly_sent, 0);

        // Repeated same-day query is a no-op
        schedule.weekly_sent = 42;
        roll_schedule(&mut schedule, date(2026, 8, 9));
        assert_eq!(schedule.current_week, 2);
        assert_eq!(schedule.weekly_sent, 42);
    }

    #[test]
    fn test_week_never_regresses() {
        let mut schedule = SendingSchedule::starting_on(date(2026, 8, 1));
        schedule.current_week = 3;
        schedule.weekly_sent = 10;

        roll_schedule(&mut schedule, date(2026, 8, 2));
        assert_eq!(schedule.current_week, 3);
        assert_eq!(schedule.weekly_sent, 10);
    }

    #[test]
    fn test_day_rollover_resets_daily_counter() {
        let mut progress = SendProgress::starting_on(date(2026, 8, 10));
        progress.emails_sent_today = 55;
        progress.emails_sent_this_month = 200;

        roll_progress(&mut progress, date(2026, 8, 11));
        assert_eq!(progress.emails_sent_today, 0);
        assert_eq!(progress.emails_sent_this_month, 200);
        assert_eq!(progress.last_sent_date, date(2026, 8, 11));
    }

    #[test]
    fn test_month_rollover_resets_monthly_counter() {
        let mut progress = SendProgress::starting_on(date(2026, 8, 31));
        progress.emails_sent_today = 55;
        progress.emails_sent_this_month = 4000;

        roll_progress(&mut progress, date(2026, 9, 1));
        assert_eq!(progress.emails_sent_today, 0);
        assert_eq!(progress.emails_sent_this_month, 0);
    }

    #[test]
    fn test_same_day_query_preserves_counters() {
        let mut progress = SendProgress::starting_on(date(2026, 8, 10));
        progress.emails_sent_today = 55;
        progress.emails_sent_this_month = 200;

        roll_progress(&mut progress, date(2026, 8, 10));
        assert_eq!(progress.emails_sent_today, 55);
        assert_eq!(progress.emails_sent_this_month, 200);
    }

    #[test]
    fn test_admissible_is_min_of_three_limits() {
        let today = date(2026, 8, 10);
        let caps = WeeklyCaps::default();

        // Week 1: weekly 700, daily 100
        let mut progress = SendProgress::starting_on(today);
        let mut schedule = SendingSchedule::starting_on(today);
        progress.emails_sent_today = 30;

        let quota = admissible_now(&mut progress, &mut schedule, &caps, MONTHLY_EMAIL_CAP, today);
        assert_eq!(quota, 70); // daily remaining is tightest

        // Weekly nearly exhausted
        schedule.weekly_sent = 660;
        let quota = admissible_now(&mut progress, &mut schedule, &caps, MONTHLY_EMAIL_CAP, today);
        assert_eq!(quota, 40);

        // Monthly cap dominates
        progress.emails_sent_this_month = MONTHLY_EMAIL_CAP - 5;
        let quota = admissible_now(&mut progress, &mut schedule, &caps, MONTHLY_EMAIL_CAP, today);
        assert_eq!(quota, 5);
    }

    #[test]
    fn test_admissible_may_go_negative() {
        let today = date(2026, 8, 10);
        let caps = WeeklyCaps::default();

        let mut progress = SendProgress::starting_on(today);
        let mut schedule = SendingSchedule::starting_on(today);
        progress.emails_sent_today = 150; // over the week-1 daily limit of 100

        let quota = admissible_now(&mut progress, &mut schedule, &caps, MONTHLY_EMAIL_CAP, today);
        assert_eq!(quota, -50);
    }

    #[test]
    fn test_admissible_applies_rollovers_first() {
        let caps = WeeklyCaps::default();
        let start = date(2026, 8, 1);

        let mut progress = SendProgress::starting_on(start);
        progress.emails_sent_today = 100; // exhausted on day one
        let mut schedule = SendingSchedule::starting_on(start);
        schedule.weekly_sent = 700;

        // Day 9 is a new day and a new week: both counters reset before
        // the quota is computed, now against the week-2 cap.
        let quota = admissible_now(
            &mut progress,
            &mut schedule,
            &caps,
            MONTHLY_EMAIL_CAP,
            date(2026, 8, 9),
        );
        assert_eq!(schedule.current_week, 2);
        assert_eq!(quota, 200); // 1400 / 7
    }
}
