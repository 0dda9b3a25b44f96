//! Streak tracking (spec §4.3 supplement, `streak_service.py` original)
//!
//! Same-day activity is a no-op; activity on the day after the last
//! recorded day increments the streak; anything older (or no prior record)
//! resets it to 1. Longest-streak and total-days counters only ever move
//! forward.
//!
//! Read-time decay: a streak that has gone stale (last activity date is
//! more than one day in the past) reads as zero via [`decayed_view`] without
//! mutating storage. The stored counters are only corrected the next time
//! [`record_savings_activity`] / [`record_transaction_activity`] runs — this
//! mirrors the snapshot/source pattern the sync engine already uses: stale
//! state is tolerated until the next write, never silently rewritten on a
//! read path.

use chrono::NaiveDate;

use crate::models::streak::UserStreak;

fn record(current: u32, longest: u32, total: u32, last_date: Option<NaiveDate>, today: NaiveDate) -> (u32, u32, u32, Option<NaiveDate>) {
    match last_date {
        Some(last) if last == today => (current, longest, total, last_date),
        Some(last) if last == today.pred_opt().unwrap_or(last) => {
            let new_current = current + 1;
            (new_current, longest.max(new_current), total + 1, Some(today))
        }
        _ => (1, longest.max(1), total + 1, Some(today)),
    }
}

/// Record savings activity for `today` (spec: typically the IST calendar
/// date of a successful allocation).
pub fn record_savings_activity(streak: &mut UserStreak, today: NaiveDate) {
    let (current, longest, total, last) = record(
        streak.savings_streak,
        streak.longest_savings_streak,
        streak.total_savings_days,
        streak.last_savings_date,
        today,
    );
    streak.savings_streak = current;
    streak.longest_savings_streak = longest;
    streak.total_savings_days = total;
    streak.last_savings_date = last;
}

/// Record transaction (any sync-observed activity) for `today`.
pub fn record_transaction_activity(streak: &mut UserStreak, today: NaiveDate) {
    let (current, longest, total, last) = record(
        streak.transaction_streak,
        streak.longest_transaction_streak,
        streak.total_transaction_days,
        streak.last_transaction_date,
        today,
    );
    streak.transaction_streak = current;
    streak.longest_transaction_streak = longest;
    streak.total_transaction_days = total;
    streak.last_transaction_date = last;
}

/// Read-only view of a streak as of `today`, decaying a lapsed current
/// streak to zero without mutating `streak` (see module docs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakView {
    pub current: u32,
    pub longest: u32,
    pub total_days: u32,
}

fn decay(current: u32, longest: u32, total: u32, last_date: Option<NaiveDate>, today: NaiveDate) -> StreakView {
    let lapsed = match last_date {
        Some(last) => last != today && last != today.pred_opt().unwrap_or(last),
        None => true,
    };
    StreakView {
        current: if lapsed { 0 } else { current },
        longest,
        total_days: total,
    }
}

pub fn decayed_savings_view(streak: &UserStreak, today: NaiveDate) -> StreakView {
    decay(
        streak.savings_streak,
        streak.longest_savings_streak,
        streak.total_savings_days,
        streak.last_savings_date,
        today,
    )
}

pub fn decayed_transaction_view(streak: &UserStreak, today: NaiveDate) -> StreakView {
    decay(
        streak.transaction_streak,
        streak.longest_transaction_streak,
        streak.total_transaction_days,
        streak.last_transaction_date,
        today,
    )
}
