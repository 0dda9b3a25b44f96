//! UserStreak model
//!
//! One row per user. Behavior (recording activity, the read-time decay rule)
//! lives in [`crate::streak`]; this module is just the persisted shape
//! (spec §3).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Savings/transaction streak counters for one user.
///
/// Invariant: `current <= longest` always holds for both streak kinds —
/// enforced at every mutation site in [`crate::streak`], never by this
/// struct directly (it is a plain persisted record).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStreak {
    pub user_id: Uuid,
    pub savings_streak: u32,
    pub longest_savings_streak: u32,
    pub total_savings_days: u32,
    pub last_savings_date: Option<NaiveDate>,
    pub transaction_streak: u32,
    pub longest_transaction_streak: u32,
    pub total_transaction_days: u32,
    pub last_transaction_date: Option<NaiveDate>,
}

impl UserStreak {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            savings_streak: 0,
            longest_savings_streak: 0,
            total_savings_days: 0,
            last_savings_date: None,
            transaction_streak: 0,
            longest_transaction_streak: 0,
            total_transaction_days: 0,
            last_transaction_date: None,
        }
    }
}
