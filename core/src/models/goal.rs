//! Goal model
//!
//! Invariants (spec §3):
//! - `0 <= saved`
//! - `is_completed ⇒ saved >= target`
//! - `saved > target` is permitted only transiently; the Allocation Engine
//!   clamps new allocations at `target - saved` and flips `is_completed`
//!   when equal (see [`crate::allocation::engine`]).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Far-future sentinel used internally for goals with no deadline, so
/// urgency ranking (spec §4.2) never needs an `Option` branch.
pub fn no_deadline_sentinel() -> DateTime<Utc> {
    DateTime::<Utc>::MAX_UTC
}

/// Goal type. `Emergency` is a distinguished type that receives priority
/// allocation (spec §4.2) and whose target is sized against expected
/// monthly expenses (spec §4.3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    Emergency,
    Savings,
    MicroSavings,
    Other(String),
}

impl GoalType {
    pub fn is_emergency(&self) -> bool {
        matches!(self, GoalType::Emergency)
    }
}

/// Errors mutating a [`Goal`]'s saved balance.
#[derive(Debug, Error, PartialEq)]
pub enum GoalError {
    #[error("allocation amount must be positive, got {0}")]
    NonPositiveAllocation(Decimal),
    #[error("cannot allocate to a goal with zero target (id {0})")]
    ZeroTarget(Uuid),
    #[error("cannot allocate to an already-completed goal (id {0})")]
    AlreadyCompleted(Uuid),
}

/// A user-owned savings goal (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub target: Decimal,
    pub saved: Decimal,
    pub deadline: Option<DateTime<Utc>>,
    pub kind: GoalType,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(
        user_id: Uuid,
        name: impl Into<String>,
        target: Decimal,
        deadline: Option<DateTime<Utc>>,
        kind: GoalType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            target,
            saved: Decimal::ZERO,
            deadline,
            kind,
            is_completed: false,
            created_at: Utc::now(),
        }
    }

    /// Deadline for urgency ranking purposes: the real deadline, or the
    /// far-future sentinel when absent (spec §3).
    pub fn deadline_for_ranking(&self) -> DateTime<Utc> {
        self.deadline.unwrap_or_else(no_deadline_sentinel)
    }

    /// Fractional progress toward target, in `[0, 1]` (0 when target is 0).
    pub fn progress(&self) -> Decimal {
        if self.target <= Decimal::ZERO {
            Decimal::ZERO
        } else {
            (self.saved / self.target).min(Decimal::ONE)
        }
    }

    /// Headroom remaining before this goal is full.
    pub fn remaining_capacity(&self) -> Decimal {
        (self.target - self.saved).max(Decimal::ZERO)
    }

    /// Apply an allocation, clamped at remaining capacity (spec §4.2's
    /// per-goal clamping). Returns the amount actually applied, which may
    /// be less than `requested`. Flips `is_completed` when the goal reaches
    /// its target. Rejects allocation to a zero-target or already-completed
    /// goal outright — the caller (Goal Lifecycle Controller) is expected
    /// to have resized/rotated the goal first (spec §4.2).
    pub fn apply_allocation(&mut self, requested: Decimal) -> Result<Decimal, GoalError> {
        if requested <= Decimal::ZERO {
            return Err(GoalError::NonPositiveAllocation(requested));
        }
        if self.target <= Decimal::ZERO {
            return Err(GoalError::ZeroTarget(self.id));
        }
        if self.is_completed {
            return Err(GoalError::AlreadyCompleted(self.id));
        }

        let applied = requested.min(self.remaining_capacity());
        self.saved += applied;
        if self.saved >= self.target {
            self.is_completed = true;
        }
        Ok(applied)
    }
}

/// Recurring goal name/type pattern (spec §4.3 terminal-state reactions).
/// Matched case-insensitively against the goal's name.
pub fn is_recurring_goal_name(name: &str) -> bool {
    const PATTERNS: &[&str] = &[
        "emergency",
        "vacation",
        "monthly",
        "savings",
        "buffer",
        "reserve",
        "fund",
    ];
    let lower = name.to_lowercase();
    PATTERNS.iter().any(|p| lower.contains(p))
}

/// One-time goal name/type pattern (spec §4.3).
pub fn is_one_time_goal_name(name: &str) -> bool {
    const PATTERNS: &[&str] = &[
        "buy", "purchase", "phone", "laptop", "wedding", "car", "house", "gift",
    ];
    let lower = name.to_lowercase();
    PATTERNS.iter().any(|p| lower.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn goal(target: Decimal, saved: Decimal) -> Goal {
        let mut g = Goal::new(Uuid::new_v4(), "Vacation", target, None, GoalType::Savings);
        g.saved = saved;
        g
    }

    #[test]
    fn apply_allocation_clamps_to_remaining_capacity_and_completes() {
        let mut g = goal(dec!(5000.00), dec!(4800.00));
        let applied = g.apply_allocation(dec!(500.00)).unwrap();
        assert_eq!(applied, dec!(200.00));
        assert_eq!(g.saved, dec!(5000.00));
        assert!(g.is_completed);
    }

    #[test]
    fn rejects_allocation_to_zero_target_goal() {
        let mut g = goal(dec!(0.00), dec!(0.00));
        let err = g.apply_allocation(dec!(100.00)).unwrap_err();
        assert_eq!(err, GoalError::ZeroTarget(g.id));
    }

    #[test]
    fn rejects_allocation_to_completed_goal() {
        let mut g = goal(dec!(100.00), dec!(100.00));
        g.is_completed = true;
        let err = g.apply_allocation(dec!(10.00)).unwrap_err();
        assert_eq!(err, GoalError::AlreadyCompleted(g.id));
    }

    #[test]
    fn recurring_and_one_time_name_patterns() {
        assert!(is_recurring_goal_name("Emergency Fund"));
        assert!(is_recurring_goal_name("Monthly Buffer"));
        assert!(!is_recurring_goal_name("New Laptop"));

        assert!(is_one_time_goal_name("Buy a Car"));
        assert!(is_one_time_goal_name("Wedding Fund")); // matches both patterns; caller checks recurring first
        assert!(!is_one_time_goal_name("Emergency Fund"));
    }
}
