//! Urgency weighting (spec §4.2)
//!
//! Used both to build the Policy Advisor prompt context and by the formula
//! fallback to rank goals and pick per-goal shares.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::goal::Goal;

/// Five-level urgency classification over goals, derived from days-to-deadline
/// and progress (spec §4.2, GLOSSARY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Urgency {
    Overdue,
    Urgent,
    Moderate,
    Normal,
    Low,
}

impl Urgency {
    /// Per-goal share range for this urgency level, as a fraction of income
    /// (spec §4.2 table; `Overdue` and `Urgent` share the same 20–25% band).
    pub fn share_range(self) -> (Decimal, Decimal) {
        use rust_decimal_macros::dec;
        match self {
            Urgency::Overdue => (dec!(0.20), dec!(0.25)),
            Urgency::Urgent => (dec!(0.20), dec!(0.25)),
            Urgency::Moderate => (dec!(0.15), dec!(0.20)),
            Urgency::Normal => (dec!(0.10), dec!(0.15)),
            Urgency::Low => (dec!(0.05), dec!(0.10)),
        }
    }

    /// Midpoint of this level's share range — used by the formula fallback
    /// as a single deterministic number rather than an LLM-chosen point
    /// within the range.
    pub fn midpoint_share(self) -> Decimal {
        let (lo, hi) = self.share_range();
        (lo + hi) / Decimal::from(2)
    }
}

/// Days remaining until `deadline`, as of `now`. Negative when overdue.
pub fn days_to_deadline(deadline: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (deadline - now).num_days()
}

/// Classify a goal's urgency (spec §4.2 table plus the upgrade rule:
/// "if days <= 60 and progress < 50%, upgrade to urgent").
pub fn classify(goal: &Goal, now: DateTime<Utc>) -> Urgency {
    let days = days_to_deadline(goal.deadline_for_ranking(), now);
    let progress = goal.progress();

    let base = if days < 0 {
        Urgency::Overdue
    } else if days <= 30 {
        Urgency::Urgent
    } else if days <= 90 {
        Urgency::Moderate
    } else if days <= 180 {
        Urgency::Normal
    } else {
        Urgency::Low
    };

    if days <= 60 && progress < Decimal::new(50, 2) && base > Urgency::Urgent {
        Urgency::Urgent
    } else {
        base
    }
}

/// Sort key for goals: (urgency rank ascending, days-to-deadline ascending,
/// progress ascending) — spec §4.2 tie-break rule.
pub fn sort_key(goal: &Goal, now: DateTime<Utc>) -> (Urgency, i64, Decimal) {
    (
        classify(goal, now),
        days_to_deadline(goal.deadline_for_ranking(), now),
        goal.progress(),
    )
}

/// Sort goals in place by urgency, most urgent first.
pub fn sort_by_urgency(goals: &mut [Goal], now: DateTime<Utc>) {
    goals.sort_by(|a, b| sort_key(a, now).cmp(&sort_key(b, now)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::goal::GoalType;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn goal_with_deadline_and_progress(days_from_now: i64, progress: Decimal) -> Goal {
        let now = Utc::now();
        let mut g = Goal::new(
            Uuid::new_v4(),
            "Vacation",
            dec!(1000.00),
            Some(now + chrono::Duration::days(days_from_now)),
            GoalType::Savings,
        );
        g.saved = g.target * progress;
        g
    }

    #[test]
    fn overdue_deadline_classifies_as_overdue() {
        let g = goal_with_deadline_and_progress(-1, dec!(0.10));
        assert_eq!(classify(&g, Utc::now()), Urgency::Overdue);
    }

    #[test]
    fn moderate_window_upgraded_to_urgent_on_low_progress() {
        // 45 days out, <30 threshold for base "urgent" but within the <=60
        // upgrade window with progress < 50%.
        let g = goal_with_deadline_and_progress(45, dec!(0.20));
        assert_eq!(classify(&g, Utc::now()), Urgency::Urgent);
    }

    #[test]
    fn moderate_window_not_upgraded_when_progress_is_high() {
        let g = goal_with_deadline_and_progress(45, dec!(0.80));
        assert_eq!(classify(&g, Utc::now()), Urgency::Moderate);
    }

    #[test]
    fn no_deadline_classifies_as_low() {
        let g = Goal::new(Uuid::new_v4(), "Fund", dec!(1000.00), None, GoalType::Emergency);
        assert_eq!(classify(&g, Utc::now()), Urgency::Low);
    }
}
