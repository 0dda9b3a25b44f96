//! Deterministic formula fallback (spec §4.4 "When the advisor is
//! unavailable"). Used whenever the LLM-backed advisor fails, times out, or
//! is in its post-quota-error cooldown — produces the same shape of
//! [`AllocationPlan`] the real advisor would, just without any reasoning
//! beyond restating the fixed split.
//!
//! The 10/15/15 split: 10% emergency (if an emergency goal is active), 15%
//! to the single most urgent regular goal, 15% spread across the rest —
//! mirroring the teacher's own layered fallback in `policy::fifo` (a
//! formula policy sitting underneath the smarter tree-based ones).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::allocation::urgency::sort_by_urgency;
use crate::core::money::percent_of;
use crate::models::goal::Goal;
use crate::policy::types::{AllocationPlan, GoalAllocation};

/// Build a deterministic plan from the goal set alone, with no external
/// call. `income_amount` is used only to populate the plan's `amount`
/// fields for audit logging — the Allocation Engine recomputes its own
/// shares from `percent` values, not from these amounts.
pub fn formula_fallback(income_amount: Decimal, goals: &[Goal], now: DateTime<Utc>) -> AllocationPlan {
    let has_emergency = goals
        .iter()
        .any(|g| !g.is_completed && g.kind.is_emergency());
    let emergency_pct = if has_emergency { dec!(10.0) } else { Decimal::ZERO };

    let mut regular: Vec<Goal> = goals
        .iter()
        .filter(|g| !g.is_completed && !g.kind.is_emergency())
        .cloned()
        .collect();
    sort_by_urgency(&mut regular, now);

    let regular_pct_total = dec!(40.0) - emergency_pct;
    let mut goal_allocations = Vec::new();

    if !regular.is_empty() {
        let top_share = if regular.len() == 1 {
            regular_pct_total
        } else {
            regular_pct_total * dec!(0.5)
        };
        let rest_share = regular_pct_total - top_share;
        let rest_count = (regular.len() - 1).max(1);
        let per_rest = rest_share / Decimal::from(rest_count as i64);

        for (i, g) in regular.iter().enumerate() {
            let pct = if i == 0 { top_share } else { per_rest };
            goal_allocations.push(GoalAllocation {
                goal_id: g.id.to_string(),
                percent: pct,
                amount: percent_of(income_amount, pct),
            });
        }
    }

    AllocationPlan {
        emergency_fund_percent: emergency_pct,
        emergency_fund_amount: percent_of(income_amount, emergency_pct),
        goal_allocations,
        total_allocation_percent: dec!(40.0),
        spending_percent: dec!(40.0),
        investment_percent: dec!(20.0),
        reasoning: "formula fallback: advisor unavailable, used fixed urgency-weighted split"
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::goal::GoalType;
    use uuid::Uuid;

    fn goal(kind: GoalType, target: Decimal) -> Goal {
        Goal::new(Uuid::new_v4(), "Goal", target, None, kind)
    }

    #[test]
    fn no_goals_yields_empty_allocations() {
        let plan = formula_fallback(dec!(1000.00), &[], Utc::now());
        assert!(plan.goal_allocations.is_empty());
        assert_eq!(plan.emergency_fund_percent, Decimal::ZERO);
    }

    #[test]
    fn single_regular_goal_takes_full_regular_share() {
        let goals = vec![goal(GoalType::Savings, dec!(5000.00))];
        let plan = formula_fallback(dec!(1000.00), &goals, Utc::now());
        assert_eq!(plan.goal_allocations.len(), 1);
        assert_eq!(plan.goal_allocations[0].percent, dec!(40.0));
    }

    #[test]
    fn emergency_goal_reserves_ten_percent() {
        let goals = vec![
            goal(GoalType::Emergency, dec!(10000.00)),
            goal(GoalType::Savings, dec!(5000.00)),
        ];
        let plan = formula_fallback(dec!(1000.00), &goals, Utc::now());
        assert_eq!(plan.emergency_fund_percent, dec!(10.0));
        assert_eq!(plan.goal_allocations[0].percent, dec!(30.0));
    }
}
