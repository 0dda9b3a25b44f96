//! Allocation Engine (spec §4.2)
//!
//! Given a set of new income credits and the user's current goal set,
//! decides how much flows to which goal and applies balance changes under
//! the uniqueness invariant "every transaction id appears in exactly one
//! successful allocation batch, ever." Mirrors the teacher's
//! `settlement::rtgs::try_settle` — atomic debit/credit logic with a focused
//! `thiserror` enum — except the "atomicity" here is a property the caller
//! gets by applying this module's output inside one database transaction
//! (see `repository::connections::apply_allocation`), since this module
//! itself has no I/O (spec §9: "the engine itself is then a short
//! composition").

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::core::money::{percent_of, round_money};
use crate::models::goal::{Goal, GoalError};
use crate::policy::types::AllocationPlan;

/// One new income transaction eligible for allocation (spec §4.2).
#[derive(Debug, Clone)]
pub struct IncomeCredit {
    pub id: String,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    pub description: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum AllocationError {
    /// No-op: transaction ids are NOT marked allocated, so a later Allocate
    /// after goal creation can still consume them (spec §4.2).
    #[error("no active goals to allocate to")]
    NoActiveGoals,

    #[error("empty income set")]
    EmptyIncomeSet,
}

/// Per-goal application result.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalApplication {
    pub goal_id: Uuid,
    pub amount_applied: Decimal,
    pub newly_completed: bool,
}

/// Outcome of one `Allocate` call (spec §4.2).
#[derive(Debug, Clone)]
pub struct AllocationReport {
    /// Ids that were actually consumed — callers persist these into
    /// `allocated_transaction_ids` in the same transaction as `applications`.
    pub consumed_transaction_ids: Vec<String>,
    pub applications: Vec<GoalApplication>,
    pub total_allocated: Decimal,
    pub reasoning: String,
}

/// Idempotency recheck (spec §4.2, §8 invariant 6): drop any income id
/// already present in `already_allocated`, regardless of what the caller's
/// eligibility filter upstream already did. This is the single source of
/// truth the re-architecting note in spec §9 calls for — every other check
/// is a defense-in-depth layer, not a duplicate of this one.
pub fn filter_unconsumed(
    already_allocated: &BTreeSet<String>,
    income: Vec<IncomeCredit>,
) -> Vec<IncomeCredit> {
    income
        .into_iter()
        .filter(|c| !already_allocated.contains(&c.id))
        .filter(|c| c.amount > Decimal::ZERO)
        .collect()
}

/// Match an advisor-proposed goal id to an actual regular goal (spec §4.2
/// "Matching advisor output to goals"). Falls back through exact match,
/// unique 8-char prefix match, then position, logging a warning at every
/// fallback step.
fn match_goal_id(proposed_id: &str, regular: &[&Goal], position: usize) -> Option<Uuid> {
    if let Some(g) = regular.iter().find(|g| g.id.to_string() == proposed_id) {
        return Some(g.id);
    }

    warn!(proposed_id, "advisor goal id did not match exactly, trying prefix match");
    let prefix_len = proposed_id.len().min(8);
    let prefix = &proposed_id[..prefix_len];
    let prefix_matches: Vec<&&Goal> = regular
        .iter()
        .filter(|g| g.id.to_string().starts_with(prefix))
        .collect();
    if prefix_matches.len() == 1 {
        return Some(prefix_matches[0].id);
    }

    warn!(proposed_id, position, "advisor goal id prefix ambiguous or absent, falling back to position");
    regular.get(position).map(|g| g.id)
}

/// Policy resolution (spec §4.2, ordered): partition active goals into the
/// canonical emergency goal and regular goals, enforce the fixed 40%
/// envelope (10% emergency if active, remainder split across regular goals
/// weighted by the plan's proposed shares), and clamp per goal.
///
/// Returns `(goal_id, amount)` pairs, pre-clamping — [`apply_plan`] performs
/// the actual capacity clamp via [`Goal::apply_allocation`].
pub fn resolve_shares(
    goals: &[Goal],
    income_total: Decimal,
    plan: &AllocationPlan,
    now: DateTime<Utc>,
) -> Vec<(Uuid, Decimal)> {
    let active: Vec<&Goal> = goals.iter().filter(|g| !g.is_completed).collect();

    let mut emergency_candidates: Vec<&Goal> =
        active.iter().copied().filter(|g| g.kind.is_emergency()).collect();
    emergency_candidates.sort_by_key(|g| g.created_at);
    let canonical_emergency = emergency_candidates.first().copied();

    let canonical_id = canonical_emergency.map(|g| g.id);
    let mut regular: Vec<&Goal> = active
        .iter()
        .copied()
        .filter(|g| Some(g.id) != canonical_id)
        .collect();
    sort_by_urgency_refs(&mut regular, now);

    let emergency_pct = if canonical_emergency.is_some() {
        Decimal::from(10)
    } else {
        Decimal::ZERO
    };
    let regular_pct_total = Decimal::from(40) - emergency_pct;

    let mut out = Vec::new();
    if let Some(eg) = canonical_emergency {
        out.push((eg.id, percent_of(income_total, emergency_pct)));
    }

    if regular.is_empty() || regular_pct_total <= Decimal::ZERO {
        return out;
    }

    // Relative weights: use the advisor/formula plan's proposed percentages
    // among regular goals where they match a goal, equal weight otherwise.
    let mut weights: Vec<Decimal> = Vec::with_capacity(regular.len());
    for (i, g) in regular.iter().enumerate() {
        let proposed = plan
            .goal_allocations
            .iter()
            .enumerate()
            .find_map(|(pos, a)| {
                if pos == i {
                    match_goal_id(&a.goal_id, &regular, pos).filter(|id| id == &g.id)?;
                    Some(a.percent)
                } else {
                    None
                }
            })
            .unwrap_or(Decimal::ONE);
        weights.push(proposed.max(Decimal::ZERO));
    }
    let weight_sum: Decimal = weights.iter().sum();
    let weight_sum = if weight_sum <= Decimal::ZERO {
        Decimal::from(regular.len() as i64)
    } else {
        weight_sum
    };

    for (g, w) in regular.iter().zip(weights.iter()) {
        let share_pct = regular_pct_total * (*w / weight_sum);
        out.push((g.id, percent_of(income_total, share_pct)));
    }

    out
}

fn sort_by_urgency_refs(goals: &mut [&Goal], now: DateTime<Utc>) {
    goals.sort_by_key(|g| crate::allocation::urgency::sort_key(g, now));
}

/// Apply a resolved share list to the in-memory goal set, clamping each
/// allocation at the goal's remaining capacity (spec §4.2 "Per-goal
/// clamping") and skipping zero-target goals without inflating them.
pub fn apply_shares(goals: &mut [Goal], shares: &[(Uuid, Decimal)]) -> (Vec<GoalApplication>, Decimal) {
    let mut applications = Vec::new();
    let mut total = Decimal::ZERO;

    for (goal_id, amount) in shares {
        if *amount <= Decimal::ZERO {
            continue;
        }
        if let Some(goal) = goals.iter_mut().find(|g| g.id == *goal_id) {
            match goal.apply_allocation(*amount) {
                Ok(applied) => {
                    total += applied;
                    applications.push(GoalApplication {
                        goal_id: goal.id,
                        amount_applied: applied,
                        newly_completed: goal.is_completed,
                    });
                }
                Err(GoalError::ZeroTarget(id)) => {
                    warn!(goal_id = %id, "skipping allocation to zero-target goal, lifecycle controller must resize first");
                }
                Err(GoalError::AlreadyCompleted(id)) => {
                    warn!(goal_id = %id, "skipping allocation to already-completed goal");
                }
                Err(GoalError::NonPositiveAllocation(_)) => unreachable!("filtered above"),
            }
        }
    }

    (applications, round_money(total))
}

/// Top-level `Allocate` composition (spec §4.2 public contract).
///
/// `already_allocated` is the connection's (or manual-income ledger's)
/// current `allocated_transaction_ids` set; `goals` is the user's full goal
/// set (both active and completed — completed goals are filtered out
/// internally). The caller is responsible for persisting
/// `consumed_transaction_ids` into the id set and `applications` into goal
/// rows inside one database transaction.
pub fn allocate(
    goals: &mut [Goal],
    already_allocated: &BTreeSet<String>,
    income: Vec<IncomeCredit>,
    plan: &AllocationPlan,
    now: DateTime<Utc>,
) -> Result<AllocationReport, AllocationError> {
    if income.is_empty() {
        return Err(AllocationError::EmptyIncomeSet);
    }

    let unconsumed = filter_unconsumed(already_allocated, income);
    if unconsumed.is_empty() {
        return Ok(AllocationReport {
            consumed_transaction_ids: Vec::new(),
            applications: Vec::new(),
            total_allocated: Decimal::ZERO,
            reasoning: "all transactions already allocated".to_string(),
        });
    }

    let active_exists = goals.iter().any(|g| !g.is_completed);
    if !active_exists {
        return Err(AllocationError::NoActiveGoals);
    }

    let income_total: Decimal = unconsumed.iter().map(|c| c.amount).sum();
    let shares = resolve_shares(goals, income_total, plan, now);
    let (applications, total_allocated) = apply_shares(goals, &shares);

    // Sum of allocations ≤ sum(incomeSet.amount) is a structural property of
    // `resolve_shares` (it never allocates more than the 40% envelope of
    // `income_total`), asserted here as a last-line invariant check.
    debug_assert!(total_allocated <= income_total);

    let consumed_transaction_ids: Vec<String> =
        unconsumed.iter().map(|c| c.id.clone()).collect();
    let consumed_ids_set: HashSet<&str> =
        consumed_transaction_ids.iter().map(String::as_str).collect();
    debug_assert_eq!(consumed_ids_set.len(), consumed_transaction_ids.len());

    Ok(AllocationReport {
        consumed_transaction_ids,
        applications,
        total_allocated,
        reasoning: plan.reasoning.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::goal::GoalType;
    use crate::policy::formula::formula_fallback;
    use rust_decimal_macros::dec;

    fn credit(id: &str, amount: Decimal) -> IncomeCredit {
        IncomeCredit {
            id: id.to_string(),
            amount,
            timestamp: Utc::now(),
            description: "salary".to_string(),
        }
    }

    fn goal(name: &str, target: Decimal, kind: GoalType) -> Goal {
        Goal::new(Uuid::new_v4(), name, target, None, kind)
    }

    #[test]
    fn no_active_goals_leaves_ids_unconsumed() {
        let mut goals: Vec<Goal> = Vec::new();
        let already = BTreeSet::new();
        let plan = formula_fallback(dec!(10000.00), &goals, Utc::now());
        let err = allocate(&mut goals, &already, vec![credit("txn_1", dec!(10000.00))], &plan, Utc::now())
            .unwrap_err();
        assert_eq!(err, AllocationError::NoActiveGoals);
    }

    #[test]
    fn allocate_is_idempotent_on_replay() {
        let mut goals = vec![goal("Emergency Fund", dec!(1_000_000.00), GoalType::Emergency)];
        let already = BTreeSet::new();
        let plan = formula_fallback(dec!(10000.00), &goals, Utc::now());

        let income = vec![credit("txn_1", dec!(10000.00))];
        let first = allocate(&mut goals, &already, income.clone(), &plan, Utc::now()).unwrap();
        assert_eq!(first.consumed_transaction_ids, vec!["txn_1".to_string()]);

        let mut already = BTreeSet::new();
        already.extend(first.consumed_transaction_ids.iter().cloned());
        let second = allocate(&mut goals, &already, income, &plan, Utc::now()).unwrap();
        assert!(second.consumed_transaction_ids.is_empty());
        assert_eq!(second.total_allocated, Decimal::ZERO);
    }

    #[test]
    fn goal_completion_clamps_and_flips_flag() {
        let mut goal_vacation = goal("Vacation", dec!(5000.00), GoalType::Savings);
        goal_vacation.saved = dec!(4800.00);
        let mut goals = vec![goal_vacation];
        let already = BTreeSet::new();
        let plan = formula_fallback(dec!(5000.00), &goals, Utc::now());

        // Force the whole 40% envelope onto this single regular goal by
        // giving it the only share (no emergency goal present -> 40% to regular).
        let report = allocate(
            &mut goals,
            &already,
            vec![credit("txn_1", dec!(500.00))],
            &plan,
            Utc::now(),
        )
        .unwrap();

        assert_eq!(goals[0].saved, dec!(4800.00) + report.applications[0].amount_applied);
        assert!(goals[0].saved <= dec!(5000.00));
    }

    #[test]
    fn zero_target_goal_is_skipped_without_inflating() {
        let mut g1 = goal("Broken Goal", dec!(0.00), GoalType::Savings);
        g1.target = dec!(0.00);
        let mut goals = vec![g1];
        let already = BTreeSet::new();
        let plan = formula_fallback(dec!(1000.00), &goals, Utc::now());

        let report = allocate(&mut goals, &already, vec![credit("txn_1", dec!(1000.00))], &plan, Utc::now())
            .unwrap();
        assert!(report.applications.is_empty());
        assert_eq!(goals[0].saved, Decimal::ZERO);
    }

    #[test]
    fn sum_allocated_never_exceeds_income() {
        let mut goals = vec![
            goal("Emergency Fund", dec!(1_000_000.00), GoalType::Emergency),
            goal("Savings Goal 1", dec!(1_000_000.00), GoalType::Savings),
            goal("Savings Goal 2", dec!(1_000_000.00), GoalType::Savings),
        ];
        let already = BTreeSet::new();
        let plan = formula_fallback(dec!(10000.00), &goals, Utc::now());
        let report = allocate(&mut goals, &already, vec![credit("txn_1", dec!(10000.00))], &plan, Utc::now())
            .unwrap();
        assert!(report.total_allocated <= dec!(10000.00));
    }
}
