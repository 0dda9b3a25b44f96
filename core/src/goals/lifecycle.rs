//! Goal Lifecycle Controller (spec §4.3)
//!
//! Bootstraps a user's starting goal set from their income history,
//! optionally refines the bootstrap with an LLM-proposed target within fixed
//! bounds, adaptively resizes existing goals as income changes, and reacts
//! to goals reaching their terminal (completed) state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::money::round_money;
use crate::models::goal::{is_one_time_goal_name, is_recurring_goal_name, Goal, GoalType};
use crate::policy::{GoalTargetContext, PolicyAdvisor};

const FALLBACK_MONTHLY_INCOME: Decimal = dec!(30000.00);
const MIN_EMERGENCY_TARGET: Decimal = dec!(10000.00);
const MIN_SAVINGS_GOAL_1_TARGET: Decimal = dec!(5000.00);
const MIN_SAVINGS_GOAL_2_TARGET: Decimal = dec!(3000.00);
const RESIZE_DEVIATION_THRESHOLD: Decimal = dec!(0.20);
const RECURRING_BUMP_FACTOR: Decimal = dec!(1.25);

/// Estimate average monthly income (spec §4.3 "bootstrap"): the mean of
/// up to the last three months of observed income if any is available,
/// else `30 × triggering_amount`, else a flat fallback.
pub fn estimate_avg_monthly_income(
    last_three_months_income: &[Decimal],
    triggering_amount: Decimal,
) -> Decimal {
    if !last_three_months_income.is_empty() {
        let sum: Decimal = last_three_months_income.iter().sum();
        return round_money(sum / Decimal::from(last_three_months_income.len() as i64));
    }
    if triggering_amount > Decimal::ZERO {
        return round_money(triggering_amount * Decimal::from(30));
    }
    FALLBACK_MONTHLY_INCOME
}

pub fn estimate_avg_monthly_expenses(avg_monthly_income: Decimal) -> Decimal {
    round_money(avg_monthly_income * dec!(0.7))
}

/// Bootstrap the standard three-goal starting set for a new user (spec
/// §4.3). Deadlines are IST-midnight-anchored by the caller when persisting;
/// here they're plain UTC offsets from `now`.
pub fn bootstrap_goals(user_id: Uuid, avg_monthly_income: Decimal, now: DateTime<Utc>) -> Vec<Goal> {
    let avg_monthly_expenses = estimate_avg_monthly_expenses(avg_monthly_income);

    let emergency_target = MIN_EMERGENCY_TARGET.max(round_money(avg_monthly_expenses * dec!(4.5)));
    let savings_1_target =
        MIN_SAVINGS_GOAL_1_TARGET.max(round_money(avg_monthly_income * dec!(2.0)));
    let savings_2_target =
        MIN_SAVINGS_GOAL_2_TARGET.max(round_money(avg_monthly_income * dec!(1.5)));

    vec![
        Goal::new(user_id, "Emergency Fund", emergency_target, None, GoalType::Emergency),
        Goal::new(
            user_id,
            "Savings Goal 1",
            savings_1_target,
            Some(now + chrono::Duration::days(180)),
            GoalType::Savings,
        ),
        Goal::new(
            user_id,
            "Savings Goal 2",
            savings_2_target,
            Some(now + chrono::Duration::days(120)),
            GoalType::Savings,
        ),
    ]
}

/// Clamp an LLM-proposed emergency fund target to spec §4.3's bounds:
/// `[10000, 12 * avg_monthly_expenses]`.
pub fn clamp_emergency_recommendation(proposed: Decimal, avg_monthly_expenses: Decimal) -> Decimal {
    let upper = round_money(avg_monthly_expenses * Decimal::from(12));
    proposed.max(MIN_EMERGENCY_TARGET).min(upper.max(MIN_EMERGENCY_TARGET))
}

/// Clamp an LLM-proposed savings-goal target to spec §4.3's bounds:
/// `[min_target, 6 * avg_monthly_income]`.
pub fn clamp_savings_recommendation(
    proposed: Decimal,
    min_target: Decimal,
    avg_monthly_income: Decimal,
) -> Decimal {
    let upper = round_money(avg_monthly_income * Decimal::from(6));
    proposed.max(min_target).min(upper.max(min_target))
}

/// Ask the Policy Advisor to refine the three formula-computed bootstrap
/// targets (spec §4.3 "Optional LLM refinement of bootstrap targets"),
/// clamping whatever it returns to the fixed bounds. Any advisor failure
/// (timeout, quota, unparsable response) falls back to the formula targets
/// unchanged — refinement is optional, bootstrap is not allowed to block on
/// it.
pub async fn refine_bootstrap_targets(
    advisor: &dyn PolicyAdvisor,
    user_id: Uuid,
    avg_monthly_income: Decimal,
    avg_monthly_expenses: Decimal,
    formula_emergency_target: Decimal,
    formula_savings_goal_1_target: Decimal,
    formula_savings_goal_2_target: Decimal,
) -> (Decimal, Decimal, Decimal) {
    let ctx = GoalTargetContext {
        user_id,
        avg_monthly_income,
        avg_monthly_expenses,
        formula_emergency_target,
        formula_savings_goal_1_target,
        formula_savings_goal_2_target,
    };

    match advisor.refine_goal_targets(&ctx).await {
        Ok(recommendation) => (
            clamp_emergency_recommendation(recommendation.emergency_fund_target, avg_monthly_expenses),
            clamp_savings_recommendation(
                recommendation.savings_goal_1_target,
                MIN_SAVINGS_GOAL_1_TARGET,
                avg_monthly_income,
            ),
            clamp_savings_recommendation(
                recommendation.savings_goal_2_target,
                MIN_SAVINGS_GOAL_2_TARGET,
                avg_monthly_income,
            ),
        ),
        Err(err) => {
            warn!(%user_id, error = %err, "goal target refinement failed, falling back to formula targets");
            (
                formula_emergency_target,
                formula_savings_goal_1_target,
                formula_savings_goal_2_target,
            )
        }
    }
}

/// Adaptive resize (spec §4.3): a completed goal is never resized. A
/// zero-target goal is always replaced by the recommendation. Otherwise the
/// target is updated only when it deviates from the recommendation by more
/// than 20%.
pub fn maybe_resize(goal: &mut Goal, recommended_target: Decimal) -> bool {
    if goal.is_completed {
        return false;
    }
    if goal.target <= Decimal::ZERO {
        goal.target = recommended_target;
        return true;
    }
    let deviation = (goal.target - recommended_target).abs() / goal.target;
    if deviation > RESIZE_DEVIATION_THRESHOLD {
        info!(goal_id = %goal.id, old_target = %goal.target, new_target = %recommended_target, "resizing goal");
        goal.target = recommended_target;
        true
    } else {
        false
    }
}

/// Outcome of reacting to one completed goal (spec §4.3 "terminal-state
/// reactions"). `None` when the goal's name matches neither pattern and no
/// reaction is defined.
pub enum TerminalReaction {
    /// Recurring goal (e.g. "Emergency Fund"): bump target by 1.25x and
    /// un-complete it so it keeps accruing.
    RecurringBump { new_target: Decimal },
    /// One-time goal (e.g. "Buy a Laptop"): create a successor goal with the
    /// same target, a fresh deadline, and no progress.
    Successor(Goal),
}

/// React to a single goal reaching `is_completed = true` (spec §4.3).
/// Recurring names are checked before one-time names, since some names
/// (e.g. "Wedding Fund") match both patterns. `recent_income` is the
/// successor-goal sizing signal for one-time goals; a successor is only
/// created when it's significant relative to the completed goal's target
/// (`recent_income > 0.5 * goal.target`) — otherwise there isn't enough
/// fresh income to justify starting a new goal immediately.
pub fn react_to_completion(goal: &Goal, recent_income: Decimal, now: DateTime<Utc>) -> Option<TerminalReaction> {
    if !goal.is_completed {
        return None;
    }
    if is_recurring_goal_name(&goal.name) {
        return Some(TerminalReaction::RecurringBump {
            new_target: round_money(goal.target * RECURRING_BUMP_FACTOR),
        });
    }
    if is_one_time_goal_name(&goal.name) && recent_income > goal.target * dec!(0.5) {
        let successor = Goal::new(
            goal.user_id,
            goal.name.clone(),
            round_money(recent_income * dec!(0.3)),
            Some(now + chrono::Duration::days(180)),
            goal.kind.clone(),
        );
        return Some(TerminalReaction::Successor(successor));
    }
    None
}

/// Apply a [`TerminalReaction::RecurringBump`] in place.
pub fn apply_recurring_bump(goal: &mut Goal, new_target: Decimal) {
    goal.target = new_target;
    goal.is_completed = false;
}

/// When a user has no active goals left and continues to earn, spec §4.3
/// calls for a generic catch-all so income never has nowhere to go. Target
/// is `0.4 * recent_income`, not the bootstrap formula — this goal is sized
/// off what just came in, not a long-run income average.
pub fn fallback_general_goal(user_id: Uuid, recent_income: Decimal) -> Goal {
    warn!(%user_id, "no active goals remain, creating general savings goal");
    Goal::new(
        user_id,
        "General Savings Goal",
        round_money(recent_income * dec!(0.4)),
        None,
        GoalType::Savings,
    )
}
