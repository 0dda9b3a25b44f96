//! Shared types between the formula fallback and the LLM-backed advisor
//! (spec §4.4).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::goal::Goal;

/// One regular goal's proposed share of the allocation (spec §4.4).
/// `goal_id` is opaque from the advisor's perspective — see
/// `allocation::engine::match_goal_id` for how the engine reconciles it
/// against real goal ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalAllocation {
    pub goal_id: String,
    pub percent: Decimal,
    pub amount: Decimal,
}

/// A fully-specified allocation proposal (spec §4.4). The 40/40/20 envelope
/// is always enforced downstream in `allocation::engine::resolve_shares`
/// regardless of what a plan proposes here — `total_allocation_percent`,
/// `spending_percent`, and `investment_percent` are carried through for
/// reasoning/audit purposes only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationPlan {
    pub emergency_fund_percent: Decimal,
    pub emergency_fund_amount: Decimal,
    pub goal_allocations: Vec<GoalAllocation>,
    pub total_allocation_percent: Decimal,
    pub spending_percent: Decimal,
    pub investment_percent: Decimal,
    pub reasoning: String,
}

/// Everything a [`crate::policy::PolicyAdvisor`] needs to produce a plan.
#[derive(Debug, Clone)]
pub struct PolicyContext<'a> {
    pub user_id: uuid::Uuid,
    pub income_amount: Decimal,
    pub active_goals: &'a [Goal],
    pub now: DateTime<Utc>,
}

/// Everything a [`crate::policy::PolicyAdvisor`] needs to refine the Goal
/// Lifecycle Controller's bootstrap targets (spec §4.3 "Optional LLM
/// refinement of bootstrap targets"). The formula targets are passed in so
/// the advisor can be asked to adjust them rather than invent targets from
/// nothing.
#[derive(Debug, Clone)]
pub struct GoalTargetContext {
    pub user_id: uuid::Uuid,
    pub avg_monthly_income: Decimal,
    pub avg_monthly_expenses: Decimal,
    pub formula_emergency_target: Decimal,
    pub formula_savings_goal_1_target: Decimal,
    pub formula_savings_goal_2_target: Decimal,
}

/// The advisor's refined bootstrap targets, still subject to
/// `goals::lifecycle::clamp_emergency_recommendation` /
/// `clamp_savings_recommendation` before use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalTargetRecommendation {
    pub emergency_fund_target: Decimal,
    pub savings_goal_1_target: Decimal,
    pub savings_goal_2_target: Decimal,
}
