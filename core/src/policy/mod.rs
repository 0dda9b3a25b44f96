//! Policy Advisor (spec §4.4)
//!
//! An LLM-backed advisor that proposes how a new income credit should be
//! split across the user's active goals, with a deterministic fallback when
//! the advisor is unreachable. The Allocation Engine always re-enforces the
//! fixed 40/40/20 envelope over whatever a plan proposes — this module only
//! decides the *relative* weighting within the 40% savings allocation.

pub mod formula;
pub mod llm;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use types::{AllocationPlan, GoalAllocation, GoalTargetContext, GoalTargetRecommendation, PolicyContext};

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("policy advisor request timed out")]
    Timeout,
    #[error("policy advisor quota exhausted")]
    QuotaExhausted,
    #[error("policy advisor returned an unusable response: {0}")]
    BadResponse(String),
    #[error("policy advisor transport error: {0}")]
    Transport(String),
}

/// Trait boundary over "ask something for an allocation plan" (spec §4.4),
/// shaped after the teacher's policy trait object injected into the
/// orchestrator — swappable per environment (LLM in production, formula
/// fallback in tests and outages).
#[async_trait]
pub trait PolicyAdvisor: Send + Sync {
    async fn propose_plan(&self, ctx: &PolicyContext<'_>) -> Result<AllocationPlan, PolicyError>;

    /// Refine the Goal Lifecycle Controller's formula-computed bootstrap
    /// targets (spec §4.3). The caller still clamps the result with
    /// `goals::lifecycle::clamp_emergency_recommendation` /
    /// `clamp_savings_recommendation` before applying it.
    async fn refine_goal_targets(
        &self,
        ctx: &GoalTargetContext,
    ) -> Result<GoalTargetRecommendation, PolicyError>;
}

/// Advisor that always falls back to the deterministic formula — used in
/// tests and as the last resort the dispatcher reaches for when the LLM
/// advisor errors (spec §4.4 "any failure ⇒ fall back, never block
/// allocation").
pub struct FormulaAdvisor;

#[async_trait]
impl PolicyAdvisor for FormulaAdvisor {
    async fn propose_plan(&self, ctx: &PolicyContext<'_>) -> Result<AllocationPlan, PolicyError> {
        Ok(formula::formula_fallback(ctx.income_amount, ctx.active_goals, ctx.now))
    }

    async fn refine_goal_targets(
        &self,
        ctx: &GoalTargetContext,
    ) -> Result<GoalTargetRecommendation, PolicyError> {
        Ok(GoalTargetRecommendation {
            emergency_fund_target: ctx.formula_emergency_target,
            savings_goal_1_target: ctx.formula_savings_goal_1_target,
            savings_goal_2_target: ctx.formula_savings_goal_2_target,
        })
    }
}
