//! Monthly budget warning evaluator (spec §4.3 supplement)
//!
//! Pure threshold check against a user's declared `monthly_budget`: crossing
//! 90% of budget for the month triggers a warning email, crossing 100%
//! triggers an exceeded email. Neither threshold fires twice for the same
//! month in the same direction — the caller is expected to track
//! "already warned this month" state itself (e.g. alongside the ledger),
//! this function only classifies a given spend total.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    WithinBudget,
    ApproachingLimit,
    Exceeded,
}

/// Classify `spent_this_month` against `monthly_budget` (spec thresholds:
/// 90% and 100%). A non-positive budget is treated as "no budget set" and
/// never warns.
pub fn evaluate(spent_this_month: Decimal, monthly_budget: Decimal) -> BudgetStatus {
    if monthly_budget <= Decimal::ZERO {
        return BudgetStatus::WithinBudget;
    }
    let ratio = spent_this_month / monthly_budget;
    if ratio >= Decimal::ONE {
        BudgetStatus::Exceeded
    } else if ratio >= dec!(0.90) {
        BudgetStatus::ApproachingLimit
    } else {
        BudgetStatus::WithinBudget
    }
}
