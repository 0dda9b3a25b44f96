//! Integration tests for the formula policy fallback (spec §4.4)

use chrono::Utc;
use income_allocator_core::models::goal::{Goal, GoalType};
use income_allocator_core::policy::formula::formula_fallback;
use income_allocator_core::policy::{FormulaAdvisor, PolicyAdvisor, PolicyContext};
use rust_decimal_macros::dec;
use uuid::Uuid;

#[test]
fn plan_always_totals_forty_percent_savings_forty_spending_twenty_investment() {
    let goals = vec![Goal::new(Uuid::new_v4(), "Vacation", dec!(5000.00), None, GoalType::Savings)];
    let plan = formula_fallback(dec!(1000.00), &goals, Utc::now());

    assert_eq!(plan.total_allocation_percent, dec!(40.0));
    assert_eq!(plan.spending_percent, dec!(40.0));
    assert_eq!(plan.investment_percent, dec!(20.0));
}

#[tokio::test]
async fn formula_advisor_never_errors() {
    let user_id = Uuid::new_v4();
    let goals = vec![Goal::new(user_id, "Vacation", dec!(5000.00), None, GoalType::Savings)];
    let ctx = PolicyContext {
        user_id,
        income_amount: dec!(1000.00),
        active_goals: &goals,
        now: Utc::now(),
    };

    let plan = FormulaAdvisor.propose_plan(&ctx).await.unwrap();
    assert_eq!(plan.goal_allocations.len(), 1);
}
