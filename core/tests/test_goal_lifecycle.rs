//! Integration tests for the Goal Lifecycle Controller (spec §4.3)

use chrono::Utc;
use income_allocator_core::goals::{
    bootstrap_goals, clamp_emergency_recommendation, clamp_savings_recommendation,
    estimate_avg_monthly_income, fallback_general_goal, maybe_resize, react_to_completion,
    refine_bootstrap_targets, TerminalReaction,
};
use income_allocator_core::models::goal::GoalType;
use income_allocator_core::policy::FormulaAdvisor;
use rust_decimal_macros::dec;
use uuid::Uuid;

#[test]
fn bootstrap_produces_emergency_and_two_savings_goals() {
    let user_id = Uuid::new_v4();
    let income = estimate_avg_monthly_income(
        &[dec!(40000.00), dec!(50000.00), dec!(60000.00)],
        rust_decimal::Decimal::ZERO,
    );
    let goals = bootstrap_goals(user_id, income, Utc::now());

    assert_eq!(goals.len(), 3);
    assert!(goals[0].kind.is_emergency());
    assert_eq!(goals[0].target, dec!(157500.00)); // 4.5 * (0.7 * 50000)
    assert_eq!(goals[1].target, dec!(100000.00)); // 2 * 50000
    assert_eq!(goals[2].target, dec!(75000.00)); // 1.5 * 50000
}

#[test]
fn emergency_recommendation_is_clamped_to_spec_bounds() {
    let avg_expenses = dec!(20000.00);
    assert_eq!(clamp_emergency_recommendation(dec!(1000.00), avg_expenses), dec!(10000.00));
    assert_eq!(
        clamp_emergency_recommendation(dec!(10_000_000.00), avg_expenses),
        dec!(240000.00)
    );
}

#[test]
fn savings_recommendation_is_clamped_to_spec_bounds() {
    let income = dec!(30000.00);
    assert_eq!(clamp_savings_recommendation(dec!(100.00), dec!(5000.00), income), dec!(5000.00));
    assert_eq!(
        clamp_savings_recommendation(dec!(10_000_000.00), dec!(5000.00), income),
        dec!(180000.00)
    );
}

#[test]
fn resize_only_triggers_past_twenty_percent_deviation() {
    let mut g = income_allocator_core::models::goal::Goal::new(
        Uuid::new_v4(),
        "Savings Goal 1",
        dec!(10000.00),
        None,
        GoalType::Savings,
    );
    assert!(!maybe_resize(&mut g, dec!(11000.00)));
    assert!(maybe_resize(&mut g, dec!(13000.00)));
    assert_eq!(g.target, dec!(13000.00));
}

#[test]
fn completed_recurring_goal_bumps_and_one_time_goal_spawns_successor() {
    let mut recurring = income_allocator_core::models::goal::Goal::new(
        Uuid::new_v4(),
        "Monthly Buffer",
        dec!(10000.00),
        None,
        GoalType::Savings,
    );
    recurring.saved = dec!(10000.00);
    recurring.is_completed = true;
    match react_to_completion(&recurring, dec!(0.00), Utc::now()) {
        Some(TerminalReaction::RecurringBump { new_target }) => assert_eq!(new_target, dec!(12500.00)),
        _ => panic!("expected recurring bump"),
    }

    let mut one_time = income_allocator_core::models::goal::Goal::new(
        Uuid::new_v4(),
        "New Phone",
        dec!(30000.00),
        None,
        GoalType::Savings,
    );
    one_time.saved = dec!(30000.00);
    one_time.is_completed = true;
    match react_to_completion(&one_time, dec!(25000.00), Utc::now()) {
        Some(TerminalReaction::Successor(successor)) => {
            assert_eq!(successor.target, dec!(7500.00)); // 0.3 * 25000
            assert!(!successor.is_completed);
        }
        _ => panic!("expected successor"),
    }
}

#[test]
fn zero_active_goals_with_positive_income_yields_general_savings_goal() {
    let goal = fallback_general_goal(Uuid::new_v4(), dec!(20000.00));
    assert_eq!(goal.name, "General Savings Goal");
    assert_eq!(goal.target, dec!(8000.00)); // 0.4 * 20000
}

#[tokio::test]
async fn formula_advisor_echoes_formula_targets_back_unchanged() {
    let (emergency, savings_1, savings_2) = refine_bootstrap_targets(
        &FormulaAdvisor,
        Uuid::new_v4(),
        dec!(30000.00),
        dec!(21000.00),
        dec!(94500.00),
        dec!(60000.00),
        dec!(45000.00),
    )
    .await;
    assert_eq!(emergency, dec!(94500.00));
    assert_eq!(savings_1, dec!(60000.00));
    assert_eq!(savings_2, dec!(45000.00));
}
