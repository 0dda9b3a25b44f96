//! Goal Lifecycle Controller (spec §4.3)

pub mod lifecycle;

pub use lifecycle::{
    apply_recurring_bump, bootstrap_goals, clamp_emergency_recommendation,
    clamp_savings_recommendation, estimate_avg_monthly_expenses, estimate_avg_monthly_income,
    fallback_general_goal, maybe_resize, react_to_completion, refine_bootstrap_targets,
    TerminalReaction,
};
