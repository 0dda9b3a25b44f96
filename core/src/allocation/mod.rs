//! Allocation Engine (spec §4.2)

pub mod engine;
pub mod urgency;

pub use engine::{
    allocate, apply_shares, filter_unconsumed, resolve_shares, AllocationError, AllocationReport,
    GoalApplication, IncomeCredit,
};
pub use urgency::{classify, days_to_deadline, sort_by_urgency, sort_key, Urgency};
