//! Persistence boundary (spec §6). Migrations/schema bootstrap are out of
//! scope (spec Non-goals) — these repositories assume the tables already
//! exist with the shapes implied by their queries.

pub mod connections;
pub mod goals;
pub mod manual_transactions;
pub mod streaks;

pub use connections::{ConnectionRepository, PgConnectionRepository};
pub use goals::{GoalRepository, PgGoalRepository};
pub use manual_transactions::{ManualTransactionRepository, PgManualTransactionRepository};
pub use streaks::{PgStreakRepository, StreakRepository};
