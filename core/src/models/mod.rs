//! Domain types: User, Connection, Goal, Transaction, ManualTransaction,
//! UserStreak, and the source snapshot document shape.
//!
//! Cyclic data (goal → user → connections → transactions) is strictly a
//! read graph; every cross-reference here is an id, never an object
//! pointer (spec §9).

pub mod connection;
pub mod goal;
pub mod manual_transaction;
pub mod snapshot;
pub mod streak;
pub mod transaction;
pub mod user;

pub use connection::{Connection, ConnectionPayload, ConnectionStatus, ConnectionType, Entry};
pub use goal::{Goal, GoalType};
pub use manual_transaction::{ManualTransaction, ManualTransactionType};
pub use snapshot::SourceSnapshot;
pub use streak::UserStreak;
pub use transaction::{Transaction, TransactionType};
pub use user::User;
