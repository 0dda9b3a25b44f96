//! Personal-finance autonomous allocator — core engine
//!
//! An event-driven allocation engine for gig-economy workers: a Connection
//! Sync Engine reconciles mocked payment-source snapshots, an Allocation
//! Engine splits new income across savings goals under a fixed 40/40/20
//! envelope, a Goal Lifecycle Controller bootstraps and adaptively resizes
//! goals, a Policy Advisor proposes the relative weighting within that
//! envelope (LLM-backed, with a deterministic fallback), and a Background
//! Task Dispatcher serializes per-user work.
//!
//! # Modules
//!
//! - **core**: time (fixed IST discipline), money (decimal rounding),
//!   config (environment-sourced settings)
//! - **models**: domain types (Connection, Goal, Transaction, ManualTransaction,
//!   UserStreak, User)
//! - **sync**: Connection Sync Engine
//! - **allocation**: Allocation Engine and urgency weighting
//! - **policy**: Policy Advisor (LLM client + formula fallback)
//! - **goals**: Goal Lifecycle Controller
//! - **dispatch**: Background Task Dispatcher
//! - **streak**: savings/transaction streak tracking
//! - **budget**: monthly budget warning evaluator
//! - **effects**: typed notification boundary
//! - **repository**: sqlx-backed persistence

pub mod allocation;
pub mod budget;
pub mod core;
pub mod dispatch;
pub mod effects;
pub mod errors;
pub mod goals;
pub mod models;
pub mod policy;
pub mod repository;
pub mod streak;
pub mod sync;

pub use errors::CoreError;
