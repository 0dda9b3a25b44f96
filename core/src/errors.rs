//! Crate-wide error taxonomy (spec §7)
//!
//! Individual modules define their own focused error enums (`SyncError`,
//! `AllocationError`, ...) the way the teacher's `TransactionError` /
//! `SettlementError` are scoped to one concern each. `CoreError` is the
//! aggregate surfaced across module boundaries, composed with `#[from]`
//! exactly as `SettlementError` wraps `AgentError`/`TransactionError`.

use thiserror::Error;
use uuid::Uuid;

use crate::allocation::engine::AllocationError;
use crate::models::goal::GoalError;
use crate::models::manual_transaction::ManualTransactionError;
use crate::models::transaction::TransactionError;
use crate::sync::engine::SyncError;

/// Top-level error type. Recovery policy per variant is documented on each
/// variant and summarized in spec §7's "Recovery policy" table.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Surfaced to caller as 404-equivalent.
    #[error("not found: {0}")]
    NotFound(String),

    /// Surfaced as 400; e.g. reconnecting a currently-connected connection.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Surfaced as 400; negative amount, unknown type, malformed deadline.
    #[error("validation error: {0}")]
    Validation(String),

    /// Recoverable: advisor failed, caller proceeds with formula fallback.
    #[error("policy advisor unavailable")]
    PolicyUnavailable,

    /// Recoverable: sync continues, `last_sync` still advances, payload
    /// untouched.
    #[error("snapshot missing for connection {0}")]
    SnapshotMissing(Uuid),

    /// Recoverable: same handling as `SnapshotMissing`.
    #[error("snapshot invalid for connection {0}: {1}")]
    SnapshotInvalid(Uuid, String),

    /// Non-recoverable for the current unit of work: rollback, propagate.
    #[error("database failure: {0}")]
    Database(#[from] sqlx::Error),

    /// Swallowed by the dispatcher; never propagated to the caller.
    #[error("email dispatch failure: {0}")]
    EmailDispatchFailure(String),

    /// Policy-specific: triggers the advisor's cooldown.
    #[error("llm quota exhausted")]
    QuotaExhausted,

    #[error("sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("allocation error: {0}")]
    Allocation(#[from] AllocationError),

    #[error(transparent)]
    Goal(#[from] GoalError),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error(transparent)]
    ManualTransaction(#[from] ManualTransactionError),
}

impl CoreError {
    /// Whether this error is locally recovered (spec §7) rather than
    /// surfaced to the caller.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CoreError::PolicyUnavailable
                | CoreError::SnapshotMissing(_)
                | CoreError::SnapshotInvalid(_, _)
                | CoreError::EmailDispatchFailure(_)
        )
    }
}
