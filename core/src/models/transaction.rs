//! Transaction model
//!
//! Represents one entry inside a [`crate::models::connection::ConnectionPayload`]
//! — either the `transactions` stream or the `entries` stream lifted into the
//! same shape (spec §6). Unlike the teacher's simulation `Transaction`, this
//! type carries no settlement state machine: a payload transaction is either
//! eligible for allocation or it isn't, and that's a pure function of the
//! fields here plus the connection it belongs to (see
//! [`crate::sync::engine::eligible_income`]).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Direction of a payload transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Credit,
    Debit,
}

/// Errors constructing or validating a [`Transaction`].
#[derive(Debug, Error, PartialEq)]
pub enum TransactionError {
    #[error("transaction amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
}

/// A single transaction inside a connection payload (spec §3, §6).
///
/// `id` is a stable string rather than a UUID: source snapshots and the
/// admin layer both mint ids like `txn_recent_001` / `entry_recent_001`
/// (spec §6), and the Sync Engine treats those identically to any other id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    id: String,
    #[serde(rename = "type")]
    kind: TransactionType,
    amount: Decimal,
    description: String,
    timestamp: DateTime<Utc>,
    status: String,
}

impl Transaction {
    /// Construct a transaction. `amount` must be strictly positive per
    /// spec §3 ("amount > 0"); zero or negative amounts are rejected at the
    /// boundary rather than silently allocated as zero.
    pub fn new(
        id: impl Into<String>,
        kind: TransactionType,
        amount: Decimal,
        description: impl Into<String>,
        timestamp: DateTime<Utc>,
        status: impl Into<String>,
    ) -> Result<Self, TransactionError> {
        if amount <= Decimal::ZERO {
            return Err(TransactionError::NonPositiveAmount(amount));
        }
        Ok(Self {
            id: id.into(),
            kind,
            amount,
            description: description.into(),
            timestamp,
            status: status.into(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_credit(&self) -> bool {
        self.kind == TransactionType::Credit
    }

    pub fn is_debit(&self) -> bool {
        self.kind == TransactionType::Debit
    }
}
