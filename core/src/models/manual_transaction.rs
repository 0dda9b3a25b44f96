//! Manual transaction model
//!
//! Entered directly by the user (spec §6: `POST /transactions`), skipping
//! the Sync Engine. Income manual transactions still flow through the
//! Allocation Engine; expense manual transactions only drive budget
//! notifications (spec §4.2, §6).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManualTransactionType {
    Income,
    Expense,
}

#[derive(Debug, Error, PartialEq)]
pub enum ManualTransactionError {
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
}

/// A manually entered income or expense, indexed by (user, type, date)
/// per spec §3.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualTransaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub kind: ManualTransactionType,
    pub category: String,
    pub description: String,
    pub transaction_date: DateTime<Utc>,
    pub source: String,
}

impl ManualTransaction {
    pub fn new(
        user_id: Uuid,
        amount: Decimal,
        kind: ManualTransactionType,
        category: impl Into<String>,
        description: impl Into<String>,
        transaction_date: DateTime<Utc>,
    ) -> Result<Self, ManualTransactionError> {
        if amount <= Decimal::ZERO {
            return Err(ManualTransactionError::NonPositiveAmount(amount));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            kind,
            category: category.into(),
            description: description.into(),
            transaction_date,
            source: "manual".to_string(),
        })
    }

    pub fn is_income(&self) -> bool {
        self.kind == ManualTransactionType::Income
    }
}
