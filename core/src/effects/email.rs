//! Email contracts (spec §4.3/§6 supplement, `email_service.py` shape)
//!
//! The actual email subsystem (templates, SMTP delivery, retries) is out of
//! scope (spec Non-goals). This module only fixes the typed boundary: the
//! rest of the engine constructs one of these records and hands it to an
//! [`EmailSender`]; what happens past that trait is somebody else's crate.

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct IncomeAllocatedEmail {
    pub user_id: Uuid,
    pub income_amount: Decimal,
    pub total_allocated: Decimal,
    pub goal_breakdown: Vec<(String, Decimal)>,
}

#[derive(Debug, Clone)]
pub struct SpendingActivityEmail {
    pub user_id: Uuid,
    pub transaction_count: usize,
    pub total_spent: Decimal,
}

#[derive(Debug, Clone)]
pub struct BudgetWarningEmail {
    pub user_id: Uuid,
    pub spent_this_month: Decimal,
    pub monthly_budget: Decimal,
}

#[derive(Debug, Clone)]
pub struct BudgetExceededEmail {
    pub user_id: Uuid,
    pub spent_this_month: Decimal,
    pub monthly_budget: Decimal,
}

/// One of the four notification shapes the engine can emit.
#[derive(Debug, Clone)]
pub enum EmailNotification {
    IncomeAllocated(IncomeAllocatedEmail),
    SpendingActivity(SpendingActivityEmail),
    BudgetWarning(BudgetWarningEmail),
    BudgetExceeded(BudgetExceededEmail),
}

#[derive(Debug, thiserror::Error)]
#[error("email dispatch failed: {0}")]
pub struct EmailDispatchError(pub String);

/// Delivery boundary. Failures here are logged and swallowed by the
/// dispatcher (spec §7: `EmailDispatchFailure` is always recoverable) —
/// a failed notification never rolls back the allocation it describes.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, notification: EmailNotification) -> Result<(), EmailDispatchError>;
}

/// No-op sender for tests and environments with no configured email
/// subsystem.
pub struct NullEmailSender;

#[async_trait]
impl EmailSender for NullEmailSender {
    async fn send(&self, _notification: EmailNotification) -> Result<(), EmailDispatchError> {
        Ok(())
    }
}
