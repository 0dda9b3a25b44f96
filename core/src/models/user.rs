//! User model
//!
//! Authentication material, password reset, and JWT issuance are explicitly
//! out of scope (spec §1) and are not modeled here beyond an opaque id — the
//! core never inspects credentials.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user of the allocator. Created externally; deletion cascades all
/// owned entities (connections, goals, manual transactions, streak) —
/// enforced by the repository layer, not by this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub monthly_budget: Option<Decimal>,
    pub language: String,
}

impl User {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            monthly_budget: None,
            language: "en".to_string(),
        }
    }
}
