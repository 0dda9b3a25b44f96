//! Connection model
//!
//! A [`Connection`] is the persisted relationship between a user and a
//! (mocked) payment source, carrying the payload of transactions plus the
//! allocation metadata that is this system's single source of truth for
//! at-most-once allocation (spec §3).

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::time::ist_midnight_utc;
use crate::models::transaction::{Transaction, TransactionType};

/// Source type tag (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    Upi,
    Bank,
    Manual,
    Test,
}

/// Connection lifecycle status. Disconnect is soft (spec §4.1): the row is
/// retained, never deleted, so `allocated_transaction_ids` survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

/// One `entries`-stream record (spec §6) — the cash-style alternative
/// presentation of a credit transaction, dated rather than timestamped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub amount: Decimal,
    pub description: String,
    pub date: chrono::NaiveDate,
    pub category: String,
}

impl Entry {
    /// Lift this entry into a [`Transaction`], with timestamp pinned to
    /// start-of-day IST (spec §6). Entries are always credits — they model
    /// cash income sources with no debit side.
    pub fn into_transaction(self) -> Transaction {
        Transaction::new(
            self.id,
            TransactionType::Credit,
            self.amount,
            self.description,
            ist_midnight_utc(self.date),
            "posted",
        )
        .expect("entries carry validated positive amounts from the snapshot loader")
    }
}

/// The structured document attached to a [`Connection`] (spec §3, §6).
///
/// `allocated_transaction_ids` is a set, not a list (per the re-architecting
/// note in spec §9): membership is the only question ever asked of it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionPayload {
    pub transactions: Vec<Transaction>,
    pub entries: Vec<Entry>,
    pub monthly_summary: serde_json::Value,
    pub account_id: Option<String>,
    pub balance: Option<Decimal>,
    pub allocated_transaction_ids: BTreeSet<String>,
}

impl ConnectionPayload {
    /// Empty skeleton used when a connection has never been synced (spec
    /// §4.1 merge algorithm, step 1).
    pub fn empty() -> Self {
        Self {
            transactions: Vec::new(),
            entries: Vec::new(),
            monthly_summary: serde_json::json!({}),
            account_id: None,
            balance: None,
            allocated_transaction_ids: BTreeSet::new(),
        }
    }

    /// All transactions as one stream: the `transactions` array plus
    /// `entries` lifted into transactions (spec §6).
    pub fn all_transactions(&self) -> Vec<Transaction> {
        let mut out = self.transactions.clone();
        out.extend(self.entries.iter().cloned().map(Entry::into_transaction));
        out
    }
}

/// A persisted connection between a user and a payment source (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub id: Uuid,
    pub user_id: Uuid,
    pub display_name: String,
    pub kind: ConnectionType,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
    pub last_sync: Option<DateTime<Utc>>,
    pub payload: ConnectionPayload,
}

impl Connection {
    /// Create a brand-new, never-synced connection.
    pub fn new(user_id: Uuid, display_name: impl Into<String>, kind: ConnectionType) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            display_name: display_name.into(),
            kind,
            status: ConnectionStatus::Connected,
            created_at: Utc::now(),
            last_sync: None,
            payload: ConnectionPayload::empty(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    /// Soft-disconnect: flips status, retains payload and id set (spec §4.1).
    pub fn disconnect(&mut self) {
        self.status = ConnectionStatus::Disconnected;
    }

    /// Reconnect a previously-disconnected row, reusing it in place (spec
    /// §4.1 "Connection create/reconnect semantics"). The caller is
    /// responsible for merging a fresh snapshot afterward via
    /// [`crate::sync::engine::merge_payload`].
    pub fn reconnect(&mut self) {
        self.status = ConnectionStatus::Connected;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn entry_lifts_to_start_of_day_ist_credit() {
        let entry = Entry {
            id: "entry_recent_001".to_string(),
            amount: dec!(500.00),
            description: "cash tip".to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            category: "cash_income".to_string(),
        };
        let tx = entry.into_transaction();
        assert!(tx.is_credit());
        assert_eq!(crate::core::time::ist_date(tx.timestamp()), chrono::NaiveDate::from_ymd_opt(2026, 7, 1).unwrap());
    }

    #[test]
    fn disconnect_then_reconnect_preserves_allocated_ids() {
        let mut conn = Connection::new(Uuid::new_v4(), "PhonePe", ConnectionType::Upi);
        conn.payload.allocated_transaction_ids.insert("txn_recent_001".to_string());

        conn.disconnect();
        assert_eq!(conn.status, ConnectionStatus::Disconnected);

        conn.reconnect();
        assert_eq!(conn.status, ConnectionStatus::Connected);
        assert!(conn.payload.allocated_transaction_ids.contains("txn_recent_001"));
    }
}
