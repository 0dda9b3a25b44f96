//! Integration tests for the Connection Sync Engine's end-to-end flow
//! (spec §4.1, §8)

use income_allocator_core::models::connection::{Connection, ConnectionType};
use income_allocator_core::models::snapshot::SourceSnapshot;
use income_allocator_core::models::transaction::{Transaction, TransactionType};
use income_allocator_core::sync::{sync, InMemorySnapshotSource};
use rust_decimal_macros::dec;
use uuid::Uuid;

fn tx(id: &str, kind: TransactionType, amount: rust_decimal::Decimal) -> Transaction {
    Transaction::new(id, kind, amount, "test", chrono::Utc::now(), "posted").unwrap()
}

#[tokio::test]
async fn disconnect_and_reconnect_preserves_allocation_history_across_syncs() {
    let user_id = Uuid::new_v4();
    let mut conn = Connection::new(user_id, "phonepe", ConnectionType::Upi);
    let source = InMemorySnapshotSource::new().with_snapshot(
        "phonepe",
        SourceSnapshot {
            transactions: vec![tx("txn_a", TransactionType::Credit, dec!(500.00))],
            ..Default::default()
        },
    );

    sync(&mut conn, &source).await.unwrap();
    conn.payload.allocated_transaction_ids.insert("txn_a".to_string());
    conn.disconnect();
    assert!(!conn.is_connected());

    conn.reconnect();
    let report = sync(&mut conn, &source).await.unwrap();
    assert!(report.new_income.is_empty());
    assert!(conn.payload.allocated_transaction_ids.contains("txn_a"));
}

#[tokio::test]
async fn a_connection_that_never_successfully_loads_still_tracks_last_sync() {
    let user_id = Uuid::new_v4();
    let mut conn = Connection::new(user_id, "unregistered_source", ConnectionType::Bank);
    let source = InMemorySnapshotSource::new();

    assert!(conn.last_sync.is_none());
    sync(&mut conn, &source).await.unwrap();
    assert!(conn.last_sync.is_some());
}
