//! Manual transaction ledger repository (spec §4.2 supplement, §6)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::manual_transaction::{ManualTransaction, ManualTransactionType};

#[async_trait]
pub trait ManualTransactionRepository: Send + Sync {
    async fn insert(&self, transaction: &ManualTransaction) -> Result<(), sqlx::Error>;
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ManualTransaction>, sqlx::Error>;
}

pub struct PgManualTransactionRepository {
    pool: PgPool,
}

impl PgManualTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ManualTransactionRepository for PgManualTransactionRepository {
    async fn insert(&self, transaction: &ManualTransaction) -> Result<(), sqlx::Error> {
        let kind = match transaction.kind {
            ManualTransactionType::Income => "income",
            ManualTransactionType::Expense => "expense",
        };
        sqlx::query(
            r#"INSERT INTO manual_transactions
               (id, user_id, amount, kind, category, description, transaction_date, source)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
        )
        .bind(transaction.id)
        .bind(transaction.user_id)
        .bind(transaction.amount)
        .bind(kind)
        .bind(&transaction.category)
        .bind(&transaction.description)
        .bind(transaction.transaction_date)
        .bind(&transaction.source)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ManualTransaction>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ManualTransactionRow>(
            r#"SELECT id, user_id, amount, kind, category, description, transaction_date, source
               FROM manual_transactions WHERE user_id = $1 ORDER BY transaction_date DESC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[derive(sqlx::FromRow)]
struct ManualTransactionRow {
    id: Uuid,
    user_id: Uuid,
    amount: Decimal,
    kind: String,
    category: String,
    description: String,
    transaction_date: DateTime<Utc>,
    source: String,
}

impl From<ManualTransactionRow> for ManualTransaction {
    fn from(row: ManualTransactionRow) -> Self {
        ManualTransaction {
            id: row.id,
            user_id: row.user_id,
            amount: row.amount,
            kind: if row.kind == "income" {
                ManualTransactionType::Income
            } else {
                ManualTransactionType::Expense
            },
            category: row.category,
            description: row.description,
            transaction_date: row.transaction_date,
            source: row.source,
        }
    }
}
