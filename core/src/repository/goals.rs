//! Goal repository (spec §4.2 atomicity, §6 persistence)
//!
//! Grounded on the teacher-pack's `GoalRepository` (`afadil-wealthfolio`):
//! a thin struct wrapping a connection pool, one method per operation, each
//! opening its own connection/transaction. The sqlx/Postgres equivalent
//! here additionally owns `apply_allocation_atomically`, which is where the
//! Allocation Engine's pure in-memory result gets turned into one committed
//! transaction (spec §4.2: "the allocation, the consumed transaction ids,
//! and the goal updates all commit together or not at all").

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::allocation::engine::AllocationReport;
use crate::models::goal::Goal;

#[async_trait]
pub trait GoalRepository: Send + Sync {
    async fn load_active_goals(&self, user_id: Uuid) -> Result<Vec<Goal>, sqlx::Error>;
    async fn load_all_goals(&self, user_id: Uuid) -> Result<Vec<Goal>, sqlx::Error>;
    async fn insert_goal(&self, goal: &Goal) -> Result<(), sqlx::Error>;
    async fn update_goal(&self, goal: &Goal) -> Result<(), sqlx::Error>;

    /// Commit an [`AllocationReport`] against `connection_id`'s
    /// `allocated_transaction_ids` set and the affected goals' `saved`
    /// balances in one transaction.
    async fn apply_allocation_atomically(
        &self,
        connection_id: Uuid,
        report: &AllocationReport,
    ) -> Result<(), sqlx::Error>;
}

pub struct PgGoalRepository {
    pool: PgPool,
}

impl PgGoalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GoalRepository for PgGoalRepository {
    async fn load_active_goals(&self, user_id: Uuid) -> Result<Vec<Goal>, sqlx::Error> {
        sqlx::query_as::<_, GoalRow>(
            r#"SELECT id, user_id, name, target, saved, deadline, kind, is_completed, created_at
               FROM goals WHERE user_id = $1 AND is_completed = false"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map(|rows| rows.into_iter().map(Into::into).collect())
    }

    async fn load_all_goals(&self, user_id: Uuid) -> Result<Vec<Goal>, sqlx::Error> {
        sqlx::query_as::<_, GoalRow>(
            r#"SELECT id, user_id, name, target, saved, deadline, kind, is_completed, created_at
               FROM goals WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map(|rows| rows.into_iter().map(Into::into).collect())
    }

    async fn insert_goal(&self, goal: &Goal) -> Result<(), sqlx::Error> {
        let kind = serde_json::to_string(&goal.kind).unwrap_or_default();
        sqlx::query(
            r#"INSERT INTO goals (id, user_id, name, target, saved, deadline, kind, is_completed, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"#,
        )
        .bind(goal.id)
        .bind(goal.user_id)
        .bind(&goal.name)
        .bind(goal.target)
        .bind(goal.saved)
        .bind(goal.deadline)
        .bind(kind)
        .bind(goal.is_completed)
        .bind(goal.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_goal(&self, goal: &Goal) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"UPDATE goals SET name = $2, target = $3, saved = $4, deadline = $5, is_completed = $6
               WHERE id = $1"#,
        )
        .bind(goal.id)
        .bind(&goal.name)
        .bind(goal.target)
        .bind(goal.saved)
        .bind(goal.deadline)
        .bind(goal.is_completed)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn apply_allocation_atomically(
        &self,
        connection_id: Uuid,
        report: &AllocationReport,
    ) -> Result<(), sqlx::Error> {
        let mut tx: Transaction<'_, Postgres> = self.pool.begin().await?;

        for id in &report.consumed_transaction_ids {
            sqlx::query(
                r#"UPDATE connections
                   SET payload = jsonb_set(
                       payload,
                       '{allocated_transaction_ids}',
                       (payload->'allocated_transaction_ids') || to_jsonb($2::text)
                   )
                   WHERE id = $1"#,
            )
            .bind(connection_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        for application in &report.applications {
            sqlx::query(r#"UPDATE goals SET saved = saved + $2, is_completed = $3 WHERE id = $1"#)
                .bind(application.goal_id)
                .bind(application.amount_applied)
                .bind(application.newly_completed)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await
    }
}

#[derive(sqlx::FromRow)]
struct GoalRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    target: rust_decimal::Decimal,
    saved: rust_decimal::Decimal,
    deadline: Option<chrono::DateTime<chrono::Utc>>,
    kind: String,
    is_completed: bool,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<GoalRow> for Goal {
    fn from(row: GoalRow) -> Self {
        let kind = serde_json::from_str(&row.kind).unwrap_or(crate::models::goal::GoalType::Other(row.kind));
        Goal {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            target: row.target,
            saved: row.saved,
            deadline: row.deadline,
            kind,
            is_completed: row.is_completed,
            created_at: row.created_at,
        }
    }
}
