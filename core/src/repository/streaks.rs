//! Streak repository (spec §4.3 supplement, §6)

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::streak::UserStreak;

#[async_trait]
pub trait StreakRepository: Send + Sync {
    async fn load_or_default(&self, user_id: Uuid) -> Result<UserStreak, sqlx::Error>;
    async fn save(&self, streak: &UserStreak) -> Result<(), sqlx::Error>;
}

pub struct PgStreakRepository {
    pool: PgPool,
}

impl PgStreakRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StreakRepository for PgStreakRepository {
    async fn load_or_default(&self, user_id: Uuid) -> Result<UserStreak, sqlx::Error> {
        let row = sqlx::query_as::<_, UserStreakRow>(
            r#"SELECT user_id, savings_streak, longest_savings_streak, total_savings_days, last_savings_date,
                      transaction_streak, longest_transaction_streak, total_transaction_days, last_transaction_date
               FROM user_streaks WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into).unwrap_or_else(|| UserStreak::new(user_id)))
    }

    async fn save(&self, streak: &UserStreak) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"INSERT INTO user_streaks
               (user_id, savings_streak, longest_savings_streak, total_savings_days, last_savings_date,
                transaction_streak, longest_transaction_streak, total_transaction_days, last_transaction_date)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               ON CONFLICT (user_id) DO UPDATE SET
                 savings_streak = EXCLUDED.savings_streak,
                 longest_savings_streak = EXCLUDED.longest_savings_streak,
                 total_savings_days = EXCLUDED.total_savings_days,
                 last_savings_date = EXCLUDED.last_savings_date,
                 transaction_streak = EXCLUDED.transaction_streak,
                 longest_transaction_streak = EXCLUDED.longest_transaction_streak,
                 total_transaction_days = EXCLUDED.total_transaction_days,
                 last_transaction_date = EXCLUDED.last_transaction_date"#,
        )
        .bind(streak.user_id)
        .bind(streak.savings_streak as i32)
        .bind(streak.longest_savings_streak as i32)
        .bind(streak.total_savings_days as i32)
        .bind(streak.last_savings_date)
        .bind(streak.transaction_streak as i32)
        .bind(streak.longest_transaction_streak as i32)
        .bind(streak.total_transaction_days as i32)
        .bind(streak.last_transaction_date)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct UserStreakRow {
    user_id: Uuid,
    savings_streak: i32,
    longest_savings_streak: i32,
    total_savings_days: i32,
    last_savings_date: Option<NaiveDate>,
    transaction_streak: i32,
    longest_transaction_streak: i32,
    total_transaction_days: i32,
    last_transaction_date: Option<NaiveDate>,
}

impl From<UserStreakRow> for UserStreak {
    fn from(row: UserStreakRow) -> Self {
        UserStreak {
            user_id: row.user_id,
            savings_streak: row.savings_streak as u32,
            longest_savings_streak: row.longest_savings_streak as u32,
            total_savings_days: row.total_savings_days as u32,
            last_savings_date: row.last_savings_date,
            transaction_streak: row.transaction_streak as u32,
            longest_transaction_streak: row.longest_transaction_streak as u32,
            total_transaction_days: row.total_transaction_days as u32,
            last_transaction_date: row.last_transaction_date,
        }
    }
}
