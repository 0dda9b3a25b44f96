//! Connection repository (spec §4.1, §6 persistence)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::connection::{Connection, ConnectionPayload, ConnectionStatus, ConnectionType};

#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    async fn find(&self, connection_id: Uuid) -> Result<Option<Connection>, sqlx::Error>;
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Connection>, sqlx::Error>;
    async fn insert(&self, connection: &Connection) -> Result<(), sqlx::Error>;
    async fn save_payload_and_sync(
        &self,
        connection_id: Uuid,
        payload: &ConnectionPayload,
        last_sync: DateTime<Utc>,
    ) -> Result<(), sqlx::Error>;
    async fn set_status(&self, connection_id: Uuid, status: ConnectionStatus) -> Result<(), sqlx::Error>;
}

pub struct PgConnectionRepository {
    pool: PgPool,
}

impl PgConnectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConnectionRepository for PgConnectionRepository {
    async fn find(&self, connection_id: Uuid) -> Result<Option<Connection>, sqlx::Error> {
        let row = sqlx::query_as::<_, ConnectionRow>(
            r#"SELECT id, user_id, display_name, kind, status, created_at, last_sync, payload
               FROM connections WHERE id = $1"#,
        )
        .bind(connection_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Connection>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ConnectionRow>(
            r#"SELECT id, user_id, display_name, kind, status, created_at, last_sync, payload
               FROM connections WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, connection: &Connection) -> Result<(), sqlx::Error> {
        let kind = serde_json::to_string(&connection.kind).unwrap_or_default();
        let status = serde_json::to_string(&connection.status).unwrap_or_default();
        let payload = serde_json::to_value(&connection.payload).unwrap_or_default();
        sqlx::query(
            r#"INSERT INTO connections (id, user_id, display_name, kind, status, created_at, last_sync, payload)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
        )
        .bind(connection.id)
        .bind(connection.user_id)
        .bind(&connection.display_name)
        .bind(kind)
        .bind(status)
        .bind(connection.created_at)
        .bind(connection.last_sync)
        .bind(payload)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save_payload_and_sync(
        &self,
        connection_id: Uuid,
        payload: &ConnectionPayload,
        last_sync: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let payload = serde_json::to_value(payload).unwrap_or_default();
        sqlx::query(r#"UPDATE connections SET payload = $2, last_sync = $3 WHERE id = $1"#)
            .bind(connection_id)
            .bind(payload)
            .bind(last_sync)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_status(&self, connection_id: Uuid, status: ConnectionStatus) -> Result<(), sqlx::Error> {
        let status = serde_json::to_string(&status).unwrap_or_default();
        sqlx::query(r#"UPDATE connections SET status = $2 WHERE id = $1"#)
            .bind(connection_id)
            .bind(status)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct ConnectionRow {
    id: Uuid,
    user_id: Uuid,
    display_name: String,
    kind: String,
    status: String,
    created_at: DateTime<Utc>,
    last_sync: Option<DateTime<Utc>>,
    payload: serde_json::Value,
}

impl From<ConnectionRow> for Connection {
    fn from(row: ConnectionRow) -> Self {
        Connection {
            id: row.id,
            user_id: row.user_id,
            display_name: row.display_name,
            kind: serde_json::from_str(&row.kind).unwrap_or(ConnectionType::Manual),
            status: serde_json::from_str(&row.status).unwrap_or(ConnectionStatus::Disconnected),
            created_at: row.created_at,
            last_sync: row.last_sync,
            payload: serde_json::from_value(row.payload).unwrap_or_else(|_| ConnectionPayload::empty()),
        }
    }
}
