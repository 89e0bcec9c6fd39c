use sqlx::SqlitePool;

use crate::error::{Error, Result};
use crate::models::message::{Message, MessageStats, NewMessage};
use crate::utils::time::now;

/// Cap applied to `list` when the caller does not pick one.
pub const DEFAULT_LIST_LIMIT: u32 = 50;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Durable store of contact messages.
///
/// Every operation is a single SQL statement, so SQLite applies it atomically
/// and serializes it against concurrent writers.
#[derive(Clone)]
pub struct MessageStore {
    pool: SqlitePool,
}

impl MessageStore {
    /// Wraps the pool and makes sure the `messages` table and its indexes exist.
    pub async fn init(pool: SqlitePool) -> Result<Self> {
        MIGRATOR.run(&pool).await?;
        tracing::info!("message store initialized");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Rejects a message whose name, email or body is blank; nothing is written then.
    pub async fn create(&self, msg: &NewMessage) -> Result<i64> {
        for (field, value) in [
            ("name", &msg.name),
            ("email", &msg.email),
            ("message", &msg.message),
        ] {
            if value.trim().is_empty() {
                return Err(Error::BadRequest(format!("{} must not be empty", field)));
            }
        }

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO messages (name, email, message, timestamp, read)
            VALUES (?1, ?2, ?3, ?4, 0)
            RETURNING id
            "#,
        )
        .bind(&msg.name)
        .bind(&msg.email)
        .bind(&msg.message)
        .bind(now())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(message_id = id, "message saved");
        Ok(id)
    }

    /// Newest first, at most `limit` rows (`DEFAULT_LIST_LIMIT` when `None`).
    pub async fn list(&self, limit: Option<u32>) -> Result<Vec<Message>> {
        let limit = i64::from(limit.unwrap_or(DEFAULT_LIST_LIMIT));
        self.fetch_ordered(false, limit).await
    }

    pub async fn list_all(&self) -> Result<Vec<Message>> {
        // SQLite treats a negative LIMIT as "no limit".
        self.fetch_ordered(false, -1).await
    }

    pub async fn list_unread(&self) -> Result<Vec<Message>> {
        self.fetch_ordered(true, -1).await
    }

    async fn fetch_ordered(&self, unread_only: bool, limit: i64) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, name, email, message, timestamp, read
            FROM messages
            WHERE (?1 = 0 OR read = 0)
            ORDER BY timestamp DESC, id DESC
            LIMIT ?2
            "#,
        )
        .bind(unread_only)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Message>> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, name, email, message, timestamp, read
            FROM messages
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(message)
    }

    /// Returns `true` only when an unread message flipped to read.
    pub async fn mark_read(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET read = 1
            WHERE id = ?1 AND read = 0
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        let changed = result.rows_affected() > 0;
        if changed {
            tracing::info!(message_id = id, "message marked as read");
        } else {
            tracing::warn!(message_id = id, "message not found or already read");
        }
        Ok(changed)
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM messages WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            tracing::info!(message_id = id, "message deleted");
        } else {
            tracing::warn!(message_id = id, "message not found");
        }
        Ok(removed)
    }

    /// Both counts come from one statement so they describe the same snapshot.
    pub async fn stats(&self) -> Result<MessageStats> {
        let (total, unread): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COALESCE(SUM(CASE WHEN read = 0 THEN 1 ELSE 0 END), 0)
            FROM messages
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(MessageStats {
            total,
            unread,
            read: total - unread,
        })
    }
}
