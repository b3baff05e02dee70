//! Message repository implementation

use sqlx::SqlitePool;

use crate::models::message::NewMessage;
use crate::utils::errors::CampusBotError;

#[derive(Debug, Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a message to the log. Messages are never updated or deleted.
    pub async fn add(&self, request: NewMessage) -> Result<(), CampusBotError> {
        sqlx::query(
            r#"
            INSERT INTO messages (from_user_id, to_user_id, body, sent_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(request.from_user_id)
        .bind(request.to_user_id)
        .bind(request.body)
        .bind(request.sent_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
