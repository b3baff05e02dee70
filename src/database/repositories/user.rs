//! User repository implementation

use sqlx::SqlitePool;

use crate::models::user::{Role, UpsertUserRequest, User};
use crate::utils::errors::CampusBotError;

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert or fully replace the row for this user id. Idempotent: no
    /// error on either path.
    pub async fn upsert(&self, request: UpsertUserRequest) -> Result<(), CampusBotError> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO users (user_id, username, full_name, role, group_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.user_id)
        .bind(request.username)
        .bind(request.full_name)
        .bind(request.role)
        .bind(request.group_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Find user by id. Absent means the user has never been seen.
    pub async fn find_by_id(&self, user_id: i64) -> Result<Option<User>, CampusBotError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, username, full_name, role, group_id FROM users WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by handle (username without the leading @).
    pub async fn find_by_handle(&self, handle: &str) -> Result<Option<User>, CampusBotError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, username, full_name, role, group_id FROM users WHERE username = ?",
        )
        .bind(handle)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Unconditional role update; no-op when the id is unknown.
    pub async fn set_role(&self, user_id: i64, role: Role) -> Result<(), CampusBotError> {
        sqlx::query("UPDATE users SET role = ? WHERE user_id = ?")
            .bind(role)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Unconditional group update; no-op when the id is unknown.
    pub async fn set_group(&self, user_id: i64, group_id: Option<i64>) -> Result<(), CampusBotError> {
        sqlx::query("UPDATE users SET group_id = ? WHERE user_id = ?")
            .bind(group_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn list_by_role(&self, role: Role) -> Result<Vec<User>, CampusBotError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT user_id, username, full_name, role, group_id FROM users WHERE role = ? ORDER BY full_name",
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn list_by_group(&self, group_id: i64) -> Result<Vec<User>, CampusBotError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT user_id, username, full_name, role, group_id FROM users WHERE group_id = ? ORDER BY full_name",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Detach the user from their group (group reference set to absent).
    pub async fn remove_from_group(&self, user_id: i64) -> Result<(), CampusBotError> {
        sqlx::query("UPDATE users SET group_id = NULL WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
