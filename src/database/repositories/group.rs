//! Group repository implementation

use sqlx::SqlitePool;

use crate::models::group::Group;
use crate::utils::errors::CampusBotError;

#[derive(Debug, Clone)]
pub struct GroupRepository {
    pool: SqlitePool,
}

impl GroupRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new group and return its generated id.
    ///
    /// Group names carry a unique index; a duplicate surfaces as
    /// `ConstraintViolation` and the group count does not change.
    pub async fn create(&self, group_name: &str) -> Result<i64, CampusBotError> {
        let result = sqlx::query("INSERT INTO groups (group_name) VALUES (?)")
            .bind(group_name)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(e) if CampusBotError::is_unique_violation(&e) => {
                Err(CampusBotError::ConstraintViolation(format!(
                    "a group named '{group_name}' already exists"
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list(&self) -> Result<Vec<Group>, CampusBotError> {
        let groups =
            sqlx::query_as::<_, Group>("SELECT group_id, group_name FROM groups ORDER BY group_name")
                .fetch_all(&self.pool)
                .await?;

        Ok(groups)
    }

    pub async fn find_by_name(&self, group_name: &str) -> Result<Option<Group>, CampusBotError> {
        let group = sqlx::query_as::<_, Group>(
            "SELECT group_id, group_name FROM groups WHERE group_name = ?",
        )
        .bind(group_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    pub async fn find_by_id(&self, group_id: i64) -> Result<Option<Group>, CampusBotError> {
        let group = sqlx::query_as::<_, Group>(
            "SELECT group_id, group_name FROM groups WHERE group_id = ?",
        )
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    /// Delete the group row only. Users and schedule entries keep their
    /// now-dangling group references (see DESIGN.md).
    pub async fn delete(&self, group_id: i64) -> Result<(), CampusBotError> {
        sqlx::query("DELETE FROM groups WHERE group_id = ?")
            .bind(group_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn count(&self) -> Result<i64, CampusBotError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM groups")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
