//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{
    DatabasePool, GradeRepository, GroupRepository, MessageRepository, ScheduleRepository,
    UserRepository,
};
use crate::models::user::{Role, User};
use crate::utils::errors::CampusBotError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub groups: GroupRepository,
    pub schedule: ScheduleRepository,
    pub grades: GradeRepository,
    pub messages: MessageRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            groups: GroupRepository::new(pool.clone()),
            schedule: ScheduleRepository::new(pool.clone()),
            grades: GradeRepository::new(pool.clone()),
            messages: MessageRepository::new(pool),
        }
    }

    /// Every user known to the system, across all roles. Used for the
    /// admin broadcast.
    pub async fn all_users(&self) -> Result<Vec<User>, CampusBotError> {
        let mut all = Vec::new();
        for role in Role::ALL {
            all.extend(self.users.list_by_role(role).await?);
        }
        Ok(all)
    }
}
