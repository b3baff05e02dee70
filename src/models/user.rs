//! User model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Role a user holds within the institution.
///
/// Stored as lowercase text in the `users` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Teacher, Role::Student];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "admin" => Some(Role::Admin),
            "teacher" => Some(Role::Teacher),
            "student" => Some(Role::Student),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Opaque transport-supplied identifier, stable per user.
    pub user_id: i64,
    pub username: Option<String>,
    pub full_name: String,
    pub role: Role,
    pub group_id: Option<i64>,
}

impl User {
    /// Name shown in menus and notifications.
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            self.username.as_deref().unwrap_or("Unknown")
        } else {
            &self.full_name
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertUserRequest {
    pub user_id: i64,
    pub username: Option<String>,
    pub full_name: String,
    pub role: Role,
    pub group_id: Option<i64>,
}
