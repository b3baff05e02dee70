//! Schedule models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One teaching slot as read back from storage.
///
/// `teacher_name` is denormalized via a join so the presentation layer never
/// needs a second lookup; it is `None` when the teacher row has gone missing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScheduleSlot {
    pub schedule_id: i64,
    pub group_id: i64,
    pub day_of_week: i64,
    pub lesson_number: i64,
    pub subject: String,
    pub teacher_id: i64,
    pub teacher_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewScheduleEntry {
    pub group_id: i64,
    pub day_of_week: i64,
    pub lesson_number: i64,
    pub subject: String,
    pub teacher_id: i64,
}
