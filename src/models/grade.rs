//! Grade models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One recorded grade with the grading teacher's name joined in.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GradeRecord {
    pub grade_id: i64,
    pub student_id: i64,
    pub teacher_id: i64,
    pub subject: String,
    pub grade: i64,
    pub recorded_at: DateTime<Utc>,
    pub teacher_name: Option<String>,
}

/// Insert request. The store does not range-check `grade`; the conversation
/// layer rejects values outside {2,3,4,5} before this is ever built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGrade {
    pub student_id: i64,
    pub teacher_id: i64,
    pub subject: String,
    pub grade: i64,
    pub recorded_at: DateTime<Utc>,
}
