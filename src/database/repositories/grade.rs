//! Grade repository implementation

use sqlx::SqlitePool;

use crate::models::grade::{GradeRecord, NewGrade};
use crate::utils::errors::CampusBotError;

#[derive(Debug, Clone)]
pub struct GradeRepository {
    pool: SqlitePool,
}

impl GradeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a grade. The value is assumed pre-validated by the caller;
    /// the store itself does not re-check the 2-5 range.
    pub async fn add(&self, request: NewGrade) -> Result<(), CampusBotError> {
        sqlx::query(
            r#"
            INSERT INTO grades (student_id, teacher_id, subject, grade, recorded_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.student_id)
        .bind(request.teacher_id)
        .bind(request.subject)
        .bind(request.grade)
        .bind(request.recorded_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All grades for a student, newest first, with the grading teacher's
    /// name joined in.
    pub async fn list_for_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<GradeRecord>, CampusBotError> {
        let grades = sqlx::query_as::<_, GradeRecord>(
            r#"
            SELECT g.grade_id, g.student_id, g.teacher_id, g.subject, g.grade, g.recorded_at,
                   u.full_name AS teacher_name
            FROM grades g
            LEFT JOIN users u ON g.teacher_id = u.user_id
            WHERE g.student_id = ?
            ORDER BY g.recorded_at DESC
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(grades)
    }
}
