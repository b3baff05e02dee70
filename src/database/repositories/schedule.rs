//! Schedule repository implementation

use sqlx::SqlitePool;

use crate::models::schedule::{NewScheduleEntry, ScheduleSlot};
use crate::models::user::User;
use crate::utils::errors::CampusBotError;

#[derive(Debug, Clone)]
pub struct ScheduleRepository {
    pool: SqlitePool,
}

impl ScheduleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Plain insert. Slot uniqueness is not enforced: a teacher may record
    /// the same (group, day, lesson) twice and both rows are kept.
    pub async fn add_entry(&self, request: NewScheduleEntry) -> Result<(), CampusBotError> {
        sqlx::query(
            r#"
            INSERT INTO schedule (group_id, day_of_week, lesson_number, subject, teacher_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.group_id)
        .bind(request.day_of_week)
        .bind(request.lesson_number)
        .bind(request.subject)
        .bind(request.teacher_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All slots for a group, ordered by (day, lesson number) ascending,
    /// with the teacher's display name joined in.
    pub async fn list_for_group(&self, group_id: i64) -> Result<Vec<ScheduleSlot>, CampusBotError> {
        let slots = sqlx::query_as::<_, ScheduleSlot>(
            r#"
            SELECT s.schedule_id, s.group_id, s.day_of_week, s.lesson_number, s.subject,
                   s.teacher_id, u.full_name AS teacher_name
            FROM schedule s
            LEFT JOIN users u ON s.teacher_id = u.user_id
            WHERE s.group_id = ?
            ORDER BY s.day_of_week, s.lesson_number
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(slots)
    }

    /// Distinct students whose group has at least one slot taught by this
    /// teacher. "My students" is derived transitively through the schedule,
    /// never stored, so any schedule change is visible on the next call.
    pub async fn students_for_teacher(&self, teacher_id: i64) -> Result<Vec<User>, CampusBotError> {
        let students = sqlx::query_as::<_, User>(
            r#"
            SELECT DISTINCT u.user_id, u.username, u.full_name, u.role, u.group_id
            FROM users u
            INNER JOIN schedule s ON u.group_id = s.group_id
            WHERE s.teacher_id = ? AND u.role = 'student'
            ORDER BY u.full_name
            "#,
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    /// Distinct teachers appearing in a group's schedule.
    pub async fn teachers_for_group(&self, group_id: i64) -> Result<Vec<User>, CampusBotError> {
        let teachers = sqlx::query_as::<_, User>(
            r#"
            SELECT DISTINCT u.user_id, u.username, u.full_name, u.role, u.group_id
            FROM users u
            INNER JOIN schedule s ON u.user_id = s.teacher_id
            WHERE s.group_id = ?
            ORDER BY u.full_name
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(teachers)
    }
}
