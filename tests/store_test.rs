//! Data store integration tests against an in-memory SQLite database.

mod common;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};

use campusbot::database::DatabaseService;
use campusbot::models::grade::NewGrade;
use campusbot::models::message::NewMessage;
use campusbot::models::schedule::NewScheduleEntry;
use campusbot::models::user::{Role, UpsertUserRequest};
use campusbot::utils::errors::CampusBotError;

use common::{memory_pool, seed_user};

async fn store() -> DatabaseService {
    DatabaseService::new(memory_pool().await)
}

#[tokio::test]
async fn upsert_then_get_round_trip() {
    let db = store().await;

    assert!(db.users.find_by_id(42).await.unwrap().is_none());

    db.users
        .upsert(UpsertUserRequest {
            user_id: 42,
            username: Some("jdoe".to_string()),
            full_name: "John Doe".to_string(),
            role: Role::Teacher,
            group_id: None,
        })
        .await
        .unwrap();

    let user = db.users.find_by_id(42).await.unwrap().unwrap();
    assert_eq!(user.user_id, 42);
    assert_eq!(user.username.as_deref(), Some("jdoe"));
    assert_eq!(user.full_name, "John Doe");
    assert_eq!(user.role, Role::Teacher);
    assert_eq!(user.group_id, None);
}

#[tokio::test]
async fn upsert_fully_replaces_the_row() {
    let db = store().await;
    seed_user(&db, 42, "John Doe", Role::Teacher, None).await;

    db.users
        .upsert(UpsertUserRequest {
            user_id: 42,
            username: None,
            full_name: "Johnny".to_string(),
            role: Role::Student,
            group_id: Some(9),
        })
        .await
        .unwrap();

    let user = db.users.find_by_id(42).await.unwrap().unwrap();
    assert_eq!(user.username, None);
    assert_eq!(user.full_name, "Johnny");
    assert_eq!(user.role, Role::Student);
    assert_eq!(user.group_id, Some(9));
}

#[tokio::test]
async fn duplicate_group_name_violates_constraint() {
    let db = store().await;

    db.groups.create("A").await.unwrap();
    let err = db.groups.create("A").await.unwrap_err();
    assert_matches!(err, CampusBotError::ConstraintViolation(_));

    assert_eq!(db.groups.count().await.unwrap(), 1);
}

#[tokio::test]
async fn group_lookups_return_absent_not_errors() {
    let db = store().await;

    assert!(db.groups.find_by_name("ghost").await.unwrap().is_none());
    assert!(db.groups.find_by_id(999).await.unwrap().is_none());
    assert!(db.groups.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn schedule_carries_resolved_teacher_name() {
    let db = store().await;
    seed_user(&db, 10, "Tina Turing", Role::Teacher, None).await;
    let group_id = db.groups.create("CS-101").await.unwrap();

    db.schedule
        .add_entry(NewScheduleEntry {
            group_id,
            day_of_week: 2,
            lesson_number: 3,
            subject: "Math".to_string(),
            teacher_id: 10,
        })
        .await
        .unwrap();

    let slots = db.schedule.list_for_group(group_id).await.unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].day_of_week, 2);
    assert_eq!(slots[0].lesson_number, 3);
    assert_eq!(slots[0].subject, "Math");
    assert_eq!(slots[0].teacher_name.as_deref(), Some("Tina Turing"));
}

#[tokio::test]
async fn schedule_is_ordered_by_day_then_lesson() {
    let db = store().await;
    seed_user(&db, 10, "Tina Turing", Role::Teacher, None).await;
    let group_id = db.groups.create("CS-101").await.unwrap();

    for (day, lesson) in [(5, 1), (1, 2), (1, 1), (3, 4)] {
        db.schedule
            .add_entry(NewScheduleEntry {
                group_id,
                day_of_week: day,
                lesson_number: lesson,
                subject: "Subject".to_string(),
                teacher_id: 10,
            })
            .await
            .unwrap();
    }

    let slots = db.schedule.list_for_group(group_id).await.unwrap();
    let order: Vec<(i64, i64)> = slots
        .iter()
        .map(|slot| (slot.day_of_week, slot.lesson_number))
        .collect();
    assert_eq!(order, vec![(1, 1), (1, 2), (3, 4), (5, 1)]);
}

#[tokio::test]
async fn duplicate_slots_are_kept() {
    let db = store().await;
    seed_user(&db, 10, "Tina Turing", Role::Teacher, None).await;
    let group_id = db.groups.create("CS-101").await.unwrap();

    for _ in 0..2 {
        db.schedule
            .add_entry(NewScheduleEntry {
                group_id,
                day_of_week: 1,
                lesson_number: 1,
                subject: "Math".to_string(),
                teacher_id: 10,
            })
            .await
            .unwrap();
    }

    assert_eq!(db.schedule.list_for_group(group_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn students_for_teacher_follows_schedule_changes() {
    let db = store().await;
    seed_user(&db, 10, "Tina Turing", Role::Teacher, None).await;
    let group_id = db.groups.create("CS-101").await.unwrap();
    seed_user(&db, 100, "Sam Street", Role::Student, Some(group_id)).await;

    // No schedule entry yet: no students, no enrollment step exists.
    assert!(db.schedule.students_for_teacher(10).await.unwrap().is_empty());

    db.schedule
        .add_entry(NewScheduleEntry {
            group_id,
            day_of_week: 1,
            lesson_number: 1,
            subject: "Math".to_string(),
            teacher_id: 10,
        })
        .await
        .unwrap();

    let students = db.schedule.students_for_teacher(10).await.unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].user_id, 100);
}

#[tokio::test]
async fn store_accepts_out_of_range_grade() {
    // The 2-5 range lives in the conversation layer; the store records
    // whatever it is handed.
    let db = store().await;
    seed_user(&db, 10, "Tina Turing", Role::Teacher, None).await;
    seed_user(&db, 100, "Sam Street", Role::Student, None).await;

    db.grades
        .add(NewGrade {
            student_id: 100,
            teacher_id: 10,
            subject: "Math".to_string(),
            grade: 6,
            recorded_at: Utc::now(),
        })
        .await
        .unwrap();

    let grades = db.grades.list_for_student(100).await.unwrap();
    assert_eq!(grades.len(), 1);
    assert_eq!(grades[0].grade, 6);
}

#[tokio::test]
async fn grades_come_back_newest_first() {
    let db = store().await;
    seed_user(&db, 10, "Tina Turing", Role::Teacher, None).await;
    seed_user(&db, 100, "Sam Street", Role::Student, None).await;

    let now = Utc::now();
    for (value, age_days) in [(3, 2), (5, 0), (4, 1)] {
        db.grades
            .add(NewGrade {
                student_id: 100,
                teacher_id: 10,
                subject: "Math".to_string(),
                grade: value,
                recorded_at: now - Duration::days(age_days),
            })
            .await
            .unwrap();
    }

    let grades = db.grades.list_for_student(100).await.unwrap();
    let values: Vec<i64> = grades.iter().map(|g| g.grade).collect();
    assert_eq!(values, vec![5, 4, 3]);
    assert_eq!(grades[0].teacher_name.as_deref(), Some("Tina Turing"));
}

#[tokio::test]
async fn remove_group_leaves_dangling_references() {
    let db = store().await;
    seed_user(&db, 10, "Tina Turing", Role::Teacher, None).await;
    let group_id = db.groups.create("CS-101").await.unwrap();
    seed_user(&db, 100, "Sam Street", Role::Student, Some(group_id)).await;
    db.schedule
        .add_entry(NewScheduleEntry {
            group_id,
            day_of_week: 1,
            lesson_number: 1,
            subject: "Math".to_string(),
            teacher_id: 10,
        })
        .await
        .unwrap();

    // The delete succeeds despite the references and does not cascade.
    db.groups.delete(group_id).await.unwrap();

    assert!(db.groups.find_by_id(group_id).await.unwrap().is_none());
    let user = db.users.find_by_id(100).await.unwrap().unwrap();
    assert_eq!(user.group_id, Some(group_id));
    assert_eq!(db.schedule.list_for_group(group_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn updates_on_unknown_ids_are_noops() {
    let db = store().await;

    db.users.set_role(999, Role::Teacher).await.unwrap();
    db.users.set_group(999, Some(1)).await.unwrap();
    db.users.remove_from_group(999).await.unwrap();
    assert!(db.users.find_by_id(999).await.unwrap().is_none());
}

#[tokio::test]
async fn remove_user_from_group_clears_reference() {
    let db = store().await;
    let group_id = db.groups.create("CS-101").await.unwrap();
    seed_user(&db, 100, "Sam Street", Role::Student, Some(group_id)).await;

    db.users.remove_from_group(100).await.unwrap();
    let user = db.users.find_by_id(100).await.unwrap().unwrap();
    assert_eq!(user.group_id, None);
}

#[tokio::test]
async fn list_users_by_role_and_group() {
    let db = store().await;
    let group_id = db.groups.create("CS-101").await.unwrap();
    seed_user(&db, 10, "Tina Turing", Role::Teacher, None).await;
    seed_user(&db, 100, "Sam Street", Role::Student, Some(group_id)).await;
    seed_user(&db, 101, "Ada Byron", Role::Student, Some(group_id)).await;

    let students = db.users.list_by_role(Role::Student).await.unwrap();
    assert_eq!(students.len(), 2);
    // Ordered by name for stable menus.
    assert_eq!(students[0].full_name, "Ada Byron");

    let members = db.users.list_by_group(group_id).await.unwrap();
    assert_eq!(members.len(), 2);
    assert!(db.users.list_by_group(999).await.unwrap().is_empty());
}

#[tokio::test]
async fn find_by_handle() {
    let db = store().await;
    seed_user(&db, 42, "John Doe", Role::Student, None).await;

    let user = db.users.find_by_handle("user42").await.unwrap().unwrap();
    assert_eq!(user.user_id, 42);
    assert!(db.users.find_by_handle("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn messages_append_to_the_log() {
    let db = store().await;
    seed_user(&db, 10, "Tina Turing", Role::Teacher, None).await;
    seed_user(&db, 100, "Sam Street", Role::Student, None).await;

    for _ in 0..2 {
        db.messages
            .add(NewMessage {
                from_user_id: 10,
                to_user_id: 100,
                body: "See me after class".to_string(),
                sent_at: Utc::now(),
            })
            .await
            .unwrap();
    }
}
