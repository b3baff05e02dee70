//! Shared test infrastructure: in-memory database, recording courier, and
//! a pre-seeded classroom.
#![allow(dead_code)]

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use campusbot::database::DatabaseService;
use campusbot::handlers::{EventRouter, MenuRegistry};
use campusbot::models::schedule::NewScheduleEntry;
use campusbot::models::user::{Role, UpsertUserRequest};
use campusbot::services::{Courier, NotificationService};
use campusbot::state::StateStorage;
use campusbot::utils::errors::CampusBotError;

/// Fresh in-memory SQLite database with the schema applied. A single
/// connection keeps the in-memory database alive for the pool's lifetime.
pub async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(false);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();

    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

/// Courier that records deliveries instead of performing them, with
/// per-recipient failure injection.
#[derive(Default)]
pub struct MockCourier {
    delivered: Mutex<Vec<(i64, String)>>,
    unreachable: Mutex<HashSet<i64>>,
}

impl MockCourier {
    pub fn fail_for(&self, recipient_id: i64) {
        self.unreachable.lock().unwrap().insert(recipient_id);
    }

    pub fn deliveries(&self) -> Vec<(i64, String)> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn deliveries_to(&self, recipient_id: i64) -> Vec<String> {
        self.deliveries()
            .into_iter()
            .filter(|(id, _)| *id == recipient_id)
            .map(|(_, text)| text)
            .collect()
    }
}

#[async_trait]
impl Courier for MockCourier {
    async fn deliver(&self, recipient_id: i64, text: &str) -> campusbot::Result<()> {
        if self.unreachable.lock().unwrap().contains(&recipient_id) {
            return Err(CampusBotError::Validation("unreachable".to_string()));
        }
        self.delivered
            .lock()
            .unwrap()
            .push((recipient_id, text.to_string()));
        Ok(())
    }
}

/// A router wired to an in-memory database and a recording courier. The
/// database and state handles share the router's backing stores.
pub struct TestBot {
    pub router: EventRouter,
    pub db: DatabaseService,
    pub states: StateStorage,
    pub courier: Arc<MockCourier>,
}

pub async fn test_bot() -> TestBot {
    let pool = memory_pool().await;
    let db = DatabaseService::new(pool);
    let states = StateStorage::new();
    let courier = Arc::new(MockCourier::default());
    let notifier = NotificationService::new(courier.clone());
    let menu = MenuRegistry::new();
    menu.validate().unwrap();

    let router = EventRouter::new(db.clone(), states.clone(), menu, notifier, vec![]);
    TestBot {
        router,
        db,
        states,
        courier,
    }
}

pub async fn seed_user(
    db: &DatabaseService,
    user_id: i64,
    full_name: &str,
    role: Role,
    group_id: Option<i64>,
) {
    db.users
        .upsert(UpsertUserRequest {
            user_id,
            username: Some(format!("user{user_id}")),
            full_name: full_name.to_string(),
            role,
            group_id,
        })
        .await
        .unwrap();
}

/// One admin, one teacher, one student in a group the teacher teaches.
pub struct Classroom {
    pub bot: TestBot,
    pub admin: i64,
    pub teacher: i64,
    pub student: i64,
    pub group_id: i64,
}

pub const ADMIN_ID: i64 = 1;
pub const TEACHER_ID: i64 = 10;
pub const STUDENT_ID: i64 = 100;

pub async fn classroom() -> Classroom {
    let bot = test_bot().await;

    let group_id = bot.db.groups.create("CS-101").await.unwrap();
    seed_user(&bot.db, ADMIN_ID, "Alice Adams", Role::Admin, None).await;
    seed_user(&bot.db, TEACHER_ID, "Tina Turing", Role::Teacher, None).await;
    seed_user(&bot.db, STUDENT_ID, "Sam Street", Role::Student, Some(group_id)).await;

    bot.db
        .schedule
        .add_entry(NewScheduleEntry {
            group_id,
            day_of_week: 1,
            lesson_number: 1,
            subject: "Math".to_string(),
            teacher_id: TEACHER_ID,
        })
        .await
        .unwrap();

    Classroom {
        bot,
        admin: ADMIN_ID,
        teacher: TEACHER_ID,
        student: STUDENT_ID,
        group_id,
    }
}
