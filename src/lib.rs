//! campusbot Telegram Bot
//!
//! A role-based bot for an educational institution: administrators manage
//! groups and accounts, teachers record grades and schedule slots, students
//! view their schedule and grades and exchange messages with teachers.
//!
//! The conversation engine and data layer are transport-agnostic; the
//! Telegram wiring lives in `main.rs` and the keyboards module.

pub mod config;
pub mod database;
pub mod handlers;
pub mod keyboards;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{CampusBotError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use handlers::{EventRouter, InboundEvent, MenuRegistry, Reply};
pub use services::NotificationService;
pub use state::{ConversationContext, FlowKind, StateStorage};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
