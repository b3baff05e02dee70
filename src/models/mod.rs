//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod grade;
pub mod group;
pub mod message;
pub mod schedule;
pub mod user;

// Re-export commonly used models
pub use grade::{GradeRecord, NewGrade};
pub use group::Group;
pub use message::NewMessage;
pub use schedule::{NewScheduleEntry, ScheduleSlot};
pub use user::{Role, UpsertUserRequest, User};
