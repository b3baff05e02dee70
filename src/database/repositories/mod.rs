//! Repository layer
//!
//! One repository per entity family, each holding a handle to the shared
//! connection pool. Every operation is a single statement, so each runs in
//! its own implicit transaction; compound check-then-write sequences in the
//! handlers rely on the unique indexes to resolve races.

pub mod grade;
pub mod group;
pub mod message;
pub mod schedule;
pub mod user;

pub use grade::GradeRepository;
pub use group::GroupRepository;
pub use message::MessageRepository;
pub use schedule::ScheduleRepository;
pub use user::UserRepository;
