//! Conversation state management
//!
//! Tracks, per user, which multi-step dialogue is in progress and what has
//! been collected so far. State is process-local and intentionally lost on
//! restart; a crash mid-flow only costs the user a restarted dialogue.

pub mod context;
pub mod flows;
pub mod storage;

pub use context::ConversationContext;
pub use flows::{FieldKind, FieldSpec, FlowKind};
pub use storage::StateStorage;
