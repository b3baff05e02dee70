//! State storage implementation
//!
//! Process-local storage for conversation contexts, keyed by user id. The
//! single process is the unit of consistency for conversation state, so a
//! shared map behind an async lock is all the coordination required.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use super::context::ConversationContext;

/// In-memory conversation state store.
#[derive(Debug, Clone, Default)]
pub struct StateStorage {
    contexts: Arc<RwLock<HashMap<i64, ConversationContext>>>,
}

impl StateStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save (or overwrite) a user's conversation context.
    pub async fn save_context(&self, context: &ConversationContext) {
        debug!(user_id = context.user_id, flow = ?context.flow, field_index = context.field_index,
               "Saving conversation context");
        let mut contexts = self.contexts.write().await;
        contexts.insert(context.user_id, context.clone());
    }

    /// Load a user's conversation context. Absent means idle.
    pub async fn load_context(&self, user_id: i64) -> Option<ConversationContext> {
        let contexts = self.contexts.read().await;
        contexts.get(&user_id).cloned()
    }

    /// Delete a user's conversation context, returning them to idle.
    pub async fn delete_context(&self, user_id: i64) {
        let mut contexts = self.contexts.write().await;
        if contexts.remove(&user_id).is_some() {
            debug!(user_id = user_id, "Deleted conversation context");
        }
    }

    pub async fn context_exists(&self, user_id: i64) -> bool {
        let contexts = self.contexts.read().await;
        contexts.contains_key(&user_id)
    }

    /// User ids with a stored context, for monitoring.
    pub async fn active_users(&self) -> Vec<i64> {
        let contexts = self.contexts.read().await;
        contexts.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::flows::FlowKind;

    #[tokio::test]
    async fn test_save_load_delete() {
        let storage = StateStorage::new();

        let mut context = ConversationContext::new(123);
        context.start_flow(FlowKind::CreateGroup);
        storage.save_context(&context).await;

        let loaded = storage.load_context(123).await.unwrap();
        assert_eq!(loaded.user_id, 123);
        assert_eq!(loaded.flow, Some(FlowKind::CreateGroup));

        storage.delete_context(123).await;
        assert!(storage.load_context(123).await.is_none());
        assert!(!storage.context_exists(123).await);
    }

    #[tokio::test]
    async fn test_one_context_per_user() {
        let storage = StateStorage::new();

        let mut first = ConversationContext::new(7);
        first.start_flow(FlowKind::Broadcast);
        storage.save_context(&first).await;

        let mut second = ConversationContext::new(7);
        second.start_flow(FlowKind::CreateGroup);
        storage.save_context(&second).await;

        let loaded = storage.load_context(7).await.unwrap();
        assert_eq!(loaded.flow, Some(FlowKind::CreateGroup));
        assert_eq!(storage.active_users().await, vec![7]);
    }
}
