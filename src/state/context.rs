//! Conversation context management
//!
//! A context tracks one user's position inside a flow together with the
//! values collected so far. Exactly one context exists per user; an absent
//! context means the user is idle.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::flows::{FieldSpec, FlowKind};
use crate::utils::errors::{CampusBotError, Result};

/// Context key under which the current choice field's option tokens live.
const OPTIONS_KEY: &str = "__options";

/// User conversation context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    /// User id this context belongs to
    pub user_id: i64,
    /// The flow in progress, if any
    pub flow: Option<FlowKind>,
    /// Index of the field currently being collected
    pub field_index: usize,
    /// Collected field values plus presentation bookkeeping
    pub data: HashMap<String, Value>,
    /// When this context was last updated
    pub updated_at: DateTime<Utc>,
}

impl ConversationContext {
    /// Create a new, idle conversation context for a user
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            flow: None,
            field_index: 0,
            data: HashMap::new(),
            updated_at: Utc::now(),
        }
    }

    /// Start a flow, discarding anything collected before.
    pub fn start_flow(&mut self, flow: FlowKind) {
        self.flow = Some(flow);
        self.field_index = 0;
        self.data.clear();
        self.updated_at = Utc::now();
    }

    /// The field currently being collected, if a flow is active.
    pub fn current_field(&self) -> Option<&'static FieldSpec> {
        let flow = self.flow?;
        flow.fields().get(self.field_index)
    }

    /// True when the current field is the flow's last.
    pub fn at_last_field(&self) -> bool {
        match self.flow {
            Some(flow) => self.field_index + 1 >= flow.fields().len(),
            None => false,
        }
    }

    /// Move to the next field.
    pub fn advance(&mut self) {
        self.field_index += 1;
        self.updated_at = Utc::now();
    }

    /// Return to idle, dropping all collected fields. Used for both
    /// completion and cancellation.
    pub fn clear(&mut self) {
        self.flow = None;
        self.field_index = 0;
        self.data.clear();
        self.updated_at = Utc::now();
    }

    /// Store a collected value under a field name.
    pub fn set_data<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value)?;
        self.data.insert(key.to_string(), json_value);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn get_data<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get_data::<String>(key)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get_data::<i64>(key)
    }

    /// Collected string value, required by a terminal action. A missing key
    /// means the flow definition and its terminal action disagree.
    pub fn require_string(&self, key: &str) -> Result<String> {
        self.get_string(key)
            .ok_or_else(|| CampusBotError::Validation(format!("missing collected field '{key}'")))
    }

    /// Collected numeric value, required by a terminal action.
    pub fn require_i64(&self, key: &str) -> Result<i64> {
        self.get_i64(key)
            .ok_or_else(|| CampusBotError::Validation(format!("missing collected field '{key}'")))
    }

    /// Collected choice token parsed as an entity id.
    pub fn require_choice_id(&self, key: &str) -> Result<i64> {
        let token = self.require_string(key)?;
        token.parse().map_err(|_| {
            CampusBotError::Validation(format!("collected field '{key}' is not an id"))
        })
    }

    /// Replace the option tokens for the choice field about to be shown.
    pub fn set_options(&mut self, tokens: Vec<String>) -> Result<()> {
        self.set_data(OPTIONS_KEY, tokens)
    }

    /// Option tokens stored for the current choice field.
    pub fn options(&self) -> Vec<String> {
        self.get_data::<Vec<String>>(OPTIONS_KEY).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_is_idle() {
        let context = ConversationContext::new(123);
        assert_eq!(context.user_id, 123);
        assert!(context.flow.is_none());
        assert!(context.current_field().is_none());
        assert!(context.data.is_empty());
    }

    #[test]
    fn test_start_flow_resets_collected_fields() {
        let mut context = ConversationContext::new(123);
        context.set_data("leftover", "stale").unwrap();

        context.start_flow(FlowKind::RecordGrade);
        assert_eq!(context.flow, Some(FlowKind::RecordGrade));
        assert_eq!(context.field_index, 0);
        assert!(context.data.is_empty());
        assert_eq!(context.current_field().unwrap().name, "student");
    }

    #[test]
    fn test_advance_walks_fields_in_order() {
        let mut context = ConversationContext::new(123);
        context.start_flow(FlowKind::RecordGrade);

        assert!(!context.at_last_field());
        context.advance();
        assert_eq!(context.current_field().unwrap().name, "subject");
        context.advance();
        assert_eq!(context.current_field().unwrap().name, "value");
        assert!(context.at_last_field());
    }

    #[test]
    fn test_clear_returns_to_idle() {
        let mut context = ConversationContext::new(123);
        context.start_flow(FlowKind::Broadcast);
        context.set_data("body", "hello").unwrap();

        context.clear();
        assert!(context.flow.is_none());
        assert!(context.data.is_empty());
        assert_eq!(context.field_index, 0);
    }

    #[test]
    fn test_data_accessors() {
        let mut context = ConversationContext::new(123);
        context.set_data("subject", "Math").unwrap();
        context.set_data("lesson", 4).unwrap();

        assert_eq!(context.get_string("subject"), Some("Math".to_string()));
        assert_eq!(context.get_i64("lesson"), Some(4));
        assert_eq!(context.get_string("missing"), None);
    }

    #[test]
    fn test_options_round_trip() {
        let mut context = ConversationContext::new(123);
        assert!(context.options().is_empty());

        context
            .set_options(vec!["2".to_string(), "3".to_string()])
            .unwrap();
        assert_eq!(context.options(), vec!["2".to_string(), "3".to_string()]);
    }
}
