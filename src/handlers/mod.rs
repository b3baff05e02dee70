//! Event handling module
//!
//! The role router and the per-role flow handlers, operating over an
//! abstract event boundary: the transport hands in an [`InboundEvent`] and
//! gets back at most one [`Reply`] for the acting user. Notifications to
//! other users go through the notification service instead.

pub mod admin;
pub mod commands;
pub mod dispatch;
pub mod menu;
pub mod student;
pub mod teacher;

pub use dispatch::EventRouter;
pub use menu::{MenuAction, MenuRegistry, CANCEL_CALLBACK, CANCEL_LABEL};

use crate::models::group::Group;
use crate::models::user::{Role, User};
use crate::state::{ConversationContext, FlowKind};
use crate::utils::errors::{CampusBotError, Result};

/// How the input arrived: typed text or a tapped inline option. Selecting
/// an option is equivalent to typing its token.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    Text(String),
    Selection(String),
}

impl EventPayload {
    pub fn value(&self) -> &str {
        match self {
            EventPayload::Text(text) => text,
            EventPayload::Selection(token) => token,
        }
    }
}

/// One inbound event from the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub actor_id: i64,
    pub payload: EventPayload,
}

impl InboundEvent {
    pub fn text(actor_id: i64, text: impl Into<String>) -> Self {
        Self {
            actor_id,
            payload: EventPayload::Text(text.into()),
        }
    }

    pub fn selection(actor_id: i64, token: impl Into<String>) -> Self {
        Self {
            actor_id,
            payload: EventPayload::Selection(token.into()),
        }
    }
}

/// One selectable option: a human label plus the opaque token sent back
/// when the user picks it.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionItem {
    pub label: String,
    pub token: String,
}

impl OptionItem {
    pub fn new(label: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            token: token.into(),
        }
    }
}

/// Keyboard to attach to a reply. Rendering into transport markup happens
/// in the presentation adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum Markup {
    None,
    /// The role's main menu.
    Menu(Role),
    /// Just the cancel button.
    Cancel,
    /// A closed option set for the current choice field.
    Options(Vec<OptionItem>),
}

/// The reply delivered back to the acting user.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub markup: Markup,
}

impl Reply {
    pub fn with_menu(text: impl Into<String>, role: Role) -> Self {
        Self {
            text: text.into(),
            markup: Markup::Menu(role),
        }
    }

    pub fn with_cancel(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markup: Markup::Cancel,
        }
    }

    pub fn with_options(text: impl Into<String>, options: Vec<OptionItem>) -> Self {
        Self {
            text: text.into(),
            markup: Markup::Options(options),
        }
    }
}

/// The active flow of a context, for prompt and terminal handlers.
pub(crate) fn require_flow(context: &ConversationContext) -> Result<FlowKind> {
    context
        .flow
        .ok_or_else(|| CampusBotError::Validation("no active flow".to_string()))
}

/// The name of the field a context is waiting on.
pub(crate) fn require_field(context: &ConversationContext) -> Result<&'static str> {
    context
        .current_field()
        .map(|field| field.name)
        .ok_or_else(|| CampusBotError::Validation("no field to prompt for".to_string()))
}

/// Selectable options for a list of users; the token is the user id.
pub(crate) fn user_options(users: &[User]) -> Vec<OptionItem> {
    users
        .iter()
        .map(|user| OptionItem::new(user.display_name(), user.user_id.to_string()))
        .collect()
}

/// Selectable options for a list of groups; the token is the group id.
pub(crate) fn group_options(groups: &[Group]) -> Vec<OptionItem> {
    groups
        .iter()
        .map(|group| OptionItem::new(group.group_name.clone(), group.group_id.to_string()))
        .collect()
}

/// The tokens of an option set, stored into the context for validation.
pub(crate) fn option_tokens(options: &[OptionItem]) -> Vec<String> {
    options.iter().map(|option| option.token.clone()).collect()
}
