//! Event dispatch
//!
//! Routes one inbound event to the handler valid for the actor's stored
//! role and current conversation state. Dispatch precedence, highest first:
//!
//! 1. the cancellation token, regardless of flow state;
//! 2. the active flow's current field, unless the input doubles as a
//!    reserved menu label;
//! 3. the role's menu-label table, with the role re-fetched from the store
//!    on every event so role changes apply on the next interaction;
//! 4. everything else is silently ignored.

use tracing::{debug, warn};

use crate::database::DatabaseService;
use crate::handlers::menu::{MenuAction, MenuRegistry, CANCEL_CALLBACK, CANCEL_LABEL};
use crate::handlers::{admin, student, teacher, EventPayload, InboundEvent, Reply};
use crate::models::user::{Role, User};
use crate::services::NotificationService;
use crate::state::flows::{self, FlowKind};
use crate::state::{ConversationContext, StateStorage};
use crate::utils::errors::{CampusBotError, Result};

/// The role router and conversation engine.
#[derive(Clone)]
pub struct EventRouter {
    pub(crate) db: DatabaseService,
    pub(crate) states: StateStorage,
    pub(crate) menu: MenuRegistry,
    pub(crate) notifier: NotificationService,
    pub(crate) admin_ids: Vec<i64>,
}

impl EventRouter {
    pub fn new(
        db: DatabaseService,
        states: StateStorage,
        menu: MenuRegistry,
        notifier: NotificationService,
        admin_ids: Vec<i64>,
    ) -> Self {
        Self {
            db,
            states,
            menu,
            notifier,
            admin_ids,
        }
    }

    pub fn menu(&self) -> &MenuRegistry {
        &self.menu
    }

    pub fn notifier(&self) -> &NotificationService {
        &self.notifier
    }

    /// Process one inbound event. `None` means the event was ignored.
    pub async fn handle_event(&self, event: InboundEvent) -> Result<Option<Reply>> {
        let actor_id = event.actor_id;
        let input = event.payload.value().trim().to_string();

        debug!(actor_id = actor_id, input = %input, "Dispatching event");

        // 1. Cancellation wins over everything, from any field of any flow.
        if is_cancel(&event.payload) {
            self.states.delete_context(actor_id).await;
            let role = self.actor_role(actor_id).await?;
            return Ok(Some(Reply::with_menu("❌ Action cancelled.", role)));
        }

        // 2. An active flow consumes the event, unless the input is a
        //    reserved menu label.
        if let Some(context) = self.states.load_context(actor_id).await {
            if context.flow.is_some() && !self.menu.is_reserved(&input) {
                return self.advance_flow(context, &input).await;
            }
        }

        // 3. Menu dispatch against the role stored right now.
        let Some(user) = self.db.users.find_by_id(actor_id).await? else {
            debug!(actor_id = actor_id, "Event from unregistered user ignored");
            return Ok(None);
        };
        let Some(action) = self.menu.resolve(user.role, &input) else {
            // 4. Not a menu label for this role: silently ignored.
            return Ok(None);
        };

        debug!(actor_id = actor_id, action = ?action, role = %user.role, "Menu action resolved");
        self.start_action(&user, action).await.map(Some)
    }

    /// The actor's stored role, defaulting to student for unknown users.
    pub(crate) async fn actor_role(&self, actor_id: i64) -> Result<Role> {
        Ok(self
            .db
            .users
            .find_by_id(actor_id)
            .await?
            .map(|user| user.role)
            .unwrap_or(Role::Student))
    }

    /// Start the selected menu action: either a flow's first prompt or a
    /// direct query.
    async fn start_action(&self, user: &User, action: MenuAction) -> Result<Reply> {
        match action {
            MenuAction::CreateGroup => admin::start_create_group(self, user).await,
            MenuAction::DeleteGroup => admin::start_delete_group(self, user).await,
            MenuAction::AssignGroup => admin::start_assign_group(self, user).await,
            MenuAction::UnassignGroup => admin::start_unassign_group(self, user).await,
            MenuAction::ChangeRole => admin::start_change_role(self, user).await,
            MenuAction::Broadcast => admin::start_broadcast(self, user).await,
            MenuAction::AddAdmin => admin::start_add_admin(self, user).await,
            MenuAction::RecordGrade => teacher::start_record_grade(self, user).await,
            MenuAction::AddScheduleSlot => teacher::start_add_schedule_slot(self, user).await,
            MenuAction::MessageStudent => teacher::start_message_student(self, user).await,
            MenuAction::ViewGroupSchedule => teacher::start_view_group_schedule(self, user).await,
            MenuAction::ViewMySchedule => student::view_schedule(self, user).await,
            MenuAction::ViewMyGrades => student::view_grades(self, user).await,
            MenuAction::MessageTeacher => student::start_message_teacher(self, user).await,
        }
    }

    /// Feed one input into the active flow's current field.
    async fn advance_flow(
        &self,
        mut context: ConversationContext,
        input: &str,
    ) -> Result<Option<Reply>> {
        let (flow, field) = match (context.flow, context.current_field()) {
            (Some(flow), Some(field)) => (flow, field),
            _ => {
                warn!(user_id = context.user_id, "Inconsistent conversation context dropped");
                self.states.delete_context(context.user_id).await;
                return Ok(None);
            }
        };

        let options = context.options();
        let value = match flows::validate_field(field, input, &options) {
            Ok(value) => value,
            Err(CampusBotError::Validation(message)) => {
                // Reject: stay on the same field and ask again.
                return Ok(Some(Reply::with_cancel(format!("❌ {message}"))));
            }
            Err(e) => return Err(e),
        };

        // Flow-specific existence checks can also reject the field.
        let value = match self.inspect_field(&mut context, flow, field.name, value).await {
            Ok(value) => value,
            Err(CampusBotError::Validation(message)) => {
                return Ok(Some(Reply::with_cancel(format!("❌ {message}"))));
            }
            Err(e) => return Err(e),
        };

        let field_name = field.name;
        context.set_data(field_name, value)?;

        if context.at_last_field() {
            // Terminal action: report success or failure, clear either way.
            let reply = match self.run_terminal(&context, flow).await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!(user_id = context.user_id, flow = ?flow, error = %e,
                          "Terminal action failed");
                    Reply::with_menu(format!("❌ {e}"), flow.required_role())
                }
            };
            self.states.delete_context(context.user_id).await;
            Ok(Some(reply))
        } else {
            context.advance();
            let reply = self.prompt_field(&mut context, flow).await?;
            self.states.save_context(&context).await;
            Ok(Some(reply))
        }
    }

    /// Existence checks that need the store, keyed by (flow, field).
    async fn inspect_field(
        &self,
        context: &mut ConversationContext,
        flow: FlowKind,
        field_name: &str,
        value: serde_json::Value,
    ) -> Result<serde_json::Value> {
        if flow == FlowKind::AddAdmin && field_name == "handle" {
            let handle = value.as_str().unwrap_or_default().to_string();
            match self.db.users.find_by_handle(&handle).await? {
                Some(target) => {
                    context.set_data("target", target.user_id)?;
                    Ok(value)
                }
                None => Err(CampusBotError::Validation(format!(
                    "No user with handle @{handle} found. They must start the bot first."
                ))),
            }
        } else {
            Ok(value)
        }
    }

    /// Prompt for the field the context just advanced to.
    async fn prompt_field(&self, context: &mut ConversationContext, flow: FlowKind) -> Result<Reply> {
        match flow.required_role() {
            Role::Admin => admin::next_prompt(self, context).await,
            Role::Teacher => teacher::next_prompt(self, context).await,
            Role::Student => student::next_prompt(self, context).await,
        }
    }

    /// Run the flow's terminal action against the data store.
    async fn run_terminal(&self, context: &ConversationContext, flow: FlowKind) -> Result<Reply> {
        match flow.required_role() {
            Role::Admin => admin::finish(self, context, flow).await,
            Role::Teacher => teacher::finish(self, context, flow).await,
            Role::Student => student::finish(self, context, flow).await,
        }
    }
}

/// The cancellation token is recognized the same way in every flow and
/// every field: as the reserved label when typed, as the reserved callback
/// token when tapped.
fn is_cancel(payload: &EventPayload) -> bool {
    match payload {
        EventPayload::Text(text) => text.trim() == CANCEL_LABEL,
        EventPayload::Selection(token) => token == CANCEL_CALLBACK || token == CANCEL_LABEL,
    }
}
