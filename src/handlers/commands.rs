//! Command handlers
//!
//! /start registers the caller and shows their role menu; /help lists what
//! the role can do. Registration preserves an existing row's role and group
//! so a returning admin stays an admin.

use crate::handlers::dispatch::EventRouter;
use crate::handlers::menu::CANCEL_LABEL;
use crate::handlers::Reply;
use crate::models::user::{Role, UpsertUserRequest};
use crate::utils::errors::Result;
use crate::utils::logging;

/// Handle /start: upsert the caller and greet them with their menu.
pub async fn handle_start(
    router: &EventRouter,
    actor_id: i64,
    username: Option<String>,
    full_name: String,
) -> Result<Reply> {
    let existing = router.db.users.find_by_id(actor_id).await?;
    let (role, group_id) = match &existing {
        Some(user) => (user.role, user.group_id),
        None => {
            let role = if router.admin_ids.contains(&actor_id) {
                Role::Admin
            } else {
                Role::Student
            };
            (role, None)
        }
    };

    router
        .db
        .users
        .upsert(UpsertUserRequest {
            user_id: actor_id,
            username,
            full_name: full_name.clone(),
            role,
            group_id,
        })
        .await?;
    logging::log_user_action(actor_id, "start", Some(role.as_str()));

    let greeting = if existing.is_some() {
        format!("👋 Welcome back, {full_name}!")
    } else {
        format!("👋 Welcome, {full_name}! You are registered as a {role}.")
    };
    Ok(Reply::with_menu(greeting, role))
}

/// Handle /help: list the actions available to the caller's role.
pub async fn handle_help(router: &EventRouter, actor_id: i64) -> Result<Reply> {
    let role = router.actor_role(actor_id).await?;
    let mut lines = vec!["ℹ️ Available actions:".to_string()];
    for label in router.menu.labels_for(role) {
        lines.push(format!("  {label}"));
    }
    lines.push(String::new());
    lines.push(format!(
        "Send {CANCEL_LABEL} at any time to abort the current action."
    ));
    Ok(Reply::with_menu(lines.join("\n"), role))
}
