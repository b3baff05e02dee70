//! Administrator handlers
//!
//! Flow starts, follow-up prompts and terminal actions for everything on
//! the admin menu: group management, account management, broadcast.

use crate::handlers::dispatch::EventRouter;
use crate::handlers::{
    group_options, option_tokens, require_field, require_flow, user_options, OptionItem, Reply,
};
use crate::models::user::{Role, User};
use crate::state::flows::FlowKind;
use crate::state::ConversationContext;
use crate::utils::errors::{CampusBotError, Result};
use crate::utils::logging;

pub(crate) async fn start_create_group(router: &EventRouter, user: &User) -> Result<Reply> {
    let mut context = ConversationContext::new(user.user_id);
    context.start_flow(FlowKind::CreateGroup);
    router.states.save_context(&context).await;
    Ok(Reply::with_cancel("📚 Enter the name of the new group:"))
}

pub(crate) async fn start_delete_group(router: &EventRouter, user: &User) -> Result<Reply> {
    let groups = router.db.groups.list().await?;
    if groups.is_empty() {
        return Ok(Reply::with_menu("📭 There are no groups yet.", Role::Admin));
    }

    let options = group_options(&groups);
    let mut context = ConversationContext::new(user.user_id);
    context.start_flow(FlowKind::DeleteGroup);
    context.set_options(option_tokens(&options))?;
    router.states.save_context(&context).await;
    Ok(Reply::with_options("🗑 Choose a group to delete:", options))
}

pub(crate) async fn start_assign_group(router: &EventRouter, user: &User) -> Result<Reply> {
    let groups = router.db.groups.list().await?;
    if groups.is_empty() {
        return Ok(Reply::with_menu("📭 There are no groups yet.", Role::Admin));
    }
    let targets = manageable_users(router).await?;
    if targets.is_empty() {
        return Ok(Reply::with_menu("📭 There are no users to manage yet.", Role::Admin));
    }

    let options = user_options(&targets);
    let mut context = ConversationContext::new(user.user_id);
    context.start_flow(FlowKind::AssignGroup);
    context.set_options(option_tokens(&options))?;
    router.states.save_context(&context).await;
    Ok(Reply::with_options("👥 Choose a user:", options))
}

pub(crate) async fn start_unassign_group(router: &EventRouter, user: &User) -> Result<Reply> {
    let targets: Vec<User> = manageable_users(router)
        .await?
        .into_iter()
        .filter(|target| target.group_id.is_some())
        .collect();
    if targets.is_empty() {
        return Ok(Reply::with_menu("📭 Nobody is assigned to a group.", Role::Admin));
    }

    let options = user_options(&targets);
    let mut context = ConversationContext::new(user.user_id);
    context.start_flow(FlowKind::UnassignGroup);
    context.set_options(option_tokens(&options))?;
    router.states.save_context(&context).await;
    Ok(Reply::with_options(
        "👥 Choose a user to remove from their group:",
        options,
    ))
}

pub(crate) async fn start_change_role(router: &EventRouter, user: &User) -> Result<Reply> {
    let targets = manageable_users(router).await?;
    if targets.is_empty() {
        return Ok(Reply::with_menu("📭 There are no users to manage yet.", Role::Admin));
    }

    let options = user_options(&targets);
    let mut context = ConversationContext::new(user.user_id);
    context.start_flow(FlowKind::ChangeRole);
    context.set_options(option_tokens(&options))?;
    router.states.save_context(&context).await;
    Ok(Reply::with_options("👥 Choose a user:", options))
}

pub(crate) async fn start_broadcast(router: &EventRouter, user: &User) -> Result<Reply> {
    let mut context = ConversationContext::new(user.user_id);
    context.start_flow(FlowKind::Broadcast);
    router.states.save_context(&context).await;
    Ok(Reply::with_cancel("📢 Enter the message to broadcast:"))
}

pub(crate) async fn start_add_admin(router: &EventRouter, user: &User) -> Result<Reply> {
    let mut context = ConversationContext::new(user.user_id);
    context.start_flow(FlowKind::AddAdmin);
    router.states.save_context(&context).await;
    Ok(Reply::with_cancel(
        "👤 Enter the username of the new administrator (with or without @):",
    ))
}

/// Prompt for the admin flow field the context just advanced to.
pub(crate) async fn next_prompt(
    router: &EventRouter,
    context: &mut ConversationContext,
) -> Result<Reply> {
    let flow = require_flow(context)?;
    let field = require_field(context)?;

    match (flow, field) {
        (FlowKind::AssignGroup, "group") => {
            let groups = router.db.groups.list().await?;
            let options = group_options(&groups);
            context.set_options(option_tokens(&options))?;
            Ok(Reply::with_options("📚 Choose a group:", options))
        }
        (FlowKind::ChangeRole, "role") => {
            let options = vec![
                OptionItem::new("👨‍🏫 Teacher", Role::Teacher.as_str()),
                OptionItem::new("👨‍🎓 Student", Role::Student.as_str()),
            ];
            context.set_options(option_tokens(&options))?;
            Ok(Reply::with_options("🎓 Choose the new role:", options))
        }
        _ => Err(CampusBotError::Validation(format!(
            "no prompt for field '{field}'"
        ))),
    }
}

/// Terminal actions for admin flows.
pub(crate) async fn finish(
    router: &EventRouter,
    context: &ConversationContext,
    flow: FlowKind,
) -> Result<Reply> {
    match flow {
        FlowKind::CreateGroup => {
            let name = context.require_string("group_name")?;
            if router.db.groups.find_by_name(&name).await?.is_some() {
                return Ok(Reply::with_menu(
                    format!("❌ Group '{name}' already exists."),
                    Role::Admin,
                ));
            }
            router.db.groups.create(&name).await?;
            logging::log_admin_action(context.user_id, "create_group", None);
            Ok(Reply::with_menu(
                format!("✅ Group '{name}' created!"),
                Role::Admin,
            ))
        }
        FlowKind::DeleteGroup => {
            let group_id = context.require_choice_id("group")?;
            let name = group_name(router, group_id).await?;
            router.db.groups.delete(group_id).await?;
            logging::log_admin_action(context.user_id, "delete_group", Some(group_id));
            Ok(Reply::with_menu(
                format!("✅ Group '{name}' deleted."),
                Role::Admin,
            ))
        }
        FlowKind::AssignGroup => {
            let target_id = context.require_choice_id("target")?;
            let group_id = context.require_choice_id("group")?;
            router.db.users.set_group(target_id, Some(group_id)).await?;
            let target = target_name(router, target_id).await?;
            let group = group_name(router, group_id).await?;
            Ok(Reply::with_menu(
                format!("✅ {target} assigned to group {group}!"),
                Role::Admin,
            ))
        }
        FlowKind::UnassignGroup => {
            let target_id = context.require_choice_id("target")?;
            router.db.users.remove_from_group(target_id).await?;
            let target = target_name(router, target_id).await?;
            Ok(Reply::with_menu(
                format!("✅ {target} removed from their group!"),
                Role::Admin,
            ))
        }
        FlowKind::ChangeRole => {
            let target_id = context.require_choice_id("target")?;
            let token = context.require_string("role")?;
            let role = Role::parse(&token).ok_or_else(|| {
                CampusBotError::Validation(format!("'{token}' is not a role"))
            })?;
            router.db.users.set_role(target_id, role).await?;
            logging::log_admin_action(context.user_id, "change_role", Some(target_id));
            router
                .notifier
                .notify(
                    target_id,
                    &format!("ℹ️ Your role was changed to {role}. Use /start to refresh your menu."),
                )
                .await;
            let target = target_name(router, target_id).await?;
            Ok(Reply::with_menu(
                format!("✅ {target} is now a {role}!"),
                Role::Admin,
            ))
        }
        FlowKind::Broadcast => {
            let body = context.require_string("body")?;
            let users = router.db.all_users().await?;
            let recipients: Vec<i64> = users.iter().map(|user| user.user_id).collect();
            let (sent, failed) = router
                .notifier
                .broadcast(&recipients, &format!("📢 Announcement:\n\n{body}"))
                .await;
            Ok(Reply::with_menu(
                format!("✅ Broadcast finished!\nSent: {sent}\nFailed: {failed}"),
                Role::Admin,
            ))
        }
        FlowKind::AddAdmin => {
            let target_id = context.require_i64("target")?;
            let Some(target) = router.db.users.find_by_id(target_id).await? else {
                return Ok(Reply::with_menu(
                    "❌ That user is no longer registered.",
                    Role::Admin,
                ));
            };
            if target.role == Role::Admin {
                return Ok(Reply::with_menu(
                    format!("ℹ️ {} is already an administrator.", target.display_name()),
                    Role::Admin,
                ));
            }
            router.db.users.set_role(target.user_id, Role::Admin).await?;
            logging::log_admin_action(context.user_id, "add_admin", Some(target.user_id));
            router
                .notifier
                .notify(
                    target.user_id,
                    "🎉 You were made an administrator! Use /start to refresh your menu.",
                )
                .await;
            Ok(Reply::with_menu(
                format!("✅ {} is now an administrator!", target.display_name()),
                Role::Admin,
            ))
        }
        _ => Err(CampusBotError::Validation(format!(
            "{flow:?} is not an administrator flow"
        ))),
    }
}

/// Teachers and students; admins manage each other through AddAdmin only.
async fn manageable_users(router: &EventRouter) -> Result<Vec<User>> {
    let mut users = router.db.users.list_by_role(Role::Teacher).await?;
    users.extend(router.db.users.list_by_role(Role::Student).await?);
    Ok(users)
}

async fn target_name(router: &EventRouter, user_id: i64) -> Result<String> {
    Ok(router
        .db
        .users
        .find_by_id(user_id)
        .await?
        .map(|user| user.display_name().to_string())
        .unwrap_or_else(|| "User".to_string()))
}

async fn group_name(router: &EventRouter, group_id: i64) -> Result<String> {
    Ok(router
        .db
        .groups
        .find_by_id(group_id)
        .await?
        .map(|group| group.group_name)
        .unwrap_or_else(|| "Group".to_string()))
}

