//! Student handlers
//!
//! Schedule and grade views are direct queries; messaging a teacher is the
//! student's one multi-step flow. The teachers a student can write to are
//! those appearing in their group's schedule.

use chrono::Utc;

use crate::handlers::dispatch::EventRouter;
use crate::handlers::{option_tokens, require_field, require_flow, user_options, Reply};
use crate::models::message::NewMessage;
use crate::models::user::{Role, User};
use crate::state::flows::FlowKind;
use crate::state::ConversationContext;
use crate::utils::errors::{CampusBotError, Result};
use crate::utils::helpers;

pub(crate) async fn view_schedule(router: &EventRouter, user: &User) -> Result<Reply> {
    let Some(group_id) = user.group_id else {
        return Ok(Reply::with_menu(
            "❌ You are not assigned to a group. Ask an administrator.",
            Role::Student,
        ));
    };

    let slots = router.db.schedule.list_for_group(group_id).await?;
    if slots.is_empty() {
        return Ok(Reply::with_menu(
            "📭 No schedule for your group yet.",
            Role::Student,
        ));
    }

    Ok(Reply::with_menu(helpers::format_schedule(&slots), Role::Student))
}

pub(crate) async fn view_grades(router: &EventRouter, user: &User) -> Result<Reply> {
    let grades = router.db.grades.list_for_student(user.user_id).await?;
    Ok(Reply::with_menu(helpers::format_grades(&grades), Role::Student))
}

pub(crate) async fn start_message_teacher(router: &EventRouter, user: &User) -> Result<Reply> {
    let Some(group_id) = user.group_id else {
        return Ok(Reply::with_menu(
            "❌ You are not assigned to a group. Ask an administrator.",
            Role::Student,
        ));
    };

    let teachers = router.db.schedule.teachers_for_group(group_id).await?;
    if teachers.is_empty() {
        return Ok(Reply::with_menu(
            "📭 Your group has no teachers yet.",
            Role::Student,
        ));
    }

    let options = user_options(&teachers);
    let mut context = ConversationContext::new(user.user_id);
    context.start_flow(FlowKind::MessageTeacher);
    context.set_options(option_tokens(&options))?;
    router.states.save_context(&context).await;
    Ok(Reply::with_options("👨‍🏫 Choose a teacher:", options))
}

/// Prompt for the student flow field the context just advanced to.
pub(crate) async fn next_prompt(
    _router: &EventRouter,
    context: &mut ConversationContext,
) -> Result<Reply> {
    let flow = require_flow(context)?;
    let field = require_field(context)?;

    match (flow, field) {
        (FlowKind::MessageTeacher, "body") => {
            Ok(Reply::with_cancel("📨 Enter the message for the teacher:"))
        }
        _ => Err(CampusBotError::Validation(format!(
            "no prompt for field '{field}'"
        ))),
    }
}

/// Terminal actions for student flows.
pub(crate) async fn finish(
    router: &EventRouter,
    context: &ConversationContext,
    flow: FlowKind,
) -> Result<Reply> {
    match flow {
        FlowKind::MessageTeacher => {
            let teacher_id = context.require_choice_id("teacher")?;
            let body = context.require_string("body")?;

            router
                .db
                .messages
                .add(NewMessage {
                    from_user_id: context.user_id,
                    to_user_id: teacher_id,
                    body: body.clone(),
                    sent_at: Utc::now(),
                })
                .await?;

            let student = router
                .db
                .users
                .find_by_id(context.user_id)
                .await?
                .map(|user| user.display_name().to_string())
                .unwrap_or_else(|| "A student".to_string());
            router
                .notifier
                .notify(
                    teacher_id,
                    &format!("📨 Message from student {student}:\n\n{body}"),
                )
                .await;
            Ok(Reply::with_menu("✅ Message sent!", Role::Student))
        }
        _ => Err(CampusBotError::Validation(format!(
            "{flow:?} is not a student flow"
        ))),
    }
}
