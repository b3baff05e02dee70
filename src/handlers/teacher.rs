//! Teacher handlers
//!
//! Grade recording, schedule management and messaging a student. "My
//! students" is always derived from the schedule, so a teacher sees a
//! student the moment a slot links them to the student's group.

use chrono::Utc;

use crate::handlers::dispatch::EventRouter;
use crate::handlers::{
    group_options, option_tokens, require_field, require_flow, user_options, OptionItem, Reply,
};
use crate::models::grade::NewGrade;
use crate::models::message::NewMessage;
use crate::models::schedule::NewScheduleEntry;
use crate::models::user::{Role, User};
use crate::state::flows::FlowKind;
use crate::state::ConversationContext;
use crate::utils::errors::{CampusBotError, Result};
use crate::utils::helpers;

/// Grades run on the four-point scale. The conversation layer is the only
/// place this set is enforced; the store accepts whatever it is given.
const GRADE_VALUES: [i64; 4] = [2, 3, 4, 5];

pub(crate) async fn start_record_grade(router: &EventRouter, user: &User) -> Result<Reply> {
    let students = router.db.schedule.students_for_teacher(user.user_id).await?;
    if students.is_empty() {
        return Ok(Reply::with_menu("📭 You have no students yet.", Role::Teacher));
    }

    let options = user_options(&students);
    let mut context = ConversationContext::new(user.user_id);
    context.start_flow(FlowKind::RecordGrade);
    context.set_options(option_tokens(&options))?;
    router.states.save_context(&context).await;
    Ok(Reply::with_options("👨‍🎓 Choose a student:", options))
}

pub(crate) async fn start_add_schedule_slot(router: &EventRouter, user: &User) -> Result<Reply> {
    let groups = router.db.groups.list().await?;
    if groups.is_empty() {
        return Ok(Reply::with_menu(
            "📭 There are no groups yet. Ask an administrator to create one.",
            Role::Teacher,
        ));
    }

    let options = group_options(&groups);
    let mut context = ConversationContext::new(user.user_id);
    context.start_flow(FlowKind::AddScheduleSlot);
    context.set_options(option_tokens(&options))?;
    router.states.save_context(&context).await;
    Ok(Reply::with_options("📚 Choose a group:", options))
}

pub(crate) async fn start_view_group_schedule(router: &EventRouter, user: &User) -> Result<Reply> {
    let groups = router.db.groups.list().await?;
    if groups.is_empty() {
        return Ok(Reply::with_menu("📭 There are no groups yet.", Role::Teacher));
    }

    let options = group_options(&groups);
    let mut context = ConversationContext::new(user.user_id);
    context.start_flow(FlowKind::ViewGroupSchedule);
    context.set_options(option_tokens(&options))?;
    router.states.save_context(&context).await;
    Ok(Reply::with_options(
        "📚 Choose a group to view its schedule:",
        options,
    ))
}

pub(crate) async fn start_message_student(router: &EventRouter, user: &User) -> Result<Reply> {
    let students = router.db.schedule.students_for_teacher(user.user_id).await?;
    if students.is_empty() {
        return Ok(Reply::with_menu("📭 You have no students yet.", Role::Teacher));
    }

    let options = user_options(&students);
    let mut context = ConversationContext::new(user.user_id);
    context.start_flow(FlowKind::MessageStudent);
    context.set_options(option_tokens(&options))?;
    router.states.save_context(&context).await;
    Ok(Reply::with_options("👨‍🎓 Choose a student:", options))
}

/// Prompt for the teacher flow field the context just advanced to.
pub(crate) async fn next_prompt(
    _router: &EventRouter,
    context: &mut ConversationContext,
) -> Result<Reply> {
    let flow = require_flow(context)?;
    let field = require_field(context)?;

    match (flow, field) {
        (FlowKind::RecordGrade, "subject") | (FlowKind::AddScheduleSlot, "subject") => {
            Ok(Reply::with_cancel("📚 Enter the subject name:"))
        }
        (FlowKind::RecordGrade, "value") => {
            let options: Vec<OptionItem> = GRADE_VALUES
                .iter()
                .map(|value| OptionItem::new(value.to_string(), value.to_string()))
                .collect();
            context.set_options(option_tokens(&options))?;
            Ok(Reply::with_options("📝 Choose a grade:", options))
        }
        (FlowKind::AddScheduleSlot, "day") => {
            let options: Vec<OptionItem> = (1..=6)
                .map(|day| OptionItem::new(helpers::day_name(day), day.to_string()))
                .collect();
            Ok(Reply::with_options("📅 Choose a day of the week:", options))
        }
        (FlowKind::AddScheduleSlot, "lesson") => {
            let options: Vec<OptionItem> = (1..=8)
                .map(|lesson: i64| OptionItem::new(lesson.to_string(), lesson.to_string()))
                .collect();
            Ok(Reply::with_options("🔢 Choose a lesson number:", options))
        }
        (FlowKind::MessageStudent, "body") => {
            Ok(Reply::with_cancel("📨 Enter the message for the student:"))
        }
        _ => Err(CampusBotError::Validation(format!(
            "no prompt for field '{field}'"
        ))),
    }
}

/// Terminal actions for teacher flows.
pub(crate) async fn finish(
    router: &EventRouter,
    context: &ConversationContext,
    flow: FlowKind,
) -> Result<Reply> {
    match flow {
        FlowKind::RecordGrade => {
            let student_id = context.require_choice_id("student")?;
            let subject = context.require_string("subject")?;
            let value: i64 = context.require_string("value")?.parse().map_err(|_| {
                CampusBotError::Validation("The grade must be a number.".to_string())
            })?;
            if !GRADE_VALUES.contains(&value) {
                return Err(CampusBotError::Validation(
                    "The grade must be 2, 3, 4 or 5.".to_string(),
                ));
            }

            router
                .db
                .grades
                .add(NewGrade {
                    student_id,
                    teacher_id: context.user_id,
                    subject: subject.clone(),
                    grade: value,
                    recorded_at: Utc::now(),
                })
                .await?;

            let student = display_name(router, student_id).await?;
            router
                .notifier
                .notify(
                    student_id,
                    &format!("📊 You received a {value} in '{subject}'."),
                )
                .await;
            Ok(Reply::with_menu(
                format!("✅ Grade {value} in '{subject}' recorded for {student}!"),
                Role::Teacher,
            ))
        }
        FlowKind::AddScheduleSlot => {
            let group_id = context.require_choice_id("group")?;
            let day = context.require_i64("day")?;
            let lesson = context.require_i64("lesson")?;
            let subject = context.require_string("subject")?;

            router
                .db
                .schedule
                .add_entry(NewScheduleEntry {
                    group_id,
                    day_of_week: day,
                    lesson_number: lesson,
                    subject,
                    teacher_id: context.user_id,
                })
                .await?;

            let group = group_name(router, group_id).await?;
            Ok(Reply::with_menu(
                format!("✅ Schedule updated for group {group}!"),
                Role::Teacher,
            ))
        }
        FlowKind::ViewGroupSchedule => {
            let group_id = context.require_choice_id("group")?;
            let slots = router.db.schedule.list_for_group(group_id).await?;
            if slots.is_empty() {
                return Ok(Reply::with_menu(
                    "📭 No schedule entries for this group yet.",
                    Role::Teacher,
                ));
            }
            let group = group_name(router, group_id).await?;
            Ok(Reply::with_menu(
                format!(
                    "📅 Schedule for group {group}:\n\n{}",
                    helpers::format_schedule(&slots)
                ),
                Role::Teacher,
            ))
        }
        FlowKind::MessageStudent => {
            let student_id = context.require_choice_id("student")?;
            let body = context.require_string("body")?;

            router
                .db
                .messages
                .add(NewMessage {
                    from_user_id: context.user_id,
                    to_user_id: student_id,
                    body: body.clone(),
                    sent_at: Utc::now(),
                })
                .await?;

            let teacher = display_name(router, context.user_id).await?;
            router
                .notifier
                .notify(student_id, &format!("📨 Message from {teacher}:\n\n{body}"))
                .await;
            Ok(Reply::with_menu("✅ Message sent!", Role::Teacher))
        }
        _ => Err(CampusBotError::Validation(format!(
            "{flow:?} is not a teacher flow"
        ))),
    }
}

async fn display_name(router: &EventRouter, user_id: i64) -> Result<String> {
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
