//! Helper functions and utilities
//!
//! Day-of-week conversions, user handle normalization, and the plain-text
//! rendering of schedules and grade sheets.

use regex::Regex;

use crate::models::grade::GradeRecord;
use crate::models::schedule::ScheduleSlot;

const DAY_NAMES: [&str; 6] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Convert a weekday name to its 1-6 number. Teaching days run Monday
/// through Saturday; Sunday is not a valid day.
pub fn day_number(name: &str) -> Option<i64> {
    let name = name.trim();
    DAY_NAMES
        .iter()
        .position(|day| day.eq_ignore_ascii_case(name))
        .map(|index| index as i64 + 1)
}

/// Convert a 1-6 day number back to its name.
pub fn day_name(day: i64) -> &'static str {
    match day {
        1..=6 => DAY_NAMES[(day - 1) as usize],
        _ => "Unknown",
    }
}

/// Strip the leading @ and surrounding whitespace from a typed username.
pub fn normalize_handle(raw: &str) -> String {
    raw.trim().trim_start_matches('@').to_string()
}

/// Telegram-style handle: letters, digits and underscores.
pub fn is_valid_handle(handle: &str) -> bool {
    Regex::new(r"^[A-Za-z0-9_]{3,32}$")
        .map(|re| re.is_match(handle))
        .unwrap_or(false)
}

/// Render a group's schedule grouped by day, slots in lesson order.
pub fn format_schedule(slots: &[ScheduleSlot]) -> String {
    if slots.is_empty() {
        return "No schedule entries yet.".to_string();
    }

    let mut lines = Vec::new();
    let mut current_day = None;

    for slot in slots {
        if current_day != Some(slot.day_of_week) {
            if current_day.is_some() {
                lines.push(String::new());
            }
            lines.push(format!("📅 {}:", day_name(slot.day_of_week)));
            current_day = Some(slot.day_of_week);
        }

        let teacher = slot.teacher_name.as_deref().unwrap_or("Unknown");
        lines.push(format!(
            "{}. {} - {}",
            slot.lesson_number, slot.subject, teacher
        ));
    }

    lines.join("\n")
}

/// Render a student's grade sheet grouped by subject, with the per-subject
/// average to two decimal places.
pub fn format_grades(grades: &[GradeRecord]) -> String {
    if grades.is_empty() {
        return "You have no grades yet.".to_string();
    }

    // Group by subject, keeping first-seen subject order.
    let mut subjects: Vec<(&str, Vec<i64>)> = Vec::new();
    for record in grades {
        match subjects.iter_mut().find(|(name, _)| *name == record.subject) {
            Some((_, values)) => values.push(record.grade),
            None => subjects.push((&record.subject, vec![record.grade])),
        }
    }

    let mut lines = vec!["📊 Your grades:".to_string(), String::new()];
    for (subject, values) in subjects {
        let listed: Vec<String> = values.iter().map(|g| g.to_string()).collect();
        let average = values.iter().sum::<i64>() as f64 / values.len() as f64;
        lines.push(format!("📚 {subject}:"));
        lines.push(format!("   Grades: {}", listed.join(", ")));
        lines.push(format!("   Average: {average:.2}"));
        lines.push(String::new());
    }

    lines.join("\n").trim_end().to_string()
}
