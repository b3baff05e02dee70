//! Flow catalogue
//!
//! Every multi-step dialogue the bot can run is one variant of [`FlowKind`]
//! with a fixed, ordered list of named fields. The catalogue is closed: the
//! dispatcher matches on the enum, so a flow without a handler fails to
//! compile rather than at runtime.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::user::Role;
use crate::utils::errors::{CampusBotError, Result};
use crate::utils::helpers;

/// The closed set of multi-step dialogues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowKind {
    CreateGroup,
    DeleteGroup,
    AssignGroup,
    UnassignGroup,
    ChangeRole,
    Broadcast,
    AddAdmin,
    RecordGrade,
    AddScheduleSlot,
    ViewGroupSchedule,
    MessageStudent,
    MessageTeacher,
}

/// One named field within a flow, collected from a single inbound event.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// How a field's raw input is validated and canonicalized.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Free text, must be non-empty after trimming.
    Text,
    /// A username, with or without the leading @.
    Handle,
    /// An integer within an inclusive range.
    Number { min: i64, max: i64 },
    /// Day of week, 1-6, accepted as a number or a weekday name.
    Day,
    /// One of the option tokens presented when the field was prompted.
    Choice,
}

impl FlowKind {
    pub const ALL: [FlowKind; 12] = [
        FlowKind::CreateGroup,
        FlowKind::DeleteGroup,
        FlowKind::AssignGroup,
        FlowKind::UnassignGroup,
        FlowKind::ChangeRole,
        FlowKind::Broadcast,
        FlowKind::AddAdmin,
        FlowKind::RecordGrade,
        FlowKind::AddScheduleSlot,
        FlowKind::ViewGroupSchedule,
        FlowKind::MessageStudent,
        FlowKind::MessageTeacher,
    ];

    /// The role allowed to start this flow. Enforced by the router before
    /// the flow ever starts, not by the state machine itself.
    pub fn required_role(self) -> Role {
        match self {
            FlowKind::CreateGroup
            | FlowKind::DeleteGroup
            | FlowKind::AssignGroup
            | FlowKind::UnassignGroup
            | FlowKind::ChangeRole
            | FlowKind::Broadcast
            | FlowKind::AddAdmin => Role::Admin,
            FlowKind::RecordGrade
            | FlowKind::AddScheduleSlot
            | FlowKind::ViewGroupSchedule
            | FlowKind::MessageStudent => Role::Teacher,
            FlowKind::MessageTeacher => Role::Student,
        }
    }

    /// The ordered field list for this flow.
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            FlowKind::CreateGroup => &[FieldSpec {
                name: "group_name",
                kind: FieldKind::Text,
            }],
            FlowKind::DeleteGroup => &[FieldSpec {
                name: "group",
                kind: FieldKind::Choice,
            }],
            FlowKind::AssignGroup => &[
                FieldSpec {
                    name: "target",
                    kind: FieldKind::Choice,
                },
                FieldSpec {
                    name: "group",
                    kind: FieldKind::Choice,
                },
            ],
            FlowKind::UnassignGroup => &[FieldSpec {
                name: "target",
                kind: FieldKind::Choice,
            }],
            FlowKind::ChangeRole => &[
                FieldSpec {
                    name: "target",
                    kind: FieldKind::Choice,
                },
                FieldSpec {
                    name: "role",
                    kind: FieldKind::Choice,
                },
            ],
            FlowKind::Broadcast => &[FieldSpec {
                name: "body",
                kind: FieldKind::Text,
            }],
            FlowKind::AddAdmin => &[FieldSpec {
                name: "handle",
                kind: FieldKind::Handle,
            }],
            FlowKind::RecordGrade => &[
                FieldSpec {
                    name: "student",
                    kind: FieldKind::Choice,
                },
                FieldSpec {
                    name: "subject",
                    kind: FieldKind::Text,
                },
                FieldSpec {
                    name: "value",
                    kind: FieldKind::Choice,
                },
            ],
            FlowKind::AddScheduleSlot => &[
                FieldSpec {
                    name: "group",
                    kind: FieldKind::Choice,
                },
                FieldSpec {
                    name: "day",
                    kind: FieldKind::Day,
                },
                FieldSpec {
                    name: "lesson",
                    kind: FieldKind::Number { min: 1, max: 8 },
                },
                FieldSpec {
                    name: "subject",
                    kind: FieldKind::Text,
                },
            ],
            FlowKind::ViewGroupSchedule => &[FieldSpec {
                name: "group",
                kind: FieldKind::Choice,
            }],
            FlowKind::MessageStudent => &[
                FieldSpec {
                    name: "student",
                    kind: FieldKind::Choice,
                },
                FieldSpec {
                    name: "body",
                    kind: FieldKind::Text,
                },
            ],
            FlowKind::MessageTeacher => &[
                FieldSpec {
                    name: "teacher",
                    kind: FieldKind::Choice,
                },
                FieldSpec {
                    name: "body",
                    kind: FieldKind::Text,
                },
            ],
        }
    }
}

/// Validate raw input against a field spec and return the canonical value
/// to collect. `options` is the token set stored when a choice field was
/// presented; it is ignored for other kinds.
///
/// Failure is always `CampusBotError::Validation` with a user-facing
/// message; the flow stays on the same field and the user is asked again.
pub fn validate_field(spec: &FieldSpec, input: &str, options: &[String]) -> Result<Value> {
    let input = input.trim();

    match &spec.kind {
        FieldKind::Text => {
            if input.is_empty() {
                return Err(CampusBotError::Validation(
                    "Please send a non-empty text message.".to_string(),
                ));
            }
            Ok(Value::from(input))
        }
        FieldKind::Handle => {
            let handle = helpers::normalize_handle(input);
            if !helpers::is_valid_handle(&handle) {
                return Err(CampusBotError::Validation(
                    "That does not look like a username. Send it like @username.".to_string(),
                ));
            }
            Ok(Value::from(handle))
        }
        FieldKind::Number { min, max } => {
            let number: i64 = input.parse().map_err(|_| {
                CampusBotError::Validation(format!("Please send a number from {min} to {max}."))
            })?;
            if number < *min || number > *max {
                return Err(CampusBotError::Validation(format!(
                    "The number must be from {min} to {max}."
                )));
            }
            Ok(Value::from(number))
        }
        FieldKind::Day => {
            let day = input
                .parse::<i64>()
                .ok()
                .filter(|d| (1..=6).contains(d))
                .or_else(|| helpers::day_number(input));
            match day {
                Some(day) => Ok(Value::from(day)),
                None => Err(CampusBotError::Validation(
                    "Please pick a day of the week, Monday through Saturday.".to_string(),
                )),
            }
        }
        FieldKind::Choice => {
            if options.iter().any(|token| token.as_str() == input) {
                Ok(Value::from(input))
            } else {
                Err(CampusBotError::Validation(
                    "Please pick one of the offered options.".to_string(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn no_options() -> Vec<String> {
        Vec::new()
    }

    #[test]
    fn test_every_flow_has_fields() {
        for flow in FlowKind::ALL {
            assert!(!flow.fields().is_empty(), "{flow:?} has no fields");
        }
    }

    #[test]
    fn test_record_grade_field_order() {
        let names: Vec<&str> = FlowKind::RecordGrade
            .fields()
            .iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["student", "subject", "value"]);
    }

    #[test]
    fn test_text_rejects_blank() {
        let spec = FieldSpec {
            name: "subject",
            kind: FieldKind::Text,
        };
        assert_matches!(
            validate_field(&spec, "   ", &no_options()),
            Err(CampusBotError::Validation(_))
        );
        assert_eq!(
            validate_field(&spec, " Math ", &no_options()).unwrap(),
            Value::from("Math")
        );
    }

    #[test]
    fn test_number_range() {
        let spec = FieldSpec {
            name: "lesson",
            kind: FieldKind::Number { min: 1, max: 8 },
        };
        assert_eq!(validate_field(&spec, "3", &no_options()).unwrap(), Value::from(3));
        assert_matches!(
            validate_field(&spec, "9", &no_options()),
            Err(CampusBotError::Validation(_))
        );
        assert_matches!(
            validate_field(&spec, "three", &no_options()),
            Err(CampusBotError::Validation(_))
        );
    }

    #[test]
    fn test_day_accepts_names_and_numbers() {
        let spec = FieldSpec {
            name: "day",
            kind: FieldKind::Day,
        };
        assert_eq!(validate_field(&spec, "2", &no_options()).unwrap(), Value::from(2));
        assert_eq!(
            validate_field(&spec, "Friday", &no_options()).unwrap(),
            Value::from(5)
        );
        assert_matches!(
            validate_field(&spec, "7", &no_options()),
            Err(CampusBotError::Validation(_))
        );
        assert_matches!(
            validate_field(&spec, "Sunday", &no_options()),
            Err(CampusBotError::Validation(_))
        );
    }

    #[test]
    fn test_choice_membership() {
        let spec = FieldSpec {
            name: "value",
            kind: FieldKind::Choice,
        };
        let options = vec!["2".to_string(), "3".to_string(), "4".to_string(), "5".to_string()];
        assert_eq!(validate_field(&spec, "4", &options).unwrap(), Value::from("4"));
        assert_matches!(
            validate_field(&spec, "6", &options),
            Err(CampusBotError::Validation(_))
        );
    }

    #[test]
    fn test_handle_normalization() {
        let spec = FieldSpec {
            name: "handle",
            kind: FieldKind::Handle,
        };
        assert_eq!(
            validate_field(&spec, "@some_user", &no_options()).unwrap(),
            Value::from("some_user")
        );
        assert_matches!(
            validate_field(&spec, "@!", &no_options()),
            Err(CampusBotError::Validation(_))
        );
    }

    #[test]
    fn test_required_roles() {
        assert_eq!(FlowKind::Broadcast.required_role(), Role::Admin);
        assert_eq!(FlowKind::RecordGrade.required_role(), Role::Teacher);
        assert_eq!(FlowKind::MessageTeacher.required_role(), Role::Student);
    }
}
