//! Role menu registry
//!
//! The closed (role, label) table driving menu dispatch. The table is built
//! once at startup and validated exhaustively, so a menu action without an
//! entry, a label collision, or a role/flow mismatch aborts boot instead of
//! surfacing as a dead button at runtime.

use crate::models::user::Role;
use crate::state::flows::FlowKind;
use crate::utils::errors::{CampusBotError, Result};

/// Reserved reply-keyboard label that aborts any active flow.
pub const CANCEL_LABEL: &str = "❌ Cancel";

/// Reserved inline-button token with the same meaning.
pub const CANCEL_CALLBACK: &str = "cancel";

/// Every menu-triggered action in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    // Admin
    CreateGroup,
    DeleteGroup,
    AssignGroup,
    UnassignGroup,
    ChangeRole,
    Broadcast,
    AddAdmin,
    // Teacher
    RecordGrade,
    AddScheduleSlot,
    MessageStudent,
    ViewGroupSchedule,
    // Student
    ViewMySchedule,
    ViewMyGrades,
    MessageTeacher,
}

impl MenuAction {
    pub const ALL: [MenuAction; 14] = [
        MenuAction::CreateGroup,
        MenuAction::DeleteGroup,
        MenuAction::AssignGroup,
        MenuAction::UnassignGroup,
        MenuAction::ChangeRole,
        MenuAction::Broadcast,
        MenuAction::AddAdmin,
        MenuAction::RecordGrade,
        MenuAction::AddScheduleSlot,
        MenuAction::MessageStudent,
        MenuAction::ViewGroupSchedule,
        MenuAction::ViewMySchedule,
        MenuAction::ViewMyGrades,
        MenuAction::MessageTeacher,
    ];

    /// The flow this action starts, when it starts one. Schedule and grade
    /// views for students are direct queries without a flow.
    pub fn flow(self) -> Option<FlowKind> {
        match self {
            MenuAction::CreateGroup => Some(FlowKind::CreateGroup),
            MenuAction::DeleteGroup => Some(FlowKind::DeleteGroup),
            MenuAction::AssignGroup => Some(FlowKind::AssignGroup),
            MenuAction::UnassignGroup => Some(FlowKind::UnassignGroup),
            MenuAction::ChangeRole => Some(FlowKind::ChangeRole),
            MenuAction::Broadcast => Some(FlowKind::Broadcast),
            MenuAction::AddAdmin => Some(FlowKind::AddAdmin),
            MenuAction::RecordGrade => Some(FlowKind::RecordGrade),
            MenuAction::AddScheduleSlot => Some(FlowKind::AddScheduleSlot),
            MenuAction::MessageStudent => Some(FlowKind::MessageStudent),
            MenuAction::ViewGroupSchedule => Some(FlowKind::ViewGroupSchedule),
            MenuAction::MessageTeacher => Some(FlowKind::MessageTeacher),
            MenuAction::ViewMySchedule | MenuAction::ViewMyGrades => None,
        }
    }
}

/// One row of the menu table.
#[derive(Debug, Clone)]
pub struct MenuEntry {
    pub label: &'static str,
    pub role: Role,
    pub action: MenuAction,
}

/// The fixed menu table.
#[derive(Debug, Clone)]
pub struct MenuRegistry {
    entries: Vec<MenuEntry>,
}

impl MenuRegistry {
    pub fn new() -> Self {
        let entries = vec![
            // Admin menu
            MenuEntry { label: "📚 Create group", role: Role::Admin, action: MenuAction::CreateGroup },
            MenuEntry { label: "🗑 Delete group", role: Role::Admin, action: MenuAction::DeleteGroup },
            MenuEntry { label: "➕ Assign to group", role: Role::Admin, action: MenuAction::AssignGroup },
            MenuEntry { label: "➖ Remove from group", role: Role::Admin, action: MenuAction::UnassignGroup },
            MenuEntry { label: "🎓 Change role", role: Role::Admin, action: MenuAction::ChangeRole },
            MenuEntry { label: "📢 Broadcast", role: Role::Admin, action: MenuAction::Broadcast },
            MenuEntry { label: "👤 Add administrator", role: Role::Admin, action: MenuAction::AddAdmin },
            // Teacher menu
            MenuEntry { label: "📝 Record grade", role: Role::Teacher, action: MenuAction::RecordGrade },
            MenuEntry { label: "📅 Add schedule slot", role: Role::Teacher, action: MenuAction::AddScheduleSlot },
            MenuEntry { label: "📨 Message a student", role: Role::Teacher, action: MenuAction::MessageStudent },
            MenuEntry { label: "📊 View group schedule", role: Role::Teacher, action: MenuAction::ViewGroupSchedule },
            // Student menu
            MenuEntry { label: "📅 My schedule", role: Role::Student, action: MenuAction::ViewMySchedule },
            MenuEntry { label: "📊 My grades", role: Role::Student, action: MenuAction::ViewMyGrades },
            MenuEntry { label: "📨 Message a teacher", role: Role::Student, action: MenuAction::MessageTeacher },
        ];

        Self { entries }
    }

    /// Startup validation of the table.
    pub fn validate(&self) -> Result<()> {
        for action in MenuAction::ALL {
            let count = self
                .entries
                .iter()
                .filter(|entry| entry.action == action)
                .count();
            if count != 1 {
                return Err(CampusBotError::Config(format!(
                    "menu action {action:?} has {count} entries, expected exactly 1"
                )));
            }
        }

        for (index, entry) in self.entries.iter().enumerate() {
            if self.entries[..index].iter().any(|e| e.label == entry.label) {
                return Err(CampusBotError::Config(format!(
                    "duplicate menu label '{}'",
                    entry.label
                )));
            }
            if entry.label == CANCEL_LABEL {
                return Err(CampusBotError::Config(
                    "menu label collides with the cancel label".to_string(),
                ));
            }
            if let Some(flow) = entry.action.flow() {
                if flow.required_role() != entry.role {
                    return Err(CampusBotError::Config(format!(
                        "menu entry '{}' is gated to {:?} but flow {:?} requires {:?}",
                        entry.label,
                        entry.role,
                        flow,
                        flow.required_role()
                    )));
                }
            }
        }

        for role in Role::ALL {
            if !self.entries.iter().any(|entry| entry.role == role) {
                return Err(CampusBotError::Config(format!(
                    "role {role} has no menu entries"
                )));
            }
        }

        Ok(())
    }

    /// Look a label up in the acting role's menu. Labels belonging to other
    /// roles resolve to nothing.
    pub fn resolve(&self, role: Role, input: &str) -> Option<MenuAction> {
        self.entries
            .iter()
            .find(|entry| entry.role == role && entry.label == input)
            .map(|entry| entry.action)
    }

    /// True for any input that is a menu label of any role, or the cancel
    /// label. Reserved inputs are never fed to flow field handlers.
    pub fn is_reserved(&self, input: &str) -> bool {
        input == CANCEL_LABEL || self.entries.iter().any(|entry| entry.label == input)
    }

    /// The labels shown on a role's main menu, in table order.
    pub fn labels_for(&self, role: Role) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|entry| entry.role == role)
            .map(|entry| entry.label)
            .collect()
    }
}

impl Default for MenuRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_validates() {
        MenuRegistry::new().validate().unwrap();
    }

    #[test]
    fn test_resolve_respects_role() {
        let registry = MenuRegistry::new();
        assert_eq!(
            registry.resolve(Role::Admin, "📢 Broadcast"),
            Some(MenuAction::Broadcast)
        );
        assert_eq!(registry.resolve(Role::Student, "📢 Broadcast"), None);
        assert_eq!(registry.resolve(Role::Teacher, "not a label"), None);
    }

    #[test]
    fn test_reserved_labels() {
        let registry = MenuRegistry::new();
        assert!(registry.is_reserved(CANCEL_LABEL));
        assert!(registry.is_reserved("📅 My schedule"));
        assert!(!registry.is_reserved("Math"));
    }

    #[test]
    fn test_every_flow_is_reachable_from_a_menu() {
        let registry = MenuRegistry::new();
        for flow in crate::state::flows::FlowKind::ALL {
            let reachable = MenuAction::ALL
                .iter()
                .any(|action| action.flow() == Some(flow));
            assert!(reachable, "{flow:?} has no menu entry");
            let entry_role = registry
                .entries
                .iter()
                .find(|entry| entry.action.flow() == Some(flow))
                .map(|entry| entry.role);
            assert_eq!(entry_role, Some(flow.required_role()));
        }
    }

    #[test]
    fn test_labels_for_role() {
        let registry = MenuRegistry::new();
        let student_labels = registry.labels_for(Role::Student);
        assert_eq!(
            student_labels,
            vec!["📅 My schedule", "📊 My grades", "📨 Message a teacher"]
        );
    }
}
