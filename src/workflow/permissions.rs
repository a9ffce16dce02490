// src/workflow/permissions.rs

use crate::models::auth::Role;

/// Ações controladas por cargo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Edit,
    // Aprovar, reprovar e reverter
    Review,
    Delete,
    ViewUsers,
    ManageUsers,
}

impl Action {
    pub fn minimum_role(self) -> Role {
        match self {
            Action::Read | Action::Create => Role::Attendant,
            Action::Edit | Action::Review | Action::ViewUsers => Role::Manager,
            Action::Delete | Action::ManageUsers => Role::Superadmin,
        }
    }
}

impl Role {
    pub fn can(self, action: Action) -> bool {
        self >= action.minimum_role()
    }
}

/// Quais logs cada cargo enxerga.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogScope {
    All,
    OwnAndAttendants,
    Own,
}

pub fn log_scope(role: Role) -> LogScope {
    match role {
        Role::Superadmin => LogScope::All,
        Role::Manager => LogScope::OwnAndAttendants,
        Role::Attendant => LogScope::Own,
    }
}
