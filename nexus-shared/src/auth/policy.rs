/// Access-control policy
///
/// A fixed decision table over `(role, action)`, not a rule engine:
///
/// | Action                      | Admin | Member |
/// |-----------------------------|-------|--------|
/// | Create/Update/DeleteProject | yes   | no     |
/// | ViewProjects                | yes   | yes    |
/// | Create/Update/DeleteTask    | yes   | yes    |
/// | ViewTasks                   | yes   | yes    |
/// | InviteMember                | yes   | yes    |
/// | ViewTeam                    | yes   | yes    |
///
/// Task operations deliberately ignore assignment and project membership:
/// any authenticated user may act on any task. Listing applies no row-level
/// filtering either.
///
/// # Example
///
/// ```
/// use nexus_shared::auth::policy::{require, Action};
/// use nexus_shared::models::user::UserRole;
///
/// assert!(require(UserRole::Admin, Action::CreateProject).is_ok());
/// assert!(require(UserRole::Member, Action::CreateProject).is_err());
/// assert!(require(UserRole::Member, Action::UpdateTask).is_ok());
/// ```

use crate::models::user::UserRole;

/// Operation classes gated by the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create a project
    CreateProject,

    /// Update any project field
    UpdateProject,

    /// Delete a project
    DeleteProject,

    /// List or get projects
    ViewProjects,

    /// Create a task
    CreateTask,

    /// Update any task field
    UpdateTask,

    /// Delete a task
    DeleteTask,

    /// List tasks
    ViewTasks,

    /// Invite a teammate
    InviteMember,

    /// List team members and pending invitations
    ViewTeam,
}

impl Action {
    /// Human-readable description used in denial messages
    pub fn describe(&self) -> &'static str {
        match self {
            Action::CreateProject => "create project",
            Action::UpdateProject => "update project",
            Action::DeleteProject => "delete project",
            Action::ViewProjects => "view projects",
            Action::CreateTask => "create task",
            Action::UpdateTask => "update task",
            Action::DeleteTask => "delete task",
            Action::ViewTasks => "view tasks",
            Action::InviteMember => "invite member",
            Action::ViewTeam => "view team",
        }
    }
}

/// Error type for policy denials
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// The principal's role does not permit the action
    #[error("Not authorized to {}", .action.describe())]
    Denied {
        /// The denied action
        action: Action,

        /// The principal's role
        role: UserRole,
    },
}

/// Decides whether a role may perform an action
pub fn allows(role: UserRole, action: Action) -> bool {
    match action {
        // Project mutation is admin-only
        Action::CreateProject | Action::UpdateProject | Action::DeleteProject => {
            role == UserRole::Admin
        }

        // Everything else requires only an authenticated session
        Action::ViewProjects
        | Action::CreateTask
        | Action::UpdateTask
        | Action::DeleteTask
        | Action::ViewTasks
        | Action::InviteMember
        | Action::ViewTeam => true,
    }
}

/// Checks the decision table and errors on denial
///
/// Denials must happen before any state change; callers run this check first
/// in every mutating handler.
pub fn require(role: UserRole, action: Action) -> Result<(), PolicyError> {
    if allows(role, action) {
        Ok(())
    } else {
        Err(PolicyError::Denied { action, role })
    }
}
