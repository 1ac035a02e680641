/// Database models
///
/// One module per collection, plus the composite team listing:
///
/// - `user`: User accounts and display references
/// - `project`: Projects with member sets
/// - `task`: Tasks on the kanban board
/// - `invitation`: Pending team invitations
/// - `team`: Tagged union of active users and pending invitations

pub mod invitation;
pub mod project;
pub mod task;
pub mod team;
pub mod user;
