/// Team listing types
///
/// The team page shows registered users and pending invitations side by side.
/// Rather than an ad hoc merged object, the heterogeneous list is a tagged
/// union discriminated by a `"status"` field on the wire:
///
/// ```json
/// { "status": "active",  "id": "...", "name": "...", "email": "...", "role": "member" }
/// { "status": "pending", "id": "...", "email": "...", "role": "member", "invited_by": "...", "created_at": "..." }
/// ```
///
/// Pending entries expose a display subset of the invitation; the acceptance
/// token never appears in team listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::invitation::Invitation;
use super::user::{UserPublic, UserRole};

/// Display subset of a pending invitation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingInvite {
    /// Invitation ID
    pub id: Uuid,

    /// Invited email address
    pub email: String,

    /// Role granted on acceptance
    pub role: UserRole,

    /// User who sent the invitation
    pub invited_by: Uuid,

    /// When the invitation was created
    pub created_at: DateTime<Utc>,
}

impl From<Invitation> for PendingInvite {
    fn from(invitation: Invitation) -> Self {
        Self {
            id: invitation.id,
            email: invitation.email,
            role: invitation.role,
            invited_by: invitation.invited_by,
            created_at: invitation.created_at,
        }
    }
}

/// One entry in the team listing
///
/// Active members come first, then pending invitations, each group in
/// underlying storage order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TeamEntry {
    /// A registered user
    Active(UserPublic),

    /// An outstanding invitation
    Pending(PendingInvite),
}

impl TeamEntry {
    /// Returns the entry's email address
    pub fn email(&self) -> &str {
        match self {
            TeamEntry::Active(user) => &user.email,
            TeamEntry::Pending(invite) => &invite.email,
        }
    }

    /// Whether this entry is a registered user
    pub fn is_active(&self) -> bool {
        matches!(self, TeamEntry::Active(_))
    }
}

/// Response envelope for the team listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamList {
    /// Active members followed by pending invitations
    pub members: Vec<TeamEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invitation::InvitationStatus;

    #[test]
    fn test_active_entry_tagged_on_wire() {
        let entry = TeamEntry::Active(UserPublic {
            id: Uuid::new_v4(),
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            role: UserRole::Admin,
        });

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["status"], "active");
        assert_eq!(json["role"], "admin");
        assert!(entry.is_active());
    }

    #[test]
    fn test_pending_entry_hides_token() {
        let invitation = Invitation {
            id: Uuid::new_v4(),
            email: "new@example.com".to_string(),
            role: UserRole::Member,
            status: InvitationStatus::Pending,
            invited_by: Uuid::new_v4(),
            token: "deadbeef".to_string(),
            created_at: Utc::now(),
        };

        let entry = TeamEntry::Pending(invitation.into());
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["status"], "pending");
        assert!(json.get("token").is_none());
        assert_eq!(entry.email(), "new@example.com");
        assert!(!entry.is_active());
    }

    #[test]
    fn test_entry_roundtrip() {
        let entry = TeamEntry::Pending(PendingInvite {
            id: Uuid::new_v4(),
            email: "new@example.com".to_string(),
            role: UserRole::Member,
            invited_by: Uuid::new_v4(),
            created_at: Utc::now(),
        });

        let json = serde_json::to_string(&entry).unwrap();
        let back: TeamEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.email(), "new@example.com");
    }
}
