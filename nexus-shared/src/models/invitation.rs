/// Invitation model and database operations
///
/// Invitations are created by the team controller and carry an opaque random
/// token embedded into the acceptance link mailed to the invitee. Token-driven
/// acceptance itself is handled outside this core; nothing here flips an
/// invitation to `accepted`.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE invitation_status AS ENUM ('pending', 'accepted');
///
/// CREATE TABLE invitations (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email CITEXT NOT NULL,
///     role user_role NOT NULL DEFAULT 'member',
///     status invitation_status NOT NULL DEFAULT 'pending',
///     invited_by UUID NOT NULL REFERENCES users(id),
///     token VARCHAR(64) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// -- At most one pending invitation per email
/// CREATE UNIQUE INDEX invitations_pending_email_idx
///     ON invitations (email) WHERE status = 'pending';
/// ```

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::user::UserRole;

/// Invitation lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invitation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    /// Sent, not yet acted on
    Pending,

    /// Redeemed via the acceptance link
    Accepted,
}

impl InvitationStatus {
    /// Converts status to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
        }
    }
}

/// Invitation model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Invitation {
    /// Unique invitation ID
    pub id: Uuid,

    /// Invited email address
    pub email: String,

    /// Role granted on acceptance
    pub role: UserRole,

    /// Lifecycle status
    pub status: InvitationStatus,

    /// User who sent the invitation
    pub invited_by: Uuid,

    /// Opaque acceptance token (160 bits, hex-encoded)
    pub token: String,

    /// When the invitation was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new invitation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvitation {
    /// Invited email address
    pub email: String,

    /// Role granted on acceptance
    pub role: UserRole,

    /// User sending the invitation
    pub invited_by: Uuid,

    /// Opaque acceptance token
    pub token: String,
}

/// Generates an opaque acceptance token
///
/// 20 random bytes (160 bits) from the OS RNG, hex-encoded to 40 characters.
/// Enough entropy that acceptance links cannot be guessed.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 20];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

impl Invitation {
    /// Creates a new pending invitation
    ///
    /// The partial unique index on pending emails turns a duplicate-invite
    /// race into a constraint violation, which the API maps to a conflict.
    pub async fn create(pool: &PgPool, data: CreateInvitation) -> Result<Self, sqlx::Error> {
        let invitation = sqlx::query_as::<_, Invitation>(
            r#"
            INSERT INTO invitations (email, role, invited_by, token)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, role, status, invited_by, token, created_at
            "#,
        )
        .bind(data.email)
        .bind(data.role)
        .bind(data.invited_by)
        .bind(data.token)
        .fetch_one(pool)
        .await?;

        Ok(invitation)
    }

    /// Finds a pending invitation for an email address
    pub async fn find_pending_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let invitation = sqlx::query_as::<_, Invitation>(
            r#"
            SELECT id, email, role, status, invited_by, token, created_at
            FROM invitations
            WHERE email = $1 AND status = 'pending'
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(invitation)
    }

    /// Lists all pending invitations in storage order
    pub async fn list_pending(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let invitations = sqlx::query_as::<_, Invitation>(
            r#"
            SELECT id, email, role, status, invited_by, token, created_at
            FROM invitations
            WHERE status = 'pending'
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(invitations)
    }

    /// Counts invitations for an email address, any status
    pub async fn count_by_email(pool: &PgPool, email: &str) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM invitations WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&InvitationStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(InvitationStatus::Accepted.as_str(), "accepted");
    }

    #[test]
    fn test_token_length_and_charset() {
        let token = generate_token();
        assert_eq!(token.len(), 40);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let tokens: HashSet<String> = (0..64).map(|_| generate_token()).collect();
        assert_eq!(tokens.len(), 64);
    }
}
