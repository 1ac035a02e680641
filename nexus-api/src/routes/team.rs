/// Team endpoints
///
/// Workspace-wide team listing and email invitations.
///
/// # Endpoints
///
/// - `GET /api/team` - List active members and pending invitations
/// - `POST /api/team/invite` - Invite a teammate by email

use crate::{
    app::{AppState, Principal},
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use nexus_shared::{
    auth::policy::{self, Action},
    models::{
        invitation::{self, CreateInvitation, Invitation},
        team::{TeamEntry, TeamList},
        user::{User, UserRole},
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Invite request
#[derive(Debug, Deserialize, Validate)]
pub struct InviteRequest {
    /// Email address to invite
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Role granted on acceptance (member when omitted)
    #[serde(default)]
    pub role: UserRole,
}

/// Invite response
#[derive(Debug, Serialize, Deserialize)]
pub struct InviteResponse {
    /// The created invitation, including its acceptance token
    pub invitation: Invitation,
}

/// List the team
///
/// Returns one flat list: every registered user tagged `active`, followed
/// by every pending invitation tagged `pending`. Invitation tokens are not
/// part of the listing.
///
/// # Endpoint
///
/// ```text
/// GET /api/team
/// Authorization: Bearer <access_token>
/// ```
///
/// # Response
///
/// ```json
/// {
///   "members": [
///     { "status": "active", "id": "uuid", "name": "Jane", ... },
///     { "status": "pending", "email": "new@example.com", ... }
///   ]
/// }
/// ```
pub async fn get_team(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<TeamList>> {
    policy::require(principal.role, Action::ViewTeam)?;

    let users = User::list_public(&state.db).await?;
    let pending = Invitation::list_pending(&state.db).await?;

    let members = users
        .into_iter()
        .map(TeamEntry::Active)
        .chain(pending.into_iter().map(|i| TeamEntry::Pending(i.into())))
        .collect();

    Ok(Json(TeamList { members }))
}

/// Invite a teammate
///
/// Creates a pending invitation and emails an acceptance link. Mail
/// delivery is best-effort; the invitation is created and returned even
/// when sending fails or no mail credentials are configured.
///
/// # Endpoint
///
/// ```text
/// POST /api/team/invite
/// Authorization: Bearer <access_token>
/// Content-Type: application/json
///
/// {
///   "email": "new@example.com",
///   "role": "member"
/// }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: A user with this email already exists, or an
///   invitation for it is already pending
/// - `422 Unprocessable Entity`: Invalid email
pub async fn invite_member(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<InviteRequest>,
) -> ApiResult<(StatusCode, Json<InviteResponse>)> {
    policy::require(principal.role, Action::InviteMember)?;
    req.validate()?;

    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict(
            "A user with this email already exists".to_string(),
        ));
    }

    if Invitation::find_pending_by_email(&state.db, &req.email)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "An invitation for this email is already pending".to_string(),
        ));
    }

    let token = invitation::generate_token();

    let created = Invitation::create(
        &state.db,
        CreateInvitation {
            email: req.email,
            role: req.role,
            invited_by: principal.user_id,
            token,
        },
    )
    .await?;

    // Never fails the request; misdelivery is logged inside the mailer
    state
        .mailer
        .send_invitation(&created.email, &created.token)
        .await;

    Ok((StatusCode::CREATED, Json(InviteResponse { invitation: created })))
}
