/// Project endpoints
///
/// CRUD for projects. Anyone authenticated may read; creating, updating,
/// and deleting are admin-only.
///
/// # Endpoints
///
/// - `POST /api/projects` - Create project (admin)
/// - `GET /api/projects` - List projects
/// - `GET /api/projects/:id` - Get one project
/// - `PUT /api/projects/:id` - Update project (admin)
/// - `DELETE /api/projects/:id` - Delete project (admin)

use crate::{
    app::{AppState, Principal},
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use nexus_shared::{
    auth::policy::{self, Action},
    models::{
        project::{CreateProject, Project, ProjectView, UpdateProject},
        user::User,
    },
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Delete response
///
/// Deletes are idempotent; the response echoes the requested ID whether or
/// not a row was removed.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteProjectResponse {
    /// ID of the deleted project
    pub id: Uuid,
}

/// Resolves one project's user references into a display view
async fn resolve_view(pool: &PgPool, project: Project) -> ApiResult<ProjectView> {
    let mut ids: Vec<Uuid> = project.members.clone();
    ids.push(project.created_by);

    let refs = User::display_map(pool, &ids).await?;
    Ok(project.into_view(&refs))
}

/// Create a new project
///
/// # Endpoint
///
/// ```text
/// POST /api/projects
/// Authorization: Bearer <access_token>
/// Content-Type: application/json
///
/// {
///   "name": "Website Redesign",
///   "description": "Refresh the marketing site",
///   "start_date": "2024-02-01",
///   "end_date": "2024-04-30",
///   "members": ["uuid", "uuid"],
///   "color": "#8B5CF6"
/// }
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an admin
pub async fn create_project(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CreateProject>,
) -> ApiResult<(StatusCode, Json<ProjectView>)> {
    policy::require(principal.role, Action::CreateProject)?;

    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Project name is required".to_string()));
    }

    let project = Project::create(&state.db, req, principal.user_id).await?;
    let view = resolve_view(&state.db, project).await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// List all projects
///
/// Returns every project with creator and member references resolved to
/// display fields. Dangling member references are dropped from the view.
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<ProjectView>>> {
    policy::require(principal.role, Action::ViewProjects)?;

    let projects = Project::list(&state.db).await?;

    // One lookup for every user referenced by any project
    let mut ids: Vec<Uuid> = Vec::new();
    for project in &projects {
        ids.push(project.created_by);
        ids.extend(project.members.iter().copied());
    }
    ids.sort_unstable();
    ids.dedup();

    let refs = User::display_map(&state.db, &ids).await?;

    let views = projects.into_iter().map(|p| p.into_view(&refs)).collect();
    Ok(Json(views))
}

/// Get a single project
///
/// # Errors
///
/// - `404 Not Found`: No project with this ID
pub async fn get_project(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProjectView>> {
    policy::require(principal.role, Action::ViewProjects)?;

    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let view = resolve_view(&state.db, project).await?;
    Ok(Json(view))
}

/// Update a project
///
/// Partial update; absent fields keep their current value. `created_by`
/// is immutable.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: No project with this ID
pub async fn update_project(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProject>,
) -> ApiResult<Json<ProjectView>> {
    policy::require(principal.role, Action::UpdateProject)?;

    if let Some(name) = &req.name {
        if name.trim().is_empty() {
            return Err(ApiError::BadRequest(
                "Project name cannot be empty".to_string(),
            ));
        }
    }

    let project = Project::update(&state.db, id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let view = resolve_view(&state.db, project).await?;
    Ok(Json(view))
}

/// Delete a project
///
/// Idempotent: deleting an already-deleted project succeeds and returns
/// the same response. Tasks under the project are left in place and become
/// orphans; they stay reachable through their project-scoped listing.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an admin
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteProjectResponse>> {
    policy::require(principal.role, Action::DeleteProject)?;

    let removed = Project::delete(&state.db, id).await?;
    if !removed {
        tracing::debug!(project_id = %id, "delete request for absent project");
    }

    Ok(Json(DeleteProjectResponse { id }))
}
