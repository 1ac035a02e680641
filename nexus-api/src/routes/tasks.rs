/// Task endpoints
///
/// CRUD for tasks. Unlike projects, task mutation is open to every
/// authenticated user regardless of role.
///
/// # Endpoints
///
/// - `POST /api/tasks` - Create task
/// - `GET /api/tasks/project/:project_id` - List tasks in a project
/// - `PUT /api/tasks/:id` - Update task
/// - `DELETE /api/tasks/:id` - Delete task

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
        project::Project,
        task::{CreateTask, Task, TaskView, UpdateTask},
        user::User,
    },
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Delete response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteTaskResponse {
    /// ID of the deleted task
    pub id: Uuid,
}

/// Resolves one task's assignee reference into a display view
async fn resolve_view(pool: &PgPool, task: Task) -> ApiResult<TaskView> {
    let ids: Vec<Uuid> = task.assigned_to.into_iter().collect();
    let refs = User::display_map(pool, &ids).await?;
    Ok(task.into_view(&refs))
}

/// Create a new task
///
/// The owning project must exist at creation time. It is the only moment
/// the link is checked; later project deletion orphans the task without
/// removing it.
///
/// # Endpoint
///
/// ```text
/// POST /api/tasks
/// Authorization: Bearer <access_token>
/// Content-Type: application/json
///
/// {
///   "title": "Draft wireframes",
///   "priority": "High",
///   "project_id": "uuid",
///   "assigned_to": "uuid"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Empty title
/// - `404 Not Found`: Owning project does not exist
pub async fn create_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CreateTask>,
) -> ApiResult<(StatusCode, Json<TaskView>)> {
    policy::require(principal.role, Action::CreateTask)?;

    if req.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Task title is required".to_string()));
    }

    if !Project::exists(&state.db, req.project_id).await? {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    let task = Task::create(&state.db, req).await?;
    let view = resolve_view(&state.db, task).await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// List tasks in a project
///
/// Returns every task whose `project_id` matches, including tasks whose
/// project has since been deleted. Assignees are resolved to display
/// fields; a dangling assignee reads as unassigned.
pub async fn list_tasks_by_project(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<TaskView>>> {
    policy::require(principal.role, Action::ViewTasks)?;

    let tasks = Task::list_by_project(&state.db, project_id).await?;

    let mut ids: Vec<Uuid> = tasks.iter().filter_map(|t| t.assigned_to).collect();
    ids.sort_unstable();
    ids.dedup();

    let refs = User::display_map(&state.db, &ids).await?;

    let views = tasks.into_iter().map(|t| t.into_view(&refs)).collect();
    Ok(Json(views))
}

/// Update a task
///
/// Partial update; absent fields keep their current value, and an explicit
/// `null` clears `description`, `due_date`, or `assigned_to`. `project_id`
/// is immutable. Board column moves arrive here as single-field status
/// patches.
///
/// # Errors
///
/// - `400 Bad Request`: Empty title
/// - `404 Not Found`: No task with this ID
pub async fn update_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTask>,
) -> ApiResult<Json<TaskView>> {
    policy::require(principal.role, Action::UpdateTask)?;

    if let Some(title) = &req.title {
        if title.trim().is_empty() {
            return Err(ApiError::BadRequest(
                "Task title cannot be empty".to_string(),
            ));
        }
    }

    let task = Task::update(&state.db, id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let view = resolve_view(&state.db, task).await?;
    Ok(Json(view))
}

/// Delete a task
///
/// # Errors
///
/// - `404 Not Found`: No task with this ID
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteTaskResponse>> {
    policy::require(principal.role, Action::DeleteTask)?;

    let removed = Task::delete(&state.db, id).await?;
    if !removed {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(Json(DeleteTaskResponse { id }))
}
