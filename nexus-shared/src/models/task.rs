/// Task model and database operations
///
/// Tasks live on a project's kanban board, partitioned by status. Any
/// authenticated user may create, update, or delete any task; project
/// existence is checked at creation time only.
///
/// `project_id` deliberately carries no foreign key: deleting a project
/// leaves its tasks in place, and a board for a deleted project simply
/// renders orphaned tasks. Creation is a check-then-insert pair with no
/// spanning transaction.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
/// CREATE TYPE task_status AS ENUM ('todo', 'in_progress', 'done');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     priority task_priority NOT NULL DEFAULT 'medium',
///     status task_status NOT NULL DEFAULT 'todo',
///     due_date DATE,
///     project_id UUID NOT NULL,
///     assigned_to UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use nexus_shared::models::task::{Task, CreateTask, TaskStatus};
/// use uuid::Uuid;
///
/// # async fn example(pool: sqlx::PgPool, project_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let task = Task::create(&pool, CreateTask {
///     title: "Ship the landing page".to_string(),
///     project_id,
///     ..Default::default()
/// }).await?;
///
/// assert_eq!(task.status, TaskStatus::ToDo);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::user::UserRef;

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low priority
    Low,

    /// Medium priority (default)
    Medium,

    /// High priority
    High,
}

impl TaskPriority {
    /// Converts priority to its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
        }
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

/// Task board status (kanban column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    /// Not started (default)
    #[sqlx(rename = "todo")]
    #[serde(rename = "To-Do")]
    ToDo,

    /// Being worked on
    #[sqlx(rename = "in_progress")]
    #[serde(rename = "In Progress")]
    InProgress,

    /// Finished
    #[sqlx(rename = "done")]
    #[serde(rename = "Done")]
    Done,
}

impl TaskStatus {
    /// Converts status to its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "To-Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }

    /// All statuses in board column order
    pub const ALL: [TaskStatus; 3] = [TaskStatus::ToDo, TaskStatus::InProgress, TaskStatus::Done];
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::ToDo
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Priority
    pub priority: TaskPriority,

    /// Board status
    pub status: TaskStatus,

    /// Optional due date
    pub due_date: Option<NaiveDate>,

    /// Owning project (immutable; may dangle after project deletion)
    pub project_id: Uuid,

    /// Optional assignee
    pub assigned_to: Option<Uuid>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
///
/// Only `title` and `project_id` are required; priority defaults to Medium
/// and status to To-Do.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTask {
    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Priority (Medium when omitted)
    #[serde(default)]
    pub priority: TaskPriority,

    /// Board status (To-Do when omitted)
    #[serde(default)]
    pub status: TaskStatus,

    /// Optional due date
    pub due_date: Option<NaiveDate>,

    /// Owning project
    pub project_id: Uuid,

    /// Optional assignee
    pub assigned_to: Option<Uuid>,
}

/// Input for partially updating a task
///
/// Used both for inline edits and for single-field status patches issued by
/// board column moves. Nullable columns are double-wrapped so an absent
/// field (keep) and an explicit JSON `null` (clear) stay distinguishable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description; `Some(None)` clears it
    #[serde(default, skip_serializing_if = "Option::is_none", with = "patch_field")]
    pub description: Option<Option<String>>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// New board status
    pub status: Option<TaskStatus>,

    /// New due date; `Some(None)` clears it
    #[serde(default, skip_serializing_if = "Option::is_none", with = "patch_field")]
    pub due_date: Option<Option<NaiveDate>>,

    /// New assignee; `Some(None)` unassigns
    #[serde(default, skip_serializing_if = "Option::is_none", with = "patch_field")]
    pub assigned_to: Option<Option<Uuid>>,
}

/// Serde adapter keeping an absent patch field distinct from an explicit null
mod patch_field {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

/// Task with the assignee resolved to display fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskView {
    /// Unique task ID
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Priority
    pub priority: TaskPriority,

    /// Board status
    pub status: TaskStatus,

    /// Optional due date
    pub due_date: Option<NaiveDate>,

    /// Owning project
    pub project_id: Uuid,

    /// Assignee resolved to display fields (None if unassigned or dangling)
    pub assigned_to: Option<UserRef>,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task
    ///
    /// Callers must verify the referenced project exists first; this insert
    /// does not.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, priority, status, due_date, project_id, assigned_to)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, description, priority, status, due_date,
                      project_id, assigned_to, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.priority)
        .bind(data.status)
        .bind(data.due_date)
        .bind(data.project_id)
        .bind(data.assigned_to)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, priority, status, due_date,
                   project_id, assigned_to, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks for one project in storage order
    ///
    /// An unknown project ID yields an empty list, not an error.
    pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, priority, status, due_date,
                   project_id, assigned_to, created_at, updated_at
            FROM tasks
            WHERE project_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Applies a partial update and returns the updated task
    ///
    /// Absent fields keep their current value; an explicit null clears a
    /// nullable field. Returns `None` if the task does not exist. Concurrent
    /// updates are last-write-wins.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        patch: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let set_description = patch.description.is_some();
        let set_due_date = patch.due_date.is_some();
        let set_assigned_to = patch.assigned_to.is_some();

        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = COALESCE($2, title),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                priority = COALESCE($5, priority),
                status = COALESCE($6, status),
                due_date = CASE WHEN $7 THEN $8 ELSE due_date END,
                assigned_to = CASE WHEN $9 THEN $10 ELSE assigned_to END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, priority, status, due_date,
                      project_id, assigned_to, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.title)
        .bind(set_description)
        .bind(patch.description.flatten())
        .bind(patch.priority)
        .bind(patch.status)
        .bind(set_due_date)
        .bind(patch.due_date.flatten())
        .bind(set_assigned_to)
        .bind(patch.assigned_to.flatten())
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task by ID
    ///
    /// Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Resolves the assignee reference into a display view
    pub fn into_view(
        self,
        refs: &std::collections::HashMap<Uuid, UserRef>,
    ) -> TaskView {
        TaskView {
            id: self.id,
            title: self.title,
            description: self.description,
            priority: self.priority,
            status: self.status,
            due_date: self.due_date,
            project_id: self.project_id,
            assigned_to: self.assigned_to.and_then(|a| refs.get(&a).cloned()),
            created_at: self.created_at,
        }
    }
}
