/// Project model and database operations
///
/// Projects are created and mutated only by admins (see `auth::policy`).
/// The member set is a plain array of user references; order is irrelevant
/// and membership is display-only (the policy does not enforce it).
///
/// # Schema
///
/// ```sql
/// CREATE TYPE project_status AS ENUM ('active', 'completed');
///
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL,
///     start_date DATE NOT NULL,
///     end_date DATE NOT NULL,
///     status project_status NOT NULL DEFAULT 'active',
///     created_by UUID NOT NULL REFERENCES users(id),
///     members UUID[] NOT NULL DEFAULT '{}',
///     color VARCHAR(32) NOT NULL DEFAULT '#6366f1',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use nexus_shared::models::project::{Project, CreateProject};
/// use chrono::NaiveDate;
/// use uuid::Uuid;
///
/// # async fn example(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let project = Project::create(&pool, CreateProject {
///     name: "Launch".to_string(),
///     description: "Q1 launch work".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
///     members: vec![],
///     color: None,
/// }, Uuid::new_v4()).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::user::UserRef;

/// Default display color (indigo)
pub const DEFAULT_COLOR: &str = "#6366f1";

/// Project lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_status", rename_all = "lowercase")]
pub enum ProjectStatus {
    /// Work in progress
    Active,

    /// Closed out
    Completed,
}

impl ProjectStatus {
    /// Converts status to its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "Active",
            ProjectStatus::Completed => "Completed",
        }
    }
}

impl Default for ProjectStatus {
    fn default() -> Self {
        ProjectStatus::Active
    }
}

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Project description
    pub description: String,

    /// Planned start date
    pub start_date: NaiveDate,

    /// Planned end date
    pub end_date: NaiveDate,

    /// Lifecycle status
    pub status: ProjectStatus,

    /// User who created the project (immutable after creation)
    pub created_by: Uuid,

    /// Member user IDs (set semantics, order irrelevant)
    pub members: Vec<Uuid>,

    /// Display color hint
    pub color: String,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Project name
    pub name: String,

    /// Project description
    pub description: String,

    /// Planned start date
    pub start_date: NaiveDate,

    /// Planned end date
    pub end_date: NaiveDate,

    /// Initial member user IDs (may be empty)
    #[serde(default)]
    pub members: Vec<Uuid>,

    /// Display color (defaults to indigo when omitted)
    pub color: Option<String>,
}

/// Input for updating a project
///
/// All fields are optional. Only `Some` fields are written; `created_by`
/// is immutable and cannot be patched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProject {
    /// New name
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New start date
    pub start_date: Option<NaiveDate>,

    /// New end date
    pub end_date: Option<NaiveDate>,

    /// New status
    pub status: Option<ProjectStatus>,

    /// Replacement member set
    pub members: Option<Vec<Uuid>>,

    /// New display color
    pub color: Option<String>,
}

/// Project with user references resolved to display fields
///
/// This is the JSON shape returned by list/get endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectView {
    /// Unique project ID
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Project description
    pub description: String,

    /// Planned start date
    pub start_date: NaiveDate,

    /// Planned end date
    pub end_date: NaiveDate,

    /// Lifecycle status
    pub status: ProjectStatus,

    /// Creator, resolved to display fields (None if dangling)
    pub created_by: Option<UserRef>,

    /// Members, resolved to display fields; dangling references are dropped
    pub members: Vec<UserRef>,

    /// Display color hint
    pub color: String,

    /// When the project was created
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new project
    ///
    /// The creator is recorded as `created_by` and never changes afterwards.
    pub async fn create(
        pool: &PgPool,
        data: CreateProject,
        created_by: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, start_date, end_date, created_by, members, color)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, description, start_date, end_date, status,
                      created_by, members, color, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(created_by)
        .bind(data.members)
        .bind(data.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()))
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, start_date, end_date, status,
                   created_by, members, color, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Checks whether a project exists
    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let (found,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM projects WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;

        Ok(found)
    }

    /// Lists all projects in storage order
    ///
    /// No pagination and no membership filtering: every authenticated user
    /// sees every project.
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, start_date, end_date, status,
                   created_by, members, color, created_at, updated_at
            FROM projects
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Applies a partial update and returns the updated project
    ///
    /// Absent fields keep their current value. Returns `None` if the project
    /// does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        patch: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                start_date = COALESCE($4, start_date),
                end_date = COALESCE($5, end_date),
                status = COALESCE($6, status),
                members = COALESCE($7, members),
                color = COALESCE($8, color),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, start_date, end_date, status,
                      created_by, members, color, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.description)
        .bind(patch.start_date)
        .bind(patch.end_date)
        .bind(patch.status)
        .bind(patch.members)
        .bind(patch.color)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Deletes a project by ID
    ///
    /// Returns whether a row was removed. A zero-row delete is not an error;
    /// the double-delete race resolves to the idempotent outcome. Tasks
    /// referencing the project are left in place (no cascade).
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Resolves user references into a display view
    pub fn into_view(
        self,
        refs: &std::collections::HashMap<Uuid, UserRef>,
    ) -> ProjectView {
        ProjectView {
            id: self.id,
            name: self.name,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status,
            created_by: refs.get(&self.created_by).cloned(),
            members: self
                .members
                .iter()
                .filter_map(|m| refs.get(m).cloned())
                .collect(),
            color: self.color,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&ProjectStatus::Active).unwrap(),
            "\"Active\""
        );
        assert_eq!(
            serde_json::from_str::<ProjectStatus>("\"Completed\"").unwrap(),
            ProjectStatus::Completed
        );
    }

    #[test]
    fn test_status_default_is_active() {
        assert_eq!(ProjectStatus::default(), ProjectStatus::Active);
        assert_eq!(ProjectStatus::Active.as_str(), "Active");
    }

    #[test]
    fn test_create_project_members_default_empty() {
        let input: CreateProject = serde_json::from_str(
            r#"{
                "name": "Launch",
                "description": "Q1 launch",
                "start_date": "2024-01-01",
                "end_date": "2024-02-01"
            }"#,
        )
        .unwrap();

        assert!(input.members.is_empty());
        assert!(input.color.is_none());
    }

    #[test]
    fn test_into_view_drops_dangling_members() {
        let creator = Uuid::new_v4();
        let known = Uuid::new_v4();
        let dangling = Uuid::new_v4();

        let mut refs = HashMap::new();
        refs.insert(
            creator,
            UserRef {
                id: creator,
                name: "Admin".to_string(),
                email: "admin@example.com".to_string(),
            },
        );
        refs.insert(
            known,
            UserRef {
                id: known,
                name: "Member".to_string(),
                email: "member@example.com".to_string(),
            },
        );

        let project = Project {
            id: Uuid::new_v4(),
            name: "Launch".to_string(),
            description: "Q1".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            status: ProjectStatus::Active,
            created_by: creator,
            members: vec![known, dangling],
            color: DEFAULT_COLOR.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let view = project.into_view(&refs);
        assert_eq!(view.created_by.unwrap().name, "Admin");
        assert_eq!(view.members.len(), 1);
        assert_eq!(view.members[0].id, known);
    }
}
