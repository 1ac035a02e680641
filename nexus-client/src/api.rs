/// Typed REST client for the Nexus API
///
/// Thin wrapper over `reqwest` that speaks the server's JSON surface and
/// returns the shared model types. Holds the bearer token after login;
/// every authenticated call attaches it automatically.
///
/// # Example
///
/// ```no_run
/// use nexus_client::NexusClient;
///
/// # async fn example() -> Result<(), nexus_client::ClientError> {
/// let mut client = NexusClient::new("http://localhost:5000");
/// let auth = client.login("jane@example.com", "SecurePass123").await?;
/// println!("logged in as {}", auth.user.name);
///
/// let projects = client.list_projects().await?;
/// # Ok(())
/// # }
/// ```

use nexus_shared::models::{
    invitation::Invitation,
    project::{CreateProject, ProjectView, UpdateProject},
    task::{CreateTask, TaskView, UpdateTask},
    team::TeamList,
    user::{UserPublic, UserRole},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

/// Error type for client operations
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (connection refused, timeout, bad TLS)
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,

        /// Server-provided message
        message: String,
    },

    /// An authenticated call was made before logging in
    #[error("Not authenticated; call login() or set_token() first")]
    NotAuthenticated,
}

impl ClientError {
    /// HTTP status of an API error, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Client result type alias
pub type ClientResult<T> = Result<T, ClientError>;

/// Error body shape returned by the server
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[allow(dead_code)]
    error: String,
    message: String,
}

/// Authentication response (register and login share this shape)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    /// The authenticated user
    pub user: UserPublic,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct InviteRequest<'a> {
    email: &'a str,
    role: UserRole,
}

#[derive(Debug, Deserialize)]
struct InviteResponse {
    invitation: Invitation,
}

/// Deleted-entity acknowledgement
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DeletedId {
    /// ID the server acknowledged
    pub id: Uuid,
}

/// Async REST client for the Nexus API
#[derive(Debug, Clone)]
pub struct NexusClient {
    http: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl NexusClient {
    /// Creates a client against the given server base URL
    ///
    /// A trailing slash on the base URL is tolerated.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            http: reqwest::Client::new(),
            base_url,
            access_token: None,
        }
    }

    /// Installs a bearer token obtained out of band
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.access_token = Some(token.into());
    }

    /// Drops the bearer token (logout is purely client-side)
    pub fn clear_token(&mut self) {
        self.access_token = None;
    }

    /// Whether a bearer token is currently installed
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(&self) -> ClientResult<&str> {
        self.access_token
            .as_deref()
            .ok_or(ClientError::NotAuthenticated)
    }

    /// Decodes a response, mapping error statuses to `ClientError::Api`
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = match response.json::<ApiErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        };

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(self.bearer()?)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self
            .http
            .put(self.url(path))
            .bearer_auth(self.bearer()?)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self
            .http
            .delete(self.url(path))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;
        Self::decode(response).await
    }

    // ----- auth -----

    /// Registers a new account and installs its access token
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> ClientResult<AuthResponse> {
        let response = self
            .http
            .post(self.url("/api/auth/register"))
            .json(&RegisterRequest {
                name,
                email,
                password,
            })
            .send()
            .await?;

        let auth: AuthResponse = Self::decode(response).await?;
        self.access_token = Some(auth.access_token.clone());
        Ok(auth)
    }

    /// Logs in and installs the access token
    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let response = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        let auth: AuthResponse = Self::decode(response).await?;
        self.access_token = Some(auth.access_token.clone());
        Ok(auth)
    }

    /// Exchanges a refresh token for a new access token and installs it
    pub async fn refresh(&mut self, refresh_token: &str) -> ClientResult<String> {
        let response = self
            .http
            .post(self.url("/api/auth/refresh"))
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;

        let body: RefreshResponse = Self::decode(response).await?;
        self.access_token = Some(body.access_token.clone());
        Ok(body.access_token)
    }

    /// Fetches the authenticated user's profile
    pub async fn me(&self) -> ClientResult<UserPublic> {
        self.get_json("/api/auth/me").await
    }

    // ----- projects -----

    /// Creates a project (admin-only on the server)
    pub async fn create_project(&self, data: &CreateProject) -> ClientResult<ProjectView> {
        self.post_json("/api/projects", data).await
    }

    /// Lists all projects
    pub async fn list_projects(&self) -> ClientResult<Vec<ProjectView>> {
        self.get_json("/api/projects").await
    }

    /// Fetches one project
    pub async fn get_project(&self, id: Uuid) -> ClientResult<ProjectView> {
        self.get_json(&format!("/api/projects/{}", id)).await
    }

    /// Partially updates a project (admin-only on the server)
    pub async fn update_project(
        &self,
        id: Uuid,
        patch: &UpdateProject,
    ) -> ClientResult<ProjectView> {
        self.put_json(&format!("/api/projects/{}", id), patch).await
    }

    /// Deletes a project (admin-only on the server, idempotent)
    pub async fn delete_project(&self, id: Uuid) -> ClientResult<DeletedId> {
        self.delete_json(&format!("/api/projects/{}", id)).await
    }

    // ----- tasks -----

    /// Creates a task
    pub async fn create_task(&self, data: &CreateTask) -> ClientResult<TaskView> {
        self.post_json("/api/tasks", data).await
    }

    /// Lists the tasks of one project
    pub async fn list_project_tasks(&self, project_id: Uuid) -> ClientResult<Vec<TaskView>> {
        self.get_json(&format!("/api/tasks/project/{}", project_id))
            .await
    }

    /// Partially updates a task
    pub async fn update_task(&self, id: Uuid, patch: &UpdateTask) -> ClientResult<TaskView> {
        self.put_json(&format!("/api/tasks/{}", id), patch).await
    }

    /// Deletes a task
    pub async fn delete_task(&self, id: Uuid) -> ClientResult<DeletedId> {
        self.delete_json(&format!("/api/tasks/{}", id)).await
    }

    // ----- team -----

    /// Lists active members and pending invitations
    pub async fn team(&self) -> ClientResult<TeamList> {
        self.get_json("/api/team").await
    }

    /// Invites a teammate by email
    pub async fn invite(&self, email: &str, role: UserRole) -> ClientResult<Invitation> {
        let body: InviteResponse = self
            .post_json("/api/team/invite", &InviteRequest { email, role })
            .await?;
        Ok(body.invitation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = NexusClient::new("http://localhost:5000/");
        assert_eq!(client.url("/api/team"), "http://localhost:5000/api/team");
    }

    #[test]
    fn test_unauthenticated_bearer_errors() {
        let client = NexusClient::new("http://localhost:5000");
        assert!(matches!(
            client.bearer(),
            Err(ClientError::NotAuthenticated)
        ));
    }

    #[test]
    fn test_token_install_and_clear() {
        let mut client = NexusClient::new("http://localhost:5000");
        assert!(!client.is_authenticated());

        client.set_token("eyJ-some-token");
        assert!(client.is_authenticated());
        assert_eq!(client.bearer().unwrap(), "eyJ-some-token");

        client.clear_token();
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_api_error_status_accessor() {
        let err = ClientError::Api {
            status: 409,
            message: "duplicate".to_string(),
        };
        assert_eq!(err.status(), Some(409));
        assert_eq!(ClientError::NotAuthenticated.status(), None);
    }
}
