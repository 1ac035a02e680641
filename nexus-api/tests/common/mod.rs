/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup
/// - Test user creation (one admin, one member)
/// - JWT token generation
/// - Request/response helpers
///
/// Tests run against a real PostgreSQL database named by
/// `TEST_DATABASE_URL`. When the variable is unset the suite skips itself
/// so `cargo test` stays green on machines without a database.

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use nexus_api::app::{build_router, AppState};
use nexus_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig, MailConfig};
use nexus_shared::auth::jwt::{create_token, Claims, TokenType};
use nexus_shared::auth::password::hash_password;
use nexus_shared::models::user::{CreateUser, User, UserRole};
use sqlx::PgPool;
use tower::Service as _;
use uuid::Uuid;

/// JWT secret used by every test token
pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Password assigned to every test user
pub const TEST_PASSWORD: &str = "SecurePass123";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub admin: User,
    pub member: User,
    pub admin_token: String,
    pub member_token: String,
}

impl TestContext {
    /// Creates a test context, or `None` when no test database is configured
    pub async fn try_new() -> Option<Self> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;

        Some(Self::new(&url).await.expect("test context setup failed"))
    }

    async fn new(database_url: &str) -> anyhow::Result<Self> {
        let db = PgPool::connect(database_url).await?;

        // Path relative to Cargo.toml, not this file
        sqlx::migrate!("../migrations").run(&db).await?;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: database_url.to_string(),
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: TEST_JWT_SECRET.to_string(),
            },
            mail: MailConfig {
                smtp_host: "smtp.example.com".to_string(),
                // No credentials: invitation mail is skipped in tests
                username: None,
                password: None,
                base_url: "http://localhost:5173".to_string(),
            },
        };

        let password_hash = hash_password(TEST_PASSWORD)?;

        let admin = User::create(
            &db,
            CreateUser {
                name: "Test Admin".to_string(),
                email: format!("admin-{}@example.com", Uuid::new_v4()),
                password_hash: password_hash.clone(),
                role: UserRole::Admin,
            },
        )
        .await?;

        let member = User::create(
            &db,
            CreateUser {
                name: "Test Member".to_string(),
                email: format!("member-{}@example.com", Uuid::new_v4()),
                password_hash,
                role: UserRole::Member,
            },
        )
        .await?;

        let admin_token = create_token(
            &Claims::new(admin.id, admin.role, TokenType::Access),
            TEST_JWT_SECRET,
        )?;
        let member_token = create_token(
            &Claims::new(member.id, member.role, TokenType::Access),
            TEST_JWT_SECRET,
        )?;

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            admin,
            member,
            admin_token,
            member_token,
        })
    }

    /// Authorization header value for the admin user
    pub fn admin_auth(&self) -> String {
        format!("Bearer {}", self.admin_token)
    }

    /// Authorization header value for the member user
    pub fn member_auth(&self) -> String {
        format!("Bearer {}", self.member_token)
    }

    /// Sends a JSON request through the router
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        auth: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.app.clone().call(request).await.unwrap()
    }
}

/// Decodes a response body as JSON, panicking with the body on failure
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body)
        .unwrap_or_else(|e| panic!("invalid JSON body ({}): {}", e, String::from_utf8_lossy(&body)))
}

/// Asserts a status, printing the body on mismatch
pub async fn expect_status(response: Response<Body>, expected: StatusCode) -> serde_json::Value {
    let status = response.status();
    let body = json_body(response).await;
    assert_eq!(status, expected, "unexpected status; body: {}", body);
    body
}

/// Skips the test when no database is configured
#[macro_export]
macro_rules! require_db {
    () => {
        match common::TestContext::try_new().await {
            Some(ctx) => ctx,
            None => {
                eprintln!("TEST_DATABASE_URL not set; skipping");
                return;
            }
        }
    };
}
