/// Integration tests for the Nexus API
///
/// These tests verify the full system works end-to-end:
/// - Authentication and the bearer-JWT layer
/// - Project CRUD with the admin-only mutation policy
/// - Task lifecycle against an existing project
/// - Team listing and invitation conflicts
///
/// Requires `TEST_DATABASE_URL`; the suite skips itself when unset.

mod common;

use axum::http::StatusCode;
use common::{expect_status, TestContext};
use serde_json::json;

/// Creates a project as admin and returns its JSON representation
async fn create_project(ctx: &TestContext, name: &str) -> serde_json::Value {
    let response = ctx
        .request(
            "POST",
            "/api/projects",
            Some(&ctx.admin_auth()),
            Some(json!({
                "name": name,
                "description": "integration test project",
                "start_date": "2024-01-01",
                "end_date": "2024-02-01"
            })),
        )
        .await;

    expect_status(response, StatusCode::CREATED).await
}

#[tokio::test]
async fn test_health_check() {
    let ctx = require_db!();

    let response = ctx.request("GET", "/health", None, None).await;
    let body = expect_status(response, StatusCode::OK).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_requests_without_token_are_rejected() {
    let ctx = require_db!();

    let response = ctx.request("GET", "/api/projects", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = ctx
        .request("GET", "/api/projects", Some("Bearer not-a-token"), None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Wrong scheme is a credentials failure, not a malformed request
    let response = ctx
        .request(
            "GET",
            "/api/projects",
            Some("Basic dXNlcjpwYXNz"),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_login_me_flow() {
    let ctx = require_db!();

    let email = format!("flow-{}@example.com", uuid::Uuid::new_v4());

    let response = ctx
        .request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "name": "Flow User",
                "email": email,
                "password": common::TEST_PASSWORD
            })),
        )
        .await;
    let registered = expect_status(response, StatusCode::OK).await;
    assert_eq!(registered["user"]["email"], email.as_str());
    assert!(registered["user"]["password_hash"].is_null());

    let response = ctx
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({
                "email": email,
                "password": common::TEST_PASSWORD
            })),
        )
        .await;
    let logged_in = expect_status(response, StatusCode::OK).await;
    let token = logged_in["access_token"].as_str().unwrap().to_string();

    let response = ctx
        .request(
            "GET",
            "/api/auth/me",
            Some(&format!("Bearer {}", token)),
            None,
        )
        .await;
    let me = expect_status(response, StatusCode::OK).await;
    assert_eq!(me["email"], email.as_str());

    // Wrong password never authenticates
    let response = ctx
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": "WrongPass123" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_flow() {
    let ctx = require_db!();

    let email = format!("refresh-{}@example.com", uuid::Uuid::new_v4());
    let response = ctx
        .request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "name": "Refresh User",
                "email": email,
                "password": common::TEST_PASSWORD
            })),
        )
        .await;
    let registered = expect_status(response, StatusCode::OK).await;
    let refresh_token = registered["refresh_token"].as_str().unwrap();

    let response = ctx
        .request(
            "POST",
            "/api/auth/refresh",
            None,
            Some(json!({ "refresh_token": refresh_token })),
        )
        .await;
    let refreshed = expect_status(response, StatusCode::OK).await;
    assert!(refreshed["access_token"].is_string());

    // An access token is not accepted where a refresh token is expected
    let access_token = registered["access_token"].as_str().unwrap();
    let response = ctx
        .request(
            "POST",
            "/api/auth/refresh",
            None,
            Some(json!({ "refresh_token": access_token })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Property 1: project creation by a non-admin is rejected, nothing persisted
#[tokio::test]
async fn test_member_cannot_create_project() {
    let ctx = require_db!();

    let name = format!("forbidden-{}", uuid::Uuid::new_v4());
    let response = ctx
        .request(
            "POST",
            "/api/projects",
            Some(&ctx.member_auth()),
            Some(json!({
                "name": name,
                "description": "should never exist",
                "start_date": "2024-01-01",
                "end_date": "2024-02-01"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE name = $1")
        .bind(&name)
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_member_cannot_update_or_delete_project() {
    let ctx = require_db!();

    let project = create_project(&ctx, "Locked Down").await;
    let id = project["id"].as_str().unwrap();

    let response = ctx
        .request(
            "PUT",
            &format!("/api/projects/{}", id),
            Some(&ctx.member_auth()),
            Some(json!({ "name": "Hijacked" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = ctx
        .request(
            "DELETE",
            &format!("/api/projects/{}", id),
            Some(&ctx.member_auth()),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Reads are open to members
    let response = ctx
        .request(
            "GET",
            &format!("/api/projects/{}", id),
            Some(&ctx.member_auth()),
            None,
        )
        .await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["name"], "Locked Down");
}

#[tokio::test]
async fn test_project_update_is_partial() {
    let ctx = require_db!();

    let project = create_project(&ctx, "Partial Patch").await;
    let id = project["id"].as_str().unwrap();

    let response = ctx
        .request(
            "PUT",
            &format!("/api/projects/{}", id),
            Some(&ctx.admin_auth()),
            Some(json!({ "status": "Completed" })),
        )
        .await;
    let updated = expect_status(response, StatusCode::OK).await;

    assert_eq!(updated["status"], "Completed");
    assert_eq!(updated["name"], "Partial Patch");
    assert_eq!(updated["description"], "integration test project");
}

/// Property 5: double delete succeeds and reports the same identifier
#[tokio::test]
async fn test_project_delete_is_idempotent() {
    let ctx = require_db!();

    let project = create_project(&ctx, "Doomed").await;
    let id = project["id"].as_str().unwrap().to_string();

    let response = ctx
        .request(
            "DELETE",
            &format!("/api/projects/{}", id),
            Some(&ctx.admin_auth()),
            None,
        )
        .await;
    let first = expect_status(response, StatusCode::OK).await;
    assert_eq!(first["id"], id.as_str());

    let response = ctx
        .request(
            "DELETE",
            &format!("/api/projects/{}", id),
            Some(&ctx.admin_auth()),
            None,
        )
        .await;
    let second = expect_status(response, StatusCode::OK).await;
    assert_eq!(second["id"], id.as_str());
}

/// Property 2: task creation against a missing project is rejected
#[tokio::test]
async fn test_task_requires_existing_project() {
    let ctx = require_db!();

    let ghost = uuid::Uuid::new_v4();
    let title = format!("orphan-at-birth-{}", ghost);
    let response = ctx
        .request(
            "POST",
            "/api/tasks",
            Some(&ctx.member_auth()),
            Some(json!({ "title": title, "project_id": ghost })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE title = $1")
        .bind(&title)
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

/// Property 6: minimal task input defaults to To-Do / Medium on read-back
#[tokio::test]
async fn test_task_defaults_on_minimal_input() {
    let ctx = require_db!();

    let project = create_project(&ctx, "Defaults").await;
    let project_id = project["id"].as_str().unwrap();

    let response = ctx
        .request(
            "POST",
            "/api/tasks",
            Some(&ctx.member_auth()),
            Some(json!({ "title": "Just a title", "project_id": project_id })),
        )
        .await;
    expect_status(response, StatusCode::CREATED).await;

    let response = ctx
        .request(
            "GET",
            &format!("/api/tasks/project/{}", project_id),
            Some(&ctx.member_auth()),
            None,
        )
        .await;
    let tasks = expect_status(response, StatusCode::OK).await;

    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert_eq!(tasks[0]["status"], "To-Do");
    assert_eq!(tasks[0]["priority"], "Medium");
}

/// Property 8: admin creates project, member creates and moves a task
#[tokio::test]
async fn test_task_lifecycle_scenario() {
    let ctx = require_db!();

    let response = ctx
        .request(
            "POST",
            "/api/projects",
            Some(&ctx.admin_auth()),
            Some(json!({
                "name": "Launch",
                "description": "launch prep",
                "start_date": "2024-01-01",
                "end_date": "2024-02-01"
            })),
        )
        .await;
    let project = expect_status(response, StatusCode::CREATED).await;
    let project_id = project["id"].as_str().unwrap();

    let response = ctx
        .request(
            "POST",
            "/api/tasks",
            Some(&ctx.member_auth()),
            Some(json!({
                "title": "Ship it",
                "priority": "High",
                "project_id": project_id
            })),
        )
        .await;
    let task = expect_status(response, StatusCode::CREATED).await;
    let task_id = task["id"].as_str().unwrap();

    // Board column move arrives as a single-field patch
    let response = ctx
        .request(
            "PUT",
            &format!("/api/tasks/{}", task_id),
            Some(&ctx.member_auth()),
            Some(json!({ "status": "Done" })),
        )
        .await;
    expect_status(response, StatusCode::OK).await;

    let response = ctx
        .request(
            "GET",
            &format!("/api/tasks/project/{}", project_id),
            Some(&ctx.member_auth()),
            None,
        )
        .await;
    let tasks = expect_status(response, StatusCode::OK).await;
    let tasks = tasks.as_array().unwrap();

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["status"], "Done");
    assert_eq!(tasks[0]["priority"], "High");
}

#[tokio::test]
async fn test_task_update_null_clears_absent_keeps() {
    let ctx = require_db!();

    let project = create_project(&ctx, "Null Patch").await;
    let project_id = project["id"].as_str().unwrap();

    let response = ctx
        .request(
            "POST",
            "/api/tasks",
            Some(&ctx.member_auth()),
            Some(json!({
                "title": "With extras",
                "description": "draft notes",
                "due_date": "2024-01-15",
                "project_id": project_id
            })),
        )
        .await;
    let task = expect_status(response, StatusCode::CREATED).await;
    let task_id = task["id"].as_str().unwrap();

    // Omitting a field keeps it
    let response = ctx
        .request(
            "PUT",
            &format!("/api/tasks/{}", task_id),
            Some(&ctx.member_auth()),
            Some(json!({ "priority": "Low" })),
        )
        .await;
    let updated = expect_status(response, StatusCode::OK).await;
    assert_eq!(updated["description"], "draft notes");
    assert_eq!(updated["due_date"], "2024-01-15");

    // Sending an explicit null clears it
    let response = ctx
        .request(
            "PUT",
            &format!("/api/tasks/{}", task_id),
            Some(&ctx.member_auth()),
            Some(json!({ "description": null, "due_date": null })),
        )
        .await;
    let cleared = expect_status(response, StatusCode::OK).await;
    assert!(cleared["description"].is_null());
    assert!(cleared["due_date"].is_null());
    assert_eq!(cleared["title"], "With extras");
}

#[tokio::test]
async fn test_orphaned_tasks_survive_project_delete() {
    let ctx = require_db!();

    let project = create_project(&ctx, "Short Lived").await;
    let project_id = project["id"].as_str().unwrap().to_string();

    let response = ctx
        .request(
            "POST",
            "/api/tasks",
            Some(&ctx.member_auth()),
            Some(json!({ "title": "Survivor", "project_id": project_id })),
        )
        .await;
    expect_status(response, StatusCode::CREATED).await;

    let response = ctx
        .request(
            "DELETE",
            &format!("/api/projects/{}", project_id),
            Some(&ctx.admin_auth()),
            None,
        )
        .await;
    expect_status(response, StatusCode::OK).await;

    // The task is orphaned, not deleted, and stays listable
    let response = ctx
        .request(
            "GET",
            &format!("/api/tasks/project/{}", project_id),
            Some(&ctx.member_auth()),
            None,
        )
        .await;
    let tasks = expect_status(response, StatusCode::OK).await;
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert_eq!(tasks[0]["title"], "Survivor");
}

#[tokio::test]
async fn test_delete_missing_task_is_not_found() {
    let ctx = require_db!();

    let response = ctx
        .request(
            "DELETE",
            &format!("/api/tasks/{}", uuid::Uuid::new_v4()),
            Some(&ctx.member_auth()),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Property 3: inviting a registered email conflicts regardless of role
#[tokio::test]
async fn test_invite_existing_user_conflicts() {
    let ctx = require_db!();

    for role in ["admin", "member"] {
        let response = ctx
            .request(
                "POST",
                "/api/team/invite",
                Some(&ctx.member_auth()),
                Some(json!({ "email": ctx.admin.email, "role": role })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}

/// Property 4: duplicate pending invite conflicts, exactly one row exists
#[tokio::test]
async fn test_duplicate_invite_conflicts() {
    let ctx = require_db!();

    let email = format!("invitee-{}@example.com", uuid::Uuid::new_v4());

    let response = ctx
        .request(
            "POST",
            "/api/team/invite",
            Some(&ctx.member_auth()),
            Some(json!({ "email": email })),
        )
        .await;
    let created = expect_status(response, StatusCode::CREATED).await;
    assert_eq!(created["invitation"]["status"], "pending");
    assert_eq!(created["invitation"]["role"], "member");
    assert_eq!(created["invitation"]["token"].as_str().unwrap().len(), 40);

    let response = ctx
        .request(
            "POST",
            "/api/team/invite",
            Some(&ctx.member_auth()),
            Some(json!({ "email": email })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let count = nexus_shared::models::invitation::Invitation::count_by_email(&ctx.db, &email)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

/// Property 7: team listing tags users active and invitations pending
#[tokio::test]
async fn test_team_listing_shape() {
    let ctx = require_db!();

    let email = format!("pending-{}@example.com", uuid::Uuid::new_v4());
    let response = ctx
        .request(
            "POST",
            "/api/team/invite",
            Some(&ctx.member_auth()),
            Some(json!({ "email": email })),
        )
        .await;
    expect_status(response, StatusCode::CREATED).await;

    let response = ctx
        .request("GET", "/api/team", Some(&ctx.member_auth()), None)
        .await;
    let body = expect_status(response, StatusCode::OK).await;
    let members = body["members"].as_array().unwrap();

    let actives: Vec<_> = members.iter().filter(|m| m["status"] == "active").collect();
    let pendings: Vec<_> = members
        .iter()
        .filter(|m| m["status"] == "pending")
        .collect();

    assert_eq!(actives.len() + pendings.len(), members.len());
    assert!(actives.len() >= 2, "both test users should be listed");
    assert!(pendings.iter().any(|p| p["email"] == email.as_str()));

    // Active members precede pending invitations
    let first_pending = members.iter().position(|m| m["status"] == "pending");
    let last_active = members.iter().rposition(|m| m["status"] == "active");
    if let (Some(p), Some(a)) = (first_pending, last_active) {
        assert!(a < p, "active entries must come before pending entries");
    }

    // Neither password hashes nor invite tokens leak into the listing
    for member in members {
        assert!(member.get("password_hash").is_none());
        assert!(member.get("token").is_none());
    }
}

#[tokio::test]
async fn test_invalid_invite_email_is_unprocessable() {
    let ctx = require_db!();

    let response = ctx
        .request(
            "POST",
            "/api/team/invite",
            Some(&ctx.member_auth()),
            Some(json!({ "email": "not-an-email" })),
        )
        .await;
    let body = expect_status(response, StatusCode::UNPROCESSABLE_ENTITY).await;
    assert_eq!(body["error"], "validation_error");
}
