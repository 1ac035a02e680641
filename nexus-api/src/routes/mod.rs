/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh, me)
/// - `projects`: Project CRUD endpoints
/// - `tasks`: Task CRUD endpoints
/// - `team`: Team listing and invitation endpoints

pub mod health;
pub mod auth;
pub mod projects;
pub mod tasks;
pub mod team;
