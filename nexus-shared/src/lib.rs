//! # Nexus Shared Library
//!
//! This crate contains shared types and business logic used across the
//! Nexus API server and client state layer.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Authentication and access-control utilities
//! - `db`: Connection pool and migration helpers

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Nexus shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
