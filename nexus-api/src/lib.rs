//! # Nexus API Server Library
//!
//! This library provides the core functionality for the Nexus API server.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `mail`: Best-effort invitation email dispatch
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod mail;
pub mod routes;
