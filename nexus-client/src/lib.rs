//! # Nexus Client State Layer
//!
//! Headless client library for the Nexus API. A UI renders from these
//! types; nothing here draws anything.
//!
//! ## Modules
//!
//! - `api`: Typed async REST client over the HTTP surface
//! - `store`: Fetch-on-mount collection state (`RemoteCollection<T>`)
//! - `board`: Kanban board mirror with optimistic status moves
//! - `canvas`: Brainstorming whiteboard model (client-local only)

pub mod api;
pub mod board;
pub mod canvas;
pub mod store;

pub use api::{ClientError, NexusClient};
