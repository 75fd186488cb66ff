//! # Kanban Shared Library
//!
//! Shared types, store access and business rules used by the API server and
//! the board client.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, workspaces, boards, lists, cards)
//! - `auth`: Session tokens, password hashing, caller identity, ownership checks
//! - `ordering`: Pure position arithmetic shared by server and client
//! - `position`: Transactional position engine over the store
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod ordering;
pub mod position;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
