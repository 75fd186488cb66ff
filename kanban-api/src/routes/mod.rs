/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, logout and the current session
/// - `profile`: The caller's own profile
/// - `users`: Account deletion
/// - `workspaces`, `boards`: Containers above the ordered entities
/// - `lists`, `cards`: Ordered entities and their reorder endpoints

pub mod auth;
pub mod boards;
pub mod cards;
pub mod health;
pub mod lists;
pub mod profile;
pub mod users;
pub mod workspaces;

use serde::{Deserialize, Serialize};

/// Body returned by endpoints that only acknowledge a change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
