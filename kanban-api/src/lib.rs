//! # Kanban API Server Library
//!
//! HTTP surface of the kanban service: sessions, the workspace → board →
//! list → card hierarchy, and the endpoints that move lists and cards.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
