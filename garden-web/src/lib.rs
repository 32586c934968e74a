//! Web front door for the garden planner.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and configuration
//! - The HTTP front door: routing, sessions, JSON error mapping
//! - Serving the landing page

pub mod app;
pub mod auth;
pub mod cli;
pub mod error;
pub mod handlers;

pub use app::{AppState, build_router, serve};
pub use auth::{AuthStore, AuthUser};
pub use error::ApiError;
