//! # Users Module
//!
//! This module handles all user-related functionality including:
//! - User signup with automatic API key issuance
//! - User profile reads and updates
//! - Account deletion (cascades to memberships and keys)

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;


pub use routes::users_routes;
