//! # Groups Module
//!
//! This module handles all group-related functionality including:
//! - Group CRUD operations (admin-gated mutation)
//! - Membership management with roles and the last-admin rule
//! - Cascade ownership of expenses via foreign keys

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;

#[cfg(test)]
mod tests;

pub use routes::groups_routes;
