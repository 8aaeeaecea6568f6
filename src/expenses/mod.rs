//! # Expenses Module
//!
//! This module handles all expense-related functionality including:
//! - Expense CRUD within a group (member/creator/admin gating)
//! - Participant rows with share and paid amounts
//! - Share-sum validation and server-side equal splits

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;

#[cfg(test)]
mod tests;

pub use routes::expenses_routes;
