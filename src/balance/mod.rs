//! # Balance Module
//!
//! This module computes group settlement state from expense history:
//! - Per-member net balances (paid minus owed, aggregated over all expenses)
//! - A greedy, deterministic set of settling transfers
//! - Equal-split share computation with remainder reconciliation
//!
//! The engine is pure: it operates on data fetched for a single request and
//! has no side effects. All arithmetic is in integer cents.

pub mod engine;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod split;

#[cfg(test)]
mod tests;

pub use routes::balance_routes;
