//! # Hypermedia Module
//!
//! This module builds the `@controls` affordance maps attached to every
//! response:
//! - Named controls carrying target URL, HTTP method, encoding, and an
//!   optional JSON Schema for the request body
//! - URL construction helpers shared by all handlers
//!
//! The builder is a pure transformation; it holds no state and touches no
//! I/O.

pub mod controls;
pub mod urls;

pub use controls::{Control, Controls};
