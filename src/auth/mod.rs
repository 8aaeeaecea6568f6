//! # Auth Module
//!
//! This module handles API-key authentication:
//! - Key minting and SHA-256 hashing (only hashes are stored)
//! - AuthedUser extractor for protected routes

pub mod extractors;
pub mod keys;

#[cfg(test)]
mod tests;

pub use extractors::AuthedUser;
