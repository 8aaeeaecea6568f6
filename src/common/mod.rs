// Common module - shared types and utilities across all modules

pub mod error;
pub mod id_generator;
pub mod migrations;
pub mod money;
pub mod state;
pub mod validation;

// Re-export commonly used types for convenience
pub use error::ApiError;
pub use id_generator::*;
pub use money::{amount_to_cents, cents_to_amount};
pub use state::AppState;
pub use validation::{ValidationError, ValidationResult, Validator};
