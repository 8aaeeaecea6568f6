// src/common/id_generator.rs
//! Crockford Base32 ID Generator
//!
//! Generates human-readable, prefixed IDs using Crockford Base32 encoding.
//! Format: PREFIX_XXXXXX (e.g., G_K7NP3X for groups)
//!
//! Benefits:
//! - No ambiguous characters (excludes I, L, O, U)
//! - Case-insensitive
//! - ~1 billion combinations per entity type (32^6)
//! - Easy to read, type, and communicate verbally

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy)]
pub enum EntityPrefix {
    /// User (U_)
    User,
    /// Group (G_)
    Group,
    /// Group membership (M_)
    Member,
    /// Expense (E_)
    Expense,
    /// Expense participant (P_)
    Participant,
    /// API key record (K_) - K for Key
    ApiKey,
}

impl EntityPrefix {
    /// Get the string prefix for this entity type
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::User => "U",
            EntityPrefix::Group => "G",
            EntityPrefix::Member => "M",
            EntityPrefix::Expense => "E",
            EntityPrefix::Participant => "P",
            EntityPrefix::ApiKey => "K",
        }
    }
}

/// Generate a random Crockford Base32 string of specified length
fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a prefixed ID using Crockford Base32 encoding
///
/// # Arguments
/// * `prefix` - The entity type prefix
///
/// # Returns
/// A string in format "PREFIX_XXXXXX" (e.g., "G_K7NP3X")
pub fn generate_id(prefix: EntityPrefix) -> String {
    format!("{}_{}", prefix.as_str(), generate_crockford_string(6))
}

/// Generate a User ID (U_XXXXXX)
pub fn generate_user_id() -> String {
    generate_id(EntityPrefix::User)
}

/// Generate a Group ID (G_XXXXXX)
pub fn generate_group_id() -> String {
    generate_id(EntityPrefix::Group)
}

/// Generate a Member ID (M_XXXXXX)
pub fn generate_member_id() -> String {
    generate_id(EntityPrefix::Member)
}

/// Generate an Expense ID (E_XXXXXX)
pub fn generate_expense_id() -> String {
    generate_id(EntityPrefix::Expense)
}

/// Generate a Participant ID (P_XXXXXX)
pub fn generate_participant_id() -> String {
    generate_id(EntityPrefix::Participant)
}

/// Generate an API key record ID (K_XXXXXX)
pub fn generate_api_key_id() -> String {
    generate_id(EntityPrefix::ApiKey)
}
