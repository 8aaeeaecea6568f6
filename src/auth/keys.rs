//! API key minting and hashing

use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};

/// Length of the raw key material handed to the client
const KEY_LENGTH: usize = 32;

/// Mint a fresh opaque API key. The raw value is returned to the caller
/// exactly once at signup; only its hash is persisted.
pub fn mint_key() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(KEY_LENGTH)
        .map(char::from)
        .collect()
}

/// SHA-256 hex digest of a raw key, the stored lookup form
pub fn hash_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}
