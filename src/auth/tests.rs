//! Tests for API key handling

#[cfg(test)]
mod tests {
    use super::super::keys;
    use std::collections::HashSet;

    #[test]
    fn test_minted_keys_are_unique() {
        let mut seen = HashSet::new();
        for _ in 0..100 {
            let key = keys::mint_key();
            assert_eq!(key.len(), 32);
            assert!(seen.insert(key), "Duplicate API key minted");
        }
    }

    #[test]
    fn test_minted_keys_are_header_safe() {
        let key = keys::mint_key();
        assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_hash_is_stable_sha256_hex() {
        let hash = keys::hash_key("test-key");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, keys::hash_key("test-key"));
        // Known digest of "test-key"
        assert_eq!(
            hash,
            "62af8704764faf8ea82fc61ce9c4c3908b6cb97d463a634e9e587d7c885db0ef"
        );
    }

    #[test]
    fn test_different_keys_hash_differently() {
        assert_ne!(keys::hash_key("a"), keys::hash_key("b"));
    }
}
