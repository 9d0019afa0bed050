//! Credential fingerprinting for log output.
//!
//! The raw API key must never reach a log line; batch logging identifies the
//! credential by a short digest prefix instead.

use sha2::{Digest, Sha256};

/// Short stable fingerprint of an API key, safe to log.
///
/// First eight hex chars of the SHA-256 digest.
#[must_use]
pub fn fingerprint(api_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_short_and_stable() {
        let a = fingerprint("ms-test-key");
        let b = fingerprint("ms-test-key");
        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn fingerprint_differs_per_key() {
        assert_ne!(fingerprint("key-one"), fingerprint("key-two"));
    }

    #[test]
    fn fingerprint_never_contains_the_key() {
        let key = "ms-1234567890abcdef";
        assert!(!fingerprint(key).contains(key));
    }
}
