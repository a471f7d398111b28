//! Credential digest logic.

use sha2::{Digest, Sha256};

/// Digest manager for stored credentials.
///
/// Passwords never reach the database in clear: they are digested on
/// submission and compared digest-to-digest afterwards.
#[derive(Clone, Debug, Default)]
pub struct Hasher;

impl Hasher {
    /// Create a new [`Hasher`].
    pub fn new() -> Self {
        Self
    }

    /// Digest data into SHA256 hex.
    pub fn digest(&self, data: impl AsRef<[u8]>) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data.as_ref());

        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_deterministic() {
        let hasher = Hasher::new();
        assert_eq!(hasher.digest("supersecret"), hasher.digest("supersecret"));
    }

    #[test]
    fn test_digest_is_fixed_length_hex() {
        let hasher = Hasher::new();
        let digest = hasher.digest("supersecret");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_distinct_inputs_yield_distinct_digests() {
        let hasher = Hasher::new();
        assert_ne!(hasher.digest("supersecret"), hasher.digest("supersecre"));
        assert_ne!(hasher.digest(""), hasher.digest(" "));
    }
}
