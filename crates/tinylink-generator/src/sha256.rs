use crate::Seed;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use sha2::{Digest, Sha256};
use tinylink_core::ShortCode;

/// Derives the initial candidate from the SHA-256 digest of the URL.
///
/// The 32-byte digest is encoded as unpadded URL-safe base64 and the first
/// `length` characters are kept. The URL is hashed exactly as given; no
/// normalization takes place.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Seed;

impl Sha256Seed {
    /// Length of the full encoded digest, and so the longest possible seed.
    pub const MAX_LENGTH: usize = 43;

    /// Returns the full encoded digest of `url`.
    pub fn digest(url: &str) -> String {
        URL_SAFE_NO_PAD.encode(Sha256::digest(url.as_bytes()))
    }
}

impl Seed for Sha256Seed {
    fn seed(&self, url: &str, length: usize) -> ShortCode {
        let mut encoded = Self::digest(url);
        encoded.truncate(length.min(Self::MAX_LENGTH));
        ShortCode::new_unchecked(encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest_prefix() {
        let seed = Sha256Seed;
        assert_eq!(seed.seed("https://example.com/a", 7).as_str(), "Lc4KTFB");
        assert_eq!(seed.seed("https://example.com/b", 7).as_str(), "1_5WizG");
        assert_eq!(seed.seed("hello world", 10).as_str(), "uU0nuZNNPg");
    }

    #[test]
    fn full_digest_is_43_characters() {
        let digest = Sha256Seed::digest("https://example.com/a");
        assert_eq!(digest.len(), Sha256Seed::MAX_LENGTH);
        assert_eq!(digest, "Lc4KTFBEG_zPqcr0tYw8um4GxCBQXdgp8ENt4apEuqw");
    }

    #[test]
    fn deterministic_for_same_input() {
        let seed = Sha256Seed;
        assert_eq!(
            seed.seed("https://example.com/path?q=1", 7),
            seed.seed("https://example.com/path?q=1", 7)
        );
    }

    #[test]
    fn hashes_exact_bytes() {
        let seed = Sha256Seed;
        assert_ne!(
            seed.seed("https://example.com/a", 7),
            seed.seed("https://example.com/a/", 7)
        );
    }

    #[test]
    fn length_is_capped_at_digest_length() {
        let seed = Sha256Seed;
        assert_eq!(seed.seed("", 100).len(), Sha256Seed::MAX_LENGTH);
        assert_eq!(seed.seed("", 7).as_str(), "47DEQpj");
    }

    #[test]
    fn seed_is_a_valid_short_code() {
        let code = Sha256Seed.seed("https://example.com/a", 20);
        assert!(ShortCode::new(code.as_str()).is_ok());
    }
}
