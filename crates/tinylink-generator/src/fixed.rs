use crate::Seed;
use tinylink_core::ShortCode;

/// A seed that ignores the URL and always starts from the same code.
///
/// Every URL collides on the initial candidate, which makes the collision
/// path reachable on demand.
#[derive(Debug, Clone)]
pub struct FixedSeed {
    code: String,
}

impl FixedSeed {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

impl Seed for FixedSeed {
    fn seed(&self, _url: &str, length: usize) -> ShortCode {
        let end = length.min(self.code.len());
        ShortCode::new_unchecked(&self.code[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_code_for_every_url() {
        let seed = FixedSeed::new("AAAAAAA");
        assert_eq!(
            seed.seed("https://one.example", 7),
            seed.seed("https://two.example", 7)
        );
    }

    #[test]
    fn truncates_to_requested_length() {
        let seed = FixedSeed::new("abcdefghij");
        assert_eq!(seed.seed("https://example.com", 4).as_str(), "abcd");
        assert_eq!(seed.seed("https://example.com", 20).as_str(), "abcdefghij");
    }
}
