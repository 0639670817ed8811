//! Short-code candidate derivation.
//!
//! Everything in this crate is pure: nothing here talks to a cache or a
//! store. A [`Seed`] turns a URL into its initial candidate, an
//! [`Extender`] supplies the characters appended on collision, and
//! [`Candidates`] walks the resulting bounded sequence.

pub mod fixed;
pub mod random;
pub mod seq;
pub mod sha256;

pub use fixed::FixedSeed;
pub use random::RandomExtender;
pub use seq::SeqExtender;
pub use sha256::Sha256Seed;

use tinylink_core::ShortCode;

/// The URL-safe base64 alphabet, in encoding order.
pub const ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Derives the initial candidate code for a URL.
///
/// Implementations must be deterministic: the same URL and length always
/// yield the same code.
pub trait Seed: Send + Sync + 'static {
    /// Returns the initial candidate for `url`, `length` characters long.
    fn seed(&self, url: &str, length: usize) -> ShortCode;
}

/// Supplies the character appended to a candidate after a collision.
pub trait Extender: Send + Sync + 'static {
    /// Returns the next extension character, drawn from [`ALPHABET`].
    fn next_char(&self) -> char;
}

enum State {
    Initial(ShortCode),
    Extending(ShortCode),
    Done,
}

/// A bounded sequence of ever-longer candidate codes.
///
/// The first item is the initial candidate; every following item is the
/// previous one with a single extension character appended. Iteration stops
/// once the next candidate would be longer than `max_length`. The extender
/// is only consulted when the caller asks for the next candidate.
pub struct Candidates<'a, E: ?Sized> {
    state: State,
    max_length: usize,
    extender: &'a E,
}

impl<'a, E: Extender + ?Sized> Candidates<'a, E> {
    pub fn new(initial: ShortCode, max_length: usize, extender: &'a E) -> Self {
        Self {
            state: State::Initial(initial),
            max_length,
            extender,
        }
    }
}

impl<E: Extender + ?Sized> Iterator for Candidates<'_, E> {
    type Item = ShortCode;

    fn next(&mut self) -> Option<Self::Item> {
        let candidate = match std::mem::replace(&mut self.state, State::Done) {
            State::Initial(code) => code,
            State::Extending(previous) => previous.extended(self.extender.next_char()),
            State::Done => return None,
        };

        if candidate.len() > self.max_length {
            return None;
        }

        self.state = State::Extending(candidate.clone());
        Some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_one_candidate_per_length() {
        let extender = SeqExtender::new(['x']);
        let lengths: Vec<usize> = Candidates::new(ShortCode::new_unchecked("abc"), 6, &extender)
            .map(|c| c.len())
            .collect();

        assert_eq!(lengths, vec![3, 4, 5, 6]);
    }

    #[test]
    fn each_candidate_extends_the_previous_one() {
        let extender = SeqExtender::new(['1', '2', '3']);
        let codes: Vec<String> = Candidates::new(ShortCode::new_unchecked("ab"), 5, &extender)
            .map(|c| c.to_string())
            .collect();

        assert_eq!(codes, vec!["ab", "ab1", "ab12", "ab123"]);
    }

    #[test]
    fn initial_longer_than_max_yields_nothing() {
        let extender = SeqExtender::new(['x']);
        let mut candidates = Candidates::new(ShortCode::new_unchecked("abcdef"), 5, &extender);

        assert!(candidates.next().is_none());
        assert!(candidates.next().is_none());
    }

    #[test]
    fn extender_is_consulted_lazily() {
        let extender = SeqExtender::new(['a', 'b']);
        let mut candidates = Candidates::new(ShortCode::new_unchecked("z"), 10, &extender);

        assert_eq!(candidates.next().unwrap().as_str(), "z");
        // Only the first candidate was taken, so no extension was drawn yet.
        assert_eq!(extender.next_char(), 'a');
    }

    #[test]
    fn works_with_sha256_seed_and_random_extender() {
        let seed = Sha256Seed;
        let extender = RandomExtender;
        let codes: Vec<ShortCode> =
            Candidates::new(seed.seed("https://example.com/a", 7), 9, &extender).collect();

        assert_eq!(codes.len(), 3);
        assert_eq!(codes[0].as_str(), "Lc4KTFB");
        assert!(codes[2].as_str().starts_with(codes[1].as_str()));
        assert!(codes[1].as_str().starts_with(codes[0].as_str()));
    }

    #[test]
    fn alphabet_is_url_safe_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for &b in ALPHABET.iter() {
            assert!(ShortCode::is_code_char(b as char));
            assert!(seen.insert(b));
        }
    }
}
