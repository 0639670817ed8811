use crate::{Extender, ALPHABET};
use rand::Rng;

/// Draws extension characters uniformly from [`ALPHABET`].
///
/// Uses the thread-local CSPRNG, so the character appended after a
/// collision cannot be predicted from previously issued codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomExtender;

impl Extender for RandomExtender {
    fn next_char(&self) -> char {
        let index = rand::rng().random_range(0..ALPHABET.len());
        ALPHABET[index] as char
    }
}
