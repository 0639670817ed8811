use crate::{Extender, ALPHABET};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A deterministic extender that cycles through a fixed list of characters.
///
/// Useful wherever reproducible extended codes matter more than
/// unpredictability, most notably in tests.
#[derive(Debug)]
pub struct SeqExtender {
    counter: AtomicUsize,
    chars: Vec<char>,
}

impl Clone for SeqExtender {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicUsize::new(self.counter.load(Ordering::SeqCst)),
            chars: self.chars.clone(),
        }
    }
}

impl SeqExtender {
    /// Creates an extender cycling through `chars` in order.
    ///
    /// # Panics
    ///
    /// Panics if `chars` is empty.
    pub fn new(chars: impl IntoIterator<Item = char>) -> Self {
        let chars: Vec<char> = chars.into_iter().collect();
        assert!(!chars.is_empty(), "SeqExtender needs at least one character");
        Self {
            counter: AtomicUsize::new(0),
            chars,
        }
    }
}

impl Default for SeqExtender {
    /// Cycles through the whole alphabet in encoding order.
    fn default() -> Self {
        Self::new(ALPHABET.iter().map(|&b| b as char))
    }
}

impl Extender for SeqExtender {
    fn next_char(&self) -> char {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        self.chars[count % self.chars.len()]
    }
}
