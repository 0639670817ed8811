use crate::error::ShortenerError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// A short code identifying a stored mapping.
///
/// Codes are drawn from the URL-safe base64 alphabet (`A-Z`, `a-z`, `0-9`,
/// `-`, `_`) and are case-sensitive.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortCode(String);

impl ShortCode {
    /// Upper bound on the length of any code the engine will accept.
    pub const MAX_LENGTH: usize = 64;

    /// Creates a new `ShortCode` after validating the input.
    pub fn new(code: impl Into<String>) -> Result<Self, ShortenerError> {
        let code = code.into();
        Self::validate(&code)?;
        Ok(Self(code))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes produced by trusted internal sources
    /// (e.g. the candidate derivation, which only emits base64url characters).
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns a new code with `ch` appended, leaving `self` untouched.
    pub fn extended(&self, ch: char) -> Self {
        let mut code = String::with_capacity(self.0.len() + ch.len_utf8());
        code.push_str(&self.0);
        code.push(ch);
        Self(code)
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters in the code.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `c` belongs to the URL-safe base64 alphabet.
    pub fn is_code_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '-' || c == '_'
    }

    fn validate(code: &str) -> Result<(), ShortenerError> {
        if code.is_empty() || code.len() > Self::MAX_LENGTH {
            return Err(ShortenerError::InvalidShortCode(format!(
                "length must be between 1 and {}, got {}",
                Self::MAX_LENGTH,
                code.len()
            )));
        }

        if !code.chars().all(Self::is_code_char) {
            return Err(ShortenerError::InvalidShortCode(format!(
                "must contain only alphanumeric characters, hyphens, or underscores: '{}'",
                code
            )));
        }

        Ok(())
    }
}

impl FromStr for ShortCode {
    type Err = ShortenerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
