use std::time::Duration;

use thiserror::Error;
use tinylink_core::ShortCode;
use tinylink_generator::Sha256Seed;
use typed_builder::TypedBuilder;

pub const DEFAULT_CODE_LENGTH: usize = 7;
pub const DEFAULT_MAX_CODE_LENGTH: usize = 12;
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("code length must be between 1 and {max}, got {actual}")]
    CodeLength { actual: usize, max: usize },
    #[error("max code length must be greater than code length {code_length} and at most {limit}, got {actual}")]
    MaxCodeLength {
        actual: usize,
        code_length: usize,
        limit: usize,
    },
    #[error("operation timeout must be non-zero")]
    ZeroTimeout,
}

/// Tunables for [`ShortenerService`](crate::ShortenerService).
///
/// ```rust
/// use std::time::Duration;
/// use tinylink_shortener::ShortenerConfig;
///
/// let config = ShortenerConfig::builder()
///     .code_length(8)
///     .op_timeout(Duration::from_millis(500))
///     .build();
/// assert_eq!(config.max_code_length, 12);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct ShortenerConfig {
    /// Length of the initial candidate.
    #[builder(default = DEFAULT_CODE_LENGTH)]
    pub code_length: usize,
    /// Longest candidate tried before giving up.
    #[builder(default = DEFAULT_MAX_CODE_LENGTH)]
    pub max_code_length: usize,
    /// Upper bound on every single cache or store call.
    #[builder(default = DEFAULT_OP_TIMEOUT)]
    pub op_timeout: Duration,
}

impl Default for ShortenerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ShortenerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.code_length == 0 || self.code_length > Sha256Seed::MAX_LENGTH {
            return Err(ConfigError::CodeLength {
                actual: self.code_length,
                max: Sha256Seed::MAX_LENGTH,
            });
        }

        if self.max_code_length <= self.code_length || self.max_code_length > ShortCode::MAX_LENGTH
        {
            return Err(ConfigError::MaxCodeLength {
                actual: self.max_code_length,
                code_length: self.code_length,
                limit: ShortCode::MAX_LENGTH,
            });
        }

        if self.op_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(())
    }
}
