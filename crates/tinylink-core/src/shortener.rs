use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Returns the short code for `url`, creating the mapping if needed.
    ///
    /// Shortening the same URL again returns the same code.
    async fn shorten(&self, url: &str) -> Result<ShortCode>;

    /// Resolves a short code to the URL it aliases.
    /// Returns `None` if no mapping exists for the code.
    async fn expand(&self, code: &ShortCode) -> Result<Option<String>>;
}
