use std::sync::Arc;

use async_trait::async_trait;
use tinylink_core::{CreateOutcome, Repository, ShortCode, Shortener, ShortenerError, UrlCache};
use tinylink_generator::{Candidates, Extender, RandomExtender, Seed, Sha256Seed};
use tracing::{debug, trace, warn};

use crate::config::{ConfigError, ShortenerConfig};
use crate::store::MappingStore;

/// A concrete implementation of the `Shortener` trait.
///
/// Shortening walks the candidates derived from the URL, shortest first,
/// and settles on the first one that is either free or already aliases the
/// same URL. Taking a free candidate goes through the store's atomic
/// create-if-absent, so two requests racing for one candidate never both
/// win it.
#[derive(Debug)]
pub struct ShortenerService<R, C, S = Sha256Seed, E = RandomExtender> {
    store: MappingStore<R, C>,
    seed: Arc<S>,
    extender: Arc<E>,
    config: ShortenerConfig,
}

impl<R, C, S, E> Clone for ShortenerService<R, C, S, E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            seed: Arc::clone(&self.seed),
            extender: Arc::clone(&self.extender),
            config: self.config.clone(),
        }
    }
}

impl<R: Repository, C: UrlCache> ShortenerService<R, C> {
    /// Creates a service deriving codes from the URL's SHA-256 digest, with
    /// random extension characters.
    pub fn new(repository: R, cache: C, config: ShortenerConfig) -> Result<Self, ConfigError> {
        Self::with_derivation(repository, cache, Sha256Seed, RandomExtender, config)
    }
}

impl<R, C, S, E> ShortenerService<R, C, S, E>
where
    R: Repository,
    C: UrlCache,
    S: Seed,
    E: Extender,
{
    /// Creates a service with a custom seed and extender.
    pub fn with_derivation(
        repository: R,
        cache: C,
        seed: S,
        extender: E,
        config: ShortenerConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            store: MappingStore::new(repository, cache, config.op_timeout),
            seed: Arc::new(seed),
            extender: Arc::new(extender),
            config,
        })
    }

    pub fn store(&self) -> &MappingStore<R, C> {
        &self.store
    }

    pub fn config(&self) -> &ShortenerConfig {
        &self.config
    }

    async fn claim_code(&self, url: &str) -> Result<ShortCode, ShortenerError> {
        let initial = self.seed.seed(url, self.config.code_length);
        let candidates = Candidates::new(
            initial,
            self.config.max_code_length,
            self.extender.as_ref(),
        );

        for candidate in candidates {
            trace!(code = %candidate, "Trying candidate");

            if let Some(existing) = self.store.lookup(&candidate).await? {
                if existing.points_to(url) {
                    debug!(code = %candidate, "URL already shortened");
                    return Ok(candidate);
                }
                debug!(code = %candidate, "Candidate taken by another URL, extending");
                continue;
            }

            match self.store.try_create(&candidate, url).await? {
                CreateOutcome::Created => return Ok(candidate),
                CreateOutcome::AlreadyExists(existing) if existing.points_to(url) => {
                    debug!(code = %candidate, "Concurrent request shortened the same URL");
                    return Ok(candidate);
                }
                CreateOutcome::AlreadyExists(_) => {
                    debug!(code = %candidate, "Lost race for candidate, extending");
                }
            }
        }

        warn!(
            max_length = self.config.max_code_length,
            "Every candidate is taken by another URL"
        );
        Err(ShortenerError::CodeSpaceExhausted {
            max_length: self.config.max_code_length,
        })
    }
}

#[async_trait]
impl<R, C, S, E> Shortener for ShortenerService<R, C, S, E>
where
    R: Repository,
    C: UrlCache,
    S: Seed,
    E: Extender,
{
    async fn shorten(&self, url: &str) -> Result<ShortCode, ShortenerError> {
        self.claim_code(url).await
    }

    async fn expand(&self, code: &ShortCode) -> Result<Option<String>, ShortenerError> {
        Ok(self
            .store
            .lookup(code)
            .await?
            .map(|record| record.original_url))
    }
}
