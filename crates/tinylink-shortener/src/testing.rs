//! Backend doubles for exercising failure paths.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tinylink_core::{
    CacheError, CreateOutcome, ReadRepository, Repository, ShortCode, StorageError, UrlCache,
    UrlRecord,
};

type StorageResult<T> = Result<T, StorageError>;
type CacheResult<T> = Result<T, CacheError>;

/// A cache whose every call fails.
pub struct BrokenCache;

#[async_trait]
impl UrlCache for BrokenCache {
    async fn get_url(&self, _code: &ShortCode) -> CacheResult<Option<UrlRecord>> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn set_url(&self, _code: &ShortCode, _record: &UrlRecord) -> CacheResult<()> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }
}

/// A cache that always misses and rejects every write.
pub struct UnwritableCache;

#[async_trait]
impl UrlCache for UnwritableCache {
    async fn get_url(&self, _code: &ShortCode) -> CacheResult<Option<UrlRecord>> {
        Ok(None)
    }

    async fn set_url(&self, _code: &ShortCode, _record: &UrlRecord) -> CacheResult<()> {
        Err(CacheError::Operation("READONLY".to_string()))
    }
}

/// A store whose every call fails.
pub struct FailingRepository;

#[async_trait]
impl ReadRepository for FailingRepository {
    async fn get(&self, _code: &ShortCode) -> StorageResult<Option<UrlRecord>> {
        Err(StorageError::Unavailable("pool closed".to_string()))
    }
}

#[async_trait]
impl Repository for FailingRepository {
    async fn create_if_absent(
        &self,
        _code: &ShortCode,
        _record: UrlRecord,
    ) -> StorageResult<CreateOutcome> {
        Err(StorageError::Unavailable("pool closed".to_string()))
    }
}

/// A store that answers only after `delay`.
pub struct SlowRepository {
    delay: Duration,
}

impl SlowRepository {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ReadRepository for SlowRepository {
    async fn get(&self, _code: &ShortCode) -> StorageResult<Option<UrlRecord>> {
        tokio::time::sleep(self.delay).await;
        Ok(None)
    }
}

#[async_trait]
impl Repository for SlowRepository {
    async fn create_if_absent(
        &self,
        _code: &ShortCode,
        _record: UrlRecord,
    ) -> StorageResult<CreateOutcome> {
        tokio::time::sleep(self.delay).await;
        Ok(CreateOutcome::Created)
    }
}

/// A store in which every code already belongs to another URL.
pub struct SaturatedRepository {
    reads: AtomicUsize,
}

impl SaturatedRepository {
    pub const OWNER: &'static str = "https://owner.example";

    pub fn new() -> Self {
        Self {
            reads: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReadRepository for SaturatedRepository {
    async fn get(&self, _code: &ShortCode) -> StorageResult<Option<UrlRecord>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(Some(UrlRecord::new(Self::OWNER)))
    }
}

#[async_trait]
impl Repository for SaturatedRepository {
    async fn create_if_absent(
        &self,
        _code: &ShortCode,
        _record: UrlRecord,
    ) -> StorageResult<CreateOutcome> {
        Ok(CreateOutcome::AlreadyExists(UrlRecord::new(Self::OWNER)))
    }
}

/// Wraps a store and counts its reads.
pub struct CountingRepository<R> {
    inner: R,
    reads: AtomicUsize,
}

impl<R> CountingRepository<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            reads: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<R: Repository> ReadRepository for CountingRepository<R> {
    async fn get(&self, code: &ShortCode) -> StorageResult<Option<UrlRecord>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get(code).await
    }
}

#[async_trait]
impl<R: Repository> Repository for CountingRepository<R> {
    async fn create_if_absent(
        &self,
        code: &ShortCode,
        record: UrlRecord,
    ) -> StorageResult<CreateOutcome> {
        self.inner.create_if_absent(code, record).await
    }
}
