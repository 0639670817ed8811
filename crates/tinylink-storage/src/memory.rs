use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tinylink_core::repository::Result;
use tinylink_core::{CreateOutcome, ReadRepository, Repository, ShortCode, UrlRecord};
use tracing::trace;

/// In-memory implementation of the Repository trait using DashMap.
///
/// DashMap shards its locks, so reads and writes to different codes do not
/// block each other, and the entry API gives an atomic create-if-absent per
/// code. Contents are lost when the process exits.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    storage: DashMap<String, UrlRecord>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
        }
    }

    /// Number of mappings currently stored.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Returns every code currently mapped to `url`.
    pub fn codes_for(&self, url: &str) -> Vec<ShortCode> {
        self.storage
            .iter()
            .filter(|entry| entry.value().points_to(url))
            .map(|entry| ShortCode::new_unchecked(entry.key().clone()))
            .collect()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        trace!(code = %code, "Reading mapping from memory");
        Ok(self.storage.get(code.as_str()).map(|entry| entry.value().clone()))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn create_if_absent(
        &self,
        code: &ShortCode,
        record: UrlRecord,
    ) -> Result<CreateOutcome> {
        // The entry guard holds the shard lock, making check and insert one step.
        match self.storage.entry(code.as_str().to_owned()) {
            Entry::Occupied(existing) => Ok(CreateOutcome::AlreadyExists(existing.get().clone())),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(CreateOutcome::Created)
            }
        }
    }
}
