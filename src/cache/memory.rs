use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{latest_matching, CacheKey, CacheStore};
use crate::error::AssistantError;
use crate::model::CachedResponse;

/// Process-local store; entries live as long as the value.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: RwLock<Vec<CachedResponse>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn find_latest(
        &self,
        key: &CacheKey,
        owner: Option<&str>,
    ) -> Result<Option<CachedResponse>, AssistantError> {
        let entries = self.entries.read().await;
        Ok(latest_matching(entries.iter(), key, owner))
    }

    async fn insert(&self, entry: CachedResponse) -> Result<(), AssistantError> {
        self.entries.write().await.push(entry);
        Ok(())
    }
}
