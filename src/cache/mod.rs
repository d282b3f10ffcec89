//! Prompt-keyed response cache.
//!
//! A prompt is reduced to a [`CacheKey`] by trimming surrounding whitespace
//! only; "Apple pie" and "apple pie" are different keys. Entries are
//! written once per live answer and never updated. Storage itself is a
//! [`CacheStore`] collaborator.

mod file;
mod memory;

pub use file::JsonFileCacheStore;
pub use memory::MemoryCacheStore;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AssistantError;
use crate::model::CachedResponse;

/// Normalized prompt used as the cache lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Trim leading and trailing whitespace. Case is preserved.
    pub fn normalize(prompt: &str) -> Self {
        CacheKey(prompt.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which stored answers a lookup may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheScope {
    /// Only answers the requesting user's own live calls produced.
    #[default]
    PerUser,
    /// Any user's answer for the same prompt.
    Global,
}

/// Keyed storage behind the response cache.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Most recent entry for `key`, restricted to `owner` when given.
    async fn find_latest(
        &self,
        key: &CacheKey,
        owner: Option<&str>,
    ) -> Result<Option<CachedResponse>, AssistantError>;

    /// Append a new entry.
    async fn insert(&self, entry: CachedResponse) -> Result<(), AssistantError>;
}

/// Pick the newest entry for a key among `entries`.
pub(crate) fn latest_matching<'a>(
    entries: impl IntoIterator<Item = &'a CachedResponse>,
    key: &CacheKey,
    owner: Option<&str>,
) -> Option<CachedResponse> {
    entries
        .into_iter()
        .filter(|e| e.normalized_prompt == key.as_str())
        .filter(|e| owner.map_or(true, |o| e.user_id == o))
        .max_by_key(|e| e.created_at)
        .cloned()
}

/// Cache policy over a [`CacheStore`].
#[derive(Clone)]
pub struct ResponseCache {
    store: Arc<dyn CacheStore>,
    scope: CacheScope,
}

impl ResponseCache {
    pub fn new(store: Arc<dyn CacheStore>, scope: CacheScope) -> Self {
        Self { store, scope }
    }

    pub fn scope(&self) -> CacheScope {
        self.scope
    }

    /// Look up the answer cached for `key` on behalf of `user_id`.
    pub async fn lookup(
        &self,
        key: &CacheKey,
        user_id: Option<&str>,
    ) -> Result<Option<CachedResponse>, AssistantError> {
        let owner = match self.scope {
            CacheScope::Global => None,
            CacheScope::PerUser => match user_id {
                Some(user) => Some(user),
                // Nothing can have been written without a user
                None => return Ok(None),
            },
        };

        let hit = self.store.find_latest(key, owner).await?;
        match &hit {
            Some(entry) => info!("Cache hit for {:?} (entry {})", key.as_str(), entry.id),
            None => info!("Cache miss for {:?}", key.as_str()),
        }
        Ok(hit)
    }

    /// Record a live answer. Writes always belong to the signed-in user.
    pub async fn store(
        &self,
        key: &CacheKey,
        response: &str,
        user_id: Option<&str>,
    ) -> Result<CachedResponse, AssistantError> {
        let user_id = user_id.ok_or(AssistantError::NotAuthenticated)?;

        let entry = CachedResponse {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            normalized_prompt: key.as_str().to_string(),
            response: response.to_string(),
            created_at: Utc::now(),
        };
        self.store.insert(entry.clone()).await?;
        debug!("Cached response {} for {:?}", entry.id, key.as_str());
        Ok(entry)
    }
}
