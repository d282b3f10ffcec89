use async_trait::async_trait;
use log::debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::{latest_matching, CacheKey, CacheStore};
use crate::error::AssistantError;
use crate::model::CachedResponse;

/// Store persisted as a JSON array in a single file.
///
/// The file is read once on open and rewritten on every insert.
pub struct JsonFileCacheStore {
    path: PathBuf,
    entries: Mutex<Vec<CachedResponse>>,
}

impl JsonFileCacheStore {
    /// Open `path`, starting empty if the file does not exist yet.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, AssistantError> {
        let path = path.as_ref().to_path_buf();
        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(
            "Opened cache file {} with {} entries",
            path.display(),
            entries.len()
        );

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CacheStore for JsonFileCacheStore {
    async fn find_latest(
        &self,
        key: &CacheKey,
        owner: Option<&str>,
    ) -> Result<Option<CachedResponse>, AssistantError> {
        let entries = self.entries.lock().await;
        Ok(latest_matching(entries.iter(), key, owner))
    }

    async fn insert(&self, entry: CachedResponse) -> Result<(), AssistantError> {
        let mut entries = self.entries.lock().await;
        entries.push(entry);

        let json = serde_json::to_vec_pretty(&*entries)?;
        if let Err(e) = self.replace_file(&json).await {
            // Keep memory and disk in agreement
            entries.pop();
            return Err(e.into());
        }
        Ok(())
    }
}

impl JsonFileCacheStore {
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Write next to the cache file and rename over it, so a crash never
    /// leaves a truncated file behind.
    async fn replace_file(&self, json: &[u8]) -> std::io::Result<()> {
        let temp = self.temp_path();
        tokio::fs::write(&temp, json).await?;
        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e);
        }
        Ok(())
    }
}
