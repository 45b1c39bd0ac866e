use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::StoreError;
use crate::snapshot::ItemRecord;

/// A generated tracking prompt together with the data it was derived from,
/// as handed to the persistence collaborator.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GeneratedPrompt {
    pub item_id: String,
    pub config_id: String,
    pub prompt_content: String,
    pub source_data_snapshot: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// The persistence collaborator boundary. The editor owns the in-memory
/// tree; the store only receives full records (last write wins) and hands
/// them back on load. A remote database client would implement this same
/// trait.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn get_item(&self, id: &str) -> Result<Option<ItemRecord>, StoreError>;
    async fn save_item(&self, id: &str, record: &ItemRecord) -> Result<(), StoreError>;
    async fn save_prompt(&self, prompt: &GeneratedPrompt) -> Result<(), StoreError>;
}

/// File-backed store: one JSON document per item id under a directory,
/// generated prompts under `prompts/`.
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn item_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }

    fn prompts_dir(&self) -> PathBuf {
        self.root.join("prompts")
    }
}

#[async_trait]
impl ItemStore for JsonFileStore {
    async fn get_item(&self, id: &str) -> Result<Option<ItemRecord>, StoreError> {
        let path = self.item_path(id);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No stored record at {}", path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn save_item(&self, id: &str, record: &ItemRecord) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.item_path(id);
        let content = serde_json::to_string_pretty(record)?;
        tokio::fs::write(&path, content).await?;
        debug!("Saved item {} to {}", id, path.display());
        Ok(())
    }

    async fn save_prompt(&self, prompt: &GeneratedPrompt) -> Result<(), StoreError> {
        let dir = self.prompts_dir();
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join(format!(
            "{}-{}.json",
            prompt.item_id,
            prompt.created_at.timestamp_millis()
        ));
        let content = serde_json::to_string_pretty(prompt)?;
        tokio::fs::write(&path, content).await?;
        info!(
            "Persisted generated prompt for {} at {}",
            prompt.item_id,
            path.display()
        );
        Ok(())
    }
}

/// Check `path` exists as a stored record; used by watch mode to decide
/// which file to observe.
pub fn record_exists(path: &Path) -> bool {
    path.is_file()
}
