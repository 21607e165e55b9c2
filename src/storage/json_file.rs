use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use serde_json::{Map as JsonMap, Value as JsonValue};
use tracing::{debug, warn};

use crate::core::{CampaignError, Result};
use crate::domain::{LeadCollection, LeadDocument};
use crate::storage::LeadStore;

/// Lead store backed by a single pretty-printed JSON document.
#[derive(Debug)]
pub struct JsonFileLeadStore {
    path: PathBuf,
    tmp_seq: AtomicU64,
}

impl JsonFileLeadStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tmp_seq: AtomicU64::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        fs::try_exists(&self.path).await.unwrap_or(false)
    }

    fn tmp_path(&self) -> PathBuf {
        let seq = self.tmp_seq.fetch_add(1, Ordering::Relaxed);
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "leads".to_string());
        self.path
            .with_file_name(format!(".{}.{}.{}.tmp", file_name, std::process::id(), seq))
    }

    /// Top-level members of the current document other than `leads`.
    ///
    /// A missing or unparsable file contributes nothing; the save that
    /// follows replaces it wholesale.
    async fn read_extra_members(&self) -> JsonMap<String, JsonValue> {
        let Ok(raw) = fs::read(&self.path).await else {
            return JsonMap::new();
        };
        match serde_json::from_slice::<JsonMap<String, JsonValue>>(&raw) {
            Ok(mut members) => {
                members.remove("leads");
                members
            }
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "existing lead document is not a JSON object; replacing it"
                );
                JsonMap::new()
            }
        }
    }
}

#[async_trait]
impl LeadStore for JsonFileLeadStore {
    async fn load_all(&self) -> Result<LeadCollection> {
        let raw = fs::read_to_string(&self.path).await.map_err(|err| {
            CampaignError::storage_read(format!(
                "Failed to read '{}': {}",
                self.path.display(),
                err
            ))
        })?;

        let document: LeadDocument = serde_json::from_str(&raw).map_err(|err| {
            CampaignError::storage_read(format!(
                "Malformed lead document '{}': {}",
                self.path.display(),
                err
            ))
        })?;

        Ok(document.leads)
    }

    async fn save_all(&self, leads: &LeadCollection) -> Result<()> {
        let document = LeadDocument {
            leads: leads.clone(),
            extra: self.read_extra_members().await,
        };
        let bytes = serde_json::to_vec_pretty(&document).map_err(|err| {
            CampaignError::storage_write(format!("Failed to serialize leads: {}", err))
        })?;

        let tmp = self.tmp_path();
        if let Err(err) = atomic_write(&self.path, &tmp, &bytes).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(err);
        }

        debug!(path = %self.path.display(), lead_count = leads.len(), "lead document saved");
        Ok(())
    }
}

/// Writes `bytes` to `tmp`, syncs it, then renames it over `path`.
async fn atomic_write(path: &Path, tmp: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(|err| {
            CampaignError::storage_write(format!(
                "Failed to create parent directory '{}': {}",
                parent.display(),
                err
            ))
        })?;
    }

    let mut file = fs::File::create(tmp).await.map_err(|err| {
        CampaignError::storage_write(format!(
            "Failed to create temp file '{}': {}",
            tmp.display(),
            err
        ))
    })?;
    file.write_all(bytes).await.map_err(|err| {
        CampaignError::storage_write(format!(
            "Failed to write temp file '{}': {}",
            tmp.display(),
            err
        ))
    })?;
    file.sync_all().await.map_err(|err| {
        CampaignError::storage_write(format!(
            "Failed to sync temp file '{}': {}",
            tmp.display(),
            err
        ))
    })?;
    drop(file);

    fs::rename(tmp, path).await.map_err(|err| {
        CampaignError::storage_write(format!(
            "Failed to rename temp file '{}' -> '{}': {}",
            tmp.display(),
            path.display(),
            err
        ))
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Lead, LeadStatus};
    use tempfile::TempDir;

    #[tokio::test]
    async fn tmp_paths_are_unique_siblings() {
        let store = JsonFileLeadStore::new("/data/db.json");
        let first = store.tmp_path();
        let second = store.tmp_path();
        assert_ne!(first, second);
        assert_eq!(first.parent(), Some(Path::new("/data")));
    }

    #[tokio::test]
    async fn save_creates_missing_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("db.json");
        let store = JsonFileLeadStore::new(&path);

        let leads = LeadCollection::new(vec![Lead::pending(1, "a@x.com")]).unwrap();
        store.save_all(&leads).await.unwrap();

        assert!(store.exists().await);
        let loaded = store.load_all().await.unwrap();
        assert_eq!(loaded.get(1).unwrap().status, LeadStatus::Pending);
    }

    #[tokio::test]
    async fn save_leaves_no_temp_files_behind() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileLeadStore::new(temp_dir.path().join("db.json"));
        let leads = LeadCollection::new(vec![Lead::sent(4, "d@x.com")]).unwrap();
        store.save_all(&leads).await.unwrap();
        store.save_all(&leads).await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec!["db.json".to_string()]);
    }
}
