//! Persisted marker remembering which wallet provider was last used.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ProviderError;

const CACHE_FILE: &str = "cached_provider.json";

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    cached_provider: String,
}

/// JSON file under the data directory naming the cached provider.
///
/// A missing file means no marker.
#[derive(Clone, Debug)]
pub struct CachedProviderStore {
    path: PathBuf,
}

impl CachedProviderStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(CACHE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached provider name, if a marker exists.
    pub fn load(&self) -> Result<Option<String>, ProviderError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ProviderError::Cache(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };
        let file: CacheFile = serde_json::from_str(&content)
            .map_err(|e| ProviderError::Cache(format!("corrupt marker: {e}")))?;
        Ok(Some(file.cached_provider))
    }

    /// Remember `name` as the provider to reconnect on startup.
    pub fn save(&self, name: &str) -> Result<(), ProviderError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ProviderError::Cache(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
        let json = serde_json::to_string_pretty(&CacheFile {
            cached_provider: name.to_string(),
        })
        .map_err(|e| ProviderError::Cache(e.to_string()))?;
        fs::write(&self.path, json)
            .map_err(|e| ProviderError::Cache(format!("failed to write {}: {e}", self.path.display())))
    }

    /// Forget the cached provider. Succeeds when no marker exists.
    pub fn clear(&self) -> Result<(), ProviderError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ProviderError::Cache(format!(
                "failed to remove {}: {e}",
                self.path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_marker_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = CachedProviderStore::new(dir.path());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = CachedProviderStore::new(dir.path().join("nested"));

        store.save("frame").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("frame"));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn clearing_twice_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let store = CachedProviderStore::new(dir.path());
        store.clear().unwrap();
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_marker_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = CachedProviderStore::new(dir.path());
        fs::write(store.path(), "not json").unwrap();
        assert!(matches!(store.load(), Err(ProviderError::Cache(_))));
    }
}
