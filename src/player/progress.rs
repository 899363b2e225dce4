//! Playback progress persistence
//!
//! A session saves its position when released and restores it on the next
//! first-play of the same source. Completion saves 0, which clears it.

use crate::utils::error::{IntoPlayerError, Result};
use log::{debug, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Where positions are kept between plays
pub trait ProgressStore {
    /// Remember `position_ms` for `key`; 0 forgets it
    fn save(&self, key: &str, position_ms: u64);

    /// Last saved position for `key`, 0 if none
    fn get(&self, key: &str) -> u64;
}

/// Positions held in memory for the life of the process
#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    positions: Mutex<HashMap<String, u64>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of remembered sources
    pub fn len(&self) -> usize {
        self.positions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.lock().is_empty()
    }
}

impl ProgressStore for MemoryProgressStore {
    fn save(&self, key: &str, position_ms: u64) {
        let mut positions = self.positions.lock();
        if position_ms == 0 {
            positions.remove(key);
        } else {
            positions.insert(key.to_string(), position_ms);
        }
    }

    fn get(&self, key: &str) -> u64 {
        self.positions.lock().get(key).copied().unwrap_or(0)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProgressFile {
    positions: HashMap<String, ProgressEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProgressEntry {
    /// Last position in milliseconds
    position_ms: u64,

    /// Unix timestamp of the save
    saved_at: u64,
}

/// Positions kept in a JSON file
///
/// The file is read once on open and rewritten on every change. Write
/// failures are logged and otherwise ignored; losing a resume point never
/// interrupts playback.
#[derive(Debug)]
pub struct FileProgressStore {
    path: PathBuf,
    data: Mutex<ProgressFile>,
}

impl FileProgressStore {
    /// Open the store at the default location
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path())
    }

    /// Open or create the store at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let text = std::fs::read_to_string(&path)?;
            serde_json::from_str(&text).persistence_err("Reading progress file")?
        } else {
            ProgressFile::default()
        };

        debug!("progress store at {} holds {} entries", path.display(), data.positions.len());
        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    /// `<data dir>/videoview/progress.json`
    pub fn default_path() -> PathBuf {
        let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("videoview");
        path.push("progress.json");
        path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, data: &ProgressFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(data)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

impl ProgressStore for FileProgressStore {
    fn save(&self, key: &str, position_ms: u64) {
        let mut data = self.data.lock();
        if position_ms == 0 {
            if data.positions.remove(key).is_none() {
                return;
            }
        } else {
            let saved_at = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            data.positions.insert(
                key.to_string(),
                ProgressEntry {
                    position_ms,
                    saved_at,
                },
            );
        }

        if let Err(e) = self.write(&data) {
            warn!("could not persist progress for {}: {}", key, e);
        }
    }

    fn get(&self, key: &str) -> u64 {
        self.data
            .lock()
            .positions
            .get(key)
            .map(|e| e.position_ms)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store() {
        let store = MemoryProgressStore::new();
        assert_eq!(store.get("a"), 0);
        store.save("a", 12_000);
        assert_eq!(store.get("a"), 12_000);
        store.save("a", 0);
        assert_eq!(store.get("a"), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("progress.json");

        let store = FileProgressStore::open(&path).unwrap();
        store.save("https://cdn.example.com/a.mp4", 42_000);
        store.save("https://cdn.example.com/b.mp4", 7_000);
        store.save("https://cdn.example.com/b.mp4", 0);
        drop(store);

        let store = FileProgressStore::open(&path).unwrap();
        assert_eq!(store.get("https://cdn.example.com/a.mp4"), 42_000);
        assert_eq!(store.get("https://cdn.example.com/b.mp4"), 0);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("progress.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = FileProgressStore::open(&path).unwrap_err();
        assert!(err.to_string().starts_with("Persistence error"));
    }
}
