//! File-backed key/value store.
//!
//! Each key lives in its own file under the store directory.  Writes go to a
//! sibling temp file first and are renamed into place, so a single key is
//! never half-written.  There is no transaction across keys.

use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

pub const FAVORITES_KEY: &str = "lofichill-favorites";
pub const CURRENT_TRACK_KEY: &str = "lofichill-current-track";
pub const PROGRESS_KEY: &str = "lofichill-progress";

#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Raw value for `key`.  Missing keys and unreadable files are `None`.
    pub fn get(&self, key: &str) -> Option<String> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("store: failed to read {}: {}", key, e);
                None
            }
        }
    }

    pub fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating store dir {}", self.dir.display()))?;
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.tmp", key));
        std::fs::write(&tmp, value).with_context(|| format!("writing {}", tmp.display()))?;
        std::fs::rename(&tmp, &path).with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }

    pub fn remove(&self, key: &str) {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => debug!("store: removed {}", key),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("store: failed to remove {}: {}", key, e),
        }
    }

    /// Decode `key` as JSON.  Content that does not parse is treated as
    /// corrupt: the key is deleted and `None` is returned.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("store: {} is corrupt ({}), clearing it", key, e);
                self.remove(key);
                None
            }
        }
    }

    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> anyhow::Result<()> {
        let json = serde_json::to_string(value)?;
        self.set(key, &json)
    }
}
