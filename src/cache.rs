use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{AnalysisError, Result};

/// Content+metadata derived key identifying one input file.
///
/// Hashes the file bytes plus size and mtime, so a changed file always maps
/// to a fresh cache entry and a renamed-but-identical file still hits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn for_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            AnalysisError::Input(format!("cannot read {}: {}", path.display(), e))
        })?;
        let metadata = std::fs::metadata(path)?;
        let mtime_secs = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        hasher.update(metadata.len().to_string().as_bytes());
        hasher.update(mtime_secs.to_string().as_bytes());

        let digest = hasher.finalize();
        let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
        Ok(Self(hex))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[cfg(test)]
    pub fn from_raw(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Content-addressed directory of JSON records, one file per fingerprint.
/// Entries are never invalidated; a different fingerprint is a different key.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Raw-transcript store under the given cache root
    pub fn transcription_cache(root: &Path) -> Self {
        Self {
            dir: root.join("transcription_cache"),
        }
    }

    /// Analysis store under the given cache root
    pub fn analysis_cache(root: &Path) -> Self {
        Self {
            dir: root.join("analysis_cache"),
        }
    }

    fn record_path(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.dir.join(format!("{}.json", fingerprint))
    }

    /// Load the record for a fingerprint, or None if absent
    pub fn load<T: DeserializeOwned>(&self, fingerprint: &Fingerprint) -> Result<Option<T>> {
        let path = self.record_path(fingerprint);
        if !path.exists() {
            return Ok(None);
        }
        debug!("cache hit: {}", path.display());
        let content = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Persist the record for a fingerprint
    pub fn save<T: Serialize>(&self, fingerprint: &Fingerprint, record: &T) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.record_path(fingerprint);
        let content = serde_json::to_string(record)?;
        std::fs::write(&path, content)?;
        debug!("cached: {}", path.display());
        Ok(())
    }
}
