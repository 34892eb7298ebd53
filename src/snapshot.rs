use crate::SNAPSHOT_FILE;
use crate::output;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// On-disk format version. Bump on any incompatible schema change so old
/// artifacts are detected instead of being misread as corruption.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A path-to-digest mapping representing the observed state of a directory
/// tree at one point in time.
///
/// Every key corresponds to a file that existed and was successfully read at
/// capture time. Files that failed to read are simply absent, which is
/// indistinguishable from deletion on the next comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Format version written with the artifact.
    pub version: u32,
    /// Traversal path mapped to its 32-character lowercase hex digest.
    pub entries: HashMap<String, String>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl Snapshot {
    /// Creates an empty snapshot at the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            entries: HashMap::new(),
        }
    }

    /// Records the digest for a file path.
    pub fn insert(&mut self, path: String, digest: String) {
        self.entries.insert(path, digest);
    }

    /// Returns the digest recorded for `path`, if any.
    #[must_use]
    pub fn digest(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    /// Number of files captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no files were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Owner of the persisted snapshot artifact.
///
/// The artifact is a single hidden file at the root of the watched directory,
/// so each watched tree keeps its own independent snapshot history. No other
/// component reads or writes it.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Creates a store rooted at the watched directory.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            path: root.join(SNAPSHOT_FILE),
        }
    }

    /// Location of the persisted artifact.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the previously persisted snapshot.
    ///
    /// A missing artifact is the normal first-run case and yields an empty
    /// snapshot. An artifact that cannot be read or deserialized, or that
    /// carries an unknown format version, is reported with a warning and also
    /// treated as empty; corruption is never fatal.
    #[must_use]
    pub fn load(&self) -> Snapshot {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no previous snapshot");
            return Snapshot::new();
        }

        let snapshot = std::fs::read(&self.path)
            .map_err(anyhow::Error::from)
            .and_then(|data| deserialize(&data));

        match snapshot {
            Ok(snapshot) if snapshot.version == SNAPSHOT_VERSION => {
                debug!(entries = snapshot.len(), "loaded previous snapshot");
                snapshot
            }
            Ok(snapshot) => {
                output::warning(&format!(
                    "Unsupported snapshot format version {}. Recreating...",
                    snapshot.version
                ));
                Snapshot::new()
            }
            Err(_) => {
                output::warning("Corrupted snapshot file. Recreating...");
                Snapshot::new()
            }
        }
    }

    /// Serializes `snapshot` and overwrites the persisted artifact.
    ///
    /// The data is written to a temp file beside the artifact and renamed into
    /// place, so a crash mid-write never leaves a half-written artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the artifact cannot be
    /// written.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let data = serialize(snapshot).context("Failed to serialize snapshot")?;

        let tmp_path = self.path.with_file_name(format!("{SNAPSHOT_FILE}.tmp"));
        std::fs::write(&tmp_path, &data)
            .with_context(|| format!("Failed to write snapshot file: {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace snapshot file: {}", self.path.display()))?;

        debug!(entries = snapshot.len(), path = %self.path.display(), "saved snapshot");
        Ok(())
    }
}

/// Gets the bincode configuration.
fn bincode_config() -> impl bincode::config::Config {
    // Legacy configuration for serde compatibility, with an allocation limit
    // so corrupt length prefixes cannot exhaust memory
    bincode::config::legacy().with_limit::<{ 64 * 1024 * 1024 }>()
}

/// Serializes a snapshot using bincode v2.0 with serde.
fn serialize(snapshot: &Snapshot) -> Result<Vec<u8>> {
    bincode::serde::encode_to_vec(snapshot, bincode_config()).map_err(Into::into)
}

/// Deserializes a snapshot using bincode v2.0 with serde.
fn deserialize(bytes: &[u8]) -> Result<Snapshot> {
    let (snapshot, _bytes_read) = bincode::serde::decode_from_slice(bytes, bincode_config())?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_snapshot() -> Snapshot {
        let mut snapshot = Snapshot::new();
        snapshot.insert("/tmp/a.txt".to_string(), "0".repeat(32));
        snapshot.insert("/tmp/b.txt".to_string(), "f".repeat(32));
        snapshot
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        let snapshot = store.load();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
    }

    #[test]
    fn test_save_load_round_trip() -> Result<()> {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        let original = sample_snapshot();
        store.save(&original)?;

        assert_eq!(store.load(), original);
        Ok(())
    }

    #[test]
    fn test_save_overwrites_unconditionally() -> Result<()> {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        store.save(&sample_snapshot())?;
        store.save(&Snapshot::new())?;

        assert!(store.load().is_empty());
        Ok(())
    }

    #[test]
    fn test_corrupted_artifact_treated_as_empty() -> Result<()> {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        store.save(&sample_snapshot())?;
        std::fs::write(store.path(), b"definitely not bincode")?;

        assert!(store.load().is_empty());
        Ok(())
    }

    #[test]
    fn test_truncated_artifact_treated_as_empty() -> Result<()> {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        store.save(&sample_snapshot())?;
        let data = std::fs::read(store.path())?;
        std::fs::write(store.path(), &data[..data.len() / 2])?;

        assert!(store.load().is_empty());
        Ok(())
    }

    #[test]
    fn test_unknown_version_treated_as_empty() -> Result<()> {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        let mut future = sample_snapshot();
        future.version = SNAPSHOT_VERSION + 1;
        let data = serialize(&future)?;
        std::fs::write(store.path(), data)?;

        assert!(store.load().is_empty());
        Ok(())
    }

    #[test]
    fn test_save_leaves_no_temp_file() -> Result<()> {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        store.save(&sample_snapshot())?;

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())?
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
        Ok(())
    }

    #[test]
    fn test_round_trip_large_mapping() -> Result<()> {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        let mut snapshot = Snapshot::new();
        for i in 0..10_000 {
            snapshot.insert(format!("/deep/nested/path/file_{i}.dat"), format!("{i:032x}"));
        }
        store.save(&snapshot)?;

        assert_eq!(store.load(), snapshot);
        Ok(())
    }
}
