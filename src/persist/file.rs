//! JSON snapshot store, one file per snapshot
//!
//! Files are named `<id>_<name>.json` with the id zero-padded so a plain
//! directory listing sorts by save order. Writes go to a temp file first and
//! are renamed into place.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{Result, WarbandError};
use crate::persist::snapshot::{sort_newest_first, Snapshot, SnapshotId, SnapshotInfo};
use crate::persist::{decode, decode_header, encode, SnapshotStore};

const EXTENSION: &str = "json";

pub struct FileStore {
    base_dir: PathBuf,
    next_id: u64,
}

impl FileStore {
    /// Open (or create) a store rooted at `base_dir`
    ///
    /// Ids continue after the highest one already on disk.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;

        let mut store = Self {
            base_dir,
            next_id: 0,
        };
        store.next_id = store
            .snapshot_files()?
            .into_iter()
            .map(|(id, _)| id.0)
            .max()
            .unwrap_or(0);
        Ok(store)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn snapshot_path(&self, id: SnapshotId, name: &str) -> PathBuf {
        self.base_dir
            .join(format!("{:06}_{}.{}", id.0, sanitize(name), EXTENSION))
    }

    /// Every `<id>_*.json` file in the store directory
    fn snapshot_files(&self) -> Result<Vec<(SnapshotId, PathBuf)>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let id = path
                .file_name()
                .and_then(|f| f.to_str())
                .and_then(|f| f.split('_').next())
                .and_then(|prefix| prefix.parse::<u64>().ok());
            if let Some(id) = id {
                files.push((SnapshotId(id), path));
            }
        }
        Ok(files)
    }

    fn find(&self, id: SnapshotId) -> Result<PathBuf> {
        self.snapshot_files()?
            .into_iter()
            .find(|(file_id, _)| *file_id == id)
            .map(|(_, path)| path)
            .ok_or(WarbandError::SnapshotNotFound(id))
    }
}

impl SnapshotStore for FileStore {
    fn save(&mut self, name: &str, snapshot: &Snapshot) -> Result<SnapshotId> {
        let id = SnapshotId(self.next_id + 1);
        let info = SnapshotInfo::stamp(id, name, snapshot.kind());
        let json = encode(&info, snapshot)?;

        let path = self.snapshot_path(id, name);
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &path)?;

        self.next_id = id.0;
        tracing::debug!("Saved snapshot {}: {}", id, path.display());
        Ok(id)
    }

    fn load(&self, id: SnapshotId) -> Result<Snapshot> {
        let path = self.find(id)?;
        let json = fs::read_to_string(&path)?;
        let snapshot = decode(&json)?;
        tracing::debug!("Loaded snapshot {} ({})", id, snapshot.kind());
        Ok(snapshot)
    }

    fn list(&self) -> Result<Vec<SnapshotInfo>> {
        let mut infos = Vec::new();
        for (id, path) in self.snapshot_files()? {
            let header = fs::read_to_string(&path)
                .map_err(WarbandError::from)
                .and_then(|json| decode_header(&json));
            match header {
                Ok(info) => infos.push(info),
                Err(e) => tracing::warn!("Skipping unreadable snapshot {}: {}", id, e),
            }
        }
        sort_newest_first(&mut infos);
        Ok(infos)
    }
}

/// Keep names filesystem-safe: alphanumerics, dash and underscore only
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .take(40)
        .collect();
    if cleaned.is_empty() {
        "snapshot".to_string()
    } else {
        cleaned
    }
}
