//! Saving and restoring complete battles and campaigns
//!
//! Stores hand out increasing ids and list snapshots newest first. A failed
//! load returns an error and never touches the caller's live state.

pub mod file;
pub mod memory;
pub mod snapshot;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use snapshot::{Snapshot, SnapshotId, SnapshotInfo, SnapshotKind, SAVE_VERSION};

use crate::core::error::{Result, WarbandError};
use snapshot::{SnapshotFile, SnapshotFileRef, SnapshotHeader};

/// Contract for snapshot persistence backends
pub trait SnapshotStore {
    /// Persist `snapshot` under a display name and return its new id
    fn save(&mut self, name: &str, snapshot: &Snapshot) -> Result<SnapshotId>;

    fn load(&self, id: SnapshotId) -> Result<Snapshot>;

    /// All stored snapshots, newest first
    fn list(&self) -> Result<Vec<SnapshotInfo>>;

    /// Most recent snapshot, if any
    fn latest(&self) -> Result<Option<SnapshotInfo>> {
        Ok(self.list()?.into_iter().next())
    }
}

pub(crate) fn encode(info: &SnapshotInfo, snapshot: &Snapshot) -> Result<String> {
    let file = SnapshotFileRef {
        version: SAVE_VERSION,
        info,
        snapshot,
    };
    Ok(serde_json::to_string_pretty(&file)?)
}

pub(crate) fn decode_header(json: &str) -> Result<SnapshotInfo> {
    let header: SnapshotHeader = serde_json::from_str(json)?;
    check_version(header.version)?;
    Ok(header.info)
}

pub(crate) fn decode(json: &str) -> Result<Snapshot> {
    decode_header(json)?;
    let file: SnapshotFile = serde_json::from_str(json)?;
    Ok(file.snapshot)
}

fn check_version(found: u32) -> Result<()> {
    if found != SAVE_VERSION {
        return Err(WarbandError::VersionMismatch {
            expected: SAVE_VERSION,
            found,
        });
    }
    Ok(())
}
