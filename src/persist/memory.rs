//! In-memory snapshot store
//!
//! Keeps the serialized form so a loaded snapshot is always an independent
//! copy of what was saved.

use std::collections::BTreeMap;

use crate::core::error::{Result, WarbandError};
use crate::persist::snapshot::{sort_newest_first, Snapshot, SnapshotId, SnapshotInfo};
use crate::persist::{decode, encode, SnapshotStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<SnapshotId, (SnapshotInfo, String)>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&mut self, name: &str, snapshot: &Snapshot) -> Result<SnapshotId> {
        let id = SnapshotId(self.next_id + 1);
        let info = SnapshotInfo::stamp(id, name, snapshot.kind());
        let json = encode(&info, snapshot)?;

        self.next_id = id.0;
        self.entries.insert(id, (info, json));
        Ok(id)
    }

    fn load(&self, id: SnapshotId) -> Result<Snapshot> {
        let (_, json) = self
            .entries
            .get(&id)
            .ok_or(WarbandError::SnapshotNotFound(id))?;
        decode(json)
    }

    fn list(&self) -> Result<Vec<SnapshotInfo>> {
        let mut infos: Vec<SnapshotInfo> =
            self.entries.values().map(|(info, _)| info.clone()).collect();
        sort_newest_first(&mut infos);
        Ok(infos)
    }
}
