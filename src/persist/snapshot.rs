//! Snapshot model shared by every store

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::battle::BattleState;
use crate::campaign::CampaignState;

/// Format version written into every snapshot
pub const SAVE_VERSION: u32 = 1;

/// Store-assigned snapshot identifier, increasing with every save
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SnapshotId(pub u64);

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A complete battle or campaign
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", content = "state")]
pub enum Snapshot {
    Battle(BattleState),
    Campaign(CampaignState),
}

impl Snapshot {
    pub fn kind(&self) -> SnapshotKind {
        match self {
            Snapshot::Battle(_) => SnapshotKind::Battle,
            Snapshot::Campaign(_) => SnapshotKind::Campaign,
        }
    }

    pub fn into_battle(self) -> Option<BattleState> {
        match self {
            Snapshot::Battle(state) => Some(state),
            Snapshot::Campaign(_) => None,
        }
    }

    pub fn into_campaign(self) -> Option<CampaignState> {
        match self {
            Snapshot::Campaign(state) => Some(state),
            Snapshot::Battle(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapshotKind {
    Battle,
    Campaign,
}

impl fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotKind::Battle => f.write_str("battle"),
            SnapshotKind::Campaign => f.write_str("campaign"),
        }
    }
}

/// Listing entry for a stored snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotInfo {
    pub id: SnapshotId,
    pub name: String,
    /// Seconds since the Unix epoch
    pub saved_at: u64,
    pub kind: SnapshotKind,
}

impl SnapshotInfo {
    pub(crate) fn stamp(id: SnapshotId, name: &str, kind: SnapshotKind) -> Self {
        let saved_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        Self {
            id,
            name: name.to_string(),
            saved_at,
            kind,
        }
    }
}

/// Serialized layout: header first so listings can skip the payload
#[derive(Debug, Deserialize)]
pub(crate) struct SnapshotFile {
    pub version: u32,
    pub info: SnapshotInfo,
    pub snapshot: Snapshot,
}

/// Borrowed form of `SnapshotFile` used when writing
#[derive(Debug, Serialize)]
pub(crate) struct SnapshotFileRef<'a> {
    pub version: u32,
    pub info: &'a SnapshotInfo,
    pub snapshot: &'a Snapshot,
}

/// Header-only view of a `SnapshotFile`
#[derive(Debug, Deserialize)]
pub(crate) struct SnapshotHeader {
    pub version: u32,
    pub info: SnapshotInfo,
}

/// Newest first: later saves have larger ids
pub(crate) fn sort_newest_first(infos: &mut [SnapshotInfo]) {
    infos.sort_by(|a, b| b.id.cmp(&a.id));
}
