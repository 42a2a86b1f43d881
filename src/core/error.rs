use thiserror::Error;

use crate::persist::SnapshotId;

#[derive(Error, Debug)]
pub enum WarbandError {
    #[error("Slot {slot} is out of range (capacity {capacity})")]
    InvalidSlot { slot: usize, capacity: usize },

    #[error("Slot {0} is empty")]
    EmptySlot(usize),

    #[error("Slot {0} is already occupied")]
    SlotOccupied(usize),

    #[error("Roster is full")]
    RosterFull,

    #[error("Not enough {resource}: need {needed}, have {available}")]
    InsufficientResource {
        resource: String,
        needed: u32,
        available: u32,
    },

    #[error("Hiring quota reached ({quota} recruits)")]
    QuotaReached { quota: u32 },

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Snapshot not found: {0}")]
    SnapshotNotFound(SnapshotId),

    #[error("Snapshot version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl WarbandError {
    pub(crate) fn insufficient(resource: &str, needed: u32, available: u32) -> Self {
        Self::InsufficientResource {
            resource: resource.to_string(),
            needed,
            available,
        }
    }
}

pub type Result<T> = std::result::Result<T, WarbandError>;
