//! Narrative event log with verbosity filtering
//!
//! Battle and campaign code report what happened through an `EventLog`
//! owned by the caller. Entries below the configured verbosity are dropped
//! before they are stored or emitted. Logging never feeds back into engine
//! state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::WarbandError;

/// How much narrative detail to report
///
/// Ordered: a message is kept when its level is <= the configured level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Verbosity {
    /// Kills, crits, potions, round headers
    Brief,
    /// Hits, stuns, stance changes
    #[default]
    Normal,
    /// Misses, blocks, dodges
    Verbose,
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Verbosity::Brief => "brief",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
        };
        f.write_str(name)
    }
}

impl FromStr for Verbosity {
    type Err = WarbandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "0" | "brief" => Ok(Verbosity::Brief),
            "1" | "normal" => Ok(Verbosity::Normal),
            "2" | "verbose" => Ok(Verbosity::Verbose),
            other => Err(WarbandError::Config(format!("unknown verbosity '{}'", other))),
        }
    }
}

/// Logging configuration injected into battles and campaigns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: Verbosity,
    /// Whether console front-ends should colorize output
    pub color: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Verbosity::Normal,
            color: true,
        }
    }
}

impl LogConfig {
    pub fn new(level: Verbosity, color: bool) -> Self {
        Self { level, color }
    }

    pub fn allows(&self, level: Verbosity) -> bool {
        level <= self.level
    }
}

/// A single logged event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub round: u32,
    pub level: Verbosity,
    pub message: String,
}

/// Stored entries before the oldest half is discarded
pub const MAX_ENTRIES: usize = 4096;

/// Ordered sink for narrative events
///
/// Keeps at most `MAX_ENTRIES`; long-running callers should `drain` it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    config: LogConfig,
    #[serde(skip)]
    round: u32,
    #[serde(skip)]
    entries: Vec<LogEntry>,
}

impl EventLog {
    pub fn new(config: LogConfig) -> Self {
        Self {
            config,
            round: 0,
            entries: Vec::new(),
        }
    }

    pub fn config(&self) -> LogConfig {
        self.config
    }

    /// Tag subsequent entries with this round number
    pub fn set_round(&mut self, round: u32) {
        self.round = round;
    }

    /// Record a message if the configured verbosity admits it
    pub fn log(&mut self, level: Verbosity, message: impl Into<String>) {
        if !self.config.allows(level) {
            return;
        }

        let message = message.into();
        tracing::info!(target: "warband::events", round = self.round, %level, "{}", message);
        self.entries.push(LogEntry {
            round: self.round,
            level,
            message,
        });
        if self.entries.len() > MAX_ENTRIES {
            let excess = self.entries.len() - MAX_ENTRIES / 2;
            self.entries.drain(..excess);
        }
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take all stored entries, leaving the log empty
    pub fn drain(&mut self) -> Vec<LogEntry> {
        std::mem::take(&mut self.entries)
    }

    /// Does any stored message contain `needle`?
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.message.contains(needle))
    }
}
