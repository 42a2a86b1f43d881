pub mod config;
pub mod error;
pub mod log;
pub mod types;

pub use config::{BalanceConfig, BattleConfig, EconomyConfig, ProgressionConfig};
pub use error::{Result, WarbandError};
pub use log::{EventLog, LogConfig, LogEntry, Verbosity};
pub use types::{clamp01, Day, Round, Side};
