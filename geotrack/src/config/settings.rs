//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;
use std::time::Duration;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Logging settings
    pub logging: LoggingSettings,
    /// Tracker settings
    pub tracker: TrackerSettings,
    /// Simulated position source settings
    pub simulator: SimulatorSettings,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Directory the log file is written to
    pub directory: PathBuf,
    /// Log file name
    pub file: String,
    /// Also log to stdout
    pub stdout: bool,
}

/// Tracker configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerSettings {
    /// Capacity of each position source's event channel
    pub event_buffer: usize,
}

/// Simulated position source configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorSettings {
    /// Delay between replayed track points
    pub interval: Duration,
    /// Restart the track when it is exhausted
    pub loop_track: bool,
}
