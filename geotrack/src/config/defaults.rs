//! Default values and constants for all configuration settings.

use std::path::PathBuf;
use std::time::Duration;

use super::settings::*;

/// Default log directory, relative to the working directory.
pub const DEFAULT_LOG_DIRECTORY: &str = "logs";

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "geotrack.log";

/// Default capacity of a position source's event channel.
pub const DEFAULT_EVENT_BUFFER: usize = 64;

/// Smallest accepted event channel capacity.
pub const MIN_EVENT_BUFFER: usize = 1;

/// Default delay between simulated fixes in milliseconds.
pub const DEFAULT_SIMULATOR_INTERVAL_MS: u64 = 1000;

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            logging: LoggingSettings {
                directory: PathBuf::from(DEFAULT_LOG_DIRECTORY),
                file: DEFAULT_LOG_FILE.to_string(),
                stdout: false,
            },
            tracker: TrackerSettings {
                event_buffer: DEFAULT_EVENT_BUFFER,
            },
            simulator: SimulatorSettings {
                interval: Duration::from_millis(DEFAULT_SIMULATOR_INTERVAL_MS),
                loop_track: false,
            },
        }
    }
}
