//! Configuration file for geotrack hosts.
//!
//! Settings live in `~/.geotrack/config.ini`. Missing files and missing keys
//! fall back to defaults, so an empty file is a valid configuration.
//!
//! # Example
//!
//! ```
//! use geotrack::config::ConfigFile;
//!
//! let config = ConfigFile::default();
//! assert_eq!(config.tracker.event_buffer, 64);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, LoggingSettings, SimulatorSettings, TrackerSettings};
