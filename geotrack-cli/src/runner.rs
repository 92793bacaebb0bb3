//! CLI runner for common setup.
//!
//! Encapsulates config loading, logging initialization, and tracker
//! construction so command handlers only deal with their own I/O.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use geotrack::channel::{ChannelSink, Dispatched};
use geotrack::command::CommandRouter;
use geotrack::config::ConfigFile;
use geotrack::logging::{init_logging_full, LoggingGuard};
use geotrack::notify::LogNotifier;
use geotrack::position::{SimulatedSourceConfig, SimulatedSourceFactory};
use geotrack::session::SessionController;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

/// A tracker wired to a result channel.
pub struct Tracker {
    pub router: CommandRouter,
    pub results: mpsc::UnboundedReceiver<Dispatched>,
}

impl CliRunner {
    /// Create a runner, loading config and initializing logging.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Config file to load instead of the default location
    /// * `debug_mode` - When true, enables debug-level logging regardless of RUST_LOG
    pub fn new(config_path: Option<&Path>, debug_mode: bool) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        let logging_guard = init_logging_full(
            &config.logging.directory,
            &config.logging.file,
            config.logging.stdout,
            debug_mode,
        )
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("geotrack v{}", geotrack::VERSION);
        info!("geotrack CLI: {} command", command);
        info!(log_file = %self.logging_guard.log_path().display(), "Logging to file");
    }

    /// Build a tracker whose sources replay `track`.
    pub fn build_tracker(&self, track: Vec<(f64, f64)>) -> Tracker {
        let source_config = SimulatedSourceConfig {
            interval: self.config.simulator.interval,
            event_buffer: self.config.tracker.event_buffer,
            track,
            loop_track: self.config.simulator.loop_track,
        };

        let (sink, results) = ChannelSink::new();
        let sink = Arc::new(sink);
        let controller = Arc::new(SessionController::new(
            Arc::new(SimulatedSourceFactory::new(source_config)),
            sink.clone(),
            Arc::new(LogNotifier),
        ));

        Tracker {
            router: CommandRouter::new(controller, sink),
            results,
        }
    }
}
