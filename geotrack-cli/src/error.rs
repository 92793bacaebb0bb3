//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use geotrack::codec::CodecError;
use geotrack::config::ConfigFileError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(ConfigFileError),
    /// Refused to overwrite an existing config file
    ConfigExists(PathBuf),
    /// Failed to read an input file
    FileRead {
        path: PathBuf,
        error: std::io::Error,
    },
    /// Malformed line in a track file
    Track {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    /// Failed to read commands from the input stream
    Input(std::io::Error),
    /// Failed to create the async runtime
    Runtime(std::io::Error),
    /// Failed to encode a coordinate
    Encode(CodecError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Track { .. } => {
                eprintln!();
                eprintln!("Track files hold one `latitude,longitude` pair per line.");
                eprintln!("Blank lines and lines starting with '#' are ignored.");
            }
            CliError::ConfigExists(_) => {
                eprintln!();
                eprintln!("Use --force to replace it with the defaults.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::ConfigExists(path) => {
                write!(f, "Config file '{}' already exists", path.display())
            }
            CliError::FileRead { path, error } => {
                write!(f, "Failed to read file '{}': {}", path.display(), error)
            }
            CliError::Track { path, line, reason } => {
                write!(f, "Invalid track file '{}' line {}: {}", path.display(), line, reason)
            }
            CliError::Input(e) => write!(f, "Failed to read commands: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::Encode(e) => write!(f, "Failed to encode coordinate: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::FileRead { error, .. } => Some(error),
            CliError::Input(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::Encode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<CodecError> for CliError {
    fn from(e: CodecError) -> Self {
        CliError::Encode(e)
    }
}
