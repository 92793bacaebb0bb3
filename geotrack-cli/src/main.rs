//! geotrack CLI - Command-line host for the geotrack position tracker
//!
//! Drives a tracking session from a command script (or stdin) against a
//! simulated position source and prints every result the tracker dispatches.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::encode::EncodeArgs;
use commands::init::InitArgs;
use commands::run::RunArgs;

#[derive(Parser)]
#[command(name = "geotrack")]
#[command(version = geotrack::VERSION)]
#[command(about = "Background position tracker host", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a tracking session, reading `<action> <json>` commands line by line
    Run {
        /// Command script to execute (reads stdin when omitted)
        #[arg(long)]
        script: Option<PathBuf>,

        /// Track file of `lat,lon` lines replayed by the simulated source
        #[arg(long)]
        track: Option<PathBuf>,

        /// Config file to use instead of ~/.geotrack/config.ini
        #[arg(long)]
        config: Option<PathBuf>,

        /// Enable debug-level logging
        #[arg(long)]
        debug: bool,
    },

    /// Write a default config file
    Init {
        /// Where to write it (defaults to ~/.geotrack/config.ini)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the payload a position fix is delivered as
    Encode {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Horizontal accuracy in meters
        #[arg(long)]
        accuracy: Option<f64>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            script,
            track,
            config,
            debug,
        } => commands::run::run(RunArgs {
            script,
            track,
            config,
            debug,
        }),
        Commands::Init { path, force } => commands::init::run(InitArgs { path, force }),
        Commands::Encode { lat, lon, accuracy } => {
            commands::encode::run(EncodeArgs { lat, lon, accuracy })
        }
    };

    if let Err(e) = result {
        e.exit();
    }
}
