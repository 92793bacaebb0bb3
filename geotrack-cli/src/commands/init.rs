//! Init command - write a default config file.

use std::path::{Path, PathBuf};

use geotrack::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Arguments for the init command.
pub struct InitArgs {
    pub path: Option<PathBuf>,
    pub force: bool,
}

/// Run the init command.
pub fn run(args: InitArgs) -> Result<(), CliError> {
    let path = args.path.unwrap_or_else(config_file_path);
    write_default(&path, args.force)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn write_default(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::ConfigExists(path.to_path_buf()));
    }
    ConfigFile::default().save_to(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_loadable_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("geotrack").join("config.ini");

        write_default(&path, false).unwrap();

        assert_eq!(ConfigFile::load_from(&path).unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_refuses_to_overwrite_without_force() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.ini");
        std::fs::write(&path, "[tracker]\nevent_buffer = 8\n").unwrap();

        assert!(matches!(
            write_default(&path, false),
            Err(CliError::ConfigExists(_))
        ));
        assert_eq!(ConfigFile::load_from(&path).unwrap().tracker.event_buffer, 8);

        write_default(&path, true).unwrap();
        assert_eq!(ConfigFile::load_from(&path).unwrap(), ConfigFile::default());
    }
}
