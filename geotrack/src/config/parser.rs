//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::time::Duration;

use super::defaults::MIN_EVENT_BUFFER;
use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
        if let Some(v) = section.get("stdout") {
            config.logging.stdout = parse_bool(v);
        }
    }

    // [tracker] section
    if let Some(section) = ini.section(Some("tracker")) {
        if let Some(v) = section.get("event_buffer") {
            let buffer = v
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n >= MIN_EVENT_BUFFER)
                .ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "tracker".to_string(),
                    key: "event_buffer".to_string(),
                    value: v.to_string(),
                    reason: format!("must be an integer >= {}", MIN_EVENT_BUFFER),
                })?;
            config.tracker.event_buffer = buffer;
        }
    }

    // [simulator] section
    if let Some(section) = ini.section(Some("simulator")) {
        if let Some(v) = section.get("interval_ms") {
            let ms = v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "simulator".to_string(),
                    key: "interval_ms".to_string(),
                    value: v.to_string(),
                    reason: "must be a positive number of milliseconds".to_string(),
                })?;
            config.simulator.interval = Duration::from_millis(ms);
        }
        if let Some(v) = section.get("loop_track") {
            config.simulator.loop_track = parse_bool(v);
        }
    }

    Ok(config)
}

/// Parse a boolean value from a config string.
/// Accepts: true/false, yes/no, 1/0, on/off (case-insensitive)
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_partial_config() {
        let config = load(
            r#"
[simulator]
interval_ms = 200
"#,
        )
        .unwrap();

        // Specified values
        assert_eq!(config.simulator.interval, Duration::from_millis(200));

        // Default values
        assert_eq!(config.tracker.event_buffer, DEFAULT_EVENT_BUFFER);
        assert_eq!(config.logging.file, DEFAULT_LOG_FILE);
    }

    #[test]
    fn test_full_config() {
        let config = load(
            r#"
[logging]
directory = /tmp/geotrack-logs
file = tracker.log
stdout = yes

[tracker]
event_buffer = 8

[simulator]
interval_ms = 50
loop_track = on
"#,
        )
        .unwrap();

        assert_eq!(config.logging.directory, PathBuf::from("/tmp/geotrack-logs"));
        assert_eq!(config.logging.file, "tracker.log");
        assert!(config.logging.stdout);
        assert_eq!(config.tracker.event_buffer, 8);
        assert_eq!(config.simulator.interval, Duration::from_millis(50));
        assert!(config.simulator.loop_track);
    }

    #[test]
    fn test_invalid_event_buffer() {
        let err = load("[tracker]\nevent_buffer = 0\n").unwrap_err();
        match err {
            ConfigFileError::InvalidValue { section, key, .. } => {
                assert_eq!(section, "tracker");
                assert_eq!(key, "event_buffer");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(load("[tracker]\nevent_buffer = lots\n").is_err());
    }

    #[test]
    fn test_invalid_interval() {
        let err = load("[simulator]\ninterval_ms = -5\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigFileError::InvalidValue { ref key, .. } if key == "interval_ms"
        ));
        assert!(load("[simulator]\ninterval_ms = 0\n").is_err());
    }

    #[test]
    fn test_empty_values_keep_defaults() {
        let config = load("[logging]\ndirectory =\nfile =\n").unwrap();
        assert_eq!(config.logging.directory, PathBuf::from(DEFAULT_LOG_DIRECTORY));
        assert_eq!(config.logging.file, DEFAULT_LOG_FILE);
    }

    #[test]
    fn test_parse_bool_true_values() {
        for v in ["true", "TRUE", "1", "yes", "On"] {
            assert!(parse_bool(v), "{v} should parse as true");
        }
    }

    #[test]
    fn test_parse_bool_false_values() {
        for v in ["false", "0", "no", "off", "", "maybe"] {
            assert!(!parse_bool(v), "{v} should parse as false");
        }
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/logs");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("logs"));
        }
        assert_eq!(expand_tilde("/abs/logs"), PathBuf::from("/abs/logs"));
    }
}
