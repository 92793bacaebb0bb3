//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[logging]
; Directory the log file is written to (~ is expanded)
directory = {}
; Log file name, cleared on every start
file = {}
; Also print log output to stdout (true/false)
stdout = {}

[tracker]
; Events buffered per position source before slow consumers lag
event_buffer = {}

[simulator]
; Milliseconds between replayed track points
interval_ms = {}
; Restart the track from the first point when exhausted (true/false)
loop_track = {}
"#,
        path_to_string(&config.logging.directory),
        config.logging.file,
        config.logging.stdout,
        config.tracker.event_buffer,
        config.simulator.interval.as_millis(),
        config.simulator.loop_track,
    )
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_every_section() {
        let content = to_config_string(&ConfigFile::default());

        assert!(content.contains("[logging]"));
        assert!(content.contains("file = geotrack.log"));
        assert!(content.contains("[tracker]"));
        assert!(content.contains("event_buffer = 64"));
        assert!(content.contains("[simulator]"));
        assert!(content.contains("interval_ms = 1000"));
        assert!(content.contains("loop_track = false"));
    }
}
