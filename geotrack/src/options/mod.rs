//! Tracking options.
//!
//! The host submits options as positional string arguments. They are parsed
//! once at the boundary into a typed [`TrackingOptions`] record; every field
//! that fails to parse is reported individually as a [`FieldError`].
//!
//! - [`parse_configure`] - Full 8-field `configure` payload
//! - [`parse_set_config`] - 4-field numeric `setConfig` payload

mod parser;

use std::time::Duration;

use crate::position::SourceParams;

pub use parser::{parse_configure, parse_set_config, Field, FieldError, ParsedOptions};

/// Options governing a tracking session.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingOptions {
    /// Upload endpoint, opaque to the tracker.
    pub url: String,

    /// Radius in meters within which the device counts as stationary.
    pub stationary_radius: f64,

    /// Minimum displacement in meters between reported fixes.
    pub distance_filter: f64,

    /// How long the source may take to produce a fix.
    pub location_timeout: Duration,

    /// Desired horizontal accuracy in meters.
    pub desired_accuracy: u32,

    /// Emit debug diagnostics for every fix.
    pub debug: bool,

    /// False if any field failed to parse. Check before use.
    pub valid: bool,
}

impl TrackingOptions {
    /// Parameters for building a position source from these options.
    pub fn source_params(&self) -> SourceParams {
        SourceParams::new(
            self.desired_accuracy,
            self.location_timeout,
            self.distance_filter,
        )
    }

    /// Overwrite the numeric fields with a validated update.
    pub fn apply(&mut self, update: &ConfigUpdate) {
        self.stationary_radius = update.stationary_radius;
        self.distance_filter = update.distance_filter;
        self.location_timeout = update.location_timeout;
        self.desired_accuracy = update.desired_accuracy;
    }
}

/// A validated `setConfig` payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfigUpdate {
    pub stationary_radius: f64,
    pub distance_filter: f64,
    pub location_timeout: Duration,
    pub desired_accuracy: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> TrackingOptions {
        TrackingOptions {
            url: "https://example.com".to_string(),
            stationary_radius: 50.0,
            distance_filter: 10.0,
            location_timeout: Duration::from_secs(60),
            desired_accuracy: 100,
            debug: true,
            valid: true,
        }
    }

    #[test]
    fn test_source_params_in_milliseconds() {
        let params = options().source_params();
        assert_eq!(params.timeout_ms, 60_000);
        assert_eq!(params.desired_accuracy_m, 100);
        assert_eq!(params.distance_filter_m, 10.0);
    }

    #[test]
    fn test_apply_keeps_url_and_debug() {
        let mut o = options();
        o.apply(&ConfigUpdate {
            stationary_radius: 5.0,
            distance_filter: 1.0,
            location_timeout: Duration::from_secs(2),
            desired_accuracy: 3,
        });

        assert_eq!(o.url, "https://example.com");
        assert!(o.debug);
        assert_eq!(o.stationary_radius, 5.0);
        assert_eq!(o.source_params().timeout_ms, 2_000);
    }

    #[test]
    fn test_apply_twice_does_not_rescale() {
        let mut o = options();
        let update = ConfigUpdate {
            stationary_radius: 5.0,
            distance_filter: 1.0,
            location_timeout: Duration::from_secs(30),
            desired_accuracy: 3,
        };
        o.apply(&update);
        o.apply(&update);
        assert_eq!(o.source_params().timeout_ms, 30_000);
    }
}
