//! Positional argument parsing.
//!
//! This is the single place where positional argument indices are mapped to
//! option fields. Both entry points attempt every field and collect one
//! [`FieldError`] per failure, so a caller sees all problems in a submission
//! at once.

use std::fmt;
use std::time::Duration;

use super::{ConfigUpdate, TrackingOptions};

/// Positions of the `configure` arguments.
mod configure_index {
    pub const URL: usize = 1;
    pub const STATIONARY_RADIUS: usize = 3;
    pub const DISTANCE_FILTER: usize = 4;
    pub const LOCATION_TIMEOUT: usize = 5;
    pub const DESIRED_ACCURACY: usize = 6;
    pub const DEBUG: usize = 7;
}

/// Positions of the `setConfig` arguments.
mod set_config_index {
    pub const STATIONARY_RADIUS: usize = 0;
    pub const DISTANCE_FILTER: usize = 1;
    pub const LOCATION_TIMEOUT: usize = 2;
    pub const DESIRED_ACCURACY: usize = 3;
}

/// A typed option field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    StationaryRadius,
    DistanceFilter,
    LocationTimeout,
    DesiredAccuracy,
    Debug,
}

impl Field {
    /// Host-facing field name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StationaryRadius => "stationaryRadius",
            Self::DistanceFilter => "distanceFilter",
            Self::LocationTimeout => "locationTimeout",
            Self::DesiredAccuracy => "desiredAccuracy",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A field that failed to parse, with the raw value that was submitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid value for {field}:{value}")]
pub struct FieldError {
    pub field: Field,
    pub value: String,
}

/// Result of parsing a `configure` submission.
///
/// Successfully parsed fields are kept even when `options.valid` is false;
/// failed fields hold their zero value.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedOptions {
    pub options: TrackingOptions,
    pub errors: Vec<FieldError>,
}

/// Collects field values and errors for one submission.
struct FieldReader<'a> {
    args: &'a [String],
    errors: Vec<FieldError>,
}

impl<'a> FieldReader<'a> {
    fn new(args: &'a [String]) -> Self {
        Self {
            args,
            errors: Vec::new(),
        }
    }

    fn raw(&self, index: usize) -> &'a str {
        self.args.get(index).map(String::as_str).unwrap_or("")
    }

    fn read<T>(&mut self, index: usize, field: Field, parse: fn(&str) -> Option<T>) -> Option<T> {
        let raw = self.raw(index);
        let value = parse(raw);
        if value.is_none() {
            self.errors.push(FieldError {
                field,
                value: raw.to_string(),
            });
        }
        value
    }

    fn meters(&mut self, index: usize, field: Field) -> Option<f64> {
        self.read(index, field, parse_meters)
    }

    fn unsigned(&mut self, index: usize, field: Field) -> Option<u32> {
        self.read(index, field, parse_unsigned)
    }

    fn flag(&mut self, index: usize, field: Field) -> Option<bool> {
        self.read(index, field, parse_flag)
    }
}

/// Parse a `configure` submission.
///
/// Expected layout: `[reserved, url, reserved, stationaryRadius,
/// distanceFilter, locationTimeout, desiredAccuracy, debug]`.
pub fn parse_configure(args: &[String]) -> ParsedOptions {
    use self::configure_index::*;

    let mut reader = FieldReader::new(args);

    let stationary_radius = reader.meters(STATIONARY_RADIUS, Field::StationaryRadius);
    let distance_filter = reader.meters(DISTANCE_FILTER, Field::DistanceFilter);
    let location_timeout = reader.unsigned(LOCATION_TIMEOUT, Field::LocationTimeout);
    let desired_accuracy = reader.unsigned(DESIRED_ACCURACY, Field::DesiredAccuracy);
    let debug = reader.flag(DEBUG, Field::Debug);

    let options = TrackingOptions {
        url: reader.raw(URL).to_string(),
        stationary_radius: stationary_radius.unwrap_or_default(),
        distance_filter: distance_filter.unwrap_or_default(),
        location_timeout: Duration::from_secs(u64::from(location_timeout.unwrap_or_default())),
        desired_accuracy: desired_accuracy.unwrap_or_default(),
        debug: debug.unwrap_or_default(),
        valid: reader.errors.is_empty(),
    };

    ParsedOptions {
        options,
        errors: reader.errors,
    }
}

/// Parse a `setConfig` submission.
///
/// Expected layout: `[stationaryRadius, distanceFilter, locationTimeout,
/// desiredAccuracy]`. Returns every field error when any field fails.
pub fn parse_set_config(args: &[String]) -> Result<ConfigUpdate, Vec<FieldError>> {
    use self::set_config_index::*;

    let mut reader = FieldReader::new(args);

    let stationary_radius = reader.meters(STATIONARY_RADIUS, Field::StationaryRadius);
    let distance_filter = reader.meters(DISTANCE_FILTER, Field::DistanceFilter);
    let location_timeout = reader.unsigned(LOCATION_TIMEOUT, Field::LocationTimeout);
    let desired_accuracy = reader.unsigned(DESIRED_ACCURACY, Field::DesiredAccuracy);

    match (
        stationary_radius,
        distance_filter,
        location_timeout,
        desired_accuracy,
    ) {
        (Some(stationary_radius), Some(distance_filter), Some(timeout), Some(desired_accuracy))
            if reader.errors.is_empty() =>
        {
            Ok(ConfigUpdate {
                stationary_radius,
                distance_filter,
                location_timeout: Duration::from_secs(u64::from(timeout)),
                desired_accuracy,
            })
        }
        _ => Err(reader.errors),
    }
}

/// Parse a non-negative, finite distance in meters.
fn parse_meters(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Parse an unsigned decimal integer.
fn parse_unsigned(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}

/// Parse `true` / `false`, ignoring case.
fn parse_flag(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
