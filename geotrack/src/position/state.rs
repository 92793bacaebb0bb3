//! Core types for position events.
//!
//! - [`PositionStatus`] - Is the platform able to produce fixes?
//! - [`Coordinate`] - A single fix with optional vector data
//! - [`PositionEvent`] - What a position source publishes

use serde::{Deserialize, Serialize};

/// Status reported by the platform positioning service alongside each event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionStatus {
    /// Location data is available.
    Ready,
    /// The service is acquiring a fix.
    Initializing,
    /// No fix could be obtained from any source.
    NoData,
    /// Location access is disabled (user or policy).
    Disabled,
    /// The service has not been started yet.
    #[default]
    NotInitialized,
    /// The platform has no positioning capability.
    NotAvailable,
}

impl PositionStatus {
    /// Returns true if this status means no fix can be produced at all.
    ///
    /// Such events are reported to the host as errors; the session keeps running.
    #[inline]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Disabled | Self::NotAvailable)
    }
}

impl std::fmt::Display for PositionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready => write!(f, "Ready"),
            Self::Initializing => write!(f, "Initializing"),
            Self::NoData => write!(f, "NoData"),
            Self::Disabled => write!(f, "Disabled"),
            Self::NotInitialized => write!(f, "NotInitialized"),
            Self::NotAvailable => write!(f, "NotAvailable"),
        }
    }
}

/// A position fix.
///
/// Serialized as the outbound payload (see [`crate::codec`]). Optional fields
/// are omitted when the source does not provide them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,

    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,

    /// Horizontal accuracy in meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,

    /// Altitude in meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,

    /// Vertical accuracy in meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude_accuracy: Option<f64>,

    /// Heading in degrees (0-360).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,

    /// Speed in meters per second.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,

    /// Time of the fix in milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: i64,
}

impl Coordinate {
    /// Create a coordinate with only latitude and longitude, stamped now.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
            altitude: None,
            altitude_accuracy: None,
            heading: None,
            speed: None,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Set the horizontal accuracy.
    pub fn with_accuracy(mut self, meters: f64) -> Self {
        self.accuracy = Some(meters);
        self
    }

    /// Set the fix time.
    pub fn with_timestamp(mut self, timestamp_ms: i64) -> Self {
        self.timestamp = timestamp_ms;
        self
    }

    /// Get position as (latitude, longitude) tuple.
    pub fn position(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// An event published by a position source.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionEvent {
    pub status: PositionStatus,

    /// Human-readable description, surfaced when debug mode is on.
    pub debug_message: String,

    /// The fix, if the source produced one.
    pub coordinate: Option<Coordinate>,
}

impl PositionEvent {
    /// A fix with `Ready` status.
    pub fn fix(coordinate: Coordinate, debug_message: impl Into<String>) -> Self {
        Self {
            status: PositionStatus::Ready,
            debug_message: debug_message.into(),
            coordinate: Some(coordinate),
        }
    }

    /// A status change without a fix.
    pub fn status(status: PositionStatus, debug_message: impl Into<String>) -> Self {
        Self {
            status,
            debug_message: debug_message.into(),
            coordinate: None,
        }
    }
}
