//! Position source interface.
//!
//! A [`PositionSource`] wraps a platform's continuous-location service. The
//! tracker never talks to the platform directly: it asks a
//! [`PositionSourceFactory`] for a fresh source each time a session is built,
//! subscribes to its event stream, and starts it.
//!
//! Events are published on a `tokio::sync::broadcast` channel so that the
//! source never blocks on a slow consumer.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use super::state::PositionEvent;

/// Parameters a source is built with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceParams {
    /// Desired horizontal accuracy in meters.
    pub desired_accuracy_m: u32,

    /// Location timeout in milliseconds.
    pub timeout_ms: u64,

    /// Minimum displacement in meters between reported fixes.
    pub distance_filter_m: f64,
}

impl SourceParams {
    /// Create source parameters from a timeout duration.
    pub fn new(desired_accuracy_m: u32, timeout: Duration, distance_filter_m: f64) -> Self {
        Self {
            desired_accuracy_m,
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            distance_filter_m,
        }
    }

    /// Get the timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Error type for position sources.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    /// The platform refused to start location updates.
    #[error("Position source failed to start: {0}")]
    StartFailed(String),

    /// The source has no tokio runtime to run on.
    #[error("Position source requires a tokio runtime: {0}")]
    NoRuntime(String),
}

/// A continuous-location service.
///
/// The event stream terminates only when the source is stopped.
pub trait PositionSource: Send + Sync {
    /// Start delivering events.
    fn start(&self) -> Result<(), SourceError>;

    /// Stop delivering events. Stopping an inactive source is a no-op.
    fn stop(&self);

    /// Returns true while the source is started.
    fn is_active(&self) -> bool;

    /// Subscribe to the event stream.
    fn subscribe(&self) -> broadcast::Receiver<PositionEvent>;
}

/// Builds position sources for new sessions.
pub trait PositionSourceFactory: Send + Sync {
    /// Create a new, not yet started, source.
    fn create(&self, params: SourceParams) -> Arc<dyn PositionSource>;
}
