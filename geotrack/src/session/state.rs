//! Configuration phase and shared configuration slot.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::channel::CallbackId;
use crate::options::TrackingOptions;

/// Configuration phase of the tracker.
///
/// Orthogonal to whether tracking is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigPhase {
    /// `configure` has never completed.
    #[default]
    Unconfigured,
    /// A `configure` call is in flight.
    Configuring,
    /// The last `configure` call has completed (its options may be invalid).
    Configured,
}

impl ConfigPhase {
    #[inline]
    pub fn is_configuring(&self) -> bool {
        matches!(self, Self::Configuring)
    }
}

impl std::fmt::Display for ConfigPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unconfigured => write!(f, "Unconfigured"),
            Self::Configuring => write!(f, "Configuring"),
            Self::Configured => write!(f, "Configured"),
        }
    }
}

/// What the last `configure` stored.
#[derive(Debug, Clone, Default)]
pub(crate) struct ConfigSlot {
    pub options: Option<TrackingOptions>,
    /// Callback of the last `configure`; position updates are delivered here.
    pub callback: Option<CallbackId>,
}

impl ConfigSlot {
    /// Options, if stored and valid.
    pub fn valid_options(&self) -> Option<&TrackingOptions> {
        self.options.as_ref().filter(|o| o.valid)
    }

    /// Mutable options, if stored and valid.
    pub fn valid_options_mut(&mut self) -> Option<&mut TrackingOptions> {
        self.options.as_mut().filter(|o| o.valid)
    }

    pub fn is_configured(&self) -> bool {
        self.valid_options().is_some()
    }

    pub fn debug(&self) -> bool {
        self.options.as_ref().is_some_and(|o| o.debug)
    }
}

pub(crate) type SharedConfig = Arc<RwLock<ConfigSlot>>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn options(valid: bool) -> TrackingOptions {
        TrackingOptions {
            url: String::new(),
            stationary_radius: 0.0,
            distance_filter: 0.0,
            location_timeout: Duration::from_secs(1),
            desired_accuracy: 10,
            debug: true,
            valid,
        }
    }

    #[test]
    fn test_phase_default() {
        assert_eq!(ConfigPhase::default(), ConfigPhase::Unconfigured);
        assert!(ConfigPhase::Configuring.is_configuring());
        assert!(!ConfigPhase::Configured.is_configuring());
    }

    #[test]
    fn test_slot_validity() {
        let mut slot = ConfigSlot::default();
        assert!(!slot.is_configured());
        assert!(!slot.debug());

        slot.options = Some(options(false));
        assert!(!slot.is_configured());
        assert!(slot.debug());

        slot.options = Some(options(true));
        assert!(slot.is_configured());
    }

    #[test]
    fn test_valid_options_mut_skips_invalid() {
        let mut slot = ConfigSlot::default();
        assert!(slot.valid_options_mut().is_none());

        slot.options = Some(options(false));
        assert!(slot.valid_options_mut().is_none());

        slot.options = Some(options(true));
        slot.valid_options_mut().unwrap().desired_accuracy = 99;
        assert_eq!(slot.valid_options().unwrap().desired_accuracy, 99);
    }
}
