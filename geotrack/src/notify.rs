//! Debug notifications.
//!
//! When debug mode is on, every fix is announced through a side channel in
//! addition to the log: on a device this is a toast plus an audible tone.
//! The notifier is best-effort; a failure never blocks position delivery.

use std::time::Duration;

/// Pitch of a debug tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pitch {
    Low,
    High,
}

/// An audible debug pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tone {
    pub duration: Duration,
    pub pitch: Pitch,
}

impl Tone {
    /// Tone played for every reported fix.
    pub const FIX: Self = Self {
        duration: Duration::from_millis(750),
        pitch: Pitch::High,
    };
}

/// Error type for debug notifiers.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The notification surface is not available.
    #[error("Debug notifier unavailable: {0}")]
    Unavailable(String),
}

/// Side channel for debug notifications.
pub trait DebugNotifier: Send + Sync {
    /// Show a message and play a tone.
    fn notify(&self, message: &str, tone: Tone) -> Result<(), NotifyError>;
}

/// Notifier that writes to the log instead of a device surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl DebugNotifier for LogNotifier {
    fn notify(&self, message: &str, tone: Tone) -> Result<(), NotifyError> {
        tracing::info!(
            tone_ms = tone.duration.as_millis() as u64,
            pitch = ?tone.pitch,
            "{}",
            message
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_tone() {
        assert_eq!(Tone::FIX.duration, Duration::from_millis(750));
        assert_eq!(Tone::FIX.pitch, Pitch::High);
    }

    #[test]
    fn test_log_notifier_never_fails() {
        assert!(LogNotifier.notify("fix #1", Tone::FIX).is_ok());
    }
}
