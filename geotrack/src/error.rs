//! Tracker error types.
//!
//! Precondition failures (not configured, already started, bad `setConfig`
//! payload) are not errors in this sense: they are delivered to the host as
//! results on the callback channel. [`TrackerError`] covers what the command
//! surface itself rejects.

/// Errors returned by the command surface.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// The operation exists on the command surface but is not supported.
    #[error("{operation} is not implemented")]
    NotImplemented { operation: &'static str },

    /// The host invoked an action the tracker does not know.
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// The raw argument payload could not be decoded.
    #[error("Malformed arguments for {action}: {source}")]
    MalformedArguments {
        action: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_not_implemented() {
        let err = TrackerError::NotImplemented {
            operation: "onPaceChange",
        };
        assert_eq!(err.to_string(), "onPaceChange is not implemented");
    }

    #[test]
    fn test_display_unknown_action() {
        let err = TrackerError::UnknownAction("teleport".to_string());
        assert!(err.to_string().contains("teleport"));
    }

    #[test]
    fn test_malformed_arguments_has_source() {
        let source = serde_json::from_str::<Vec<String>>("[").unwrap_err();
        let err = TrackerError::MalformedArguments {
            action: "configure".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("Malformed arguments for configure"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
