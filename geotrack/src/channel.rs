//! Result channel between the tracker and its host.
//!
//! Every command invocation carries a [`CallbackId`] so results can be routed
//! back to the call that produced them. Position updates are delivered on the
//! callback captured by the most recent `configure`, with the keep-callback
//! flag set so the host knows more messages will follow.
//!
//! - [`ResultStatus`] - Outcome class of a result
//! - [`PluginResult`] - One message on a callback
//! - [`ResultSink`] - Host transport (external collaborator)
//! - [`ChannelSink`] - tokio mpsc implementation of the transport

use std::fmt;

use tokio::sync::mpsc;

/// Identifier of a host callback.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallbackId(String);

impl CallbackId {
    /// Create a callback identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CallbackId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Outcome class of a [`PluginResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus {
    /// Acknowledgement without a payload.
    NoResult,
    /// Success, optionally carrying a payload.
    Ok,
    /// Runtime error (adapter status, unsupported operation).
    Error,
    /// A configuration field could not be parsed.
    JsonException,
    /// The command is not valid in the current state.
    InvalidAction,
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoResult => write!(f, "NO_RESULT"),
            Self::Ok => write!(f, "OK"),
            Self::Error => write!(f, "ERROR"),
            Self::JsonException => write!(f, "JSON_EXCEPTION"),
            Self::InvalidAction => write!(f, "INVALID_ACTION"),
        }
    }
}

/// A single message delivered on a host callback.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginResult {
    pub status: ResultStatus,
    pub message: String,
    /// Set when more messages will follow on the same callback.
    pub keep_callback: bool,
}

impl PluginResult {
    /// Create a result that closes the callback.
    pub fn new(status: ResultStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            keep_callback: false,
        }
    }

    /// Success without a payload.
    pub fn ok() -> Self {
        Self::new(ResultStatus::Ok, String::new())
    }

    /// Success carrying a payload.
    pub fn ok_with(payload: impl Into<String>) -> Self {
        Self::new(ResultStatus::Ok, payload)
    }

    /// Acknowledgement without a payload.
    pub fn no_result() -> Self {
        Self::new(ResultStatus::NoResult, String::new())
    }

    pub fn invalid_action(message: impl Into<String>) -> Self {
        Self::new(ResultStatus::InvalidAction, message)
    }

    pub fn json_exception(message: impl Into<String>) -> Self {
        Self::new(ResultStatus::JsonException, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ResultStatus::Error, message)
    }

    /// Mark the callback as staying open for further messages.
    pub fn keep_open(mut self) -> Self {
        self.keep_callback = true;
        self
    }
}

/// Host transport for results.
///
/// Implementations must not block for long: results are dispatched from the
/// command path and from the event translator task.
pub trait ResultSink: Send + Sync {
    /// Deliver a result to the given callback.
    fn dispatch(&self, callback: &CallbackId, result: PluginResult);
}

/// A result together with the callback it was addressed to.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched {
    pub callback: CallbackId,
    pub result: PluginResult,
}

/// Result sink backed by an unbounded tokio mpsc channel.
///
/// Dispatch never blocks; results are dropped with a debug log once the
/// receiving side is gone.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Dispatched>,
}

impl ChannelSink {
    /// Create a sink and the receiver the host drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Dispatched>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ResultSink for ChannelSink {
    fn dispatch(&self, callback: &CallbackId, result: PluginResult) {
        tracing::trace!(
            callback = %callback,
            status = %result.status,
            keep_callback = result.keep_callback,
            "Dispatching result"
        );
        let dispatched = Dispatched {
            callback: callback.clone(),
            result,
        };
        if self.tx.send(dispatched).is_err() {
            tracing::debug!(callback = %callback, "Result receiver dropped, discarding result");
        }
    }
}
