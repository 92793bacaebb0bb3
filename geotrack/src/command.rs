//! Host command routing.
//!
//! Hosts invoke the tracker by action name with a raw JSON argument payload
//! and a callback identifier. [`CommandRouter`] decodes the payload, invokes
//! the [`SessionController`], and reports any error on the call's callback
//! in addition to returning it.
//!
//! # Argument payloads
//!
//! Payloads are JSON arrays. Entries may be strings, numbers, booleans or
//! null; they are normalised to strings (null becomes the empty string)
//! before the options parser sees them. An empty payload decodes to no
//! arguments; a bare scalar decodes to a single argument.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::channel::{CallbackId, PluginResult, ResultSink};
use crate::error::TrackerError;
use crate::session::SessionController;

/// A decoded host command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Configure(Vec<String>),
    Start,
    Stop,
    SetConfig(Vec<String>),
    Finish,
    OnPaceChange(bool),
    GetStationaryLocation,
}

impl Command {
    /// Decode an action name and its raw JSON payload.
    pub fn parse(action: &str, raw_args: &str) -> Result<Self, TrackerError> {
        let malformed = |source: serde_json::Error| TrackerError::MalformedArguments {
            action: action.to_string(),
            source,
        };

        match action {
            "configure" => Ok(Self::Configure(decode_args(raw_args).map_err(malformed)?)),
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "setConfig" => Ok(Self::SetConfig(decode_args(raw_args).map_err(malformed)?)),
            "finish" => Ok(Self::Finish),
            "onPaceChange" => {
                let values = decode_values(raw_args).map_err(malformed)?;
                let first = values.into_iter().next().unwrap_or(Value::Null);
                let is_moving = serde_json::from_value::<bool>(first).map_err(malformed)?;
                Ok(Self::OnPaceChange(is_moving))
            }
            "getStationaryLocation" => Ok(Self::GetStationaryLocation),
            other => Err(TrackerError::UnknownAction(other.to_string())),
        }
    }

    /// Host-facing action name.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Configure(_) => "configure",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::SetConfig(_) => "setConfig",
            Self::Finish => "finish",
            Self::OnPaceChange(_) => "onPaceChange",
            Self::GetStationaryLocation => "getStationaryLocation",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action())
    }
}

/// Routes host commands to a [`SessionController`].
#[derive(Clone)]
pub struct CommandRouter {
    controller: Arc<SessionController>,
    sink: Arc<dyn ResultSink>,
}

impl CommandRouter {
    /// Create a router. `sink` must be the sink the controller reports to.
    pub fn new(controller: Arc<SessionController>, sink: Arc<dyn ResultSink>) -> Self {
        Self { controller, sink }
    }

    /// Get the controller behind this router.
    pub fn controller(&self) -> &Arc<SessionController> {
        &self.controller
    }

    /// Decode and run one host invocation.
    pub async fn execute(
        &self,
        action: &str,
        raw_args: &str,
        call: &CallbackId,
    ) -> Result<(), TrackerError> {
        let command = match Command::parse(action, raw_args) {
            Ok(command) => command,
            Err(e) => {
                self.report(call, &e);
                return Err(e);
            }
        };
        self.run(command, call).await
    }

    /// Run a decoded command.
    pub async fn run(&self, command: Command, call: &CallbackId) -> Result<(), TrackerError> {
        tracing::debug!(action = %command, callback = %call, "Running command");

        let result = match command {
            Command::Configure(args) => {
                self.controller.configure(call, &args);
                Ok(())
            }
            Command::Start => {
                self.controller.start(call).await;
                Ok(())
            }
            Command::Stop => {
                self.controller.stop(call).await;
                Ok(())
            }
            Command::SetConfig(args) => {
                self.controller.set_config(call, &args).await;
                Ok(())
            }
            Command::Finish => {
                self.controller.finish(call);
                Ok(())
            }
            Command::OnPaceChange(is_moving) => self.controller.on_pace_change(call, is_moving),
            Command::GetStationaryLocation => self.controller.get_stationary_location(call),
        };

        if let Err(e) = &result {
            self.report(call, e);
        }
        result
    }

    fn report(&self, call: &CallbackId, error: &TrackerError) {
        let result = match error {
            TrackerError::NotImplemented { .. } => PluginResult::error(error.to_string()),
            TrackerError::UnknownAction(_) => PluginResult::invalid_action(error.to_string()),
            TrackerError::MalformedArguments { .. } => {
                PluginResult::json_exception(error.to_string())
            }
        };
        self.sink.dispatch(call, result);
    }
}

/// Decode a payload into raw JSON values.
fn decode_values(raw_args: &str) -> Result<Vec<Value>, serde_json::Error> {
    let raw_args = raw_args.trim();
    if raw_args.is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str::<Value>(raw_args)? {
        Value::Array(values) => Ok(values),
        scalar => Ok(vec![scalar]),
    }
}

/// Decode a payload into positional string arguments.
pub fn decode_args(raw_args: &str) -> Result<Vec<String>, serde_json::Error> {
    Ok(decode_values(raw_args)?
        .into_iter()
        .map(|value| match value {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect())
}
