//! Session Lifecycle Controller.
//!
//! Owns the single tracking session and enforces the command ordering:
//!
//! ```text
//! configure ──► start ──► (setConfig ...) ──► stop
//! ```
//!
//! # Synchronization
//!
//! - `start`, `setConfig` and `stop` serialize on the session lock; the whole
//!   "check preconditions → replace session" sequence runs under it, so at
//!   most one session is ever active.
//! - `configure` never takes the session lock. It publishes its phase on a
//!   watch channel and `start` waits until no configure is in flight before
//!   reading the options.
//!
//! Precondition failures are reported on the invoking call's callback as
//! `InvalidAction` results, never as Rust errors.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard, RwLock};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::handle::Session;
use super::state::{ConfigPhase, ConfigSlot, SharedConfig};
use super::translator::EventTranslator;
use crate::channel::{CallbackId, PluginResult, ResultSink};
use crate::error::TrackerError;
use crate::notify::DebugNotifier;
use crate::options::{parse_configure, parse_set_config, ConfigUpdate, TrackingOptions};
use crate::position::PositionSourceFactory;

const NOT_CONFIGURED: &str = "Cannot start: Run configure() with proper values!";
const ALREADY_STARTED: &str = "Already started!";
const EMPTY_SET_CONFIG: &str = "Cannot set config because of an empty input";
const SET_CONFIG_NOT_CONFIGURED: &str = "Cannot set config: Run configure() with proper values!";

/// Controller for the tracking lifecycle.
///
/// Share it behind an `Arc`; every command takes `&self`.
pub struct SessionController {
    factory: Arc<dyn PositionSourceFactory>,
    sink: Arc<dyn ResultSink>,
    translator: EventTranslator,

    /// Options and callback stored by the last `configure`.
    config: SharedConfig,

    /// Configuration phase, observed by `start`.
    phase: watch::Sender<ConfigPhase>,

    /// Serializes `configure` calls.
    configure_lock: Mutex<()>,

    /// The live session. Also serializes start / setConfig / stop.
    session: tokio::sync::Mutex<Option<Session>>,

    running: AtomicBool,
}

impl SessionController {
    /// Create a controller.
    ///
    /// # Arguments
    ///
    /// * `factory` - Builds a position source for each new session
    /// * `sink` - Host transport for results
    /// * `notifier` - Side channel for debug-mode notifications
    pub fn new(
        factory: Arc<dyn PositionSourceFactory>,
        sink: Arc<dyn ResultSink>,
        notifier: Arc<dyn DebugNotifier>,
    ) -> Self {
        let config: SharedConfig = Arc::new(RwLock::new(ConfigSlot::default()));
        let translator = EventTranslator::new(Arc::clone(&config), Arc::clone(&sink), notifier);
        let (phase, _) = watch::channel(ConfigPhase::Unconfigured);

        Self {
            factory,
            sink,
            translator,
            config,
            phase,
            configure_lock: Mutex::new(()),
            session: tokio::sync::Mutex::new(None),
            running: AtomicBool::new(false),
        }
    }

    /// Parse and store tracking options.
    ///
    /// Each malformed field is reported as a `JsonException` on `call`. The
    /// options are stored even when invalid; `start` checks validity. `call`
    /// becomes the callback that receives position updates.
    pub fn configure(&self, call: &CallbackId, args: &[String]) {
        self.begin_configure().complete(call, args);
    }

    /// Enter the `Configuring` phase ahead of having the arguments.
    ///
    /// `start` calls made while the ticket is alive wait for it. Dropping the
    /// ticket without completing it restores the previous phase.
    pub fn begin_configure(&self) -> ConfigureTicket<'_> {
        let guard = self.configure_lock.lock();
        let previous = self.phase.send_replace(ConfigPhase::Configuring);
        debug!(previous = %previous, "Configuring");

        ConfigureTicket {
            controller: self,
            _guard: guard,
            previous,
            completed: false,
        }
    }

    /// Start tracking with the configured options.
    ///
    /// Replies `Ok` once running, or `InvalidAction` when not configured
    /// (after running the stop cleanup) or already started.
    pub async fn start(&self, call: &CallbackId) {
        let mut session = self.session.lock().await;
        self.wait_for_configure().await;

        let options = self.config.read().valid_options().cloned();
        let Some(options) = options else {
            warn!(phase = %self.phase(), "Start rejected: not configured");
            self.sink
                .dispatch(call, PluginResult::invalid_action(NOT_CONFIGURED));
            self.stop_locked(&mut session).await;
            return;
        };

        if session.as_ref().is_some_and(Session::is_active) {
            warn!("Start rejected: already started");
            self.sink
                .dispatch(call, PluginResult::invalid_action(ALREADY_STARTED));
            return;
        }

        if let Some(stale) = session.take() {
            stale.close().await;
        }

        self.open_locked(&mut session, call, &options).await;
    }

    /// Replace the running session with one built from new numeric options.
    ///
    /// Any live session is torn down before the payload is validated, so a
    /// rejected payload leaves tracking stopped. An empty argument list is
    /// rejected outright; blank entries are reported per field. Stored
    /// options change only when every field parses.
    pub async fn set_config(&self, call: &CallbackId, args: &[String]) {
        let mut session = self.session.lock().await;

        if let Some(previous) = session.take() {
            previous.close().await;
            self.running.store(false, Ordering::SeqCst);
            info!("Session stopped for reconfiguration");
        }

        if args.is_empty() {
            warn!("setConfig rejected: empty input");
            self.sink
                .dispatch(call, PluginResult::invalid_action(EMPTY_SET_CONFIG));
            return;
        }

        self.wait_for_configure().await;
        if !self.config.read().is_configured() {
            warn!("setConfig rejected: not configured");
            self.sink
                .dispatch(call, PluginResult::invalid_action(SET_CONFIG_NOT_CONFIGURED));
            return;
        }

        let update = match parse_set_config(args) {
            Ok(update) => update,
            Err(errors) => {
                for error in errors {
                    warn!(field = %error.field, value = %error.value, "Invalid setConfig field");
                    self.sink
                        .dispatch(call, PluginResult::json_exception(error.to_string()));
                }
                return;
            }
        };

        // A configure may have landed since the check above
        let Some(options) = self.apply_update(&update) else {
            warn!("setConfig rejected: options invalidated by a concurrent configure");
            self.sink
                .dispatch(call, PluginResult::invalid_action(SET_CONFIG_NOT_CONFIGURED));
            return;
        };

        info!(
            stationary_radius = options.stationary_radius,
            distance_filter = options.distance_filter,
            location_timeout_secs = options.location_timeout.as_secs(),
            desired_accuracy = options.desired_accuracy,
            "Options updated"
        );

        self.open_locked(&mut session, call, &options).await;
    }

    /// Stop tracking.
    ///
    /// Safe to call with no session; the running flag is cleared either way.
    pub async fn stop(&self, _call: &CallbackId) {
        let mut session = self.session.lock().await;
        self.stop_locked(&mut session).await;
    }

    /// Send an empty acknowledgement on the configure callback.
    ///
    /// Falls back to `call` when `configure` has never run.
    pub fn finish(&self, call: &CallbackId) {
        let callback = self
            .config
            .read()
            .callback
            .clone()
            .unwrap_or_else(|| call.clone());
        self.sink
            .dispatch(&callback, PluginResult::no_result().keep_open());
    }

    /// Motion-state notification from the host. Not supported.
    pub fn on_pace_change(&self, _call: &CallbackId, is_moving: bool) -> Result<(), TrackerError> {
        warn!(is_moving, "onPaceChange is not implemented");
        Err(TrackerError::NotImplemented {
            operation: "onPaceChange",
        })
    }

    /// Single stationary fix retrieval. Not supported.
    pub fn get_stationary_location(&self, _call: &CallbackId) -> Result<(), TrackerError> {
        warn!("getStationaryLocation is not implemented");
        Err(TrackerError::NotImplemented {
            operation: "getStationaryLocation",
        })
    }

    /// Tear down any session. Used when the host goes away.
    pub async fn shutdown(&self) {
        let mut session = self.session.lock().await;
        self.stop_locked(&mut session).await;
        info!("Session controller shut down");
    }

    /// Current configuration phase.
    pub fn phase(&self) -> ConfigPhase {
        *self.phase.borrow()
    }

    /// Returns true while tracking is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Returns true if a session exists and its source is active.
    pub async fn has_active_session(&self) -> bool {
        self.session
            .lock()
            .await
            .as_ref()
            .is_some_and(Session::is_active)
    }

    /// Options stored by the last `configure` (possibly invalid).
    pub fn options(&self) -> Option<TrackingOptions> {
        self.config.read().options.clone()
    }

    /// Callback that receives position updates.
    pub fn callback(&self) -> Option<CallbackId> {
        self.config.read().callback.clone()
    }

    /// Apply an update to the stored options if they are valid.
    ///
    /// Check and write happen under one lock, so an update never lands on
    /// options a concurrent `configure` has invalidated.
    fn apply_update(&self, update: &ConfigUpdate) -> Option<TrackingOptions> {
        let mut slot = self.config.write();
        let options = slot.valid_options_mut()?;
        options.apply(update);
        Some(options.clone())
    }

    async fn wait_for_configure(&self) {
        let mut phase = self.phase.subscribe();
        let settled = phase.wait_for(|p| !p.is_configuring()).await.is_ok();
        if !settled {
            warn!("Phase channel closed while waiting for configure");
        }
    }

    async fn open_locked(
        &self,
        session: &mut Option<Session>,
        call: &CallbackId,
        options: &TrackingOptions,
    ) {
        match Session::open(
            self.factory.as_ref(),
            options.source_params(),
            &self.translator,
        )
        .await
        {
            Ok(opened) => {
                *session = Some(opened);
                self.running.store(true, Ordering::SeqCst);
                info!(
                    desired_accuracy = options.desired_accuracy,
                    location_timeout_secs = options.location_timeout.as_secs(),
                    distance_filter = options.distance_filter,
                    debug = options.debug,
                    "Tracking started"
                );
                self.sink.dispatch(call, PluginResult::ok());
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                warn!(error = %e, "Failed to start position source");
                self.sink.dispatch(call, PluginResult::error(e.to_string()));
            }
        }
    }

    async fn stop_locked(&self, session: &mut Option<Session>) {
        self.running.store(false, Ordering::SeqCst);
        match session.take() {
            Some(live) => {
                live.close().await;
                info!("Tracking stopped");
            }
            None => debug!("Stop with no session"),
        }
    }
}

/// An in-flight `configure`.
///
/// Holds the configure lock; `start` waits while a ticket is alive.
pub struct ConfigureTicket<'a> {
    controller: &'a SessionController,
    _guard: MutexGuard<'a, ()>,
    previous: ConfigPhase,
    completed: bool,
}

impl ConfigureTicket<'_> {
    /// Parse and store the options, then leave the `Configuring` phase.
    pub fn complete(mut self, call: &CallbackId, args: &[String]) {
        let controller = self.controller;
        let parsed = parse_configure(args);

        for error in &parsed.errors {
            warn!(field = %error.field, value = %error.value, "Invalid configure field");
            controller
                .sink
                .dispatch(call, PluginResult::json_exception(error.to_string()));
        }

        let valid = parsed.options.valid;
        {
            let mut slot = controller.config.write();
            slot.options = Some(parsed.options);
            slot.callback = Some(call.clone());
        }

        self.completed = true;
        controller.phase.send_replace(ConfigPhase::Configured);
        info!(valid, callback = %call, "Configured");
    }
}

impl Drop for ConfigureTicket<'_> {
    fn drop(&mut self) {
        if !self.completed {
            debug!(phase = %self.previous, "Configure abandoned, restoring phase");
            self.controller.phase.send_replace(self.previous);
        }
    }
}
