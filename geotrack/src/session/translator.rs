//! Event Translator - turns position events into host results.
//!
//! One translator task runs per live session. It reads the source's broadcast
//! stream and dispatches each event on the callback captured by the most
//! recent `configure`, with the keep-callback flag set.
//!
//! # Event handling
//!
//! - `Disabled` / `NotAvailable` → error result; the session keeps running
//! - Fix → optional debug side-report, then the encoded coordinate as `Ok`
//! - Other statuses without a fix → skipped
//!
//! Callback and debug flag are read at delivery time, so a session rebuilt by
//! `setConfig` keeps delivering to the same callback.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::state::SharedConfig;
use crate::channel::{PluginResult, ResultSink};
use crate::codec::encode_coordinate;
use crate::notify::{DebugNotifier, Tone};
use crate::position::PositionEvent;

/// Translates position events into results.
#[derive(Clone)]
pub struct EventTranslator {
    config: SharedConfig,
    sink: Arc<dyn ResultSink>,
    notifier: Arc<dyn DebugNotifier>,
}

impl EventTranslator {
    pub(crate) fn new(
        config: SharedConfig,
        sink: Arc<dyn ResultSink>,
        notifier: Arc<dyn DebugNotifier>,
    ) -> Self {
        Self {
            config,
            sink,
            notifier,
        }
    }

    /// Handle a single event.
    pub fn handle(&self, event: PositionEvent) {
        let (callback, configured, debug_enabled) = {
            let slot = self.config.read();
            (slot.callback.clone(), slot.is_configured(), slot.debug())
        };

        let Some(callback) = callback else {
            warn!(status = %event.status, "Position event without a configure callback, dropping");
            return;
        };

        if event.status.is_unavailable() {
            let message = format!(
                "Cannot start: LocationStatus/PositionStatus: {}! {}",
                event.status, configured
            );
            warn!(status = %event.status, "Positioning unavailable");
            self.sink
                .dispatch(&callback, PluginResult::error(message).keep_open());
            return;
        }

        let Some(coordinate) = event.coordinate else {
            trace!(status = %event.status, "Status event without a fix");
            return;
        };

        if debug_enabled {
            debug!("{}", event.debug_message);
            if let Err(e) = self.notifier.notify(&event.debug_message, Tone::FIX) {
                warn!(error = %e, "Debug notification failed");
            }
        }

        match encode_coordinate(&coordinate) {
            Ok(payload) => {
                debug!(
                    lat = coordinate.latitude,
                    lon = coordinate.longitude,
                    "Delivering position"
                );
                self.sink
                    .dispatch(&callback, PluginResult::ok_with(payload).keep_open());
            }
            Err(e) => {
                warn!(error = %e, "Failed to encode position");
                self.sink
                    .dispatch(&callback, PluginResult::error(e.to_string()).keep_open());
            }
        }
    }

    /// Spawn a task delivering every event from `events` until cancelled.
    pub(crate) fn subscribe(&self, events: broadcast::Receiver<PositionEvent>) -> Subscription {
        let cancel = CancellationToken::new();
        let translator = self.clone();
        let task = tokio::spawn(translator.run(events, cancel.clone()));
        Subscription { cancel, task }
    }

    async fn run(self, mut events: broadcast::Receiver<PositionEvent>, cancel: CancellationToken) {
        let mut delivered: u64 = 0;

        loop {
            let received = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                received = events.recv() => received,
            };

            match received {
                Ok(event) => {
                    delivered += 1;
                    self.handle(event);
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Translator lagging behind position source");
                }
                Err(RecvError::Closed) => {
                    debug!("Position source closed its event stream");
                    break;
                }
            }
        }

        debug!(delivered, "Event translator stopped");
    }
}

/// A live translator task.
pub(crate) struct Subscription {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl Subscription {
    /// Stop the translator and wait until it can no longer deliver.
    pub async fn cancel(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            if e.is_panic() {
                tracing::error!("Event translator task panicked: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{CallbackId, ChannelSink, Dispatched, ResultStatus};
    use crate::codec::decode_coordinate;
    use crate::notify::NotifyError;
    use crate::options::TrackingOptions;
    use crate::position::{Coordinate, PositionStatus};
    use crate::session::state::ConfigSlot;
    use parking_lot::{Mutex, RwLock};
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[derive(Default)]
    struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
        fail: bool,
    }

    impl DebugNotifier for RecordingNotifier {
        fn notify(&self, message: &str, _tone: Tone) -> Result<(), NotifyError> {
            self.messages.lock().push(message.to_string());
            if self.fail {
                Err(NotifyError::Unavailable("no speaker".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn slot(debug: bool) -> SharedConfig {
        Arc::new(RwLock::new(ConfigSlot {
            options: Some(TrackingOptions {
                url: String::new(),
                stationary_radius: 0.0,
                distance_filter: 0.0,
                location_timeout: Duration::from_secs(1),
                desired_accuracy: 10,
                debug,
                valid: true,
            }),
            callback: Some(CallbackId::new("configure-1")),
        }))
    }

    fn translator(
        debug: bool,
        notifier: Arc<RecordingNotifier>,
    ) -> (EventTranslator, mpsc::UnboundedReceiver<Dispatched>) {
        let (sink, rx) = ChannelSink::new();
        (EventTranslator::new(slot(debug), Arc::new(sink), notifier), rx)
    }

    #[test]
    fn test_fix_is_delivered_on_configure_callback() {
        let (t, mut rx) = translator(false, Arc::default());

        t.handle(PositionEvent::fix(Coordinate::new(37.5, -122.3), "fix"));

        let d = rx.try_recv().unwrap();
        assert_eq!(d.callback, CallbackId::new("configure-1"));
        assert_eq!(d.result.status, ResultStatus::Ok);
        assert!(d.result.keep_callback);
        let c = decode_coordinate(&d.result.message).unwrap();
        assert_eq!(c.position(), (37.5, -122.3));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_disabled_produces_one_error() {
        let (t, mut rx) = translator(false, Arc::default());

        t.handle(PositionEvent::status(PositionStatus::Disabled, "off"));

        let d = rx.try_recv().unwrap();
        assert_eq!(d.result.status, ResultStatus::Error);
        assert_eq!(
            d.result.message,
            "Cannot start: LocationStatus/PositionStatus: Disabled! true"
        );
        assert!(d.result.keep_callback);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_status_without_fix_is_skipped() {
        let (t, mut rx) = translator(true, Arc::default());
        t.handle(PositionEvent::status(PositionStatus::Initializing, "warming up"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_debug_mode_notifies() {
        let notifier = Arc::new(RecordingNotifier::default());
        let (t, mut rx) = translator(true, Arc::clone(&notifier));

        t.handle(PositionEvent::fix(Coordinate::new(1.0, 2.0), "fix #1"));

        assert_eq!(*notifier.messages.lock(), vec!["fix #1".to_string()]);
        assert_eq!(rx.try_recv().unwrap().result.status, ResultStatus::Ok);
    }

    #[test]
    fn test_notifier_failure_does_not_block_delivery() {
        let notifier = Arc::new(RecordingNotifier {
            fail: true,
            ..Default::default()
        });
        let (t, mut rx) = translator(true, Arc::clone(&notifier));

        t.handle(PositionEvent::fix(Coordinate::new(1.0, 2.0), "fix #1"));

        assert_eq!(notifier.messages.lock().len(), 1);
        assert_eq!(rx.try_recv().unwrap().result.status, ResultStatus::Ok);
    }

    #[test]
    fn test_debug_off_skips_notifier() {
        let notifier = Arc::new(RecordingNotifier::default());
        let (t, _rx) = translator(false, Arc::clone(&notifier));

        t.handle(PositionEvent::fix(Coordinate::new(1.0, 2.0), "fix #1"));

        assert!(notifier.messages.lock().is_empty());
    }

    #[test]
    fn test_no_callback_drops_event() {
        let (sink, mut rx) = ChannelSink::new();
        let t = EventTranslator::new(
            Arc::new(RwLock::new(ConfigSlot::default())),
            Arc::new(sink),
            Arc::new(RecordingNotifier::default()),
        );
        t.handle(PositionEvent::fix(Coordinate::new(1.0, 2.0), "fix"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_subscription_stops_delivery_after_cancel() {
        let (t, mut rx) = translator(false, Arc::default());
        let (events_tx, events_rx) = broadcast::channel(8);

        let subscription = t.subscribe(events_rx);
        events_tx
            .send(PositionEvent::fix(Coordinate::new(1.0, 2.0), "a"))
            .unwrap();

        let first = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.result.status, ResultStatus::Ok);

        subscription.cancel().await;
        let _ = events_tx.send(PositionEvent::fix(Coordinate::new(3.0, 4.0), "b"));

        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_lagging_subscription_keeps_delivering_newest() {
        let (t, mut rx) = translator(false, Arc::default());
        let (events_tx, events_rx) = broadcast::channel(2);
        let subscription = t.subscribe(events_rx);

        // Single-threaded runtime: the translator cannot run until we await
        for lat in 1..=5 {
            events_tx
                .send(PositionEvent::fix(Coordinate::new(f64::from(lat), 0.0), "fix"))
                .unwrap();
        }

        let mut latitudes = Vec::new();
        for _ in 0..2 {
            let d = tokio::time::timeout(Duration::from_secs(2), rx.recv())
                .await
                .unwrap()
                .unwrap();
            latitudes.push(decode_coordinate(&d.result.message).unwrap().latitude);
        }
        assert_eq!(latitudes, vec![4.0, 5.0]);

        events_tx
            .send(PositionEvent::fix(Coordinate::new(6.0, 0.0), "fix"))
            .unwrap();
        let d = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(decode_coordinate(&d.result.message).unwrap().latitude, 6.0);

        subscription.cancel().await;
        assert!(rx.try_recv().is_err());
    }
}
