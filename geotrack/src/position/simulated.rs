//! Simulated position source.
//!
//! Replays a fixed track of coordinates on an interval, the way a platform
//! location service would report fixes while the device moves. Used by the CLI
//! host and by tests; hosts can also [`inject`](SimulatedSource::inject)
//! arbitrary events such as a `Disabled` status.
//!
//! # Behaviour
//!
//! - On start, publishes an `Initializing` status event.
//! - Every `interval`, takes the next track point. Points closer than the
//!   distance filter to the last reported fix are skipped.
//! - Each reported fix carries the desired accuracy as its horizontal accuracy.
//! - An empty track publishes `NoData` once the location timeout elapses.
//! - Once the track is exhausted the source idles (or loops) until stopped.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use super::geo::distance_m;
use super::source::{PositionSource, PositionSourceFactory, SourceError, SourceParams};
use super::state::{Coordinate, PositionEvent, PositionStatus};

/// Simulated source configuration.
#[derive(Debug, Clone)]
pub struct SimulatedSourceConfig {
    /// Interval between track points.
    pub interval: Duration,

    /// Capacity of the broadcast channel.
    pub event_buffer: usize,

    /// Track to replay as (latitude, longitude) pairs.
    pub track: Vec<(f64, f64)>,

    /// Restart the track from the beginning when exhausted.
    pub loop_track: bool,
}

impl Default for SimulatedSourceConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            event_buffer: 64,
            track: Vec::new(),
            loop_track: false,
        }
    }
}

struct RunHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// A position source that replays a track.
pub struct SimulatedSource {
    params: SourceParams,
    config: SimulatedSourceConfig,
    events_tx: broadcast::Sender<PositionEvent>,
    run: Mutex<Option<RunHandle>>,
}

impl SimulatedSource {
    /// Create a new simulated source. It does nothing until started.
    pub fn new(params: SourceParams, config: SimulatedSourceConfig) -> Self {
        let (events_tx, _) = broadcast::channel(config.event_buffer.max(1));
        Self {
            params,
            config,
            events_tx,
            run: Mutex::new(None),
        }
    }

    /// Get the parameters this source was built with.
    pub fn params(&self) -> SourceParams {
        self.params
    }

    /// Publish an event directly.
    ///
    /// Returns the number of subscribers that received it.
    pub fn inject(&self, event: PositionEvent) -> usize {
        self.events_tx.send(event).unwrap_or(0)
    }
}

impl PositionSource for SimulatedSource {
    fn start(&self) -> Result<(), SourceError> {
        let mut run = self.run.lock();
        if run.is_some() {
            return Ok(());
        }

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| SourceError::NoRuntime(e.to_string()))?;

        let cancel = CancellationToken::new();
        let replay = TrackReplay {
            params: self.params,
            config: self.config.clone(),
            events_tx: self.events_tx.clone(),
        };
        let task = runtime.spawn(replay.run(cancel.clone()));

        info!(
            desired_accuracy_m = self.params.desired_accuracy_m,
            timeout_ms = self.params.timeout_ms,
            distance_filter_m = self.params.distance_filter_m,
            track_points = self.config.track.len(),
            "Simulated position source started"
        );

        *run = Some(RunHandle { cancel, task });
        Ok(())
    }

    fn stop(&self) {
        if let Some(handle) = self.run.lock().take() {
            handle.cancel.cancel();
            handle.task.abort();
            info!("Simulated position source stopped");
        }
    }

    fn is_active(&self) -> bool {
        self.run.lock().is_some()
    }

    fn subscribe(&self) -> broadcast::Receiver<PositionEvent> {
        self.events_tx.subscribe()
    }
}

impl Drop for SimulatedSource {
    fn drop(&mut self) {
        if let Some(handle) = self.run.get_mut().take() {
            handle.cancel.cancel();
            handle.task.abort();
        }
    }
}

/// The replay loop, owned by the spawned task.
struct TrackReplay {
    params: SourceParams,
    config: SimulatedSourceConfig,
    events_tx: broadcast::Sender<PositionEvent>,
}

impl TrackReplay {
    async fn run(self, cancel: CancellationToken) {
        self.publish(PositionEvent::status(
            PositionStatus::Initializing,
            "simulated source initializing",
        ));

        if self.config.track.is_empty() {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(self.params.timeout()) => {
                    self.publish(PositionEvent::status(
                        PositionStatus::NoData,
                        "no fix within location timeout",
                    ));
                    cancel.cancelled().await;
                }
            }
            return;
        }

        let mut ticker = tokio::time::interval(self.config.interval);
        let mut last_reported: Option<(f64, f64)> = None;
        let mut fixes: u64 = 0;
        let mut index = 0;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            if index >= self.config.track.len() {
                if !self.config.loop_track {
                    debug!(fixes, "Track exhausted, idling until stopped");
                    cancel.cancelled().await;
                    break;
                }
                index = 0;
            }

            let point = self.config.track[index];
            index += 1;

            if let Some(last) = last_reported {
                let moved = distance_m(last, point);
                if moved < self.params.distance_filter_m {
                    trace!(moved_m = moved, "Below distance filter, skipping point");
                    continue;
                }
            }

            fixes += 1;
            last_reported = Some(point);

            let coordinate = Coordinate::new(point.0, point.1)
                .with_accuracy(f64::from(self.params.desired_accuracy_m));
            let message = format!("fix #{} {:.5},{:.5}", fixes, point.0, point.1);
            self.publish(PositionEvent::fix(coordinate, message));
        }
    }

    fn publish(&self, event: PositionEvent) {
        if self.events_tx.send(event).is_err() {
            trace!("No subscribers for simulated event");
        }
    }
}

/// Factory for [`SimulatedSource`]s.
///
/// Keeps a weak handle on every source it creates so that hosts and tests can
/// inject events into the live one. Sources are owned by their sessions; the
/// factory forgets them once the session drops them.
pub struct SimulatedSourceFactory {
    config: SimulatedSourceConfig,
    created: Mutex<CreatedSources>,
}

#[derive(Default)]
struct CreatedSources {
    live: Vec<Weak<SimulatedSource>>,
    total: usize,
}

impl SimulatedSourceFactory {
    pub fn new(config: SimulatedSourceConfig) -> Self {
        Self {
            config,
            created: Mutex::new(CreatedSources::default()),
        }
    }

    /// The most recently created source, if it is still alive.
    pub fn latest(&self) -> Option<Arc<SimulatedSource>> {
        self.created.lock().live.last().and_then(Weak::upgrade)
    }

    /// Number of sources created so far.
    pub fn created_count(&self) -> usize {
        self.created.lock().total
    }

    /// Number of created sources still referenced by someone.
    pub fn retained_count(&self) -> usize {
        self.created
            .lock()
            .live
            .iter()
            .filter(|s| s.strong_count() > 0)
            .count()
    }

    /// Number of created sources currently started.
    pub fn active_count(&self) -> usize {
        self.created
            .lock()
            .live
            .iter()
            .filter_map(Weak::upgrade)
            .filter(|s| s.is_active())
            .count()
    }
}

impl Default for SimulatedSourceFactory {
    fn default() -> Self {
        Self::new(SimulatedSourceConfig::default())
    }
}

impl PositionSourceFactory for SimulatedSourceFactory {
    fn create(&self, params: SourceParams) -> Arc<dyn PositionSource> {
        let source = Arc::new(SimulatedSource::new(params, self.config.clone()));
        let mut created = self.created.lock();
        created.live.retain(|s| s.strong_count() > 0);
        created.live.push(Arc::downgrade(&source));
        created.total += 1;
        source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(distance_filter_m: f64) -> SourceParams {
        SourceParams::new(5, Duration::from_secs(30), distance_filter_m)
    }

    fn config(track: Vec<(f64, f64)>) -> SimulatedSourceConfig {
        SimulatedSourceConfig {
            interval: Duration::from_millis(5),
            track,
            ..Default::default()
        }
    }

    async fn next_fix(rx: &mut broadcast::Receiver<PositionEvent>) -> Coordinate {
        loop {
            let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
                .await
                .expect("event within timeout")
                .expect("channel open");
            if let Some(c) = event.coordinate {
                return c;
            }
        }
    }

    #[tokio::test]
    async fn test_replays_track_with_accuracy() {
        let source = SimulatedSource::new(params(0.0), config(vec![(1.0, 1.0), (2.0, 2.0)]));
        let mut rx = source.subscribe();

        source.start().unwrap();
        assert!(source.is_active());

        let first = rx.recv().await.unwrap();
        assert_eq!(first.status, PositionStatus::Initializing);

        let a = next_fix(&mut rx).await;
        let b = next_fix(&mut rx).await;
        assert_eq!(a.position(), (1.0, 1.0));
        assert_eq!(b.position(), (2.0, 2.0));
        assert_eq!(a.accuracy, Some(5.0));

        source.stop();
        assert!(!source.is_active());
    }

    #[tokio::test]
    async fn test_distance_filter_skips_close_points() {
        // Second point is ~11m from the first, third is ~1.1km away
        let track = vec![(10.0, 10.0), (10.0001, 10.0), (10.01, 10.0)];
        let source = SimulatedSource::new(params(50.0), config(track));
        let mut rx = source.subscribe();
        source.start().unwrap();

        let a = next_fix(&mut rx).await;
        let b = next_fix(&mut rx).await;
        assert_eq!(a.position(), (10.0, 10.0));
        assert_eq!(b.position(), (10.01, 10.0));

        source.stop();
    }

    #[tokio::test]
    async fn test_empty_track_reports_no_data_after_timeout() {
        let source = SimulatedSource::new(
            SourceParams::new(5, Duration::from_millis(10), 0.0),
            config(Vec::new()),
        );
        let mut rx = source.subscribe();
        source.start().unwrap();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.status, PositionStatus::Initializing);
        let second = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.status, PositionStatus::NoData);

        source.stop();
    }

    #[tokio::test]
    async fn test_start_twice_is_idempotent() {
        let source = SimulatedSource::new(params(0.0), config(Vec::new()));
        source.start().unwrap();
        source.start().unwrap();
        assert!(source.is_active());
        source.stop();
        source.stop();
        assert!(!source.is_active());
    }

    #[test]
    fn test_start_without_runtime_fails() {
        let source = SimulatedSource::new(params(0.0), config(Vec::new()));
        let result = source.start();
        assert!(matches!(result, Err(SourceError::NoRuntime(_))));
        assert!(!source.is_active());
    }

    #[test]
    fn test_inject_reaches_subscribers() {
        let source = SimulatedSource::new(params(0.0), config(Vec::new()));
        assert_eq!(
            source.inject(PositionEvent::status(PositionStatus::Disabled, "off")),
            0
        );

        let mut rx = source.subscribe();
        assert_eq!(
            source.inject(PositionEvent::status(PositionStatus::Disabled, "off")),
            1
        );
        assert_eq!(rx.try_recv().unwrap().status, PositionStatus::Disabled);
    }

    #[test]
    fn test_factory_tracks_created_sources() {
        let factory = SimulatedSourceFactory::default();
        assert!(factory.latest().is_none());

        let _first = factory.create(params(0.0));
        let _second = factory.create(params(10.0));

        assert_eq!(factory.created_count(), 2);
        assert_eq!(factory.retained_count(), 2);
        assert_eq!(factory.active_count(), 0);
        assert_eq!(factory.latest().unwrap().params().distance_filter_m, 10.0);
    }

    #[test]
    fn test_factory_releases_dropped_sources() {
        let factory = SimulatedSourceFactory::default();

        for _ in 0..100 {
            drop(factory.create(params(0.0)));
        }
        let _kept = factory.create(params(1.0));

        assert_eq!(factory.created_count(), 101);
        assert_eq!(factory.retained_count(), 1);
        assert_eq!(factory.created.lock().live.len(), 1);
        assert_eq!(factory.latest().unwrap().params().distance_filter_m, 1.0);
    }
}
