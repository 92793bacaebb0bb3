//! A live tracking session.

use std::sync::Arc;

use tracing::debug;

use super::translator::{EventTranslator, Subscription};
use crate::position::{PositionSource, PositionSourceFactory, SourceError, SourceParams};

/// One started position source and the translator subscribed to it.
pub(crate) struct Session {
    source: Arc<dyn PositionSource>,
    subscription: Subscription,
}

impl Session {
    /// Build a source, subscribe the translator, then start the source.
    ///
    /// On a failed start the subscription is torn down before returning.
    pub async fn open(
        factory: &dyn PositionSourceFactory,
        params: SourceParams,
        translator: &EventTranslator,
    ) -> Result<Self, SourceError> {
        let source = factory.create(params);
        let subscription = translator.subscribe(source.subscribe());

        if let Err(e) = source.start() {
            subscription.cancel().await;
            return Err(e);
        }

        debug!(
            desired_accuracy_m = params.desired_accuracy_m,
            timeout_ms = params.timeout_ms,
            distance_filter_m = params.distance_filter_m,
            "Session opened"
        );

        Ok(Self {
            source,
            subscription,
        })
    }

    pub fn is_active(&self) -> bool {
        self.source.is_active()
    }

    /// Unsubscribe the translator, then stop the source.
    pub async fn close(self) {
        self.subscription.cancel().await;
        self.source.stop();
        debug!("Session closed");
    }
}
