//! The lifecycle-controlled position event source.
//!
//! The platform's provider pushes *batches* of fixes on its own schedule;
//! it may coalesce several observations and deliver them late. The source
//! consumes each batch down to its most recent fix and hands that to the
//! pipeline. Delivery runs on a dedicated task so the provider side is
//! never blocked by the core's processing.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::Result;
use crate::platform::{Capability, PermissionProvider};
use crate::types::Fix;

/// Cadence parameters handed to the provider when a subscription opens.
///
/// The provider treats `interval` as a best-effort target, bounded below by
/// `min_spacing` and above by `max_delay` for batched deliveries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedRequest {
    pub interval: Duration,
    pub min_spacing: Duration,
    pub max_delay: Duration,
}

impl FeedRequest {
    /// Standard cadence bounds: fixes no closer than half the interval, no
    /// later than twice the interval.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            min_spacing: interval / 2,
            max_delay: interval * 2,
        }
    }
}

/// The platform seam for position delivery.
///
/// `open` registers a subscription and returns the channel the provider
/// will push fix batches on. Dropping the receiver ends the subscription
/// from the provider's point of view.
pub trait FixFeed: Send + Sync {
    fn open(&self, request: FeedRequest) -> Result<mpsc::Receiver<Vec<Fix>>>;
}

/// Callback invoked with each delivered fix, on the source's consumer task.
pub type FixHandler = Arc<dyn Fn(Fix) + Send + Sync>;

/// Owns the single subscription a running agent holds on the fix feed.
pub struct LocationSource {
    feed: Arc<dyn FixFeed>,
    permissions: Arc<dyn PermissionProvider>,
    consumer: Option<JoinHandle<()>>,
}

impl LocationSource {
    pub fn new(feed: Arc<dyn FixFeed>, permissions: Arc<dyn PermissionProvider>) -> Self {
        Self {
            feed,
            permissions,
            consumer: None,
        }
    }

    /// Begin delivering fixes to `handler` at a best-effort `interval`.
    ///
    /// Silent no-op when the location grant is absent, or when a
    /// subscription is already active. Feed failures are logged and leave
    /// the source inactive.
    pub fn start(&mut self, interval: Duration, handler: FixHandler) {
        if self.consumer.is_some() {
            return;
        }
        if !self.permissions.granted(Capability::Location) {
            tracing::debug!("location grant absent, not subscribing");
            return;
        }

        let request = FeedRequest::with_interval(interval);
        let mut rx = match self.feed.open(request) {
            Ok(rx) => rx,
            Err(e) => {
                tracing::warn!(error = %e, "failed to open fix feed");
                return;
            }
        };

        self.consumer = Some(tokio::spawn(async move {
            while let Some(batch) = rx.recv().await {
                // A batch may hold several coalesced observations; only the
                // most recent one matters.
                if let Some(fix) = batch.into_iter().next_back() {
                    handler(fix);
                }
            }
            tracing::debug!("fix feed closed");
        }));
    }

    /// Whether a subscription is currently active.
    pub fn is_active(&self) -> bool {
        self.consumer.is_some()
    }

    /// Cancel the subscription. Idempotent, safe to call when not started.
    ///
    /// The consumer task is fully terminated before this returns; the
    /// receiver drops with it, which ends the provider-side subscription.
    pub async fn stop(&mut self) {
        if let Some(consumer) = self.consumer.take() {
            consumer.abort();
            let _ = consumer.await;
        }
    }
}
