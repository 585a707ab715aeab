//! The lifecycle controller that owns a tracking session.
//!
//! A session walks `Stopped → Starting → Running → Stopping → Stopped`. The
//! state lives in an atomic cell and the two contended transitions
//! (`Stopped→Starting`, `Running→Stopping`) are compare-and-swap gated, so a
//! `stop` racing a delivered fix can never double-run the pipeline or
//! double-release the subscription.
//!
//! Per delivered fix, while `Running`: battery gate first, then cell query,
//! assembly, and a fire-and-forget dispatch. The whole path is synchronous
//! and quick. It runs on the location source's consumer task and must not
//! hold up the next delivery.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::cell::{CellCollector, CellProbe};
use crate::config::AgentConfig;
use crate::location::{FixFeed, FixHandler, LocationSource};
use crate::platform::{PermissionProvider, StatusSurface};
use crate::power::PowerMonitor;
use crate::sample;
use crate::types::Fix;
use crate::upload::UploadSink;

/// Lifecycle states of a tracking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AgentState {
    Stopped = 0,
    Starting = 1,
    Running = 2,
    Stopping = 3,
}

impl AgentState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => AgentState::Starting,
            2 => AgentState::Running,
            3 => AgentState::Stopping,
            _ => AgentState::Stopped,
        }
    }
}

/// Atomic holder for the session state.
struct StateCell(AtomicU8);

impl StateCell {
    fn new() -> Self {
        Self(AtomicU8::new(AgentState::Stopped as u8))
    }

    fn load(&self) -> AgentState {
        AgentState::from_u8(self.0.load(Ordering::SeqCst))
    }

    /// Transition `from → to` atomically; false if the state was not `from`.
    fn transition(&self, from: AgentState, to: AgentState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn store(&self, to: AgentState) {
        self.0.store(to as u8, Ordering::SeqCst);
    }
}

/// A location-tracking agent bound to one immutable session configuration.
pub struct Agent {
    inner: Arc<Inner>,
}

struct Inner {
    config: AgentConfig,
    state: StateCell,
    source: tokio::sync::Mutex<LocationSource>,
    power: Arc<dyn PowerMonitor>,
    cells: CellCollector,
    sink: Arc<dyn UploadSink>,
    status: Arc<dyn StatusSurface>,
}

impl Agent {
    /// Wire up an agent from its collaborators.
    ///
    /// `config` is taken as already validated by the caller; the pipeline
    /// does not re-check it.
    pub fn new(
        config: AgentConfig,
        feed: Arc<dyn FixFeed>,
        power: Arc<dyn PowerMonitor>,
        probe: Arc<dyn CellProbe>,
        sink: Arc<dyn UploadSink>,
        permissions: Arc<dyn PermissionProvider>,
        status: Arc<dyn StatusSurface>,
    ) -> Self {
        let cells = CellCollector::new(probe, permissions.clone());
        let source = LocationSource::new(feed, permissions);

        Self {
            inner: Arc::new(Inner {
                config,
                state: StateCell::new(),
                source: tokio::sync::Mutex::new(source),
                power,
                cells,
                sink,
                status,
            }),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> AgentState {
        self.inner.state.load()
    }

    /// Start the session: subscribe to the fix feed and show the status
    /// surface.
    ///
    /// No-op unless currently `Stopped`; a second `start` while `Running`
    /// leaves the existing subscription untouched. The subscription itself
    /// silently does not materialize when the location grant is absent; the
    /// session still reaches `Running`.
    pub async fn start(&self) {
        if !self
            .inner
            .state
            .transition(AgentState::Stopped, AgentState::Starting)
        {
            tracing::debug!(state = ?self.inner.state.load(), "start ignored");
            return;
        }

        let handler: FixHandler = {
            let inner = Arc::clone(&self.inner);
            Arc::new(move |fix| inner.on_fix(fix))
        };

        self.inner
            .source
            .lock()
            .await
            .start(self.inner.config.interval(), handler);
        self.inner.status.show();
        self.inner.state.store(AgentState::Running);

        tracing::info!(
            device_id = %self.inner.config.device_id,
            interval_ms = self.inner.config.interval_ms,
            battery_threshold = self.inner.config.battery_threshold,
            "tracking session running"
        );
    }

    /// Run the pipeline for one delivered fix.
    ///
    /// Processed only while `Running`. A fix arriving under the battery
    /// threshold is dropped outright; an admitted fix produces exactly one
    /// dispatched record and this returns without awaiting the upload.
    pub fn on_fix(&self, fix: Fix) {
        self.inner.on_fix(fix);
    }

    /// Stop the session: release the subscription and clear the status
    /// surface.
    ///
    /// The subscription is fully released before this returns. Upload tasks
    /// still in flight are abandoned, not awaited. No-op unless currently
    /// `Running`.
    pub async fn stop(&self) {
        if !self
            .inner
            .state
            .transition(AgentState::Running, AgentState::Stopping)
        {
            return;
        }

        self.inner.source.lock().await.stop().await;
        self.inner.status.clear();
        self.inner.state.store(AgentState::Stopped);

        tracing::info!(device_id = %self.inner.config.device_id, "tracking session stopped");
    }
}

impl Inner {
    fn on_fix(&self, fix: Fix) {
        if self.state.load() != AgentState::Running {
            return;
        }
        if self.power.is_low(self.config.battery_threshold) {
            // Dropped: no record, no upload, nothing retained.
            return;
        }

        let battery_level = self.power.level();
        let cell = self.cells.collect();
        let record = sample::assemble(&fix, battery_level, cell, &self.config);

        tracing::trace!(
            latitude = fix.latitude,
            longitude = fix.longitude,
            battery_level,
            "dispatching sample"
        );
        self.sink.dispatch(record);
    }
}
