/// Refresh loop for the stream monitor
///
/// This module drives the pipeline on a fixed schedule:
/// 1. Opens a cycle in the snapshot store (state goes to Loading)
/// 2. Builds the snapshot pair from both feeds as of now
/// 3. Publishes the result (last writer wins across cycles)
/// 4. Sleeps for the remainder of the refresh interval
///
/// A failed cycle is not retried; the next scheduled cycle is the retry.

use crate::ingest::feed::FeedSource;
use crate::model::PipelineState;
use crate::monitor::SnapshotBuilder;
use crate::monitor::store::SnapshotStore;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

// ---------------------------------------------------------------------------
// Daemon State
// ---------------------------------------------------------------------------

pub struct Daemon<F> {
    builder: SnapshotBuilder<F>,
    store: Arc<SnapshotStore>,
}

impl<F: FeedSource + 'static> Daemon<F> {
    pub fn new(builder: SnapshotBuilder<F>, store: Arc<SnapshotStore>) -> Self {
        Self { builder, store }
    }

    /// Shared handle to the published state, for the endpoint or any
    /// other reader.
    pub fn store(&self) -> Arc<SnapshotStore> {
        Arc::clone(&self.store)
    }

    /// Run one fetch → select → classify → publish cycle.
    pub fn run_cycle(&self) -> Arc<PipelineState> {
        let ticket = self.store.begin_cycle();
        let started = Instant::now();
        let state = self.builder.build_snapshot_pair(Utc::now());

        match &state {
            PipelineState::Ready(pair) => tracing::info!(
                cycle = ticket.sequence(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                waikane_ft = pair.waikane.height_ft,
                waikane_status = ?pair.waikane.status,
                waiahole_ft = pair.waiahole.height_ft,
                waiahole_status = ?pair.waiahole.status,
                any_danger = pair.any_danger,
                "cycle complete"
            ),
            PipelineState::Failed(e) => tracing::error!(
                cycle = ticket.sequence(),
                error = %e,
                "cycle failed"
            ),
            PipelineState::Loading => {}
        }

        if !self.store.publish(ticket, state) {
            tracing::warn!(cycle = ticket.sequence(), "cycle result superseded");
        }
        self.store.current()
    }

    /// Main refresh loop (runs indefinitely)
    pub fn run(&self) -> ! {
        let interval = self.builder.config().refresh_interval();
        tracing::info!(
            refresh_interval_ms = self.builder.config().monitor.refresh_interval_ms,
            fetch_timeout_ms = self.builder.config().monitor.fetch_timeout_ms,
            "starting refresh loop"
        );

        loop {
            let start = Instant::now();
            self.run_cycle();

            // Sleep until next refresh
            if let Some(remaining) = interval.checked_sub(start.elapsed()) {
                std::thread::sleep(remaining);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
