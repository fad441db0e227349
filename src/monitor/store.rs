/// Published pipeline state with last-writer-wins ordering.
///
/// Readers only ever see a whole `PipelineState` behind an `Arc`; a cycle
/// replaces it wholesale and never edits it in place. Each cycle takes a
/// ticket when it starts, and a result is accepted only if no later cycle
/// has already published, so a slow cycle can never overwrite a newer one.

use std::sync::{Arc, PoisonError, RwLock};

use crate::model::PipelineState;

/// Ordering token for one refresh cycle. Later cycles get larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CycleTicket(u64);

impl CycleTicket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

struct Published {
    state: Arc<PipelineState>,
    last_started: u64,
    last_published: u64,
}

pub struct SnapshotStore {
    inner: RwLock<Published>,
}

impl SnapshotStore {
    /// Starts out `Loading`, before any cycle has run.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Published {
                state: Arc::new(PipelineState::Loading),
                last_started: 0,
                last_published: 0,
            }),
        }
    }

    /// Registers a new cycle and publishes `Loading` for it.
    pub fn begin_cycle(&self) -> CycleTicket {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.last_started += 1;
        inner.state = Arc::new(PipelineState::Loading);
        CycleTicket(inner.last_started)
    }

    /// Publishes a cycle's result. Returns false, leaving the current state
    /// untouched, when a later cycle has already published.
    pub fn publish(&self, ticket: CycleTicket, state: PipelineState) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if ticket.0 <= inner.last_published {
            tracing::debug!(
                cycle = ticket.0,
                newer = inner.last_published,
                "discarding result from superseded cycle"
            );
            return false;
        }
        inner.last_published = ticket.0;
        inner.state = Arc::new(state);
        true
    }

    /// The currently published state.
    pub fn current(&self) -> Arc<PipelineState> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&inner.state)
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
