//! Theme transition overlay
//!
//! Applying a theme shows an overlay for a short fixed delay. Each new
//! transition cancels the previous hide task and restarts the delay, so the
//! overlay hides exactly once, after the most recent transition, and can
//! never be left visible.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Overlay visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPhase {
    Idle,
    Transitioning,
}

#[derive(Debug)]
struct OverlayState {
    phase: OverlayPhase,
    /// Incremented by every transition; a hide task only acts on its own
    generation: u64,
    started: Option<Instant>,
}

/// Two-state overlay with a cancellable hide task
#[derive(Debug)]
pub struct TransitionOverlay {
    delay: Duration,
    state: Arc<Mutex<OverlayState>>,
    pending: Option<CancellationToken>,
}

impl TransitionOverlay {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: Arc::new(Mutex::new(OverlayState {
                phase: OverlayPhase::Idle,
                generation: 0,
                started: None,
            })),
            pending: None,
        }
    }

    /// Show the overlay and schedule it to hide after the delay
    ///
    /// Without a tokio runtime no task is spawned; the phase is then derived
    /// from the elapsed time alone.
    pub fn begin(&mut self) {
        if let Some(previous) = self.pending.take() {
            previous.cancel();
        }

        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.phase = OverlayPhase::Transitioning;
            state.started = Some(Instant::now());
            state.generation
        };

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let state = Arc::clone(&self.state);
        let delay = self.delay;

        handle.spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {
                    trace!("Transition {} superseded", generation);
                }
                _ = tokio::time::sleep(delay) => {
                    let mut state = state.lock();
                    if state.generation == generation {
                        state.phase = OverlayPhase::Idle;
                        state.started = None;
                    }
                }
            }
        });

        self.pending = Some(token);
    }

    /// Current phase
    pub fn phase(&self) -> OverlayPhase {
        let mut state = self.state.lock();
        if let Some(started) = state.started {
            if started.elapsed() >= self.delay {
                state.phase = OverlayPhase::Idle;
                state.started = None;
            }
        }
        state.phase
    }

    pub fn is_visible(&self) -> bool {
        self.phase() == OverlayPhase::Transitioning
    }

    /// Hide immediately and drop any scheduled hide
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
        let mut state = self.state.lock();
        state.generation += 1;
        state.phase = OverlayPhase::Idle;
        state.started = None;
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Drop for TransitionOverlay {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
    }
}
