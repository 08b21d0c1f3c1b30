//! Per-run lifecycle state and its watch-channel publisher.
//!
//! Every pipeline run owns a `tokio::sync::watch` pair: the run body writes
//! state transitions through [`StatePublisher`]; observers (tests, logging)
//! read them through [`RunHandle`] without touching the orchestrator's
//! internals.

use tokio::sync::watch;

// ---------------------------------------------------------------------------
// RunOutcome / RunState
// ---------------------------------------------------------------------------

/// How a run that was not superseded finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The corrected text was pasted over the selection.
    Applied,
    /// The run finished without a correction landing: the service failed or
    /// answered unusably (clipboard untouched), or the paste itself failed.
    Degraded,
}

/// States of a single correction run.
///
/// Transitions are driven by the runner, in order; `Cancelled` can replace
/// any non-terminal state when a newer activation supersedes the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Created, not yet past its predecessor's teardown.
    Started,
    /// Copy chord sent; waiting for the selection text.
    Capturing,
    /// The correction service call is in flight.
    AwaitingCorrection,
    /// Pasting the corrected text over the selection.
    Applying,
    /// Finished, with or without a correction applied.
    Completed(RunOutcome),
    /// Superseded by a newer activation. Never reached `Applying`.
    Cancelled,
}

impl RunState {
    /// Whether the run has finished and released the single-flight slot.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Completed(_) | RunState::Cancelled)
    }

    /// A short human-readable label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            RunState::Started => "started",
            RunState::Capturing => "capturing",
            RunState::AwaitingCorrection => "awaiting correction",
            RunState::Applying => "applying",
            RunState::Completed(RunOutcome::Applied) => "completed",
            RunState::Completed(RunOutcome::Degraded) => "completed (degraded)",
            RunState::Cancelled => "cancelled",
        }
    }
}

// ---------------------------------------------------------------------------
// StatePublisher / RunHandle
// ---------------------------------------------------------------------------

/// Create the publisher/handle pair for a new run, starting at
/// [`RunState::Started`].
pub(crate) fn run_channel(id: u64) -> (StatePublisher, RunHandle) {
    let (tx, rx) = watch::channel(RunState::Started);
    (StatePublisher { tx }, RunHandle { id, state: rx })
}

/// Write side, owned by the run body.
pub(crate) struct StatePublisher {
    tx: watch::Sender<RunState>,
}

impl StatePublisher {
    /// Publish a transition. Lost-receiver errors are irrelevant — a run
    /// keeps executing whether or not anyone watches it.
    pub(crate) fn set(&self, state: RunState) {
        self.tx.send_replace(state);
    }
}

/// Read side — observe one run's lifecycle from outside the orchestrator.
#[derive(Debug)]
pub struct RunHandle {
    id: u64,
    state: watch::Receiver<RunState>,
}

impl RunHandle {
    /// This run's identifier (monotonically increasing across activations).
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The most recently published state.
    pub fn state(&self) -> RunState {
        *self.state.borrow()
    }

    /// Wait until the run reaches a terminal state and return it.
    ///
    /// If the run's task is torn down without publishing a terminal state
    /// (aborted after exceeding the teardown wait), the last observed state
    /// is returned instead.
    pub async fn terminal(&mut self) -> RunState {
        loop {
            let current = *self.state.borrow_and_update();
            if current.is_terminal() {
                return current;
            }
            if self.state.changed().await.is_err() {
                return *self.state.borrow();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(RunState::Completed(RunOutcome::Applied).is_terminal());
        assert!(RunState::Completed(RunOutcome::Degraded).is_terminal());
        assert!(RunState::Cancelled.is_terminal());

        assert!(!RunState::Started.is_terminal());
        assert!(!RunState::Capturing.is_terminal());
        assert!(!RunState::AwaitingCorrection.is_terminal());
        assert!(!RunState::Applying.is_terminal());
    }

    #[test]
    fn labels_are_distinct_for_terminal_flavours() {
        assert_eq!(RunState::Completed(RunOutcome::Applied).label(), "completed");
        assert_eq!(
            RunState::Completed(RunOutcome::Degraded).label(),
            "completed (degraded)"
        );
        assert_eq!(RunState::Cancelled.label(), "cancelled");
    }

    #[test]
    fn new_run_starts_in_started() {
        let (_publisher, handle) = run_channel(7);
        assert_eq!(handle.id(), 7);
        assert_eq!(handle.state(), RunState::Started);
    }

    #[tokio::test]
    async fn handle_observes_published_transitions() {
        let (publisher, mut handle) = run_channel(1);

        publisher.set(RunState::Capturing);
        assert_eq!(handle.state(), RunState::Capturing);

        publisher.set(RunState::Completed(RunOutcome::Applied));
        assert_eq!(
            handle.terminal().await,
            RunState::Completed(RunOutcome::Applied)
        );
    }

    #[tokio::test]
    async fn terminal_returns_immediately_when_already_terminal() {
        let (publisher, mut handle) = run_channel(2);
        publisher.set(RunState::Cancelled);
        assert_eq!(handle.terminal().await, RunState::Cancelled);
    }

    #[tokio::test]
    async fn dropped_publisher_yields_last_observed_state() {
        let (publisher, mut handle) = run_channel(3);
        publisher.set(RunState::AwaitingCorrection);
        drop(publisher);

        // No terminal state was ever published — terminal() must still
        // resolve rather than hang.
        assert_eq!(handle.terminal().await, RunState::AwaitingCorrection);
    }
}
