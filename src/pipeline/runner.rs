//! Single-flight pipeline orchestrator.
//!
//! [`PipelineRunner`] owns exactly one in-flight-run slot and responds to
//! [`HotkeyEvent`]s received over a `tokio::sync::mpsc` channel.
//!
//! # Pipeline flow
//!
//! ```text
//! HotkeyEvent::Activated
//!   └─▶ cancel current run (if any), spawn run N+1
//!         └─▶ await run N's teardown (bounded)      [Started]
//!             acquire body lock
//!             spawn_blocking(capture_selection)     [Capturing]
//!             service.correct(text, token)          [AwaitingCorrection]
//!               ├─ Cancelled       → done           [Cancelled]
//!               ├─ Err / unusable  → done, no paste [Completed(Degraded)]
//!               └─ Ok + usable → diff + summary
//!                    spawn_blocking(apply_text)     [Applying]
//!                                                   [Completed(_)]
//! ```
//!
//! All blocking work (clipboard I/O, key simulation) is pushed onto
//! `tokio::task::spawn_blocking` so the async runtime never stalls.
//!
//! # Concurrency discipline
//!
//! Two runs only coexist in the window between a cancellation request and
//! the cancelled run's terminal transition. Three mechanisms collapse that
//! window safely:
//!
//! 1. every body holds `body_lock` from capture through apply, so the
//!    clipboard sections of distinct runs are mutually exclusive;
//! 2. a new run first awaits its predecessor's task (bounded by
//!    `teardown_wait`, then `abort()`), so a cancelled run reaches a
//!    terminal state before its successor touches the clipboard;
//! 3. the cancellation flag is re-checked at every suspension boundary —
//!    in particular right before `Applying`, so a superseded run never
//!    pastes even when its service call already produced a usable result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::clipboard::ClipboardGateway;
use crate::config::RunnerConfig;
use crate::hotkey::HotkeyEvent;
use crate::report::Reporter;
use crate::service::{CorrectionService, ServiceError};

use super::state::{run_channel, RunHandle, RunOutcome, RunState, StatePublisher};

// ---------------------------------------------------------------------------
// PipelineRunner
// ---------------------------------------------------------------------------

/// A run currently occupying the single-flight slot.
struct ActiveRun {
    id: u64,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

struct RunnerInner {
    gateway: Arc<dyn ClipboardGateway>,
    service: Arc<dyn CorrectionService>,
    reporter: Reporter,
    /// The single-flight slot. Mutated only by [`PipelineRunner::activate`]
    /// and by a run's own terminal transition.
    slot: Mutex<Option<ActiveRun>>,
    /// Serializes pipeline bodies; held from capture through apply.
    body_lock: AsyncMutex<()>,
    /// Source of monotonically increasing run identifiers.
    next_run_id: AtomicU64,
    /// How long a successor waits for its cancelled predecessor before
    /// aborting it outright.
    teardown_wait: Duration,
}

/// Drives the capture → correct → report → apply pipeline, one run at a time.
///
/// Create with [`PipelineRunner::new`], then either call
/// [`run`](Self::run) with the hotkey channel inside a tokio task, or drive
/// it manually through [`activate`](Self::activate).
pub struct PipelineRunner {
    inner: Arc<RunnerInner>,
}

impl PipelineRunner {
    pub fn new(
        gateway: Arc<dyn ClipboardGateway>,
        service: Arc<dyn CorrectionService>,
        reporter: Reporter,
        config: &RunnerConfig,
    ) -> Self {
        Self {
            inner: Arc::new(RunnerInner {
                gateway,
                service,
                reporter,
                slot: Mutex::new(None),
                body_lock: AsyncMutex::new(()),
                next_run_id: AtomicU64::new(0),
                teardown_wait: Duration::from_millis(config.teardown_wait_ms),
            }),
        }
    }

    /// Run the orchestrator until `rx` is closed, then let any in-flight run
    /// finish.
    ///
    /// This is an `async fn` and should be spawned (or awaited) on the tokio
    /// runtime from `main()`. It never returns while the channel is open.
    pub async fn run(self, mut rx: mpsc::Receiver<HotkeyEvent>) {
        while let Some(event) = rx.recv().await {
            match event {
                HotkeyEvent::Activated => {
                    let _run = self.activate();
                }
            }
        }

        log::info!("pipeline: hotkey channel closed, runner shutting down");

        // Let an in-flight run complete naturally before returning.
        let task = self.inner.slot.lock().unwrap().take().map(|run| run.task);
        if let Some(task) = task {
            let _ = task.await;
        }
    }

    /// Handle one activation: supersede the current run and start the next.
    ///
    /// Never blocks on the previous run's teardown — the cancellation request
    /// is fire-and-forget here, and the spawned task reconciles ordering
    /// before it touches any shared state. The returned [`RunHandle`] is
    /// purely observational and can be dropped freely.
    ///
    /// # Panics
    ///
    /// Must be called from within a tokio runtime (it spawns the run task).
    pub fn activate(&self) -> RunHandle {
        let id = self.inner.next_run_id.fetch_add(1, Ordering::Relaxed) + 1;
        let cancel = CancellationToken::new();
        let (publisher, handle) = run_channel(id);

        let mut slot = self.inner.slot.lock().unwrap();

        let predecessor = slot.take().map(|prev| {
            log::info!("run {}: superseded by run {}", prev.id, id);
            prev.cancel.cancel();
            prev.task
        });

        let task = tokio::spawn(drive(
            Arc::clone(&self.inner),
            id,
            cancel.clone(),
            publisher,
            predecessor,
        ));
        *slot = Some(ActiveRun { id, cancel, task });

        handle
    }
}

// ---------------------------------------------------------------------------
// Run task
// ---------------------------------------------------------------------------

/// Outer frame of one run: predecessor teardown, body serialization, terminal
/// bookkeeping.
async fn drive(
    inner: Arc<RunnerInner>,
    id: u64,
    cancel: CancellationToken,
    publisher: StatePublisher,
    predecessor: Option<JoinHandle<()>>,
) {
    // The predecessor was already asked to cancel; give it a bounded window
    // to reach a terminal state, then abort the stale task. Aborting drops
    // its body-lock guard, so the lock cannot leak.
    if let Some(mut prev) = predecessor {
        if timeout(inner.teardown_wait, &mut prev).await.is_err() {
            log::warn!(
                "run {id}: predecessor ignored cancellation for {:?}, aborting it",
                inner.teardown_wait
            );
            prev.abort();
        }
    }

    let _guard = inner.body_lock.lock().await;

    let terminal = run_body(&inner, id, &cancel, &publisher).await;
    publisher.set(terminal);

    // Terminal transition: free the slot, unless a successor already owns it.
    let mut slot = inner.slot.lock().unwrap();
    if slot.as_ref().is_some_and(|run| run.id == id) {
        *slot = None;
    }
    drop(slot);

    log::debug!("run {id}: {}", terminal.label());
}

/// The pipeline body proper. Returns the terminal state to publish.
async fn run_body(
    inner: &RunnerInner,
    id: u64,
    cancel: &CancellationToken,
    publisher: &StatePublisher,
) -> RunState {
    if cancel.is_cancelled() {
        return RunState::Cancelled;
    }

    // ── Capture ──────────────────────────────────────────────────────────
    publisher.set(RunState::Capturing);

    let gateway = Arc::clone(&inner.gateway);
    let captured = match tokio::task::spawn_blocking(move || gateway.capture_selection()).await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            // A failed capture degrades to an empty selection; the run keeps
            // going and completes degraded if nothing usable comes back.
            log::warn!("run {id}: capture failed: {e}");
            inner.reporter.failure(&format!("Could not read selection: {e}"));
            String::new()
        }
        Err(e) => {
            log::warn!("run {id}: capture task failed: {e}");
            String::new()
        }
    };

    if cancel.is_cancelled() {
        return RunState::Cancelled;
    }

    inner.reporter.captured(&captured);

    // ── Correction ───────────────────────────────────────────────────────
    publisher.set(RunState::AwaitingCorrection);
    inner.reporter.progress("Awaiting response from the model...");

    let report = match inner.service.correct(&captured, cancel).await {
        Ok(report) => report,
        Err(ServiceError::Cancelled) => {
            log::debug!("run {id}: correction call abandoned");
            return RunState::Cancelled;
        }
        Err(e) => {
            log::warn!("run {id}: correction failed: {e}");
            inner.reporter.failure(&format!("Correction failed: {e}"));
            return RunState::Completed(RunOutcome::Degraded);
        }
    };

    if !report.is_usable() {
        inner
            .reporter
            .failure("Correction came back empty; skipping paste.");
        return RunState::Completed(RunOutcome::Degraded);
    }

    // Supersession may have landed while the service call was finishing; a
    // cancelled run must never reach Applying, usable result or not.
    if cancel.is_cancelled() {
        return RunState::Cancelled;
    }

    inner.reporter.corrected(&captured, &report);

    // ── Apply ────────────────────────────────────────────────────────────
    publisher.set(RunState::Applying);

    let gateway = Arc::clone(&inner.gateway);
    let text = report.corrected_text.clone();
    match tokio::task::spawn_blocking(move || gateway.apply_text(&text)).await {
        Ok(Ok(())) => RunState::Completed(RunOutcome::Applied),
        Ok(Err(e)) => {
            log::warn!("run {id}: apply failed: {e}");
            inner.reporter.failure(&format!("Paste failed: {e}"));
            RunState::Completed(RunOutcome::Degraded)
        }
        Err(e) => {
            log::warn!("run {id}: apply task failed: {e}");
            RunState::Completed(RunOutcome::Degraded)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
