//! Pipeline module — the single-flight correction orchestrator.
//!
//! [`PipelineRunner`] owns the one in-flight-run slot. Each hotkey activation
//! cancels whatever run is live and starts a fresh one; the runs themselves
//! move through the [`RunState`] machine:
//!
//! ```text
//! Started ──▶ Capturing ──▶ AwaitingCorrection ──▶ Applying ──▶ Completed(Applied)
//!                 │                 │    │                          Completed(Degraded)
//!                 └────────────────▶└────┴──────▶ Cancelled
//! ```
//!
//! `Cancelled` and `Completed(_)` are terminal. A run that is superseded
//! while capturing or awaiting the service ends `Cancelled` and never touches
//! the clipboard again; service failures and unusable corrections end
//! `Completed(Degraded)` with the clipboard left alone.

pub mod runner;
pub mod state;

pub use runner::PipelineRunner;
pub use state::{RunHandle, RunOutcome, RunState};
