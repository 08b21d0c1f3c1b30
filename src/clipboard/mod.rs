//! Clipboard gateway — selection capture and text apply for grammar-hotkey.
//!
//! # Overview
//!
//! There is no portable "read the current selection" API, so both directions
//! go through the clipboard plus a simulated key chord:
//!
//! * **Capture**: simulate Ctrl+C (⌘C on macOS), wait for the OS to propagate
//!   the copy, then read the clipboard text.
//! * **Apply**: write the corrected text into the clipboard, wait for the
//!   clipboard to settle, then simulate Ctrl+V (⌘V) to paste over the
//!   selection. The corrected text intentionally stays on the clipboard —
//!   apply is a plain overwrite.
//!
//! [`ClipboardGateway`] is the seam the pipeline orchestrator talks to;
//! [`SystemClipboard`] is the real OS-backed implementation. Tests swap in
//! in-memory doubles.

pub mod keyboard;
pub mod system;

pub use keyboard::{simulate_copy, simulate_paste};
pub use system::SystemClipboard;

use thiserror::Error;

// ---------------------------------------------------------------------------
// GatewayError
// ---------------------------------------------------------------------------

/// All errors that can surface at the clipboard gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Could not open or read the system clipboard.
    #[error("cannot access clipboard: {0}")]
    ClipboardAccess(String),

    /// Could not write text to the system clipboard.
    #[error("cannot set clipboard text: {0}")]
    ClipboardSet(String),

    /// Could not simulate a key press/release event.
    #[error("cannot simulate key press: {0}")]
    KeySimulation(String),
}

// ---------------------------------------------------------------------------
// ClipboardGateway trait
// ---------------------------------------------------------------------------

/// Boundary between the pipeline orchestrator and the OS clipboard.
///
/// Both operations block briefly on OS event propagation, so the orchestrator
/// calls them through `tokio::task::spawn_blocking`. Implementors must be
/// `Send + Sync` so they can be shared as `Arc<dyn ClipboardGateway>`.
pub trait ClipboardGateway: Send + Sync {
    /// Copy the current selection and return its text.
    ///
    /// An empty selection yields `Ok("")`; errors mean the clipboard itself
    /// was inaccessible.
    fn capture_selection(&self) -> Result<String, GatewayError>;

    /// Replace the selection with `text` (clipboard overwrite + paste chord).
    fn apply_text(&self, text: &str) -> Result<(), GatewayError>;
}
