//! OS-backed [`ClipboardGateway`] implementation using `arboard` + `enigo`.

use std::time::Duration;

use arboard::Clipboard;

use crate::config::RunnerConfig;

use super::{simulate_copy, simulate_paste, ClipboardGateway, GatewayError};

// ---------------------------------------------------------------------------
// SystemClipboard
// ---------------------------------------------------------------------------

/// The real clipboard gateway.
///
/// A short-lived [`arboard::Clipboard`] handle is created per call rather
/// than shared across calls, because `arboard::Clipboard` is not `Send` on
/// all platforms and the handle is cheap to create.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    /// Wait after the copy chord before reading the clipboard.
    capture_settle: Duration,
    /// Wait after writing the clipboard before the paste chord.
    apply_settle: Duration,
}

impl SystemClipboard {
    /// Build a gateway with the settle delays from [`RunnerConfig`].
    pub fn from_config(config: &RunnerConfig) -> Self {
        Self {
            capture_settle: Duration::from_millis(config.capture_settle_ms),
            apply_settle: Duration::from_millis(config.apply_settle_ms),
        }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::from_config(&RunnerConfig::default())
    }
}

impl ClipboardGateway for SystemClipboard {
    /// Simulate the copy chord, wait for OS event propagation, then read the
    /// clipboard text.
    ///
    /// An empty or non-text clipboard (nothing was selected, or the selection
    /// was an image) yields `Ok("")` — the pipeline treats that as an empty
    /// capture, not a failure.
    fn capture_selection(&self) -> Result<String, GatewayError> {
        simulate_copy()?;
        std::thread::sleep(self.capture_settle);

        let mut clipboard = open_clipboard()?;
        Ok(clipboard.get_text().unwrap_or_default())
    }

    /// Overwrite the clipboard with `text`, wait for the clipboard to settle,
    /// then simulate the paste chord.
    ///
    /// The clipboard is left holding `text` afterwards; repeating the call
    /// with the same text yields the same clipboard content.
    fn apply_text(&self, text: &str) -> Result<(), GatewayError> {
        let mut clipboard = open_clipboard()?;
        clipboard
            .set_text(text)
            .map_err(|e| GatewayError::ClipboardSet(e.to_string()))?;

        std::thread::sleep(self.apply_settle);
        simulate_paste()
    }
}

/// Open an `arboard::Clipboard` handle, mapping the error to [`GatewayError`].
fn open_clipboard() -> Result<Clipboard, GatewayError> {
    Clipboard::new().map_err(|e| GatewayError::ClipboardAccess(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
