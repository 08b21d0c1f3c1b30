//! Dedicated OS-thread hotkey listener using `rdev::listen`.
//!
//! `rdev::listen` is a blocking call that must live on its own OS thread.
//! [`HotkeyListener`] owns that thread and a stop flag; dropping it sets the
//! flag so the callback silently ignores further events.
//!
//! # Shutdown caveat
//!
//! `rdev::listen` has **no graceful shutdown API**. Setting the stop flag
//! prevents events from being forwarded, but the OS thread itself will remain
//! blocked in the rdev event loop until the process exits. This is safe and
//! expected — rdev holds no resources that need explicit cleanup.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::sync::mpsc;

use super::{Chord, HotkeyEvent};

// ---------------------------------------------------------------------------
// HeldModifiers
// ---------------------------------------------------------------------------

/// Tracks which modifier keys are currently held, fed from the raw key
/// press/release stream.
#[derive(Debug, Default, Clone, Copy)]
struct HeldModifiers {
    ctrl: bool,
    alt: bool,
    shift: bool,
    meta: bool,
}

impl HeldModifiers {
    /// Record a press (`true`) or release (`false`).
    ///
    /// Returns `true` when `key` was a modifier, so the caller knows the
    /// event cannot be a chord's final key.
    fn update(&mut self, key: rdev::Key, pressed: bool) -> bool {
        use rdev::Key::*;
        let flag = match key {
            ControlLeft | ControlRight => &mut self.ctrl,
            Alt | AltGr => &mut self.alt,
            ShiftLeft | ShiftRight => &mut self.shift,
            MetaLeft | MetaRight => &mut self.meta,
            _ => return false,
        };
        *flag = pressed;
        true
    }

    /// Whether every modifier the chord requires is currently held.
    ///
    /// Extra held modifiers are tolerated so e.g. Shift does not suppress a
    /// Ctrl+Alt chord.
    fn satisfies(&self, chord: &Chord) -> bool {
        (!chord.ctrl || self.ctrl)
            && (!chord.alt || self.alt)
            && (!chord.shift || self.shift)
            && (!chord.meta || self.meta)
    }
}

// ---------------------------------------------------------------------------
// HotkeyListener
// ---------------------------------------------------------------------------

/// Handle to a running hotkey listener thread.
///
/// Construct one with [`HotkeyListener::start`]. Drop it to stop forwarding
/// events.
///
/// The underlying OS thread will continue to exist until the process exits
/// because `rdev::listen` cannot be interrupted, but it will silently discard
/// all events once the stop flag is set.
pub struct HotkeyListener {
    /// Shared stop flag — set `true` on [`Drop`].
    stop: Arc<AtomicBool>,
    /// The thread handle. Kept alive so the thread is not detached
    /// prematurely; we never `join` it because `rdev::listen` never returns.
    _thread: std::thread::JoinHandle<()>,
}

impl HotkeyListener {
    /// Spawn a dedicated OS thread that watches the global key stream and
    /// sends [`HotkeyEvent::Activated`] on `tx` each time `chord` fires.
    ///
    /// The chord fires on the press of its final key while all its modifiers
    /// are held; auto-repeat presses of the final key fire again, matching
    /// how OS-level hotkey registries behave.
    ///
    /// # Arguments
    ///
    /// * `chord` — the activation chord, from [`Chord::parse`].
    /// * `tx`    — a `tokio::sync::mpsc` sender. The background thread uses
    ///   `blocking_send` so it works correctly from a non-async context.
    ///
    /// # Panics
    ///
    /// Panics if the OS refuses to create the thread (extremely unlikely).
    pub fn start(chord: Chord, tx: mpsc::Sender<HotkeyEvent>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_clone = Arc::clone(&stop);

        let thread = std::thread::Builder::new()
            .name("hotkey-listener".into())
            .spawn(move || {
                // Cell keeps the callback Fn-compatible; HeldModifiers is Copy.
                let held = std::cell::Cell::new(HeldModifiers::default());

                let result = rdev::listen(move |event| {
                    // Bail out if the listener has been stopped.
                    if stop_clone.load(Ordering::Relaxed) {
                        return;
                    }

                    match event.event_type {
                        rdev::EventType::KeyPress(key) => {
                            let mut state = held.get();
                            if state.update(key, true) {
                                held.set(state);
                                return;
                            }
                            if key == chord.key && state.satisfies(&chord) {
                                // blocking_send is safe from non-async threads.
                                let _ = tx.blocking_send(HotkeyEvent::Activated);
                            }
                        }
                        rdev::EventType::KeyRelease(key) => {
                            let mut state = held.get();
                            state.update(key, false);
                            held.set(state);
                        }
                        _ => {}
                    }
                });

                if let Err(e) = result {
                    log::error!("hotkey-listener: rdev::listen exited with error: {:?}", e);
                }
            })
            .expect("failed to spawn hotkey-listener thread");

        Self {
            stop,
            _thread: thread,
        }
    }
}

impl Drop for HotkeyListener {
    /// Set the stop flag so the rdev callback stops forwarding events.
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        // The OS thread continues to exist blocked inside rdev::listen until
        // the process exits — this is safe and requires no further cleanup.
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn chord(spec: &str) -> Chord {
        Chord::parse(spec).expect("chord")
    }

    #[test]
    fn modifiers_track_press_and_release() {
        let mut held = HeldModifiers::default();

        assert!(held.update(rdev::Key::ControlLeft, true));
        assert!(held.ctrl);
        assert!(held.update(rdev::Key::Alt, true));
        assert!(held.alt);

        assert!(held.update(rdev::Key::ControlLeft, false));
        assert!(!held.ctrl);
        assert!(held.alt);
    }

    #[test]
    fn non_modifier_keys_are_ignored_by_tracker() {
        let mut held = HeldModifiers::default();
        assert!(!held.update(rdev::Key::KeyA, true));
        assert!(!held.ctrl && !held.alt && !held.shift && !held.meta);
    }

    #[test]
    fn either_side_modifier_satisfies_chord() {
        let c = chord("ctrl+alt+a");

        let mut held = HeldModifiers::default();
        held.update(rdev::Key::ControlRight, true);
        held.update(rdev::Key::AltGr, true);
        assert!(held.satisfies(&c));
    }

    #[test]
    fn missing_modifier_does_not_satisfy() {
        let c = chord("ctrl+alt+a");

        let mut held = HeldModifiers::default();
        held.update(rdev::Key::ControlLeft, true);
        assert!(!held.satisfies(&c));
    }

    #[test]
    fn extra_modifiers_are_tolerated() {
        let c = chord("ctrl+a");

        let mut held = HeldModifiers::default();
        held.update(rdev::Key::ControlLeft, true);
        held.update(rdev::Key::ShiftLeft, true);
        assert!(held.satisfies(&c));
    }

    #[test]
    fn bare_key_chord_is_satisfied_with_nothing_held() {
        let c = chord("f9");
        let held = HeldModifiers::default();
        assert!(held.satisfies(&c));
    }
}
