//! Global hotkey chord detection, backed by `rdev`.
//!
//! # Design
//!
//! `rdev::listen()` is a blocking OS-level call that never returns while the
//! process is alive. It must run on a **dedicated OS thread** — it cannot be
//! used inside a tokio task.
//!
//! [`HotkeyListener::start`] spawns that dedicated thread and returns a
//! [`HotkeyListener`] handle. The thread tracks which modifier keys are held
//! and emits [`HotkeyEvent::Activated`] whenever the configured [`Chord`]
//! fires, bridging into the async world over a `tokio::sync::mpsc` channel
//! with `blocking_send`.
//!
//! # Usage
//!
//! ```no_run
//! use tokio::sync::mpsc;
//! use grammar_hotkey::hotkey::{Chord, HotkeyListener};
//!
//! let (tx, mut rx) = mpsc::channel(16);
//! let chord = Chord::parse("ctrl+alt+a").expect("bad chord");
//! let _listener = HotkeyListener::start(chord, tx);
//!
//! // In your async loop:
//! // while let Some(ev) = rx.recv().await { ... }
//! ```

pub mod listener;

pub use listener::HotkeyListener;

// ---------------------------------------------------------------------------
// HotkeyEvent
// ---------------------------------------------------------------------------

/// Events emitted by the hotkey listener thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyEvent {
    /// The activation chord was pressed.
    Activated,
}

// ---------------------------------------------------------------------------
// Chord
// ---------------------------------------------------------------------------

/// A parsed key chord: zero or more modifiers plus one final key.
///
/// The chord fires when the final key is pressed while every listed modifier
/// is held. Extra held modifiers do not block activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    /// ⌘ on macOS, Win/Super elsewhere.
    pub meta: bool,
    pub key: rdev::Key,
}

impl Chord {
    /// Parse a chord string such as `"ctrl+alt+a"` or `"ctrl+cmd+a"`.
    ///
    /// Tokens are `+`-separated and case-insensitive; every token except the
    /// last must be a modifier name, and the last must name a key. Accepted
    /// modifier spellings: `ctrl`/`control`, `alt`/`option`, `shift`,
    /// `cmd`/`meta`/`super`/`win`.
    ///
    /// Returns `None` for unrecognised tokens so callers can fall back to a
    /// default or report the bad string to the user.
    ///
    /// # Examples
    ///
    /// ```
    /// use grammar_hotkey::hotkey::Chord;
    ///
    /// let chord = Chord::parse("ctrl+alt+a").unwrap();
    /// assert!(chord.ctrl && chord.alt && !chord.meta);
    /// assert_eq!(chord.key, rdev::Key::KeyA);
    ///
    /// assert!(Chord::parse("ctrl+").is_none());
    /// assert!(Chord::parse("bogus+a").is_none());
    /// ```
    pub fn parse(spec: &str) -> Option<Self> {
        let mut chord = Self {
            ctrl: false,
            alt: false,
            shift: false,
            meta: false,
            key: rdev::Key::KeyA,
        };

        let tokens: Vec<&str> = spec.split('+').map(str::trim).collect();
        let (key_token, modifiers) = tokens.split_last()?;

        for token in modifiers {
            match token.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => chord.ctrl = true,
                "alt" | "option" => chord.alt = true,
                "shift" => chord.shift = true,
                "cmd" | "meta" | "super" | "win" => chord.meta = true,
                _ => return None,
            }
        }

        chord.key = parse_key(key_token)?;
        Some(chord)
    }
}

// ---------------------------------------------------------------------------
// parse_key
// ---------------------------------------------------------------------------

/// Letter keys in alphabetical order so `'a'..='z'` can index directly.
const LETTER_KEYS: [rdev::Key; 26] = [
    rdev::Key::KeyA,
    rdev::Key::KeyB,
    rdev::Key::KeyC,
    rdev::Key::KeyD,
    rdev::Key::KeyE,
    rdev::Key::KeyF,
    rdev::Key::KeyG,
    rdev::Key::KeyH,
    rdev::Key::KeyI,
    rdev::Key::KeyJ,
    rdev::Key::KeyK,
    rdev::Key::KeyL,
    rdev::Key::KeyM,
    rdev::Key::KeyN,
    rdev::Key::KeyO,
    rdev::Key::KeyP,
    rdev::Key::KeyQ,
    rdev::Key::KeyR,
    rdev::Key::KeyS,
    rdev::Key::KeyT,
    rdev::Key::KeyU,
    rdev::Key::KeyV,
    rdev::Key::KeyW,
    rdev::Key::KeyX,
    rdev::Key::KeyY,
    rdev::Key::KeyZ,
];

const FUNCTION_KEYS: [rdev::Key; 12] = [
    rdev::Key::F1,
    rdev::Key::F2,
    rdev::Key::F3,
    rdev::Key::F4,
    rdev::Key::F5,
    rdev::Key::F6,
    rdev::Key::F7,
    rdev::Key::F8,
    rdev::Key::F9,
    rdev::Key::F10,
    rdev::Key::F11,
    rdev::Key::F12,
];

/// Parse a key name from a chord token into an [`rdev::Key`].
///
/// Supports single ASCII letters, `f1`–`f12`, and a handful of named keys.
/// Case-insensitive. Returns `None` for anything unrecognised.
pub fn parse_key(token: &str) -> Option<rdev::Key> {
    let lower = token.to_ascii_lowercase();

    // Single letter: index into the alphabet table.
    let mut chars = lower.chars();
    if let (Some(c @ 'a'..='z'), None) = (chars.next(), chars.next()) {
        return Some(LETTER_KEYS[(c as u8 - b'a') as usize]);
    }

    // f1..f12
    if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<usize>().ok()) {
        if (1..=12).contains(&n) {
            return Some(FUNCTION_KEYS[n - 1]);
        }
    }

    match lower.as_str() {
        "space" => Some(rdev::Key::Space),
        "escape" | "esc" => Some(rdev::Key::Escape),
        "return" | "enter" => Some(rdev::Key::Return),
        "tab" => Some(rdev::Key::Tab),
        "backspace" => Some(rdev::Key::Backspace),
        "delete" | "del" => Some(rdev::Key::Delete),
        "home" => Some(rdev::Key::Home),
        "end" => Some(rdev::Key::End),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_letter_keys_case_insensitive() {
        assert_eq!(parse_key("a"), Some(rdev::Key::KeyA));
        assert_eq!(parse_key("A"), Some(rdev::Key::KeyA));
        assert_eq!(parse_key("z"), Some(rdev::Key::KeyZ));
        assert_eq!(parse_key("g"), Some(rdev::Key::KeyG));
    }

    #[test]
    fn parse_function_keys() {
        assert_eq!(parse_key("f1"), Some(rdev::Key::F1));
        assert_eq!(parse_key("F9"), Some(rdev::Key::F9));
        assert_eq!(parse_key("f12"), Some(rdev::Key::F12));
        assert_eq!(parse_key("f13"), None);
        assert_eq!(parse_key("f0"), None);
    }

    #[test]
    fn parse_named_keys() {
        assert_eq!(parse_key("Space"), Some(rdev::Key::Space));
        assert_eq!(parse_key("esc"), Some(rdev::Key::Escape));
        assert_eq!(parse_key("Enter"), Some(rdev::Key::Return));
    }

    #[test]
    fn parse_unknown_key_returns_none() {
        assert_eq!(parse_key("xyz"), None);
        assert_eq!(parse_key(""), None);
    }

    #[test]
    fn parse_default_linux_chord() {
        let chord = Chord::parse("ctrl+alt+a").expect("chord");
        assert!(chord.ctrl);
        assert!(chord.alt);
        assert!(!chord.shift);
        assert!(!chord.meta);
        assert_eq!(chord.key, rdev::Key::KeyA);
    }

    #[test]
    fn parse_default_macos_chord() {
        let chord = Chord::parse("ctrl+cmd+a").expect("chord");
        assert!(chord.ctrl);
        assert!(chord.meta);
        assert!(!chord.alt);
        assert_eq!(chord.key, rdev::Key::KeyA);
    }

    #[test]
    fn parse_accepts_whitespace_and_case() {
        let chord = Chord::parse("Ctrl + Shift + G").expect("chord");
        assert!(chord.ctrl);
        assert!(chord.shift);
        assert_eq!(chord.key, rdev::Key::KeyG);
    }

    #[test]
    fn parse_bare_key_has_no_modifiers() {
        let chord = Chord::parse("f9").expect("chord");
        assert!(!chord.ctrl && !chord.alt && !chord.shift && !chord.meta);
        assert_eq!(chord.key, rdev::Key::F9);
    }

    #[test]
    fn parse_rejects_bad_specs() {
        assert!(Chord::parse("").is_none());
        assert!(Chord::parse("ctrl+").is_none());
        assert!(Chord::parse("bogus+a").is_none());
        assert!(Chord::parse("ctrl+alt+xyz").is_none());
        // Modifier in key position is not a chord.
        assert!(Chord::parse("ctrl+shift").is_none());
    }
}
