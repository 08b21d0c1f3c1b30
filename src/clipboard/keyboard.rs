//! Keyboard chord simulation backed by the `enigo` crate.
//!
//! Provides [`simulate_copy`] and [`simulate_paste`], which send the
//! OS-appropriate copy/paste shortcut to the currently focused window:
//!
//! | Platform | Copy | Paste |
//! |----------|------|-------|
//! | macOS    | ⌘C   | ⌘V    |
//! | Windows  | Ctrl+C | Ctrl+V |
//! | Linux    | Ctrl+C | Ctrl+V |

use enigo::{Direction, Enigo, Key, Keyboard, Settings};

use super::GatewayError;

/// Simulate the system copy shortcut in the currently focused window.
///
/// # Errors
///
/// Returns [`GatewayError::KeySimulation`] if the enigo backend cannot be
/// initialised or if any key event fails to be delivered.
pub fn simulate_copy() -> Result<(), GatewayError> {
    send_edit_chord('c')
}

/// Simulate the system paste shortcut in the currently focused window.
///
/// # Errors
///
/// Returns [`GatewayError::KeySimulation`] if the enigo backend cannot be
/// initialised or if any key event fails to be delivered.
pub fn simulate_paste() -> Result<(), GatewayError> {
    send_edit_chord('v')
}

/// Hold the platform edit modifier (⌘ on macOS, Ctrl elsewhere), click
/// `letter`, release the modifier.
///
/// A new [`Enigo`] instance is created for each call because `Enigo` is not
/// `Send` and the handle is cheap to construct.
fn send_edit_chord(letter: char) -> Result<(), GatewayError> {
    let modifier = if cfg!(target_os = "macos") {
        Key::Meta
    } else {
        Key::Control
    };

    let mut enigo =
        Enigo::new(&Settings::default()).map_err(|e| GatewayError::KeySimulation(e.to_string()))?;

    enigo
        .key(modifier, Direction::Press)
        .map_err(|e| GatewayError::KeySimulation(e.to_string()))?;
    let click = enigo.key(Key::Unicode(letter), Direction::Click);
    // Always try to release the modifier, even if the click failed.
    let release = enigo.key(modifier, Direction::Release);

    click.map_err(|e| GatewayError::KeySimulation(e.to_string()))?;
    release.map_err(|e| GatewayError::KeySimulation(e.to_string()))?;
    Ok(())
}
