//! Input Module - Terminal key events.
//!
//! Bridges crossterm's event system with the keyboard bus.
//!
//! # API
//!
//! - `convert_key_event` - Convert crossterm KeyEvent to our KeyboardEvent
//! - `poll_key` - Non-blocking key check with timeout
//! - `pump` - Poll once and dispatch whatever arrived
//!
//! # Example
//!
//! ```ignore
//! use spark_context::input;
//! use std::time::Duration;
//!
//! loop {
//!     input::pump(Duration::from_millis(50))?;
//! }
//! ```

use std::time::Duration;

use crossterm::event::{
    poll, read, Event as CrosstermEvent, KeyCode, KeyEvent as CrosstermKeyEvent,
    KeyEventKind, KeyModifiers,
};

use super::keyboard::{self, KeyState, KeyboardEvent, Modifiers};

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Convert crossterm KeyEvent to our KeyboardEvent
pub fn convert_key_event(event: CrosstermKeyEvent) -> KeyboardEvent {
    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => String::new(),
    };

    let state = match event.kind {
        KeyEventKind::Press => KeyState::Press,
        KeyEventKind::Repeat => KeyState::Repeat,
        KeyEventKind::Release => KeyState::Release,
    };

    KeyboardEvent {
        key,
        modifiers: convert_modifiers(event.modifiers),
        state,
    }
}

/// Convert crossterm KeyModifiers to our Modifiers
fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
        meta: mods.contains(KeyModifiers::SUPER),
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for a key event with timeout.
/// Returns None if nothing arrived or the event was not a key.
pub fn poll_key(timeout: Duration) -> std::io::Result<Option<KeyboardEvent>> {
    if !poll(timeout)? {
        return Ok(None);
    }
    match read()? {
        CrosstermEvent::Key(key) => Ok(Some(convert_key_event(key))),
        _ => Ok(None),
    }
}

/// Poll once and dispatch a key event to the keyboard bus.
///
/// Returns the event that was dispatched, if any.
pub fn pump(timeout: Duration) -> std::io::Result<Option<KeyboardEvent>> {
    let event = poll_key(timeout)?;
    if let Some(event) = &event {
        keyboard::dispatch(event.clone());
    }
    Ok(event)
}

// =============================================================================
// TESTS
// =============================================================================
