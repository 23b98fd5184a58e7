//! Keyboard Module - Document-level key events.
//!
//! A single key event bus that provider values subscribe to from their
//! effects, the way a browser app listens on `document`. Subscriptions return
//! a cleanup function; hand it to `on_cleanup` so the listener goes away
//! with the provider.
//!
//! Does NOT own stdin (see [`super::input`]).
//!
//! # API
//!
//! - `last_event` - Get last keyboard event (reactive)
//! - `on(handler)` - Subscribe to all keyboard events
//! - `on_key(code, fn)` - Subscribe to one key code
//! - `dispatch(event)` - Deliver an event to subscribers
//!
//! # Example
//!
//! ```ignore
//! use spark_context::{keyboard, on_cleanup};
//!
//! // Inside a context's value function
//! let off = keyboard::on(move |event| {
//!     if event.modifiers.ctrl && event.code() == "KeyT" {
//!         toggle();
//!         return true;
//!     }
//!     false
//! });
//! on_cleanup(off);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{signal, Signal};
use tracing::trace;

// =============================================================================
// TYPES
// =============================================================================

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Create modifiers with ctrl
    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }
}

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The key that was pressed (e.g., "a", "1", " ", "Enter")
    pub key: String,
    /// Modifier keys state
    pub modifiers: Modifiers,
    /// Press/repeat/release state
    pub state: KeyState,
}

impl KeyboardEvent {
    /// Create a simple key press event
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
            state: KeyState::Press,
        }
    }

    /// Create a key press with modifiers
    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            modifiers,
            ..Self::new(key)
        }
    }

    /// Check if this is a press event
    pub fn is_press(&self) -> bool {
        self.state == KeyState::Press
    }

    /// Physical key code in DOM style.
    ///
    /// Letters map to `KeyA`..`KeyZ`, digits to `Digit0`..`Digit9`, and the
    /// space bar to `Space`. Named keys ("Enter", "ArrowUp", "F1") and codes
    /// that are already in this form are returned unchanged.
    pub fn code(&self) -> String {
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => format!("Key{}", c.to_ascii_uppercase()),
            (Some(c), None) if c.is_ascii_digit() => format!("Digit{c}"),
            (Some(' '), None) => "Space".to_string(),
            _ => self.key.clone(),
        }
    }
}

/// Handler for keyboard events. Return true to consume the event.
pub type KeyHandler = Rc<dyn Fn(&KeyboardEvent) -> bool>;

/// Handler for a specific key code. Return true to consume the event.
pub type KeySpecificHandler = Rc<dyn Fn() -> bool>;

// =============================================================================
// STATE
// =============================================================================

thread_local! {
    static LAST_EVENT: Signal<Option<KeyboardEvent>> = signal(None);
}

/// Get the last keyboard event
pub fn last_event() -> Option<KeyboardEvent> {
    LAST_EVENT.with(|s| s.get())
}

/// Get the last key pressed
pub fn last_key() -> String {
    last_event().map(|e| e.key).unwrap_or_default()
}

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

#[derive(Default)]
struct HandlerRegistry {
    global_handlers: Vec<(usize, KeyHandler)>,
    key_handlers: Vec<(usize, String, KeySpecificHandler)>,
    next_id: usize,
}

impl HandlerRegistry {
    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

thread_local! {
    static REGISTRY: RefCell<HandlerRegistry> = RefCell::new(HandlerRegistry::default());
}

// =============================================================================
// EVENT DISPATCH
// =============================================================================

/// Dispatch a keyboard event to all registered handlers.
/// Returns true if any handler consumed the event.
///
/// Handlers are snapshotted before any runs, so a handler may subscribe or
/// unsubscribe (for example by unmounting a provider) while dispatching.
pub fn dispatch(event: KeyboardEvent) -> bool {
    LAST_EVENT.with(|s| s.set(Some(event.clone())));

    // Only press events reach handlers
    if !event.is_press() {
        return false;
    }

    let code = event.code();
    let (key_handlers, global_handlers): (Vec<KeySpecificHandler>, Vec<KeyHandler>) =
        REGISTRY.with(|reg| {
            let reg = reg.borrow();
            (
                reg.key_handlers
                    .iter()
                    .filter(|(_, handler_code, _)| *handler_code == code)
                    .map(|(_, _, handler)| handler.clone())
                    .collect(),
                reg.global_handlers
                    .iter()
                    .map(|(_, handler)| handler.clone())
                    .collect(),
            )
        });
    trace!(key = %event.key, code = %code, handlers = key_handlers.len() + global_handlers.len(), "dispatching key");

    if key_handlers.iter().any(|handler| handler()) {
        return true;
    }
    global_handlers.iter().any(|handler| handler(&event))
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Subscribe to all keyboard events.
/// Return true from handler to consume the event.
/// Returns cleanup function.
pub fn on<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&KeyboardEvent) -> bool + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.global_handlers.push((id, Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            reg.borrow_mut()
                .global_handlers
                .retain(|(handler_id, _)| *handler_id != id);
        });
    }
}

/// Subscribe to one key code (see [`KeyboardEvent::code`]).
/// Return true to consume the event.
/// Returns cleanup function.
pub fn on_key<F>(code: &str, handler: F) -> impl FnOnce()
where
    F: Fn() -> bool + 'static,
{
    let code = code.to_string();
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.key_handlers.push((id, code, Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            reg.borrow_mut()
                .key_handlers
                .retain(|(handler_id, _, _)| *handler_id != id);
        });
    }
}

/// Number of live subscriptions (global and per-key).
pub fn handler_count() -> usize {
    REGISTRY.with(|reg| {
        let reg = reg.borrow();
        reg.global_handlers.len() + reg.key_handlers.len()
    })
}

/// Reset keyboard state (for testing)
pub fn reset_keyboard_state() {
    REGISTRY.with(|reg| *reg.borrow_mut() = HandlerRegistry::default());
    LAST_EVENT.with(|s| s.set(None));
}

// =============================================================================
// TESTS
// =============================================================================
