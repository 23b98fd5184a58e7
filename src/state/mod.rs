//! State Module - Runtime event state
//!
//! - **Keyboard** - Event types, dispatch, handler registry
//! - **Input** - crossterm key conversion and polling

pub mod input;
pub mod keyboard;

pub use keyboard::{KeyHandler, KeyState, KeyboardEvent, Modifiers};
