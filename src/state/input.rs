//! Input Module - crossterm event conversion
//!
//! Bridges crossterm's event system with the crate's key model so a host
//! loop can feed raw terminal events straight into a mounted runtime.
//!
//! # API
//!
//! - `convert_key_event` - Convert crossterm KeyEvent to our Key
//! - `convert_event` - Convert any crossterm Event to an [`InputEvent`]
//!
//! # Example
//!
//! ```ignore
//! use crossterm::event::read;
//! use spark_hooks::state::input::{convert_event, InputEvent};
//!
//! match convert_event(read()?) {
//!     InputEvent::Key(key) => { handle.dispatch(&key); }
//!     InputEvent::Resize(w, h) => handle.resize(w, h),
//!     InputEvent::None => {}
//! }
//! ```

use crossterm::event::{
    Event as CrosstermEvent,
    KeyCode as CrosstermKeyCode,
    KeyEvent as CrosstermKeyEvent,
    KeyEventKind,
    KeyModifiers,
};

use super::keyboard::{Key, KeyCode, Modifiers};

// =============================================================================
// INPUT EVENT ENUM
// =============================================================================

/// Events the runtime cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Key press (or repeat)
    Key(Key),
    /// Terminal resize event (new width, height)
    Resize(u16, u16),
    /// Releases, mouse, focus, paste and anything else
    None,
}

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Convert a crossterm KeyEvent to our Key.
///
/// Release events and keys with no meaningful name yield `None`.
pub fn convert_key_event(event: CrosstermKeyEvent) -> Option<Key> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let code = match event.code {
        CrosstermKeyCode::Char(' ') => KeyCode::Space,
        CrosstermKeyCode::Char(c) => KeyCode::Char(c),
        CrosstermKeyCode::Enter => KeyCode::Enter,
        CrosstermKeyCode::Tab => KeyCode::Tab,
        CrosstermKeyCode::BackTab => KeyCode::BackTab,
        CrosstermKeyCode::Backspace => KeyCode::Backspace,
        CrosstermKeyCode::Delete => KeyCode::Delete,
        CrosstermKeyCode::Esc => KeyCode::Escape,
        CrosstermKeyCode::Up => KeyCode::Up,
        CrosstermKeyCode::Down => KeyCode::Down,
        CrosstermKeyCode::Left => KeyCode::Left,
        CrosstermKeyCode::Right => KeyCode::Right,
        CrosstermKeyCode::Home => KeyCode::Home,
        CrosstermKeyCode::End => KeyCode::End,
        CrosstermKeyCode::PageUp => KeyCode::PageUp,
        CrosstermKeyCode::PageDown => KeyCode::PageDown,
        CrosstermKeyCode::Insert => KeyCode::Insert,
        CrosstermKeyCode::F(n) => KeyCode::F(n),
        _ => return None,
    };

    Some(Key::with_modifiers(code, convert_modifiers(event.modifiers)))
}

/// Convert any crossterm event.
pub fn convert_event(event: CrosstermEvent) -> InputEvent {
    match event {
        CrosstermEvent::Key(key) => convert_key_event(key)
            .map(InputEvent::Key)
            .unwrap_or(InputEvent::None),
        CrosstermEvent::Resize(w, h) => InputEvent::Resize(w, h),
        _ => InputEvent::None,
    }
}

// =============================================================================
// MODIFIER CONVERSION
// =============================================================================

/// Convert crossterm KeyModifiers to our Modifiers
fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    let mut out = Modifiers::empty();
    if mods.contains(KeyModifiers::CONTROL) {
        out |= Modifiers::CTRL;
    }
    if mods.contains(KeyModifiers::ALT) {
        out |= Modifiers::ALT;
    }
    if mods.contains(KeyModifiers::SHIFT) {
        out |= Modifiers::SHIFT;
    }
    if mods.intersects(KeyModifiers::SUPER | KeyModifiers::META) {
        out |= Modifiers::META;
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================
