//! Keyboard Module - Canonical key model
//!
//! Every key that reaches a focus manager is normalized into a [`Key`]:
//! a [`KeyCode`] plus [`Modifiers`]. Hosts may pass string names
//! (`"up"`, `"ArrowUp"`, `"shift+tab"`, `"ctrl+s"`, `"q"`) or convert
//! crossterm events (see the `input` module).
//!
//! # Example
//!
//! ```ignore
//! use spark_hooks::state::{Key, KeyCode, Modifiers};
//!
//! let key = Key::parse("shift+tab");
//! assert_eq!(key.code, KeyCode::BackTab);
//!
//! let save = Key::parse("Ctrl+S");
//! assert_eq!(save.modifiers, Modifiers::CTRL);
//! assert_eq!(save.hotkey_name(), "ctrl+s");
//! ```

use std::fmt;

// =============================================================================
// MODIFIERS
// =============================================================================

bitflags::bitflags! {
    /// Keyboard modifier state
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const CTRL = 0b0001;
        const ALT = 0b0010;
        const SHIFT = 0b0100;
        const META = 0b1000;
    }
}

impl Modifiers {
    fn parse_one(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Some(Self::CTRL),
            "alt" | "option" => Some(Self::ALT),
            "shift" => Some(Self::SHIFT),
            "meta" | "super" | "cmd" => Some(Self::META),
            _ => None,
        }
    }

    fn prefix(self) -> String {
        let mut out = String::new();
        if self.contains(Self::CTRL) {
            out.push_str("ctrl+");
        }
        if self.contains(Self::ALT) {
            out.push_str("alt+");
        }
        if self.contains(Self::SHIFT) {
            out.push_str("shift+");
        }
        if self.contains(Self::META) {
            out.push_str("meta+");
        }
        out
    }
}

// =============================================================================
// KEY CODE
// =============================================================================

/// The key itself, independent of modifiers.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Up,
    Down,
    Left,
    Right,
    Tab,
    /// Shift+Tab
    BackTab,
    Enter,
    Space,
    Escape,
    Backspace,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    F(u8),
    Char(char),
    /// Anything else, stored lowercased.
    Named(String),
}

impl KeyCode {
    fn from_name(name: &str) -> Self {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return if c == ' ' { KeyCode::Space } else { KeyCode::Char(c) };
        }

        let lower = name.to_ascii_lowercase();
        match lower.as_str() {
            "up" | "arrowup" => KeyCode::Up,
            "down" | "arrowdown" => KeyCode::Down,
            "left" | "arrowleft" => KeyCode::Left,
            "right" | "arrowright" => KeyCode::Right,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "enter" | "return" => KeyCode::Enter,
            "space" => KeyCode::Space,
            "esc" | "escape" => KeyCode::Escape,
            "backspace" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdown" => KeyCode::PageDown,
            "insert" | "ins" => KeyCode::Insert,
            _ => match lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                Some(n) if n > 0 => KeyCode::F(n),
                _ => KeyCode::Named(lower),
            },
        }
    }

    /// Lowercase canonical name, without modifiers.
    pub fn name(&self) -> String {
        match self {
            KeyCode::Up => "up".into(),
            KeyCode::Down => "down".into(),
            KeyCode::Left => "left".into(),
            KeyCode::Right => "right".into(),
            KeyCode::Tab => "tab".into(),
            KeyCode::BackTab => "backtab".into(),
            KeyCode::Enter => "enter".into(),
            KeyCode::Space => "space".into(),
            KeyCode::Escape => "escape".into(),
            KeyCode::Backspace => "backspace".into(),
            KeyCode::Delete => "delete".into(),
            KeyCode::Home => "home".into(),
            KeyCode::End => "end".into(),
            KeyCode::PageUp => "pageup".into(),
            KeyCode::PageDown => "pagedown".into(),
            KeyCode::Insert => "insert".into(),
            KeyCode::F(n) => format!("f{n}"),
            KeyCode::Char(c) => c.to_lowercase().collect(),
            KeyCode::Named(name) => name.clone(),
        }
    }
}

// =============================================================================
// KEY
// =============================================================================

/// A normalized key press.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl Key {
    pub fn new(code: KeyCode) -> Self {
        Self::with_modifiers(code, Modifiers::empty())
    }

    /// Build a key, folding Shift+Tab into [`KeyCode::BackTab`].
    pub fn with_modifiers(code: KeyCode, modifiers: Modifiers) -> Self {
        match code {
            KeyCode::Tab if modifiers.contains(Modifiers::SHIFT) => Self {
                code: KeyCode::BackTab,
                modifiers: modifiers - Modifiers::SHIFT,
            },
            KeyCode::BackTab => Self {
                code,
                modifiers: modifiers - Modifiers::SHIFT,
            },
            _ => Self { code, modifiers },
        }
    }

    pub fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c))
    }

    /// Parse a key name such as `"q"`, `"Enter"`, `"ArrowUp"` or `"ctrl+shift+x"`.
    ///
    /// A `+` only separates modifiers when what precedes it is a known
    /// modifier name, so `"+"` and `"ctrl++"` parse as the plus key.
    pub fn parse(input: &str) -> Self {
        let trimmed = if input.trim().is_empty() { input } else { input.trim() };
        let mut modifiers = Modifiers::empty();
        let mut rest = trimmed;

        while let Some((head, tail)) = rest.split_once('+') {
            if tail.is_empty() {
                break;
            }
            match Modifiers::parse_one(head) {
                Some(m) => {
                    modifiers |= m;
                    rest = tail;
                }
                None => break,
            }
        }

        Self::with_modifiers(KeyCode::from_name(rest), modifiers)
    }

    /// Case-insensitive name used for hotkey tables.
    ///
    /// Shift is dropped for character keys since it is already reflected in
    /// the character itself.
    pub fn hotkey_name(&self) -> String {
        let modifiers = match self.code {
            KeyCode::Char(_) => self.modifiers - Modifiers::SHIFT,
            _ => self.modifiers,
        };
        format!("{}{}", modifiers.prefix(), self.code.name())
    }

    pub fn is_char(&self) -> bool {
        matches!(self.code, KeyCode::Char(_))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.modifiers.prefix(), self.code.name())
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::parse(value)
    }
}

impl From<KeyCode> for Key {
    fn from(code: KeyCode) -> Self {
        Key::new(code)
    }
}

/// Normalize a hotkey declaration into its table key.
pub fn normalize_hotkey(hotkey: &str) -> String {
    Key::parse(hotkey).hotkey_name()
}

// =============================================================================
// TESTS
// =============================================================================
