//! Focusable - What a component hands the focus manager when it registers.
//!
//! Components either implement [`Focusable`] themselves or build a
//! [`FocusItem`] from closures:
//!
//! ```ignore
//! ctx.register(
//!     FocusItem::new("save")
//!         .hotkey("ctrl+s")
//!         .on_activate(move || { save(); true }),
//! );
//! ```

use std::fmt;
use std::rc::Rc;

use super::keyboard::Key;
use crate::primitives::{ActivateCallback, BlurCallback, FocusCallback, KeyCallback};
use crate::types::GridPosition;

// =============================================================================
// Placement
// =============================================================================

/// Where a focusable sits in the navigation grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Placement {
    /// Next cell of the manager's row/column cursor.
    #[default]
    Auto,
    /// An explicit cell.
    At(GridPosition),
    /// No cell: reachable through linear navigation and hotkeys only.
    Linear,
}

// =============================================================================
// Focusable Trait
// =============================================================================

/// A focus target.
///
/// Callbacks are invoked while the owning focus manager is mutably borrowed;
/// they must not call back into that same manager.
pub trait Focusable {
    /// Identity used to carry focus across frames.
    fn id(&self) -> &str;

    fn placement(&self) -> Placement {
        Placement::Auto
    }

    fn hotkeys(&self) -> &[String] {
        &[]
    }

    fn can_focus(&self) -> bool {
        true
    }

    /// Take focus when nothing was focused in the previous frame.
    fn auto_focus(&self) -> bool {
        false
    }

    /// Input items receive every non-navigation key while focused.
    fn is_input(&self) -> bool {
        false
    }

    fn on_focus(&self) {}

    fn on_blur(&self) {}

    /// Enter, Space or a hotkey. Returns whether the activation was handled.
    fn on_activate(&self) -> bool {
        false
    }

    /// Key routed to a focused input item. Returns whether it was consumed.
    fn on_key_press(&self, _key: &Key) -> bool {
        false
    }
}

// =============================================================================
// Focus Item (closure builder)
// =============================================================================

/// Closure-backed [`Focusable`].
#[derive(Clone, Default)]
pub struct FocusItem {
    id: String,
    placement: Placement,
    hotkeys: Vec<String>,
    disabled: bool,
    auto_focus: bool,
    input: bool,
    on_focus: Option<FocusCallback>,
    on_blur: Option<BlurCallback>,
    on_activate: Option<ActivateCallback>,
    on_key_press: Option<KeyCallback>,
}

impl FocusItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Pin the item to an explicit grid cell.
    pub fn at(mut self, row: usize, col: usize) -> Self {
        self.placement = Placement::At(GridPosition::new(row, col));
        self
    }

    /// Keep the item out of the grid.
    pub fn linear(mut self) -> Self {
        self.placement = Placement::Linear;
        self
    }

    pub fn hotkey(mut self, hotkey: impl Into<String>) -> Self {
        self.hotkeys.push(hotkey.into());
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.disabled = !enabled;
        self
    }

    pub fn auto_focus(mut self) -> Self {
        self.auto_focus = true;
        self
    }

    pub fn input(mut self) -> Self {
        self.input = true;
        self
    }

    pub fn on_focus(mut self, f: impl Fn() + 'static) -> Self {
        self.on_focus = Some(Rc::new(f));
        self
    }

    pub fn on_blur(mut self, f: impl Fn() + 'static) -> Self {
        self.on_blur = Some(Rc::new(f));
        self
    }

    pub fn on_activate(mut self, f: impl Fn() -> bool + 'static) -> Self {
        self.on_activate = Some(Rc::new(f));
        self
    }

    pub fn on_key_press(mut self, f: impl Fn(&Key) -> bool + 'static) -> Self {
        self.on_key_press = Some(Rc::new(f));
        self
    }
}

impl Focusable for FocusItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn placement(&self) -> Placement {
        self.placement
    }

    fn hotkeys(&self) -> &[String] {
        &self.hotkeys
    }

    fn can_focus(&self) -> bool {
        !self.disabled
    }

    fn auto_focus(&self) -> bool {
        self.auto_focus
    }

    fn is_input(&self) -> bool {
        self.input
    }

    fn on_focus(&self) {
        if let Some(f) = &self.on_focus {
            f();
        }
    }

    fn on_blur(&self) {
        if let Some(f) = &self.on_blur {
            f();
        }
    }

    fn on_activate(&self) -> bool {
        self.on_activate.as_ref().is_some_and(|f| f())
    }

    fn on_key_press(&self, key: &Key) -> bool {
        self.on_key_press.as_ref().is_some_and(|f| f(key))
    }
}

impl fmt::Debug for FocusItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusItem")
            .field("id", &self.id)
            .field("placement", &self.placement)
            .field("hotkeys", &self.hotkeys)
            .field("disabled", &self.disabled)
            .field("auto_focus", &self.auto_focus)
            .field("input", &self.input)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_builder_defaults() {
        let item = FocusItem::new("a");
        assert_eq!(item.id(), "a");
        assert_eq!(item.placement(), Placement::Auto);
        assert!(item.can_focus());
        assert!(!Focusable::auto_focus(&item));
        assert!(!item.is_input());
        assert!(!Focusable::on_activate(&item));
    }

    #[test]
    fn test_builder_callbacks() {
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let item = FocusItem::new("b")
            .at(2, 3)
            .hotkey("ctrl+b")
            .enabled(false)
            .on_activate(move || {
                h.set(h.get() + 1);
                true
            })
            .on_key_press(|key| key.is_char());

        assert_eq!(item.placement(), Placement::At(GridPosition::new(2, 3)));
        assert_eq!(item.hotkeys(), ["ctrl+b".to_string()]);
        assert!(!item.can_focus());
        assert!(Focusable::on_activate(&item));
        assert_eq!(hits.get(), 1);
        assert!(Focusable::on_key_press(&item, &Key::char('x')));
        assert!(!Focusable::on_key_press(&item, &Key::parse("enter")));
    }
}
