//! Focus System - Frame-based focus registration and navigation
//!
//! Manages focus for one focus scope (the base UI, or one portal):
//! - Registration of focusables during a render frame
//! - Focus restoration across frames (by id, then by index)
//! - Spatial navigation over a sparse row/column grid
//! - Hotkeys, activation, and key routing to input items
//! - Focus callbacks (on_focus/on_blur)
//!
//! # Frame lifecycle
//!
//! ```text
//! begin_frame()            clear this frame's registrations and cursor
//! register(item) ...       collect focusables in render order
//! next_row() ...           move the auto-placement cursor down a row
//! end_frame()              swap in the new list, rebuild hotkeys and grid,
//!                          restore focus
//! ```
//!
//! Between frames the manager answers key presses against the list built by
//! the last `end_frame`.
//!
//! # Example
//!
//! ```ignore
//! use spark_hooks::state::focus::FocusManager;
//! use spark_hooks::state::focusable::FocusItem;
//!
//! let mut focus = FocusManager::new();
//! focus.begin_frame();
//! focus.register(FocusItem::new("ok").hotkey("o"));
//! focus.register(FocusItem::new("cancel").hotkey("c"));
//! focus.end_frame();
//!
//! focus.handle_key("right");
//! assert_eq!(focus.focused_id(), Some("cancel"));
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use super::focusable::{Focusable, Placement};
use super::grid::FocusGrid;
use super::keyboard::{normalize_hotkey, Key, KeyCode};
use crate::types::{Direction, GridPosition};

/// Focus manager shared between a context and the children it creates.
pub type SharedFocusManager = Rc<RefCell<FocusManager>>;

// =============================================================================
// REGISTRATION
// =============================================================================

#[derive(Clone)]
struct Registration {
    item: Rc<dyn Focusable>,
    position: Option<GridPosition>,
}

// =============================================================================
// DEFERRED CALLBACKS
// =============================================================================

/// Blur/focus callbacks owed by a focus change.
///
/// Produced while the manager is borrowed and run after the borrow is gone,
/// so callbacks may reach back into the manager (or close its portal).
#[must_use]
#[derive(Default)]
pub struct FocusChange {
    blurred: Option<Rc<dyn Focusable>>,
    focused: Option<Rc<dyn Focusable>>,
}

impl FocusChange {
    /// Run `on_blur` on the old item, then `on_focus` on the new one.
    pub fn notify(self) {
        if let Some(item) = self.blurred {
            item.on_blur();
        }
        if let Some(item) = self.focused {
            item.on_focus();
        }
    }
}

/// What a key press resolved to, with its callbacks still to run.
#[must_use]
pub enum KeyAction {
    Ignored,
    /// Navigation. `None` when the key navigated but focus stayed put.
    Moved(Option<FocusChange>),
    Activate(Rc<dyn Focusable>),
    KeyPress(Rc<dyn Focusable>),
}

impl KeyAction {
    /// Run the callbacks. Returns whether the key was handled.
    pub fn run(self, key: &Key) -> bool {
        match self {
            KeyAction::Ignored | KeyAction::Moved(None) => false,
            KeyAction::Moved(Some(change)) => {
                change.notify();
                true
            }
            KeyAction::Activate(item) => item.on_activate(),
            KeyAction::KeyPress(item) => item.on_key_press(key),
        }
    }
}

// =============================================================================
// FOCUS MANAGER
// =============================================================================

/// Focus state for one scope.
///
/// Invariant: `focus_index` is `None` or indexes into `items`.
#[derive(Default)]
pub struct FocusManager {
    items: Vec<Registration>,
    frame_items: Vec<Registration>,
    focus_index: Option<usize>,
    hotkeys: HashMap<String, usize>,
    grid: FocusGrid,
    in_input: bool,
    current_row: usize,
    current_col: usize,
    frame_claimed: bool,
}

impl FocusManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedFocusManager {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Back to a freshly created manager. No callbacks fire.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focus_index
    }

    pub fn focused_id(&self) -> Option<&str> {
        self.focus_index
            .and_then(|i| self.items.get(i))
            .map(|r| r.item.id())
    }

    pub fn has_focus(&self) -> bool {
        self.focus_index.is_some()
    }

    pub fn is_focused(&self, id: &str) -> bool {
        self.focused_id() == Some(id)
    }

    /// Whether the focused item is an input, so keys go to it first.
    pub fn is_in_input(&self) -> bool {
        self.in_input
    }

    /// Ids of the items registered in the last completed frame, in order.
    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|r| r.item.id()).collect()
    }

    fn focused_item(&self) -> Option<Rc<dyn Focusable>> {
        self.focus_index
            .and_then(|i| self.items.get(i))
            .map(|r| r.item.clone())
    }

    fn position_of(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|r| r.item.id() == id)
    }

    // =========================================================================
    // FRAME LIFECYCLE
    // =========================================================================

    /// Start collecting registrations for a new frame.
    pub fn begin_frame(&mut self) {
        self.frame_items.clear();
        self.current_row = 0;
        self.current_col = 0;
        self.frame_claimed = false;
    }

    /// Register a focusable for the current frame.
    ///
    /// Disabled items are ignored. The return value tells the caller whether
    /// this item is expected to hold focus once the frame ends: it was
    /// focused last frame, or it asks for auto focus and nothing was focused.
    /// Restoration in [`FocusManager::end_frame`] has the final word.
    pub fn register<F: Focusable + 'static>(&mut self, item: F) -> bool {
        self.register_rc(Rc::new(item))
    }

    pub fn register_rc(&mut self, item: Rc<dyn Focusable>) -> bool {
        if !item.can_focus() {
            return false;
        }

        let position = match item.placement() {
            Placement::Auto => {
                let pos = GridPosition::new(self.current_row, self.current_col);
                self.current_col += 1;
                Some(pos)
            }
            Placement::At(pos) => Some(pos),
            Placement::Linear => None,
        };

        let holds = !self.frame_claimed
            && (self.focused_id() == Some(item.id())
                || (item.auto_focus() && self.focus_index.is_none()));
        if holds {
            self.frame_claimed = true;
        }

        self.frame_items.push(Registration { item, position });
        holds
    }

    /// Move the auto-placement cursor to the start of the next row.
    pub fn next_row(&mut self) {
        self.current_row += 1;
        self.current_col = 0;
    }

    /// Finish the frame: swap in its registrations, rebuild the hotkey table
    /// and the grid, then restore focus.
    ///
    /// Restoration order: the previously focused id, the previous index
    /// clamped to the new list, the first auto-focus item, the first item.
    pub fn end_frame(&mut self) {
        self.finish_frame().notify();
    }

    /// [`FocusManager::end_frame`] for a shared manager: callbacks run after
    /// the borrow is released.
    pub fn end_frame_shared(focus: &SharedFocusManager) {
        let change = focus.borrow_mut().finish_frame();
        change.notify();
    }

    /// Finish the frame and hand back the callbacks instead of running them.
    pub fn finish_frame(&mut self) -> FocusChange {
        let previous_id = self.focused_id().map(str::to_string);
        let previous_index = self.focus_index;
        let previous_item = self.focused_item();

        self.items = std::mem::take(&mut self.frame_items);
        self.current_row = 0;
        self.current_col = 0;
        self.frame_claimed = false;

        self.hotkeys.clear();
        self.grid.clear();
        for (index, registration) in self.items.iter().enumerate() {
            for hotkey in registration.item.hotkeys() {
                self.hotkeys.insert(normalize_hotkey(hotkey), index);
            }
            if let Some(pos) = registration.position {
                self.grid.insert(pos, index);
            }
        }

        let last = self.items.len().checked_sub(1);
        let restored = previous_id
            .as_deref()
            .and_then(|id| self.position_of(id))
            .or_else(|| previous_index.zip(last).map(|(i, last)| i.min(last)))
            .or_else(|| self.items.iter().position(|r| r.item.auto_focus()))
            .or(last.map(|_| 0));

        self.focus_index = restored;
        self.in_input = self.focused_item().is_some_and(|item| item.is_input());

        let current_id = self.focused_id().map(str::to_string);
        if current_id == previous_id {
            return FocusChange::default();
        }
        debug!(
            from = previous_id.as_deref().unwrap_or("-"),
            to = current_id.as_deref().unwrap_or("-"),
            items = self.items.len(),
            "focus restored to a different item"
        );
        FocusChange {
            blurred: previous_item,
            focused: self.focused_item(),
        }
    }

    // =========================================================================
    // FOCUS CHANGES
    // =========================================================================

    fn change_focus(&mut self, target: Option<usize>) -> Option<FocusChange> {
        let target = target.filter(|&i| i < self.items.len());
        if target == self.focus_index {
            return None;
        }

        let blurred = self.focused_item();
        self.focus_index = target;
        self.in_input = self.focused_item().is_some_and(|item| item.is_input());
        trace!(to = ?self.focused_id(), "focus moved");

        Some(FocusChange {
            blurred,
            focused: self.focused_item(),
        })
    }

    fn set_focus(&mut self, target: Option<usize>) -> bool {
        match self.change_focus(target) {
            Some(change) => {
                change.notify();
                true
            }
            None => false,
        }
    }

    /// Focus the item with `id`. Returns false when no such item exists.
    pub fn focus_id(&mut self, id: &str) -> bool {
        match self.position_of(id) {
            Some(index) => {
                self.set_focus(Some(index));
                true
            }
            None => false,
        }
    }

    /// Clear focus. Returns whether something was focused.
    pub fn blur(&mut self) -> bool {
        self.set_focus(None)
    }

    pub fn focus_next(&mut self) -> bool {
        self.move_focus(Direction::Next)
    }

    pub fn focus_prev(&mut self) -> bool {
        self.move_focus(Direction::Prev)
    }

    // =========================================================================
    // NAVIGATION
    // =========================================================================

    /// Move focus in `dir`. Returns whether the focused item changed.
    ///
    /// With nothing focused, forward moves land on the first item and
    /// backward moves on the last. Otherwise the grid resolves the move from
    /// the focused item's cell; items without a cell, and moves the grid
    /// cannot resolve, step through the flat list with wraparound.
    pub fn move_focus(&mut self, dir: Direction) -> bool {
        match self.step(dir) {
            Some(change) => {
                change.notify();
                true
            }
            None => false,
        }
    }

    fn step(&mut self, dir: Direction) -> Option<FocusChange> {
        let len = self.items.len();
        if len == 0 {
            return None;
        }

        let Some(current) = self.focus_index else {
            let target = if dir.is_forward() { 0 } else { len - 1 };
            return self.change_focus(Some(target));
        };

        let target = self.items[current]
            .position
            .and_then(|pos| self.grid.target(pos, dir))
            .unwrap_or_else(|| {
                let step = if dir.is_forward() { 1 } else { len - 1 };
                (current + step) % len
            });

        if target == current {
            return None;
        }
        self.change_focus(Some(target))
    }

    // =========================================================================
    // KEY HANDLING
    // =========================================================================

    /// Handle a key by name, e.g. `"down"`, `"enter"`, `"ctrl+s"`.
    pub fn handle_key(&mut self, name: &str) -> bool {
        self.handle(&Key::parse(name))
    }

    /// Route a key press. Returns whether it was handled.
    ///
    /// - Up, Down, Tab and Shift+Tab always navigate.
    /// - A focused input item gets Enter as activation and every other key
    ///   through `on_key_press`.
    /// - Otherwise Left/Right navigate, Enter/Space activate the focused
    ///   item, and anything else is looked up in the hotkey table.
    pub fn handle(&mut self, key: &Key) -> bool {
        self.route(key).run(key)
    }

    /// [`FocusManager::handle`] for a shared manager: callbacks run after the
    /// borrow is released, so they may close the portal that owns it.
    pub fn handle_shared(focus: &SharedFocusManager, key: &Key) -> bool {
        let action = focus.borrow_mut().route(key);
        action.run(key)
    }

    /// Resolve a key press, updating focus, without running any callback.
    pub fn route(&mut self, key: &Key) -> KeyAction {
        let plain = key.modifiers.is_empty();

        let navigation = match key.code {
            KeyCode::Up if plain => Some(Direction::Up),
            KeyCode::Down if plain => Some(Direction::Down),
            KeyCode::Tab if plain => Some(Direction::Next),
            KeyCode::BackTab if plain => Some(Direction::Prev),
            _ => None,
        };
        if let Some(dir) = navigation {
            return KeyAction::Moved(self.step(dir));
        }

        let focused = self.focused_item();

        if self.in_input {
            if let Some(item) = &focused {
                let item = item.clone();
                return if plain && key.code == KeyCode::Enter {
                    KeyAction::Activate(item)
                } else {
                    KeyAction::KeyPress(item)
                };
            }
        }

        match key.code {
            KeyCode::Left if plain => return KeyAction::Moved(self.step(Direction::Left)),
            KeyCode::Right if plain => return KeyAction::Moved(self.step(Direction::Right)),
            KeyCode::Enter | KeyCode::Space if plain => {
                if let Some(item) = focused {
                    return KeyAction::Activate(item);
                }
            }
            _ => {}
        }

        self.hotkey_target(key)
    }

    fn hotkey_target(&self, key: &Key) -> KeyAction {
        let name = key.hotkey_name();
        let Some(item) = self
            .hotkeys
            .get(&name)
            .and_then(|&i| self.items.get(i))
            .map(|r| r.item.clone())
        else {
            return KeyAction::Ignored;
        };
        trace!(hotkey = %name, id = item.id(), "hotkey activated");
        KeyAction::Activate(item)
    }
}

impl fmt::Debug for FocusManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusManager")
            .field("items", &self.ids())
            .field("focus_index", &self.focus_index)
            .field("in_input", &self.in_input)
            .field("frame_items", &self.frame_items.len())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
