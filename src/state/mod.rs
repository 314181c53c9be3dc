//! State Module - Runtime state management systems
//!
//! This module contains the state systems that power TUI interactivity:
//!
//! - **Focus** - Frame-based registration, restoration, spatial navigation
//! - **Focusable** - The focus target capability and its closure builder
//! - **Grid** - Sparse row/column lookup behind spatial navigation
//! - **Keyboard** - Canonical key model and hotkey normalization
//! - **Input** - crossterm event conversion
//! - **Portal** - Layered overlays with isolated focus
//! - **Screens** - Swappable hook stores for screen navigation

pub mod focus;
pub mod focusable;
pub mod grid;
pub mod input;
pub mod keyboard;
pub mod portal;
pub mod screens;

pub use focus::{FocusChange, FocusManager, KeyAction, SharedFocusManager};
pub use focusable::{FocusItem, Focusable, Placement};
pub use grid::FocusGrid;
pub use input::{convert_event, convert_key_event, InputEvent};
pub use keyboard::{normalize_hotkey, Key, KeyCode, Modifiers};
pub use portal::{Portal, PortalFrame, PortalManager, SharedPortalManager};
pub use screens::{Screen, ScreenStack};
