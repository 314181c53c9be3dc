//! # spark-hooks
//!
//! Hook-based component runtime for terminal UIs.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for the
//! reactive screen size and on crossterm for key events.
//!
//! ## Architecture
//!
//! Components are plain functions of a [`Context`]. A context is one node of
//! the render tree; hooks called on it (`use_state`, `use_effect`,
//! `use_memo`, `use_ref`, `use_callback`) keep their state across renders in a
//! store keyed by the node's path. Focusables register with the context's
//! focus manager while rendering; when the frame ends the manager restores
//! focus and answers key presses with spatial navigation, hotkeys and input
//! routing. Portals render above the tree, each with its own focus manager.
//!
//! ```text
//! host loop ── render ──► Context::begin_render
//!                         component(ctx)      hooks, register(focusable)
//!                         Context::end_render focus restored
//!                         render_portals      overlays, isolated focus
//!
//! StateHandle::set ──► RenderScheduler (debounced) ──► RenderRequest ──► host loop
//! ```
//!
//! ## Modules
//!
//! - [`engine`] - Context tree, hook store, dependency lists, typed handles
//! - [`state`] - Focus manager, focusables, keyboard, portals, screen stack
//! - [`pipeline`] - Debouncer, render scheduler, mount handle
//! - [`primitives`] - Component capability, cleanup and callback types
//! - [`config`] - Runtime configuration (TOML)
//! - [`error`] - Error types
//! - [`types`] - Grid positions, directions, layers

pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod primitives;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::RuntimeConfig;
pub use error::{ConfigError, RuntimeError};

pub use engine::{
    shared_store, Context, DepValue, Deps, HookState, HookStore, MapHookStore, RefHandle,
    SharedHookStore, StateHandle,
};

pub use pipeline::{mount, unmount, Debouncer, MountHandle, RenderRequest, RenderScheduler};

pub use primitives::{render_child, Callback, Cleanup, Component, IntoCleanup};

pub use state::{
    // Focus
    FocusGrid, FocusItem, FocusManager, Focusable, Placement, SharedFocusManager,
    // Keyboard
    convert_event, convert_key_event, normalize_hotkey, InputEvent, Key, KeyCode, Modifiers,
    // Portals
    Portal, PortalManager, SharedPortalManager,
    // Screens
    Screen, ScreenStack,
};
