//! Hook Engine - Render-tree nodes and their hook storage.
//!
//! - Context: one node of the render tree (path, children, hook cursor,
//!   focus manager, screen size)
//! - Store: keyed hook slots behind the `HookStore` trait
//! - Deps: dependency lists gating effects and memos
//! - Hooks: typed handles returned by `use_state` and `use_ref`
//!
//! # Architecture
//!
//! Hook state is NOT stored in the node. Every slot lives in a flat store
//! keyed by the node path:
//!
//! ```text
//! app#0                 use_state in the root
//! app#theme             use_state_keyed("theme", ..) in the root
//! app.sidebar#0         use_state in child "sidebar"
//! app.sidebar.row-3#0   use_state in grandchild "row-3"
//! ```
//!
//! A node without its own store reads from its parent's, so a whole tree
//! normally shares one store and a screen swap only replaces it at the root.

mod context;
mod deps;
mod hooks;
mod store;

pub use context::Context;
pub use deps::{DepValue, Deps};
pub use hooks::{RefHandle, StateHandle};
pub use store::{shared_store, HookState, HookStore, MapHookStore, SharedHookStore};
