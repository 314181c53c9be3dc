//! Render Pipeline
//!
//! This module connects state changes to the host's render loop.
//!
//! # Pipeline Architecture
//!
//! ```text
//! StateHandle::set → RenderScheduler::request → Debouncer (timer thread)
//!                  → RenderRequest over mpsc → host loop → MountHandle::render
//! ```
//!
//! ## Key Design Principles
//!
//! - **Single render thread**: contexts, hooks and focus live on the host's
//!   thread; the timer thread only ever sends a unit message
//! - **Trailing-edge debounce**: a burst of state changes yields one render
//! - **Host-driven**: the runtime never renders on its own; the host decides
//!   when to call `render`

pub mod debounce;
pub mod mount;
pub mod scheduler;

// Re-exports
pub use debounce::Debouncer;
pub use mount::{mount, unmount, MountHandle, ROOT_ID};
pub use scheduler::{RenderRequest, RenderScheduler};
