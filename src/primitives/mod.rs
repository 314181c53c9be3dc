//! Primitives - Component capability and callback types.
//!
//! Visual primitives live outside this crate; what remains here is the
//! contract every component satisfies ([`Component`]) and the callback
//! aliases shared by hooks and focusables.

mod component;
mod types;

pub use component::{render_child, Component};
pub use types::*;
