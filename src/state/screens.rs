//! Screen Stack - Swappable hook stores for whole-screen navigation.
//!
//! Each screen owns a hook store. Pushing a screen attaches a fresh store to
//! the root context; popping disposes the top screen's hooks (running effect
//! cleanups) and re-attaches the store of the screen below, whose state is
//! exactly as it was left.
//!
//! ```ignore
//! let mut screens = ScreenStack::new();
//! screens.push("inbox", &root);
//! // ... render the inbox ...
//! screens.push("message", &root);
//! // ... render the message view ...
//! screens.pop(&root); // back to the inbox, state intact
//! ```

use std::fmt;

use tracing::debug;

use crate::engine::{shared_store, Context, SharedHookStore};

pub struct Screen {
    name: String,
    hooks: SharedHookStore,
}

impl Screen {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hooks(&self) -> SharedHookStore {
        self.hooks.clone()
    }
}

impl fmt::Debug for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Screen").field("name", &self.name).finish()
    }
}

#[derive(Debug, Default)]
pub struct ScreenStack {
    screens: Vec<Screen>,
}

impl ScreenStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `name` with an empty hook store and attach it to `ctx`.
    pub fn push(&mut self, name: impl Into<String>, ctx: &Context) {
        let name = name.into();
        let hooks = shared_store();
        ctx.set_hook_store(hooks.clone());
        debug!(screen = %name, depth = self.screens.len() + 1, "screen pushed");
        self.screens.push(Screen { name, hooks });
    }

    /// Pop the top screen and restore the one below it.
    ///
    /// The bottom screen is never popped: with one screen or none this does
    /// nothing and returns `None`.
    pub fn pop(&mut self, ctx: &Context) -> Option<Screen> {
        if self.screens.len() <= 1 {
            return None;
        }
        let popped = self.screens.pop()?;
        ctx.dispose();
        if let Some(top) = self.screens.last() {
            ctx.set_hook_store(top.hooks.clone());
        }
        debug!(screen = %popped.name, depth = self.screens.len(), "screen popped");
        Some(popped)
    }

    pub fn current(&self) -> Option<&str> {
        self.screens.last().map(|s| s.name.as_str())
    }

    pub fn names(&self) -> Vec<&str> {
        self.screens.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }
}
