//! Primitive types - Cleanup and callback aliases.
//!
//! These types define the interface between components, hooks and the
//! focus system.

use std::rc::Rc;

use crate::state::keyboard::Key;

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by effects.
///
/// Runs before the effect runs again and when its context is disposed.
pub type Cleanup = Box<dyn FnOnce()>;

/// Anything an effect may return.
///
/// `()` means "no cleanup"; a boxed closure or `Option<Cleanup>` registers one.
pub trait IntoCleanup {
    fn into_cleanup(self) -> Option<Cleanup>;
}

impl IntoCleanup for () {
    fn into_cleanup(self) -> Option<Cleanup> {
        None
    }
}

impl IntoCleanup for Cleanup {
    fn into_cleanup(self) -> Option<Cleanup> {
        Some(self)
    }
}

impl IntoCleanup for Option<Cleanup> {
    fn into_cleanup(self) -> Option<Cleanup> {
        self
    }
}

// =============================================================================
// Callback Types
// =============================================================================

/// Focus callback (called when a focusable gains focus).
pub type FocusCallback = Rc<dyn Fn()>;

/// Blur callback (called when a focusable loses focus).
pub type BlurCallback = Rc<dyn Fn()>;

/// Activation callback (Enter/Space/hotkey). Return true if handled.
pub type ActivateCallback = Rc<dyn Fn() -> bool>;

/// Key callback for input-type focusables.
///
/// Return true to indicate the key was consumed.
pub type KeyCallback = Rc<dyn Fn(&Key) -> bool>;

/// Memoized callback handed out by `use_callback`.
pub type Callback<A = (), R = ()> = Rc<dyn Fn(A) -> R>;
