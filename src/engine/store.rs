//! Hook Store - Keyed storage for hook slots.
//!
//! Hook slots live in a flat map keyed by `path#key` (see the context
//! module for how keys are derived). The map sits behind the [`HookStore`]
//! trait so a collaborator, for example a screen stack, can own it and swap
//! it in and out of a context without losing state.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::deps::Deps;
use crate::primitives::Cleanup;

// =============================================================================
// Hook Slot
// =============================================================================

/// One hook slot.
///
/// `value` is opaque here; its concrete type is fixed by the typed handle
/// that created it. Reading with any other type yields nothing and leaves
/// the slot untouched.
#[derive(Default)]
pub struct HookState {
    pub value: Option<Box<dyn Any>>,
    pub deps: Option<Deps>,
    pub cleanup: Option<Cleanup>,
    pub initialized: bool,
}

impl HookState {
    /// An initialized slot holding `value`.
    pub fn with_value<T: 'static>(value: T) -> Self {
        Self {
            value: Some(Box::new(value)),
            deps: None,
            cleanup: None,
            initialized: true,
        }
    }

    /// Borrow the value if it has type `T`.
    pub fn value<T: 'static>(&self) -> Option<&T> {
        self.value.as_ref().and_then(|v| v.downcast_ref::<T>())
    }

    /// Whether the slot currently holds a `T`.
    pub fn holds<T: 'static>(&self) -> bool {
        self.value::<T>().is_some()
    }

    /// Overwrite the value in place and mark the slot initialized.
    pub fn set_value<T: 'static>(&mut self, value: T) {
        self.value = Some(Box::new(value));
        self.initialized = true;
    }
}

impl fmt::Debug for HookState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookState")
            .field("has_value", &self.value.is_some())
            .field("deps", &self.deps)
            .field("has_cleanup", &self.cleanup.is_some())
            .field("initialized", &self.initialized)
            .finish()
    }
}

// =============================================================================
// Store Capability
// =============================================================================

/// Storage backing a context's hooks.
pub trait HookStore {
    fn get_hook(&self, key: &str) -> Option<&HookState>;

    fn get_hook_mut(&mut self, key: &str) -> Option<&mut HookState>;

    fn set_hook(&mut self, key: String, state: HookState);

    fn remove_hook(&mut self, key: &str) -> Option<HookState>;

    fn hook_keys(&self) -> Vec<String>;
}

/// Shared handle to a hook store. Single-threaded, like the render pass.
pub type SharedHookStore = Rc<RefCell<dyn HookStore>>;

/// Default in-memory store.
#[derive(Debug, Default)]
pub struct MapHookStore {
    hooks: HashMap<String, HookState>,
}

impl MapHookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl HookStore for MapHookStore {
    fn get_hook(&self, key: &str) -> Option<&HookState> {
        self.hooks.get(key)
    }

    fn get_hook_mut(&mut self, key: &str) -> Option<&mut HookState> {
        self.hooks.get_mut(key)
    }

    fn set_hook(&mut self, key: String, state: HookState) {
        self.hooks.insert(key, state);
    }

    fn remove_hook(&mut self, key: &str) -> Option<HookState> {
        self.hooks.remove(key)
    }

    fn hook_keys(&self) -> Vec<String> {
        self.hooks.keys().cloned().collect()
    }
}

/// Create a fresh, empty shared store.
pub fn shared_store() -> SharedHookStore {
    Rc::new(RefCell::new(MapHookStore::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_roundtrip_by_type() {
        let slot = HookState::with_value(42_i32);
        assert_eq!(slot.value::<i32>(), Some(&42));
        assert!(slot.holds::<i32>());
        assert!(slot.initialized);
    }

    #[test]
    fn test_mismatched_type_reads_nothing() {
        let slot = HookState::with_value(String::from("hello"));
        assert_eq!(slot.value::<i32>(), None);
        assert_eq!(slot.value::<String>().map(String::as_str), Some("hello"));
    }

    #[test]
    fn test_map_store_set_get_remove() {
        let mut store = MapHookStore::new();
        store.set_hook("root#0".into(), HookState::with_value(1_u8));
        store.set_hook("root#1".into(), HookState::with_value(2_u8));
        assert_eq!(store.len(), 2);

        if let Some(slot) = store.get_hook_mut("root#0") {
            slot.set_value(10_u8);
        }
        assert_eq!(store.get_hook("root#0").and_then(|s| s.value::<u8>()), Some(&10));

        assert!(store.remove_hook("root#1").is_some());
        assert!(store.get_hook("root#1").is_none());
        assert_eq!(store.hook_keys(), vec!["root#0".to_string()]);
    }
}
