//! Typed hook handles.
//!
//! The store holds untyped slots; these handles pin the type at the call
//! site that created them, so every read and write through a handle is
//! checked by the compiler.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use super::store::{HookState, SharedHookStore};
use crate::pipeline::RenderScheduler;

// =============================================================================
// State Handle
// =============================================================================

/// Handle returned by `use_state`.
///
/// Reads go to the slot on every call, so a handle captured in a callback
/// always sees the latest value. Writes overwrite the slot in place, mark the
/// owning node dirty and request a render.
pub struct StateHandle<T> {
    store: SharedHookStore,
    key: String,
    dirty: Rc<Cell<bool>>,
    scheduler: Option<RenderScheduler>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StateHandle<T> {
    pub(crate) fn new(
        store: SharedHookStore,
        key: String,
        dirty: Rc<Cell<bool>>,
        scheduler: Option<RenderScheduler>,
    ) -> Self {
        Self {
            store,
            key,
            dirty,
            scheduler,
            _marker: PhantomData,
        }
    }

    /// The full hook key (`path#key`).
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<T: Clone + Default + 'static> StateHandle<T> {
    /// Current value, or `T::default()` if the slot is missing or holds
    /// another type.
    pub fn get(&self) -> T {
        let store = self.store.borrow();
        store
            .get_hook(&self.key)
            .and_then(|slot| slot.value::<T>())
            .cloned()
            .unwrap_or_default()
    }

    pub fn set(&self, value: T) {
        {
            let mut store = self.store.borrow_mut();
            match store.get_hook_mut(&self.key) {
                Some(slot) => slot.set_value(value),
                None => store.set_hook(self.key.clone(), HookState::with_value(value)),
            }
        }
        self.dirty.set(true);
        if let Some(scheduler) = &self.scheduler {
            scheduler.request();
        }
    }

    /// Read-modify-write.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut value = self.get();
        f(&mut value);
        self.set(value);
    }
}

impl<T> Clone for StateHandle<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            key: self.key.clone(),
            dirty: self.dirty.clone(),
            scheduler: self.scheduler.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for StateHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateHandle").field("key", &self.key).finish()
    }
}

// =============================================================================
// Ref Handle
// =============================================================================

/// Handle returned by `use_ref`: a stable mutable cell.
///
/// Mutating it never marks anything dirty and never requests a render.
pub struct RefHandle<T> {
    cell: Rc<RefCell<T>>,
}

impl<T> RefHandle<T> {
    pub(crate) fn new(cell: Rc<RefCell<T>>) -> Self {
        Self { cell }
    }

    pub fn borrow(&self) -> Ref<'_, T> {
        self.cell.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.cell.borrow_mut()
    }

    pub fn set(&self, value: T) {
        *self.cell.borrow_mut() = value;
    }

    /// Whether two handles point at the same slot.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<T: Clone> RefHandle<T> {
    pub fn get(&self) -> T {
        self.cell.borrow().clone()
    }
}

impl<T> Clone for RefHandle<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for RefHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefHandle").field(&self.cell.borrow()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::store::shared_store;

    #[test]
    fn test_state_handle_get_set() {
        let store = shared_store();
        let dirty = Rc::new(Cell::new(false));
        let handle: StateHandle<i32> =
            StateHandle::new(store.clone(), "root#0".into(), dirty.clone(), None);

        assert_eq!(handle.get(), 0);
        handle.set(5);
        assert_eq!(handle.get(), 5);
        assert!(dirty.get());

        handle.update(|v| *v += 1);
        assert_eq!(handle.get(), 6);
    }

    #[test]
    fn test_state_handle_mismatched_type_is_zero_value() {
        let store = shared_store();
        store
            .borrow_mut()
            .set_hook("root#0".into(), HookState::with_value(String::from("text")));

        let handle: StateHandle<u32> =
            StateHandle::new(store.clone(), "root#0".into(), Rc::new(Cell::new(false)), None);
        assert_eq!(handle.get(), 0);

        let other: StateHandle<String> =
            StateHandle::new(store, "root#0".into(), Rc::new(Cell::new(false)), None);
        assert_eq!(other.get(), "text");
    }

    #[test]
    fn test_ref_handle_shares_cell() {
        let handle = RefHandle::new(Rc::new(RefCell::new(vec![1])));
        let alias = handle.clone();
        alias.borrow_mut().push(2);
        assert_eq!(handle.get(), vec![1, 2]);
        assert!(handle.ptr_eq(&alias));
    }
}
