//! Context - One node of the render tree.
//!
//! A [`Context`] is a cheap, clonable handle to a node. Each node has:
//! - a dotted `path` from the root, used to derive hook keys
//! - a non-owning parent link, used to find the hook store when the node
//!   has none of its own
//! - an owned map of keyed children, memoized across renders
//! - a hook cursor for positional hooks
//! - the focus manager it shares with the children it creates
//! - the screen size, held in signals
//!
//! # Hook keys
//!
//! `use_state_keyed("open", ..)` on node `app.sidebar` stores its slot under
//! `app.sidebar#open`. Unkeyed hooks use the call position instead
//! (`app.sidebar#0`, `app.sidebar#1`, ...), counted over every hook call on
//! the node, keyed ones included. Positional keys are only stable when the
//! same hooks run in the same order on every render; anything inside a
//! condition or a loop must use a keyed hook, and a positional hook must not
//! follow one. A change in the number of hook calls between renders is
//! logged as a warning.
//!
//! # Example
//!
//! ```ignore
//! let ctx = Context::new("app");
//!
//! ctx.begin_render();
//! let count = ctx.use_state(0);
//! let row = ctx.with_key("row-3");
//! let expanded = row.use_state_keyed("expanded", false);
//! ctx.end_render();
//!
//! count.set(count.get() + 1); // survives the next render
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use spark_signals::{signal, Signal};
use tracing::{trace, warn};

use super::deps::Deps;
use super::hooks::{RefHandle, StateHandle};
use super::store::{shared_store, HookState, SharedHookStore};
use crate::config::RuntimeConfig;
use crate::pipeline::RenderScheduler;
use crate::primitives::{Callback, Cleanup, IntoCleanup};
use crate::state::focus::{FocusManager, SharedFocusManager};
use crate::state::focusable::Focusable;
use crate::state::portal::{self, PortalManager, SharedPortalManager};

// =============================================================================
// Context Node
// =============================================================================

struct ContextNode {
    id: String,
    path: String,
    parent: Weak<ContextNode>,
    children: RefCell<HashMap<String, Context>>,

    hook_index: Cell<usize>,
    previous_hook_count: Cell<Option<usize>>,
    primed: Cell<bool>,
    hooks: RefCell<Option<SharedHookStore>>,

    focus: SharedFocusManager,
    portals: SharedPortalManager,
    scheduler: Option<RenderScheduler>,

    width: Signal<u16>,
    height: Signal<u16>,
    default_size: (u16, u16),

    needs_render: Rc<Cell<bool>>,
    render_count: Cell<u64>,
}

/// Handle to a render-tree node.
#[derive(Clone)]
pub struct Context {
    node: Rc<ContextNode>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("path", &self.node.path)
            .field("children", &self.node.children.borrow().len())
            .field("render_count", &self.node.render_count.get())
            .finish()
    }
}

impl Context {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Root context with default configuration and no render scheduler.
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_config(id, &RuntimeConfig::default(), None)
    }

    /// Root context sized from `config`; state changes are forwarded to
    /// `scheduler` when one is given.
    pub fn with_config(
        id: impl Into<String>,
        config: &RuntimeConfig,
        scheduler: Option<RenderScheduler>,
    ) -> Self {
        let id = id.into();
        let default_size = (config.default_width.max(1), config.default_height);
        Self {
            node: Rc::new(ContextNode {
                path: id.clone(),
                id,
                parent: Weak::new(),
                children: RefCell::new(HashMap::new()),
                hook_index: Cell::new(0),
                previous_hook_count: Cell::new(None),
                primed: Cell::new(false),
                hooks: RefCell::new(Some(shared_store())),
                focus: FocusManager::shared(),
                portals: PortalManager::shared(),
                scheduler,
                width: signal(default_size.0),
                height: signal(default_size.1),
                default_size,
                needs_render: Rc::new(Cell::new(true)),
                render_count: Cell::new(0),
            }),
        }
    }

    fn child(&self, key: &str, focus: SharedFocusManager) -> Self {
        let (width, height) = self.screen_size();
        Self {
            node: Rc::new(ContextNode {
                id: key.to_string(),
                path: format!("{}.{}", self.node.path, key),
                parent: Rc::downgrade(&self.node),
                children: RefCell::new(HashMap::new()),
                hook_index: Cell::new(0),
                previous_hook_count: Cell::new(None),
                primed: Cell::new(true),
                hooks: RefCell::new(None),
                focus,
                portals: self.node.portals.clone(),
                scheduler: self.node.scheduler.clone(),
                width: signal(width),
                height: signal(height),
                default_size: self.node.default_size,
                needs_render: Rc::new(Cell::new(true)),
                render_count: Cell::new(0),
            }),
        }
    }

    /// Child context for `key`, created on first use and reused afterwards.
    ///
    /// The child shares this node's focus manager. Its hook cursor is reset
    /// on reuse, so its hooks line up with the previous render.
    pub fn with_key(&self, key: &str) -> Context {
        let existing = self.node.children.borrow().get(key).cloned();
        match existing {
            Some(child) => {
                child.rewind();
                child
            }
            None => {
                let child = self.child(key, self.node.focus.clone());
                self.node
                    .children
                    .borrow_mut()
                    .insert(key.to_string(), child.clone());
                child
            }
        }
    }

    /// Child context bound to its own focus manager.
    ///
    /// This is the focus isolation boundary used for portals: registrations
    /// made under the returned context never reach this node's focus manager.
    pub fn with_focus_scope(&self, key: &str, focus: SharedFocusManager) -> Context {
        let existing = self.node.children.borrow().get(key).cloned();
        if let Some(child) = existing {
            if Rc::ptr_eq(&child.node.focus, &focus) {
                child.rewind();
                return child;
            }
        }
        let child = self.child(key, focus);
        self.node
            .children
            .borrow_mut()
            .insert(key.to_string(), child.clone());
        child
    }

    // =========================================================================
    // Identity
    // =========================================================================

    pub fn id(&self) -> &str {
        &self.node.id
    }

    pub fn path(&self) -> &str {
        &self.node.path
    }

    pub fn parent(&self) -> Option<Context> {
        self.node.parent.upgrade().map(|node| Context { node })
    }

    pub fn child_count(&self) -> usize {
        self.node.children.borrow().len()
    }

    /// Whether two handles refer to the same node.
    pub fn ptr_eq(&self, other: &Context) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    // =========================================================================
    // Render Lifecycle
    // =========================================================================

    /// Start a render pass on this node.
    ///
    /// Resets the hook cursor, bumps the render counter, clears the
    /// needs-render flag and opens a new focus frame. Call this on the root
    /// of a focus scope only: children created with [`Context::with_key`]
    /// share the focus frame of their parent.
    pub fn begin_render(&self) {
        self.rewind();
        self.node.render_count.set(self.node.render_count.get() + 1);
        self.node.needs_render.set(false);
        self.node.focus.borrow_mut().begin_frame();
    }

    /// Finish the render pass: finalizes this frame's focus registrations.
    pub fn end_render(&self) {
        FocusManager::end_frame_shared(&self.node.focus);
    }

    pub fn render_count(&self) -> u64 {
        self.node.render_count.get()
    }

    pub fn needs_render(&self) -> bool {
        self.node.needs_render.get()
    }

    /// Mark this node dirty and ask the host for a (debounced) render.
    pub fn request_render(&self) {
        self.node.needs_render.set(true);
        if let Some(scheduler) = &self.node.scheduler {
            scheduler.request();
        }
    }

    pub fn scheduler(&self) -> Option<&RenderScheduler> {
        self.node.scheduler.as_ref()
    }

    fn rewind(&self) {
        let used = self.node.hook_index.replace(0);
        if !self.node.primed.replace(true) {
            return;
        }
        if let Some(previous) = self.node.previous_hook_count.get() {
            if previous != used {
                warn!(
                    path = %self.node.path,
                    previous,
                    used,
                    "hook count changed between renders; use keyed hooks inside conditions and loops"
                );
            }
        }
        self.node.previous_hook_count.set(Some(used));
    }

    // =========================================================================
    // Hook Storage
    // =========================================================================

    /// The store this node's hooks live in: its own if attached, otherwise
    /// the nearest ancestor's.
    pub fn hook_store(&self) -> SharedHookStore {
        if let Some(store) = self.node.hooks.borrow().as_ref() {
            return store.clone();
        }
        if let Some(parent) = self.parent() {
            return parent.hook_store();
        }
        let store = shared_store();
        *self.node.hooks.borrow_mut() = Some(store.clone());
        store
    }

    /// Attach a collaborator-owned store, returning the previous one.
    pub fn set_hook_store(&self, store: SharedHookStore) -> Option<SharedHookStore> {
        self.node.hooks.borrow_mut().replace(store)
    }

    /// Every hook call advances the cursor, keyed or not.
    fn hook_key(&self, key: Option<&str>) -> String {
        let index = self.node.hook_index.get();
        self.node.hook_index.set(index + 1);
        match key {
            Some(key) => format!("{}#{}", self.node.path, key),
            None => format!("{}#{}", self.node.path, index),
        }
    }

    // =========================================================================
    // State Hook
    // =========================================================================

    /// Positional state hook. See the module docs for the ordering rule.
    pub fn use_state<T: Clone + Default + 'static>(&self, initial: T) -> StateHandle<T> {
        let key = self.hook_key(None);
        self.state_at(key, initial)
    }

    /// Keyed state hook; safe inside conditions and loops.
    pub fn use_state_keyed<T: Clone + Default + 'static>(
        &self,
        key: &str,
        initial: T,
    ) -> StateHandle<T> {
        let key = self.hook_key(Some(key));
        self.state_at(key, initial)
    }

    fn state_at<T: Clone + Default + 'static>(&self, key: String, initial: T) -> StateHandle<T> {
        let store = self.hook_store();
        {
            let mut hooks = store.borrow_mut();
            match hooks.get_hook_mut(&key) {
                Some(slot) if slot.initialized => {
                    if !slot.holds::<T>() {
                        trace!(key = %key, "state hook read with a different type than it was created with");
                    }
                }
                Some(slot) => slot.set_value(initial),
                None => hooks.set_hook(key.clone(), HookState::with_value(initial)),
            }
        }
        StateHandle::new(
            store,
            key,
            self.node.needs_render.clone(),
            self.node.scheduler.clone(),
        )
    }

    // =========================================================================
    // Effect Hook
    // =========================================================================

    /// Run `effect` on first render, on every render when `deps` is empty, or
    /// when any dependency differs from the previous run.
    ///
    /// The effect may return a cleanup (see [`IntoCleanup`]); it runs before
    /// the effect runs again and when the node is disposed.
    pub fn use_effect<F, R>(&self, effect: F, deps: Deps)
    where
        F: FnOnce() -> R,
        R: IntoCleanup,
    {
        let key = self.hook_key(None);
        self.effect_at(key, effect, deps);
    }

    pub fn use_effect_keyed<F, R>(&self, key: &str, effect: F, deps: Deps)
    where
        F: FnOnce() -> R,
        R: IntoCleanup,
    {
        let key = self.hook_key(Some(key));
        self.effect_at(key, effect, deps);
    }

    fn effect_at<F, R>(&self, key: String, effect: F, deps: Deps)
    where
        F: FnOnce() -> R,
        R: IntoCleanup,
    {
        let store = self.hook_store();
        let previous_cleanup = {
            let mut hooks = store.borrow_mut();
            let changed = match hooks.get_hook(&key) {
                Some(slot) if slot.initialized => deps.changed_from(slot.deps.as_ref()),
                _ => true,
            };
            if !changed {
                return;
            }
            hooks.get_hook_mut(&key).and_then(|slot| slot.cleanup.take())
        };

        // The store is not borrowed while user code runs: effects and
        // cleanups are free to set state.
        if let Some(cleanup) = previous_cleanup {
            cleanup();
        }
        let cleanup = effect().into_cleanup();

        let mut hooks = store.borrow_mut();
        let mut slot = hooks.remove_hook(&key).unwrap_or_default();
        slot.deps = Some(deps);
        slot.cleanup = cleanup;
        slot.initialized = true;
        hooks.set_hook(key, slot);
    }

    // =========================================================================
    // Memo Hook
    // =========================================================================

    /// Cache `compute()` until a dependency changes.
    pub fn use_memo<T, F>(&self, compute: F, deps: Deps) -> T
    where
        T: Clone + 'static,
        F: FnOnce() -> T,
    {
        let key = self.hook_key(None);
        self.memo_at(key, compute, deps)
    }

    pub fn use_memo_keyed<T, F>(&self, key: &str, compute: F, deps: Deps) -> T
    where
        T: Clone + 'static,
        F: FnOnce() -> T,
    {
        let key = self.hook_key(Some(key));
        self.memo_at(key, compute, deps)
    }

    fn memo_at<T, F>(&self, key: String, compute: F, deps: Deps) -> T
    where
        T: Clone + 'static,
        F: FnOnce() -> T,
    {
        let store = self.hook_store();
        {
            let hooks = store.borrow();
            if let Some(slot) = hooks.get_hook(&key) {
                if slot.initialized && !deps.changed_from(slot.deps.as_ref()) {
                    if let Some(cached) = slot.value::<T>() {
                        return cached.clone();
                    }
                }
            }
        }

        let value = compute();

        let mut hooks = store.borrow_mut();
        let mut slot = hooks.remove_hook(&key).unwrap_or_default();
        slot.set_value(value.clone());
        slot.deps = Some(deps);
        hooks.set_hook(key, slot);
        value
    }

    // =========================================================================
    // Callback Hook
    // =========================================================================

    /// Memoized callback: the same `Rc` is returned until a dependency
    /// changes, so it can itself be used as a dependency or compared with
    /// `Rc::ptr_eq`.
    pub fn use_callback<A, R, F>(&self, callback: F, deps: Deps) -> Callback<A, R>
    where
        A: 'static,
        R: 'static,
        F: Fn(A) -> R + 'static,
    {
        let key = self.hook_key(None);
        self.memo_at(key, move || Rc::new(callback) as Callback<A, R>, deps)
    }

    pub fn use_callback_keyed<A, R, F>(&self, key: &str, callback: F, deps: Deps) -> Callback<A, R>
    where
        A: 'static,
        R: 'static,
        F: Fn(A) -> R + 'static,
    {
        let key = self.hook_key(Some(key));
        self.memo_at(key, move || Rc::new(callback) as Callback<A, R>, deps)
    }

    // =========================================================================
    // Ref Hook
    // =========================================================================

    /// A mutable cell that survives renders without triggering any.
    pub fn use_ref<T: 'static>(&self, initial: T) -> RefHandle<T> {
        let key = self.hook_key(None);
        self.ref_at(key, initial)
    }

    pub fn use_ref_keyed<T: 'static>(&self, key: &str, initial: T) -> RefHandle<T> {
        let key = self.hook_key(Some(key));
        self.ref_at(key, initial)
    }

    fn ref_at<T: 'static>(&self, key: String, initial: T) -> RefHandle<T> {
        let store = self.hook_store();
        let mut hooks = store.borrow_mut();
        if let Some(slot) = hooks.get_hook(&key) {
            if let Some(cell) = slot.value::<Rc<RefCell<T>>>() {
                return RefHandle::new(cell.clone());
            }
            if slot.initialized {
                // Slot belongs to another type: hand out a detached cell and
                // leave the slot alone.
                trace!(key = %key, "ref hook read with a different type than it was created with");
                return RefHandle::new(Rc::new(RefCell::new(initial)));
            }
        }
        let cell = Rc::new(RefCell::new(initial));
        hooks.set_hook(key, HookState::with_value(cell.clone()));
        RefHandle::new(cell)
    }

    // =========================================================================
    // Disposal
    // =========================================================================

    /// Drop every hook slot under this node (and its children), running
    /// effect cleanups, and forget the children.
    pub fn dispose(&self) {
        let children: Vec<Context> = self
            .node
            .children
            .borrow_mut()
            .drain()
            .map(|(_, child)| child)
            .collect();
        for child in &children {
            child.dispose();
        }

        let store = self.hook_store();
        let own = format!("{}#", self.node.path);
        let nested = format!("{}.", self.node.path);
        let cleanups: Vec<Cleanup> = {
            let mut hooks = store.borrow_mut();
            let keys: Vec<String> = hooks
                .hook_keys()
                .into_iter()
                .filter(|k| k.starts_with(&own) || k.starts_with(&nested))
                .collect();
            keys.iter()
                .filter_map(|k| hooks.remove_hook(k))
                .filter_map(|slot| slot.cleanup)
                .collect()
        };
        for cleanup in cleanups {
            cleanup();
        }

        self.node.hook_index.set(0);
        self.node.previous_hook_count.set(None);
        self.node.primed.set(false);
    }

    /// Dispose and forget the child at `key`. Returns whether it existed.
    pub fn remove_child(&self, key: &str) -> bool {
        let removed = self.node.children.borrow_mut().remove(key);
        match removed {
            Some(child) => {
                child.dispose();
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Screen Size
    // =========================================================================

    pub fn screen_size(&self) -> (u16, u16) {
        (self.node.width.get(), self.node.height.get())
    }

    /// Set the screen size on this node and every descendant.
    ///
    /// A non-positive width or a negative height is replaced by the
    /// configured default; values above `u16::MAX` saturate.
    pub fn set_screen_size(&self, width: i32, height: i32) {
        let (default_width, default_height) = self.node.default_size;
        let width = if width <= 0 {
            default_width
        } else {
            u16::try_from(width).unwrap_or(u16::MAX)
        };
        let height = if height < 0 {
            default_height
        } else {
            u16::try_from(height).unwrap_or(u16::MAX)
        };
        self.apply_screen_size(width, height);
    }

    fn apply_screen_size(&self, width: u16, height: u16) {
        self.node.width.set(width);
        self.node.height.set(height);
        for child in self.node.children.borrow().values() {
            child.apply_screen_size(width, height);
        }
    }

    /// Reactive width/height signals for this node.
    pub fn screen_signals(&self) -> (Signal<u16>, Signal<u16>) {
        (self.node.width.clone(), self.node.height.clone())
    }

    // =========================================================================
    // Focus & Portals
    // =========================================================================

    pub fn focus(&self) -> SharedFocusManager {
        self.node.focus.clone()
    }

    /// Register a focusable with this node's focus manager.
    pub fn register<F: Focusable + 'static>(&self, item: F) -> bool {
        self.node.focus.borrow_mut().register(item)
    }

    /// Start a new row in the focus grid.
    pub fn next_row(&self) {
        self.node.focus.borrow_mut().next_row();
    }

    pub fn portals(&self) -> SharedPortalManager {
        self.node.portals.clone()
    }

    /// Render every open portal above this node, each in its own focus scope.
    ///
    /// Portals removed since the last pass are disposed first.
    pub fn render_portals(&self) -> String {
        self.prune_portals();
        let frames = self.node.portals.borrow().frames();
        portal::render_frames(&frames, self)
    }

    /// Delete portal `id` and dispose the hooks it rendered under this node,
    /// running their cleanups. Returns whether the portal existed.
    pub fn remove_portal(&self, id: &str) -> bool {
        let removed = self.node.portals.borrow_mut().remove(id);
        self.prune_portals();
        removed
    }

    fn prune_portals(&self) {
        let removed = self.node.portals.borrow_mut().take_removed();
        for id in removed {
            self.remove_child(&portal::scope_key(&id));
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deps;
    use crate::state::focusable::FocusItem;

    fn render<R>(ctx: &Context, body: impl FnOnce(&Context) -> R) -> R {
        ctx.begin_render();
        let out = body(ctx);
        ctx.end_render();
        out
    }

    #[test]
    fn test_state_survives_rerender() {
        let ctx = Context::new("root");

        let first = render(&ctx, |ctx| ctx.use_state(10));
        assert_eq!(first.get(), 10);
        first.set(11);

        let second = render(&ctx, |ctx| ctx.use_state(10));
        assert_eq!(second.get(), 11);
    }

    #[test]
    fn test_keyed_state_identity() {
        let ctx = Context::new("root");

        let handle = render(&ctx, |ctx| ctx.use_state_keyed("name", String::from("v0")));
        assert_eq!(handle.key(), "root#name");
        handle.set("v1".into());

        let again = render(&ctx, |ctx| ctx.use_state_keyed("name", String::from("v0")));
        assert_eq!(again.get(), "v1");
    }

    #[test]
    fn test_positional_keys_follow_call_order() {
        let ctx = Context::new("root");
        let (a, b) = render(&ctx, |ctx| (ctx.use_state(1), ctx.use_state(2)));
        assert_eq!(a.key(), "root#0");
        assert_eq!(b.key(), "root#1");
        assert_eq!((a.get(), b.get()), (1, 2));
    }

    #[test]
    fn test_keyed_hooks_advance_the_cursor() {
        let ctx = Context::new("root");
        let (flag, positional) = render(&ctx, |ctx| {
            let flag = ctx.use_state_keyed("flag", true);
            (flag, ctx.use_state(0))
        });
        assert_eq!(flag.key(), "root#flag");
        assert_eq!(positional.key(), "root#1");

        let memo = render(&ctx, |ctx| {
            ctx.use_ref_keyed("a", 0_u8);
            ctx.use_memo_keyed("b", || 0_u8, deps![]);
            ctx.use_memo(|| 5_u8, deps![])
        });
        assert_eq!(memo, 5);
        assert!(ctx.hook_store().borrow().get_hook("root#2").is_some());
        assert!(ctx.hook_store().borrow().get_hook("root#0").is_none());
    }

    #[test]
    fn test_set_marks_dirty() {
        let ctx = Context::new("root");
        let count = render(&ctx, |ctx| ctx.use_state(0));
        assert!(!ctx.needs_render());
        count.set(1);
        assert!(ctx.needs_render());
        ctx.begin_render();
        assert!(!ctx.needs_render());
    }

    #[test]
    fn test_mismatched_state_type_does_not_corrupt() {
        let ctx = Context::new("root");
        let text = render(&ctx, |ctx| ctx.use_state_keyed("slot", String::from("keep")));
        let number = render(&ctx, |ctx| ctx.use_state_keyed("slot", 7_u32));
        assert_eq!(number.get(), 0);
        assert_eq!(text.get(), "keep");
    }

    #[test]
    fn test_effect_gating() {
        let ctx = Context::new("root");
        let runs = Rc::new(Cell::new(0));

        let run = |a: i32, b: &str| {
            let runs = runs.clone();
            render(&ctx, |ctx| {
                ctx.use_effect(move || runs.set(runs.get() + 1), deps![a, b]);
            });
        };

        run(1, "x");
        assert_eq!(runs.get(), 1);
        run(1, "x");
        assert_eq!(runs.get(), 1);
        run(1, "y");
        assert_eq!(runs.get(), 2);
        run(1, "y");
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_effect_without_deps_runs_every_render() {
        let ctx = Context::new("root");
        let runs = Rc::new(Cell::new(0));
        for _ in 0..3 {
            let runs = runs.clone();
            render(&ctx, |ctx| ctx.use_effect(move || runs.set(runs.get() + 1), deps![]));
        }
        assert_eq!(runs.get(), 3);
    }

    #[test]
    fn test_effect_cleanup_runs_before_rerun_and_on_dispose() {
        let ctx = Context::new("root");
        let cleanups = Rc::new(Cell::new(0));

        for dep in [1, 2, 2] {
            let cleanups = cleanups.clone();
            render(&ctx, |ctx| {
                ctx.use_effect(
                    move || -> Cleanup { Box::new(move || cleanups.set(cleanups.get() + 1)) },
                    deps![dep],
                );
            });
        }
        assert_eq!(cleanups.get(), 1);

        ctx.dispose();
        assert_eq!(cleanups.get(), 2);
    }

    #[test]
    fn test_effect_may_set_state() {
        let ctx = Context::new("root");
        let value = render(&ctx, |ctx| {
            let value = ctx.use_state(0);
            let setter = value.clone();
            ctx.use_effect(move || setter.set(42), deps![()]);
            value
        });
        assert_eq!(value.get(), 42);
    }

    #[test]
    fn test_memo_caches_until_deps_change() {
        let ctx = Context::new("root");
        let computes = Rc::new(Cell::new(0));

        let memo = |n: u32| {
            let computes = computes.clone();
            render(&ctx, |ctx| {
                ctx.use_memo(
                    move || {
                        computes.set(computes.get() + 1);
                        n * 2
                    },
                    deps![n],
                )
            })
        };

        assert_eq!(memo(3), 6);
        assert_eq!(memo(3), 6);
        assert_eq!(computes.get(), 1);
        assert_eq!(memo(4), 8);
        assert_eq!(computes.get(), 2);
    }

    #[test]
    fn test_callback_identity_is_stable() {
        let ctx = Context::new("root");
        let make = |dep: i32| {
            render(&ctx, |ctx| ctx.use_callback(move |x: i32| x + dep, deps![dep]))
        };

        let first = make(1);
        let second = make(1);
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(second(1), 2);

        let third = make(5);
        assert!(!Rc::ptr_eq(&first, &third));
        assert_eq!(third(1), 6);
    }

    #[test]
    fn test_ref_is_stable_and_silent() {
        let ctx = Context::new("root");
        let cell = render(&ctx, |ctx| ctx.use_ref(Vec::<u8>::new()));
        cell.borrow_mut().push(1);
        assert!(!ctx.needs_render());

        let again = render(&ctx, |ctx| ctx.use_ref(Vec::<u8>::new()));
        assert!(cell.ptr_eq(&again));
        assert_eq!(again.get(), vec![1]);
    }

    #[test]
    fn test_with_key_is_identity_stable() {
        let ctx = Context::new("root");

        let (child, state) = render(&ctx, |ctx| {
            let child = ctx.with_key("item-1");
            let state = child.use_state(0);
            (child, state)
        });
        assert_eq!(child.path(), "root.item-1");
        state.set(9);

        let (again, state) = render(&ctx, |ctx| {
            let child = ctx.with_key("item-1");
            let state = child.use_state(0);
            (child, state)
        });
        assert!(child.ptr_eq(&again));
        assert_eq!(state.key(), "root.item-1#0");
        assert_eq!(state.get(), 9);
        assert_eq!(ctx.child_count(), 1);
    }

    #[test]
    fn test_child_shares_parent_focus_and_store() {
        let ctx = Context::new("root");
        let child = ctx.with_key("a").with_key("b");
        assert!(Rc::ptr_eq(&child.focus(), &ctx.focus()));
        assert!(Rc::ptr_eq(&child.hook_store(), &ctx.hook_store()));
        assert_eq!(child.path(), "root.a.b");
        assert_eq!(child.parent().map(|p| p.path().to_string()), Some("root.a".into()));
    }

    #[test]
    fn test_focus_scope_isolates_registrations() {
        let ctx = Context::new("root");
        let scoped_focus = FocusManager::shared();
        let scoped = ctx.with_focus_scope("portal:menu", scoped_focus.clone());

        ctx.begin_render();
        scoped_focus.borrow_mut().begin_frame();
        scoped.register(FocusItem::new("inside"));
        ctx.register(FocusItem::new("outside"));
        scoped_focus.borrow_mut().end_frame();
        ctx.end_render();

        assert_eq!(ctx.focus().borrow().focused_id(), Some("outside"));
        assert_eq!(scoped_focus.borrow().focused_id(), Some("inside"));
        assert_eq!(ctx.focus().borrow().len(), 1);
    }

    #[test]
    fn test_screen_size_clamps_invalid_input() {
        let ctx = Context::new("root");
        ctx.set_screen_size(0, -5);
        let (w, h) = ctx.screen_size();
        assert!(w > 0);
        assert_eq!((w, h), (80, 24));

        ctx.set_screen_size(100_000, 0);
        assert_eq!(ctx.screen_size(), (u16::MAX, 0));
    }

    #[test]
    fn test_screen_size_propagates_to_children() {
        let ctx = Context::new("root");
        let child = ctx.with_key("a");
        let grandchild = child.with_key("b");
        ctx.set_screen_size(120, 40);
        assert_eq!(child.screen_size(), (120, 40));
        assert_eq!(grandchild.screen_size(), (120, 40));

        let late = ctx.with_key("late");
        assert_eq!(late.screen_size(), (120, 40));
    }

    #[test]
    fn test_external_store_survives_swap() {
        let ctx = Context::new("root");
        let screen_a = shared_store();
        let screen_b = shared_store();

        ctx.set_hook_store(screen_a.clone());
        render(&ctx, |ctx| ctx.use_state(0)).set(5);

        ctx.set_hook_store(screen_b);
        assert_eq!(render(&ctx, |ctx| ctx.use_state(0)).get(), 0);

        ctx.set_hook_store(screen_a);
        assert_eq!(render(&ctx, |ctx| ctx.use_state(0)).get(), 5);
    }

    #[test]
    fn test_remove_child_disposes_its_hooks() {
        let ctx = Context::new("root");
        render(&ctx, |ctx| ctx.with_key("row").use_state_keyed("v", 1)).set(3);
        assert!(ctx.remove_child("row"));
        assert!(!ctx.remove_child("row"));

        let fresh = render(&ctx, |ctx| ctx.with_key("row").use_state_keyed("v", 1));
        assert_eq!(fresh.get(), 1);
    }
}
