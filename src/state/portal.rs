//! Portal System - Overlays rendered above the main tree
//!
//! A portal is a component rendered after the base UI, in its own stacking
//! layer and with its own focus manager. Focus registrations inside a portal
//! never reach the base UI, and closing a portal throws its navigation state
//! away.
//!
//! # Ordering
//!
//! Open portals render bottom to top by `(layer, z_index)`. Unless set
//! explicitly, `z_index` is the open sequence, so the most recently opened
//! portal in a layer is the topmost one of that layer.
//!
//! # Example
//!
//! ```ignore
//! let portals = ctx.portals();
//! portals.borrow_mut().open("confirm", Layer::Modal, |ctx: &Context| {
//!     ctx.register(FocusItem::new("yes").hotkey("y"));
//!     ctx.register(FocusItem::new("no").hotkey("n"));
//!     "[Y]es / [N]o".to_string()
//! });
//!
//! let overlay = ctx.render_portals();
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use super::focus::{FocusManager, SharedFocusManager};
use crate::engine::Context;
use crate::primitives::Component;
use crate::types::Layer;

/// Portal manager shared by every node of one render tree.
pub type SharedPortalManager = Rc<RefCell<PortalManager>>;

// =============================================================================
// PORTAL
// =============================================================================

pub struct Portal {
    id: String,
    layer: Layer,
    z_index: i32,
    component: Rc<dyn Component>,
    focus: SharedFocusManager,
    is_open: bool,
}

impl Portal {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// The portal's own focus manager.
    pub fn focus(&self) -> SharedFocusManager {
        self.focus.clone()
    }
}

impl fmt::Debug for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Portal")
            .field("id", &self.id)
            .field("layer", &self.layer)
            .field("z_index", &self.z_index)
            .field("is_open", &self.is_open)
            .finish()
    }
}

/// What a render pass needs from one open portal, detached from the manager
/// so components may open and close portals while rendering.
#[derive(Clone)]
pub struct PortalFrame {
    pub id: String,
    pub component: Rc<dyn Component>,
    pub focus: SharedFocusManager,
}

// =============================================================================
// PORTAL MANAGER
// =============================================================================

#[derive(Debug, Default)]
pub struct PortalManager {
    portals: Vec<Portal>,
    next_z: i32,
    /// Removed since the last render; their contexts still hold hook state.
    removed: Vec<String>,
}

impl PortalManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedPortalManager {
        Rc::new(RefCell::new(Self::new()))
    }

    fn find(&self, id: &str) -> Option<usize> {
        self.portals.iter().position(|p| p.id == id)
    }

    fn bump_z(&mut self) -> i32 {
        self.next_z += 1;
        self.next_z
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Open `id`, or refresh it if it is already open.
    ///
    /// A refresh swaps the layer and component but keeps the portal's focus
    /// state and stacking position. Returns whether the portal became open.
    pub fn open<C: Component + 'static>(&mut self, id: &str, layer: Layer, component: C) -> bool {
        self.open_shared(id, layer, Rc::new(component))
    }

    pub fn open_shared(&mut self, id: &str, layer: Layer, component: Rc<dyn Component>) -> bool {
        match self.find(id) {
            Some(index) if self.portals[index].is_open => {
                let portal = &mut self.portals[index];
                portal.layer = layer;
                portal.component = component;
                false
            }
            Some(index) => {
                let z_index = self.bump_z();
                let portal = &mut self.portals[index];
                portal.layer = layer;
                portal.component = component;
                portal.z_index = z_index;
                portal.is_open = true;
                debug!(id, ?layer, z_index, "portal reopened");
                true
            }
            None => {
                let z_index = self.bump_z();
                self.portals.push(Portal {
                    id: id.to_string(),
                    layer,
                    z_index,
                    component,
                    focus: FocusManager::shared(),
                    is_open: true,
                });
                debug!(id, ?layer, z_index, "portal opened");
                true
            }
        }
    }

    /// Open (or refresh) with an explicit z-index.
    pub fn open_with_z<C: Component + 'static>(
        &mut self,
        id: &str,
        layer: Layer,
        z_index: i32,
        component: C,
    ) -> bool {
        let opened = self.open(id, layer, component);
        if let Some(index) = self.find(id) {
            self.portals[index].z_index = z_index;
        }
        opened
    }

    /// Hide `id` and reset its focus state. Returns false when the portal is
    /// missing or already closed.
    pub fn close(&mut self, id: &str) -> bool {
        let Some(portal) = self.portals.iter_mut().find(|p| p.id == id && p.is_open) else {
            return false;
        };
        portal.is_open = false;
        // Still borrowed when a caller holds the manager; start over with a
        // fresh one instead.
        let reset = portal.focus.try_borrow_mut().map(|mut f| f.reset()).is_ok();
        if !reset {
            portal.focus = FocusManager::shared();
        }
        debug!(id, "portal closed");
        true
    }

    /// Delete `id` entirely. Returns whether it existed.
    ///
    /// The hooks the portal rendered are disposed by the next
    /// [`Context::render_portals`], or right away through
    /// [`Context::remove_portal`].
    pub fn remove(&mut self, id: &str) -> bool {
        match self.find(id) {
            Some(index) => {
                self.portals.remove(index);
                self.removed.push(id.to_string());
                debug!(id, "portal removed");
                true
            }
            None => false,
        }
    }

    /// Ids removed since the last call.
    pub fn take_removed(&mut self) -> Vec<String> {
        std::mem::take(&mut self.removed)
    }

    /// Close the topmost open portal, returning its id.
    pub fn pop(&mut self) -> Option<String> {
        let id = self.open_portals().last().map(|p| p.id.clone())?;
        self.close(&id);
        Some(id)
    }

    pub fn close_all(&mut self) {
        let open: Vec<String> = self.open_portals().iter().map(|p| p.id.clone()).collect();
        for id in open {
            self.close(&id);
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn get(&self, id: &str) -> Option<&Portal> {
        self.portals.iter().find(|p| p.id == id)
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.get(id).is_some_and(Portal::is_open)
    }

    pub fn has_open(&self) -> bool {
        self.portals.iter().any(|p| p.is_open)
    }

    pub fn len(&self) -> usize {
        self.portals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.portals.is_empty()
    }

    /// Open portals, bottom to top.
    pub fn open_portals(&self) -> Vec<&Portal> {
        let mut open: Vec<&Portal> = self.portals.iter().filter(|p| p.is_open).collect();
        open.sort_by_key(|p| (p.layer, p.z_index));
        open
    }

    /// Focus manager of the topmost open portal: where keys go first.
    pub fn topmost_focus(&self) -> Option<SharedFocusManager> {
        self.open_portals().last().map(|p| p.focus.clone())
    }

    /// Detached render list of the open portals, bottom to top.
    pub fn frames(&self) -> Vec<PortalFrame> {
        self.open_portals()
            .into_iter()
            .map(|p| PortalFrame {
                id: p.id.clone(),
                component: p.component.clone(),
                focus: p.focus.clone(),
            })
            .collect()
    }

    // =========================================================================
    // RENDERING
    // =========================================================================

    /// Render every open portal under `ctx`.
    ///
    /// The manager stays borrowed for the whole pass, so components rendered
    /// here must not open or close portals; [`Context::render_portals`]
    /// renders from a snapshot instead.
    pub fn render_portals(&self, ctx: &Context) -> String {
        render_frames(&self.frames(), ctx)
    }
}

/// Key of the child context a portal renders under.
pub fn scope_key(id: &str) -> String {
    format!("portal:{id}")
}

/// Render `frames` bottom to top and concatenate their output.
///
/// Each portal renders under the child context `portal:<id>`, bound to the
/// portal's focus manager, with a full focus frame around it.
pub fn render_frames(frames: &[PortalFrame], ctx: &Context) -> String {
    let mut out = String::new();
    for frame in frames {
        let child = ctx.with_focus_scope(&scope_key(&frame.id), frame.focus.clone());
        frame.focus.borrow_mut().begin_frame();
        out.push_str(&frame.component.render(&child));
        FocusManager::end_frame_shared(&frame.focus);
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================
