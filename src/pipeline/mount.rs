//! Mount API - Runtime lifecycle and the host loop's entry points.
//!
//! `mount` builds the root context, its portal manager and a render
//! scheduler whose requests arrive on a channel owned by the handle. The host
//! drives everything from one thread:
//!
//! ```ignore
//! use spark_hooks::pipeline::mount;
//! use spark_hooks::RuntimeConfig;
//!
//! let mut handle = mount(RuntimeConfig::default())?;
//! print!("{}", handle.render(&app));
//!
//! while handle.is_running() {
//!     if handle.tick(Duration::from_millis(16))? {
//!         print!("{}", handle.render(&app));
//!     }
//! }
//!
//! handle.unmount();
//! ```

use std::io;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event};
use tracing::{debug, trace};

use super::scheduler::{RenderRequest, RenderScheduler};
use crate::config::RuntimeConfig;
use crate::engine::Context;
use crate::error::RuntimeError;
use crate::primitives::Component;
use crate::state::focus::FocusManager;
use crate::state::input::{convert_event, InputEvent};
use crate::state::keyboard::{Key, KeyCode};

/// Id of the root context created by [`mount`].
pub const ROOT_ID: &str = "root";

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by mount().
///
/// Holds:
/// - The root context (and through it the focus and portal managers)
/// - The render scheduler and the receiving end of its requests
/// - The running flag (cleared by `stop` or `unmount`)
pub struct MountHandle {
    root: Context,
    config: RuntimeConfig,
    scheduler: RenderScheduler,
    requests: Receiver<RenderRequest>,
    running: bool,
    disposed: bool,
}

impl MountHandle {
    pub fn root(&self) -> &Context {
        &self.root
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// One full render pass: the root component with its focus frame, then
    /// every open portal on top. Returns the concatenated output.
    pub fn render(&self, component: &dyn Component) -> String {
        self.root.begin_render();
        let mut out = component.render(&self.root);
        self.root.end_render();
        out.push_str(&self.root.render_portals());
        trace!(pass = self.root.render_count(), bytes = out.len(), "render pass");
        out
    }

    /// Ask for a debounced render.
    pub fn request_render(&self) {
        self.root.request_render();
    }

    /// Drain pending render requests without blocking. Returns how many
    /// were waiting.
    pub fn take_render_requests(&self) -> usize {
        self.requests.try_iter().count()
    }

    /// Block until a render request arrives or `timeout` passes.
    pub fn wait_for_render(&self, timeout: Duration) -> bool {
        self.requests.recv_timeout(timeout).is_ok()
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Route a key to the topmost open portal, or to the base UI when no
    /// portal is open. Returns whether it was handled.
    ///
    /// An Escape the portal does not handle closes it, unless
    /// `escape_closes_portal` is off.
    pub fn dispatch(&self, key: &Key) -> bool {
        let topmost = self.root.portals().borrow().topmost_focus();

        let handled = match topmost {
            Some(focus) => {
                let handled = FocusManager::handle_shared(&focus, key);
                let escape = key.code == KeyCode::Escape && key.modifiers.is_empty();
                if !handled && escape && self.config.escape_closes_portal {
                    let closed = self.root.portals().borrow_mut().pop();
                    if let Some(id) = &closed {
                        debug!(portal = %id, "escape closed portal");
                    }
                    closed.is_some()
                } else {
                    handled
                }
            }
            None => FocusManager::handle_shared(&self.root.focus(), key),
        };

        if handled {
            self.root.request_render();
        }
        handled
    }

    /// Route a key by name, e.g. `"tab"` or `"ctrl+s"`.
    pub fn dispatch_key(&self, name: &str) -> bool {
        self.dispatch(&Key::parse(name))
    }

    /// Apply a new terminal size and request a render.
    pub fn resize(&self, width: u16, height: u16) {
        self.root.set_screen_size(i32::from(width), i32::from(height));
        self.root.request_render();
    }

    /// Feed one crossterm event. Returns whether it changed anything.
    pub fn handle_event(&self, event: Event) -> bool {
        match convert_event(event) {
            InputEvent::Key(key) => self.dispatch(&key),
            InputEvent::Resize(width, height) => {
                self.resize(width, height);
                true
            }
            InputEvent::None => false,
        }
    }

    /// Poll the terminal for up to `timeout`, handle at most one event, and
    /// report whether a render is due.
    pub fn tick(&self, timeout: Duration) -> io::Result<bool> {
        if event::poll(timeout)? {
            self.handle_event(event::read()?);
        }
        Ok(self.take_render_requests() > 0)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop the host loop. Use this to trigger graceful shutdown from a
    /// key handler.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Close every portal, run all effect cleanups and cancel any pending
    /// render request.
    pub fn unmount(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.running = false;
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.scheduler.cancel();
        self.root.portals().borrow_mut().close_all();
        self.root.dispose();
        debug!("runtime unmounted");
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// =============================================================================
// Mount Function
// =============================================================================

/// Mount a runtime.
///
/// Fails when the configuration is invalid or the scheduler's timer thread
/// cannot be spawned.
pub fn mount(config: RuntimeConfig) -> Result<MountHandle, RuntimeError> {
    config.validate()?;
    let (scheduler, requests) = RenderScheduler::channel(config.render_debounce())?;
    let root = Context::with_config(ROOT_ID, &config, Some(scheduler.clone()));
    debug!(
        debounce_ms = config.render_debounce_ms,
        width = config.default_width,
        height = config.default_height,
        "runtime mounted"
    );

    Ok(MountHandle {
        root,
        config,
        scheduler,
        requests,
        running: true,
        disposed: false,
    })
}

/// Unmount and clean up.
pub fn unmount(handle: MountHandle) {
    handle.unmount();
}

// =============================================================================
// Tests
// =============================================================================
