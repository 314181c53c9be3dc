//! End-to-end runtime flow.
//!
//! Drives a mounted runtime the way a host loop does:
//! - render a small app with keyed children, state, effects and focusables
//! - dispatch keys and wait for the debounced render request
//! - open a modal portal, navigate inside it, close it with Escape
//! - push and pop screens on the root context
//!
//! Run with: cargo test --test runtime_flow

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use spark_hooks::{
    deps, mount, render_child, Context, FocusItem, Layer, MountHandle, RuntimeConfig,
    ScreenStack,
};

// =============================================================================
// APP
// =============================================================================

fn config() -> RuntimeConfig {
    RuntimeConfig::from_toml_str("render_debounce_ms = 5\ndefault_width = 100")
        .expect("valid config")
}

/// A counter row with one button per action, plus a footer that opens a
/// confirmation modal.
fn app(log: Rc<RefCell<Vec<String>>>) -> impl Fn(&Context) -> String {
    move |ctx: &Context| {
        let count = ctx.use_state_keyed("count", 0_i32);
        let renders = ctx.use_ref(0_u32);
        *renders.borrow_mut() += 1;

        let log_effect = log.clone();
        let value = count.get();
        ctx.use_effect(
            move || log_effect.borrow_mut().push(format!("count={value}")),
            deps![value],
        );

        let inc = count.clone();
        let dec = count.clone();
        let toolbar = render_child(ctx, "toolbar", &move |ctx: &Context| {
            let (inc, dec) = (inc.clone(), dec.clone());
            ctx.register(FocusItem::new("dec").hotkey("-").on_activate(move || {
                dec.update(|v| *v -= 1);
                true
            }));
            ctx.register(FocusItem::new("inc").hotkey("+").on_activate(move || {
                inc.update(|v| *v += 1);
                true
            }));
            "[-][+]".to_string()
        });

        ctx.next_row();
        let portals = ctx.portals();
        ctx.register(FocusItem::new("quit").hotkey("q").on_activate(move || {
            portals.borrow_mut().open("confirm", Layer::Modal, confirm);
            true
        }));

        format!("{value} {toolbar} [quit]")
    }
}

fn confirm(ctx: &Context) -> String {
    ctx.register(FocusItem::new("yes").hotkey("y"));
    ctx.register(FocusItem::new("no").hotkey("n").auto_focus());
    " <quit?>".to_string()
}

fn modal_focus(handle: &MountHandle) -> Option<String> {
    let focus = handle.root().portals().borrow().topmost_focus()?;
    focus.borrow().focused_id().map(str::to_string)
}

// =============================================================================
// TESTS
// =============================================================================

#[test]
fn test_counter_flow() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let handle = mount(config()).expect("mount");
    let app = app(log.clone());

    assert_eq!(handle.render(&app), "0 [-][+] [quit]");
    assert_eq!(handle.root().focus().borrow().focused_id(), Some("dec"));

    // Hotkey, then Right + Enter on the same button.
    assert!(handle.dispatch_key("+"));
    assert!(handle.wait_for_render(Duration::from_secs(2)));
    assert_eq!(handle.render(&app), "1 [-][+] [quit]");

    assert!(handle.dispatch_key("right"));
    assert!(handle.dispatch_key("enter"));
    handle.take_render_requests();
    assert_eq!(handle.render(&app), "2 [-][+] [quit]");
    assert_eq!(handle.root().focus().borrow().focused_id(), Some("inc"));

    // Down from (0,1) lands on the only cell of row 1.
    assert!(handle.dispatch_key("down"));
    assert_eq!(handle.root().focus().borrow().focused_id(), Some("quit"));

    assert_eq!(
        log.borrow().as_slice(),
        ["count=0".to_string(), "count=1".to_string(), "count=2".to_string()]
    );
}

#[test]
fn test_modal_flow() {
    let handle = mount(config()).expect("mount");
    let app = app(Rc::new(RefCell::new(Vec::new())));

    handle.render(&app);
    assert!(handle.dispatch_key("q"));
    assert_eq!(handle.render(&app), "0 [-][+] [quit] <quit?>");
    assert_eq!(modal_focus(&handle).as_deref(), Some("no"));

    // Keys go to the modal while it is open.
    assert!(handle.dispatch_key("shift+tab"));
    assert_eq!(modal_focus(&handle).as_deref(), Some("yes"));
    assert_eq!(handle.root().focus().borrow().focused_id(), Some("dec"));

    // Escape is not handled by the modal's items, so it closes the modal.
    assert!(handle.dispatch_key("escape"));
    assert_eq!(handle.render(&app), "0 [-][+] [quit]");
    assert_eq!(modal_focus(&handle), None);

    // Reopened modal starts from fresh focus state.
    assert!(handle.dispatch_key("q"));
    handle.render(&app);
    assert_eq!(modal_focus(&handle).as_deref(), Some("no"));
}

#[test]
fn test_resize_reaches_children() {
    let handle = mount(config()).expect("mount");
    let seen = Rc::new(Cell::new((0_u16, 0_u16)));
    let observed = seen.clone();
    let app = move |ctx: &Context| {
        let child = ctx.with_key("panel");
        observed.set(child.screen_size());
        String::new()
    };

    handle.render(&app);
    assert_eq!(seen.get(), (100, 24));

    handle.resize(120, 40);
    handle.render(&app);
    assert_eq!(seen.get(), (120, 40));

    handle.root().set_screen_size(-1, -1);
    assert_eq!(handle.root().screen_size(), (100, 24));
}

#[test]
fn test_screen_stack_flow() {
    let handle = mount(config()).expect("mount");
    let log = Rc::new(RefCell::new(Vec::new()));
    let app = app(log);
    let mut screens = ScreenStack::new();

    screens.push("main", handle.root());
    handle.render(&app);
    assert!(handle.dispatch_key("+"));
    assert_eq!(handle.render(&app), "1 [-][+] [quit]");

    screens.push("settings", handle.root());
    assert_eq!(handle.render(&app), "0 [-][+] [quit]");

    screens.pop(handle.root());
    assert_eq!(handle.render(&app), "1 [-][+] [quit]");
}
