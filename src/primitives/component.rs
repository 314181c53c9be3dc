//! Component capability.
//!
//! The runtime composes components but never interprets their output: a
//! component turns a [`Context`] into a string, reading and writing hooks and
//! registering focusables on the way.

use crate::engine::Context;

/// Anything that can render itself inside a context.
pub trait Component {
    fn render(&self, ctx: &Context) -> String;
}

impl<F> Component for F
where
    F: Fn(&Context) -> String,
{
    fn render(&self, ctx: &Context) -> String {
        self(ctx)
    }
}

/// Render `component` under the child context `key`.
///
/// The child keeps its hook state across renders as long as the same key is
/// used at the same place in the tree.
pub fn render_child(ctx: &Context, key: &str, component: &dyn Component) -> String {
    component.render(&ctx.with_key(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    struct Label(&'static str);

    impl Component for Label {
        fn render(&self, _ctx: &Context) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn test_closure_component() {
        let ctx = Context::new("root");
        let component = |ctx: &Context| format!("path={}", ctx.path());
        assert_eq!(component.render(&ctx), "path=root");
    }

    #[test]
    fn test_render_child_uses_keyed_context() {
        let ctx = Context::new("root");
        let component = |ctx: &Context| ctx.path().to_string();
        assert_eq!(render_child(&ctx, "list", &component), "root.list");
    }

    #[test]
    fn test_shared_component() {
        let ctx = Context::new("root");
        let shared: Rc<dyn Component> = Rc::new(Label("hi"));
        assert_eq!(shared.render(&ctx), "hi");
    }
}
