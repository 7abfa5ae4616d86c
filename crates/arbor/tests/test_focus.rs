//! Integration tests for focus path transitions.

mod common;

#[cfg(test)]
mod tests {
    use arbor::{
        Canvas, FocusManager, NodeId,
        event::{
            key::{Empty, Key, Shift},
            mouse::Button,
        },
        geom::{Point, Rect, Size},
    };

    use crate::common::{Leaf, Log, log, take};

    /// Root with two focusable branches: B > A and D > C.
    fn branches() -> (Canvas, Log, [NodeId; 4]) {
        let l = log();
        let mut canvas = Canvas::new(Size::new(200.0, 200.0));
        let root = canvas.root_id();
        let b = canvas.core.push_child(root, Leaf::new("b", &l).focusable());
        let a = canvas.core.push_child(b, Leaf::new("a", &l).focusable());
        let d = canvas.core.push_child(root, Leaf::new("d", &l).focusable());
        let c = canvas.core.push_child(d, Leaf::new("c", &l).focusable());
        for (id, r) in [
            (b, Rect::new(0.0, 0.0, 100.0, 100.0)),
            (a, Rect::new(10.0, 10.0, 20.0, 20.0)),
            (d, Rect::new(100.0, 0.0, 100.0, 100.0)),
            (c, Rect::new(10.0, 10.0, 20.0, 20.0)),
        ] {
            canvas.core.set_position(id, r.pos);
            canvas.core.set_size(id, r.size);
        }
        (canvas, l, [a, b, c, d])
    }

    #[test]
    fn transitions_run_root_side_first() {
        let (mut canvas, l, [a, b, c, d]) = branches();
        let root = canvas.root_id();

        assert!(canvas.request_focus(a));
        assert_eq!(canvas.core.focus_path(), &[a, b, root]);
        assert_eq!(take(&l), vec!["b:gained", "a:gained"]);

        assert!(canvas.request_focus(c));
        assert_eq!(canvas.core.focus_path(), &[c, d, root]);
        assert_eq!(take(&l), vec!["b:lost", "a:lost", "d:gained", "c:gained"]);

        // Refocusing the same leaf changes nothing.
        assert!(!canvas.request_focus(c));
        assert!(take(&l).is_empty());
    }

    #[test]
    fn shared_ancestors_keep_focus() {
        let (mut canvas, l, [a, b, _, _]) = branches();
        canvas.request_focus(a);
        take(&l);
        canvas.request_focus(b);
        assert_eq!(take(&l), vec!["a:lost"]);
        assert!(canvas.core.is_focused(b));
        assert!(canvas.core.node(b).is_some_and(|n| n.focused()));
        assert!(!canvas.core.node(a).is_some_and(|n| n.focused()));
    }

    #[test]
    fn click_focuses_nearest_focusable() {
        let l = log();
        let mut canvas = Canvas::new(Size::new(200.0, 200.0));
        let root = canvas.root_id();
        let w = canvas.core.push_child(root, Leaf::new("w", &l).focusable());
        let inner = canvas.core.push_child(w, Leaf::new("inner", &l));
        canvas.core.set_size(w, Size::new(100.0, 100.0));
        canvas.core.set_size(inner, Size::new(50.0, 50.0));

        assert!(canvas.mouse_button(Point::new(5.0, 5.0), Button::Left, true, Empty));
        assert!(canvas.core.is_focused(w));
        canvas.mouse_button(Point::new(5.0, 5.0), Button::Left, false, Empty);

        // Clicking empty root space clears focus.
        assert!(canvas.mouse_button(Point::new(150.0, 150.0), Button::Left, true, Empty));
        assert!(canvas.core.focus_path().is_empty());
        assert_eq!(take(&l).last().map(String::as_str), Some("w:lost"));
    }

    #[test]
    fn disposing_focused_subtree_clears_path() {
        let (mut canvas, l, [a, b, _, _]) = branches();
        canvas.request_focus(a);
        take(&l);
        canvas.dispose(b);
        assert!(canvas.core.focus_path().is_empty());
        assert_eq!(take(&l), vec!["b:lost", "a:lost"]);
        assert!(!canvas.core.is_alive(a));
    }

    #[test]
    fn keys_travel_leaf_to_root() {
        let (mut canvas, l, [a, ..]) = branches();
        canvas.request_focus(a);
        take(&l);
        assert!(!canvas.key(Key::Char('x'), true, Empty));
        assert_eq!(take(&l), vec!["a:key", "b:key"]);
    }

    #[test]
    fn tab_walks_focusable_nodes() {
        let (mut canvas, _log, [a, b, c, d]) = branches();
        let mut seen = Vec::new();
        for _ in 0..5 {
            assert!(canvas.key(Key::Tab, true, Empty));
            seen.extend(canvas.core.focused());
        }
        assert_eq!(seen, vec![b, a, d, c, b]);

        assert!(canvas.key(Key::Tab, true, Shift));
        assert_eq!(canvas.core.focused(), Some(c));
    }
}
