use arbor_geom::{Point, Size};

use super::painter::{DrawCommand, RecordingPainter};
use crate::core::{
    canvas::Canvas,
    event::{
        key::{self, Key, Mods},
        mouse::Button,
    },
    id::NodeId,
};

/// A [`Canvas`] paired with a [`RecordingPainter`]. Tests script input as
/// a user would and inspect the tree or the recorded frame.
pub struct Harness {
    /// The canvas under test.
    pub canvas: Canvas,
    /// Painter for [`Harness::render`].
    pub painter: RecordingPainter,
}

impl Harness {
    /// A harness with an empty canvas of `size`.
    pub fn new(size: Size) -> Self {
        Self {
            canvas: Canvas::new(size),
            painter: RecordingPainter::new(),
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.canvas.root_id()
    }

    /// Run a layout pass.
    pub fn layout(&mut self) {
        self.canvas.perform_layout();
    }

    /// Draw one frame and return what was painted.
    pub fn render(&mut self) -> &[DrawCommand] {
        self.painter.clear();
        self.canvas.draw(&mut self.painter);
        self.painter.commands()
    }

    /// Move the pointer, reporting the held buttons.
    pub fn move_to(&mut self, pos: Point) -> bool {
        let delta = pos - self.canvas.mouse_pos();
        let buttons = self.canvas.buttons();
        self.canvas.mouse_motion(pos, delta, buttons, key::Empty)
    }

    /// Press the primary button at `pos`.
    pub fn press(&mut self, pos: Point) -> bool {
        self.move_to(pos);
        self.canvas.mouse_button(pos, Button::Left, true, key::Empty)
    }

    /// Release the primary button at `pos`.
    pub fn release(&mut self, pos: Point) -> bool {
        self.canvas.mouse_button(pos, Button::Left, false, key::Empty)
    }

    /// Press and release the primary button at `pos`. Returns whether the
    /// press was consumed.
    pub fn click(&mut self, pos: Point) -> bool {
        let consumed = self.press(pos);
        self.release(pos);
        consumed
    }

    /// Press at `from`, move to `to`, release there.
    pub fn drag(&mut self, from: Point, to: Point) {
        self.press(from);
        self.move_to(to);
        self.release(to);
    }

    /// Press and release a key. Returns whether the press was consumed.
    pub fn key(&mut self, k: impl Into<Key>) -> bool {
        self.key_with(k, key::Empty)
    }

    /// Press and release a key with modifiers.
    pub fn key_with(&mut self, k: impl Into<Key>, mods: Mods) -> bool {
        let k = k.into();
        let consumed = self.canvas.key(k, true, mods);
        self.canvas.key(k, false, mods);
        consumed
    }

    /// Feed each character as text input.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.canvas.text_input(ch);
        }
    }
}

#[cfg(test)]
mod tests {
    use arbor_geom::Rect;

    use super::*;
    use crate::testing::probe::{self, Probe};

    #[test]
    fn scripted_drag() {
        let mut h = Harness::new(Size::new(100.0, 100.0));
        let root = h.root();
        let a = h.canvas.core.push_child(root, Probe::new("a"));
        h.canvas.core.set_size(a, Size::new(20.0, 20.0));
        probe::reset();
        h.drag(Point::new(5.0, 5.0), Point::new(50.0, 50.0));
        assert_eq!(
            probe::events(),
            vec!["a:enter", "a:motion", "a:down", "a:drag", "a:up"]
        );
        assert!(h.canvas.core.drag_state().is_none());
        assert_eq!(h.render().len(), 6);
        assert_eq!(h.painter.fills(), vec![Rect::new(0.0, 0.0, 20.0, 20.0)]);
    }
}
