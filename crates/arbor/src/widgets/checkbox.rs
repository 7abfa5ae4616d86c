use arbor_geom::{Point, Rect, Size};

use crate::{
    Context, Draggable, Drawable, EventOutcome, FocusAware, HitTestable, MeasureContext, Widget,
    cursor::Cursor,
    event::{
        key::{Key, KeyEvent},
        mouse::{Button, MouseButton},
    },
    render::Frame,
};

/// Gap between the box and the caption.
const CAPTION_GAP: f32 = 6.0;

/// A checkable box with a caption.
pub struct CheckBox {
    /// Caption.
    caption: String,
    /// Checked state.
    checked: bool,
    /// Pressed and not yet released.
    pushed: bool,
    /// Checked-state callback.
    on_change: Option<Box<dyn FnMut(bool, &mut dyn Context)>>,
}

impl CheckBox {
    /// An unchecked box.
    pub fn new(caption: &str) -> Self {
        Self {
            caption: caption.to_string(),
            checked: false,
            pushed: false,
            on_change: None,
        }
    }

    /// Start checked.
    pub fn checked(mut self) -> Self {
        self.checked = true;
        self
    }

    /// Run `f` whenever the user flips the box.
    pub fn on_change(mut self, f: impl FnMut(bool, &mut dyn Context) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    /// The caption.
    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// Is the box checked?
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Set the checked state without running the callback.
    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    /// Flip the state and notify.
    fn flip(&mut self, ctx: &mut dyn Context) {
        self.checked = !self.checked;
        if let Some(f) = self.on_change.as_mut() {
            f(self.checked, ctx);
        }
        ctx.request_redraw();
    }
}

impl Drawable for CheckBox {
    fn preferred_size(&self, cx: &mut MeasureContext<'_>) -> Size {
        let text = cx.text(&self.caption);
        let side = cx.theme.check_box_size;
        Size::new(side + CAPTION_GAP + text.width, side.max(text.height))
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let theme = frame.theme().clone();
        let flags = frame.flags();
        let size = frame.size();
        let side = theme.check_box_size;
        let boxed = Rect::new(0.0, (size.height - side) / 2.0, side, side);
        let fill = if self.pushed {
            theme.button_fill_pushed
        } else {
            theme.text_box_fill
        };
        let border = if flags.focused {
            theme.focus_color
        } else {
            theme.border_color
        };
        let color = if flags.enabled {
            theme.text_color
        } else {
            theme.disabled_text_color
        };
        let p = frame.painter();
        p.fill_rect(boxed, theme.corner_radius, fill);
        p.stroke_rect(boxed, theme.corner_radius, 1.0, border);
        if self.checked {
            let inset = side / 4.0;
            let mark = Rect::new(
                boxed.pos.x + inset,
                boxed.pos.y + inset,
                side - 2.0 * inset,
                side - 2.0 * inset,
            );
            p.fill_rect(mark, 1.0, color);
        }
        p.text(
            Point::new(side + CAPTION_GAP, (size.height - theme.font_size) / 2.0),
            &self.caption,
            &theme.font,
            theme.font_size,
            color,
        );
    }
}

impl HitTestable for CheckBox {
    fn on_mouse_button(&mut self, event: &MouseButton, ctx: &mut dyn Context) -> EventOutcome {
        if event.button != Button::Left {
            return EventOutcome::Ignore;
        }
        if event.is_down() {
            self.pushed = true;
            ctx.request_redraw();
            return EventOutcome::Handle;
        }
        if !self.pushed {
            return EventOutcome::Ignore;
        }
        self.pushed = false;
        if ctx.rect().contains(event.pos) {
            self.flip(ctx);
        }
        EventOutcome::Handle
    }
}

impl FocusAware for CheckBox {
    fn accept_focus(&self) -> bool {
        true
    }

    fn on_key(&mut self, event: &KeyEvent, ctx: &mut dyn Context) -> EventOutcome {
        if event.pressed && event.key == Key::Space {
            self.flip(ctx);
            return EventOutcome::Handle;
        }
        EventOutcome::Ignore
    }
}

impl Draggable for CheckBox {}

impl Widget for CheckBox {
    fn cursor(&self) -> Cursor {
        Cursor::Hand
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{
        layout::{Layout, SizePolicy},
        testing::Harness,
    };

    #[test]
    fn click_and_space_flip() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let mut h = Harness::new(Size::new(200.0, 200.0));
        let root = h.root();
        h.canvas.core.set_layout(
            root,
            Some(Layout::vertical().with_policy(SizePolicy::Freeform)),
        );
        let c = h.canvas.core.push_child(
            root,
            CheckBox::new("ab").on_change(move |on, _| log.borrow_mut().push(on)),
        );
        h.layout();
        // 14 box + 6 gap + 2 graphemes at 8 each; max(14, 16) tall.
        assert_eq!(h.canvas.core.node(c).unwrap().size(), Size::new(36.0, 16.0));

        h.click(Point::new(5.0, 5.0));
        assert!(h.canvas.core.widget::<CheckBox>(c).unwrap().is_checked());
        h.key(Key::Space);
        assert!(!h.canvas.core.widget::<CheckBox>(c).unwrap().is_checked());
        // Release outside leaves the state alone.
        h.press(Point::new(5.0, 5.0));
        h.release(Point::new(150.0, 150.0));
        assert_eq!(*seen.borrow(), vec![true, false]);
    }
}
