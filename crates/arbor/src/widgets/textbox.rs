use std::time::{Duration, Instant};

use arbor_geom::{Point, Rect, Size};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    Context, Draggable, Drawable, EventOutcome, FocusAware, HitTestable, MeasureContext, Widget,
    cursor::Cursor,
    event::{
        key::{Key, KeyEvent},
        mouse::{Button, MouseButton, MouseMotion},
    },
    render::Frame,
};

/// Width of the drawn caret.
const CARET_WIDTH: f32 = 1.0;

/// Validates and accepts an edit. Returning `false` reverts the edit.
type CommitFn = Box<dyn FnMut(&str, &mut dyn Context) -> bool>;

/// A single-line editable text field.
///
/// Edits go to a working copy while the box has focus and are committed
/// when focus leaves or Enter is pressed. The caret moves by grapheme
/// cluster, so combining sequences and emoji behave as one character.
pub struct TextBox {
    /// Committed value.
    value: String,
    /// Working copy while editing.
    edit: String,
    /// Caret position in graphemes.
    caret: usize,
    /// Focused and editing.
    editing: bool,
    /// Accepts input.
    editable: bool,
    /// Shown when empty and unfocused.
    placeholder: String,
    /// Commit callback.
    on_commit: Option<CommitFn>,
    /// Start of the current blink cycle.
    blink_epoch: Instant,
    /// X offset of each caret position, cached at draw time.
    offsets: Vec<f32>,
}

impl TextBox {
    /// An editable box holding `value`.
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            edit: value.to_string(),
            caret: 0,
            editing: false,
            editable: true,
            placeholder: String::new(),
            on_commit: None,
            blink_epoch: Instant::now(),
            offsets: Vec::new(),
        }
    }

    /// Show `text` while empty.
    pub fn with_placeholder(mut self, text: &str) -> Self {
        self.placeholder = text.to_string();
        self
    }

    /// Make the box read-only.
    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    /// Validate and observe commits.
    pub fn on_commit(mut self, f: impl FnMut(&str, &mut dyn Context) -> bool + 'static) -> Self {
        self.on_commit = Some(Box::new(f));
        self
    }

    /// The committed value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the value, discarding any edit in progress.
    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.edit = value.to_string();
        self.caret = self.caret.min(self.len());
    }

    /// The text currently shown: the working copy while editing.
    pub fn text(&self) -> &str {
        if self.editing { &self.edit } else { &self.value }
    }

    /// Caret position in graphemes.
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Is an edit in progress?
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Is the caret lit at `now` for a blink period of `period`?
    pub fn caret_visible_at(&self, now: Instant, period: Duration) -> bool {
        if !self.editing {
            return false;
        }
        let period = period.as_millis().max(1);
        (now.saturating_duration_since(self.blink_epoch).as_millis() / period) % 2 == 0
    }

    /// Grapheme count of the working copy.
    fn len(&self) -> usize {
        self.edit.graphemes(true).count()
    }

    /// Byte offset of grapheme boundary `index` in the working copy.
    fn byte_at(&self, index: usize) -> usize {
        self.edit
            .grapheme_indices(true)
            .nth(index)
            .map_or(self.edit.len(), |(i, _)| i)
    }

    /// Restart the blink cycle with the caret lit.
    fn reset_blink(&mut self) {
        self.blink_epoch = Instant::now();
    }

    /// Offer the working copy to the commit callback.
    fn commit(&mut self, ctx: &mut dyn Context) {
        let accepted = match self.on_commit.as_mut() {
            Some(f) => f(&self.edit, ctx),
            None => true,
        };
        if accepted {
            self.value.clone_from(&self.edit);
        } else {
            self.edit.clone_from(&self.value);
            self.caret = self.caret.min(self.len());
        }
    }

    /// Caret index nearest to `x`, from the offsets cached at draw time.
    fn index_at(&self, x: f32) -> usize {
        let mut best = 0;
        for (i, off) in self.offsets.iter().enumerate() {
            if (off - x).abs() < (self.offsets[best] - x).abs() {
                best = i;
            }
        }
        best.min(self.len())
    }

    /// Move the caret under a pointer position given in parent space.
    fn caret_to_pointer(&mut self, pos: Point, ctx: &dyn Context) {
        let rect = ctx.rect();
        let pad = ctx.theme().text_box_padding;
        self.caret = self.index_at(pos.x - rect.pos.x - pad.left);
        self.reset_blink();
    }

    /// Apply an editing key. Returns `false` for keys the box ignores.
    fn edit_key(&mut self, key: Key) -> bool {
        match key {
            Key::Left => self.caret = self.caret.saturating_sub(1),
            Key::Right => self.caret = (self.caret + 1).min(self.len()),
            Key::Home => self.caret = 0,
            Key::End => self.caret = self.len(),
            Key::Backspace if self.editable && self.caret > 0 => {
                let start = self.byte_at(self.caret - 1);
                let end = self.byte_at(self.caret);
                self.edit.replace_range(start..end, "");
                self.caret -= 1;
            }
            Key::Delete if self.editable && self.caret < self.len() => {
                let start = self.byte_at(self.caret);
                let end = self.byte_at(self.caret + 1);
                self.edit.replace_range(start..end, "");
            }
            Key::Backspace | Key::Delete => {}
            _ => return false,
        }
        true
    }
}

impl Drawable for TextBox {
    fn preferred_size(&self, cx: &mut MeasureContext<'_>) -> Size {
        let shown = if self.value.is_empty() {
            &self.placeholder
        } else {
            &self.value
        };
        let text = cx.text(shown);
        let pad = cx.theme.text_box_padding;
        Size::new(
            text.width.max(cx.theme.text_box_min_width),
            text.height.max(cx.theme.font_size),
        )
        .expand(pad)
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let theme = frame.theme().clone();
        let flags = frame.flags();
        let rect = frame.rect();
        let pad = theme.text_box_padding;

        let text = self.text().to_string();
        let mut offsets = vec![0.0];
        let mut prefix = String::new();
        for g in text.graphemes(true) {
            prefix.push_str(g);
            offsets.push(frame.measure_text(&theme.font, theme.font_size, &prefix).width);
        }
        self.offsets = offsets;

        let border = if flags.focused {
            theme.focus_color
        } else {
            theme.border_color
        };
        let origin = Point::new(pad.left, pad.top);
        let caret_x = self.offsets.get(self.caret).copied().unwrap_or_default();
        let caret_lit = self.caret_visible_at(
            Instant::now(),
            Duration::from_millis(theme.caret_blink_ms),
        );

        let p = frame.painter();
        p.fill_rect(rect, theme.corner_radius, theme.text_box_fill);
        p.stroke_rect(rect, theme.corner_radius, 1.0, border);
        if text.is_empty() && !self.editing {
            p.text(
                origin,
                &self.placeholder,
                &theme.font,
                theme.font_size,
                theme.disabled_text_color,
            );
        } else {
            let color = if flags.enabled {
                theme.text_color
            } else {
                theme.disabled_text_color
            };
            p.text(origin, &text, &theme.font, theme.font_size, color);
        }
        if caret_lit {
            p.fill_rect(
                Rect::new(origin.x + caret_x, origin.y, CARET_WIDTH, theme.font_size),
                0.0,
                theme.focus_color,
            );
        }
    }
}

impl HitTestable for TextBox {
    fn on_mouse_button(&mut self, event: &MouseButton, ctx: &mut dyn Context) -> EventOutcome {
        if event.button != Button::Left || !event.is_down() {
            return EventOutcome::Ignore;
        }
        if self.editing {
            self.caret_to_pointer(event.pos, ctx);
        } else {
            ctx.request_focus();
        }
        EventOutcome::Handle
    }
}

impl FocusAware for TextBox {
    fn accept_focus(&self) -> bool {
        true
    }

    fn on_focus_gained(&mut self, ctx: &mut dyn Context) {
        self.editing = true;
        self.edit.clone_from(&self.value);
        self.caret = self.len();
        self.reset_blink();
        ctx.request_redraw();
    }

    fn on_focus_lost(&mut self, ctx: &mut dyn Context) {
        if self.editing {
            self.commit(ctx);
        }
        self.editing = false;
        self.reset_blink();
        ctx.request_redraw();
    }

    fn on_key(&mut self, event: &KeyEvent, ctx: &mut dyn Context) -> EventOutcome {
        if !self.editing || !event.pressed {
            return EventOutcome::Ignore;
        }
        if event.key == Key::Enter {
            self.commit(ctx);
            self.reset_blink();
            return EventOutcome::Handle;
        }
        if event.key == Key::Escape {
            self.edit.clone_from(&self.value);
            self.caret = self.len();
            ctx.clear_focus();
            return EventOutcome::Handle;
        }
        if !self.edit_key(event.key) {
            return EventOutcome::Ignore;
        }
        self.reset_blink();
        ctx.request_redraw();
        EventOutcome::Handle
    }

    fn on_text(&mut self, ch: char, ctx: &mut dyn Context) -> EventOutcome {
        if !self.editing || !self.editable || ch.is_control() {
            return EventOutcome::Ignore;
        }
        let at = self.byte_at(self.caret);
        let before = self.len();
        self.edit.insert(at, ch);
        // A combining mark merges into the previous grapheme.
        self.caret += self.len() - before;
        self.reset_blink();
        ctx.request_redraw();
        EventOutcome::Handle
    }
}

impl Draggable for TextBox {
    fn on_drag(&mut self, event: &MouseMotion, ctx: &mut dyn Context) -> EventOutcome {
        if !self.editing {
            return EventOutcome::Ignore;
        }
        self.caret_to_pointer(event.pos, ctx);
        EventOutcome::Handle
    }
}

impl Widget for TextBox {
    fn cursor(&self) -> Cursor {
        Cursor::IBeam
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        FocusManager, NodeId,
        layout::{Layout, SizePolicy},
        testing::Harness,
    };

    fn harness(tb: TextBox) -> (Harness, NodeId) {
        let mut h = Harness::new(Size::new(300.0, 100.0));
        let root = h.root();
        h.canvas.core.set_layout(
            root,
            Some(Layout::vertical().with_policy(SizePolicy::Freeform)),
        );
        let t = h.canvas.core.push_child(root, tb);
        h.layout();
        (h, t)
    }

    fn tb(h: &Harness, id: NodeId) -> &TextBox {
        h.canvas.core.widget::<TextBox>(id).unwrap()
    }

    #[test]
    fn grapheme_editing() {
        let (mut h, t) = harness(TextBox::new("ae\u{301}b"));
        h.canvas.request_focus(t);
        assert!(tb(&h, t).is_editing());
        assert_eq!(tb(&h, t).caret(), 3);

        h.key(Key::Left);
        h.key(Key::Backspace);
        assert_eq!(tb(&h, t).text(), "ab");
        assert_eq!(tb(&h, t).caret(), 1);

        h.type_text("x\u{301}");
        assert_eq!(tb(&h, t).text(), "ax\u{301}b");
        assert_eq!(tb(&h, t).caret(), 2);
        h.key(Key::Home);
        h.key(Key::Delete);
        assert_eq!(tb(&h, t).text(), "x\u{301}b");
        // Nothing committed until focus leaves.
        assert_eq!(tb(&h, t).value(), "ae\u{301}b");
        h.canvas.core.clear_focus();
        assert_eq!(tb(&h, t).value(), "x\u{301}b");
    }

    #[test]
    fn commit_can_reject() {
        let (mut h, t) = harness(TextBox::new("12").on_commit(|v, _| v.parse::<u32>().is_ok()));
        h.canvas.request_focus(t);
        h.type_text("3");
        assert!(h.key(Key::Enter));
        assert_eq!(tb(&h, t).value(), "123");
        h.type_text("z");
        h.key(Key::Enter);
        assert_eq!(tb(&h, t).value(), "123");
        assert_eq!(tb(&h, t).text(), "123");
    }

    #[test]
    fn escape_reverts_and_unfocuses() {
        let (mut h, t) = harness(TextBox::new("keep"));
        h.canvas.request_focus(t);
        h.type_text("!!");
        h.key(Key::Escape);
        assert!(h.canvas.core.focus_path().is_empty());
        assert_eq!(tb(&h, t).value(), "keep");
    }

    #[test]
    fn blink_resets_on_focus_edges() {
        let (mut h, t) = harness(TextBox::new("x"));
        let period = Duration::from_millis(500);
        assert!(!tb(&h, t).caret_visible_at(Instant::now(), period));
        h.canvas.request_focus(t);
        let epoch = tb(&h, t).blink_epoch;
        assert!(tb(&h, t).caret_visible_at(epoch, period));
        assert!(!tb(&h, t).caret_visible_at(epoch + Duration::from_millis(600), period));
        assert!(tb(&h, t).caret_visible_at(epoch + Duration::from_millis(1100), period));
        h.canvas.core.clear_focus();
        assert!(tb(&h, t).blink_epoch >= epoch);
        assert!(!tb(&h, t).is_editing());
    }

    #[test]
    fn click_places_caret() {
        let (mut h, t) = harness(TextBox::new("abcd"));
        h.canvas.request_focus(t);
        h.render();
        // Padding 5, 8 per grapheme: x = 5 + 17 is nearest boundary 2.
        h.click(Point::new(22.0, 5.0));
        assert_eq!(tb(&h, t).caret(), 2);
        assert!(h.canvas.core.is_focused(t));
    }

    #[test]
    fn read_only_ignores_input() {
        let (mut h, t) = harness(TextBox::new("ro").read_only());
        h.canvas.request_focus(t);
        h.type_text("x");
        h.key(Key::Backspace);
        assert_eq!(tb(&h, t).text(), "ro");
        assert_eq!(h.canvas.core.node(t).unwrap().cursor(), Cursor::IBeam);
    }
}
