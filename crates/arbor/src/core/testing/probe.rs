use std::cell::RefCell;

use arbor_geom::{Margin, Point, Size};

use crate::{
    Context,
    core::{
        cursor::Cursor,
        event::{
            key::KeyEvent,
            mouse::{MouseButton, MouseMotion, Scroll},
        },
        node::WindowMode,
        render::Frame,
        theme::Theme,
    },
    state::NodeName,
    widget::{Drawable, Draggable, EventOutcome, FocusAware, HitTestable, MeasureContext, Widget},
};

thread_local! {
    /// Events seen by every probe on this thread, as `label:event`.
    static EVENTS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Clear this thread's event log.
pub fn reset() {
    EVENTS.with(|e| e.borrow_mut().clear());
}

/// This thread's event log, oldest first.
pub fn events() -> Vec<String> {
    EVENTS.with(|e| e.borrow().clone())
}

/// A configurable widget that records each callback it receives.
#[derive(Debug, Clone)]
pub struct Probe {
    /// Log prefix and drawn text.
    label: String,
    /// Accepts focus.
    focusable: bool,
    /// Consumes pointer and key input.
    consuming: bool,
    /// Window behaviour.
    window: Option<WindowMode>,
    /// Preferred size.
    size: Size,
    /// Content insets.
    insets: Margin,
    /// Hover cursor.
    cursor: Cursor,
    /// Position of the last pointer event, in parent space.
    last_pos: Option<Point>,
}

impl Probe {
    /// A probe that ignores everything and has no size.
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            focusable: false,
            consuming: false,
            window: None,
            size: Size::ZERO,
            insets: Margin::ZERO,
            cursor: Cursor::Arrow,
            last_pos: None,
        }
    }

    /// Accept focus.
    pub fn focusable(mut self) -> Self {
        self.focusable = true;
        self
    }

    /// Consume pointer, key and text input.
    pub fn consuming(mut self) -> Self {
        self.consuming = true;
        self
    }

    /// Behave as a top-level window.
    pub fn window(mut self) -> Self {
        self.window = Some(WindowMode::default());
        self
    }

    /// Behave as a modal window.
    pub fn modal(mut self) -> Self {
        self.window = Some(WindowMode { modal: true });
        self
    }

    /// Set the preferred size.
    pub fn sized(mut self, width: f32, height: f32) -> Self {
        self.size = Size::new(width, height);
        self
    }

    /// Reserve space around children.
    pub fn insets(mut self, insets: Margin) -> Self {
        self.insets = insets;
        self
    }

    /// Set the hover cursor.
    pub fn with_cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = cursor;
        self
    }

    /// The label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Change the label.
    pub fn set_label(&mut self, label: &str) {
        self.label = label.to_string();
    }

    /// Position of the last pointer event, relative to the parent.
    pub fn last_pos(&self) -> Option<Point> {
        self.last_pos
    }

    /// Append to the thread's event log.
    fn log(&self, event: &str) {
        let line = format!("{}:{event}", self.label);
        EVENTS.with(|e| e.borrow_mut().push(line));
    }

    /// Outcome for consumable input.
    fn outcome(&self) -> EventOutcome {
        if self.consuming {
            EventOutcome::Handle
        } else {
            EventOutcome::Ignore
        }
    }
}

impl Drawable for Probe {
    fn preferred_size(&self, _cx: &mut MeasureContext<'_>) -> Size {
        self.size
    }

    fn content_insets(&self, _theme: &Theme) -> Margin {
        self.insets
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let rect = frame.rect();
        let theme = frame.theme().clone();
        let p = frame.painter();
        p.fill_rect(rect, 0.0, theme.button_fill);
        p.text(Point::ZERO, &self.label, &theme.font, theme.font_size, theme.text_color);
    }
}

impl HitTestable for Probe {
    fn on_mouse_button(&mut self, event: &MouseButton, _ctx: &mut dyn Context) -> EventOutcome {
        self.last_pos = Some(event.pos);
        self.log(if event.is_down() { "down" } else { "up" });
        self.outcome()
    }

    fn on_mouse_motion(&mut self, event: &MouseMotion, _ctx: &mut dyn Context) -> EventOutcome {
        self.last_pos = Some(event.pos);
        self.log("motion");
        self.outcome()
    }

    fn on_scroll(&mut self, event: &Scroll, _ctx: &mut dyn Context) -> EventOutcome {
        self.last_pos = Some(event.pos);
        self.log("scroll");
        self.outcome()
    }

    fn on_mouse_enter(&mut self, _ctx: &mut dyn Context) {
        self.log("enter");
    }

    fn on_mouse_exit(&mut self, _ctx: &mut dyn Context) {
        self.log("exit");
    }
}

impl FocusAware for Probe {
    fn accept_focus(&self) -> bool {
        self.focusable
    }

    fn on_focus_gained(&mut self, _ctx: &mut dyn Context) {
        self.log("focus_gained");
    }

    fn on_focus_lost(&mut self, _ctx: &mut dyn Context) {
        self.log("focus_lost");
    }

    fn on_key(&mut self, _event: &KeyEvent, _ctx: &mut dyn Context) -> EventOutcome {
        self.log("key");
        self.outcome()
    }

    fn on_text(&mut self, _ch: char, _ctx: &mut dyn Context) -> EventOutcome {
        self.log("text");
        self.outcome()
    }
}

impl Draggable for Probe {
    fn on_drag(&mut self, event: &MouseMotion, _ctx: &mut dyn Context) -> EventOutcome {
        self.last_pos = Some(event.pos);
        self.log("drag");
        // Capture holders always claim their drags.
        EventOutcome::Handle
    }
}

impl Widget for Probe {
    fn name(&self) -> NodeName {
        NodeName::convert(&self.label)
    }

    fn window(&self) -> Option<WindowMode> {
        self.window
    }

    fn cursor(&self) -> Cursor {
        self.cursor
    }
}
