//! Shared widgets for the integration tests.
#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use arbor::{
    Context, Draggable, Drawable, EventOutcome, FocusAware, HitTestable, MeasureContext, Widget,
    event::{
        key::KeyEvent,
        mouse::{MouseButton, MouseMotion},
    },
    geom::{Point, Size},
    render::Frame,
    state::NodeName,
};

/// Event log shared between the test and its widgets.
pub type Log = Rc<RefCell<Vec<String>>>;

/// A fresh, empty log.
pub fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// Drain the log.
pub fn take(log: &Log) -> Vec<String> {
    log.borrow_mut().drain(..).collect()
}

/// A leaf or container that records what it receives.
pub struct Leaf {
    label: String,
    size: Size,
    focusable: bool,
    consume: bool,
    log: Log,
    /// Position of the last pointer event, in parent space.
    pub last_pos: Option<Point>,
}

impl Leaf {
    /// A non-focusable widget of natural size zero that ignores events.
    pub fn new(label: &str, log: &Log) -> Self {
        Self {
            label: label.to_string(),
            size: Size::ZERO,
            focusable: false,
            consume: false,
            log: log.clone(),
            last_pos: None,
        }
    }

    /// Natural size.
    pub fn sized(mut self, width: f32, height: f32) -> Self {
        self.size = Size::new(width, height);
        self
    }

    /// Accept focus on click.
    pub fn focusable(mut self) -> Self {
        self.focusable = true;
        self
    }

    /// Stop pointer and key events from bubbling.
    pub fn consuming(mut self) -> Self {
        self.consume = true;
        self
    }

    fn record(&self, what: &str) {
        self.log.borrow_mut().push(format!("{}:{what}", self.label));
    }

    fn outcome(&self) -> EventOutcome {
        if self.consume {
            EventOutcome::Handle
        } else {
            EventOutcome::Ignore
        }
    }
}

impl Drawable for Leaf {
    fn preferred_size(&self, _cx: &mut MeasureContext<'_>) -> Size {
        self.size
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let rect = frame.rect();
        let color = frame.theme().button_fill;
        frame.painter().fill_rect(rect, 0.0, color);
    }
}

impl HitTestable for Leaf {
    fn on_mouse_button(&mut self, event: &MouseButton, _ctx: &mut dyn Context) -> EventOutcome {
        self.last_pos = Some(event.pos);
        self.record(if event.is_down() { "down" } else { "up" });
        self.outcome()
    }

    fn on_mouse_motion(&mut self, event: &MouseMotion, _ctx: &mut dyn Context) -> EventOutcome {
        self.last_pos = Some(event.pos);
        self.record("motion");
        self.outcome()
    }

    fn on_mouse_enter(&mut self, _ctx: &mut dyn Context) {
        self.record("enter");
    }

    fn on_mouse_exit(&mut self, _ctx: &mut dyn Context) {
        self.record("exit");
    }
}

impl FocusAware for Leaf {
    fn accept_focus(&self) -> bool {
        self.focusable
    }

    fn on_focus_gained(&mut self, _ctx: &mut dyn Context) {
        self.record("gained");
    }

    fn on_focus_lost(&mut self, _ctx: &mut dyn Context) {
        self.record("lost");
    }

    fn on_key(&mut self, _event: &KeyEvent, _ctx: &mut dyn Context) -> EventOutcome {
        self.record("key");
        self.outcome()
    }
}

impl Draggable for Leaf {
    fn on_drag(&mut self, event: &MouseMotion, _ctx: &mut dyn Context) -> EventOutcome {
        self.last_pos = Some(event.pos);
        self.record("drag");
        EventOutcome::Handle
    }
}

impl Widget for Leaf {
    fn name(&self) -> NodeName {
        NodeName::convert(&self.label)
    }
}
