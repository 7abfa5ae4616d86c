//! Widget capability traits and event outcome types.
//!
//! Every node holds one boxed [`Widget`]. A widget is the combination of four
//! capabilities, each with inert defaults, so a kind only overrides what it
//! actually does.

use std::any::{Any, type_name};

use arbor_geom::{Margin, Point, Rect, Size};

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
        text::FontCache,
        theme::Theme,
    },
    state::NodeName,
};

/// The result of an event handler.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EventOutcome {
    /// The event was processed and propagation stops.
    Handle,
    /// The event was processed without a state change and propagation stops.
    Consume,
    /// The event was not handled and bubbles to the parent.
    Ignore,
}

impl EventOutcome {
    /// Did the handler stop propagation?
    pub fn consumed(self) -> bool {
        !matches!(self, Self::Ignore)
    }
}

/// Measurement access for [`Drawable::preferred_size`].
pub struct MeasureContext<'a> {
    /// Shared font cache.
    pub fonts: &'a mut FontCache,
    /// Theme in effect for the node.
    pub theme: &'a Theme,
}

impl MeasureContext<'_> {
    /// Extent of `text` in the theme's regular font and size.
    pub fn text(&mut self, text: &str) -> Size {
        self.fonts
            .measure(&self.theme.font, self.theme.font_size, text)
    }

    /// Extent of `text` in an explicit font and size.
    pub fn text_with(&mut self, font: &str, size: f32, text: &str) -> Size {
        self.fonts.measure(font, size, text)
    }
}

/// Sizing and painting.
pub trait Drawable {
    /// Natural size of a leaf, or the minimum size of a container's own
    /// content. Containers with a layout take the larger of this and the
    /// size of their children.
    fn preferred_size(&self, _cx: &mut MeasureContext<'_>) -> Size {
        Size::ZERO
    }

    /// Space the widget reserves around its children, e.g. a window header.
    fn content_insets(&self, _theme: &Theme) -> Margin {
        Margin::ZERO
    }

    /// Paint the widget itself. Children are painted afterwards, on top.
    fn draw(&mut self, _frame: &mut Frame<'_>) {}
}

/// Pointer input.
///
/// Positions are in the coordinate space of the widget's parent, the same
/// space as the widget's own rect.
pub trait HitTestable {
    /// Does the widget claim `point`? `rect` is the widget's rect.
    fn hit_test(&self, point: Point, rect: Rect) -> bool {
        rect.contains(point)
    }

    /// Button press or release.
    fn on_mouse_button(&mut self, _event: &MouseButton, _ctx: &mut dyn Context) -> EventOutcome {
        EventOutcome::Ignore
    }

    /// Pointer movement without drag capture.
    fn on_mouse_motion(&mut self, _event: &MouseMotion, _ctx: &mut dyn Context) -> EventOutcome {
        EventOutcome::Ignore
    }

    /// Scroll wheel.
    fn on_scroll(&mut self, _event: &Scroll, _ctx: &mut dyn Context) -> EventOutcome {
        EventOutcome::Ignore
    }

    /// The pointer entered the widget.
    fn on_mouse_enter(&mut self, _ctx: &mut dyn Context) {}

    /// The pointer left the widget.
    fn on_mouse_exit(&mut self, _ctx: &mut dyn Context) {}
}

/// Keyboard focus.
pub trait FocusAware {
    /// Can a click focus this widget?
    fn accept_focus(&self) -> bool {
        false
    }

    /// The widget joined the focus path.
    fn on_focus_gained(&mut self, _ctx: &mut dyn Context) {}

    /// The widget left the focus path.
    fn on_focus_lost(&mut self, _ctx: &mut dyn Context) {}

    /// Key press or release, delivered along the focus path.
    fn on_key(&mut self, _event: &KeyEvent, _ctx: &mut dyn Context) -> EventOutcome {
        EventOutcome::Ignore
    }

    /// Text input, delivered along the focus path.
    fn on_text(&mut self, _ch: char, _ctx: &mut dyn Context) -> EventOutcome {
        EventOutcome::Ignore
    }
}

/// Drag capture.
pub trait Draggable {
    /// Motion while this widget holds the drag capture. `event.pos` is in
    /// the parent's space and `event.delta` is the movement since the last
    /// motion event.
    fn on_drag(&mut self, _event: &MouseMotion, _ctx: &mut dyn Context) -> EventOutcome {
        EventOutcome::Ignore
    }
}

/// The behaviour attached to a node in the Core arena.
pub trait Widget: Drawable + HitTestable + FocusAware + Draggable + Any {
    /// Name used in dumps and logs.
    fn name(&self) -> NodeName {
        let name = type_name::<Self>();
        let short = name.rsplit("::").next().unwrap_or(name);
        NodeName::convert(short)
    }

    /// Window behaviour. Returning `Some` marks the node as a window.
    fn window(&self) -> Option<WindowMode> {
        None
    }

    /// Initial hover cursor.
    fn cursor(&self) -> Cursor {
        Cursor::Arrow
    }
}

/// Convert widgets into boxed trait objects.
impl<W> From<W> for Box<dyn Widget>
where
    W: Widget + 'static,
{
    fn from(widget: W) -> Self {
        Box::new(widget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FancyThing;
    impl Drawable for FancyThing {}
    impl HitTestable for FancyThing {}
    impl FocusAware for FancyThing {}
    impl Draggable for FancyThing {}
    impl Widget for FancyThing {}

    #[test]
    fn default_name_and_outcome() {
        assert_eq!(FancyThing.name(), "fancy_thing");
        assert!(FancyThing.window().is_none());
        assert!(EventOutcome::Handle.consumed());
        assert!(EventOutcome::Consume.consumed());
        assert!(!EventOutcome::Ignore.consumed());
    }
}
