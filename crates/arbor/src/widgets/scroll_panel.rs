use arbor_geom::{Margin, Point, Rect, Size};

use crate::{
    Context, Draggable, Drawable, EventOutcome, FocusAware, HitTestable, Widget,
    event::mouse::{Button, MouseButton, MouseMotion, Scroll},
    layout::{Layout, SizePolicy},
    render::Frame,
    theme::Theme,
};

/// Gap between the scroll bar and the panel edges.
const BAR_MARGIN: f32 = 4.0;
/// Share of the viewport one wheel step scrolls.
const WHEEL_STEP: f32 = 0.2;

/// A vertically scrolling viewport over its children.
///
/// Give the node [`ScrollPanel::layout`] and a fixed height. Children are
/// stretched to the panel width less the scroll bar gutter and keep at
/// least their natural height, so taller content overflows and is clipped.
/// The wheel, a click on the track or a drag of the thumb scrolls it; a
/// positive wheel delta moves toward the end of the content.
#[derive(Debug, Clone, Default)]
pub struct ScrollPanel {
    /// A thumb drag is in progress.
    dragging: bool,
}

impl ScrollPanel {
    /// An unscrolled panel.
    pub fn new() -> Self {
        Self::default()
    }

    /// The layout a scroll panel's node should carry.
    pub fn layout() -> Layout {
        Layout::vertical().with_policy(SizePolicy::Maximum)
    }

    /// Is a thumb drag in progress?
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

/// The scroll bar track in panel-local space.
fn track(size: Size, theme: &Theme) -> Rect {
    Rect::new(
        size.width - theme.scroll_bar_width - BAR_MARGIN,
        BAR_MARGIN,
        theme.scroll_bar_width,
        (size.height - 2.0 * BAR_MARGIN).max(0.0),
    )
}

/// The thumb inside `track`, for a viewport over `content` scrolled by
/// `offset`.
fn thumb(track: Rect, viewport: f32, content: f32, offset: f32) -> Rect {
    let height = track.size.height * (viewport / content).min(1.0);
    let max = (content - viewport).max(0.0);
    let along = if max > 0.0 { offset / max } else { 0.0 };
    Rect::new(
        track.pos.x,
        track.pos.y + (track.size.height - height) * along,
        track.size.width,
        height,
    )
}

/// Scroll by `dy`, asking for a redraw if anything moved.
fn scroll_by(ctx: &mut dyn Context, dy: f32) {
    let before = ctx.scroll_offset();
    let after = ctx.set_scroll_offset(Point::new(before.x, before.y + dy));
    if after != before {
        ctx.request_redraw();
    }
}

impl Drawable for ScrollPanel {
    fn content_insets(&self, theme: &Theme) -> Margin {
        Margin::new(0.0, 0.0, theme.scroll_bar_width + 2.0 * BAR_MARGIN, 0.0)
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let size = frame.size();
        let content = frame.content_extent().height;
        if content <= size.height {
            return;
        }
        let offset = frame.scroll_offset().y;
        let theme = frame.theme().clone();
        let track = track(size, &theme);
        let thumb = thumb(track, size.height, content, offset);
        let p = frame.painter();
        p.fill_rect(track, theme.corner_radius, theme.scroll_track_fill);
        p.fill_rect(thumb, theme.corner_radius, theme.scroll_thumb_fill);
    }
}

impl HitTestable for ScrollPanel {
    fn on_mouse_button(&mut self, event: &MouseButton, ctx: &mut dyn Context) -> EventOutcome {
        if event.button != Button::Left {
            return EventOutcome::Ignore;
        }
        if !event.is_down() {
            self.dragging = false;
            return EventOutcome::Ignore;
        }
        let rect = ctx.rect();
        let max = ctx.max_scroll().y;
        let track = track(rect.size, ctx.theme());
        let local = event.pos - rect.pos;
        if max <= 0.0 || !track.contains(local) {
            return EventOutcome::Ignore;
        }
        let viewport = rect.size.height;
        let thumb = thumb(track, viewport, viewport + max, ctx.scroll_offset().y);
        if thumb.contains(local) {
            self.dragging = true;
        } else if local.y < thumb.top() {
            scroll_by(ctx, -viewport);
        } else {
            scroll_by(ctx, viewport);
        }
        EventOutcome::Handle
    }

    fn on_scroll(&mut self, event: &Scroll, ctx: &mut dyn Context) -> EventOutcome {
        if ctx.max_scroll().y <= 0.0 {
            return EventOutcome::Ignore;
        }
        let dy = event.delta.y * ctx.rect().size.height * WHEEL_STEP;
        scroll_by(ctx, dy);
        EventOutcome::Handle
    }
}

impl FocusAware for ScrollPanel {}

impl Draggable for ScrollPanel {
    fn on_drag(&mut self, event: &MouseMotion, ctx: &mut dyn Context) -> EventOutcome {
        if !self.dragging {
            return EventOutcome::Ignore;
        }
        let size = ctx.rect().size;
        let max = ctx.max_scroll().y;
        let track = track(size, ctx.theme());
        let thumb = thumb(track, size.height, size.height + max, ctx.scroll_offset().y);
        let room = track.size.height - thumb.size.height;
        if room > 0.0 {
            scroll_by(ctx, event.delta.y * max / room);
        }
        EventOutcome::Handle
    }
}

impl Widget for ScrollPanel {}
