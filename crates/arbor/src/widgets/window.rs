use std::hash::{DefaultHasher, Hash, Hasher};

use arbor_geom::{Margin, Point, Rect, Size};

use crate::{
    Context, Draggable, Drawable, EventOutcome, FocusAware, HitTestable, MeasureContext, Widget,
    event::mouse::{Button, MouseButton, MouseMotion, Scroll},
    node::WindowMode,
    render::{Bitmap, Color, Frame},
    theme::Theme,
};

/// Horizontal room around the title.
const TITLE_PADDING: f32 = 20.0;
/// Largest chrome bitmap edge rendered off-thread.
const MAX_CHROME_EDGE: f32 = 4096.0;

/// A movable top-level window with a title header.
///
/// Dragging the header moves the window within its parent. A modal window
/// confines pointer input to itself while it is on the focus path.
#[derive(Debug, Clone)]
pub struct Window {
    /// Header text. An empty title hides the header.
    title: String,
    /// Confines pointer input while focused.
    modal: bool,
    /// A header drag is in progress.
    dragging: bool,
}

impl Window {
    /// A non-modal window.
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            modal: false,
            dragging: false,
        }
    }

    /// A modal window.
    pub fn modal(title: &str) -> Self {
        Self {
            modal: true,
            ..Self::new(title)
        }
    }

    /// The title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replace the title. The caller re-runs layout if the header appears
    /// or disappears.
    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    /// Is a header drag in progress?
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Header height under `theme`.
    fn header(&self, theme: &Theme) -> f32 {
        if self.title.is_empty() {
            0.0
        } else {
            theme.window_header_height
        }
    }

    /// Identity of the chrome image for a size and focus state.
    fn chrome_revision(&self, size: Size, focused: bool, theme: &Theme) -> u64 {
        let mut h = DefaultHasher::new();
        size.width.to_bits().hash(&mut h);
        size.height.to_bits().hash(&mut h);
        focused.hash(&mut h);
        self.header(theme).to_bits().hash(&mut h);
        h.finish()
    }
}

/// Paint window chrome into a bitmap: body fill with the header band on
/// top.
fn render_chrome(size: Size, header: f32, body: Color, band: Color) -> Bitmap {
    let w = size.width.clamp(0.0, MAX_CHROME_EDGE).ceil() as u32;
    let h = size.height.clamp(0.0, MAX_CHROME_EDGE).ceil() as u32;
    let mut bitmap = Bitmap::new(w, h);
    let (body, band) = (body.to_rgba8(), band.to_rgba8());
    for y in 0..h {
        let color = if (y as f32) < header { band } else { body };
        for x in 0..w {
            bitmap.put(x, y, color);
        }
    }
    bitmap
}

impl Drawable for Window {
    fn preferred_size(&self, cx: &mut MeasureContext<'_>) -> Size {
        if self.title.is_empty() {
            return Size::ZERO;
        }
        let font = cx.theme.font_bold.clone();
        let text = cx.text_with(&font, cx.theme.font_size, &self.title);
        Size::new(text.width + TITLE_PADDING, cx.theme.window_header_height)
    }

    fn content_insets(&self, theme: &Theme) -> Margin {
        Margin::new(0.0, self.header(theme), 0.0, 0.0)
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let theme = frame.theme().clone();
        let rect = frame.rect();
        let focused = frame.flags().focused;
        let header = self.header(&theme);
        let body = if focused {
            theme.window_fill_focused
        } else {
            theme.window_fill
        };
        let band = theme.window_header_fill;

        let revision = self.chrome_revision(rect.size, focused, &theme);
        let size = rect.size;
        let image = frame.prerendered(revision, move || render_chrome(size, header, body, band));
        let p = frame.painter();
        match image {
            Some(image) => p.draw_image(image, rect),
            None => {
                p.fill_rect(rect, theme.corner_radius, body);
                if header > 0.0 {
                    p.fill_rect(
                        Rect::new(0.0, 0.0, rect.size.width, header),
                        theme.corner_radius,
                        band,
                    );
                }
            }
        }
        p.stroke_rect(rect, theme.corner_radius, 1.0, theme.border_color);

        if header > 0.0 {
            let extent = frame.measure_text(&theme.font_bold, theme.font_size, &self.title);
            let pos = Point::new(
                (rect.size.width - extent.width) / 2.0,
                (header - extent.height) / 2.0,
            );
            frame.painter().text(
                pos,
                &self.title,
                &theme.font_bold,
                theme.font_size,
                theme.window_title_color,
            );
        }
    }
}

impl HitTestable for Window {
    fn on_mouse_button(&mut self, event: &MouseButton, ctx: &mut dyn Context) -> EventOutcome {
        if event.button == Button::Left {
            let local_y = event.pos.y - ctx.rect().pos.y;
            self.dragging = event.is_down() && local_y < self.header(ctx.theme());
        }
        EventOutcome::Handle
    }

    fn on_scroll(&mut self, _event: &Scroll, _ctx: &mut dyn Context) -> EventOutcome {
        EventOutcome::Consume
    }
}

impl FocusAware for Window {
    fn accept_focus(&self) -> bool {
        true
    }

    fn on_focus_lost(&mut self, _ctx: &mut dyn Context) {
        self.dragging = false;
    }
}

impl Draggable for Window {
    fn on_drag(&mut self, event: &MouseMotion, ctx: &mut dyn Context) -> EventOutcome {
        if !self.dragging {
            return EventOutcome::Ignore;
        }
        let rect = ctx.rect();
        let mut pos = rect.pos + event.delta;
        if let Some(parent) = ctx.parent_id().and_then(|p| ctx.node_rect(p)) {
            let max = Point::new(
                (parent.size.width - rect.size.width).max(0.0),
                (parent.size.height - rect.size.height).max(0.0),
            );
            pos = Point::new(pos.x.clamp(0.0, max.x), pos.y.clamp(0.0, max.y));
        }
        ctx.set_position(pos);
        ctx.request_redraw();
        EventOutcome::Handle
    }
}

impl Widget for Window {
    fn window(&self) -> Option<WindowMode> {
        Some(WindowMode { modal: self.modal })
    }
}
