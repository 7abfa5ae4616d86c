use arbor_geom::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

use crate::core::{
    id::NodeId,
    prerender::{PrerenderKey, Prerenderer},
    text::FontCache,
    theme::Theme,
};

/// RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Construct from float components.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Construct from 8-bit components.
    pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// 8-bit RGBA components.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

/// Handle to an image uploaded to the painter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub u64);

/// CPU-side RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 pixels, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// A transparent bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Write one pixel. Out-of-range writes are ignored.
    pub fn put(&mut self, x: u32, y: u32, color: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[i..i + 4].copy_from_slice(&color);
    }

    /// Read one pixel.
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let mut px = [0; 4];
        px.copy_from_slice(&self.pixels[i..i + 4]);
        Some(px)
    }
}

/// The host's vector graphics context.
///
/// Coordinates are logical pixels relative to the current translation. The
/// canvas brackets every frame in `begin_frame`/`end_frame` and wraps each
/// node in `save`/`restore`.
pub trait Painter {
    /// Start a frame of the given logical size.
    fn begin_frame(&mut self, size: Size, pixel_ratio: f32);
    /// Finish and present the frame.
    fn end_frame(&mut self);
    /// Push the transform and scissor state.
    fn save(&mut self);
    /// Pop the transform and scissor state.
    fn restore(&mut self);
    /// Move the origin.
    fn translate(&mut self, offset: Point);
    /// Intersect the clip region with `rect`.
    fn scissor(&mut self, rect: Rect);
    /// Fill a rounded rectangle.
    fn fill_rect(&mut self, rect: Rect, radius: f32, color: Color);
    /// Outline a rounded rectangle.
    fn stroke_rect(&mut self, rect: Rect, radius: f32, width: f32, color: Color);
    /// Draw a single line of text with its top-left corner at `pos`.
    fn text(&mut self, pos: Point, text: &str, font: &str, size: f32, color: Color);
    /// Upload a bitmap and return its handle.
    fn create_image(&mut self, bitmap: &Bitmap) -> ImageId;
    /// Draw an uploaded image stretched over `rect`.
    fn draw_image(&mut self, image: ImageId, rect: Rect);
    /// Release an uploaded image.
    fn delete_image(&mut self, image: ImageId);
}

/// Per-node state visible while drawing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeFlags {
    /// Node is on the focus path.
    pub focused: bool,
    /// Node is under the pointer.
    pub hovered: bool,
    /// Node accepts input.
    pub enabled: bool,
    /// Node is the drag capture target.
    pub dragging: bool,
}

/// Drawing handle passed to [`Drawable::draw`](crate::Drawable::draw).
///
/// The painter's origin is already translated to the node's top-left
/// corner, so widgets draw in local coordinates.
pub struct Frame<'a> {
    /// Host painter.
    painter: &'a mut dyn Painter,
    /// Text measurement.
    fonts: &'a mut FontCache,
    /// Background renderer, if the canvas runs one.
    prerender: Option<&'a mut Prerenderer>,
    /// Theme in effect for the node.
    theme: &'a Theme,
    /// Node being drawn.
    node: NodeId,
    /// Node size.
    size: Size,
    /// Node state.
    flags: NodeFlags,
    /// How far the children are scrolled.
    scroll: Point,
    /// Extent of the children, unscrolled.
    content: Size,
}

impl<'a> Frame<'a> {
    /// Assemble a frame for one node.
    pub(crate) fn new(
        painter: &'a mut dyn Painter,
        fonts: &'a mut FontCache,
        prerender: Option<&'a mut Prerenderer>,
        theme: &'a Theme,
        node: NodeId,
        size: Size,
        flags: NodeFlags,
    ) -> Self {
        Self {
            painter,
            fonts,
            prerender,
            theme,
            node,
            size,
            flags,
            scroll: Point::ZERO,
            content: Size::ZERO,
        }
    }

    /// Attach the node's scroll state.
    pub(crate) fn with_scroll(mut self, scroll: Point, content: Size) -> Self {
        self.scroll = scroll;
        self.content = content;
        self
    }

    /// The host painter.
    pub fn painter(&mut self) -> &mut dyn Painter {
        &mut *self.painter
    }

    /// The node's local rect, `(0, 0)` to its size.
    pub fn rect(&self) -> Rect {
        Rect::from_size(self.size)
    }

    /// The node's size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Theme in effect for the node.
    pub fn theme(&self) -> &Theme {
        self.theme
    }

    /// Node being drawn.
    pub fn node_id(&self) -> NodeId {
        self.node
    }

    /// Node state flags.
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// How far the node's children are scrolled.
    pub fn scroll_offset(&self) -> Point {
        self.scroll
    }

    /// Bottom-right corner of the node's children before scrolling.
    pub fn content_extent(&self) -> Size {
        self.content
    }

    /// Measure text with the shared font cache.
    pub fn measure_text(&mut self, font: &str, size: f32, text: &str) -> Size {
        self.fonts.measure(font, size, text)
    }

    /// Ask for a prerendered image of this node at `revision`.
    ///
    /// Returns the uploaded image once a worker has finished rendering it.
    /// Returns `None` while the job is in flight or when no prerenderer is
    /// installed; the widget then draws synchronously. A new revision
    /// supersedes and evicts the node's older images.
    pub fn prerendered<F>(&mut self, revision: u64, job: F) -> Option<ImageId>
    where
        F: FnOnce() -> Bitmap + Send + 'static,
    {
        let key = PrerenderKey {
            node: self.node,
            revision,
        };
        let prerender = self.prerender.as_deref_mut()?;
        prerender.request(key, &mut *self.painter, Box::new(job))
    }
}
