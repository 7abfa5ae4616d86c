use arbor::{
    geom::{Point, Rect, Size},
    render::{Bitmap, Color, ImageId, Painter},
};
use tracing::trace;

/// Draw call counts for one or more frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Completed frames.
    pub frames: usize,
    /// Filled rectangles.
    pub fills: usize,
    /// Stroked rectangles.
    pub strokes: usize,
    /// Text runs.
    pub texts: usize,
    /// Image draws.
    pub images: usize,
    /// Images uploaded.
    pub uploads: usize,
    /// Images released.
    pub releases: usize,
}

/// A headless [`Painter`] that traces every call and keeps counts.
#[derive(Debug, Default)]
pub struct LogPainter {
    stats: FrameStats,
    next_image: u64,
    depth: usize,
}

impl LogPainter {
    /// A painter with zeroed counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts since construction.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Current save/restore nesting.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Painter for LogPainter {
    fn begin_frame(&mut self, size: Size, pixel_ratio: f32) {
        trace!(?size, pixel_ratio, "begin frame");
    }

    fn end_frame(&mut self) {
        self.stats.frames += 1;
        trace!(stats = ?self.stats, "end frame");
    }

    fn save(&mut self) {
        self.depth += 1;
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn translate(&mut self, offset: Point) {
        trace!(?offset, "translate");
    }

    fn scissor(&mut self, rect: Rect) {
        trace!(?rect, "scissor");
    }

    fn fill_rect(&mut self, rect: Rect, _radius: f32, color: Color) {
        self.stats.fills += 1;
        trace!(?rect, ?color, "fill");
    }

    fn stroke_rect(&mut self, rect: Rect, _radius: f32, _width: f32, _color: Color) {
        self.stats.strokes += 1;
        trace!(?rect, "stroke");
    }

    fn text(&mut self, pos: Point, text: &str, font: &str, size: f32, _color: Color) {
        self.stats.texts += 1;
        trace!(?pos, text, font, size, "text");
    }

    fn create_image(&mut self, bitmap: &Bitmap) -> ImageId {
        self.next_image += 1;
        self.stats.uploads += 1;
        trace!(id = self.next_image, width = bitmap.width, height = bitmap.height, "upload image");
        ImageId(self.next_image)
    }

    fn draw_image(&mut self, image: ImageId, rect: Rect) {
        self.stats.images += 1;
        trace!(?image, ?rect, "image");
    }

    fn delete_image(&mut self, image: ImageId) {
        self.stats.releases += 1;
        trace!(?image, "release image");
    }
}
