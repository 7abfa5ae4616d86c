use arbor_geom::{Point, Rect, Size};

use crate::core::render::{Bitmap, Color, ImageId, Painter};

/// One recorded painter call. Rects and positions are absolute: the
/// recorder applies its own translation stack.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Frame start.
    BeginFrame {
        /// Canvas extent.
        size: Size,
        /// Device pixel ratio.
        pixel_ratio: f32,
    },
    /// Frame end.
    EndFrame,
    /// Clip rect, intersected with the enclosing clip.
    Scissor(Rect),
    /// Filled rect.
    Fill {
        /// Absolute rect.
        rect: Rect,
        /// Fill colour.
        color: Color,
    },
    /// Outlined rect.
    Stroke {
        /// Absolute rect.
        rect: Rect,
        /// Line colour.
        color: Color,
    },
    /// A text run.
    Text {
        /// Absolute origin.
        pos: Point,
        /// The text.
        text: String,
        /// Text colour.
        color: Color,
    },
    /// A prerendered image.
    Image {
        /// Image handle.
        image: ImageId,
        /// Absolute rect.
        rect: Rect,
    },
}

/// A [`Painter`] that records draw calls for assertions.
#[derive(Debug, Default)]
pub struct RecordingPainter {
    /// Everything drawn, in order.
    commands: Vec<DrawCommand>,
    /// Current translation.
    offset: Point,
    /// Saved translations.
    stack: Vec<Point>,
    /// Unbalanced `restore` calls.
    underflow: usize,
    /// Next image handle.
    next_image: u64,
    /// Images created so far.
    created: usize,
    /// Images deleted so far.
    deleted: Vec<ImageId>,
    /// Frames begun.
    frames: usize,
}

impl RecordingPainter {
    /// An empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded commands.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Forget recorded commands, keeping image bookkeeping.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Absolute rects of every fill, in order.
    pub fn fills(&self) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Fill { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    /// Every text run, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Every image draw, in order.
    pub fn images(&self) -> Vec<ImageId> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Image { image, .. } => Some(*image),
                _ => None,
            })
            .collect()
    }

    /// Number of images uploaded.
    pub fn images_created(&self) -> usize {
        self.created
    }

    /// Images deleted, in order.
    pub fn images_deleted(&self) -> &[ImageId] {
        &self.deleted
    }

    /// Number of frames begun.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Did every `save` meet a `restore`?
    pub fn balanced(&self) -> bool {
        self.stack.is_empty() && self.underflow == 0
    }
}

impl Painter for RecordingPainter {
    fn begin_frame(&mut self, size: Size, pixel_ratio: f32) {
        self.frames += 1;
        self.offset = Point::ZERO;
        self.commands.push(DrawCommand::BeginFrame { size, pixel_ratio });
    }

    fn end_frame(&mut self) {
        self.commands.push(DrawCommand::EndFrame);
    }

    fn save(&mut self) {
        self.stack.push(self.offset);
    }

    fn restore(&mut self) {
        match self.stack.pop() {
            Some(o) => self.offset = o,
            None => self.underflow += 1,
        }
    }

    fn translate(&mut self, offset: Point) {
        self.offset = self.offset + offset;
    }

    fn scissor(&mut self, rect: Rect) {
        self.commands
            .push(DrawCommand::Scissor(rect.translate(self.offset)));
    }

    fn fill_rect(&mut self, rect: Rect, _radius: f32, color: Color) {
        self.commands.push(DrawCommand::Fill {
            rect: rect.translate(self.offset),
            color,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, _radius: f32, _width: f32, color: Color) {
        self.commands.push(DrawCommand::Stroke {
            rect: rect.translate(self.offset),
            color,
        });
    }

    fn text(&mut self, pos: Point, text: &str, _font: &str, _size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            pos: pos + self.offset,
            text: text.to_string(),
            color,
        });
    }

    fn create_image(&mut self, _bitmap: &Bitmap) -> ImageId {
        self.created += 1;
        self.next_image += 1;
        ImageId(self.next_image)
    }

    fn draw_image(&mut self, image: ImageId, rect: Rect) {
        self.commands.push(DrawCommand::Image {
            image,
            rect: rect.translate(self.offset),
        });
    }

    fn delete_image(&mut self, image: ImageId) {
        self.deleted.push(image);
    }
}
