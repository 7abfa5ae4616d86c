use arbor_geom::{Point, Size};

use crate::{
    Draggable, Drawable, FocusAware, HitTestable, MeasureContext, Widget,
    render::{Color, Frame},
};

/// A line of static text.
#[derive(Debug, Clone)]
pub struct Label {
    /// Displayed text.
    text: String,
    /// Font override.
    font: Option<String>,
    /// Size override.
    font_size: Option<f32>,
    /// Colour override.
    color: Option<Color>,
}

impl Label {
    /// A label in the theme's font.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            font: None,
            font_size: None,
            color: None,
        }
    }

    /// Use a specific font.
    pub fn with_font(mut self, font: &str) -> Self {
        self.font = Some(font.to_string());
        self
    }

    /// Use a specific font size.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Use a specific colour.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// The text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text. The caller re-runs layout if the size matters.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }
}

impl Drawable for Label {
    fn preferred_size(&self, cx: &mut MeasureContext<'_>) -> Size {
        let font = self.font.as_deref().unwrap_or(&cx.theme.font);
        let size = self.font_size.unwrap_or(cx.theme.font_size);
        cx.fonts.measure(font, size, &self.text)
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let theme = frame.theme();
        let font = self.font.clone().unwrap_or_else(|| theme.font.clone());
        let size = self.font_size.unwrap_or(theme.font_size);
        let color = match (self.color, frame.flags().enabled) {
            (_, false) => theme.disabled_text_color,
            (Some(c), true) => c,
            (None, true) => theme.text_color,
        };
        frame
            .painter()
            .text(Point::ZERO, &self.text, &font, size, color);
    }
}

impl HitTestable for Label {}
impl FocusAware for Label {}
impl Draggable for Label {}
impl Widget for Label {}
