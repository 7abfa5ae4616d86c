use crate::{
    Draggable, Drawable, FocusAware, HitTestable, Widget,
    render::{Color, Frame},
    state::NodeName,
};

/// A plain container. Arranges its children with whatever layout the node
/// carries and optionally paints a background.
#[derive(Debug, Clone, Default)]
pub struct Panel {
    /// Background fill.
    fill: Option<Color>,
    /// Corner radius of the fill.
    radius: f32,
    /// Name override for dumps.
    name: Option<String>,
}

impl Panel {
    /// A transparent panel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint a background.
    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    /// Round the background corners.
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Name the panel in dumps and logs.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// The background fill.
    pub fn fill(&self) -> Option<Color> {
        self.fill
    }
}

impl Drawable for Panel {
    fn draw(&mut self, frame: &mut Frame<'_>) {
        if let Some(fill) = self.fill {
            let rect = frame.rect();
            frame.painter().fill_rect(rect, self.radius, fill);
        }
    }
}

impl HitTestable for Panel {}
impl FocusAware for Panel {}
impl Draggable for Panel {}

impl Widget for Panel {
    fn name(&self) -> NodeName {
        NodeName::convert(self.name.as_deref().unwrap_or("panel"))
    }
}
