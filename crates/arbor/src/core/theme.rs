use arbor_geom::Margin;
use serde::{Deserialize, Serialize};

use crate::core::render::Color;

/// Visual parameters shared by a subtree of widgets.
///
/// Themes are registered with the [`Core`](crate::Core) and referenced by
/// [`ThemeId`](crate::ThemeId). Missing fields deserialise to their defaults,
/// so a theme file only needs to list what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Regular font face.
    pub font: String,
    /// Bold font face, used for titles.
    pub font_bold: String,
    /// Default font size.
    pub font_size: f32,
    /// Label and caption color.
    pub text_color: Color,
    /// Text color for disabled widgets.
    pub disabled_text_color: Color,
    /// Widget outline color.
    pub border_color: Color,
    /// Outline for the focused widget.
    pub focus_color: Color,
    /// Corner radius for buttons and boxes.
    pub corner_radius: f32,
    /// Window body fill.
    pub window_fill: Color,
    /// Window body fill while the window is on the focus path.
    pub window_fill_focused: Color,
    /// Window header fill.
    pub window_header_fill: Color,
    /// Window title color.
    pub window_title_color: Color,
    /// Height of the window header.
    pub window_header_height: f32,
    /// Drop shadow width around windows.
    pub window_drop_shadow: f32,
    /// Button fill at rest.
    pub button_fill: Color,
    /// Button fill while pushed.
    pub button_fill_pushed: Color,
    /// Padding around button captions.
    pub button_padding: Margin,
    /// Edge of a check box square.
    pub check_box_size: f32,
    /// Text box background.
    pub text_box_fill: Color,
    /// Padding inside text boxes.
    pub text_box_padding: Margin,
    /// Minimum text box width.
    pub text_box_min_width: f32,
    /// Caret blink half-period in milliseconds.
    pub caret_blink_ms: u64,
    /// Width of a scroll bar.
    pub scroll_bar_width: f32,
    /// Scroll bar track fill.
    pub scroll_track_fill: Color,
    /// Scroll bar thumb fill.
    pub scroll_thumb_fill: Color,
    /// Tooltip background.
    pub tooltip_fill: Color,
    /// Tooltip text color.
    pub tooltip_text_color: Color,
    /// Tooltip font size.
    pub tooltip_font_size: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            font: "sans".into(),
            font_bold: "sans-bold".into(),
            font_size: 16.0,
            text_color: Color::rgba8(255, 255, 255, 160),
            disabled_text_color: Color::rgba8(255, 255, 255, 80),
            border_color: Color::rgba8(29, 29, 29, 255),
            focus_color: Color::rgba8(90, 140, 220, 255),
            corner_radius: 2.0,
            window_fill: Color::rgba8(43, 43, 43, 230),
            window_fill_focused: Color::rgba8(45, 45, 45, 230),
            window_header_fill: Color::rgba8(58, 58, 58, 255),
            window_title_color: Color::rgba8(255, 255, 255, 190),
            window_header_height: 30.0,
            window_drop_shadow: 10.0,
            button_fill: Color::rgba8(74, 74, 74, 255),
            button_fill_pushed: Color::rgba8(41, 41, 41, 255),
            button_padding: Margin::symmetric(10.0, 4.0),
            check_box_size: 14.0,
            text_box_fill: Color::rgba8(32, 32, 32, 255),
            text_box_padding: Margin::symmetric(5.0, 3.0),
            text_box_min_width: 60.0,
            caret_blink_ms: 500,
            scroll_bar_width: 12.0,
            scroll_track_fill: Color::rgba8(0, 0, 0, 32),
            scroll_thumb_fill: Color::rgba8(220, 220, 220, 100),
            tooltip_fill: Color::rgba8(0, 0, 0, 220),
            tooltip_text_color: Color::rgba8(255, 255, 255, 230),
            tooltip_font_size: 14.0,
        }
    }
}
