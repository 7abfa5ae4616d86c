/// Pointer cursor shapes the host can display.
///
/// Each node carries one; the canvas reports a change to the host when the
/// hovered node changes and its cursor differs from the active one.
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Cursor {
    /// Standard arrow.
    #[default]
    Arrow,
    /// Text insertion bar.
    IBeam,
    /// Crosshair.
    Crosshair,
    /// Pointing hand.
    Hand,
    /// Horizontal resize.
    HResize,
    /// Vertical resize.
    VResize,
}
