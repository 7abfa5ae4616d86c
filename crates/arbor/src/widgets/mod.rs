//! Built-in widget kinds.
//!
//! Each kind is an ordinary [`Widget`](crate::Widget); none of them has
//! privileges the host's own widgets lack.

mod button;
mod checkbox;
mod label;
mod panel;
mod scroll_panel;
mod textbox;
mod window;

pub use button::{Button, ButtonKind};
pub use checkbox::CheckBox;
pub use label::Label;
pub use panel::Panel;
pub use scroll_panel::ScrollPanel;
pub use textbox::TextBox;
pub use window::Window;
