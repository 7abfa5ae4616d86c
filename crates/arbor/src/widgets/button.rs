use arbor_geom::{Point, Size};

use crate::{
    Context, Draggable, Drawable, EventOutcome, FocusAware, HitTestable, MeasureContext, Widget,
    cursor::Cursor,
    event::{
        key::{Key, KeyEvent},
        mouse::{Button as MouseButtonCode, MouseButton},
    },
    render::Frame,
};

/// Click behaviour of a [`Button`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonKind {
    /// Pushed while held; clicks on release inside the button.
    #[default]
    Push,
    /// Flips its pushed state on every press.
    Toggle,
}

/// Callback run on click.
type ClickFn = Box<dyn FnMut(&mut dyn Context)>;
/// Callback run when the pushed state changes.
type ChangeFn = Box<dyn FnMut(bool, &mut dyn Context)>;

/// A push or toggle button with a text caption.
pub struct Button {
    /// Caption.
    caption: String,
    /// Push or toggle.
    kind: ButtonKind,
    /// Currently pushed.
    pushed: bool,
    /// Completed clicks.
    clicks: u32,
    /// Click callback.
    on_click: Option<ClickFn>,
    /// Pushed-state callback.
    on_change: Option<ChangeFn>,
}

impl Button {
    /// A push button.
    pub fn new(caption: &str) -> Self {
        Self {
            caption: caption.to_string(),
            kind: ButtonKind::Push,
            pushed: false,
            clicks: 0,
            on_click: None,
            on_change: None,
        }
    }

    /// A toggle button.
    pub fn toggle(caption: &str) -> Self {
        Self {
            kind: ButtonKind::Toggle,
            ..Self::new(caption)
        }
    }

    /// Run `f` on every click.
    pub fn on_click(mut self, f: impl FnMut(&mut dyn Context) + 'static) -> Self {
        self.on_click = Some(Box::new(f));
        self
    }

    /// Run `f` whenever the pushed state changes.
    pub fn on_change(mut self, f: impl FnMut(bool, &mut dyn Context) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    /// The caption.
    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// Replace the caption.
    pub fn set_caption(&mut self, caption: &str) {
        self.caption = caption.to_string();
    }

    /// Push or toggle.
    pub fn kind(&self) -> ButtonKind {
        self.kind
    }

    /// Is the button pushed?
    pub fn pushed(&self) -> bool {
        self.pushed
    }

    /// Set the pushed state without running callbacks.
    pub fn set_pushed(&mut self, pushed: bool) {
        self.pushed = pushed;
    }

    /// Number of completed clicks.
    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    /// Change the pushed state, notifying on change.
    fn push(&mut self, pushed: bool, ctx: &mut dyn Context) {
        if self.pushed == pushed {
            return;
        }
        self.pushed = pushed;
        if let Some(f) = self.on_change.as_mut() {
            f(pushed, ctx);
        }
        ctx.request_redraw();
    }

    /// Count a click and run the callback.
    fn click(&mut self, ctx: &mut dyn Context) {
        self.clicks += 1;
        if let Some(f) = self.on_click.as_mut() {
            f(ctx);
        }
    }
}

impl Drawable for Button {
    fn preferred_size(&self, cx: &mut MeasureContext<'_>) -> Size {
        let font = cx.theme.font_bold.clone();
        let text = cx.text_with(&font, cx.theme.font_size, &self.caption);
        text.expand(cx.theme.button_padding)
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let rect = frame.rect();
        let theme = frame.theme().clone();
        let flags = frame.flags();
        let extent = frame.measure_text(&theme.font_bold, theme.font_size, &self.caption);
        let fill = if self.pushed {
            theme.button_fill_pushed
        } else {
            theme.button_fill
        };
        let border = if flags.focused {
            theme.focus_color
        } else {
            theme.border_color
        };
        let color = if flags.enabled {
            theme.text_color
        } else {
            theme.disabled_text_color
        };
        let pos = Point::new(
            (rect.size.width - extent.width) / 2.0,
            (rect.size.height - extent.height) / 2.0,
        );
        let p = frame.painter();
        p.fill_rect(rect, theme.corner_radius, fill);
        p.stroke_rect(rect, theme.corner_radius, 1.0, border);
        p.text(pos, &self.caption, &theme.font_bold, theme.font_size, color);
    }
}

impl HitTestable for Button {
    fn on_mouse_button(&mut self, event: &MouseButton, ctx: &mut dyn Context) -> EventOutcome {
        if event.button != MouseButtonCode::Left {
            return EventOutcome::Ignore;
        }
        if event.is_down() {
            let pushed = match self.kind {
                ButtonKind::Push => true,
                ButtonKind::Toggle => !self.pushed,
            };
            self.push(pushed, ctx);
            return EventOutcome::Handle;
        }
        match self.kind {
            ButtonKind::Push if self.pushed => {
                if ctx.rect().contains(event.pos) {
                    self.click(ctx);
                }
                self.push(false, ctx);
                EventOutcome::Handle
            }
            ButtonKind::Toggle if ctx.rect().contains(event.pos) => {
                self.click(ctx);
                EventOutcome::Handle
            }
            _ => EventOutcome::Ignore,
        }
    }
}

impl FocusAware for Button {
    fn accept_focus(&self) -> bool {
        true
    }

    fn on_key(&mut self, event: &KeyEvent, ctx: &mut dyn Context) -> EventOutcome {
        if !event.pressed || !matches!(event.key, Key::Space | Key::Enter) {
            return EventOutcome::Ignore;
        }
        if self.kind == ButtonKind::Toggle {
            self.push(!self.pushed, ctx);
        }
        self.click(ctx);
        EventOutcome::Handle
    }
}

impl Draggable for Button {}

impl Widget for Button {
    fn cursor(&self) -> Cursor {
        Cursor::Hand
    }
}
