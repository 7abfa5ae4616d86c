use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use arbor::{
    Canvas, Context, NodeId,
    event::{
        Event,
        key::{Empty, Key, KeyEvent},
        mouse::{Action, Button as MouseCode, Buttons, MouseButton, MouseMotion, Scroll},
    },
    geom::{Margin, Point, Size},
    layout::{Layout, SizePolicy},
    widgets::{Button, CheckBox, Label, ScrollPanel, TextBox, Window},
};
use rand::{Rng, rngs::StdRng};
use tracing::{info, warn};

/// Application-level actions taken by the scene's callbacks.
pub type Journal = Rc<RefCell<Vec<String>>>;

/// Largest accepted brush size.
const MAX_BRUSH: u32 = 64;
/// Visible height of the layer list.
const LAYER_LIST_HEIGHT: f32 = 60.0;

/// A paint program's tool palette: a tools window, a layers window and a
/// modal welcome dialog that starts focused.
pub struct Toolbox {
    /// Tools window.
    pub tools: NodeId,
    /// Brush size entry.
    pub brush: NodeId,
    /// Snap toggle.
    pub snap: NodeId,
    /// Button that deletes the layers window.
    pub delete: NodeId,
    /// Layers window.
    pub layers: NodeId,
    /// Scrolling list of layer names.
    pub layer_list: NodeId,
    /// Modal welcome dialog.
    pub welcome: NodeId,
    /// Button that dismisses the dialog.
    pub ok: NodeId,
    /// Actions taken so far.
    pub journal: Journal,
    /// Last accepted brush size.
    pub brush_size: Rc<Cell<u32>>,
}

/// A window with a vertical layout sized to its content.
fn window(canvas: &mut Canvas, window: Window, pos: Point) -> NodeId {
    let root = canvas.root_id();
    let id = canvas.core.push_child(root, window);
    canvas.core.set_layout(
        id,
        Some(
            Layout::vertical()
                .with_policy(SizePolicy::Minimum)
                .with_inner_margin(Margin::uniform(8.0))
                .with_spacing(6.0),
        ),
    );
    canvas.core.set_position(id, pos);
    id
}

/// Record an action.
fn note(journal: &Journal, what: String) {
    info!(action = %what, "toolbox");
    journal.borrow_mut().push(what);
}

impl Toolbox {
    /// Build the scene, lay it out and focus the welcome dialog.
    pub fn build(canvas: &mut Canvas) -> Self {
        let journal: Journal = Rc::default();
        let brush_size = Rc::new(Cell::new(10));

        let layers = window(canvas, Window::new("Layers"), Point::new(260.0, 40.0));
        let layer_list = canvas.core.push_child(layers, ScrollPanel::new());
        canvas.core.set_layout(layer_list, Some(ScrollPanel::layout()));
        canvas
            .core
            .set_fixed_size(layer_list, Size::new(0.0, LAYER_LIST_HEIGHT));
        for name in ["Background", "Sketch", "Ink", "Shading", "Highlights", "Notes"] {
            canvas.core.push_child(layer_list, Label::new(name));
        }

        let tools = window(canvas, Window::new("Tools"), Point::new(20.0, 20.0));
        canvas.core.push_child(tools, Label::new("Brush size"));
        let (log, size) = (journal.clone(), brush_size.clone());
        let brush = canvas.core.push_child(
            tools,
            TextBox::new(&brush_size.get().to_string())
                .with_placeholder("1-64")
                .on_commit(move |text, _| match text.trim().parse::<u32>() {
                    Ok(n) if (1..=MAX_BRUSH).contains(&n) => {
                        if size.replace(n) != n {
                            note(&log, format!("brush size {n}"));
                        }
                        true
                    }
                    _ => {
                        warn!(text, "rejected brush size");
                        false
                    }
                }),
        );
        canvas.core.set_tooltip(brush, Some("Brush diameter in pixels"));
        let log = journal.clone();
        let snap = canvas.core.push_child(
            tools,
            CheckBox::new("Snap to grid").on_change(move |on, _| {
                note(&log, format!("snap {}", if on { "on" } else { "off" }));
            }),
        );
        let log = journal.clone();
        let delete = canvas.core.push_child(
            tools,
            Button::new("Delete layers").on_click(move |ctx: &mut dyn Context| {
                note(&log, "layers deleted".into());
                ctx.dispose(layers);
            }),
        );

        let welcome = window(canvas, Window::modal("Welcome"), Point::ZERO);
        canvas.core.push_child(welcome, Label::new("Pick a brush to begin."));
        let log = journal.clone();
        let ok = canvas.core.push_child(
            welcome,
            Button::new("OK").on_click(move |ctx: &mut dyn Context| {
                note(&log, "welcome dismissed".into());
                ctx.dispose(welcome);
            }),
        );

        canvas.perform_layout();
        canvas.center_window(welcome);
        canvas.request_focus(welcome);

        Self {
            tools,
            brush,
            snap,
            delete,
            layers,
            layer_list,
            welcome,
            ok,
            journal,
            brush_size,
        }
    }

    /// A session that exercises modality, scrolling, window dragging, text
    /// entry, keyboard focus and disposal.
    pub fn script(&self) -> Vec<Step> {
        vec![
            // Discarded: the welcome dialog is modal.
            Step::Click(self.delete),
            Step::Click(self.ok),
            Step::Wheel(self.layer_list, 1.0),
            Step::DragHeader {
                window: self.tools,
                by: Point::new(30.0, 15.0),
            },
            Step::Click(self.brush),
            Step::Key(Key::Backspace),
            Step::Key(Key::Backspace),
            Step::Type("42".into()),
            Step::Key(Key::Enter),
            Step::Key(Key::Tab),
            Step::Key(Key::Space),
            Step::Click(self.delete),
        ]
    }

    /// Actions recorded so far.
    pub fn actions(&self) -> Vec<String> {
        self.journal.borrow().clone()
    }
}

/// One user gesture, resolved against the live tree when it runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Move to the centre of a node and click the primary button.
    Click(NodeId),
    /// Drag a window by its title header.
    DragHeader {
        /// Window to move.
        window: NodeId,
        /// Offset to drag by.
        by: Point,
    },
    /// Turn the wheel over the centre of a node.
    Wheel(NodeId, f32),
    /// Press and release a key.
    Key(Key),
    /// Type characters.
    Type(String),
}

impl Step {
    /// Host events for this step. Steps aimed at disposed nodes produce
    /// nothing.
    pub fn events(&self, canvas: &Canvas) -> Vec<Event> {
        let from = canvas.mouse_pos();
        match self {
            Self::Click(id) => {
                if !canvas.core.is_alive(*id) {
                    warn!(?id, "click target is gone");
                    return Vec::new();
                }
                let at = canvas.core.absolute_rect(*id).center();
                vec![
                    motion(from, at, Buttons::empty()),
                    button(at, true),
                    button(at, false),
                ]
            }
            Self::Wheel(id, by) => {
                if !canvas.core.is_alive(*id) {
                    warn!(?id, "wheel target is gone");
                    return Vec::new();
                }
                let at = canvas.core.absolute_rect(*id).center();
                vec![
                    motion(from, at, Buttons::empty()),
                    Event::Scroll(Scroll {
                        pos: at,
                        delta: Point::new(0.0, *by),
                    }),
                ]
            }
            Self::DragHeader { window, by } => {
                if !canvas.core.is_alive(*window) {
                    warn!(?window, "drag target is gone");
                    return Vec::new();
                }
                let header = canvas.core.node_theme(*window).window_header_height;
                let grab = canvas.core.absolute_position(*window) + Point::new(20.0, header / 2.0);
                let to = grab + *by;
                let held = Buttons::empty().with(MouseCode::Left);
                vec![
                    motion(from, grab, Buttons::empty()),
                    button(grab, true),
                    motion(grab, to, held),
                    button(to, false),
                ]
            }
            Self::Key(key) => vec![
                Event::Key(KeyEvent::press(*key)),
                Event::Key(KeyEvent {
                    pressed: false,
                    ..KeyEvent::press(*key)
                }),
            ],
            Self::Type(text) => text.chars().map(Event::Text).collect(),
        }
    }
}

/// Pointer movement from `from` to `to`.
fn motion(from: Point, to: Point, buttons: Buttons) -> Event {
    Event::MouseMotion(MouseMotion {
        pos: to,
        delta: to - from,
        buttons,
        mods: Empty,
    })
}

/// Primary button press or release.
fn button(pos: Point, pressed: bool) -> Event {
    Event::MouseButton(MouseButton {
        pos,
        button: MouseCode::Left,
        action: if pressed { Action::Down } else { Action::Up },
        mods: Empty,
    })
}

/// Random clicks and moves across the canvas.
pub fn random_events(canvas: &Canvas, rng: &mut StdRng, count: usize) -> Vec<Event> {
    let size = canvas.size();
    let mut last = canvas.mouse_pos();
    let mut out = Vec::with_capacity(count * 2);
    for _ in 0..count {
        let at = Point::new(
            rng.random_range(0.0..size.width.max(1.0)),
            rng.random_range(0.0..size.height.max(1.0)),
        );
        out.push(motion(last, at, Buttons::empty()));
        if rng.random_bool(0.5) {
            out.push(button(at, true));
            out.push(button(at, false));
        }
        last = at;
    }
    out
}

/// Feed events to the canvas. Returns how many were consumed.
pub fn run(canvas: &mut Canvas, events: &[Event]) -> usize {
    events.iter().filter(|e| canvas.event(**e)).count()
}
