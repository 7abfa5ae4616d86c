use std::{
    mem,
    time::{Duration, Instant},
};

use arbor_geom::{Margin, Point, Rect, Size};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::{
    core::{
        cursor::Cursor,
        error::{Error, fatal},
        event::{
            Event,
            key::{Key, KeyEvent, Mods},
            mouse::{Action, Button, Buttons, MouseButton, MouseMotion, Scroll},
        },
        focus::FocusManager,
        id::NodeId,
        layout::engine::LayoutPass,
        pointer::{DragState, PointerState},
        prerender::Prerenderer,
        render::{Frame, NodeFlags, Painter},
        text::FontCache,
        world::Core,
    },
    widget::EventOutcome,
};

/// Gap between a hovered widget and its tooltip.
const TOOLTIP_OFFSET: f32 = 15.0;
/// Padding around tooltip text.
const TOOLTIP_PADDING: f32 = 4.0;

/// Host-tunable canvas behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Device pixels per logical pixel, passed to the painter each frame.
    pub pixel_ratio: f32,
    /// Idle time over a widget before its tooltip shows.
    pub tooltip_delay_ms: u64,
    /// Buttons whose press starts a drag capture.
    pub drag_buttons: Vec<Button>,
    /// Unhandled Tab presses move focus between focusable widgets.
    pub tab_navigation: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            pixel_ratio: 1.0,
            tooltip_delay_ms: 500,
            drag_buttons: vec![Button::Left, Button::Right],
            tab_navigation: true,
        }
    }
}

/// The host-facing root of a widget tree.
///
/// The host translates native input into calls on the canvas. Each input
/// method returns `true` if some widget consumed the event. Once per frame
/// the host calls [`Canvas::perform_layout`] if the tree changed, then
/// [`Canvas::draw`].
pub struct Canvas {
    /// The widget arena.
    pub core: Core,
    /// Text measurement shared by layout and drawing.
    fonts: FontCache,
    /// Optional background chrome renderer.
    prerender: Option<Prerenderer>,
    /// Behaviour settings.
    config: CanvasConfig,
    /// Canvas extent in logical pixels.
    size: Size,
    /// Minimum extent reported by a `Minimum` root layout.
    window_min_size: Option<Size>,
    /// Last pointer position.
    mouse_pos: Point,
    /// Buttons currently held.
    buttons: Buttons,
    /// Modifiers from the last input event.
    mods: Mods,
    /// Cursor last requested from the host.
    cursor: Cursor,
    /// The cursor changed since the host last asked.
    cursor_dirty: bool,
    /// Something changed since the last draw.
    redraw: bool,
    /// Time of the last input event.
    last_interaction: Instant,
}

impl Canvas {
    /// Create a canvas of the given extent with an empty root.
    pub fn new(size: Size) -> Self {
        let mut core = Core::new();
        let root = core.root_id();
        core.set_size(root, size);
        Self {
            core,
            fonts: FontCache::default(),
            prerender: None,
            config: CanvasConfig::default(),
            size,
            window_min_size: None,
            mouse_pos: Point::ZERO,
            buttons: Buttons::empty(),
            mods: Mods::default(),
            cursor: Cursor::Arrow,
            cursor_dirty: false,
            redraw: true,
            last_interaction: Instant::now(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: CanvasConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the font cache, e.g. with one backed by real font metrics.
    pub fn with_fonts(mut self, fonts: FontCache) -> Self {
        self.fonts = fonts;
        self
    }

    /// Install or remove the background chrome renderer.
    pub fn set_prerenderer(&mut self, prerender: Option<Prerenderer>) {
        self.prerender = prerender;
    }

    /// The background chrome renderer.
    pub fn prerenderer(&self) -> Option<&Prerenderer> {
        self.prerender.as_ref()
    }

    /// Mutable access to the background chrome renderer.
    pub fn prerenderer_mut(&mut self) -> Option<&mut Prerenderer> {
        self.prerender.as_mut()
    }

    /// The configuration.
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Canvas extent.
    pub fn size(&self) -> Size {
        self.size
    }

    /// The root node.
    pub fn root_id(&self) -> NodeId {
        self.core.root_id()
    }

    /// The shared font cache.
    pub fn fonts_mut(&mut self) -> &mut FontCache {
        &mut self.fonts
    }

    /// Last pointer position.
    pub fn mouse_pos(&self) -> Point {
        self.mouse_pos
    }

    /// Buttons currently held.
    pub fn buttons(&self) -> Buttons {
        self.buttons
    }

    /// Modifiers from the last input event.
    pub fn mods(&self) -> Mods {
        self.mods
    }

    /// Drag and hover state.
    pub fn pointer_state(&self) -> PointerState {
        self.core.pointer_state()
    }

    /// Lay out the whole tree into the canvas extent.
    pub fn perform_layout(&mut self) {
        self.window_min_size = LayoutPass::new(&mut self.core, &mut self.fonts).run(self.size);
        if let Some(min) = self.window_min_size {
            self.size = self.size.max(min);
        }
        self.redraw = true;
    }

    /// Minimum window extent, if the root layout uses the `Minimum` policy.
    pub fn window_min_size(&self) -> Option<Size> {
        self.window_min_size
    }

    /// The host window changed size. An empty size, e.g. while minimised,
    /// is ignored.
    pub fn resize(&mut self, size: Size) -> bool {
        if size.is_empty() {
            trace!(?size, "ignoring empty resize");
            return false;
        }
        self.touch();
        self.size = size;
        self.perform_layout();
        true
    }

    /// Route a button press or release.
    pub fn mouse_button(&mut self, pos: Point, button: Button, pressed: bool, mods: Mods) -> bool {
        self.touch();
        self.mouse_pos = pos;
        self.mods = mods;
        if pressed {
            self.buttons.insert(button);
        } else {
            self.buttons.remove(button);
        }
        let event = MouseButton {
            pos,
            button,
            action: if pressed { Action::Down } else { Action::Up },
            mods,
        };

        if !self.modal_allows(pos) {
            if !pressed {
                self.end_drag(button);
            }
            return false;
        }
        let target = self.core.find_widget(pos);
        trace!(?pos, ?target, "hit test");
        let consumed = if pressed {
            match target {
                Some(target) => self.press(target, &event),
                None => false,
            }
        } else {
            self.release(target, &event)
        };
        self.settle();
        consumed
    }

    /// Press on `target`: start a drag, bubble, then move focus.
    ///
    /// The capture goes to the nearest enabled node at or above `target`,
    /// never the root.
    fn press(&mut self, target: NodeId, event: &MouseButton) -> bool {
        let root = self.core.root_id();
        let capture = self
            .core
            .ancestors(target)
            .into_iter()
            .take_while(|id| *id != root)
            .find(|id| self.core.is_enabled(*id));
        if let Some(capture) = capture
            && self.core.drag.is_none()
            && self.config.drag_buttons.contains(&event.button)
        {
            let drag = DragState {
                target: capture,
                button: event.button,
                mods: event.mods,
            };
            debug!(?drag, "drag start");
            self.core.drag = Some(drag);
        }

        let outcome = self
            .core
            .bubble(target, |w, ctx, origin| w.on_mouse_button(&event.relative_to(origin), ctx));
        let handler_focused = self.core.pending.focus.is_some();
        self.settle();

        let refocused = if handler_focused || !self.core.is_alive(target) {
            false
        } else {
            match self.core.nearest_focusable_ancestor(target) {
                Some(f) => self.core.set_focus(f),
                None => self.core.clear_focus(),
            }
        };
        outcome.consumed() || refocused
    }

    /// Release: the drag target hears it even off-target, then the widget
    /// under the pointer. The drag target hears it once, even when it is an
    /// ancestor of the widget under the pointer.
    fn release(&mut self, target: Option<NodeId>, event: &MouseButton) -> bool {
        let mut consumed = false;
        let mut heard = None;
        if let Some(drag) = self.core.drag
            && Some(drag.target) != target
        {
            heard = Some(drag.target);
            if self.core.is_enabled(drag.target) {
                consumed |= self
                    .core
                    .deliver(drag.target, |w, ctx, origin| {
                        w.on_mouse_button(&event.relative_to(origin), ctx)
                    })
                    .consumed();
            }
        }
        self.end_drag(event.button);
        if let Some(target) = target {
            consumed |= self
                .core
                .bubble_skipping(target, heard, |w, ctx, origin| {
                    w.on_mouse_button(&event.relative_to(origin), ctx)
                })
                .consumed();
        }
        consumed
    }

    /// End the drag if `button` started it.
    fn end_drag(&mut self, button: Button) {
        if let Some(drag) = self.core.drag
            && drag.button == button
        {
            debug!(?drag, "drag end");
            self.core.drag = None;
        }
    }

    /// Route pointer movement.
    pub fn mouse_motion(&mut self, pos: Point, delta: Point, buttons: Buttons, mods: Mods) -> bool {
        self.touch();
        self.mouse_pos = pos;
        self.buttons = buttons;
        self.mods = mods;
        let event = MouseMotion {
            pos,
            delta,
            buttons,
            mods,
        };

        if let Some(drag) = self.core.drag {
            if !self.core.is_enabled(drag.target) {
                return false;
            }
            let outcome = self
                .core
                .deliver(drag.target, |w, ctx, origin| w.on_drag(&event.relative_to(origin), ctx));
            self.settle();
            return outcome.consumed();
        }

        if !self.modal_allows(pos) {
            return false;
        }
        let target = self.core.find_widget(pos);
        trace!(?pos, ?target, "hit test");
        self.set_hovered(target);
        let Some(target) = target else {
            self.settle();
            return false;
        };
        let outcome = self
            .core
            .bubble(target, |w, ctx, origin| w.on_mouse_motion(&event.relative_to(origin), ctx));
        self.settle();
        outcome.consumed()
    }

    /// Route a scroll wheel event.
    pub fn mouse_scroll(&mut self, pos: Point, delta: Point) -> bool {
        self.touch();
        self.mouse_pos = pos;
        if !self.modal_allows(pos) {
            return false;
        }
        let Some(target) = self.core.find_widget(pos) else {
            return false;
        };
        trace!(?pos, ?target, "hit test");
        let event = Scroll { pos, delta };
        let outcome = self
            .core
            .bubble(target, |w, ctx, origin| w.on_scroll(&event.relative_to(origin), ctx));
        self.settle();
        outcome.consumed()
    }

    /// Route a key press or release along the focus path.
    pub fn key(&mut self, key: Key, pressed: bool, mods: Mods) -> bool {
        self.touch();
        self.mods = mods;
        let event = KeyEvent { key, pressed, mods };
        let outcome = self.along_focus_path(|w, ctx| w.on_key(&event, ctx));
        if outcome.consumed() {
            return true;
        }
        if pressed && key == Key::Tab && self.config.tab_navigation {
            let root = self.core.root_id();
            if mods.shift {
                self.core.focus_prev(root);
            } else {
                self.core.focus_next(root);
            }
            self.settle();
            self.redraw = true;
            return true;
        }
        false
    }

    /// Route a text input character along the focus path.
    pub fn text_input(&mut self, ch: char) -> bool {
        self.touch();
        self.along_focus_path(|w, ctx| w.on_text(ch, ctx)).consumed()
    }

    /// Route any [`Event`].
    pub fn event(&mut self, event: Event) -> bool {
        match event {
            Event::MouseButton(e) => self.mouse_button(e.pos, e.button, e.is_down(), e.mods),
            Event::MouseMotion(e) => self.mouse_motion(e.pos, e.delta, e.buttons, e.mods),
            Event::Scroll(e) => self.mouse_scroll(e.pos, e.delta),
            Event::Key(e) => self.key(e.key, e.pressed, e.mods),
            Event::Text(ch) => self.text_input(ch),
            Event::Resize(size) => self.resize(size),
        }
    }

    /// Deliver leaf to root along a snapshot of the focus path until a
    /// handler consumes.
    fn along_focus_path(
        &mut self,
        mut f: impl FnMut(&mut dyn crate::Widget, &mut dyn crate::Context) -> EventOutcome,
    ) -> EventOutcome {
        let path = self.core.focus_path().to_vec();
        for id in path {
            if !self.core.node(id).is_some_and(|n| n.enabled()) {
                continue;
            }
            let outcome = self.core.deliver(id, |w, ctx, _| f(w, ctx));
            self.settle();
            if outcome.consumed() {
                trace!(?id, ?outcome, "focus path consumed");
                return outcome;
            }
        }
        EventOutcome::Ignore
    }

    /// Focus a node from outside any handler.
    pub fn request_focus(&mut self, id: NodeId) -> bool {
        let changed = self.core.set_focus(id);
        self.settle();
        self.redraw |= changed;
        changed
    }

    /// Dispose a node and its subtree.
    pub fn dispose(&mut self, id: NodeId) {
        self.core.dispose(id);
        self.settle();
        self.redraw = true;
    }

    /// Center a node within its parent, laying out first if it has no size
    /// yet.
    pub fn center_window(&mut self, id: NodeId) {
        if self.core.get(id).size().is_empty() {
            self.perform_layout();
        }
        let size = self.core.get(id).size();
        let Some(parent) = self.core.parent(id) else {
            return;
        };
        let outer = self.core.get(parent).size();
        let pos = Point::new(
            (outer.width - size.width) / 2.0,
            (outer.height - size.height) / 2.0,
        );
        self.core.set_position(id, pos);
        self.redraw = true;
    }

    /// A cursor change for the host, if any since the last call.
    pub fn take_cursor_update(&mut self) -> Option<Cursor> {
        mem::take(&mut self.cursor_dirty).then_some(self.cursor)
    }

    /// The cursor the host should show.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Does the host need to call [`Canvas::draw`]?
    pub fn needs_redraw(&self) -> bool {
        self.redraw
    }

    /// Read and clear the redraw flag.
    pub fn take_redraw(&mut self) -> bool {
        mem::take(&mut self.redraw)
    }

    /// The tooltip to show now, if any.
    pub fn tooltip(&self) -> Option<(NodeId, &str)> {
        self.tooltip_at(Instant::now())
    }

    /// The tooltip to show at `now`: the hovered widget's, once the pointer
    /// has been idle for the configured delay.
    pub fn tooltip_at(&self, now: Instant) -> Option<(NodeId, &str)> {
        let delay = Duration::from_millis(self.config.tooltip_delay_ms);
        if now.saturating_duration_since(self.last_interaction) < delay {
            return None;
        }
        let id = self.core.hovered()?;
        let text = self.core.node(id)?.tooltip()?;
        Some((id, text))
    }

    /// Paint the tree back to front.
    pub fn draw(&mut self, painter: &mut dyn Painter) {
        if let Some(p) = self.prerender.as_mut() {
            p.poll();
            let core = &self.core;
            p.retain_nodes(painter, |id| core.is_alive(id));
        }
        painter.begin_frame(self.size, self.config.pixel_ratio);
        let root = self.core.root_id();
        self.draw_node(root, painter);
        self.draw_tooltip(painter);
        painter.end_frame();
        self.redraw = false;
    }

    /// Paint a node clipped to its rect, then its children on top.
    fn draw_node(&mut self, id: NodeId, painter: &mut dyn Painter) {
        let node = self.core.get(id);
        if !node.visible {
            return;
        }
        let rect = node.rect;
        let theme = node.theme;
        let scroll = node.scroll;
        let children = node.children.clone();
        let content = self.core.content_extent(id);
        let flags = NodeFlags {
            focused: node.focused,
            hovered: self.core.hovered == Some(id),
            enabled: node.enabled,
            dragging: self.core.drag.is_some_and(|d| d.target == id),
        };

        painter.save();
        painter.translate(rect.pos);
        painter.scissor(Rect::from_size(rect.size));
        let fonts = &mut self.fonts;
        let prerender = self.prerender.as_mut();
        self.core.with_widget_mut(id, |w, core| {
            let Some(theme) = core.themes.get(theme) else {
                fatal(Error::ThemeNotFound(theme));
            };
            let mut frame = Frame::new(&mut *painter, fonts, prerender, theme, id, rect.size, flags)
                .with_scroll(scroll, content);
            w.draw(&mut frame);
        });
        if scroll != Point::ZERO {
            painter.translate(-scroll);
        }
        for child in children {
            self.draw_node(child, painter);
        }
        painter.restore();
    }

    /// Paint the hovered widget's tooltip below it.
    fn draw_tooltip(&mut self, painter: &mut dyn Painter) {
        let Some((id, text)) = self.tooltip().map(|(id, t)| (id, t.to_string())) else {
            return;
        };
        let theme = self.core.node_theme(id);
        let extent = self
            .fonts
            .measure(&theme.font, theme.tooltip_font_size, &text);
        let anchor = self.core.absolute_rect(id);
        let pos = Point::new(
            anchor.pos.x + (anchor.size.width - extent.width) / 2.0,
            anchor.pos.y + anchor.size.height + TOOLTIP_OFFSET,
        );
        let bg = Rect::from_parts(pos, extent).outset(Margin::uniform(TOOLTIP_PADDING));
        painter.fill_rect(bg, theme.corner_radius, theme.tooltip_fill);
        painter.text(
            pos,
            &text,
            &theme.font,
            theme.tooltip_font_size,
            theme.tooltip_text_color,
        );
    }

    /// Apply queued handler requests and pick up redraw requests.
    fn settle(&mut self) {
        self.core.flush_pending();
        if mem::take(&mut self.core.pending.redraw) {
            self.redraw = true;
        }
    }

    /// Record an input event for tooltip timing.
    fn touch(&mut self) {
        self.last_interaction = Instant::now();
    }

    /// Update the hovered node, firing exit and enter.
    fn set_hovered(&mut self, target: Option<NodeId>) {
        let old = self.core.hovered;
        if old == target {
            return;
        }
        if let Some(old) = old {
            if let Some(node) = self.core.nodes.get_mut(old) {
                node.hovered = false;
            }
            self.core.deliver(old, |w, ctx, _| {
                w.on_mouse_exit(ctx);
                EventOutcome::Ignore
            });
        }
        self.core.hovered = target;
        if let Some(new) = target {
            if let Some(node) = self.core.nodes.get_mut(new) {
                node.hovered = true;
            }
            self.core.deliver(new, |w, ctx, _| {
                w.on_mouse_enter(ctx);
                EventOutcome::Ignore
            });
        }
        trace!(?old, ?target, "hover change");
        let cursor = target
            .and_then(|t| self.core.node(t))
            .map(|n| n.cursor())
            .unwrap_or_default();
        if cursor != self.cursor {
            self.cursor = cursor;
            self.cursor_dirty = true;
        }
        self.redraw = true;
    }

    /// Is `pos` inside the modal window at the top of the focus path, if
    /// there is one?
    fn modal_allows(&self, pos: Point) -> bool {
        let path = self.core.focus_path();
        if path.len() < 2 {
            return true;
        }
        let top = path[path.len() - 2];
        if self.core.get(top).is_modal() && !self.core.absolute_rect(top).contains(pos) {
            warn!(?top, ?pos, "modal window discarded event");
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::event::key,
        error::Result,
        layout::{Layout, SizePolicy},
        testing::{
            RecordingPainter,
            painter::DrawCommand,
            probe::{self, Probe},
        },
    };

    fn place(canvas: &mut Canvas, parent: NodeId, probe: Probe, rect: Rect) -> NodeId {
        let id = canvas.core.push_child(parent, probe);
        canvas.core.set_position(id, rect.pos);
        canvas.core.set_size(id, rect.size);
        id
    }

    #[test]
    fn overlapping_siblings_later_wins() {
        let mut c = Canvas::new(Size::new(200.0, 200.0));
        let root = c.root_id();
        let a = place(&mut c, root, Probe::new("a"), Rect::new(0.0, 0.0, 100.0, 100.0));
        let b = place(&mut c, root, Probe::new("b"), Rect::new(50.0, 50.0, 100.0, 100.0));
        assert_eq!(c.core.find_widget(Point::new(75.0, 75.0)), Some(b));
        assert_eq!(c.core.find_widget(Point::new(25.0, 25.0)), Some(a));
        probe::reset();
        c.mouse_motion(Point::new(75.0, 75.0), Point::ZERO, Buttons::empty(), key::Empty);
        assert_eq!(probe::events(), vec!["b:enter", "b:motion"]);
    }

    #[test]
    fn positions_relative_to_parent() {
        let mut c = Canvas::new(Size::new(200.0, 200.0));
        let root = c.root_id();
        let w = place(&mut c, root, Probe::new("w"), Rect::new(20.0, 30.0, 100.0, 100.0));
        let l = place(&mut c, w, Probe::new("l").consuming(), Rect::new(5.0, 5.0, 20.0, 20.0));
        assert!(c.mouse_button(Point::new(30.0, 40.0), Button::Middle, true, key::Empty));
        // Relative to `w`, the parent of `l`.
        assert_eq!(
            c.core.widget::<Probe>(l).and_then(|p| p.last_pos()),
            Some(Point::new(10.0, 10.0))
        );
    }

    #[test]
    fn drag_captures_until_matching_release() {
        let mut c = Canvas::new(Size::new(200.0, 200.0));
        let root = c.root_id();
        let a = place(&mut c, root, Probe::new("a"), Rect::new(0.0, 0.0, 50.0, 50.0));
        place(&mut c, root, Probe::new("b"), Rect::new(100.0, 100.0, 50.0, 50.0));

        c.mouse_button(Point::new(10.0, 10.0), Button::Left, true, key::Empty);
        assert_eq!(c.core.drag_state().map(|d| d.target), Some(a));
        // A second button never moves the capture.
        c.mouse_button(Point::new(120.0, 120.0), Button::Right, true, key::Empty);
        assert_eq!(c.core.drag_state().map(|d| d.target), Some(a));
        c.mouse_button(Point::new(120.0, 120.0), Button::Right, false, key::Empty);
        assert_eq!(c.core.drag_state().map(|d| d.target), Some(a));

        probe::reset();
        c.mouse_motion(
            Point::new(120.0, 120.0),
            Point::new(3.0, 4.0),
            Buttons::from(Button::Left),
            key::Empty,
        );
        assert_eq!(probe::events(), vec!["a:drag"]);

        probe::reset();
        c.mouse_button(Point::new(120.0, 120.0), Button::Left, false, key::Empty);
        assert_eq!(probe::events(), vec!["a:up", "b:up"]);
        // Hover only changes on motion.
        assert_eq!(c.pointer_state(), PointerState::Idle);
    }

    #[test]
    fn press_on_root_starts_no_drag_and_clears_focus() {
        let mut c = Canvas::new(Size::new(200.0, 200.0));
        let root = c.root_id();
        let f = place(&mut c, root, Probe::new("f").focusable(), Rect::new(0.0, 0.0, 50.0, 50.0));
        c.mouse_button(Point::new(10.0, 10.0), Button::Left, true, key::Empty);
        assert_eq!(c.core.focused(), Some(f));
        c.mouse_button(Point::new(10.0, 10.0), Button::Left, false, key::Empty);

        c.mouse_button(Point::new(150.0, 150.0), Button::Left, true, key::Empty);
        assert!(c.core.drag_state().is_none());
        assert!(c.core.focus_path().is_empty());
    }

    #[test]
    fn drag_target_hears_release_once() {
        let mut c = Canvas::new(Size::new(200.0, 200.0));
        let root = c.root_id();
        let w = place(&mut c, root, Probe::new("w"), Rect::new(0.0, 0.0, 100.0, 100.0));
        place(&mut c, w, Probe::new("lbl"), Rect::new(50.0, 50.0, 20.0, 20.0));

        c.mouse_button(Point::new(10.0, 10.0), Button::Left, true, key::Empty);
        assert_eq!(c.core.drag_state().map(|d| d.target), Some(w));
        probe::reset();
        // Released over a child of the drag target.
        c.mouse_button(Point::new(55.0, 55.0), Button::Left, false, key::Empty);
        assert_eq!(probe::events(), vec!["w:up", "lbl:up"]);
        assert!(c.core.drag_state().is_none());
    }

    #[test]
    fn disabled_nodes_never_hold_the_drag() {
        let mut c = Canvas::new(Size::new(200.0, 200.0));
        let root = c.root_id();
        let w = place(&mut c, root, Probe::new("w"), Rect::new(0.0, 0.0, 100.0, 100.0));
        let d = place(&mut c, w, Probe::new("d"), Rect::new(10.0, 10.0, 20.0, 20.0));
        c.core.set_enabled(d, false);

        probe::reset();
        c.mouse_button(Point::new(15.0, 15.0), Button::Left, true, key::Empty);
        assert_eq!(c.core.drag_state().map(|dr| dr.target), Some(w));
        c.mouse_motion(
            Point::new(40.0, 40.0),
            Point::new(25.0, 25.0),
            Buttons::from(Button::Left),
            key::Empty,
        );
        assert_eq!(probe::events(), vec!["w:down", "w:drag"]);
        c.mouse_button(Point::new(40.0, 40.0), Button::Left, false, key::Empty);

        // Nothing enabled between the target and the root.
        c.core.set_enabled(w, false);
        c.mouse_button(Point::new(15.0, 15.0), Button::Left, true, key::Empty);
        assert!(c.core.drag_state().is_none());
    }

    #[test]
    fn keys_follow_focus_path() {
        let mut c = Canvas::new(Size::new(200.0, 200.0));
        let root = c.root_id();
        let w = place(&mut c, root, Probe::new("w").consuming(), Rect::new(0.0, 0.0, 100.0, 100.0));
        let t = place(&mut c, w, Probe::new("t").focusable(), Rect::new(0.0, 0.0, 10.0, 10.0));
        c.request_focus(t);
        probe::reset();
        assert!(c.key(Key::Char('x'), true, key::Empty));
        assert!(c.text_input('x'));
        assert_eq!(
            probe::events(),
            vec!["t:key", "w:key", "t:text", "w:text"]
        );
    }

    #[test]
    fn tab_cycles_focus() {
        let mut c = Canvas::new(Size::new(200.0, 200.0));
        let root = c.root_id();
        let a = place(&mut c, root, Probe::new("a").focusable(), Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = place(&mut c, root, Probe::new("b").focusable(), Rect::new(20.0, 0.0, 10.0, 10.0));
        assert!(c.key(Key::Tab, true, key::Empty));
        assert_eq!(c.core.focused(), Some(a));
        c.key(Key::Tab, true, key::Empty);
        assert_eq!(c.core.focused(), Some(b));
        c.key(Key::Tab, true, key::Shift);
        assert_eq!(c.core.focused(), Some(a));

        let mut c = c.with_config(CanvasConfig {
            tab_navigation: false,
            ..CanvasConfig::default()
        });
        assert!(!c.key(Key::Tab, true, key::Empty));
    }

    #[test]
    fn modal_discards_outside_events() {
        let mut c = Canvas::new(Size::new(300.0, 300.0));
        let root = c.root_id();
        let behind = place(&mut c, root, Probe::new("behind"), Rect::new(0.0, 0.0, 300.0, 300.0));
        let m = place(
            &mut c,
            root,
            Probe::new("m").modal().focusable(),
            Rect::new(100.0, 100.0, 100.0, 100.0),
        );
        let inner = place(
            &mut c,
            m,
            Probe::new("inner").focusable(),
            Rect::new(0.0, 0.0, 10.0, 10.0),
        );
        c.request_focus(inner);
        probe::reset();
        assert!(!c.mouse_button(Point::new(10.0, 10.0), Button::Left, true, key::Empty));
        assert!(!c.mouse_scroll(Point::new(10.0, 10.0), Point::new(0.0, 1.0)));
        assert!(c.core.drag_state().is_none());
        assert!(probe::events().is_empty());
        assert_eq!(c.core.focused(), Some(inner));
        // The hit test still finds the node behind; routing discards it.
        assert_eq!(c.core.find_widget(Point::new(10.0, 10.0)), Some(behind));

        c.mouse_button(Point::new(150.0, 150.0), Button::Left, true, key::Empty);
        assert_eq!(c.core.drag_state().map(|d| d.target), Some(m));
        assert_eq!(c.core.focused(), Some(m));
        // A release outside the modal is discarded but still ends the drag.
        assert!(!c.mouse_button(Point::new(10.0, 10.0), Button::Left, false, key::Empty));
        assert!(c.core.drag_state().is_none());
    }

    #[test]
    fn dispose_drag_target_resumes_hit_testing() {
        let mut c = Canvas::new(Size::new(200.0, 200.0));
        let root = c.root_id();
        let a = place(&mut c, root, Probe::new("a"), Rect::new(0.0, 0.0, 50.0, 50.0));
        place(&mut c, root, Probe::new("b"), Rect::new(100.0, 100.0, 50.0, 50.0));
        c.mouse_button(Point::new(10.0, 10.0), Button::Left, true, key::Empty);
        c.dispose(a);
        assert!(c.core.drag_state().is_none());
        probe::reset();
        c.mouse_motion(
            Point::new(110.0, 110.0),
            Point::ZERO,
            Buttons::from(Button::Left),
            key::Empty,
        );
        assert_eq!(probe::events(), vec!["b:enter", "b:motion"]);
    }

    #[test]
    fn hover_updates_cursor_once() {
        let mut c = Canvas::new(Size::new(200.0, 200.0));
        let root = c.root_id();
        place(
            &mut c,
            root,
            Probe::new("a").with_cursor(Cursor::Hand),
            Rect::new(0.0, 0.0, 50.0, 50.0),
        );
        c.mouse_motion(Point::new(5.0, 5.0), Point::ZERO, Buttons::empty(), key::Empty);
        assert_eq!(c.take_cursor_update(), Some(Cursor::Hand));
        c.mouse_motion(Point::new(6.0, 5.0), Point::ZERO, Buttons::empty(), key::Empty);
        assert_eq!(c.take_cursor_update(), None);
        c.mouse_motion(Point::new(150.0, 5.0), Point::ZERO, Buttons::empty(), key::Empty);
        assert_eq!(c.take_cursor_update(), Some(Cursor::Arrow));
    }

    #[test]
    fn resize_relayouts() {
        let mut c = Canvas::new(Size::new(100.0, 100.0));
        let root = c.root_id();
        c.core.set_layout(root, Some(Layout::vertical().with_policy(SizePolicy::Maximum)));
        let a = c.core.push_child(root, Probe::new("a").sized(10.0, 10.0));
        assert!(!c.resize(Size::new(0.0, 40.0)));
        assert!(c.resize(Size::new(60.0, 40.0)));
        assert_eq!(c.core.node(a).unwrap().rect(), Rect::new(0.0, 0.0, 60.0, 40.0));
        assert!(c.take_redraw());
        assert!(!c.needs_redraw());
    }

    #[test]
    fn tooltip_after_delay() {
        let mut c = Canvas::new(Size::new(200.0, 200.0)).with_config(CanvasConfig {
            tooltip_delay_ms: 1000,
            ..CanvasConfig::default()
        });
        let root = c.root_id();
        let a = place(&mut c, root, Probe::new("a"), Rect::new(0.0, 0.0, 50.0, 50.0));
        c.core.set_tooltip(a, Some("hello"));
        c.mouse_motion(Point::new(5.0, 5.0), Point::ZERO, Buttons::empty(), key::Empty);
        assert!(c.tooltip().is_none());
        let later = Instant::now() + Duration::from_secs(2);
        assert_eq!(c.tooltip_at(later), Some((a, "hello")));
    }

    #[test]
    fn draw_order_and_visibility() -> Result<()> {
        let mut c = Canvas::new(Size::new(200.0, 200.0));
        let root = c.root_id();
        let a = place(&mut c, root, Probe::new("a"), Rect::new(10.0, 10.0, 50.0, 50.0));
        place(&mut c, a, Probe::new("a1"), Rect::new(5.0, 5.0, 10.0, 10.0));
        let h = place(&mut c, root, Probe::new("h"), Rect::new(0.0, 0.0, 50.0, 50.0));
        place(&mut c, root, Probe::new("b"), Rect::new(100.0, 100.0, 20.0, 20.0));
        c.core.set_visible(h, false);

        let mut painter = RecordingPainter::new();
        c.draw(&mut painter);
        assert_eq!(painter.frames(), 1);
        assert_eq!(painter.texts(), vec!["a", "a1", "b"]);
        assert_eq!(
            painter.fills(),
            vec![
                Rect::new(10.0, 10.0, 50.0, 50.0),
                Rect::new(15.0, 15.0, 10.0, 10.0),
                Rect::new(100.0, 100.0, 20.0, 20.0),
            ]
        );
        assert!(painter.balanced());
        assert!(matches!(painter.commands().first(), Some(DrawCommand::BeginFrame { .. })));
        assert!(!c.needs_redraw());
        Ok(())
    }
}
