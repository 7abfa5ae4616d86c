use std::collections::HashMap;

use arbor_geom::{Axis, Margin, Point, Rect, Size};
use tracing::debug;

use super::{Alignment, Anchor, CellAlign, Layout, LayoutKind, SizePolicy};
use crate::{
    core::{
        error::{Error, fatal},
        id::NodeId,
        text::FontCache,
        world::Core,
    },
    widget::MeasureContext,
};

/// One layout run: bottom-up natural sizes, then top-down placement.
///
/// Natural sizes are memoised for the lifetime of the pass and never read
/// previously assigned rects, so running a pass twice without mutation
/// assigns identical rects.
pub(crate) struct LayoutPass<'a> {
    /// Arena being laid out.
    core: &'a mut Core,
    /// Text measurement.
    fonts: &'a mut FontCache,
    /// Memoised natural sizes.
    natural: HashMap<NodeId, Size>,
}

impl<'a> LayoutPass<'a> {
    /// Start a pass.
    pub(crate) fn new(core: &'a mut Core, fonts: &'a mut FontCache) -> Self {
        Self {
            core,
            fonts,
            natural: HashMap::new(),
        }
    }

    /// Lay out the whole tree into a canvas of `size`.
    ///
    /// Returns the minimum window extent when the root layout uses
    /// [`SizePolicy::Minimum`]; the root rect never shrinks below it.
    pub(crate) fn run(&mut self, size: Size) -> Option<Size> {
        let root = self.core.root;
        let mut size = size;
        let mut min = None;
        if let Some(layout) = self.core.get(root).layout {
            match layout.size_policy() {
                SizePolicy::Inherit => fatal(Error::UnresolvedPolicy(root)),
                SizePolicy::Minimum => {
                    let natural = self.computed_size(root);
                    size = size.max(natural);
                    min = Some(natural);
                }
                SizePolicy::Maximum | SizePolicy::Freeform => {}
            }
        }
        let node = self.core.get_mut(root);
        node.rect = Rect::from_parts(node.rect.pos, size);
        self.apply(root, None);
        debug!(?size, ?min, measured = self.natural.len(), "layout pass");
        min
    }

    /// Natural size of a node: its preferred size, grown to fit its
    /// children when it has a layout, then overridden per axis by its fixed
    /// size.
    pub(crate) fn computed_size(&mut self, id: NodeId) -> Size {
        if let Some(s) = self.natural.get(&id) {
            return *s;
        }
        let layout = self.core.get(id).layout;
        let children = self.visible_children(id);
        let content = layout.map(|l| self.layout_natural(&l, &children));
        let preferred = self.preferred(id);
        let size = match content {
            Some(c) => c.expand(self.insets(id)).max(preferred),
            None => preferred,
        };
        let size = self.core.get(id).fixed_size.or(size);
        self.natural.insert(id, size);
        size
    }

    /// The widget's own preferred size.
    fn preferred(&mut self, id: NodeId) -> Size {
        let core = &*self.core;
        let node = core.get(id);
        let Some(widget) = node.widget.as_deref() else {
            return Size::ZERO;
        };
        let Some(theme) = core.themes.get(node.theme) else {
            fatal(Error::ThemeNotFound(node.theme));
        };
        let mut cx = MeasureContext {
            fonts: &mut *self.fonts,
            theme,
        };
        widget.preferred_size(&mut cx)
    }

    /// Space the widget reserves around its children.
    fn insets(&self, id: NodeId) -> Margin {
        let node = self.core.get(id);
        match (node.widget.as_deref(), self.core.themes.get(node.theme)) {
            (Some(w), Some(theme)) => w.content_insets(theme),
            _ => Margin::ZERO,
        }
    }

    /// Visible children in order.
    fn visible_children(&self, id: NodeId) -> Vec<NodeId> {
        self.core
            .get(id)
            .children
            .iter()
            .copied()
            .filter(|c| self.core.get(*c).visible)
            .collect()
    }

    /// Extent of a layout's children block, margins included.
    fn layout_natural(&mut self, layout: &Layout, children: &[NodeId]) -> Size {
        let sizes: Vec<Size> = children.iter().map(|c| self.computed_size(*c)).collect();
        let spacing = layout.spacing();
        let body = match layout.kind() {
            LayoutKind::Box(alignment) => match alignment.axis() {
                Some(axis) => {
                    let main = sizes.iter().map(|s| s.main(axis)).sum::<f32>()
                        + gaps(spacing, sizes.len());
                    let cross = sizes.iter().fold(0.0_f32, |m, s| m.max(s.cross(axis)));
                    Size::from_main_cross(axis, main, cross)
                }
                None => sizes.iter().fold(Size::ZERO, |m, s| m.max(*s)),
            },
            LayoutKind::Grid { columns } => {
                let plan = GridPlan::new(self.core, children, columns);
                let cols = plan.natural_tracks(Axis::Horizontal, &sizes, spacing);
                let rows = plan.natural_tracks(Axis::Vertical, &sizes, spacing);
                Size::new(
                    cols.iter().sum::<f32>() + gaps(spacing, cols.len()),
                    rows.iter().sum::<f32>() + gaps(spacing, rows.len()),
                )
            }
        };
        body.expand(layout.margins())
    }

    /// Place the children of `id`, then recurse.
    fn apply(&mut self, id: NodeId, inherited: Option<SizePolicy>) {
        let node = self.core.get(id);
        let layout = node.layout;
        let rect = node.rect;
        let children = self.visible_children(id);
        let Some(layout) = layout else {
            for c in &children {
                let s = self.computed_size(*c);
                self.core.get_mut(*c).rect.size = s;
            }
            self.clamp_scroll(id);
            for c in children {
                self.apply(c, inherited);
            }
            return;
        };

        let policy = match layout.size_policy() {
            SizePolicy::Inherit => match inherited {
                Some(p) => p,
                None => fatal(Error::UnresolvedPolicy(id)),
            },
            p => p,
        };
        let content = Rect::from_size(rect.size).inset(self.insets(id) + layout.margins());
        match layout.kind() {
            LayoutKind::Box(alignment) => {
                self.place_box(&layout, alignment, policy, content, &children);
            }
            LayoutKind::Grid { columns } => {
                self.place_grid(&layout, columns, policy, content, &children);
            }
        }
        self.clamp_scroll(id);
        for c in children {
            self.apply(c, Some(policy));
        }
    }

    /// Pull a scrolled node's offset back inside its new content.
    fn clamp_scroll(&mut self, id: NodeId) {
        let scroll = self.core.get(id).scroll;
        if scroll != Point::ZERO {
            self.core.set_scroll_offset(id, scroll);
        }
    }

    /// Does the child opt out of stretching with a freeform layout of its
    /// own?
    fn is_freeform(&self, id: NodeId, parent_policy: SizePolicy) -> bool {
        match self.core.get(id).layout.map(|l| l.size_policy()) {
            Some(SizePolicy::Inherit) => parent_policy == SizePolicy::Freeform,
            Some(p) => p == SizePolicy::Freeform,
            None => false,
        }
    }

    /// Stretch weight of a child under `policy`; 0 keeps natural size.
    fn weight(&self, id: NodeId, policy: SizePolicy) -> f32 {
        if policy == SizePolicy::Freeform || self.is_freeform(id, policy) {
            0.0
        } else {
            self.core.get(id).stretch
        }
    }

    /// Set a child's rect.
    fn set_rect(&mut self, id: NodeId, rect: Rect) {
        self.core.get_mut(id).rect = rect;
    }

    /// Box placement along one axis, or overlapping for no axis.
    fn place_box(
        &mut self,
        layout: &Layout,
        alignment: Alignment,
        policy: SizePolicy,
        content: Rect,
        children: &[NodeId],
    ) {
        let naturals: Vec<Size> = children.iter().map(|c| self.computed_size(*c)).collect();
        let fills: Vec<bool> = children
            .iter()
            .map(|c| policy != SizePolicy::Freeform && !self.is_freeform(*c, policy))
            .collect();

        let Some(axis) = alignment.axis() else {
            for (i, c) in children.iter().enumerate() {
                let rect = if fills[i] && self.weight(*c, policy) > 0.0 {
                    content
                } else if policy == SizePolicy::Freeform {
                    Rect::from_parts(self.core.get(*c).rect.pos, naturals[i])
                } else {
                    Rect::from_parts(content.pos, naturals[i])
                };
                self.set_rect(*c, rect);
            }
            return;
        };

        let mains: Vec<f32> = if policy == SizePolicy::Freeform {
            naturals.iter().map(|n| n.main(axis)).collect()
        } else {
            let items: Vec<(f32, f32)> = children
                .iter()
                .zip(&naturals)
                .map(|(c, n)| (n.main(axis), self.weight(*c, policy)))
                .collect();
            distribute(content.size.main(axis), &items)
        };

        let mut cursor = 0.0;
        for (i, c) in children.iter().enumerate() {
            let cross = if fills[i] {
                content.size.cross(axis)
            } else {
                naturals[i].cross(axis)
            };
            let pos = content.pos + Point::from_main_cross(axis, cursor, 0.0);
            self.set_rect(
                *c,
                Rect::from_parts(pos, Size::from_main_cross(axis, mains[i], cross)),
            );
            cursor += mains[i] + layout.spacing();
        }
    }

    /// Grid placement: size the tracks, then fit each child to its cell.
    fn place_grid(
        &mut self,
        layout: &Layout,
        columns: usize,
        policy: SizePolicy,
        content: Rect,
        children: &[NodeId],
    ) {
        let naturals: Vec<Size> = children.iter().map(|c| self.computed_size(*c)).collect();
        let weights: Vec<f32> = children.iter().map(|c| self.weight(*c, policy)).collect();
        let plan = GridPlan::new(self.core, children, columns);
        let spacing = layout.spacing();

        let mut tracks = [Axis::Horizontal, Axis::Vertical].map(|axis| {
            let natural = plan.natural_tracks(axis, &naturals, spacing);
            if policy == SizePolicy::Freeform {
                return natural;
            }
            let w = plan.track_weights(axis, &weights);
            let items: Vec<(f32, f32)> = natural.into_iter().zip(w).collect();
            distribute(content.size.main(axis), &items)
        });
        let [cols, rows] = &mut tracks;
        let col_off = offsets(cols, spacing);
        let row_off = offsets(rows, spacing);

        for (i, c) in children.iter().enumerate() {
            let a = plan.anchors[i];
            let cell = Rect::new(
                content.pos.x + col_off[a.column],
                content.pos.y + row_off[a.row],
                span_extent(cols, a.column, a.column_span, spacing),
                span_extent(rows, a.row, a.row_span, spacing),
            );
            let freeform = policy == SizePolicy::Freeform || self.is_freeform(*c, policy);
            let fit = |align: CellAlign| match align {
                CellAlign::Fill if freeform => CellAlign::Start,
                a => a,
            };
            let natural = naturals[i];
            let (x, w) = align_in(cell.pos.x, cell.size.width, natural.width, fit(a.horizontal));
            let (y, h) = align_in(cell.pos.y, cell.size.height, natural.height, fit(a.vertical));
            self.set_rect(*c, Rect::new(x, y, w, h));
        }
    }
}

/// Total spacing between `n` adjacent items.
fn gaps(spacing: f32, n: usize) -> f32 {
    spacing * n.saturating_sub(1) as f32
}

/// Start offset of each track.
fn offsets(tracks: &[f32], spacing: f32) -> Vec<f32> {
    let mut out = Vec::with_capacity(tracks.len());
    let mut cursor = 0.0;
    for t in tracks {
        out.push(cursor);
        cursor += t + spacing;
    }
    out
}

/// Extent of `span` tracks starting at `start`, inner gaps included.
fn span_extent(tracks: &[f32], start: usize, span: usize, spacing: f32) -> f32 {
    tracks[start..start + span].iter().sum::<f32>() + gaps(spacing, span)
}

/// Position and extent of an item of `natural` size inside a cell.
fn align_in(start: f32, extent: f32, natural: f32, align: CellAlign) -> (f32, f32) {
    match align {
        CellAlign::Fill => (start, extent),
        CellAlign::Start => (start, natural),
        CellAlign::Middle => (start + (extent - natural) / 2.0, natural),
        CellAlign::End => (start + extent - natural, natural),
    }
}

/// Split `extent` among items of `(natural, weight)`.
///
/// Zero-weight items keep their natural size. The rest of the extent is
/// shared among weighted items in proportion to weight; an item whose share
/// would fall below its natural size is frozen at natural size and the
/// remainder is shared again. When the extent cannot cover the naturals,
/// every item keeps its natural size.
pub(crate) fn distribute(extent: f32, items: &[(f32, f32)]) -> Vec<f32> {
    let mut sizes: Vec<f32> = items.iter().map(|(n, _)| *n).collect();
    let mut flexible: Vec<usize> = (0..items.len()).filter(|i| items[*i].1 > 0.0).collect();
    let mut fixed: f32 = (0..items.len())
        .filter(|i| items[*i].1 <= 0.0)
        .map(|i| items[i].0)
        .sum();

    while !flexible.is_empty() {
        let pool = (extent - fixed).max(0.0);
        let total: f32 = flexible.iter().map(|i| items[*i].1).sum();
        let (below, above): (Vec<usize>, Vec<usize>) = flexible
            .iter()
            .partition(|i| pool * items[**i].1 / total < items[**i].0);
        if below.is_empty() {
            for i in above {
                sizes[i] = pool * items[i].1 / total;
            }
            break;
        }
        fixed += below.iter().map(|i| items[*i].0).sum::<f32>();
        flexible = above;
    }
    sizes
}

/// Resolved cell placement for every child of a grid.
struct GridPlan {
    /// Anchor per child, auto-placed where unset.
    anchors: Vec<Anchor>,
    /// Column count.
    columns: usize,
    /// Row count.
    rows: usize,
}

impl GridPlan {
    /// Resolve anchors. Children without one fill cells row-major.
    fn new(core: &Core, children: &[NodeId], columns: usize) -> Self {
        let mut auto = 0;
        let anchors: Vec<Anchor> = children
            .iter()
            .map(|c| {
                core.get(*c).anchor.unwrap_or_else(|| {
                    let a = Anchor::cell(auto % columns, auto / columns);
                    auto += 1;
                    a
                })
            })
            .collect();
        let columns = anchors
            .iter()
            .map(|a| a.column + a.column_span)
            .fold(columns, usize::max);
        let rows = anchors.iter().map(|a| a.row + a.row_span).max().unwrap_or(0);
        Self {
            anchors,
            columns,
            rows,
        }
    }

    /// `(start, span)` of every child along an axis.
    fn spans(&self, axis: Axis) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.anchors.iter().map(move |a| match axis {
            Axis::Horizontal => (a.column, a.column_span),
            Axis::Vertical => (a.row, a.row_span),
        })
    }

    /// Track count along an axis.
    fn count(&self, axis: Axis) -> usize {
        match axis {
            Axis::Horizontal => self.columns,
            Axis::Vertical => self.rows,
        }
    }

    /// Natural track sizes: the widest single-span child per track, then
    /// spanning children spread any shortfall evenly over their tracks.
    fn natural_tracks(&self, axis: Axis, naturals: &[Size], spacing: f32) -> Vec<f32> {
        let mut tracks = vec![0.0_f32; self.count(axis)];
        for ((start, span), n) in self.spans(axis).zip(naturals) {
            if span == 1 {
                tracks[start] = tracks[start].max(n.main(axis));
            }
        }
        for ((start, span), n) in self.spans(axis).zip(naturals) {
            if span > 1 {
                let covered = span_extent(&tracks, start, span, spacing);
                let short = n.main(axis) - covered;
                if short > 0.0 {
                    for t in &mut tracks[start..start + span] {
                        *t += short / span as f32;
                    }
                }
            }
        }
        tracks
    }

    /// Track weight: the largest weight of any child covering the track.
    fn track_weights(&self, axis: Axis, weights: &[f32]) -> Vec<f32> {
        let mut out = vec![0.0_f32; self.count(axis)];
        for ((start, span), w) in self.spans(axis).zip(weights) {
            for t in &mut out[start..start + span] {
                *t = t.max(*w);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Result, testing::probe::Probe};

    /// Root with a layout, plus leaf probes of the given natural sizes.
    fn row(layout: Layout, naturals: &[(f32, f32)]) -> (Core, Vec<NodeId>) {
        let mut core = Core::new();
        let root = core.root_id();
        core.set_layout(root, Some(layout));
        let ids = naturals
            .iter()
            .enumerate()
            .map(|(i, (w, h))| core.push_child(root, Probe::new(&format!("c{i}")).sized(*w, *h)))
            .collect();
        (core, ids)
    }

    fn run(core: &mut Core, size: Size) -> Option<Size> {
        let mut fonts = FontCache::monospace();
        LayoutPass::new(core, &mut fonts).run(size)
    }

    fn rect(core: &Core, id: NodeId) -> Rect {
        core.node(id).unwrap().rect()
    }

    #[test]
    fn distribute_weights() {
        assert_eq!(
            distribute(120.0, &[(10.0, 0.0), (20.0, 1.0), (30.0, 1.0)]),
            vec![10.0, 55.0, 55.0]
        );
        // The 60-natural item freezes; the rest is shared again.
        assert_eq!(
            distribute(100.0, &[(60.0, 1.0), (10.0, 1.0)]),
            vec![60.0, 40.0]
        );
        // Not enough room: naturals win.
        assert_eq!(distribute(10.0, &[(20.0, 1.0), (30.0, 2.0)]), vec![20.0, 30.0]);
        assert_eq!(distribute(90.0, &[(0.0, 1.0), (0.0, 2.0)]), vec![30.0, 60.0]);
        assert!(distribute(50.0, &[]).is_empty());
    }

    #[test]
    fn horizontal_box_distribution() {
        for (spacing, offsets) in [(0.0, [0.0, 10.0, 65.0]), (5.0, [0.0, 15.0, 75.0])] {
            let layout = Layout::horizontal()
                .with_policy(SizePolicy::Maximum)
                .with_spacing(spacing);
            let (mut core, ids) = row(layout, &[(10.0, 10.0), (20.0, 10.0), (30.0, 10.0)]);
            core.set_stretch(ids[0], 0.0);
            run(&mut core, Size::new(120.0, 40.0));
            let widths: Vec<f32> = ids.iter().map(|i| rect(&core, *i).size.width).collect();
            let xs: Vec<f32> = ids.iter().map(|i| rect(&core, *i).pos.x).collect();
            assert_eq!(widths, vec![10.0, 55.0, 55.0]);
            assert_eq!(xs, offsets.to_vec());
            assert_eq!(rect(&core, ids[1]).size.height, 40.0);
        }
    }

    #[test]
    fn freeform_keeps_naturals() {
        let layout = Layout::vertical()
            .with_policy(SizePolicy::Freeform)
            .with_spacing(2.0)
            .with_inner_margin(Margin::uniform(4.0));
        let (mut core, ids) = row(layout, &[(10.0, 10.0), (30.0, 20.0)]);
        run(&mut core, Size::new(200.0, 200.0));
        assert_eq!(rect(&core, ids[0]), Rect::new(4.0, 4.0, 10.0, 10.0));
        assert_eq!(rect(&core, ids[1]), Rect::new(4.0, 16.0, 30.0, 20.0));
    }

    #[test]
    fn freeform_child_keeps_natural_in_stretching_parent() {
        let (mut core, ids) = row(
            Layout::horizontal().with_policy(SizePolicy::Maximum),
            &[(10.0, 10.0), (10.0, 10.0)],
        );
        core.set_layout(
            ids[0],
            Some(Layout::vertical().with_policy(SizePolicy::Freeform)),
        );
        run(&mut core, Size::new(100.0, 50.0));
        assert_eq!(rect(&core, ids[0]).size, Size::new(10.0, 10.0));
        assert_eq!(rect(&core, ids[1]), Rect::new(10.0, 0.0, 90.0, 50.0));
    }

    #[test]
    fn minimum_root_sets_window_minimum() {
        let mut core = Core::new();
        let root = core.root_id();
        core.set_layout(
            root,
            Some(Layout::horizontal().with_policy(SizePolicy::Minimum)),
        );
        let c = core.push_child(root, Probe::new("c"));
        core.set_layout(
            c,
            Some(Layout::horizontal().with_policy(SizePolicy::Maximum)),
        );
        let l1 = core.push_child(c, Probe::new("l1").sized(50.0, 50.0));
        let l2 = core.push_child(c, Probe::new("l2").sized(50.0, 50.0));

        let min = run(&mut core, Size::new(10.0, 10.0));
        assert_eq!(min, Some(Size::new(100.0, 50.0)));
        assert_eq!(rect(&core, root).size, Size::new(100.0, 50.0));

        let min = run(&mut core, Size::new(200.0, 50.0));
        assert_eq!(min, Some(Size::new(100.0, 50.0)));
        assert_eq!(rect(&core, l1), Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(rect(&core, l2), Rect::new(100.0, 0.0, 100.0, 50.0));
    }

    #[test]
    fn maximum_root_has_no_window_minimum() {
        let (mut core, _) = row(
            Layout::horizontal().with_policy(SizePolicy::Maximum),
            &[(50.0, 50.0)],
        );
        assert_eq!(run(&mut core, Size::new(10.0, 10.0)), None);
    }

    #[test]
    #[should_panic(expected = "inherits a size policy")]
    fn unresolved_inherit_is_fatal() {
        let (mut core, _) = row(Layout::horizontal(), &[(5.0, 5.0)]);
        run(&mut core, Size::new(10.0, 10.0));
    }

    #[test]
    fn inherit_resolves_from_ancestor() {
        let mut core = Core::new();
        let root = core.root_id();
        core.set_layout(
            root,
            Some(Layout::vertical().with_policy(SizePolicy::Freeform)),
        );
        // A layout-less node between the two layouts.
        let mid = core.push_child(root, Probe::new("mid").sized(80.0, 40.0));
        let inner = core.push_child(mid, Probe::new("inner").sized(80.0, 40.0));
        core.set_layout(inner, Some(Layout::horizontal()));
        let a = core.push_child(inner, Probe::new("a").sized(10.0, 10.0));
        run(&mut core, Size::new(100.0, 100.0));
        // Freeform inherited: no stretching.
        assert_eq!(rect(&core, a).size, Size::new(10.0, 10.0));
    }

    #[test]
    fn no_layout_sizes_children_in_place() {
        let mut core = Core::new();
        let root = core.root_id();
        let w = core.push_child(root, Probe::new("w").sized(40.0, 30.0));
        core.set_position(w, Point::new(7.0, 9.0));
        let f = core.push_child(root, Probe::new("f").sized(40.0, 30.0));
        core.set_fixed_size(f, Size::new(0.0, 99.0));
        run(&mut core, Size::new(300.0, 300.0));
        assert_eq!(rect(&core, w), Rect::new(7.0, 9.0, 40.0, 30.0));
        assert_eq!(rect(&core, f).size, Size::new(40.0, 99.0));
    }

    #[test]
    fn hidden_children_take_no_space() {
        let (mut core, ids) = row(
            Layout::horizontal()
                .with_policy(SizePolicy::Freeform)
                .with_spacing(3.0),
            &[(10.0, 10.0), (10.0, 10.0), (10.0, 10.0)],
        );
        core.set_visible(ids[1], false);
        run(&mut core, Size::new(100.0, 100.0));
        assert_eq!(rect(&core, ids[2]).pos.x, 13.0);
    }

    #[test]
    fn natural_size_includes_margins_and_insets() {
        let mut core = Core::new();
        let root = core.root_id();
        let w = core.push_child(
            root,
            Probe::new("win").insets(Margin::new(0.0, 30.0, 0.0, 0.0)),
        );
        core.set_layout(
            w,
            Some(
                Layout::vertical()
                    .with_policy(SizePolicy::Maximum)
                    .with_spacing(4.0)
                    .with_inner_margin(Margin::uniform(5.0))
                    .with_outer_margin(Margin::symmetric(1.0, 0.0)),
            ),
        );
        let a = core.push_child(w, Probe::new("a").sized(20.0, 10.0));
        core.push_child(w, Probe::new("b").sized(30.0, 10.0));
        run(&mut core, Size::new(400.0, 400.0));
        assert_eq!(rect(&core, w).size, Size::new(30.0 + 10.0 + 2.0, 24.0 + 10.0 + 30.0));
        assert_eq!(rect(&core, a).pos, Point::new(6.0, 35.0));
        assert_eq!(rect(&core, a).size.width, 30.0);
    }

    #[test]
    fn grid_auto_placement_and_tracks() {
        let layout = Layout::grid(2)
            .with_policy(SizePolicy::Freeform)
            .with_spacing(1.0);
        let (mut core, ids) = row(
            layout,
            &[(10.0, 5.0), (20.0, 5.0), (15.0, 8.0), (5.0, 5.0)],
        );
        run(&mut core, Size::new(500.0, 500.0));
        // Columns 15 and 20 wide, rows 5 and 8 tall.
        assert_eq!(rect(&core, ids[0]), Rect::new(0.0, 0.0, 10.0, 5.0));
        assert_eq!(rect(&core, ids[1]), Rect::new(16.0, 0.0, 20.0, 5.0));
        assert_eq!(rect(&core, ids[2]), Rect::new(0.0, 6.0, 15.0, 8.0));
        assert_eq!(rect(&core, ids[3]), Rect::new(16.0, 6.0, 5.0, 5.0));
    }

    #[test]
    fn grid_stretch_and_anchors() -> Result<()> {
        let layout = Layout::grid(2).with_policy(SizePolicy::Maximum);
        let (mut core, ids) = row(layout, &[(10.0, 10.0), (10.0, 10.0), (10.0, 10.0)]);
        core.set_stretch(ids[0], 0.0);
        core.set_anchor(ids[0], Some(Anchor::cell(0, 0)));
        core.set_anchor(
            ids[1],
            Some(Anchor::cell(1, 0).with_align(CellAlign::End, CellAlign::Middle)),
        );
        core.set_anchor(ids[2], Some(Anchor::spanning(0, 1, 2, 1)));
        run(&mut core, Size::new(100.0, 60.0));
        // Column 0 is pinned by the zero-weight child, except the spanning
        // child's weight covers it too.
        assert_eq!(rect(&core, ids[2]), Rect::new(0.0, 30.0, 100.0, 30.0));
        assert_eq!(rect(&core, ids[0]), Rect::new(0.0, 0.0, 50.0, 30.0));
        assert_eq!(rect(&core, ids[1]), Rect::new(90.0, 10.0, 10.0, 10.0));
        Ok(())
    }

    #[test]
    fn spanning_child_widens_tracks() {
        let layout = Layout::grid(2).with_policy(SizePolicy::Freeform);
        let (mut core, ids) = row(layout, &[(10.0, 10.0), (10.0, 10.0), (40.0, 10.0)]);
        core.set_anchor(ids[2], Some(Anchor::spanning(0, 1, 2, 1)));
        run(&mut core, Size::new(500.0, 500.0));
        assert_eq!(rect(&core, ids[1]).pos.x, 20.0);
        assert_eq!(rect(&core, ids[2]).size.width, 40.0);
    }

    #[test]
    fn stack_overlaps() {
        let (mut core, ids) = row(
            Layout::stack()
                .with_policy(SizePolicy::Maximum)
                .with_inner_margin(Margin::uniform(2.0)),
            &[(10.0, 10.0), (30.0, 5.0)],
        );
        core.set_stretch(ids[1], 0.0);
        run(&mut core, Size::new(50.0, 40.0));
        assert_eq!(rect(&core, ids[0]), Rect::new(2.0, 2.0, 46.0, 36.0));
        assert_eq!(rect(&core, ids[1]), Rect::new(2.0, 2.0, 30.0, 5.0));
    }

    #[test]
    fn passes_are_idempotent() {
        let mut core = Core::new();
        let root = core.root_id();
        core.set_layout(
            root,
            Some(Layout::vertical().with_policy(SizePolicy::Minimum).with_spacing(3.0)),
        );
        let g = core.push_child(root, Probe::new("g"));
        core.set_layout(g, Some(Layout::grid(3).with_spacing(2.0)));
        for i in 0..7 {
            core.push_child(g, Probe::new(&format!("g{i}")).sized(5.0 + i as f32, 7.0));
        }
        core.push_child(root, Probe::new("tail").sized(12.0, 4.0));

        run(&mut core, Size::new(90.0, 70.0));
        let first: Vec<Rect> = core.subtree(root).iter().map(|i| rect(&core, *i)).collect();
        run(&mut core, Size::new(90.0, 70.0));
        let second: Vec<Rect> = core.subtree(root).iter().map(|i| rect(&core, *i)).collect();
        assert_eq!(first, second);
    }
}
