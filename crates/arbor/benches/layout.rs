use arbor::{
    Canvas, Draggable, Drawable, FocusAware, HitTestable, MeasureContext, NodeId, Widget,
    geom::{Point, Size},
    layout::{Layout, SizePolicy},
};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

/// A leaf with a fixed natural size.
struct Block(Size);

impl Drawable for Block {
    fn preferred_size(&self, _cx: &mut MeasureContext<'_>) -> Size {
        self.0
    }
}
impl HitTestable for Block {}
impl FocusAware for Block {}
impl Draggable for Block {}
impl Widget for Block {}

/// Build a tree `depth` levels deep with `fanout` children per container,
/// alternating row, column and grid layouts.
fn populate(canvas: &mut Canvas, parent: NodeId, depth: usize, fanout: usize) {
    for i in 0..fanout {
        let size = Size::new(10.0 + i as f32, 8.0 + (depth * i) as f32 % 5.0);
        let id = canvas.core.push_child(parent, Block(size));
        if depth > 0 {
            let layout = match (depth + i) % 3 {
                0 => Layout::horizontal(),
                1 => Layout::vertical().with_spacing(2.0),
                _ => Layout::grid(3),
            };
            canvas.core.set_layout(id, Some(layout));
            populate(canvas, id, depth - 1, fanout);
        }
    }
}

/// Full layout passes and hit tests over a few thousand nodes.
fn benchmark_layout(c: &mut Criterion) {
    let mut canvas = Canvas::new(Size::new(1920.0, 1080.0));
    let root = canvas.root_id();
    canvas.core.set_layout(
        root,
        Some(Layout::vertical().with_policy(SizePolicy::Maximum)),
    );
    populate(&mut canvas, root, 4, 5);

    c.bench_function("layout_pass", |b| {
        b.iter(|| {
            canvas.perform_layout();
            black_box(canvas.window_min_size());
        });
    });

    c.bench_function("hit_test", |b| {
        b.iter(|| black_box(canvas.core.find_widget(black_box(Point::new(640.0, 360.0)))));
    });
}

criterion_group!(benches, benchmark_layout);
criterion_main!(benches);
