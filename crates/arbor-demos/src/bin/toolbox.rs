use std::{panic, path::PathBuf, time::Duration};

use anyhow::Result;
use arbor::{Canvas, Prerenderer, dump::dump, geom::Size};
use arbor_demos::{
    config::DemoConfig,
    painter::LogPainter,
    toolbox::{Toolbox, random_events, run},
};
use clap::Parser;
use color_backtrace::{BacktracePrinter, default_output_stream};
use rand::{SeedableRng, rngs::StdRng};
use tracing::{Level, info};

/// Run the toolbox scene headlessly and print the resulting tree.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// JSON file with canvas and theme overrides
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Canvas width
    #[clap(long, default_value_t = 640.0)]
    width: f32,

    /// Canvas height
    #[clap(long, default_value_t = 480.0)]
    height: f32,

    /// Chrome prerendering threads; 0 draws everything synchronously
    #[clap(short, long, default_value_t = 2)]
    workers: usize,

    /// Replace the scripted session with this many random gestures
    #[clap(short, long)]
    random: Option<usize>,

    /// Seed for random gestures
    #[clap(long, default_value_t = 0)]
    seed: u64,

    /// Log draw calls and routing decisions
    #[clap(short, long)]
    verbose: bool,
}

pub fn main() -> Result<()> {
    let args = Args::parse();

    panic::set_hook(Box::new(|pi| {
        BacktracePrinter::new().print_panic_info(pi, &mut default_output_stream());
    }));
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            Level::TRACE
        } else {
            Level::INFO
        })
        .with_target(false)
        .without_time()
        .compact()
        .init();

    let config = match &args.config {
        Some(path) => DemoConfig::load(path)?,
        None => DemoConfig::default(),
    };
    let mut canvas = config.apply(Canvas::new(Size::new(args.width, args.height)))?;
    if args.workers > 0 {
        canvas.set_prerenderer(Some(Prerenderer::new(args.workers)));
    }

    let toolbox = Toolbox::build(&mut canvas);
    let mut painter = LogPainter::new();
    canvas.draw(&mut painter);

    let consumed = match args.random {
        Some(count) => {
            let mut rng = StdRng::seed_from_u64(args.seed);
            let events = random_events(&canvas, &mut rng, count);
            run(&mut canvas, &events)
        }
        None => {
            let mut consumed = 0;
            for step in toolbox.script() {
                let events = step.events(&canvas);
                consumed += run(&mut canvas, &events);
                if canvas.take_redraw() {
                    canvas.perform_layout();
                    canvas.draw(&mut painter);
                }
            }
            consumed
        }
    };

    if let Some(p) = canvas.prerenderer_mut() {
        p.flush(Duration::from_secs(1));
    }
    canvas.perform_layout();
    canvas.draw(&mut painter);

    info!(consumed, stats = ?painter.stats(), "session finished");
    for action in toolbox.actions() {
        println!("{action}");
    }
    print!("{}", dump(&canvas.core, canvas.root_id())?);
    Ok(())
}
