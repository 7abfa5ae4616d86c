/// Canvas harness for scripted input.
pub mod harness;
/// A painter that records its calls.
pub mod painter;
/// A widget that logs the events it receives.
pub mod probe;

pub use harness::Harness;
pub use painter::{DrawCommand, RecordingPainter};
pub use probe::Probe;
