pub mod ecg;
pub mod matched;
pub mod peaks;
pub mod smoothing;
pub mod template;

pub use ecg::{detect_beats, run_pipeline, PipelineRun};
pub use matched::correlate;
pub use peaks::detect;
pub use smoothing::smooth;
pub use template::{extract, Template};
