pub mod config;
pub mod detectors;
pub mod error;
pub mod io;
pub mod metrics;
pub mod plot;
pub mod signal;
pub mod sim;

pub use config::PipelineConfig;
pub use detectors::*;
pub use error::EcgError;
pub use metrics::*;
pub use signal::*;
