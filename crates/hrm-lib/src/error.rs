use thiserror::Error;

/// Failures raised by the beat-detection pipeline stages.
///
/// Every stage validates its own preconditions and returns one of these
/// instead of producing truncated or NaN-laden output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EcgError {
    #[error("{stage}: need at least {required} samples, got {actual}")]
    InsufficientData {
        stage: &'static str,
        required: usize,
        actual: usize,
    },
    #[error("template of half-width {half_width} around sample {center} exceeds trace of {len} samples")]
    TemplateOutOfBounds {
        center: usize,
        half_width: usize,
        len: usize,
    },
    #[error("observation window must be positive, got {0} minutes")]
    InvalidObservationWindow(f64),
    #[error("threshold factor must be finite, got {0}")]
    InvalidThresholdFactor(f64),
    #[error("recording duration must be positive, got {0}s")]
    InvalidDuration(f64),
    #[error("time column has {times} samples but voltage column has {voltages}")]
    LengthMismatch { times: usize, voltages: usize },
    #[error("time is not strictly increasing at sample {index}")]
    NonIncreasingTime { index: usize },
}

impl EcgError {
    pub(crate) fn insufficient(stage: &'static str, required: usize, actual: usize) -> Self {
        Self::InsufficientData {
            stage,
            required,
            actual,
        }
    }
}
