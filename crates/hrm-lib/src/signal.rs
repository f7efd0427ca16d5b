use crate::error::EcgError;
use serde::{Deserialize, Serialize};

/// A loaded single-lead recording: parallel time (seconds) and voltage columns.
///
/// Constructed once by the loader and never mutated; every pipeline stage
/// produces new sequences instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSeries {
    times: Vec<f64>,
    voltages: Vec<f64>,
}

impl SampleSeries {
    /// Validate and wrap the two columns. Times must be strictly increasing.
    pub fn new(times: Vec<f64>, voltages: Vec<f64>) -> Result<Self, EcgError> {
        if times.len() != voltages.len() {
            return Err(EcgError::LengthMismatch {
                times: times.len(),
                voltages: voltages.len(),
            });
        }
        if times.is_empty() {
            return Err(EcgError::insufficient("sample series", 1, 0));
        }
        if let Some(pos) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(EcgError::NonIncreasingTime { index: pos + 1 });
        }
        Ok(Self { times, voltages })
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn voltages(&self) -> &[f64] {
        &self.voltages
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Timestamp of the last sample, which is also the largest.
    pub fn duration(&self) -> f64 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// `(max, min)` of the voltage column.
    pub fn voltage_extremes(&self) -> (f64, f64) {
        self.voltages.iter().fold(
            (f64::NEG_INFINITY, f64::INFINITY),
            |(hi, lo), &v| (hi.max(v), lo.min(v)),
        )
    }
}

/// Non-negative matched-filter output.
///
/// `values[k]` scores the template aligned so that its centre sits on sample
/// `k + offset` of the originating recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchScores {
    pub values: Vec<f64>,
    pub offset: usize,
}

impl MatchScores {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn mean(&self) -> f64 {
        mean(&self.values)
    }
}

/// Retained local maxima of a [`MatchScores`] sequence.
///
/// `indices` are ascending offsets into the score sequence and `scores[i]`
/// is the score at `indices[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakSet {
    pub indices: Vec<usize>,
    pub scores: Vec<f64>,
    pub offset: usize,
    pub threshold: f64,
}

impl PeakSet {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Peak positions expressed as sample indices of the recording.
    pub fn sample_indices(&self) -> Vec<usize> {
        self.indices.iter().map(|&i| i + self.offset).collect()
    }
}

pub(crate) fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}
