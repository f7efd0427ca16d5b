use crate::error::EcgError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HALF_WIDTH: usize = 30;

/// One canonical beat cut out of the smoothed trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub waveform: Vec<f64>,
    /// Sample index of the raw global maximum the window is centred on.
    pub center_index: usize,
}

impl Template {
    pub fn len(&self) -> usize {
        self.waveform.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waveform.is_empty()
    }
}

/// Index of the global maximum; the first one wins on ties.
pub fn global_max_index(data: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in data.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Cut `[c - half_width, c + half_width)` from `smoothed`, where `c` is the
/// position of the tallest raw sample.
///
/// The tallest R-wave is assumed to be representative of every beat in the
/// recording. Recordings whose extremum sits within `half_width` of either
/// end are rejected rather than padded.
pub fn extract(raw: &[f64], smoothed: &[f64], half_width: usize) -> Result<Template, EcgError> {
    if half_width == 0 {
        return Err(EcgError::insufficient("template", 1, 0));
    }
    if raw.len() != smoothed.len() {
        return Err(EcgError::LengthMismatch {
            times: raw.len(),
            voltages: smoothed.len(),
        });
    }
    let center_index = global_max_index(raw)
        .ok_or_else(|| EcgError::insufficient("template", 2 * half_width, 0))?;
    let len = smoothed.len();
    if center_index < half_width || center_index + half_width > len {
        return Err(EcgError::TemplateOutOfBounds {
            center: center_index,
            half_width,
            len,
        });
    }
    Ok(Template {
        waveform: smoothed[center_index - half_width..center_index + half_width].to_vec(),
        center_index,
    })
}
