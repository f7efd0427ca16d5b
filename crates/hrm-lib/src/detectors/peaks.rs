use crate::{
    error::EcgError,
    signal::{MatchScores, PeakSet},
};
use log::debug;

pub const DEFAULT_MIN_SEPARATION: usize = 30;

/// True when `data[i]` is strictly greater than every other sample within
/// `radius` positions on either side (the window is clipped at the ends).
fn is_strict_local_max(data: &[f64], i: usize, radius: usize) -> bool {
    let start = i.saturating_sub(radius);
    let end = (i + radius).min(data.len() - 1);
    let v = data[i];
    data[start..i].iter().all(|&x| v > x) && data[i + 1..=end].iter().all(|&x| v > x)
}

/// Indices of strict local maxima with a `±min_separation` neighbourhood.
pub fn local_maxima(data: &[f64], min_separation: usize) -> Vec<usize> {
    (0..data.len())
        .filter(|&i| is_strict_local_max(data, i, min_separation))
        .collect()
}

/// Pick beat candidates from matched-filter scores.
///
/// A candidate must be a strict local maximum over `±min_separation` samples
/// and score at least `mean(scores) * threshold_factor`. Indices are recorded
/// as they are found, ascending. A non-positive factor lets every local
/// maximum through.
pub fn detect(
    scores: &MatchScores,
    threshold_factor: f64,
    min_separation: usize,
) -> Result<PeakSet, EcgError> {
    if !threshold_factor.is_finite() {
        return Err(EcgError::InvalidThresholdFactor(threshold_factor));
    }
    let data = &scores.values;
    let required = 2 * min_separation + 1;
    if data.len() < required {
        return Err(EcgError::insufficient("peak detection", required, data.len()));
    }

    let threshold = scores.mean() * threshold_factor;
    let (indices, values): (Vec<usize>, Vec<f64>) = local_maxima(data, min_separation)
        .into_iter()
        .filter(|&i| data[i] >= threshold)
        .map(|i| (i, data[i]))
        .unzip();
    debug!(
        "peak detection: threshold {:.4} ({}x mean), {} peak(s) kept",
        threshold,
        threshold_factor,
        indices.len()
    );

    Ok(PeakSet {
        indices,
        scores: values,
        offset: scores.offset,
        threshold,
    })
}
