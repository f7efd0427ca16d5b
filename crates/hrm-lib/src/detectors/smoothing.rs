use crate::error::EcgError;

/// Neighbourhood size of the adaptive filter.
pub const WIENER_WINDOW: usize = 3;

/// Adaptive local-variance (Wiener) noise reduction.
///
/// For every sample the local mean and variance are taken over a
/// [`WIENER_WINDOW`]-wide neighbourhood, zero padded at the ends. The noise
/// power is the average local variance. Samples whose neighbourhood is no
/// busier than the noise collapse to the local mean; elsewhere the deviation
/// from the mean is attenuated by `1 - noise / variance`, which keeps sharp
/// QRS edges intact.
pub fn smooth(voltages: &[f64]) -> Result<Vec<f64>, EcgError> {
    let n = voltages.len();
    if n < WIENER_WINDOW {
        return Err(EcgError::insufficient("smoothing", WIENER_WINDOW, n));
    }

    let half = WIENER_WINDOW / 2;
    let w = WIENER_WINDOW as f64;
    let mut local_mean = Vec::with_capacity(n);
    let mut local_var = Vec::with_capacity(n);
    for i in 0..n {
        let start = i.saturating_sub(half);
        let end = (i + half).min(n - 1);
        let (sum, sum_sq) = voltages[start..=end]
            .iter()
            .fold((0.0, 0.0), |(s, s2), &x| (s + x, s2 + x * x));
        let m = sum / w;
        local_mean.push(m);
        local_var.push(sum_sq / w - m * m);
    }
    let noise = local_var.iter().sum::<f64>() / n as f64;

    let out = voltages
        .iter()
        .zip(local_mean.iter().zip(&local_var))
        .map(|(&x, (&m, &var))| {
            if var <= noise {
                m
            } else {
                (x - m) * (1.0 - noise / var) + m
            }
        })
        .collect();
    Ok(out)
}
