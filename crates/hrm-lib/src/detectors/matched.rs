use crate::{error::EcgError, signal::MatchScores};

/// Valid-mode cross-correlation of `template` against `reference`.
///
/// `out[k] = sum_j reference[k + j] * template[j]`, so the output has
/// `reference.len() - template.len() + 1` entries.
pub fn cross_correlate_valid(template: &[f64], reference: &[f64]) -> Result<Vec<f64>, EcgError> {
    let m = template.len();
    if m == 0 {
        return Err(EcgError::insufficient("matched filter template", 1, 0));
    }
    if reference.len() < m {
        return Err(EcgError::insufficient(
            "matched filter reference",
            m,
            reference.len(),
        ));
    }
    Ok(reference
        .windows(m)
        .map(|window| {
            window
                .iter()
                .zip(template)
                .fold(0.0, |acc, (&r, &t)| acc + r * t)
        })
        .collect())
}

/// Matched filter: correlate, remove the DC bias, and keep only positive
/// matches.
///
/// The returned scores carry the alignment to sample indices: score `k`
/// places the template centre on sample `k + template.len() / 2`.
pub fn correlate(template: &[f64], reference: &[f64]) -> Result<MatchScores, EcgError> {
    let raw = cross_correlate_valid(template, reference)?;
    let mean = crate::signal::mean(&raw);
    let values = raw.into_iter().map(|c| (c - mean).max(0.0)).collect();
    Ok(MatchScores {
        values,
        offset: template.len() / 2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_mode_length_and_values() {
        let out = cross_correlate_valid(&[1.0, 2.0], &[1.0, 0.0, 3.0, 1.0]).unwrap();
        assert_eq!(out, vec![1.0, 6.0, 5.0]);
    }

    #[test]
    fn scores_are_non_negative_and_peak_on_match() {
        let template = vec![0.0, 1.0, 3.0, 1.0, 0.0];
        let mut reference = vec![0.0; 40];
        reference[20..25].copy_from_slice(&template);
        let scores = correlate(&template, &reference).unwrap();
        assert_eq!(scores.len(), 36);
        assert_eq!(scores.offset, 2);
        assert!(scores.values.iter().all(|&v| v >= 0.0));
        let best = scores
            .values
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |b, (i, &v)| if v > b.1 { (i, v) } else { b });
        // Template centre lands on the centre of the embedded copy.
        assert_eq!(best.0 + scores.offset, 22);
    }

    #[test]
    fn rejects_template_longer_than_reference() {
        assert!(matches!(
            correlate(&[1.0; 10], &[1.0; 5]),
            Err(EcgError::InsufficientData { required: 10, actual: 5, .. })
        ));
        assert!(matches!(
            correlate(&[], &[1.0; 5]),
            Err(EcgError::InsufficientData { .. })
        ));
    }
}
