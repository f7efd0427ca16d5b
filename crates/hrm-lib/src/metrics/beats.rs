use crate::{
    error::EcgError,
    signal::{PeakSet, SampleSeries},
};
use log::warn;
use serde::{Deserialize, Serialize};

/// Terminal summary of one recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatReport {
    /// Mean heart rate in beats per second.
    pub heart_rate: f64,
    /// `(max, min)` voltage of the raw trace.
    pub voltage_extremes: (f64, f64),
    /// Largest timestamp of the recording, in seconds.
    pub duration: f64,
    pub beat_count: usize,
    pub beat_times: Vec<f64>,
}

/// Derive beat times, count, duration, extremes and mean heart rate.
///
/// The rate is normalised by the requested observation window, unless that
/// window is longer than the recording, in which case the recording duration
/// is used instead.
pub fn summarize(
    peaks: &PeakSet,
    samples: &SampleSeries,
    observation_minutes: f64,
) -> Result<BeatReport, EcgError> {
    if observation_minutes.is_nan() || observation_minutes <= 0.0 {
        return Err(EcgError::InvalidObservationWindow(observation_minutes));
    }
    let duration = samples.duration();
    if duration == 0.0 {
        return Err(EcgError::insufficient("duration", 2, samples.len()));
    }
    if !duration.is_finite() || duration < 0.0 {
        return Err(EcgError::InvalidDuration(duration));
    }

    let times = samples.times();
    let beat_times = peaks
        .sample_indices()
        .into_iter()
        .map(|i| {
            times
                .get(i)
                .copied()
                .ok_or_else(|| EcgError::insufficient("beat statistics", i + 1, times.len()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let beat_count = beat_times.len();

    let window_s = observation_minutes * 60.0;
    // TODO: make the duration fallback an explicit caller choice once report
    // consumers no longer rely on it.
    let heart_rate = if window_s > duration {
        warn!(
            "observation window {window_s}s exceeds recording of {duration}s, using duration"
        );
        beat_count as f64 / duration
    } else {
        beat_count as f64 / window_s
    };

    Ok(BeatReport {
        heart_rate,
        voltage_extremes: samples.voltage_extremes(),
        duration,
        beat_count,
        beat_times,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(len: usize, dt: f64) -> SampleSeries {
        let times = (0..len).map(|i| i as f64 * dt).collect();
        let voltages = (0..len).map(|i| ((i % 7) as f64 - 3.0) * 0.1).collect();
        SampleSeries::new(times, voltages).unwrap()
    }

    fn peaks(indices: Vec<usize>, offset: usize) -> PeakSet {
        let scores = vec![1.0; indices.len()];
        PeakSet {
            indices,
            scores,
            offset,
            threshold: 0.5,
        }
    }

    #[test]
    fn beat_times_follow_offset_indices() {
        let samples = series(1000, 0.01);
        let report = summarize(&peaks(vec![10, 110, 210], 30), &samples, 2.0).unwrap();
        assert_eq!(report.beat_count, 3);
        let times = samples.times();
        assert_eq!(report.beat_times, vec![times[40], times[140], times[240]]);
        assert_eq!(report.duration, samples.times()[999]);
        assert!(report.voltage_extremes.0 >= report.voltage_extremes.1);
    }

    #[test]
    fn long_window_falls_back_to_duration() {
        // 27.775 s of samples, 2 minute window.
        let samples = series(27776, 0.001);
        assert!((samples.duration() - 27.775).abs() < 1e-9);
        let indices: Vec<usize> = (0..34).map(|k| k * 800).collect();
        let report = summarize(&peaks(indices, 0), &samples, 2.0).unwrap();
        assert_eq!(report.heart_rate, 34.0 / samples.duration());
        assert_ne!(report.heart_rate, 34.0 / 120.0);
    }

    #[test]
    fn short_window_normalises_by_window() {
        let samples = series(6001, 0.05); // 300 s
        let report = summarize(&peaks(vec![0, 100, 200, 300], 0), &samples, 1.0).unwrap();
        assert_eq!(report.heart_rate, 4.0 / 60.0);
    }

    #[test]
    fn no_beats_is_not_an_error() {
        let samples = series(100, 0.1);
        let report = summarize(&peaks(Vec::new(), 30), &samples, 2.0).unwrap();
        assert_eq!(report.beat_count, 0);
        assert_eq!(report.heart_rate, 0.0);
        assert!(report.beat_times.is_empty());
    }

    #[test]
    fn rejects_bad_window_and_degenerate_recording() {
        let samples = series(100, 0.1);
        assert_eq!(
            summarize(&peaks(vec![1], 0), &samples, 0.0).unwrap_err(),
            EcgError::InvalidObservationWindow(0.0)
        );
        assert!(matches!(
            summarize(&peaks(vec![1], 0), &samples, -1.0),
            Err(EcgError::InvalidObservationWindow(_))
        ));
        let single = SampleSeries::new(vec![0.0], vec![0.3]).unwrap();
        assert!(matches!(
            summarize(&peaks(Vec::new(), 0), &single, 2.0),
            Err(EcgError::InsufficientData { stage: "duration", .. })
        ));
    }

    #[test]
    fn negative_duration_names_its_value() {
        let times = (0..400).map(|i| -10.0 + i as f64 * 0.01).collect();
        let samples = SampleSeries::new(times, vec![0.0; 400]).unwrap();
        let err = summarize(&peaks(Vec::new(), 0), &samples, 2.0).unwrap_err();
        assert!(matches!(err, EcgError::InvalidDuration(d) if d < 0.0), "{err}");
        assert!(err.to_string().contains("duration"));
    }

    #[test]
    fn out_of_range_peak_is_reported() {
        let samples = series(50, 0.1);
        assert!(matches!(
            summarize(&peaks(vec![45], 10), &samples, 2.0),
            Err(EcgError::InsufficientData { .. })
        ));
    }
}
