//! Backend-neutral figure model for rendering a recording and its beats.

use crate::{metrics::beats::BeatReport, signal::SampleSeries};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Axis {
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Style {
    pub width: f32,
    pub color: Color,
}

/// `0xRRGGBB`
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub fn rgb(self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
    pub style: Style,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
    pub radius: u32,
    pub color: Color,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Series {
    Line(LineSeries),
    Points(PointSeries),
}

impl Series {
    pub fn points(&self) -> &[[f64; 2]] {
        match self {
            Series::Line(line) => &line.points,
            Series::Points(points) => &points.points,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    pub title: Option<String>,
    pub x: Axis,
    pub y: Axis,
    pub series: Vec<Series>,
}

impl Figure {
    pub fn new(title: impl Into<Option<String>>) -> Self {
        Self {
            title: title.into(),
            x: Axis { label: None },
            y: Axis { label: None },
            series: Vec::new(),
        }
    }

    pub fn add_series(&mut self, series: Series) {
        self.series.push(series);
    }

    /// `((x_min, x_max), (y_min, y_max))` over every series, or `None` when
    /// the figure has no points.
    pub fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let mut points = self.series.iter().flat_map(|s| s.points().iter());
        let first = points.next()?;
        let init = ((first[0], first[0]), (first[1], first[1]));
        Some(points.fold(init, |((x0, x1), (y0, y1)), p| {
            ((x0.min(p[0]), x1.max(p[0])), (y0.min(p[1]), y1.max(p[1])))
        }))
    }
}

/// Reduce a trace to roughly `max_points` while keeping each bucket's
/// minimum and maximum, so narrow R peaks survive.
pub fn decimate_points(points: &[[f64; 2]], max_points: usize) -> Vec<[f64; 2]> {
    if points.len() <= max_points || max_points < 2 {
        return points.to_vec();
    }
    let buckets = max_points / 2;
    let bucket_size = points.len() as f64 / buckets as f64;
    let mut result = Vec::with_capacity(buckets * 2);
    for i in 0..buckets {
        let start = (i as f64 * bucket_size).floor() as usize;
        let end = (((i + 1) as f64 * bucket_size).floor() as usize).min(points.len());
        let bucket = &points[start..end];
        let Some(first) = bucket.first() else {
            continue;
        };
        let (lo, hi) = bucket.iter().fold((first, first), |(lo, hi), p| {
            (if p[1] < lo[1] { p } else { lo }, if p[1] > hi[1] { p } else { hi })
        });
        if lo[0] <= hi[0] {
            result.push(*lo);
            result.push(*hi);
        } else {
            result.push(*hi);
            result.push(*lo);
        }
    }
    result
}

/// Trace of the recording with the detected beats marked on it.
pub fn figure_from_recording(
    title: &str,
    samples: &SampleSeries,
    report: &BeatReport,
    max_points: usize,
) -> Figure {
    let trace: Vec<[f64; 2]> = samples
        .times()
        .iter()
        .zip(samples.voltages())
        .map(|(&t, &v)| [t, v])
        .collect();
    let beats: Vec<[f64; 2]> = report
        .beat_times
        .iter()
        .filter_map(|&bt| {
            let idx = samples.times().partition_point(|&t| t < bt);
            samples.voltages().get(idx).map(|&v| [bt, v])
        })
        .collect();

    let mut fig = Figure::new(Some(title.to_string()));
    fig.x.label = Some("time (s)".into());
    fig.y.label = Some("voltage".into());
    fig.add_series(Series::Line(LineSeries {
        name: "ECG".into(),
        points: decimate_points(&trace, max_points),
        style: Style {
            width: 1.4,
            color: Color(0x1F77B4),
        },
    }));
    fig.add_series(Series::Points(PointSeries {
        name: "beats".into(),
        points: beats,
        radius: 4,
        color: Color(0xFF0077),
    }));
    fig
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimation_keeps_spikes() {
        let mut points: Vec<[f64; 2]> = (0..10_000).map(|i| [i as f64, 0.0]).collect();
        points[4321][1] = 3.0;
        let reduced = decimate_points(&points, 200);
        assert!(reduced.len() <= 200);
        assert!(reduced.iter().any(|p| p[1] == 3.0));
        assert!(reduced.windows(2).all(|w| w[0][0] <= w[1][0]));
    }

    #[test]
    fn short_traces_are_untouched() {
        let points = vec![[0.0, 1.0], [1.0, 2.0]];
        assert_eq!(decimate_points(&points, 10), points);
    }

    #[test]
    fn recording_figure_marks_beats() {
        let samples =
            SampleSeries::new(vec![0.0, 0.1, 0.2, 0.3], vec![0.0, 1.0, 0.0, -0.5]).unwrap();
        let report = BeatReport {
            heart_rate: 1.0 / 0.3,
            voltage_extremes: (1.0, -0.5),
            duration: 0.3,
            beat_count: 1,
            beat_times: vec![0.1],
        };
        let fig = figure_from_recording("rec", &samples, &report, 1000);
        assert_eq!(fig.series.len(), 2);
        assert_eq!(fig.series[1].points(), &[[0.1, 1.0]]);
        assert_eq!(fig.bounds(), Some(((0.0, 0.3), (-0.5, 1.0))));
    }
}
