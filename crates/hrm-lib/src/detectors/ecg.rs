use crate::{
    config::PipelineConfig,
    detectors::{
        matched::correlate,
        peaks::detect,
        smoothing::smooth,
        template::{extract, Template},
    },
    error::EcgError,
    metrics::beats::{summarize, BeatReport},
    signal::{MatchScores, PeakSet, SampleSeries},
};
use log::{debug, info, warn};

/// Every intermediate artefact of one pipeline run, in the order produced.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub smoothed: Vec<f64>,
    pub template: Template,
    pub scores: MatchScores,
    pub peaks: PeakSet,
    pub report: BeatReport,
}

/// Smooth → template → matched filter → peak picking → statistics.
///
/// Each stage consumes the previous stage's output and nothing else; the
/// template centre is taken from the raw trace and cut from the smoothed one.
pub fn run_pipeline(
    samples: &SampleSeries,
    cfg: &PipelineConfig,
) -> Result<PipelineRun, EcgError> {
    cfg.validate()?;

    let smoothed = smooth(samples.voltages())?;
    debug!("smoothed {} samples", smoothed.len());

    let template = extract(samples.voltages(), &smoothed, cfg.template_half_width)?;
    debug!(
        "template of {} samples centred on sample {} (t = {}s)",
        template.len(),
        template.center_index,
        samples.times()[template.center_index]
    );

    let scores = correlate(&template.waveform, &smoothed)?;
    debug!("{} match scores, mean {:.4}", scores.len(), scores.mean());

    let peaks = detect(&scores, cfg.threshold_factor, cfg.min_separation)?;
    if peaks.is_empty() {
        warn!(
            "no beats above threshold {:.4} (factor {})",
            peaks.threshold, cfg.threshold_factor
        );
    }

    let report = summarize(&peaks, samples, cfg.observation_minutes)?;
    info!(
        "{} beats over {}s, mean rate {:.4} beats/s",
        report.beat_count, report.duration, report.heart_rate
    );

    Ok(PipelineRun {
        smoothed,
        template,
        scores,
        peaks,
        report,
    })
}

/// Run the full pipeline and keep only the summary.
pub fn detect_beats(samples: &SampleSeries, cfg: &PipelineConfig) -> Result<BeatReport, EcgError> {
    run_pipeline(samples, cfg).map(|run| run.report)
}
