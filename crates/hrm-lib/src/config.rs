use crate::{
    detectors::{peaks::DEFAULT_MIN_SEPARATION, template::DEFAULT_HALF_WIDTH},
    error::EcgError,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable parameters of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Multiple of the mean match score a peak must reach.
    pub threshold_factor: f64,
    /// Heart-rate normalisation window (minutes).
    pub observation_minutes: f64,
    /// Half the template length, in samples.
    pub template_half_width: usize,
    /// Radius of the local-maximum window, in samples.
    pub min_separation: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            threshold_factor: 7.0,
            observation_minutes: 2.0,
            template_half_width: DEFAULT_HALF_WIDTH,
            min_separation: DEFAULT_MIN_SEPARATION,
        }
    }
}

impl PipelineConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(text).context("parsing pipeline config")?;
        Ok(cfg)
    }

    pub fn from_toml_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Reject settings no recording could satisfy.
    pub fn validate(&self) -> Result<(), EcgError> {
        if self.observation_minutes.is_nan() || self.observation_minutes <= 0.0 {
            return Err(EcgError::InvalidObservationWindow(self.observation_minutes));
        }
        if !self.threshold_factor.is_finite() {
            return Err(EcgError::InvalidThresholdFactor(self.threshold_factor));
        }
        if self.template_half_width == 0 {
            return Err(EcgError::insufficient("template", 1, 0));
        }
        Ok(())
    }
}
