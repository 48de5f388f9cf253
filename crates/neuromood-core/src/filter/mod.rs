//! Filter pipeline: band-pass -> notch -> artifact removal
//!
//! Every stage is optional and stateless. Band-pass and notch run zero-phase
//! (forward-backward), so filtered samples stay time-aligned with the input.
//! No stage changes the number of samples.
//!
//! Note that the band-pass rejects DC: a constant input comes out as (near)
//! zero. The notch has unit DC gain and passes constants through.

pub mod artifact;
pub mod biquad;
pub mod butterworth;

pub use artifact::{remove_artifacts, ArtifactCorrection};
pub use biquad::{filtfilt, Biquad};

use crate::error::{CoreError, Result};
use crate::signal::check_samples;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Band-pass stage settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BandpassConfig {
    /// Low cutoff in Hz
    pub low: f64,
    /// High cutoff in Hz
    pub high: f64,
    /// Butterworth order
    pub order: usize,
}

impl Default for BandpassConfig {
    fn default() -> Self {
        Self {
            low: 0.5,
            high: 45.0,
            order: 4,
        }
    }
}

/// Notch stage settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotchConfig {
    /// Centre frequency in Hz
    pub freq: f64,
    /// Quality factor
    pub quality: f64,
}

impl Default for NotchConfig {
    fn default() -> Self {
        Self {
            freq: 50.0,
            quality: 30.0,
        }
    }
}

/// Artifact removal stage settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArtifactConfig {
    /// Outlier threshold in standard deviations
    pub threshold: f64,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            threshold: artifact::DEFAULT_THRESHOLD,
        }
    }
}

/// Which stages to run. `None` skips a stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Band-pass stage
    pub bandpass: Option<BandpassConfig>,
    /// Power-line notch stage
    pub notch: Option<NotchConfig>,
    /// Artifact removal stage
    pub artifact: Option<ArtifactConfig>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            bandpass: Some(BandpassConfig::default()),
            notch: Some(NotchConfig::default()),
            artifact: Some(ArtifactConfig::default()),
        }
    }
}

impl FilterConfig {
    /// All stages disabled
    pub fn none() -> Self {
        Self {
            bandpass: None,
            notch: None,
            artifact: None,
        }
    }
}

/// Result of running the filter stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredSamples {
    /// Cleaned samples, same length as the input
    pub samples: Vec<f64>,
    /// Artifact residual, present only if artifact removal ran
    pub artifacts: Option<Vec<f64>>,
    /// Number of samples replaced by artifact removal
    pub replaced: usize,
}

/// Applies the configured stages in fixed order
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilterPipeline {
    config: FilterConfig,
}

impl FilterPipeline {
    /// Create a pipeline for the given stage selection
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    /// Stage selection
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Filter `samples` recorded at `sample_rate`.
    ///
    /// All filters are designed before any sample is touched, so bad
    /// parameters fail without partial work.
    pub fn apply(&self, samples: &[f64], sample_rate: u32) -> Result<FilteredSamples> {
        check_samples(samples)?;

        let bandpass = self
            .config
            .bandpass
            .map(|c| butterworth::bandpass(c.low, c.high, c.order, sample_rate))
            .transpose()?;
        let notch = self
            .config
            .notch
            .map(|c| butterworth::notch(c.freq, c.quality, sample_rate))
            .transpose()?;
        if let Some(c) = self.config.artifact {
            if !c.threshold.is_finite() || c.threshold <= 0.0 {
                return Err(CoreError::filter(format!(
                    "artifact threshold {} must be positive",
                    c.threshold
                )));
            }
        }

        let mut data = samples.to_vec();
        if let Some(sections) = &bandpass {
            data = filtfilt(sections, &data);
        }
        if let Some(section) = notch {
            data = filtfilt(&[section], &data);
        }

        let (data, artifacts, replaced) = match self.config.artifact {
            Some(c) => {
                let correction = remove_artifacts(&data, c.threshold)?;
                let count = correction.replaced.len();
                (correction.cleaned, Some(correction.residual), count)
            }
            None => (data, None, 0),
        };

        debug!(
            "Filtered {} samples at {} Hz (bandpass={}, notch={}, artifacts={})",
            data.len(),
            sample_rate,
            bandpass.is_some(),
            notch.is_some(),
            artifacts.is_some()
        );

        Ok(FilteredSamples {
            samples: data,
            artifacts,
            replaced,
        })
    }
}

/// Zero-phase Butterworth band-pass over `[low, high]` Hz
pub fn bandpass_filter(
    samples: &[f64],
    low: f64,
    high: f64,
    sample_rate: u32,
    order: usize,
) -> Result<Vec<f64>> {
    check_samples(samples)?;
    let sections = butterworth::bandpass(low, high, order, sample_rate)?;
    Ok(filtfilt(&sections, samples))
}

/// Zero-phase notch at `freq` Hz
pub fn notch_filter(samples: &[f64], freq: f64, sample_rate: u32, quality: f64) -> Result<Vec<f64>> {
    check_samples(samples)?;
    let section = butterworth::notch(freq, quality, sample_rate)?;
    Ok(filtfilt(&[section], samples))
}
