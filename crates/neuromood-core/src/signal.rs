//! Signal data model
//!
//! A [`Signal`] is an immutable run of synthetic EEG samples together with the
//! emotion it was generated to resemble. Later pipeline stages only ever read
//! from it.

use crate::error::{CoreError, Result as CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default sample rate in Hz
pub const SAMPLE_RATE: u32 = 256;

/// Default signal duration in seconds
pub const DURATION: f64 = 10.0;

/// Discrete emotional state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    /// Positive, alert state
    Happy,
    /// Relaxed baseline
    Neutral,
    /// Low, withdrawn state
    Sad,
}

impl Emotion {
    /// Every emotion in fixed priority order (also the classifier tie-break order)
    pub const ALL: [Emotion; 3] = [Emotion::Happy, Emotion::Neutral, Emotion::Sad];

    /// Stable lowercase tag handed to downstream consumers
    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Neutral => "neutral",
            Emotion::Sad => "sad",
        }
    }

    /// Position in [`Emotion::ALL`]
    pub fn index(self) -> usize {
        match self {
            Emotion::Happy => 0,
            Emotion::Neutral => 1,
            Emotion::Sad => 2,
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "happy" => Ok(Emotion::Happy),
            "neutral" => Ok(Emotion::Neutral),
            "sad" => Ok(Emotion::Sad),
            other => Err(format!("unknown emotion '{}'", other)),
        }
    }
}

/// A synthesized EEG-like signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SignalData")]
pub struct Signal {
    samples: Vec<f64>,
    sample_rate: u32,
    duration: f64,
    emotion: Emotion,
    label: String,
}

/// Unchecked wire form of [`Signal`]
#[derive(Deserialize)]
struct SignalData {
    samples: Vec<f64>,
    sample_rate: u32,
    duration: f64,
    emotion: Emotion,
    label: String,
}

impl TryFrom<SignalData> for Signal {
    type Error = CoreError;

    fn try_from(data: SignalData) -> CoreResult<Self> {
        Signal::new(
            data.samples,
            data.sample_rate,
            data.duration,
            data.emotion,
            data.label,
        )
    }
}

impl Signal {
    /// Wrap already generated samples.
    ///
    /// Fails unless `duration` and `sample_rate` are positive, the sample
    /// count equals [`sample_count`] for them and every sample is finite.
    pub fn new(
        samples: Vec<f64>,
        sample_rate: u32,
        duration: f64,
        emotion: Emotion,
        label: impl Into<String>,
    ) -> CoreResult<Self> {
        if sample_rate == 0 {
            return Err(CoreError::signal("sample rate must be positive"));
        }
        if !duration.is_finite() || duration <= 0.0 {
            return Err(CoreError::signal(format!(
                "duration {} s must be positive",
                duration
            )));
        }
        let expected = sample_count(duration, sample_rate);
        if samples.len() != expected {
            return Err(CoreError::signal(format!(
                "{} samples given, {} s at {} Hz needs {}",
                samples.len(),
                duration,
                sample_rate,
                expected
            )));
        }
        check_finite(&samples)?;
        Ok(Self::from_parts(samples, sample_rate, duration, emotion, label))
    }

    /// Construction for the generator, which sizes `samples` itself
    pub(crate) fn from_parts(
        samples: Vec<f64>,
        sample_rate: u32,
        duration: f64,
        emotion: Emotion,
        label: impl Into<String>,
    ) -> Self {
        Self {
            samples,
            sample_rate,
            duration,
            emotion,
            label: label.into(),
        }
    }

    /// Sample values
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Samples per second
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Emotion the signal was generated for
    pub fn emotion(&self) -> Emotion {
        self.emotion
    }

    /// Human-readable label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the signal holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Error on an empty sequence or the first NaN/infinite sample
pub fn check_samples(samples: &[f64]) -> CoreResult<()> {
    if samples.is_empty() {
        return Err(CoreError::EmptySignal);
    }
    check_finite(samples)
}

fn check_finite(samples: &[f64]) -> CoreResult<()> {
    match samples.iter().position(|s| !s.is_finite()) {
        Some(index) => Err(CoreError::NonFiniteSample { index }),
        None => Ok(()),
    }
}

/// Number of samples covering `duration` seconds at `sample_rate`
pub fn sample_count(duration: f64, sample_rate: u32) -> usize {
    let n = (duration * sample_rate as f64).round();
    if n.is_finite() && n > 0.0 {
        n as usize
    } else {
        0
    }
}
