//! End-to-end analysis: filtering -> band powers -> emotion estimate
//!
//! The pipeline holds only configuration. Each call reads its input and
//! returns fresh values, so one instance can serve many threads at once.

use crate::classifier::{EmotionClassifier, EmotionEstimate};
use crate::error::Result;
use crate::filter::{FilterConfig, FilterPipeline};
use crate::signal::{Emotion, Signal};
use crate::spectrum::band_powers;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Samples after the filter stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedSignal {
    /// Filtered samples
    pub samples: Vec<f64>,
    /// Artifact residual, if artifact removal ran
    pub artifacts: Option<Vec<f64>>,
    /// Number of samples replaced as artifacts
    pub replaced: usize,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

/// Everything produced by one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Label of the analysed signal
    pub label: String,
    /// Emotion tag the signal was generated with
    pub source_emotion: Emotion,
    /// Filtered signal
    pub processed: ProcessedSignal,
    /// Classifier output
    pub estimate: EmotionEstimate,
}

impl AnalysisReport {
    /// True when the classifier agrees with the generation-time tag
    pub fn matches_source(&self) -> bool {
        self.estimate.emotion == self.source_emotion
    }
}

/// Filter, analyse and classify
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pipeline {
    filters: FilterPipeline,
    classifier: EmotionClassifier,
}

impl Pipeline {
    /// Pipeline running the given filter stages
    pub fn new(filters: FilterConfig) -> Self {
        Self {
            filters: FilterPipeline::new(filters),
            classifier: EmotionClassifier::new(),
        }
    }

    /// Filter stage selection
    pub fn filter_config(&self) -> &FilterConfig {
        self.filters.config()
    }

    /// Run the filter stages only
    pub fn process(&self, samples: &[f64], sample_rate: u32) -> Result<ProcessedSignal> {
        let filtered = self.filters.apply(samples, sample_rate)?;
        Ok(ProcessedSignal {
            samples: filtered.samples,
            artifacts: filtered.artifacts,
            replaced: filtered.replaced,
            sample_rate,
        })
    }

    /// Classify already filtered samples
    pub fn classify(&self, processed: &ProcessedSignal) -> Result<EmotionEstimate> {
        let powers = band_powers(&processed.samples, processed.sample_rate)?;
        Ok(self.classifier.classify(&powers))
    }

    /// Filter then classify a raw sample sequence
    pub fn estimate(&self, samples: &[f64], sample_rate: u32) -> Result<EmotionEstimate> {
        let processed = self.process(samples, sample_rate)?;
        self.classify(&processed)
    }

    /// Full run over a generated signal
    pub fn analyze(&self, signal: &Signal) -> Result<AnalysisReport> {
        debug!(
            "Analyzing '{}' ({} samples at {} Hz)",
            signal.label(),
            signal.len(),
            signal.sample_rate()
        );
        let processed = self.process(signal.samples(), signal.sample_rate())?;
        let estimate = self.classify(&processed)?;

        info!(
            "'{}' classified as {} ({:.1}% confidence), generated as {}",
            signal.label(),
            estimate.emotion,
            estimate.confidence * 100.0,
            signal.emotion()
        );

        Ok(AnalysisReport {
            label: signal.label().to_string(),
            source_emotion: signal.emotion(),
            processed,
            estimate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::signal::sample_count;
    use crate::synthesis::sine;

    #[test]
    fn test_process_keeps_length_and_rate() {
        let samples = sine(10.0, 1.0, 2.0, 256, 0.0);
        let processed = Pipeline::default().process(&samples, 256).unwrap();
        assert_eq!(processed.samples.len(), samples.len());
        assert_eq!(processed.sample_rate, 256);
        assert_eq!(
            processed.artifacts.as_ref().map(Vec::len),
            Some(samples.len())
        );
    }

    #[test]
    fn test_empty_signal_fails() {
        assert!(matches!(
            Pipeline::default().estimate(&[], 256),
            Err(CoreError::EmptySignal)
        ));
    }

    #[test]
    fn test_analyze_report() {
        let samples = sine(1.0, 1.0, 4.0, 128, 0.0);
        assert_eq!(samples.len(), sample_count(4.0, 128));
        let signal = Signal::new(samples, 128, 4.0, Emotion::Sad, "slow wave").unwrap();
        let report = Pipeline::new(FilterConfig::none()).analyze(&signal).unwrap();
        assert_eq!(report.label, "slow wave");
        assert_eq!(report.source_emotion, Emotion::Sad);
        assert_eq!(report.processed.samples, signal.samples());
        assert!(report.matches_source());
    }
}
