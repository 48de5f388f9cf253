//! Report rendering for the terminal

use neuromood_core::{AnalysisReport, BandPowers, Emotion, EmotionProbabilities};
use serde::Serialize;
use std::fmt::Write;

/// JSON view of a report, without the sample buffers
#[derive(Debug, Serialize)]
pub struct ReportSummary<'a> {
    pub label: &'a str,
    pub sample_rate: u32,
    pub samples: usize,
    pub generated_as: Emotion,
    pub estimated: Emotion,
    pub confidence: f64,
    pub probabilities: EmotionProbabilities,
    pub band_powers: BandPowers,
    pub band_fractions: BandPowers,
    pub artifacts_replaced: usize,
}

impl<'a> From<&'a AnalysisReport> for ReportSummary<'a> {
    fn from(report: &'a AnalysisReport) -> Self {
        let estimate = &report.estimate;
        Self {
            label: &report.label,
            sample_rate: report.processed.sample_rate,
            samples: report.processed.samples.len(),
            generated_as: report.source_emotion,
            estimated: estimate.emotion,
            confidence: estimate.confidence,
            probabilities: estimate.probabilities,
            band_powers: estimate.band_powers,
            band_fractions: estimate.band_powers.fractions(1e-12),
            artifacts_replaced: report.processed.replaced,
        }
    }
}

/// Plain-text summary
pub fn render_text(report: &AnalysisReport) -> String {
    let summary = ReportSummary::from(report);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Signal:        {} ({} samples @ {} Hz)",
        summary.label, summary.samples, summary.sample_rate
    );
    let _ = writeln!(out, "Generated as:  {}", summary.generated_as);
    let _ = writeln!(
        out,
        "Estimated:     {} ({:.1}% confidence)",
        summary.estimated,
        summary.confidence * 100.0
    );
    let _ = writeln!(
        out,
        "Probabilities: {}",
        Emotion::ALL
            .iter()
            .map(|e| format!("{} {:.3}", e, summary.probabilities.get(*e)))
            .collect::<Vec<_>>()
            .join("  ")
    );
    let _ = writeln!(out, "Band powers:");
    for (band, power) in summary.band_powers.iter() {
        let _ = writeln!(
            out,
            "  {:<6} {:>14.3}  ({:>5.1}%)",
            band.as_str(),
            power,
            summary.band_fractions.get(band) * 100.0
        );
    }
    if report.processed.artifacts.is_some() {
        let _ = writeln!(out, "Artifacts:     {} samples replaced", summary.artifacts_replaced);
    }
    out
}
