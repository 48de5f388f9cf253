//! Statistical artifact correction
//!
//! Single pass: samples further than `threshold` standard deviations from
//! the mean are replaced by the average of their original neighbours. A
//! replacement is never re-examined.

use crate::error::{CoreError, Result};
use crate::signal::check_samples;
use tracing::debug;

/// Default outlier threshold in standard deviations
pub const DEFAULT_THRESHOLD: f64 = 3.0;

/// Output of [`remove_artifacts`]
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactCorrection {
    /// Corrected samples
    pub cleaned: Vec<f64>,
    /// `original - replacement` where a sample was replaced, 0 elsewhere
    pub residual: Vec<f64>,
    /// Indices of replaced samples
    pub replaced: Vec<usize>,
}

/// Mean and population standard deviation
pub fn mean_std(samples: &[f64]) -> (f64, f64) {
    if samples.is_empty() {
        return (0.0, 0.0);
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let var = samples.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Replace outliers with the mean of their neighbours.
///
/// At either end of the sequence the global mean stands in for the missing
/// neighbour.
pub fn remove_artifacts(samples: &[f64], threshold: f64) -> Result<ArtifactCorrection> {
    check_samples(samples)?;
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(CoreError::filter(format!(
            "artifact threshold {} must be positive",
            threshold
        )));
    }

    let (mean, std) = mean_std(samples);
    let limit = threshold * std;
    let last = samples.len() - 1;

    let mut cleaned = samples.to_vec();
    let mut residual = vec![0.0; samples.len()];
    let mut replaced = Vec::new();

    for (i, &value) in samples.iter().enumerate() {
        if (value - mean).abs() > limit {
            let left = if i > 0 { samples[i - 1] } else { mean };
            let right = if i < last { samples[i + 1] } else { mean };
            let replacement = (left + right) / 2.0;
            cleaned[i] = replacement;
            residual[i] = value - replacement;
            replaced.push(i);
        }
    }

    debug!(
        "Artifact removal: {} of {} samples replaced (mean={:.4}, std={:.4})",
        replaced.len(),
        samples.len(),
        mean,
        std
    );

    Ok(ArtifactCorrection {
        cleaned,
        residual,
        replaced,
    })
}
