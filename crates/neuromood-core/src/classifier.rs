//! Heuristic emotion scoring over band powers
//!
//! Not a trained model. Band powers are normalised to fractions of the total,
//! scored with three fixed linear formulas and turned into a distribution with
//! a temperature softmax. The coefficients are tuned against the synthetic
//! generators in [`crate::synthesis`].

use crate::error::Result;
use crate::signal::Emotion;
use crate::spectrum::{band_powers, BandPowers};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Added to the total power before normalising
pub const TOTAL_EPSILON: f64 = 1e-12;

/// Added to alpha in the beta/alpha ratio
pub const RATIO_EPSILON: f64 = 1e-6;

/// Softmax temperature
pub const TEMPERATURE: f64 = 1.1;

/// Probability of each emotion, summing to 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionProbabilities {
    /// P(happy)
    pub happy: f64,
    /// P(neutral)
    pub neutral: f64,
    /// P(sad)
    pub sad: f64,
}

impl EmotionProbabilities {
    /// Probability of one emotion
    pub fn get(&self, emotion: Emotion) -> f64 {
        match emotion {
            Emotion::Happy => self.happy,
            Emotion::Neutral => self.neutral,
            Emotion::Sad => self.sad,
        }
    }

    /// Sum over all emotions
    pub fn total(&self) -> f64 {
        self.happy + self.neutral + self.sad
    }

    /// Most probable emotion.
    ///
    /// Exact ties go to the emotion listed first in [`Emotion::ALL`]
    /// (happy, then neutral, then sad).
    pub fn argmax(&self) -> Emotion {
        let mut best = Emotion::ALL[0];
        for emotion in Emotion::ALL {
            if self.get(emotion) > self.get(best) {
                best = emotion;
            }
        }
        best
    }
}

/// Raw linear scores before the softmax
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionScores {
    /// Happy score
    pub happy: f64,
    /// Neutral score
    pub neutral: f64,
    /// Sad score
    pub sad: f64,
}

impl EmotionScores {
    /// Score the normalised band fractions
    pub fn from_fractions(norm: &BandPowers) -> Self {
        let alpha = norm.alpha;
        let beta = norm.beta;
        let gamma = norm.gamma;
        let theta = norm.theta;
        let delta = norm.delta;

        let theta_delta = theta + delta;
        let high_freq = alpha + beta + gamma;
        let beta_alpha = beta / (alpha + RATIO_EPSILON);

        let happy = 2.0 * alpha + 1.1 * beta + 1.3 * gamma - 0.6 * theta_delta
            + 0.3 * beta_alpha
            + 0.2 * high_freq;

        let neutral = 1.2 * alpha + 1.0 * beta + 0.8 * theta + 0.5 * gamma
            - 0.3 * (alpha - 0.30).abs()
            - 0.3 * (theta_delta - 0.35).abs();

        let sad = 1.5 * theta_delta + 0.8 * delta + 0.4 * theta - 0.7 * alpha - 0.4 * gamma;

        Self {
            happy,
            neutral,
            sad,
        }
    }

    /// Temperature softmax over the three scores
    pub fn softmax(&self, temperature: f64) -> EmotionProbabilities {
        // Shifting by the max leaves the result unchanged and avoids overflow
        let max = self.happy.max(self.neutral).max(self.sad);
        let exp_h = ((self.happy - max) / temperature).exp();
        let exp_n = ((self.neutral - max) / temperature).exp();
        let exp_s = ((self.sad - max) / temperature).exp();
        let total = exp_h + exp_n + exp_s;
        EmotionProbabilities {
            happy: exp_h / total,
            neutral: exp_n / total,
            sad: exp_s / total,
        }
    }
}

/// Classifier output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionEstimate {
    /// Most probable emotion
    pub emotion: Emotion,
    /// Probability of `emotion`
    pub confidence: f64,
    /// Full distribution
    pub probabilities: EmotionProbabilities,
    /// Band powers that produced the estimate
    pub band_powers: BandPowers,
}

/// Maps band powers to an [`EmotionEstimate`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionClassifier {
    temperature: f64,
}

impl Default for EmotionClassifier {
    fn default() -> Self {
        Self {
            temperature: TEMPERATURE,
        }
    }
}

impl EmotionClassifier {
    /// Classifier with the calibrated temperature
    pub fn new() -> Self {
        Self::default()
    }

    /// Softmax temperature
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Classify a set of band powers
    pub fn classify(&self, powers: &BandPowers) -> EmotionEstimate {
        let norm = powers.fractions(TOTAL_EPSILON);
        let scores = EmotionScores::from_fractions(&norm);
        let probabilities = scores.softmax(self.temperature);
        let emotion = probabilities.argmax();
        let confidence = probabilities.get(emotion);

        debug!(
            "Scores happy={:.4} neutral={:.4} sad={:.4} -> {} ({:.1}%)",
            scores.happy,
            scores.neutral,
            scores.sad,
            emotion,
            confidence * 100.0
        );

        EmotionEstimate {
            emotion,
            confidence,
            probabilities,
            band_powers: *powers,
        }
    }

    /// Band powers of `samples`, then [`EmotionClassifier::classify`]
    pub fn classify_samples(&self, samples: &[f64], sample_rate: u32) -> Result<EmotionEstimate> {
        let powers = band_powers(samples, sample_rate)?;
        Ok(self.classify(&powers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn powers(delta: f64, theta: f64, alpha: f64, beta: f64, gamma: f64) -> BandPowers {
        BandPowers::from_array([delta, theta, alpha, beta, gamma])
    }

    #[test]
    fn test_distribution_sums_to_one() {
        let classifier = EmotionClassifier::new();
        let estimate = classifier.classify(&powers(1.0, 2.0, 3.0, 4.0, 5.0));
        assert!((estimate.probabilities.total() - 1.0).abs() < 1e-12);
        assert_eq!(
            estimate.confidence,
            estimate.probabilities.get(estimate.emotion)
        );
    }

    #[test]
    fn test_silence_ties_resolve_to_happy() {
        // Zero power normalises to all-zero fractions; scores are
        // happy 0, neutral -0.3*0.30 - 0.3*0.35 = -0.195, sad 0
        let estimate = EmotionClassifier::new().classify(&BandPowers::default());
        assert!((estimate.probabilities.total() - 1.0).abs() < 1e-12);
        assert_eq!(estimate.probabilities.happy, estimate.probabilities.sad);
        // Happy and sad tie; happy comes first
        assert_eq!(estimate.emotion, Emotion::Happy);
    }

    #[test]
    fn test_tie_break_order() {
        let even = EmotionProbabilities {
            happy: 1.0 / 3.0,
            neutral: 1.0 / 3.0,
            sad: 1.0 / 3.0,
        };
        assert_eq!(even.argmax(), Emotion::Happy);

        let neutral_sad = EmotionProbabilities {
            happy: 0.2,
            neutral: 0.4,
            sad: 0.4,
        };
        assert_eq!(neutral_sad.argmax(), Emotion::Neutral);
    }

    #[test]
    fn test_scores_match_formulas() {
        let norm = powers(0.1, 0.2, 0.3, 0.25, 0.15);
        let scores = EmotionScores::from_fractions(&norm);
        let beta_alpha = 0.25 / (0.3 + 1e-6);
        let happy = 2.0 * 0.3 + 1.1 * 0.25 + 1.3 * 0.15 - 0.6 * 0.3
            + 0.3 * beta_alpha
            + 0.2 * 0.7;
        let neutral = 1.2 * 0.3 + 0.25 + 0.8 * 0.2 + 0.5 * 0.15 - 0.0 - 0.3 * 0.05;
        let sad = 1.5 * 0.3 + 0.8 * 0.1 + 0.4 * 0.2 - 0.7 * 0.3 - 0.4 * 0.15;
        assert!((scores.happy - happy).abs() < 1e-9);
        assert!((scores.neutral - neutral).abs() < 1e-9);
        assert!((scores.sad - sad).abs() < 1e-9);
    }

    #[test]
    fn test_softmax_temperature() {
        let scores = EmotionScores {
            happy: 1.1,
            neutral: 0.0,
            sad: 0.0,
        };
        let probs = scores.softmax(1.1);
        let e = std::f64::consts::E;
        assert!((probs.happy - e / (e + 2.0)).abs() < 1e-12);
        assert!((probs.neutral - 1.0 / (e + 2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_extreme_scores_stay_finite() {
        let scores = EmotionScores {
            happy: 1e6,
            neutral: -1e6,
            sad: 0.0,
        };
        let probs = scores.softmax(TEMPERATURE);
        assert!(probs.happy.is_finite());
        assert!((probs.total() - 1.0).abs() < 1e-12);
        assert_eq!(probs.argmax(), Emotion::Happy);
    }

    #[test]
    fn test_classify_samples_rejects_empty() {
        assert!(EmotionClassifier::new().classify_samples(&[], 256).is_err());
    }

    #[test]
    fn test_delta_dominant_is_sad() {
        let estimate = EmotionClassifier::new().classify(&powers(100.0, 1.0, 1.0, 1.0, 1.0));
        assert_eq!(estimate.emotion, Emotion::Sad);
    }

    #[test]
    fn test_alpha_dominant_is_not_sad() {
        let estimate = EmotionClassifier::new().classify(&powers(0.0, 0.0, 100.0, 0.0, 0.0));
        assert_ne!(estimate.emotion, Emotion::Sad);
        assert_eq!(estimate.band_powers.alpha, 100.0);
    }

    #[test]
    fn test_huge_slow_wave_power_is_sad() {
        let estimate = EmotionClassifier::new().classify(&powers(f64::MAX, f64::MAX, 0.0, 0.0, 0.0));
        assert_eq!(estimate.emotion, Emotion::Sad);
        assert!((estimate.probabilities.total() - 1.0).abs() < 1e-12);
    }
}
