use neuromood_core::filter::{bandpass_filter, notch_filter};
use neuromood_core::synthesis::sine;
use neuromood_core::{
    band_powers, CoreError, CustomSignalParams, Emotion, EmotionClassifier, FilterConfig,
    Pipeline, SignalGenerator, SignalKind,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const SR: u32 = 256;

fn sum(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x + y).collect()
}

fn alpha_only(duration: f64) -> Vec<f64> {
    sum(
        &sine(10.0, 0.8, duration, SR, 0.0),
        &sine(11.0, 0.4, duration, SR, 0.0),
    )
}

fn delta_only(duration: f64) -> Vec<f64> {
    sum(
        &sine(1.0, 1.0, duration, SR, 0.0),
        &sine(2.5, 0.5, duration, SR, 0.0),
    )
}

/// Lag in samples that best aligns `b` with `a` over `range`
fn best_lag(a: &[f64], b: &[f64], range: std::ops::Range<usize>, max_lag: i64) -> i64 {
    let mut best = (0, f64::MIN);
    for lag in -max_lag..=max_lag {
        let score: f64 = range
            .clone()
            .map(|i| a[i] * b[(i as i64 + lag) as usize])
            .sum();
        if score > best.1 {
            best = (lag, score);
        }
    }
    best.0
}

#[test]
fn test_alpha_dominant_signal_is_not_sad() {
    let samples = alpha_only(10.0);
    for config in [FilterConfig::default(), FilterConfig::none()] {
        let estimate = Pipeline::new(config).estimate(&samples, SR).unwrap();
        let fractions = estimate.band_powers.fractions(1e-12);
        assert!(fractions.alpha > 0.6, "alpha fraction {}", fractions.alpha);
        assert_ne!(estimate.emotion, Emotion::Sad);
        assert!(estimate.probabilities.sad < estimate.probabilities.happy);
    }
}

#[test]
fn test_delta_dominant_signal_is_sad() {
    let samples = delta_only(10.0);
    for config in [FilterConfig::default(), FilterConfig::none()] {
        let estimate = Pipeline::new(config).estimate(&samples, SR).unwrap();
        assert_eq!(estimate.emotion, Emotion::Sad);
    }
}

#[test]
fn test_happy_and_sad_presets_classify_as_generated() {
    let generator = SignalGenerator::default();
    let pipeline = Pipeline::default();
    let mut rng = StdRng::seed_from_u64(2024);

    let happy = pipeline.analyze(&generator.happy(&mut rng)).unwrap();
    assert_eq!(happy.estimate.emotion, Emotion::Happy);
    assert!(happy.matches_source());

    let sad = pipeline.analyze(&generator.sad(&mut rng)).unwrap();
    assert_eq!(sad.estimate.emotion, Emotion::Sad);
    assert!(sad.matches_source());
}

#[test]
fn test_neutral_preset_reads_as_happy() {
    // The neutral mix is still ~85% alpha, which the calibrated scores
    // rank as happy on every seed
    let generator = SignalGenerator::default();
    let pipeline = Pipeline::default();
    for seed in 0..5 {
        let signal = generator.neutral(&mut StdRng::seed_from_u64(seed));
        let report = pipeline.analyze(&signal).unwrap();
        let fractions = report.estimate.band_powers.fractions(1e-12);
        assert_eq!(report.source_emotion, Emotion::Neutral);
        assert_eq!(report.estimate.emotion, Emotion::Happy, "seed {}", seed);
        assert!(fractions.alpha > 0.8, "seed {}: alpha {}", seed, fractions.alpha);
        assert!(!report.matches_source());
    }
}

#[test]
fn test_custom_tag_and_estimate_are_independent() {
    // Default weights infer "neutral", but alpha still dominates the spectrum
    let generator = SignalGenerator::default();
    let kind = SignalKind::Custom(CustomSignalParams::default());
    let signal = generator
        .generate(&kind, &mut StdRng::seed_from_u64(5))
        .unwrap();
    assert_eq!(signal.emotion(), Emotion::Neutral);

    let report = Pipeline::default().analyze(&signal).unwrap();
    assert_eq!(report.source_emotion, Emotion::Neutral);
    assert_eq!(report.estimate.emotion, Emotion::Happy);
    assert!(!report.matches_source());
}

#[test]
fn test_bandpass_is_zero_phase() {
    // Long enough for the 0.5 Hz edge transients to die out mid-signal
    let original = sine(10.0, 1.0, 8.0, SR, 0.0);
    let filtered = bandpass_filter(&original, 0.5, 45.0, SR, 4).unwrap();
    assert_eq!(filtered.len(), original.len());

    assert_eq!(best_lag(&original, &filtered, 768..1280, 6), 0);
    for i in 768..1280 {
        assert!(
            (original[i] - filtered[i]).abs() < 0.02,
            "sample {} differs: {} vs {}",
            i,
            original[i],
            filtered[i]
        );
    }
}

#[test]
fn test_notch_is_zero_phase() {
    let original = sine(12.0, 1.0, 8.0, SR, 0.7);
    let filtered = notch_filter(&original, 50.0, SR, 30.0).unwrap();
    assert_eq!(filtered.len(), original.len());
    assert_eq!(best_lag(&original, &filtered, 768..1280, 6), 0);
}

#[test]
fn test_constant_input() {
    let constant = vec![2.5; 512];

    // Notch has unit DC gain
    let notched = notch_filter(&constant, 50.0, SR, 30.0).unwrap();
    for v in &notched {
        assert!((v - 2.5).abs() < 1e-9, "notch changed constant: {}", v);
    }

    // Band-pass rejects DC entirely
    let banded = bandpass_filter(&constant, 0.5, 45.0, SR, 4).unwrap();
    for v in &banded {
        assert!(v.abs() < 1e-6, "band-pass left DC: {}", v);
    }
}

#[test]
fn test_pipeline_is_deterministic() {
    let samples = sum(&alpha_only(5.0), &delta_only(5.0));
    let pipeline = Pipeline::default();

    let first = pipeline.estimate(&samples, SR).unwrap();
    let second = pipeline.estimate(&samples, SR).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.band_powers.to_array().map(f64::to_bits),
        second.band_powers.to_array().map(f64::to_bits)
    );
}

#[test]
fn test_seeded_generation_is_reproducible() {
    let generator = SignalGenerator::new(3.0, SR).unwrap();
    let a = generator.happy(&mut StdRng::seed_from_u64(11));
    let b = generator.happy(&mut StdRng::seed_from_u64(11));
    assert_eq!(a, b);

    let pipeline = Pipeline::default();
    assert_eq!(pipeline.analyze(&a).unwrap(), pipeline.analyze(&b).unwrap());
}

#[test]
fn test_spike_is_removed_before_analysis() {
    let mut samples = alpha_only(4.0);
    samples[500] += 40.0;
    let config = FilterConfig {
        artifact: Some(Default::default()),
        ..FilterConfig::none()
    };
    let processed = Pipeline::new(config).process(&samples, SR).unwrap();
    assert!(processed.replaced >= 1);
    let residual = processed.artifacts.unwrap();
    assert!(residual[500] > 30.0);
    assert!(processed.samples[500].abs() < 2.0);
}

#[test]
fn test_non_finite_sample_is_an_error() {
    let mut samples = sine(1.0, 1.0, 4.0, SR, 0.0);
    samples[100] = f64::NAN;
    for config in [FilterConfig::default(), FilterConfig::none()] {
        let result = Pipeline::new(config).estimate(&samples, SR);
        assert!(
            matches!(result, Err(CoreError::NonFiniteSample { index: 100 })),
            "got {:?}",
            result
        );
    }
}

#[test]
fn test_short_signal_still_reports_every_band() {
    let powers = band_powers(&[0.3, -0.1, 0.2], SR).unwrap();
    assert_eq!(powers.to_array().len(), 5);
    let estimate = EmotionClassifier::new().classify(&powers);
    assert!((estimate.probabilities.total() - 1.0).abs() < 1e-9);
}
