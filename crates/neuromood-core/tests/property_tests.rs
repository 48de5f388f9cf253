use neuromood_core::{
    band_powers, bandpass_filter, notch_filter, remove_artifacts, sample_count, BandPowers,
    EmotionClassifier, FilterConfig, FilterPipeline, SignalGenerator,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn samples_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-100.0f64..100.0, 1..400)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn generated_length_matches_duration(duration in 0.1f64..4.0, sample_rate in 64u32..512, seed: u64) {
        let generator = SignalGenerator::new(duration, sample_rate).unwrap();
        let signal = generator.neutral(&mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(signal.len(), sample_count(duration, sample_rate));
        prop_assert_eq!(signal.len(), (duration * sample_rate as f64).round() as usize);
        prop_assert!(signal.samples().iter().all(|s| s.is_finite()));
    }

    #[test]
    fn probabilities_form_a_distribution(powers in prop::array::uniform5(0.0f64..1.0e6)) {
        let estimate = EmotionClassifier::new().classify(&BandPowers::from_array(powers));
        let probs = estimate.probabilities;
        prop_assert!((probs.total() - 1.0).abs() < 1e-9);
        for p in [probs.happy, probs.neutral, probs.sad] {
            prop_assert!((0.0..=1.0).contains(&p));
        }
        prop_assert_eq!(estimate.confidence, probs.get(estimate.emotion));
    }

    #[test]
    fn band_powers_are_non_negative(samples in samples_strategy(), sample_rate in 32u32..1024) {
        let powers = band_powers(&samples, sample_rate).unwrap();
        for (_, power) in powers.iter() {
            prop_assert!(power >= 0.0);
            prop_assert!(power.is_finite());
        }
    }

    #[test]
    fn filters_preserve_length(samples in samples_strategy()) {
        let n = samples.len();
        prop_assert_eq!(bandpass_filter(&samples, 0.5, 45.0, 256, 4).unwrap().len(), n);
        prop_assert_eq!(notch_filter(&samples, 50.0, 256, 30.0).unwrap().len(), n);

        let correction = remove_artifacts(&samples, 3.0).unwrap();
        prop_assert_eq!(correction.cleaned.len(), n);
        prop_assert_eq!(correction.residual.len(), n);

        let filtered = FilterPipeline::new(FilterConfig::default()).apply(&samples, 256).unwrap();
        prop_assert_eq!(filtered.samples.len(), n);
    }

    #[test]
    fn artifact_residual_accounts_for_changes(samples in samples_strategy()) {
        let correction = remove_artifacts(&samples, 2.0).unwrap();
        for i in 0..samples.len() {
            let restored = correction.cleaned[i] + correction.residual[i];
            prop_assert!((restored - samples[i]).abs() < 1e-9);
            if !correction.replaced.contains(&i) {
                prop_assert_eq!(correction.residual[i], 0.0);
            }
        }
    }
}
