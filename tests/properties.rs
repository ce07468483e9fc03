//! Property-based tests for scoring and buffering invariants

use chrono::{Duration, TimeZone, Utc};
use mindsync::prelude::*;
use proptest::prelude::*;

fn reading() -> impl Strategy<Value = (f64, f64, f64)> {
    (-1e6f64..1e6, -1e6f64..1e6, -1e6f64..1e6)
}

proptest! {
    /// Any finite reading scores inside [0, 100]
    #[test]
    fn test_score_is_bounded((hr, gsr, cortisol) in reading()) {
        let score = stress_score(&Sample::now(hr, gsr, cortisol));
        prop_assert!(score.value() >= 0.0 && score.value() <= 100.0);
    }

    /// Raising any single reading never lowers the score
    #[test]
    fn test_score_is_monotonic((hr, gsr, cortisol) in reading(), bump in 0.0f64..1e3) {
        let base = stress_score(&Sample::now(hr, gsr, cortisol)).value();
        prop_assert!(stress_score(&Sample::now(hr + bump, gsr, cortisol)).value() >= base);
        prop_assert!(stress_score(&Sample::now(hr, gsr + bump, cortisol)).value() >= base);
        prop_assert!(stress_score(&Sample::now(hr, gsr, cortisol + bump)).value() >= base);
    }

    /// Every score maps to the band its thresholds imply
    #[test]
    fn test_band_is_total(value in -50.0f64..150.0) {
        let score = StressScore::new(value);
        let expected = if score.value() < 30.0 {
            Band::Safe
        } else if score.value() < 70.0 {
            Band::Caution
        } else {
            Band::Alert
        };
        prop_assert_eq!(score.band(), expected);
    }

    /// The buffer never exceeds capacity and holds the newest samples in order
    #[test]
    fn test_buffer_bound_and_order(capacity in 1usize..200, appends in 0usize..500) {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut buffer = RollingBuffer::with_capacity(capacity);
        for i in 0..appends {
            buffer.append(Sample::new(i as f64, 0.0, 0.0, t0 + Duration::seconds(i as i64)));
            prop_assert!(buffer.len() <= capacity);
        }

        prop_assert_eq!(buffer.len(), appends.min(capacity));
        let first_kept = appends.saturating_sub(capacity);
        for (offset, sample) in buffer.iter().enumerate() {
            prop_assert_eq!(sample.heart_rate, (first_kept + offset) as f64);
        }
    }

    /// Generated readings stay inside their noise bands for any seed
    #[test]
    fn test_generator_respects_noise(seed in any::<u64>()) {
        let config = GeneratorConfig::default();
        let mut generator = SampleGenerator::seeded(config, seed);
        for _ in 0..20 {
            let s = generator.generate();
            prop_assert!(s.heart_rate >= config.heart_rate.min() && s.heart_rate < config.heart_rate.max());
            prop_assert!(s.gsr >= config.gsr.min() && s.gsr < config.gsr.max());
            prop_assert!(s.cortisol >= config.cortisol.min() && s.cortisol < config.cortisol.max());
        }
    }
}
