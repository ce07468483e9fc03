//! # Sample Generator
//!
//! Produces one synthetic [`Sample`] per call. Each reading is a fixed base
//! value perturbed by uniform noise:
//!
//! | Metric | Base | Spread | Range |
//! |--------|------|--------|-------|
//! | Heart rate | 75 | 15 | 67.5 .. 82.5 BPM |
//! | GSR | 12 | 4 | 10 .. 14 µS |
//! | Cortisol | 15 | 6 | 12 .. 18 μg/dL |
//!
//! Generation cannot fail. The only side effects are reading the system clock
//! and advancing the random source.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::sample::Sample;

/// Uniform noise around a base value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseSpec {
    /// Center of the distribution
    pub base: f64,

    /// Full width of the noise band; values fall in `base ± spread / 2`
    pub spread: f64,
}

impl NoiseSpec {
    /// Noise centred on `base`
    pub const fn new(base: f64, spread: f64) -> Self {
        Self { base, spread }
    }

    /// Smallest value this noise can produce
    pub fn min(&self) -> f64 {
        self.base - self.spread.abs() / 2.0
    }

    /// Upper bound (exclusive) of the values this noise can produce
    pub fn max(&self) -> f64 {
        self.base + self.spread.abs() / 2.0
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u: f64 = rng.gen();
        self.base + (u - 0.5) * self.spread
    }
}

/// Noise configuration for all three metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Heart rate noise
    pub heart_rate: NoiseSpec,
    /// GSR noise
    pub gsr: NoiseSpec,
    /// Cortisol noise
    pub cortisol: NoiseSpec,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            heart_rate: NoiseSpec::new(75.0, 15.0),
            gsr: NoiseSpec::new(12.0, 4.0),
            cortisol: NoiseSpec::new(15.0, 6.0),
        }
    }
}

/// Synthetic sample source
#[derive(Debug, Clone)]
pub struct SampleGenerator<R = StdRng> {
    config: GeneratorConfig,
    rng: R,
}

impl SampleGenerator<StdRng> {
    /// Generator with default noise, seeded from OS entropy
    pub fn new() -> Self {
        Self::with_config(GeneratorConfig::default())
    }

    /// Generator with the given noise, seeded from OS entropy
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for reproducible runs
    pub fn seeded(config: GeneratorConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SampleGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> SampleGenerator<R> {
    /// Generator driven by a caller-supplied random source
    pub fn from_rng(config: GeneratorConfig, rng: R) -> Self {
        Self { config, rng }
    }

    /// Noise configuration in use
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Produce a sample stamped with the current time
    pub fn generate(&mut self) -> Sample {
        self.generate_at(Utc::now())
    }

    /// Produce a sample stamped with `timestamp`
    pub fn generate_at(&mut self, timestamp: DateTime<Utc>) -> Sample {
        Sample::new(
            self.config.heart_rate.sample(&mut self.rng),
            self.config.gsr.sample(&mut self.rng),
            self.config.cortisol.sample(&mut self.rng),
            timestamp,
        )
    }
}
