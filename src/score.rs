//! # Stress Scorer
//!
//! Derives a bounded stress score from the most recent [`Sample`]. Each reading
//! is rescaled against a fixed safe-range floor and span, weighted and summed:
//!
//! ```text
//! score = clamp( (hr - 55)  / 40 * 100 * 0.4
//!              + (gsr - 7)  / 10 * 100 * 0.3
//!              + (cort - 7) / 16 * 100 * 0.3 , 0, 100 )
//! ```
//!
//! The score is a pure function of a single sample. It does not smooth or
//! average over the buffer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sample::{Metric, Sample};

/// Upper bound (exclusive) of the safe band
pub const SAFE_UPPER: f64 = 30.0;

/// Upper bound (exclusive) of the caution band
pub const CAUTION_UPPER: f64 = 70.0;

/// Linear rescaling of one reading onto the 0..100 scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricWeight {
    /// Reading that maps to 0
    pub floor: f64,
    /// Distance from `floor` that maps to 100
    pub span: f64,
    /// Contribution of this metric to the final score
    pub weight: f64,
}

impl MetricWeight {
    /// Create a weighting
    pub const fn new(floor: f64, span: f64, weight: f64) -> Self {
        Self {
            floor,
            span,
            weight,
        }
    }

    /// Weighted contribution of `value`, unclamped
    pub fn contribution(&self, value: f64) -> f64 {
        if self.span == 0.0 {
            return 0.0;
        }
        (value - self.floor) / self.span * 100.0 * self.weight
    }

    /// Safe range covered by this weighting as `(floor, floor + span)`
    pub fn range(&self) -> (f64, f64) {
        (self.floor, self.floor + self.span)
    }
}

/// Weights and safe ranges used to compute the score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringModel {
    /// Heart rate weighting (55..95 BPM, 40%)
    pub heart_rate: MetricWeight,
    /// GSR weighting (7..17 µS, 30%)
    pub gsr: MetricWeight,
    /// Cortisol weighting (7..23 μg/dL, 30%)
    pub cortisol: MetricWeight,
}

impl Default for ScoringModel {
    fn default() -> Self {
        Self {
            heart_rate: MetricWeight::new(55.0, 40.0, 0.4),
            gsr: MetricWeight::new(7.0, 10.0, 0.3),
            cortisol: MetricWeight::new(7.0, 16.0, 0.3),
        }
    }
}

impl ScoringModel {
    /// Weighting for one metric
    pub fn weight(&self, metric: Metric) -> &MetricWeight {
        match metric {
            Metric::HeartRate => &self.heart_rate,
            Metric::Gsr => &self.gsr,
            Metric::Cortisol => &self.cortisol,
        }
    }

    /// Score the given sample
    pub fn score(&self, sample: &Sample) -> StressScore {
        let raw: f64 = Metric::ALL
            .iter()
            .map(|&m| self.weight(m).contribution(sample.value(m)))
            .sum();
        StressScore::new(raw)
    }
}

/// Score a sample with the default model
pub fn stress_score(sample: &Sample) -> StressScore {
    ScoringModel::default().score(sample)
}

/// Stress score clamped to `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct StressScore(f64);

impl StressScore {
    /// Minimum score
    pub const MIN: f64 = 0.0;
    /// Maximum score
    pub const MAX: f64 = 100.0;

    /// Clamp a raw value into a score; NaN counts as zero
    pub fn new(raw: f64) -> Self {
        if raw.is_nan() {
            return Self(Self::MIN);
        }
        Self(raw.clamp(Self::MIN, Self::MAX))
    }

    /// Score value
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Classification band
    pub fn band(&self) -> Band {
        Band::from_score(self.0)
    }
}

impl fmt::Display for StressScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// Classification of a stress score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    /// Score below 30
    Safe,
    /// Score in `[30, 70)`
    Caution,
    /// Score of 70 or more
    Alert,
}

impl Band {
    /// Classify a score value
    pub fn from_score(score: f64) -> Self {
        if score < SAFE_UPPER {
            Band::Safe
        } else if score < CAUTION_UPPER {
            Band::Caution
        } else {
            Band::Alert
        }
    }

    /// Short lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            Band::Safe => "safe",
            Band::Caution => "caution",
            Band::Alert => "alert",
        }
    }

    /// Heading shown on the status panel
    pub fn title(&self) -> &'static str {
        match self {
            Band::Safe => "Safe Zone",
            Band::Caution => "Caution Zone",
            Band::Alert => "Alert Zone",
        }
    }

    /// Advisory text for the status panel
    pub fn advisory(&self) -> &'static str {
        match self {
            Band::Safe => "Safe Zone - Your body is maintaining healthy stress levels",
            Band::Caution => {
                "Caution Zone - Consider taking preventive measures to manage stress"
            }
            Band::Alert => {
                "Alert Zone - Immediate stress management recommended for your safety"
            }
        }
    }

    /// Recommendation bullets printed in the report
    pub fn recommendations(&self) -> [&'static str; 3] {
        match self {
            Band::Safe => [
                "Maintain current healthy lifestyle",
                "Continue regular monitoring",
                "Keep up regular relaxation breaks",
            ],
            Band::Caution => [
                "Consider stress management techniques",
                "Increase relaxation activities",
                "Monitor more frequently",
            ],
            Band::Alert => [
                "Immediate stress reduction recommended",
                "Consult healthcare provider",
                "Implement relaxation protocols",
            ],
        }
    }

    /// Indicator color as `#rrggbb`
    pub fn color_hex(&self) -> &'static str {
        match self {
            Band::Safe => "#008000",
            Band::Caution => "#ffff00",
            Band::Alert => "#ff0000",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn reading(hr: f64, gsr: f64, cortisol: f64) -> Sample {
        Sample::new(hr, gsr, cortisol, Utc::now())
    }

    #[test]
    fn test_baseline_reading_is_caution() {
        let score = stress_score(&reading(75.0, 12.0, 15.0));
        assert!((score.value() - 50.0).abs() < 1e-9);
        assert_eq!(score.band(), Band::Caution);
    }

    #[test]
    fn test_range_extremes() {
        let max = stress_score(&reading(95.0, 17.0, 23.0));
        assert!(max.value() > 70.0);
        assert_eq!(max.band(), Band::Alert);

        let min = stress_score(&reading(55.0, 7.0, 7.0));
        assert_eq!(min.value(), 0.0);
        assert_eq!(min.band(), Band::Safe);
    }

    #[test]
    fn test_clamps_pathological_input() {
        assert_eq!(stress_score(&reading(-1e9, -5.0, -3.0)).value(), 0.0);
        assert_eq!(stress_score(&reading(1e9, 1e9, 1e9)).value(), 100.0);
        assert_eq!(stress_score(&reading(f64::NAN, 12.0, 15.0)).value(), 0.0);
        assert_eq!(stress_score(&reading(f64::INFINITY, 12.0, 15.0)).value(), 100.0);
    }

    #[test]
    fn test_band_boundaries() {
        let cases = [
            (0.0, Band::Safe),
            (29.999, Band::Safe),
            (30.0, Band::Caution),
            (69.999, Band::Caution),
            (70.0, Band::Alert),
            (100.0, Band::Alert),
        ];
        for (score, band) in cases {
            assert_eq!(Band::from_score(score), band, "score {}", score);
        }
    }

    #[test]
    fn test_each_band_has_three_recommendations() {
        for band in [Band::Safe, Band::Caution, Band::Alert] {
            assert!(band.recommendations().iter().all(|r| !r.is_empty()));
        }
    }

    #[test]
    fn test_zero_span_contributes_nothing() {
        let weight = MetricWeight::new(10.0, 0.0, 1.0);
        assert_eq!(weight.contribution(50.0), 0.0);
    }
}
