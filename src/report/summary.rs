//! Numeric summary of a buffer snapshot.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::sample::{Metric, Sample};
use crate::score::{Band, StressScore};

/// Cortisol range printed as the reference band on the summary page
pub const CORTISOL_SAFE_RANGE: (f64, f64) = (9.0, 21.0);

/// Trailing window used when none is configured
pub const DEFAULT_TRAILING_DAYS: u32 = 5;

/// Longest trailing window accepted by [`ReportOptions`](super::ReportOptions)
pub const MAX_TRAILING_DAYS: u32 = 36_500;

/// Mean, minimum and maximum of one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricStats {
    /// Metric summarized
    pub metric: Metric,
    /// Arithmetic mean
    pub mean: f64,
    /// Smallest reading
    pub min: f64,
    /// Largest reading
    pub max: f64,
    /// Most recent reading
    pub latest: f64,
}

impl MetricStats {
    /// Statistics over the finite readings of `metric`, `None` when there are none
    pub fn compute(samples: &[Sample], metric: Metric) -> Option<Self> {
        let mut values = samples.iter().map(|s| s.value(metric)).filter(|v| v.is_finite());
        let first = values.next()?;
        let (mut sum, mut count, mut min, mut max, mut latest) = (first, 1usize, first, first, first);
        for v in values {
            sum += v;
            count += 1;
            min = min.min(v);
            max = max.max(v);
            latest = v;
        }
        Some(Self {
            metric,
            mean: sum / count as f64,
            min,
            max,
            latest,
        })
    }
}

/// Average of one metric over a trailing time window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrailingAverage {
    /// Window length in days
    pub window_days: u32,
    /// Samples that fell inside the window
    pub sample_count: usize,
    /// Mean of those samples, `None` when the window is empty
    pub average: Option<f64>,
    /// Time between the oldest and newest sample in the window, in seconds
    pub covered_seconds: i64,
}

impl TrailingAverage {
    /// Average `metric` over samples stamped within `window_days` of `now`
    pub fn compute(samples: &[Sample], metric: Metric, window_days: u32, now: DateTime<Utc>) -> Self {
        // a window reaching past the representable range has no lower bound
        let cutoff = Duration::try_days(i64::from(window_days))
            .and_then(|window| now.checked_sub_signed(window));
        let in_window: Vec<&Sample> = samples
            .iter()
            .filter(|s| cutoff.map_or(true, |c| s.timestamp >= c) && s.timestamp <= now)
            .filter(|s| s.value(metric).is_finite())
            .collect();

        let average = if in_window.is_empty() {
            None
        } else {
            Some(in_window.iter().map(|s| s.value(metric)).sum::<f64>() / in_window.len() as f64)
        };
        let covered_seconds = match (in_window.first(), in_window.last()) {
            (Some(first), Some(last)) => (last.timestamp - first.timestamp).num_seconds(),
            _ => 0,
        };

        Self {
            window_days,
            sample_count: in_window.len(),
            average,
            covered_seconds,
        }
    }

    /// Human-readable description of how much data backs the average
    pub fn coverage_label(&self) -> String {
        if self.sample_count == 0 {
            return "No data recorded".to_string();
        }
        format!(
            "{} samples over {} (window: {} days)",
            self.sample_count,
            format_span(self.covered_seconds),
            self.window_days
        )
    }
}

/// Everything the report prints as numbers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    /// Report timestamp the window is measured from
    pub generated_at: DateTime<Utc>,
    /// Samples in the snapshot
    pub sample_count: usize,
    /// Stress score at report time
    pub score: StressScore,
    /// Band of `score`
    pub band: Band,
    /// Trailing cortisol average
    pub cortisol: TrailingAverage,
    /// Per-metric statistics over the whole snapshot
    pub metrics: Vec<MetricStats>,
}

impl ReportSummary {
    /// Summarize a snapshot
    pub fn compute(
        samples: &[Sample],
        score: StressScore,
        window_days: u32,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            generated_at,
            sample_count: samples.len(),
            score,
            band: score.band(),
            cortisol: TrailingAverage::compute(samples, Metric::Cortisol, window_days, generated_at),
            metrics: Metric::ALL
                .iter()
                .filter_map(|&m| MetricStats::compute(samples, m))
                .collect(),
        }
    }

    /// Statistics for one metric
    pub fn stats(&self, metric: Metric) -> Option<&MetricStats> {
        self.metrics.iter().find(|s| s.metric == metric)
    }

    /// True when the snapshot was empty
    pub fn is_empty(&self) -> bool {
        self.sample_count == 0
    }
}

fn format_span(seconds: i64) -> String {
    match seconds {
        s if s < 60 => format!("{}s", s),
        s if s < 3_600 => format!("{}m {}s", s / 60, s % 60),
        s if s < 86_400 => format!("{}h {}m", s / 3_600, (s % 3_600) / 60),
        s => format!("{}d {}h", s / 86_400, (s % 86_400) / 3_600),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 6, 12, 0, 0).unwrap()
    }

    fn cortisol_at(value: f64, ago: Duration) -> Sample {
        Sample::new(75.0, 12.0, value, now() - ago)
    }

    #[test]
    fn test_average_is_a_true_mean() {
        let samples: Vec<Sample> = [14.0, 15.0, 16.0]
            .iter()
            .enumerate()
            .map(|(i, &v)| cortisol_at(v, Duration::seconds(3 - i as i64)))
            .collect();

        let avg = TrailingAverage::compute(&samples, Metric::Cortisol, 5, now());
        assert_eq!(avg.sample_count, 3);
        assert!((avg.average.unwrap() - 15.0).abs() < 1e-12);
        assert_eq!(avg.covered_seconds, 2);
    }

    #[test]
    fn test_window_excludes_old_samples() {
        let samples = vec![
            cortisol_at(100.0, Duration::days(6)),
            cortisol_at(12.0, Duration::days(2)),
            cortisol_at(14.0, Duration::hours(1)),
        ];
        let avg = TrailingAverage::compute(&samples, Metric::Cortisol, 5, now());
        assert_eq!(avg.sample_count, 2);
        assert_eq!(avg.average, Some(13.0));
    }

    #[test]
    fn test_empty_window_reports_no_data() {
        let avg = TrailingAverage::compute(&[], Metric::Cortisol, 5, now());
        assert_eq!(avg.average, None);
        assert_eq!(avg.coverage_label(), "No data recorded");
    }

    #[test]
    fn test_window_beyond_calendar_has_no_cutoff() {
        let samples = vec![
            cortisol_at(10.0, Duration::days(100)),
            cortisol_at(20.0, Duration::seconds(1)),
        ];
        let avg = TrailingAverage::compute(&samples, Metric::Cortisol, u32::MAX, now());
        assert_eq!(avg.sample_count, 2);
        assert_eq!(avg.average, Some(15.0));
    }

    #[test]
    fn test_metric_stats() {
        let samples = vec![
            Sample::new(60.0, 10.0, 12.0, now()),
            Sample::new(80.0, f64::NAN, 18.0, now()),
        ];
        let hr = MetricStats::compute(&samples, Metric::HeartRate).unwrap();
        assert_eq!((hr.mean, hr.min, hr.max, hr.latest), (70.0, 60.0, 80.0, 80.0));

        let gsr = MetricStats::compute(&samples, Metric::Gsr).unwrap();
        assert_eq!(gsr.mean, 10.0);

        assert!(MetricStats::compute(&[], Metric::Cortisol).is_none());
    }

    #[test]
    fn test_summary_serializes() {
        let samples = vec![Sample::new(75.0, 12.0, 15.0, now())];
        let summary = ReportSummary::compute(&samples, StressScore::new(50.0), 5, now());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["band"], "caution");
        assert_eq!(json["cortisol"]["sample_count"], 1);
        assert_eq!(json["metrics"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_span_formatting() {
        assert_eq!(format_span(42), "42s");
        assert_eq!(format_span(99), "1m 39s");
        assert_eq!(format_span(7_260), "2h 1m");
        assert_eq!(format_span(90_000), "1d 1h");
    }
}
