//! Per-metric projection of the buffer.

use chrono::{DateTime, Utc};

use super::config::ChartConfig;
use crate::sample::{Metric, Sample};

/// One plotted observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    /// Capture time
    pub timestamp: DateTime<Utc>,
    /// Metric reading
    pub value: f64,
}

/// `(time, value)` pairs for one metric plus its fixed display domain.
///
/// A series is rebuilt from scratch for every render and always has exactly
/// one point per buffered sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    /// Plotted metric
    pub metric: Metric,
    /// Points in chronological order
    pub points: Vec<SeriesPoint>,
    /// Bottom of the y domain
    pub display_min: f64,
    /// Top of the y domain
    pub display_max: f64,
}

impl ChartSeries {
    /// Project `samples` onto the metric named by `config`
    pub fn from_samples(samples: &[Sample], config: &ChartConfig) -> Self {
        let points = samples
            .iter()
            .map(|s| SeriesPoint {
                timestamp: s.timestamp,
                value: s.value(config.metric),
            })
            .collect();
        Self {
            metric: config.metric,
            points,
            display_min: config.display_min,
            display_max: config.display_max,
        }
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when there is nothing to plot
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Earliest and latest timestamps
    pub fn time_extent(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = self.points.iter().map(|p| p.timestamp).min()?;
        let last = self.points.iter().map(|p| p.timestamp).max()?;
        Some((first, last))
    }

    /// Most recent point
    pub fn latest(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    /// Number of points outside the display domain
    pub fn out_of_range(&self) -> usize {
        self.points
            .iter()
            .filter(|p| p.value < self.display_min || p.value > self.display_max)
            .count()
    }
}
