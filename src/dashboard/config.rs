use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::MonitorError;
use crate::buffer::DEFAULT_CAPACITY;
use crate::chart::{ChartConfig, ChartLayout};
use crate::generator::GeneratorConfig;
use crate::report::ReportOptions;
use crate::sample::Metric;
use crate::score::ScoringModel;

/// Default time between ticks
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;

/// Longest accepted tick interval (one day)
pub const MAX_TICK_INTERVAL_MS: u64 = 86_400_000;

/// Configuration for a [`Dashboard`](super::Dashboard) and its ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Milliseconds between generated samples
    pub tick_interval_ms: u64,

    /// Samples retained by the rolling buffer
    pub capacity: usize,

    /// Seed for reproducible runs; entropy-seeded when `None`
    pub seed: Option<u64>,

    /// Noise around each metric's base value
    pub generator: GeneratorConfig,

    /// Weights and ranges used for the stress score
    pub scoring: ScoringModel,

    /// One chart per metric, in dashboard order
    pub charts: Vec<ChartConfig>,

    /// Chart surface geometry
    pub layout: ChartLayout,

    /// Report settings
    pub report: ReportOptions,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            capacity: DEFAULT_CAPACITY,
            seed: None,
            generator: GeneratorConfig::default(),
            scoring: ScoringModel::default(),
            charts: ChartConfig::standard_set(),
            layout: ChartLayout::default(),
            report: ReportOptions::default(),
        }
    }
}

impl MonitorConfig {
    /// Ten ticks per second, for demos and tests
    pub fn fast() -> Self {
        Self {
            tick_interval_ms: 100,
            ..Self::default()
        }
    }

    /// Reproducible configuration
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Tick interval as a [`Duration`]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Chart configuration for `metric`
    pub fn chart(&self, metric: Metric) -> Option<&ChartConfig> {
        self.charts.iter().find(|c| c.metric == metric)
    }

    /// Check the configuration before starting a dashboard
    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.tick_interval_ms == 0 {
            return Err(MonitorError::InvalidConfig(
                "tick interval must be positive".to_string(),
            ));
        }
        if self.tick_interval_ms > MAX_TICK_INTERVAL_MS {
            return Err(MonitorError::InvalidConfig(format!(
                "tick interval of {} ms exceeds the {} ms limit",
                self.tick_interval_ms, MAX_TICK_INTERVAL_MS
            )));
        }
        for metric in Metric::ALL {
            let matching = self.charts.iter().filter(|c| c.metric == metric).count();
            if matching != 1 {
                return Err(MonitorError::InvalidConfig(format!(
                    "expected exactly one chart for {}, found {}",
                    metric, matching
                )));
            }
        }
        for chart in &self.charts {
            chart.validate()?;
        }
        self.report.validate()?;
        Ok(())
    }
}
