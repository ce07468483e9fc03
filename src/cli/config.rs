//! TOML configuration file support.
//!
//! Settings that would otherwise need many flags can live in a config file:
//!
//! ```toml
//! # mindsync.toml
//! [monitor]
//! tick_interval_ms = 500
//! capacity = 120
//! seed = 42
//!
//! [report]
//! user_name = "Jane Roe"
//! trailing_days = 7
//!
//! [charts.heart_rate]
//! display_min = 50
//! display_max = 110
//! color = "#e63946"
//! ```
//!
//! Values from the file override the built-in defaults; command-line flags
//! override the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use mindsync::chart::Rgb;
use mindsync::dashboard::MonitorConfig;
use mindsync::sample::Metric;

/// File picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "mindsync.toml";

/// Root configuration structure for mindsync.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Ticker and buffer settings.
    #[serde(default)]
    pub monitor: MonitorSection,

    /// Report settings.
    #[serde(default)]
    pub report: ReportSection,

    /// Per-metric chart overrides keyed by metric id.
    #[serde(default)]
    pub charts: BTreeMap<String, ChartSection>,
}

/// `[monitor]` table.
#[derive(Debug, Default, Deserialize)]
pub struct MonitorSection {
    /// Milliseconds between ticks.
    pub tick_interval_ms: Option<u64>,

    /// Rolling buffer capacity.
    pub capacity: Option<usize>,

    /// Seed for reproducible runs.
    pub seed: Option<u64>,
}

/// `[report]` table.
#[derive(Debug, Default, Deserialize)]
pub struct ReportSection {
    /// Patient name.
    pub user_name: Option<String>,

    /// Trailing cortisol window in days.
    pub trailing_days: Option<u32>,

    /// Compress PDF content streams.
    pub compress: Option<bool>,
}

/// `[charts.<metric>]` table.
#[derive(Debug, Default, Deserialize)]
pub struct ChartSection {
    /// Bottom of the y domain.
    pub display_min: Option<f64>,

    /// Top of the y domain.
    pub display_max: Option<f64>,

    /// Series color as `#rrggbb`.
    pub color: Option<String>,

    /// Chart heading.
    pub title: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load `explicit` if given, else `mindsync.toml` from the working
    /// directory if it exists, else defaults.
    pub fn discover(explicit: Option<&PathBuf>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let implicit = Path::new(DEFAULT_CONFIG_FILE);
                if implicit.is_file() {
                    log::info!("Using {}", implicit.display());
                    Self::from_file(implicit)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Layer this file's values over `base`.
    pub fn apply(&self, mut base: MonitorConfig) -> Result<MonitorConfig> {
        if let Some(ms) = self.monitor.tick_interval_ms {
            base.tick_interval_ms = ms;
        }
        if let Some(capacity) = self.monitor.capacity {
            base.capacity = capacity;
        }
        if self.monitor.seed.is_some() {
            base.seed = self.monitor.seed;
        }

        if let Some(name) = &self.report.user_name {
            base.report.user_name = name.clone();
        }
        if let Some(days) = self.report.trailing_days {
            base.report.trailing_days = days;
        }
        if let Some(compress) = self.report.compress {
            base.report.compress = compress;
        }

        for (key, section) in &self.charts {
            let metric = Metric::from_str(key).map_err(anyhow::Error::msg)?;
            let chart = base
                .charts
                .iter_mut()
                .find(|c| c.metric == metric)
                .with_context(|| format!("No chart configured for {}", metric))?;
            if let Some(min) = section.display_min {
                chart.display_min = min;
            }
            if let Some(max) = section.display_max {
                chart.display_max = max;
            }
            if let Some(color) = &section.color {
                chart.color = Rgb::from_hex(color)
                    .with_context(|| format!("Invalid color for charts.{}", key))?;
            }
            if let Some(title) = &section.title {
                chart.title = title.clone();
            }
        }

        Ok(base)
    }
}
