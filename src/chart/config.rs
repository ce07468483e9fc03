//! Per-metric chart configuration and surface layout.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ChartError;
use crate::sample::Metric;

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Black
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    /// White
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    /// Mid gray used for secondary text
    pub const GRAY: Rgb = Rgb::new(128, 128, 128);
    /// Light gray used for rules
    pub const LIGHT_GRAY: Rgb = Rgb::new(200, 200, 200);

    /// Create a color from its channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`
    pub fn from_hex(hex: &str) -> Result<Self, ChartError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ChartError::InvalidColor(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ChartError::InvalidColor(hex.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Format as `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels scaled to `0.0..=1.0`
    pub fn unit_channels(&self) -> (f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        )
    }

    /// Blend toward `background` by `1 - opacity`
    pub fn over(&self, background: Rgb, opacity: f64) -> Rgb {
        let a = opacity.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (fg as f64 * a + bg as f64 * (1.0 - a)).round() as u8;
        Rgb::new(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Rgb {
    type Error = ChartError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

/// Display settings for one metric's chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Metric plotted by this chart
    pub metric: Metric,

    /// Bottom of the fixed y domain
    pub display_min: f64,

    /// Top of the fixed y domain
    pub display_max: f64,

    /// Line, area and marker color
    pub color: Rgb,

    /// Chart heading
    pub title: String,
}

impl ChartConfig {
    /// Dashboard defaults for `metric`
    pub fn standard(metric: Metric) -> Self {
        let (display_min, display_max, color) = match metric {
            Metric::HeartRate => (55.0, 95.0, Rgb::new(0xff, 0x6b, 0x6b)),
            Metric::Gsr => (7.0, 17.0, Rgb::new(0x4e, 0xcd, 0xc4)),
            Metric::Cortisol => (7.0, 23.0, Rgb::new(0x45, 0xb7, 0xd1)),
        };
        Self {
            metric,
            display_min,
            display_max,
            color,
            title: metric.chart_title().to_string(),
        }
    }

    /// Default configuration for all three charts in dashboard order
    pub fn standard_set() -> Vec<ChartConfig> {
        Metric::ALL.iter().map(|&m| Self::standard(m)).collect()
    }

    /// Check that the display range is finite and non-empty
    pub fn validate(&self) -> Result<(), ChartError> {
        if !self.display_min.is_finite()
            || !self.display_max.is_finite()
            || self.display_min >= self.display_max
        {
            return Err(ChartError::InvalidRange {
                metric: self.metric,
                min: self.display_min,
                max: self.display_max,
            });
        }
        Ok(())
    }
}

/// Pixel geometry of a chart surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    /// Total surface width
    pub width: f64,
    /// Total surface height
    pub height: f64,
    /// Space above the plot area
    pub margin_top: f64,
    /// Space right of the plot area
    pub margin_right: f64,
    /// Space below the plot area (x axis)
    pub margin_bottom: f64,
    /// Space left of the plot area (y axis)
    pub margin_left: f64,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 300.0,
            margin_top: 20.0,
            margin_right: 30.0,
            margin_bottom: 30.0,
            margin_left: 40.0,
        }
    }
}

impl ChartLayout {
    /// Width of the plot area
    pub fn inner_width(&self) -> f64 {
        (self.width - self.margin_left - self.margin_right).max(0.0)
    }

    /// Height of the plot area
    pub fn inner_height(&self) -> f64 {
        (self.height - self.margin_top - self.margin_bottom).max(0.0)
    }
}
