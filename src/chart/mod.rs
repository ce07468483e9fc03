//! # Chart Module
//!
//! Time-series visualization of the rolling buffer: one chart per metric,
//! each driven by an explicit [`ChartConfig`] record.
//!
//! ```text
//! samples ──▶ ChartSeries ──▶ SeriesRenderer ──▶ Scene ──┬──▶ SVG (dashboard)
//!                                                        └──▶ PDF operators (report)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use mindsync::chart::{ChartConfig, ChartSurface, SeriesRenderer};
//! use mindsync::generator::SampleGenerator;
//! use mindsync::sample::Metric;
//!
//! let mut generator = SampleGenerator::new();
//! let samples: Vec<_> = (0..10).map(|_| generator.generate()).collect();
//!
//! let renderer = SeriesRenderer::default();
//! let mut surface = ChartSurface::new(ChartConfig::standard(Metric::HeartRate));
//! renderer.render(&samples, &mut surface)?;
//!
//! let svg = surface.to_svg()?;
//! assert!(svg.contains("<svg"));
//! # Ok::<(), mindsync::chart::ChartError>(())
//! ```

mod config;
mod curve;
mod render;
mod scale;
mod scene;
mod series;
mod svg;

pub use config::{ChartConfig, ChartLayout, Rgb};
pub use curve::monotone_x;
pub use render::{ChartSurface, SeriesRenderer, AXIS_COLOR, BACKGROUND};
pub use scale::{tick_step, LinearScale, TimeScale};
pub use scene::{fmt_num, Element, Paint, Path, PathCommand, Point, Rect, Scene, Stroke, TextAlign};
pub use series::{ChartSeries, SeriesPoint};
pub use svg::to_svg;

use crate::sample::Metric;

/// Errors that can occur while configuring or rendering charts
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// Color string is not `#rrggbb`
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Display range is empty, inverted or not finite
    #[error("Invalid display range for {metric}: [{min}, {max}]")]
    InvalidRange {
        /// Metric of the offending chart
        metric: Metric,
        /// Configured minimum
        min: f64,
        /// Configured maximum
        max: f64,
    },

    /// I/O error while serializing
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialized output was not valid UTF-8
    #[error("Encoding error: {0}")]
    Encoding(String),
}
