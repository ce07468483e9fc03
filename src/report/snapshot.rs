//! Chart capture for report composition.
//!
//! A report never reads a live surface while laying out pages. Every chart is
//! captured up front into an owned [`ChartSnapshot`]; if any capture fails the
//! whole report is abandoned.

use thiserror::Error;

use crate::chart::{ChartError, ChartSurface, Scene};
use crate::sample::Metric;

/// Errors raised while capturing a chart
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// No surface exists for the metric
    #[error("No chart surface for {0}")]
    MissingChart(Metric),

    /// Surface was drawn from a different number of samples than the buffer holds
    #[error("Chart for {metric} is stale: rendered {rendered} points, buffer holds {buffered}")]
    Stale {
        /// Metric of the stale chart
        metric: Metric,
        /// Points on the surface
        rendered: usize,
        /// Samples in the buffer snapshot
        buffered: usize,
    },

    /// Surface could not be serialized
    #[error("Failed to capture {metric} chart: {source}")]
    Render {
        /// Metric of the failing chart
        metric: Metric,
        /// Underlying error
        #[source]
        source: ChartError,
    },
}

/// Owned copy of one rendered chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSnapshot {
    /// Charted metric
    pub metric: Metric,
    /// Chart heading
    pub title: String,
    /// Vector drawing, replayed into the PDF
    pub scene: Scene,
    /// Standalone SVG document, stored in bundles
    pub svg: String,
    /// Fixed y domain of the chart
    pub display_range: (f64, f64),
    /// Points drawn
    pub point_count: usize,
}

impl ChartSnapshot {
    /// Capture `surface`
    pub fn capture(surface: &ChartSurface) -> Result<Self, SnapshotError> {
        let metric = surface.config().metric;
        let svg = surface
            .to_svg()
            .map_err(|source| SnapshotError::Render { metric, source })?;
        let config = surface.config();
        Ok(Self {
            metric,
            title: config.title.clone(),
            display_range: (config.display_min, config.display_max),
            scene: surface.scene().clone(),
            svg,
            point_count: surface.point_count(),
        })
    }

    /// True when the chart had no data
    pub fn is_blank(&self) -> bool {
        self.scene.is_blank()
    }
}

/// Anything that can hand out chart snapshots
pub trait SnapshotSource {
    /// Capture the chart for `metric`
    fn capture(&self, metric: Metric) -> Result<ChartSnapshot, SnapshotError>;

    /// Capture every metric in dashboard order, stopping at the first failure
    fn capture_all(&self) -> Result<Vec<ChartSnapshot>, SnapshotError> {
        Metric::ALL.iter().map(|&m| self.capture(m)).collect()
    }
}

impl SnapshotSource for [ChartSurface] {
    fn capture(&self, metric: Metric) -> Result<ChartSnapshot, SnapshotError> {
        let surface = self
            .iter()
            .find(|s| s.config().metric == metric)
            .ok_or(SnapshotError::MissingChart(metric))?;
        ChartSnapshot::capture(surface)
    }
}

impl SnapshotSource for Vec<ChartSurface> {
    fn capture(&self, metric: Metric) -> Result<ChartSnapshot, SnapshotError> {
        self.as_slice().capture(metric)
    }
}

impl SnapshotSource for [ChartSnapshot] {
    fn capture(&self, metric: Metric) -> Result<ChartSnapshot, SnapshotError> {
        self.iter()
            .find(|s| s.metric == metric)
            .cloned()
            .ok_or(SnapshotError::MissingChart(metric))
    }
}

/// Check that every snapshot was drawn from `buffered` samples
pub fn check_fresh(snapshots: &[ChartSnapshot], buffered: usize) -> Result<(), SnapshotError> {
    match snapshots.iter().find(|s| s.point_count != buffered) {
        Some(stale) => Err(SnapshotError::Stale {
            metric: stale.metric,
            rendered: stale.point_count,
            buffered,
        }),
        None => Ok(()),
    }
}
