//! # Report Module
//!
//! Turns a moment of the dashboard into a downloadable document.
//!
//! ## Components
//!
//! - [`ReportComposer`]: lays out the paginated PDF
//! - [`SnapshotSource`]: captures chart surfaces into owned [`ChartSnapshot`]s
//! - [`ReportSummary`]: trailing cortisol average and per-metric statistics
//! - [`pdf`]: the small PDF 1.4 writer the composer draws with
//!
//! A [`HealthReport`] can be saved as a bare PDF ([`REPORT_FILE_NAME`]) or as
//! a `.mindsync` bundle that also carries the chart SVGs and a JSON summary.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mindsync::chart::{ChartConfig, ChartSurface, SeriesRenderer};
//! use mindsync::generator::SampleGenerator;
//! use mindsync::report::ReportComposer;
//! use mindsync::score::stress_score;
//!
//! let mut generator = SampleGenerator::new();
//! let samples: Vec<_> = (0..30).map(|_| generator.generate()).collect();
//!
//! let renderer = SeriesRenderer::default();
//! let mut surfaces = Vec::new();
//! for config in ChartConfig::standard_set() {
//!     let mut surface = ChartSurface::new(config);
//!     renderer.render(&samples, &mut surface)?;
//!     surfaces.push(surface);
//! }
//!
//! let score = stress_score(samples.last().unwrap());
//! let report = ReportComposer::default().compose(&samples, score, &surfaces)?;
//! report.save_to_dir(".")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod bundle;
mod composer;
mod error;
pub mod pdf;
mod snapshot;
mod summary;

pub use bundle::{BUNDLE_EXTENSION, BUNDLE_MIMETYPE};
pub use composer::{HealthReport, ReportComposer, ReportOptions, DEFAULT_USER_NAME, REPORT_FILE_NAME};
pub use error::ReportError;
pub use snapshot::{check_fresh, ChartSnapshot, SnapshotError, SnapshotSource};
pub use summary::{
    MetricStats, ReportSummary, TrailingAverage, CORTISOL_SAFE_RANGE, DEFAULT_TRAILING_DAYS,
    MAX_TRAILING_DAYS,
};
