//! # MindSync - Synthetic Physiological Monitoring
//!
//! `mindsync` simulates a wellness monitor: it produces one synthetic reading
//! per second (heart rate, galvanic skin response, cortisol), keeps the most
//! recent hundred, derives a stress score from the latest reading, draws a
//! live chart per metric and composes a paginated PDF health report on demand.
//!
//! ## Pipeline
//!
//! ```text
//! SampleGenerator ──▶ RollingBuffer (100) ──▶ ScoringModel ──▶ StressScore / Band
//!                            │
//!                            ├──▶ SeriesRenderer ×3 ──▶ ChartSurface (Scene / SVG)
//!                            │                               │
//!                            └────────────▶ ReportComposer ◀─┘ ──▶ mindsync-health-report.pdf
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mindsync::prelude::*;
//!
//! let mut dashboard = Dashboard::new(&MonitorConfig::default())?;
//! let mut generator = SampleGenerator::new();
//!
//! for _ in 0..30 {
//!     let event = dashboard.tick(generator.generate())?;
//!     println!("score {} ({})", event.score, event.score.band());
//! }
//!
//! let report = dashboard.compose_report(&ReportComposer::default())?;
//! report.save_to_dir(".")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! For a live, wall-clock driven dashboard use [`dashboard::Monitor`], which
//! runs the same tick on a background thread.
//!
//! ## Scoring
//!
//! | Metric | Safe range | Weight |
//! |--------|------------|--------|
//! | Heart rate | 55 - 95 BPM | 0.4 |
//! | GSR | 7 - 17 µS | 0.3 |
//! | Cortisol | 7 - 23 μg/dL | 0.3 |
//!
//! Each reading is rescaled onto 0..100 against its safe range, weighted,
//! summed and clamped. Scores below 30 are *safe*, below 70 *caution*,
//! anything else *alert*.
//!
//! ## Architecture
//!
//! - [`sample`]: the reading type and metric metadata
//! - [`generator`]: synthetic sample source
//! - [`buffer`]: capacity-bounded FIFO window
//! - [`score`]: stress score and bands
//! - [`chart`]: series rendering to backend-neutral scenes and SVG
//! - [`report`]: PDF composition, summaries and `.mindsync` bundles
//! - [`dashboard`]: state container and background ticker
//!
//! All readings are synthetic. Nothing here is medical advice.

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod chart;
pub mod dashboard;
pub mod generator;
pub mod report;
pub mod sample;
pub mod score;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::buffer::{RollingBuffer, DEFAULT_CAPACITY};
    pub use crate::chart::{ChartConfig, ChartError, ChartLayout, ChartSurface, Rgb, SeriesRenderer};
    pub use crate::dashboard::{
        Dashboard, DashboardSnapshot, MetricCard, Monitor, MonitorConfig, MonitorError, TickEvent,
    };
    pub use crate::generator::{GeneratorConfig, NoiseSpec, SampleGenerator};
    pub use crate::report::{
        ChartSnapshot, HealthReport, ReportComposer, ReportError, ReportOptions, ReportSummary,
        SnapshotSource, REPORT_FILE_NAME,
    };
    pub use crate::sample::{Metric, Sample};
    pub use crate::score::{stress_score, Band, ScoringModel, StressScore};
}
