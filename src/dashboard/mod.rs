//! # Dashboard Module
//!
//! Owns the live pipeline state and the ticker that advances it.
//!
//! Every tick runs the same sequence on the ticker thread:
//!
//! ```text
//! generate ──▶ buffer.append ──▶ score ──▶ render × 3
//! ```
//!
//! The [`Dashboard`] is the single writer of that state. Everything else
//! (status lines, report composition) reads through a [`DashboardSnapshot`],
//! an owned copy taken under the lock, so buffer and charts always agree.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mindsync::dashboard::{Monitor, MonitorConfig};
//!
//! let monitor = Monitor::start(MonitorConfig::default())?;
//! for event in monitor.events().iter().take(10) {
//!     println!("tick {}: score {} ({})", event.tick, event.score, event.score.band());
//! }
//! let report = monitor.compose_report()?;
//! report.save_to_dir(".")?;
//! monitor.stop()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod monitor;
mod state;

pub use config::{MonitorConfig, DEFAULT_TICK_INTERVAL_MS, MAX_TICK_INTERVAL_MS};
pub use monitor::Monitor;
pub use state::{Dashboard, DashboardSnapshot, MetricCard, TickEvent};

use crate::chart::ChartError;
use crate::report::ReportError;

/// Errors raised by the dashboard and its ticker
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// Configuration rejected before starting
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A chart could not be rendered
    #[error("Chart error: {0}")]
    ChartError(#[from] ChartError),

    /// Report composition failed
    #[error("Report error: {0}")]
    ReportError(#[from] ReportError),

    /// The ticker thread failed or could not be spawned
    #[error("Ticker thread error: {0}")]
    ThreadError(String),

    /// The ticker thread panicked
    #[error("Ticker thread panicked")]
    ThreadPanicked,

    /// The monitor was already stopped
    #[error("Monitor already stopped")]
    Stopped,
}
