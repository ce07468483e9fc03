//! Report bundles.
//!
//! A `.mindsync` bundle is a ZIP archive holding the PDF together with the
//! sources it was built from:
//!
//! ```text
//! report.mindsync
//! ├── mimetype              # "application/vnd.mindsync.report", stored, first
//! ├── report.pdf            # the composed report, stored
//! ├── summary.json          # ReportSummary plus report id
//! └── charts/
//!     ├── heart_rate.svg
//!     ├── gsr.svg
//!     └── cortisol.svg
//! ```

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;
use uuid::Uuid;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::composer::{write_atomic, HealthReport};
use super::summary::ReportSummary;
use super::ReportError;

/// MIME type stored in the first bundle entry
pub const BUNDLE_MIMETYPE: &str = "application/vnd.mindsync.report";

/// File extension for bundles
pub const BUNDLE_EXTENSION: &str = "mindsync";

#[derive(Serialize)]
struct BundleManifest<'a> {
    id: Uuid,
    format_version: &'static str,
    page_count: usize,
    #[serde(flatten)]
    summary: &'a ReportSummary,
}

impl HealthReport {
    /// Serialize the report and its sources as a ZIP bundle
    pub fn to_bundle(&self) -> Result<Vec<u8>, ReportError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        let stored = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .unix_permissions(0o644);
        let deflated = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        zip.start_file("mimetype", stored)?;
        zip.write_all(BUNDLE_MIMETYPE.as_bytes())?;

        // content streams are already compressed
        zip.start_file("report.pdf", stored)?;
        zip.write_all(self.pdf_bytes())?;

        let manifest = BundleManifest {
            id: self.id,
            format_version: env!("CARGO_PKG_VERSION"),
            page_count: self.page_count,
            summary: &self.summary,
        };
        zip.start_file("summary.json", deflated)?;
        zip.write_all(&serde_json::to_vec_pretty(&manifest)?)?;

        for chart in &self.charts {
            zip.start_file(format!("charts/{}.svg", chart.metric.id()), deflated)?;
            zip.write_all(chart.svg.as_bytes())?;
        }

        Ok(zip.finish()?.into_inner())
    }

    /// Write the bundle to `path`, replacing any existing file atomically
    pub fn save_bundle<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf, ReportError> {
        let path = write_atomic(path.as_ref(), &self.to_bundle()?)?;
        info!("Saved report bundle {} to {}", self.id, path.display());
        Ok(path)
    }
}
