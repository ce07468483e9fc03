//! # Report Composer
//!
//! Lays out a paginated A4 health report from a buffer snapshot, the current
//! stress score and the three chart snapshots:
//!
//! 1. cover page with the header band, patient block and health summary
//! 2. one page per chart
//! 3. recommendations for the current band
//!
//! Every page carries a `Page i of N` footer. Charts are captured before any
//! page is laid out, so a failed capture leaves no partial document behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use uuid::Uuid;

use super::pdf::{Font, PdfDocument, PdfInfo, PdfPage, A4_WIDTH_MM};
use super::snapshot::{check_fresh, ChartSnapshot, SnapshotSource};
use super::summary::{
    ReportSummary, CORTISOL_SAFE_RANGE, DEFAULT_TRAILING_DAYS, MAX_TRAILING_DAYS,
};
use super::ReportError;
use crate::chart::{Rgb, TextAlign};
use crate::sample::{Metric, Sample};
use crate::score::{Band, StressScore};

/// File name the report is saved under
pub const REPORT_FILE_NAME: &str = "mindsync-health-report.pdf";

/// Patient name printed when none is configured
pub const DEFAULT_USER_NAME: &str = "John Doe";

const MARGIN: f64 = 20.0;
const CONTENT_RIGHT: f64 = A4_WIDTH_MM - MARGIN;
const FOOTER_Y: f64 = 287.0;
const CHART_WIDTH: f64 = CONTENT_RIGHT - MARGIN;
const CHART_HEIGHT: f64 = CHART_WIDTH * 0.6;
const TEXT: Rgb = Rgb::BLACK;
const NO_DATA: &str = "No data recorded";

/// Report settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// Patient name shown in the patient block
    pub user_name: String,

    /// Length of the trailing cortisol window in days
    pub trailing_days: u32,

    /// Compress PDF content streams
    pub compress: bool,

    /// File name used by [`HealthReport::save_to_dir`]
    pub file_name: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            user_name: DEFAULT_USER_NAME.to_string(),
            trailing_days: DEFAULT_TRAILING_DAYS,
            compress: true,
            file_name: REPORT_FILE_NAME.to_string(),
        }
    }
}

impl ReportOptions {
    /// Reject options that cannot produce a report
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.trailing_days == 0 {
            return Err(ReportError::InvalidOptions(
                "trailing window must be at least one day".to_string(),
            ));
        }
        if self.trailing_days > MAX_TRAILING_DAYS {
            return Err(ReportError::InvalidOptions(format!(
                "trailing window of {} days exceeds the {} day limit",
                self.trailing_days, MAX_TRAILING_DAYS
            )));
        }
        if self.file_name.is_empty() || self.file_name.contains(|c: char| c == '/' || c == '\\') {
            return Err(ReportError::InvalidOptions(format!(
                "file name '{}' must be a bare file name",
                self.file_name
            )));
        }
        Ok(())
    }
}

/// A composed report held in memory
#[derive(Debug, Clone)]
pub struct HealthReport {
    /// Unique report identifier
    pub id: Uuid,
    /// Composition time
    pub generated_at: DateTime<Utc>,
    /// File name for saving
    pub file_name: String,
    /// Numbers printed in the report
    pub summary: ReportSummary,
    /// Charts as captured for this report
    pub charts: Vec<ChartSnapshot>,
    /// Number of pages in the document
    pub page_count: usize,
    pdf: Vec<u8>,
}

impl HealthReport {
    /// Serialized PDF
    pub fn pdf_bytes(&self) -> &[u8] {
        &self.pdf
    }

    /// Save the PDF under [`HealthReport::file_name`] inside `dir`
    pub fn save_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf, ReportError> {
        self.save_as(dir.as_ref().join(&self.file_name))
    }

    /// Save the PDF at `path`, replacing any existing file atomically
    pub fn save_as<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf, ReportError> {
        let path = write_atomic(path.as_ref(), &self.pdf)?;
        info!("Saved report {} to {}", self.id, path.display());
        Ok(path)
    }
}

/// Write `bytes` to a temporary file next to `path`, then rename it into place
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<PathBuf, ReportError> {
    if path.file_name().is_none() {
        return Err(ReportError::InvalidPath(path.display().to_string()));
    }
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| ReportError::Persist {
        path: path.display().to_string(),
        source: e.error,
    })?;
    Ok(path.to_path_buf())
}

/// Builds [`HealthReport`]s
#[derive(Debug, Clone, Default)]
pub struct ReportComposer {
    options: ReportOptions,
}

impl ReportComposer {
    /// Composer with the given options
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Options in use
    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Compose a report stamped with the current time
    pub fn compose<S>(
        &self,
        samples: &[Sample],
        score: StressScore,
        charts: &S,
    ) -> Result<HealthReport, ReportError>
    where
        S: SnapshotSource + ?Sized,
    {
        self.compose_at(samples, score, charts, Utc::now())
    }

    /// Compose a report stamped with `generated_at`
    pub fn compose_at<S>(
        &self,
        samples: &[Sample],
        score: StressScore,
        charts: &S,
        generated_at: DateTime<Utc>,
    ) -> Result<HealthReport, ReportError>
    where
        S: SnapshotSource + ?Sized,
    {
        self.options.validate()?;

        let samples = samples.to_vec();
        let charts = charts.capture_all()?;
        check_fresh(&charts, samples.len())?;

        let summary =
            ReportSummary::compute(&samples, score, self.options.trailing_days, generated_at);
        let id = Uuid::new_v4();
        debug!("Composing report {} from {} samples", id, samples.len());

        let mut doc = PdfDocument::new(PdfInfo {
            title: "MindSync Health Safety Report".to_string(),
            author: self.options.user_name.clone(),
            subject: format!("Report {}", id),
            created: generated_at,
        })
        .with_compression(self.options.compress);

        doc.add_page(self.cover_page(&summary, id));
        for chart in &charts {
            doc.add_page(chart_page(chart, &summary));
        }
        doc.add_page(recommendations_page(summary.band, summary.is_empty()));

        let total = doc.page_count();
        for (i, page) in doc.pages_mut().iter_mut().enumerate() {
            page.set_fill_color(Rgb::GRAY);
            page.text(
                A4_WIDTH_MM / 2.0,
                FOOTER_Y,
                10.0,
                Font::Regular,
                TextAlign::Middle,
                &format!("Page {} of {}", i + 1, total),
            );
        }

        let pdf = doc.to_bytes()?;
        info!(
            "Composed report {}: {} pages, {} bytes, band {}",
            id,
            total,
            pdf.len(),
            summary.band
        );

        Ok(HealthReport {
            id,
            generated_at,
            file_name: self.options.file_name.clone(),
            summary,
            charts,
            page_count: total,
            pdf,
        })
    }

    fn cover_page(&self, summary: &ReportSummary, id: Uuid) -> PdfPage {
        let mut page = PdfPage::a4();

        page.set_fill_color(Rgb::BLACK);
        page.fill_rect(0.0, 0.0, A4_WIDTH_MM, 40.0);
        page.set_fill_color(Rgb::WHITE);
        page.text(MARGIN, 25.0, 24.0, Font::Bold, TextAlign::Start, "MindSync");
        page.set_fill_color(Rgb::GRAY);
        page.text(MARGIN, 35.0, 10.0, Font::Regular, TextAlign::Start, "Health Safety Report");

        heading(&mut page, 60.0, 14.0, "Patient Information");
        page.set_fill_color(TEXT);
        let name = format!("Name: {}", self.options.user_name);
        page.text(MARGIN, 75.0, 12.0, Font::Regular, TextAlign::Start, &name);
        let generated = format!(
            "Report Generated: {}",
            summary.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        page.text(MARGIN, 85.0, 12.0, Font::Regular, TextAlign::Start, &generated);
        page.set_fill_color(Rgb::GRAY);
        page.text(MARGIN, 93.0, 9.0, Font::Regular, TextAlign::Start, &format!("Report ID: {}", id));

        heading(&mut page, 112.0, 16.0, "Health Analysis Summary");
        page.set_fill_color(TEXT);
        let window = format!("{}-Day Hormonal Safety Analysis:", summary.cortisol.window_days);
        page.text(MARGIN, 130.0, 12.0, Font::Bold, TextAlign::Start, &window);
        let average = match summary.cortisol.average {
            Some(avg) => format!("Average Cortisol Level: {:.1} {}", avg, Metric::Cortisol.unit()),
            None => format!("Average Cortisol Level: {}", NO_DATA),
        };
        page.text(MARGIN, 140.0, 12.0, Font::Regular, TextAlign::Start, &average);
        let (lo, hi) = CORTISOL_SAFE_RANGE;
        let safe = format!("Safe Range: {}-{} {}", lo, hi, Metric::Cortisol.unit());
        page.text(MARGIN, 148.0, 12.0, Font::Regular, TextAlign::Start, &safe);
        page.set_fill_color(Rgb::GRAY);
        let coverage = format!("Based on {}", summary.cortisol.coverage_label());
        page.text(MARGIN, 156.0, 10.0, Font::Regular, TextAlign::Start, &coverage);

        page.set_fill_color(TEXT);
        page.text(MARGIN, 172.0, 12.0, Font::Bold, TextAlign::Start, "Current Stress Score:");
        if summary.is_empty() {
            page.text(68.0, 172.0, 12.0, Font::Regular, TextAlign::Start, NO_DATA);
        } else {
            page.set_fill_color(band_color(summary.band));
            page.fill_rect(68.0, 168.0, 4.0, 4.0);
            page.set_fill_color(TEXT);
            let score = format!("{} / 100 ({})", summary.score, summary.band.title());
            page.text(75.0, 172.0, 12.0, Font::Regular, TextAlign::Start, &score);
            page.set_fill_color(Rgb::GRAY);
            page.text(MARGIN, 180.0, 10.0, Font::Regular, TextAlign::Start, summary.band.advisory());
        }

        page.set_fill_color(TEXT);
        page.text(MARGIN, 198.0, 12.0, Font::Bold, TextAlign::Start, "Readings");
        if summary.metrics.is_empty() {
            page.text(MARGIN, 208.0, 11.0, Font::Regular, TextAlign::Start, NO_DATA);
            return page;
        }

        let columns = [MARGIN, 85.0, 115.0, 145.0, CONTENT_RIGHT];
        let header = ["Metric", "Mean", "Min", "Max", "Latest"];
        for (i, (x, label)) in columns.iter().zip(header).enumerate() {
            let align = if i == 0 { TextAlign::Start } else { TextAlign::End };
            page.text(*x, 208.0, 10.0, Font::Bold, align, label);
        }
        page.set_stroke_color(Rgb::LIGHT_GRAY);
        page.set_line_width(0.2);
        page.line(MARGIN, 211.0, CONTENT_RIGHT, 211.0);

        for (row, stats) in summary.metrics.iter().enumerate() {
            let y = 219.0 + row as f64 * 8.0;
            let cells = [
                format!("{} ({})", stats.metric.label(), stats.metric.unit()),
                format!("{:.1}", stats.mean),
                format!("{:.1}", stats.min),
                format!("{:.1}", stats.max),
                format!("{:.1}", stats.latest),
            ];
            for (i, (x, cell)) in columns.iter().zip(cells.iter()).enumerate() {
                let align = if i == 0 { TextAlign::Start } else { TextAlign::End };
                page.text(*x, y, 10.0, Font::Regular, align, cell);
            }
        }
        page
    }
}

fn heading(page: &mut PdfPage, y: f64, size: f64, text: &str) {
    page.set_fill_color(TEXT);
    page.text(MARGIN, y, size, Font::Bold, TextAlign::Start, text);
    page.set_stroke_color(Rgb::LIGHT_GRAY);
    page.set_line_width(0.3);
    page.line(MARGIN, y + 5.0, CONTENT_RIGHT, y + 5.0);
}

fn band_color(band: Band) -> Rgb {
    Rgb::from_hex(band.color_hex()).unwrap_or(Rgb::GRAY)
}

fn chart_page(chart: &ChartSnapshot, summary: &ReportSummary) -> PdfPage {
    let metric = chart.metric;
    let unit = metric.unit();
    let mut page = PdfPage::a4();

    heading(
        &mut page,
        30.0,
        16.0,
        &format!("{} Safety Monitoring", metric.report_section()),
    );
    page.set_fill_color(Rgb::GRAY);
    let subtitle = format!("{} - {}", metric.card_title(), chart.title);
    page.text(MARGIN, 44.0, 11.0, Font::Regular, TextAlign::Start, &subtitle);

    let top = 52.0;
    page.draw_scene(&chart.scene, MARGIN, top, CHART_WIDTH, CHART_HEIGHT);
    if chart.is_blank() {
        page.set_fill_color(Rgb::LIGHT_GRAY);
        page.text(
            A4_WIDTH_MM / 2.0,
            top + CHART_HEIGHT / 2.0,
            14.0,
            Font::Regular,
            TextAlign::Middle,
            NO_DATA,
        );
    }

    let mut y = top + CHART_HEIGHT + 14.0;
    page.set_fill_color(TEXT);
    match summary.stats(metric) {
        Some(stats) => {
            let lines = [
                format!("Latest reading: {:.1} {}", stats.latest, unit),
                format!("Mean: {:.1} {}", stats.mean, unit),
                format!("Observed range: {:.1} - {:.1} {}", stats.min, stats.max, unit),
            ];
            for line in &lines {
                page.text(MARGIN, y, 12.0, Font::Regular, TextAlign::Start, line);
                y += 8.0;
            }
        }
        None => {
            page.text(MARGIN, y, 12.0, Font::Regular, TextAlign::Start, NO_DATA);
            y += 8.0;
        }
    }

    page.set_fill_color(Rgb::GRAY);
    let (lo, hi) = chart.display_range;
    let footnote = format!(
        "Display range {} - {} {}, {} points plotted",
        lo, hi, unit, chart.point_count
    );
    page.text(MARGIN, y + 2.0, 10.0, Font::Regular, TextAlign::Start, &footnote);
    page
}

fn recommendations_page(band: Band, no_data: bool) -> PdfPage {
    let mut page = PdfPage::a4();
    heading(&mut page, 30.0, 16.0, "Recommendations");

    page.set_fill_color(band_color(band));
    page.fill_rect(MARGIN, 41.0, 6.0, 6.0);
    page.set_fill_color(TEXT);
    page.text(MARGIN + 9.0, 46.0, 14.0, Font::Bold, TextAlign::Start, band.title());
    page.set_fill_color(Rgb::GRAY);
    page.text(MARGIN, 56.0, 11.0, Font::Regular, TextAlign::Start, band.advisory());

    page.set_fill_color(TEXT);
    for (i, rec) in band.recommendations().iter().enumerate() {
        let y = 72.0 + i as f64 * 10.0;
        page.text(MARGIN + 5.0, y, 12.0, Font::Regular, TextAlign::Start, &format!("• {}", rec));
    }

    if no_data {
        page.set_fill_color(Rgb::GRAY);
        page.text(
            MARGIN,
            112.0,
            10.0,
            Font::Regular,
            TextAlign::Start,
            "No readings were recorded before this report was generated.",
        );
    }

    page.set_fill_color(Rgb::GRAY);
    page.text(
        MARGIN,
        270.0,
        9.0,
        Font::Regular,
        TextAlign::Start,
        "Readings are synthetic and intended for demonstration only. This is not medical advice.",
    );
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartConfig, ChartSurface, SeriesRenderer};
    use crate::generator::{GeneratorConfig, SampleGenerator};
    use crate::report::SnapshotError;
    use crate::score::stress_score;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 6, 12, 0, 0).unwrap()
    }

    fn pipeline(n: i64) -> (Vec<Sample>, Vec<ChartSurface>) {
        let mut generator = SampleGenerator::seeded(GeneratorConfig::default(), 11);
        let samples: Vec<Sample> = (0..n)
            .map(|i| generator.generate_at(now() - Duration::seconds(n - i)))
            .collect();
        let renderer = SeriesRenderer::default();
        let surfaces = ChartConfig::standard_set()
            .into_iter()
            .map(|config| {
                let mut surface = ChartSurface::new(config);
                renderer.render(&samples, &mut surface).unwrap();
                surface
            })
            .collect();
        (samples, surfaces)
    }

    fn plain_composer() -> ReportComposer {
        ReportComposer::new(ReportOptions {
            compress: false,
            ..ReportOptions::default()
        })
    }

    fn contains(bytes: &[u8], needle: &str) -> bool {
        bytes.windows(needle.len()).any(|w| w == needle.as_bytes())
    }

    #[test]
    fn test_report_has_five_pages_with_footers() {
        let (samples, surfaces) = pipeline(30);
        let score = stress_score(samples.last().unwrap());
        let report = plain_composer()
            .compose_at(&samples, score, &surfaces, now())
            .unwrap();

        assert_eq!(report.page_count, 5);
        let pdf = report.pdf_bytes();
        assert!(contains(pdf, "(Page 1 of 5)"));
        assert!(contains(pdf, "(Page 5 of 5)"));
        assert!(contains(pdf, "(Name: John Doe)"));
        assert!(contains(pdf, "(Cardiovascular Safety Monitoring)"));
        assert!(contains(pdf, "(Stress Response Safety Monitoring)"));
        assert!(contains(pdf, "(Hormonal Balance Safety Monitoring)"));
        assert!(contains(pdf, "(5-Day Hormonal Safety Analysis:)"));
        for rec in score.band().recommendations() {
            assert!(contains(pdf, &format!("(\\225 {})", rec)), "missing {}", rec);
        }
    }

    #[test]
    fn test_average_matches_buffer() {
        let (samples, surfaces) = pipeline(20);
        let report = plain_composer()
            .compose_at(&samples, StressScore::new(10.0), &surfaces, now())
            .unwrap();

        let expected = samples.iter().map(|s| s.cortisol).sum::<f64>() / 20.0;
        let avg = report.summary.cortisol.average.unwrap();
        assert!((avg - expected).abs() < 1e-9);
        assert!(contains(
            report.pdf_bytes(),
            &format!("(Average Cortisol Level: {:.1} \\265g/dL)", expected)
        ));
    }

    #[test]
    fn test_empty_buffer_still_produces_report() {
        let (samples, surfaces) = pipeline(0);
        let report = plain_composer()
            .compose_at(&samples, StressScore::default(), &surfaces, now())
            .unwrap();

        assert_eq!(report.page_count, 5);
        assert!(report.summary.cortisol.average.is_none());
        assert!(contains(report.pdf_bytes(), "(Average Cortisol Level: No data recorded)"));
    }

    #[test]
    fn test_snapshot_failure_aborts() {
        let (samples, mut surfaces) = pipeline(10);
        surfaces.pop();
        let result = plain_composer().compose_at(&samples, StressScore::default(), &surfaces, now());
        assert!(matches!(
            result,
            Err(ReportError::Snapshot(SnapshotError::MissingChart(Metric::Cortisol)))
        ));
    }

    #[test]
    fn test_stale_charts_abort() {
        let (samples, surfaces) = pipeline(10);
        let result =
            plain_composer().compose_at(&samples[..9], StressScore::default(), &surfaces, now());
        assert!(matches!(
            result,
            Err(ReportError::Snapshot(SnapshotError::Stale { .. }))
        ));
    }

    #[test]
    fn test_custom_user_name() {
        let (samples, surfaces) = pipeline(5);
        let composer = ReportComposer::new(ReportOptions {
            user_name: "Ada Lovelace".to_string(),
            compress: false,
            ..ReportOptions::default()
        });
        let report = composer
            .compose_at(&samples, StressScore::default(), &surfaces, now())
            .unwrap();
        assert!(contains(report.pdf_bytes(), "(Name: Ada Lovelace)"));
    }

    #[test]
    fn test_invalid_options_rejected() {
        let options = ReportOptions {
            trailing_days: 0,
            ..ReportOptions::default()
        };
        assert!(options.validate().is_err());

        let options = ReportOptions {
            trailing_days: MAX_TRAILING_DAYS + 1,
            ..ReportOptions::default()
        };
        assert!(options.validate().is_err());

        let options = ReportOptions {
            file_name: "../escape.pdf".to_string(),
            ..ReportOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_save_to_dir_uses_report_file_name() {
        let (samples, surfaces) = pipeline(5);
        let report = ReportComposer::default()
            .compose_at(&samples, StressScore::default(), &surfaces, now())
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = report.save_to_dir(dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), REPORT_FILE_NAME);
        assert_eq!(fs::read(&path).unwrap(), report.pdf_bytes());

        // saving again replaces the file in place
        report.save_to_dir(dir.path()).unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
