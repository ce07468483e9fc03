//! Integration tests for report composition and output files
//!
//! These tests verify:
//! 1. The PDF is saved under the fixed file name
//! 2. An empty buffer still yields a complete report
//! 3. A failed chart capture aborts composition without writing anything
//! 4. Bundles follow the container layout (mimetype first, stored)

use std::fs::{self, File};
use std::io::Read;

use mindsync::chart::{ChartConfig, ChartSurface};
use mindsync::prelude::*;
use mindsync::report::{SnapshotError, BUNDLE_MIMETYPE};
use tempfile::tempdir;
use zip::{CompressionMethod, ZipArchive};

fn filled_dashboard(ticks: usize) -> Dashboard {
    let config = MonitorConfig::seeded(99);
    let mut dashboard = Dashboard::new(&config).unwrap();
    let mut generator = SampleGenerator::seeded(config.generator, 99);
    for _ in 0..ticks {
        dashboard.tick(generator.generate()).unwrap();
    }
    dashboard
}

/// Source whose cortisol chart cannot be captured
struct BrokenCharts(Vec<ChartSurface>);

impl SnapshotSource for BrokenCharts {
    fn capture(&self, metric: Metric) -> Result<ChartSnapshot, SnapshotError> {
        if metric == Metric::Cortisol {
            return Err(SnapshotError::MissingChart(metric));
        }
        self.0.capture(metric)
    }
}

#[test]
fn test_report_written_with_fixed_name() {
    let dir = tempdir().unwrap();
    let dashboard = filled_dashboard(40);

    let report = dashboard.compose_report(&ReportComposer::default()).unwrap();
    let path = report.save_to_dir(dir.path()).unwrap();

    assert_eq!(path, dir.path().join(REPORT_FILE_NAME));
    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.4"));
    assert!(bytes.ends_with(b"%%EOF\n"));
    assert_eq!(report.page_count, 5);
    assert_eq!(report.summary.sample_count, 40);
}

#[test]
fn test_empty_buffer_report() {
    let dir = tempdir().unwrap();
    let dashboard = filled_dashboard(0);

    let composer = ReportComposer::new(ReportOptions {
        compress: false,
        ..ReportOptions::default()
    });
    let report = dashboard.compose_report(&composer).unwrap();
    report.save_to_dir(dir.path()).unwrap();

    assert!(report.summary.is_empty());
    assert!(report.summary.cortisol.average.is_none());
    assert!(report.charts.iter().all(|c| c.is_blank()));

    let text = String::from_utf8_lossy(report.pdf_bytes());
    assert!(text.contains("No data recorded"));
    assert!(text.contains("(Page 5 of 5)"));
}

#[test]
fn test_snapshot_failure_writes_nothing() {
    let dir = tempdir().unwrap();
    let dashboard = filled_dashboard(10);
    let snapshot = dashboard.snapshot();
    let charts = BrokenCharts(snapshot.surfaces.clone());

    let result = ReportComposer::default().compose(&snapshot.samples, snapshot.score, &charts);
    assert!(matches!(
        result,
        Err(ReportError::Snapshot(SnapshotError::MissingChart(Metric::Cortisol)))
    ));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_recommendations_follow_band() {
    let config = MonitorConfig::default();
    let mut dashboard = Dashboard::new(&config).unwrap();
    dashboard.tick(Sample::now(95.0, 17.0, 23.0)).unwrap();
    assert_eq!(dashboard.band(), Band::Alert);

    let composer = ReportComposer::new(ReportOptions {
        compress: false,
        ..ReportOptions::default()
    });
    let report = dashboard.compose_report(&composer).unwrap();
    let text = String::from_utf8_lossy(report.pdf_bytes());
    assert!(text.contains("Alert Zone"));
    assert!(text.contains("Consult healthcare provider"));
    assert!(!text.contains("Maintain current healthy lifestyle"));
}

#[test]
fn test_bundle_container_layout() {
    let dir = tempdir().unwrap();
    let dashboard = filled_dashboard(25);
    let report = dashboard.compose_report(&ReportComposer::default()).unwrap();

    let path = dir.path().join("session.mindsync");
    report.save_bundle(&path).unwrap();

    let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
    {
        let mut mimetype = archive.by_index(0).unwrap();
        assert_eq!(mimetype.name(), "mimetype");
        assert_eq!(mimetype.compression(), CompressionMethod::Stored);
        let mut content = String::new();
        mimetype.read_to_string(&mut content).unwrap();
        assert_eq!(content, BUNDLE_MIMETYPE);
    }

    let names: Vec<String> = archive.file_names().map(String::from).collect();
    for expected in [
        "report.pdf",
        "summary.json",
        "charts/heart_rate.svg",
        "charts/gsr.svg",
        "charts/cortisol.svg",
    ] {
        assert!(names.iter().any(|n| n == expected), "missing {}", expected);
    }
}

#[test]
fn test_custom_chart_config_flows_into_report() {
    let mut config = MonitorConfig::default();
    if let Some(chart) = config.charts.iter_mut().find(|c| c.metric == Metric::HeartRate) {
        *chart = ChartConfig {
            title: "Pulse".to_string(),
            ..ChartConfig::standard(Metric::HeartRate)
        };
    }
    let mut dashboard = Dashboard::new(&config).unwrap();
    dashboard.tick(Sample::now(70.0, 11.0, 14.0)).unwrap();

    let report = dashboard.compose_report(&ReportComposer::default()).unwrap();
    assert_eq!(report.charts[0].title, "Pulse");
}

#[test]
fn test_oversized_trailing_window_is_rejected() {
    let dashboard = filled_dashboard(10);
    let composer = ReportComposer::new(ReportOptions {
        trailing_days: 100_000_000,
        ..ReportOptions::default()
    });

    let result = dashboard.compose_report(&composer);
    assert!(matches!(result, Err(ReportError::InvalidOptions(_))));
}
