use anyhow::{Context, Result};
use std::path::PathBuf;

use mindsync::dashboard::MonitorConfig;
use mindsync::report::{ReportComposer, BUNDLE_EXTENSION};

use super::status::band_label;

/// Simulate `ticks` ticks, then write the report (and optionally a bundle) into `output`
pub fn run(config: MonitorConfig, ticks: u64, output: PathBuf, bundle: bool) -> Result<()> {
    let dashboard = super::simulate(&config, ticks)?;
    let composer = ReportComposer::new(config.report.clone());

    let report = dashboard
        .compose_report(&composer)
        .context("Failed to compose report")?;
    let pdf_path = report
        .save_to_dir(&output)
        .with_context(|| format!("Failed to write report into {}", output.display()))?;

    println!("Report {}", report.id);
    println!("  Samples: {}", report.summary.sample_count);
    println!("  Score:   {} ({})", report.summary.score, band_label(report.summary.band));
    match report.summary.cortisol.average {
        Some(avg) => println!(
            "  Cortisol ({}-day average): {:.1} μg/dL",
            report.summary.cortisol.window_days, avg
        ),
        None => println!("  Cortisol: No data recorded"),
    }
    println!("  Pages:   {}", report.page_count);
    println!("  PDF:     {}", pdf_path.display());

    if bundle {
        let bundle_path = pdf_path.with_extension(BUNDLE_EXTENSION);
        report
            .save_bundle(&bundle_path)
            .with_context(|| format!("Failed to write bundle {}", bundle_path.display()))?;
        println!("  Bundle:  {}", bundle_path.display());
    }
    Ok(())
}
