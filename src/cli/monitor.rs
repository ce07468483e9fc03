use anyhow::{Context, Result};
use std::path::PathBuf;

use mindsync::dashboard::{Monitor, MonitorConfig};

use super::status::tick_line;

/// Run the live ticker, printing a status line per tick
pub fn run(config: MonitorConfig, ticks: Option<u64>, report_dir: Option<PathBuf>) -> Result<()> {
    let monitor = Monitor::start(config).context("Failed to start monitor")?;

    let mut seen = 0u64;
    for event in monitor.events().iter() {
        println!("{}", tick_line(&event));
        seen += 1;
        if ticks.is_some_and(|limit| seen >= limit) {
            break;
        }
    }
    monitor.check_error()?;

    if let Some(dir) = report_dir {
        let report = monitor.compose_report().context("Failed to compose report")?;
        let path = report.save_to_dir(&dir)?;
        println!("Report written to {}", path.display());
    }

    let total = monitor.stop()?;
    println!("Stopped after {} ticks", total);
    Ok(())
}
