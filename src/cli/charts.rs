use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

use mindsync::dashboard::MonitorConfig;

/// Simulate `ticks` ticks and write one SVG per chart into `output`
pub fn run(config: MonitorConfig, ticks: u64, output: PathBuf) -> Result<()> {
    let dashboard = super::simulate(&config, ticks)?;

    fs::create_dir_all(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    for surface in dashboard.surfaces() {
        let metric = surface.config().metric;
        let path = output.join(format!("{}.svg", metric.id()));
        let svg = surface
            .to_svg()
            .with_context(|| format!("Failed to serialize {} chart", metric))?;
        fs::write(&path, svg).with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote {}", path.display());
        println!("{} ({} points) -> {}", surface.config().title, surface.point_count(), path.display());
    }
    Ok(())
}
