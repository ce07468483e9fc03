//! Terminal status lines.

#[cfg(feature = "colorized_output")]
use console::style;

use mindsync::dashboard::TickEvent;
use mindsync::sample::Metric;
use mindsync::score::{Band, StressScore};

/// Band label, colored when the terminal supports it
pub fn band_label(band: Band) -> String {
    #[cfg(feature = "colorized_output")]
    {
        let label = band.title();
        match band {
            Band::Safe => style(label).green().bold().to_string(),
            Band::Caution => style(label).yellow().bold().to_string(),
            Band::Alert => style(label).red().bold().to_string(),
        }
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        band.title().to_string()
    }
}

/// One line per tick
pub fn tick_line(event: &TickEvent) -> String {
    let readings: Vec<String> = Metric::ALL
        .iter()
        .map(|&m| format!("{} {:>5.1} {}", m.label(), event.sample.value(m), m.unit()))
        .collect();
    format!(
        "[{:>5}] {} | {} | score {:>5} {}",
        event.tick,
        event.sample.timestamp.format("%H:%M:%S"),
        readings.join(" | "),
        event.score,
        band_label(event.score.band())
    )
}

/// Multi-line block for a single scored reading
pub fn score_block(score: StressScore) -> String {
    let band = score.band();
    let mut out = format!("Stress score: {} / 100\n", score);
    out.push_str(&format!("Band: {}\n", band_label(band)));
    out.push_str(&format!("{}\n", band.advisory()));
    out.push_str("Recommendations:\n");
    for rec in band.recommendations() {
        out.push_str(&format!("  • {}\n", rec));
    }
    out
}
