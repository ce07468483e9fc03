use anyhow::Result;
use chrono::Utc;

use mindsync::sample::Sample;
use mindsync::score::stress_score;

use super::status::score_block;

/// Score a single reading
pub fn run(heart_rate: f64, gsr: f64, cortisol: f64) -> Result<()> {
    let sample = Sample::new(heart_rate, gsr, cortisol, Utc::now());
    print!("{}", score_block(stress_score(&sample)));
    Ok(())
}
