use anyhow::{anyhow, Context, Result};
use chrono::{TimeDelta, Utc};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use mindsync::dashboard::{Dashboard, MonitorConfig};
use mindsync::generator::SampleGenerator;

mod charts;
mod config;
mod monitor;
mod report;
mod score;
mod status;

use config::Config;

/// MindSync - synthetic physiological monitor and health report generator
#[derive(Parser)]
#[command(name = "mindsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the live dashboard, printing one status line per tick
    Monitor {
        /// Stop after this many ticks (runs until interrupted when omitted)
        #[arg(short = 'n', long)]
        ticks: Option<u64>,

        /// Milliseconds between ticks
        #[arg(short = 'i', long)]
        interval_ms: Option<u64>,

        /// Seed for reproducible readings
        #[arg(long)]
        seed: Option<u64>,

        /// Patient name printed in the report
        #[arg(long)]
        name: Option<String>,

        /// Write a report into this directory when the run ends
        #[arg(long, value_name = "DIR")]
        report: Option<PathBuf>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Simulate ticks instantly and write the PDF report
    Report {
        /// Output directory
        #[arg(value_name = "DIR", default_value = ".")]
        output: PathBuf,

        /// Number of simulated ticks
        #[arg(short = 'n', long, default_value = "100")]
        ticks: u64,

        /// Seed for reproducible readings
        #[arg(long)]
        seed: Option<u64>,

        /// Patient name printed in the report
        #[arg(long)]
        name: Option<String>,

        /// Trailing cortisol window in days
        #[arg(long)]
        trailing_days: Option<u32>,

        /// Also write a .mindsync bundle next to the PDF
        #[arg(long)]
        bundle: bool,

        /// Write uncompressed PDF content streams
        #[arg(long)]
        no_compress: bool,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Score a single reading and print its band
    Score {
        /// Heart rate in BPM
        #[arg(value_name = "HEART_RATE", allow_negative_numbers = true)]
        heart_rate: f64,

        /// Galvanic skin response in µS
        #[arg(value_name = "GSR", allow_negative_numbers = true)]
        gsr: f64,

        /// Cortisol in μg/dL
        #[arg(value_name = "CORTISOL", allow_negative_numbers = true)]
        cortisol: f64,
    },

    /// Simulate ticks instantly and write the three charts as SVG
    Charts {
        /// Output directory
        #[arg(value_name = "DIR", default_value = ".")]
        output: PathBuf,

        /// Number of simulated ticks
        #[arg(short = 'n', long, default_value = "100")]
        ticks: u64,

        /// Seed for reproducible readings
        #[arg(long)]
        seed: Option<u64>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Monitor {
            ticks,
            interval_ms,
            seed,
            name,
            report,
            config,
        } => {
            let mut monitor_config = load_config(config.as_ref(), seed, name)?;
            if let Some(ms) = interval_ms {
                monitor_config.tick_interval_ms = ms;
            }
            monitor::run(monitor_config, ticks, report)
        }
        Commands::Report {
            output,
            ticks,
            seed,
            name,
            trailing_days,
            bundle,
            no_compress,
            config,
        } => {
            let mut monitor_config = load_config(config.as_ref(), seed, name)?;
            if let Some(days) = trailing_days {
                monitor_config.report.trailing_days = days;
            }
            if no_compress {
                monitor_config.report.compress = false;
            }
            report::run(monitor_config, ticks, output, bundle)
        }
        Commands::Score {
            heart_rate,
            gsr,
            cortisol,
        } => score::run(heart_rate, gsr, cortisol),
        Commands::Charts {
            output,
            ticks,
            seed,
            config,
        } => {
            let monitor_config = load_config(config.as_ref(), seed, None)?;
            charts::run(monitor_config, ticks, output)
        }
    }
}

/// Defaults, then the config file, then flags
fn load_config(
    path: Option<&PathBuf>,
    seed: Option<u64>,
    name: Option<String>,
) -> Result<MonitorConfig> {
    let mut config = Config::discover(path)?.apply(MonitorConfig::default())?;
    if seed.is_some() {
        config.seed = seed;
    }
    if let Some(name) = name {
        config.report.user_name = name;
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Run `ticks` ticks back to back, stamping samples one interval apart and
/// ending now, so the charts show a realistic time axis.
fn simulate(config: &MonitorConfig, ticks: u64) -> Result<Dashboard> {
    let mut dashboard = Dashboard::new(config)?;
    let mut generator = match config.seed {
        Some(seed) => SampleGenerator::seeded(config.generator, seed),
        None => SampleGenerator::with_config(config.generator),
    };
    let interval_ms = i64::try_from(config.tick_interval_ms)
        .with_context(|| format!("Tick interval {} ms is out of range", config.tick_interval_ms))?;
    let end = Utc::now();
    for i in 0..ticks {
        let at = i64::try_from(ticks - 1 - i)
            .ok()
            .and_then(|offset| interval_ms.checked_mul(offset))
            .and_then(TimeDelta::try_milliseconds)
            .and_then(|back| end.checked_sub_signed(back))
            .ok_or_else(|| {
                anyhow!(
                    "{} ticks of {} ms reach past the representable time range",
                    ticks,
                    config.tick_interval_ms
                )
            })?;
        dashboard.tick(generator.generate_at(at))?;
    }
    info!("Simulated {} ticks", ticks);
    Ok(dashboard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindsync::dashboard::MAX_TICK_INTERVAL_MS;

    #[test]
    fn test_simulate_spaces_samples_by_interval() {
        let config = MonitorConfig::seeded(3);
        let dashboard = simulate(&config, 10).unwrap();
        let samples = dashboard.buffer().snapshot();
        assert_eq!(samples.len(), 10);
        for pair in samples.windows(2) {
            assert_eq!((pair[1].timestamp - pair[0].timestamp).num_milliseconds(), 1_000);
        }
    }

    #[test]
    fn test_simulate_rejects_unrepresentable_history() {
        let config = MonitorConfig {
            tick_interval_ms: MAX_TICK_INTERVAL_MS,
            ..MonitorConfig::seeded(1)
        };
        assert!(simulate(&config, u64::MAX).is_err());
        assert!(simulate(&config, 200_000_000).is_err());
    }

    #[test]
    fn test_oversized_interval_fails_validation() {
        let config = MonitorConfig {
            tick_interval_ms: 100_000_000_000_000,
            ..MonitorConfig::seeded(1)
        };
        assert!(simulate(&config, 100).is_err());
    }
}
