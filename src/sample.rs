//! # Sample Module
//!
//! A [`Sample`] is one synthetic physiological observation: heart rate, a
//! skin-conductance proxy (GSR) and a hormonal proxy (cortisol), stamped with
//! the time it was captured.
//!
//! Samples are plain `Copy` values. Once a sample has been appended to a
//! [`RollingBuffer`](crate::buffer::RollingBuffer) it is only ever handed out
//! by shared reference or by value, so nothing downstream can alter it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One physiological reading with its capture timestamp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Heart rate in beats per minute
    pub heart_rate: f64,

    /// Galvanic skin response in microsiemens
    pub gsr: f64,

    /// Cortisol level in μg/dL
    pub cortisol: f64,

    /// Capture time
    pub timestamp: DateTime<Utc>,
}

impl Sample {
    /// Create a sample from its three readings and a timestamp
    pub fn new(heart_rate: f64, gsr: f64, cortisol: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            heart_rate,
            gsr,
            cortisol,
            timestamp,
        }
    }

    /// Create a sample stamped with the current time
    pub fn now(heart_rate: f64, gsr: f64, cortisol: f64) -> Self {
        Self::new(heart_rate, gsr, cortisol, Utc::now())
    }

    /// Reading for the given metric
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::HeartRate => self.heart_rate,
            Metric::Gsr => self.gsr,
            Metric::Cortisol => self.cortisol,
        }
    }
}

/// The three monitored metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Heart rate (BPM)
    HeartRate,
    /// Galvanic skin response (µS)
    Gsr,
    /// Cortisol (μg/dL)
    Cortisol,
}

impl Metric {
    /// All metrics in dashboard order
    pub const ALL: [Metric; 3] = [Metric::HeartRate, Metric::Gsr, Metric::Cortisol];

    /// Stable identifier used in file names and config keys
    pub fn id(&self) -> &'static str {
        match self {
            Metric::HeartRate => "heart_rate",
            Metric::Gsr => "gsr",
            Metric::Cortisol => "cortisol",
        }
    }

    /// Human-readable metric name
    pub fn label(&self) -> &'static str {
        match self {
            Metric::HeartRate => "Heart Rate",
            Metric::Gsr => "GSR",
            Metric::Cortisol => "Cortisol",
        }
    }

    /// Display unit
    pub fn unit(&self) -> &'static str {
        match self {
            Metric::HeartRate => "BPM",
            Metric::Gsr => "µS",
            Metric::Cortisol => "μg/dL",
        }
    }

    /// Title of the metric card shown above the charts
    pub fn card_title(&self) -> &'static str {
        match self {
            Metric::HeartRate => "Heart Safety",
            Metric::Gsr => "Stress Response",
            Metric::Cortisol => "Hormonal Balance",
        }
    }

    /// Default chart title
    pub fn chart_title(&self) -> &'static str {
        match self {
            Metric::HeartRate => "Cardiovascular Safety",
            Metric::Gsr => "Stress Response Monitoring",
            Metric::Cortisol => "Hormonal Safety Tracking",
        }
    }

    /// Section heading used for this metric's report page
    pub fn report_section(&self) -> &'static str {
        match self {
            Metric::HeartRate => "Cardiovascular",
            Metric::Gsr => "Stress Response",
            Metric::Cortisol => "Hormonal Balance",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "heart_rate" | "heartrate" | "hr" => Ok(Metric::HeartRate),
            "gsr" => Ok(Metric::Gsr),
            "cortisol" => Ok(Metric::Cortisol),
            _ => Err(format!(
                "Unknown metric '{}'. Valid options: heart_rate, gsr, cortisol",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_by_metric() {
        let sample = Sample::now(72.0, 11.5, 14.0);
        assert_eq!(sample.value(Metric::HeartRate), 72.0);
        assert_eq!(sample.value(Metric::Gsr), 11.5);
        assert_eq!(sample.value(Metric::Cortisol), 14.0);
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!(Metric::from_str("heart-rate").unwrap(), Metric::HeartRate);
        assert_eq!(Metric::from_str("GSR").unwrap(), Metric::Gsr);
        assert_eq!(Metric::from_str("cortisol").unwrap(), Metric::Cortisol);
        assert!(Metric::from_str("glucose").is_err());
    }

    #[test]
    fn test_metric_ids_roundtrip_through_display() {
        for metric in Metric::ALL {
            assert_eq!(Metric::from_str(&metric.to_string()).unwrap(), metric);
        }
    }
}
