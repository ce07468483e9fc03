use std::fmt;

use log::debug;
use serde::Serialize;

use super::{MonitorConfig, MonitorError};
use crate::buffer::RollingBuffer;
use crate::chart::{ChartSurface, SeriesRenderer};
use crate::report::{HealthReport, ReportComposer, ReportError};
use crate::sample::{Metric, Sample};
use crate::score::{Band, ScoringModel, StressScore};

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickEvent {
    /// Ticks processed so far, including this one
    pub tick: u64,
    /// Sample appended on this tick
    pub sample: Sample,
    /// Score of `sample`
    pub score: StressScore,
    /// Buffer length after the append
    pub buffered: usize,
}

/// Latest reading of one metric, as shown on its card
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricCard {
    /// Metric shown
    pub metric: Metric,
    /// Latest reading, `None` before the first tick
    pub value: Option<f64>,
}

impl MetricCard {
    /// Card heading
    pub fn title(&self) -> &'static str {
        self.metric.card_title()
    }
}

impl fmt::Display for MetricCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(v) => write!(f, "{}: {:.1} {}", self.title(), v, self.metric.unit()),
            None => write!(f, "{}: -- {}", self.title(), self.metric.unit()),
        }
    }
}

fn cards(latest: Option<&Sample>) -> Vec<MetricCard> {
    Metric::ALL
        .iter()
        .map(|&metric| MetricCard {
            metric,
            value: latest.map(|s| s.value(metric)),
        })
        .collect()
}

/// Live dashboard state: buffer, latest score and the three chart surfaces.
///
/// Only [`tick`](Dashboard::tick) mutates it. Readers that need a consistent
/// view across buffer and charts take a [`DashboardSnapshot`].
#[derive(Debug, Clone)]
pub struct Dashboard {
    buffer: RollingBuffer,
    score: StressScore,
    scoring: ScoringModel,
    renderer: SeriesRenderer,
    surfaces: Vec<ChartSurface>,
    ticks: u64,
}

impl Dashboard {
    /// Empty dashboard with blank charts
    pub fn new(config: &MonitorConfig) -> Result<Self, MonitorError> {
        config.validate()?;
        let surfaces = config
            .charts
            .iter()
            .map(|c| ChartSurface::with_layout(c.clone(), config.layout))
            .collect();
        Ok(Self {
            buffer: RollingBuffer::with_capacity(config.capacity),
            score: StressScore::default(),
            scoring: config.scoring,
            renderer: SeriesRenderer::new(config.layout),
            surfaces,
            ticks: 0,
        })
    }

    /// Append `sample`, rescore, and redraw every chart
    pub fn tick(&mut self, sample: Sample) -> Result<TickEvent, MonitorError> {
        self.buffer.append(sample);
        self.score = self.scoring.score(&sample);

        let samples = self.buffer.snapshot();
        for surface in &mut self.surfaces {
            self.renderer.render(&samples, surface)?;
        }
        self.ticks += 1;

        debug!(
            "tick {}: hr {:.1} gsr {:.2} cortisol {:.2} -> score {} ({})",
            self.ticks,
            sample.heart_rate,
            sample.gsr,
            sample.cortisol,
            self.score,
            self.score.band()
        );
        Ok(TickEvent {
            tick: self.ticks,
            sample,
            score: self.score,
            buffered: self.buffer.len(),
        })
    }

    /// Rolling buffer
    pub fn buffer(&self) -> &RollingBuffer {
        &self.buffer
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<&Sample> {
        self.buffer.latest()
    }

    /// Score of the most recent sample, 0 before the first tick
    pub fn score(&self) -> StressScore {
        self.score
    }

    /// Band of the current score
    pub fn band(&self) -> Band {
        self.score.band()
    }

    /// Ticks processed
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Chart surfaces in dashboard order
    pub fn surfaces(&self) -> &[ChartSurface] {
        &self.surfaces
    }

    /// Surface for one metric
    pub fn surface(&self, metric: Metric) -> Option<&ChartSurface> {
        self.surfaces.iter().find(|s| s.config().metric == metric)
    }

    /// Metric cards for the latest sample
    pub fn cards(&self) -> Vec<MetricCard> {
        cards(self.latest())
    }

    /// Owned, self-consistent copy of the current state
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            samples: self.buffer.snapshot(),
            score: self.score,
            ticks: self.ticks,
            surfaces: self.surfaces.clone(),
        }
    }

    /// Compose a report from the current state
    pub fn compose_report(&self, composer: &ReportComposer) -> Result<HealthReport, ReportError> {
        composer.compose(&self.buffer.snapshot(), self.score, self.surfaces.as_slice())
    }
}

/// Dashboard state detached from the ticker
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    /// Buffer contents, oldest first
    pub samples: Vec<Sample>,
    /// Score at snapshot time
    pub score: StressScore,
    /// Ticks processed at snapshot time
    pub ticks: u64,
    /// Chart surfaces at snapshot time
    pub surfaces: Vec<ChartSurface>,
}

impl DashboardSnapshot {
    /// Most recent sample
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Band of the score
    pub fn band(&self) -> Band {
        self.score.band()
    }

    /// Metric cards for the latest sample
    pub fn cards(&self) -> Vec<MetricCard> {
        cards(self.latest())
    }

    /// Compose a report from this snapshot
    pub fn compose_report(&self, composer: &ReportComposer) -> Result<HealthReport, ReportError> {
        composer.compose(&self.samples, self.score, &self.surfaces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::SampleGenerator;
    use chrono::Utc;

    fn dashboard() -> Dashboard {
        Dashboard::new(&MonitorConfig::default()).unwrap()
    }

    #[test]
    fn test_fresh_dashboard_is_blank() {
        let dash = dashboard();
        assert!(dash.buffer().is_empty());
        assert_eq!(dash.score().value(), 0.0);
        assert_eq!(dash.band(), Band::Safe);
        assert!(dash.surfaces().iter().all(|s| s.is_blank()));
        assert!(dash.cards().iter().all(|c| c.value.is_none()));
    }

    #[test]
    fn test_tick_updates_everything() {
        let mut dash = dashboard();
        let sample = Sample::new(75.0, 12.0, 15.0, Utc::now());
        let event = dash.tick(sample).unwrap();

        assert_eq!(event.tick, 1);
        assert_eq!(event.buffered, 1);
        assert!((event.score.value() - 50.0).abs() < 1e-9);
        assert_eq!(dash.latest(), Some(&sample));
        assert!(dash.surfaces().iter().all(|s| s.point_count() == 1));
        assert_eq!(dash.cards()[0].to_string(), "Heart Safety: 75.0 BPM");
    }

    #[test]
    fn test_charts_track_buffer_after_eviction() {
        let mut dash = dashboard();
        let mut generator = SampleGenerator::new();
        for _ in 0..150 {
            dash.tick(generator.generate()).unwrap();
        }
        assert_eq!(dash.buffer().len(), 100);
        assert_eq!(dash.ticks(), 150);
        assert!(dash.surfaces().iter().all(|s| s.point_count() == 100));

        let latest = *dash.latest().unwrap();
        assert_eq!(dash.score(), crate::score::stress_score(&latest));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut dash = dashboard();
        let mut generator = SampleGenerator::new();
        dash.tick(generator.generate()).unwrap();
        let snapshot = dash.snapshot();
        dash.tick(generator.generate()).unwrap();

        assert_eq!(snapshot.samples.len(), 1);
        assert_eq!(snapshot.ticks, 1);
        assert!(snapshot.surfaces.iter().all(|s| s.point_count() == 1));
        assert!(snapshot.compose_report(&ReportComposer::default()).is_ok());
    }

    #[test]
    fn test_empty_card_display() {
        let card = MetricCard {
            metric: Metric::Cortisol,
            value: None,
        };
        assert_eq!(card.to_string(), "Hormonal Balance: -- μg/dL");
    }
}
