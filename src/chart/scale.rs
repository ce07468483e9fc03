//! Linear and time scales mapping data values onto pixel coordinates.
//!
//! Tick generation follows the usual 1-2-5 progression: the raw step
//! `span / count` is rounded to the nearest power of ten times 1, 2, 5 or 10.

use chrono::{DateTime, Utc};

/// Continuous linear mapping from a domain onto a pixel range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Create a scale; the range may be inverted (e.g. y axes)
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Input domain
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Output range
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Map a domain value into the range. A degenerate domain maps to the
    /// middle of the range.
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let t = if d1 == d0 { 0.5 } else { (value - d0) / (d1 - d0) };
        r0 + t * (r1 - r0)
    }

    /// Roughly `count` evenly spaced round values inside the domain
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = ordered(self.domain);
        if lo == hi {
            return vec![lo];
        }
        let step = tick_step(lo, hi, count);
        if !step.is_finite() || step <= 0.0 {
            return vec![lo, hi];
        }
        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last).map(|i| round_to_step(i as f64 * step, step)).collect()
    }
}

/// Time axis scale over a timestamp extent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    inner: LinearScale,
}

impl TimeScale {
    /// Scale spanning `start..=end` onto `range`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, range: (f64, f64)) -> Self {
        let inner = LinearScale::new(
            (start.timestamp_millis() as f64, end.timestamp_millis() as f64),
            range,
        );
        Self { start, end, inner }
    }

    /// Time extent of the scale
    pub fn extent(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start, self.end)
    }

    /// Pixel position of `t`
    pub fn apply(&self, t: DateTime<Utc>) -> f64 {
        self.inner.apply(t.timestamp_millis() as f64)
    }

    /// Tick timestamps on whole-second or larger boundaries
    pub fn ticks(&self, count: usize) -> Vec<DateTime<Utc>> {
        let (lo, hi) = ordered(self.inner.domain());
        if lo == hi {
            return vec![self.start];
        }
        let step = tick_step(lo, hi, count).max(1_000.0);
        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last)
            .filter_map(|i| DateTime::<Utc>::from_timestamp_millis((i as f64 * step) as i64))
            .collect()
    }
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Round step for roughly `count` intervals between `lo` and `hi`
pub fn tick_step(lo: f64, hi: f64, count: usize) -> f64 {
    let raw = (hi - lo).abs() / count.max(1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let error = raw / magnitude;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    magnitude * factor
}

fn round_to_step(value: f64, step: f64) -> f64 {
    let decimals = (-step.log10().floor()).max(0.0) as i32;
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_linear_apply_inverted_range() {
        let y = LinearScale::new((55.0, 95.0), (250.0, 0.0));
        assert_eq!(y.apply(55.0), 250.0);
        assert_eq!(y.apply(95.0), 0.0);
        assert_eq!(y.apply(75.0), 125.0);
    }

    #[test]
    fn test_degenerate_domain_maps_to_middle() {
        let x = LinearScale::new((3.0, 3.0), (0.0, 430.0));
        assert_eq!(x.apply(3.0), 215.0);
    }

    #[test]
    fn test_linear_ticks() {
        let y = LinearScale::new((55.0, 95.0), (250.0, 0.0));
        assert_eq!(y.ticks(10), vec![55.0, 60.0, 65.0, 70.0, 75.0, 80.0, 85.0, 90.0, 95.0]);

        let gsr = LinearScale::new((7.0, 17.0), (250.0, 0.0));
        assert_eq!(gsr.ticks(10), (7..=17).map(|v| v as f64).collect::<Vec<_>>());
    }

    #[test]
    fn test_fractional_ticks_are_rounded() {
        let scale = LinearScale::new((0.0, 1.0), (0.0, 100.0));
        let ticks = scale.ticks(10);
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[3], 0.3);
    }

    #[test]
    fn test_time_ticks_on_second_boundaries() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let end = start + Duration::seconds(99);
        let x = TimeScale::new(start, end, (0.0, 430.0));

        let ticks = x.ticks(5);
        assert_eq!(ticks.len(), 5);
        assert_eq!(ticks[0], start);
        assert_eq!(ticks[1] - ticks[0], Duration::seconds(20));
        assert_eq!(x.apply(end), 430.0);
    }
}
