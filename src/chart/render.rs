//! # Series Renderer
//!
//! Projects buffered samples onto a line chart with a gradient-filled area,
//! time and value axes, and a marker on the most recent reading.
//!
//! The x axis spans the observed time extent of the samples. The y axis is
//! the metric's fixed display range, never fitted to the data, so readings
//! outside it are clipped at the plot edge. Every render clears the target
//! [`ChartSurface`] and rebuilds it from scratch.

use log::trace;

use super::config::{ChartConfig, ChartLayout, Rgb};
use super::curve::monotone_x;
use super::scale::{LinearScale, TimeScale};
use super::scene::{Element, Paint, Path, Point, Rect, Scene, Stroke, TextAlign};
use super::series::ChartSeries;
use super::ChartError;
use crate::sample::Sample;

const X_TICKS: usize = 5;
const Y_TICKS: usize = 10;
const TICK_SIZE: f64 = 6.0;
const LABEL_SIZE: f64 = 10.0;
const MARKER_RADIUS: f64 = 4.0;
const LINE_WIDTH: f64 = 2.0;

/// Default chart background
pub const BACKGROUND: Rgb = Rgb::BLACK;

/// Axis and label color
pub const AXIS_COLOR: Rgb = Rgb::new(0xcc, 0xcc, 0xcc);

/// Caller-owned rendering target for one metric's chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSurface {
    config: ChartConfig,
    scene: Scene,
    point_count: usize,
    revision: u64,
}

impl ChartSurface {
    /// Blank surface for `config` using the default layout
    pub fn new(config: ChartConfig) -> Self {
        Self::with_layout(config, ChartLayout::default())
    }

    /// Blank surface with an explicit layout
    pub fn with_layout(config: ChartConfig, layout: ChartLayout) -> Self {
        let scene = Scene::blank(config.metric.id(), layout.width, layout.height, BACKGROUND);
        Self {
            config,
            scene,
            point_count: 0,
            revision: 0,
        }
    }

    /// Chart configuration
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Current drawing
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Number of points in the last render
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// Number of renders performed on this surface
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// True when nothing is drawn
    pub fn is_blank(&self) -> bool {
        self.scene.is_blank()
    }

    /// Erase the drawing, keeping size and configuration
    pub fn clear(&mut self) {
        self.scene.plot.clear();
        self.scene.overlay.clear();
        self.point_count = 0;
    }

    /// Serialize the current drawing as a standalone SVG document
    pub fn to_svg(&self) -> Result<String, ChartError> {
        super::svg::to_svg(&self.scene)
    }
}

/// Renders chart series onto surfaces
#[derive(Debug, Clone, Default)]
pub struct SeriesRenderer {
    layout: ChartLayout,
}

impl SeriesRenderer {
    /// Renderer for the given surface geometry
    pub fn new(layout: ChartLayout) -> Self {
        Self { layout }
    }

    /// Surface geometry
    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    /// Clear `surface` and redraw it from `samples`. An empty slice leaves the
    /// surface blank.
    pub fn render(&self, samples: &[Sample], surface: &mut ChartSurface) -> Result<(), ChartError> {
        surface.config.validate()?;
        surface.clear();
        surface.revision += 1;

        let series = ChartSeries::from_samples(samples, &surface.config);
        if series.is_empty() {
            return Ok(());
        }
        surface.point_count = series.len();
        surface.scene = self.render_scene(&series, &surface.config);
        trace!(
            "rendered {} chart: {} points, revision {}",
            surface.config.metric,
            series.len(),
            surface.revision
        );
        Ok(())
    }

    /// Build the scene for `series` without touching any surface
    pub fn render_scene(&self, series: &ChartSeries, config: &ChartConfig) -> Scene {
        let layout = &self.layout;
        let mut scene = Scene::blank(config.metric.id(), layout.width, layout.height, BACKGROUND);

        let left = layout.margin_left;
        let top = layout.margin_top;
        let right = left + layout.inner_width();
        let bottom = top + layout.inner_height();
        scene.clip = Rect {
            x: left,
            y: top,
            width: layout.inner_width(),
            height: layout.inner_height(),
        };

        let Some((start, end)) = series.time_extent() else {
            return scene;
        };
        let x = TimeScale::new(start, end, (left, right));
        let y = LinearScale::new((series.display_min, series.display_max), (bottom, top));

        let points: Vec<Point> = series
            .points
            .iter()
            .filter(|p| p.value.is_finite())
            .map(|p| Point::new(x.apply(p.timestamp), y.apply(p.value)))
            .collect();

        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            let baseline = y.apply(series.display_min);

            let mut area = Path::new();
            area.move_to(Point::new(first.x, baseline));
            monotone_x(&mut area, &points, true);
            area.line_to(Point::new(last.x, baseline)).close();
            scene.plot.push(Element::Path {
                path: area,
                fill: Some(Paint::VerticalGradient {
                    color: config.color,
                    y_bottom: baseline,
                    y_top: y.apply(series.display_max),
                    bottom_opacity: 0.2,
                    top_opacity: 1.0,
                }),
                stroke: None,
            });

            let mut line = Path::new();
            monotone_x(&mut line, &points, false);
            scene.plot.push(Element::Path {
                path: line,
                fill: None,
                stroke: Some(Stroke::new(config.color, LINE_WIDTH)),
            });

            scene.plot.push(Element::Circle {
                center: last,
                radius: MARKER_RADIUS,
                fill: config.color,
                stroke: Some(Stroke::new(Rgb::WHITE, LINE_WIDTH)),
            });
        }

        self.draw_x_axis(&mut scene, &x, bottom);
        self.draw_y_axis(&mut scene, &y, left);
        scene
    }

    fn draw_x_axis(&self, scene: &mut Scene, x: &TimeScale, bottom: f64) {
        let axis = Stroke::new(AXIS_COLOR, 1.0);
        let (r0, r1) = (self.layout.margin_left, self.layout.margin_left + self.layout.inner_width());
        scene.overlay.push(Element::Line {
            from: Point::new(r0, bottom),
            to: Point::new(r1, bottom),
            stroke: axis,
        });
        for tick in x.ticks(X_TICKS) {
            let px = x.apply(tick);
            scene.overlay.push(Element::Line {
                from: Point::new(px, bottom),
                to: Point::new(px, bottom + TICK_SIZE),
                stroke: axis,
            });
            scene.overlay.push(Element::Text {
                anchor: Point::new(px, bottom + TICK_SIZE + 3.0 + LABEL_SIZE * 0.71),
                text: tick.format("%H:%M:%S").to_string(),
                size: LABEL_SIZE,
                color: AXIS_COLOR,
                align: TextAlign::Middle,
            });
        }
    }

    fn draw_y_axis(&self, scene: &mut Scene, y: &LinearScale, left: f64) {
        let axis = Stroke::new(AXIS_COLOR, 1.0);
        let (bottom, top) = y.range();
        scene.overlay.push(Element::Line {
            from: Point::new(left, top),
            to: Point::new(left, bottom),
            stroke: axis,
        });
        for tick in y.ticks(Y_TICKS) {
            let py = y.apply(tick);
            scene.overlay.push(Element::Line {
                from: Point::new(left - TICK_SIZE, py),
                to: Point::new(left, py),
                stroke: axis,
            });
            scene.overlay.push(Element::Text {
                anchor: Point::new(left - TICK_SIZE - 3.0, py + LABEL_SIZE * 0.32),
                text: format_tick(tick),
                size: LABEL_SIZE,
                color: AXIS_COLOR,
                align: TextAlign::End,
            });
        }
    }
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        super::scene::fmt_num(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::scene::PathCommand;
    use crate::sample::Metric;
    use chrono::{Duration, TimeZone, Utc};

    fn samples(n: i64) -> Vec<Sample> {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        (0..n)
            .map(|i| {
                let wobble = (i % 7) as f64;
                Sample::new(70.0 + wobble, 11.0 + wobble / 2.0, 14.0 + wobble, t0 + Duration::seconds(i))
            })
            .collect()
    }

    #[test]
    fn test_empty_buffer_leaves_surface_blank() {
        let renderer = SeriesRenderer::default();
        let mut surface = ChartSurface::new(ChartConfig::standard(Metric::HeartRate));
        renderer.render(&[], &mut surface).unwrap();
        assert!(surface.is_blank());
        assert_eq!(surface.point_count(), 0);
        assert_eq!(surface.revision(), 1);
    }

    #[test]
    fn test_render_is_idempotent() {
        let renderer = SeriesRenderer::default();
        let data = samples(40);
        let mut a = ChartSurface::new(ChartConfig::standard(Metric::Gsr));
        let mut b = ChartSurface::new(ChartConfig::standard(Metric::Gsr));

        renderer.render(&data, &mut a).unwrap();
        renderer.render(&data, &mut b).unwrap();
        renderer.render(&data, &mut b).unwrap();

        assert_eq!(a.scene(), b.scene());
        assert_eq!(a.point_count(), 40);
        assert_eq!(b.revision(), 2);
    }

    #[test]
    fn test_rerender_replaces_previous_drawing() {
        let renderer = SeriesRenderer::default();
        let mut surface = ChartSurface::new(ChartConfig::standard(Metric::Cortisol));
        renderer.render(&samples(50), &mut surface).unwrap();
        let plot_elements = surface.scene().plot.len();

        renderer.render(&samples(10), &mut surface).unwrap();
        assert_eq!(surface.scene().plot.len(), plot_elements);
        assert_eq!(surface.point_count(), 10);

        renderer.render(&[], &mut surface).unwrap();
        assert!(surface.is_blank());
    }

    #[test]
    fn test_marker_sits_on_latest_point() {
        let renderer = SeriesRenderer::default();
        let data = samples(20);
        let config = ChartConfig::standard(Metric::HeartRate);
        let scene = renderer.render_scene(&ChartSeries::from_samples(&data, &config), &config);

        let layout = ChartLayout::default();
        let marker = scene
            .plot
            .iter()
            .find_map(|e| match e {
                Element::Circle { center, .. } => Some(*center),
                _ => None,
            })
            .unwrap();
        assert_eq!(marker.x, layout.margin_left + layout.inner_width());

        let latest = data.last().unwrap().heart_rate;
        let expected_y = layout.margin_top + layout.inner_height() * (95.0 - latest) / 40.0;
        assert!((marker.y - expected_y).abs() < 1e-9);
    }

    #[test]
    fn test_line_has_one_segment_per_interval() {
        let renderer = SeriesRenderer::default();
        let data = samples(25);
        let config = ChartConfig::standard(Metric::Gsr);
        let scene = renderer.render_scene(&ChartSeries::from_samples(&data, &config), &config);

        let line = scene
            .plot
            .iter()
            .find_map(|e| match e {
                Element::Path { path, stroke: Some(_), .. } => Some(path),
                _ => None,
            })
            .unwrap();
        let cubics = line
            .commands()
            .iter()
            .filter(|c| matches!(c, PathCommand::CubicTo(..)))
            .count();
        assert_eq!(cubics, 24);
    }

    #[test]
    fn test_y_axis_uses_display_range_not_data() {
        let renderer = SeriesRenderer::default();
        let config = ChartConfig::standard(Metric::HeartRate);
        let scene = renderer.render_scene(&ChartSeries::from_samples(&samples(5), &config), &config);

        let labels: Vec<&str> = scene
            .overlay
            .iter()
            .filter_map(|e| match e {
                Element::Text { text, align: TextAlign::End, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels.first(), Some(&"55"));
        assert_eq!(labels.last(), Some(&"95"));
    }

    #[test]
    fn test_invalid_range_is_reported() {
        let renderer = SeriesRenderer::default();
        let mut config = ChartConfig::standard(Metric::HeartRate);
        config.display_max = config.display_min;
        let mut surface = ChartSurface::new(config);
        assert!(renderer.render(&samples(3), &mut surface).is_err());
    }
}
