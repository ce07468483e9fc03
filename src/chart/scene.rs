//! Backend-neutral drawing primitives.
//!
//! A [`Scene`] is the full description of one rendered chart. It is serialized
//! to SVG for the dashboard surfaces and replayed as PDF path operators when a
//! chart is placed in a report.

use super::config::Rgb;

/// Point in surface coordinates (origin top-left, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
}

impl Point {
    /// Create a point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One path segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Start a new subpath
    MoveTo(Point),
    /// Straight segment
    LineTo(Point),
    /// Cubic Bézier segment: two control points and the end point
    CubicTo(Point, Point, Point),
    /// Close the current subpath
    Close,
}

/// Sequence of path commands
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    /// Empty path
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a move
    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(p));
        self
    }

    /// Append a straight segment
    pub fn line_to(&mut self, p: Point) -> &mut Self {
        self.commands.push(PathCommand::LineTo(p));
        self
    }

    /// Append a cubic segment
    pub fn cubic_to(&mut self, c1: Point, c2: Point, end: Point) -> &mut Self {
        self.commands.push(PathCommand::CubicTo(c1, c2, end));
        self
    }

    /// Close the current subpath
    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// Commands in drawing order
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// True when nothing has been added
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Last point reached by the path
    pub fn current_point(&self) -> Option<Point> {
        self.commands.iter().rev().find_map(|c| match *c {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(p),
            PathCommand::CubicTo(_, _, p) => Some(p),
            PathCommand::Close => None,
        })
    }

    /// SVG path data (`d` attribute)
    pub fn to_svg_data(&self) -> String {
        let mut d = String::new();
        for cmd in &self.commands {
            if !d.is_empty() {
                d.push(' ');
            }
            match cmd {
                PathCommand::MoveTo(p) => d.push_str(&format!("M{},{}", fmt_num(p.x), fmt_num(p.y))),
                PathCommand::LineTo(p) => d.push_str(&format!("L{},{}", fmt_num(p.x), fmt_num(p.y))),
                PathCommand::CubicTo(c1, c2, p) => d.push_str(&format!(
                    "C{},{} {},{} {},{}",
                    fmt_num(c1.x),
                    fmt_num(c1.y),
                    fmt_num(c2.x),
                    fmt_num(c2.y),
                    fmt_num(p.x),
                    fmt_num(p.y)
                )),
                PathCommand::Close => d.push('Z'),
            }
        }
        d
    }
}

/// Format a coordinate with at most three decimals and no trailing zeros
pub fn fmt_num(v: f64) -> String {
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Line style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Line color
    pub color: Rgb,
    /// Line width in surface units
    pub width: f64,
}

impl Stroke {
    /// Create a stroke
    pub const fn new(color: Rgb, width: f64) -> Self {
        Self { color, width }
    }
}

/// Fill style
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    /// Uniform color
    Solid(Rgb),
    /// Vertical gradient of one color from `bottom_opacity` at `y_bottom` to
    /// `top_opacity` at `y_top`
    VerticalGradient {
        /// Gradient color
        color: Rgb,
        /// Y coordinate of the bottom stop
        y_bottom: f64,
        /// Y coordinate of the top stop
        y_top: f64,
        /// Opacity at the bottom stop
        bottom_opacity: f64,
        /// Opacity at the top stop
        top_opacity: f64,
    },
}

/// Horizontal text alignment relative to the anchor point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// Anchor is the left edge
    Start,
    /// Anchor is the center
    Middle,
    /// Anchor is the right edge
    End,
}

/// Drawable element
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Filled and/or stroked path
    Path {
        /// Geometry
        path: Path,
        /// Fill, if any
        fill: Option<Paint>,
        /// Outline, if any
        stroke: Option<Stroke>,
    },
    /// Straight line
    Line {
        /// Start point
        from: Point,
        /// End point
        to: Point,
        /// Line style
        stroke: Stroke,
    },
    /// Circle marker
    Circle {
        /// Center
        center: Point,
        /// Radius
        radius: f64,
        /// Fill color
        fill: Rgb,
        /// Outline, if any
        stroke: Option<Stroke>,
    },
    /// Single line of text
    Text {
        /// Baseline anchor
        anchor: Point,
        /// Content
        text: String,
        /// Font size
        size: f64,
        /// Text color
        color: Rgb,
        /// Alignment relative to `anchor`
        align: TextAlign,
    },
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left x
    pub x: f64,
    /// Top-left y
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

/// Complete description of one chart
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Surface width
    pub width: f64,
    /// Surface height
    pub height: f64,
    /// Background color
    pub background: Rgb,
    /// Plot area; `plot` elements are clipped to it
    pub clip: Rect,
    /// Data elements (area, line, marker), clipped to `clip`
    pub plot: Vec<Element>,
    /// Axes and labels, drawn unclipped on top
    pub overlay: Vec<Element>,
    /// Identifier used for SVG defs (gradient and clip ids)
    pub id: String,
}

impl Scene {
    /// Blank scene with the given size
    pub fn blank(id: impl Into<String>, width: f64, height: f64, background: Rgb) -> Self {
        Self {
            width,
            height,
            background,
            clip: Rect {
                x: 0.0,
                y: 0.0,
                width,
                height,
            },
            plot: Vec::new(),
            overlay: Vec::new(),
            id: id.into(),
        }
    }

    /// True when nothing has been drawn
    pub fn is_blank(&self) -> bool {
        self.plot.is_empty() && self.overlay.is_empty()
    }

    /// All elements in paint order
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.plot.iter().chain(self.overlay.iter())
    }
}
