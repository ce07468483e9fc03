//! Monotone cubic interpolation in x.
//!
//! Tangents follow Steffen's method, so the interpolated curve never
//! overshoots the data between two neighbouring points: a run of increasing
//! samples produces a curve that is increasing too. Points must be sorted by x;
//! repeated x values yield flat tangents.

use super::scene::{Path, Point};

/// Append a monotone-x curve through `points` to `path`.
///
/// When `connect` is set the curve continues from the path's current point
/// with a straight segment, otherwise it starts a new subpath. One point
/// produces a lone move, two points a straight segment.
pub fn monotone_x(path: &mut Path, points: &[Point], connect: bool) {
    let Some(&first) = points.first() else {
        return;
    };
    if connect {
        path.line_to(first);
    } else {
        path.move_to(first);
    }
    if points.len() == 2 {
        path.line_to(points[1]);
        return;
    }
    if points.len() < 2 {
        return;
    }

    let tangents = tangents(points);
    for i in 0..points.len() - 1 {
        let (p0, p1) = (points[i], points[i + 1]);
        let dx = (p1.x - p0.x) / 3.0;
        path.cubic_to(
            Point::new(p0.x + dx, p0.y + dx * tangents[i]),
            Point::new(p1.x - dx, p1.y - dx * tangents[i + 1]),
            p1,
        );
    }
}

fn secant(a: Point, b: Point) -> f64 {
    let h = b.x - a.x;
    if h == 0.0 {
        0.0
    } else {
        (b.y - a.y) / h
    }
}

fn sign(v: f64) -> f64 {
    if v < 0.0 {
        -1.0
    } else {
        1.0
    }
}

fn tangents(points: &[Point]) -> Vec<f64> {
    let n = points.len();
    let mut t = vec![0.0; n];

    for i in 1..n - 1 {
        let h0 = points[i].x - points[i - 1].x;
        let h1 = points[i + 1].x - points[i].x;
        let s0 = secant(points[i - 1], points[i]);
        let s1 = secant(points[i], points[i + 1]);
        let p = if h0 + h1 == 0.0 {
            0.0
        } else {
            (s0 * h1 + s1 * h0) / (h0 + h1)
        };
        let m = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
        t[i] = if m.is_finite() { m } else { 0.0 };
    }

    t[0] = end_tangent(points[0], points[1], t[1]);
    t[n - 1] = end_tangent(points[n - 2], points[n - 1], t[n - 2]);
    t
}

/// One-sided tangent at an end point given the tangent of its neighbour
fn end_tangent(a: Point, b: Point, neighbour: f64) -> f64 {
    let h = b.x - a.x;
    if h == 0.0 {
        neighbour
    } else {
        (3.0 * (b.y - a.y) / h - neighbour) / 2.0
    }
}
