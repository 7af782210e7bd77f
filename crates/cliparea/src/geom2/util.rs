use std::fmt;

use super::prims::{cross_product, dot_product};
use super::{Pt2, Vec2};
use crate::cfg::CONVEX_EPS;

/// Why a clipper failed `check_convex_ccw`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipperError {
    /// Fewer than 3 distinct consecutive vertices.
    TooFewVertices { n: usize },
    /// Vertices run clockwise (or enclose no area).
    NotCounterClockwise,
    /// Reflex turn at `vertex`, or the boundary winds more than once.
    NotConvex { vertex: usize },
}

impl fmt::Display for ClipperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipperError::TooFewVertices { n } => {
                write!(f, "clipper has {n} distinct vertices (needs ≥3)")
            }
            ClipperError::NotCounterClockwise => {
                write!(f, "clipper vertices are not in counter-clockwise order")
            }
            ClipperError::NotConvex { vertex } => {
                write!(f, "clipper is not convex at vertex {vertex}")
            }
        }
    }
}

impl std::error::Error for ClipperError {}

/// Shoelace signed area; positive for counter-clockwise order.
pub fn signed_area(points: &[Pt2]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..points.len() {
        let p = points[i];
        let q = points[(i + 1) % points.len()];
        twice += p.x * q.y - q.x * p.y;
    }
    0.5 * twice
}

/// Reverse `points` in place if they run clockwise.
pub fn ensure_ccw(points: &mut [Pt2]) {
    if signed_area(points) < 0.0 {
        points.reverse();
    }
}

/// Andrew’s monotone chain convex hull (returns hull in CCW order).
///
/// Collinear points are dropped. `None` if fewer than 3 hull vertices remain.
pub fn convex_hull(points: &[Pt2]) -> Option<Vec<Pt2>> {
    if points.len() < 3 {
        return None;
    }
    let mut pts: Vec<Pt2> = points.to_vec();
    pts.sort_by(|a, b| {
        match a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal) {
            std::cmp::Ordering::Equal => a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal),
            o => o,
        }
    });
    pts.dedup_by(|a, b| (*a - *b).norm() < 1e-12);
    if pts.len() < 3 {
        return None;
    }
    let turn = |a: Pt2, b: Pt2, c: Pt2| cross_product(b - a, c - a);
    let mut lower: Vec<Pt2> = Vec::with_capacity(pts.len());
    for p in &pts {
        while lower.len() >= 2 && turn(lower[lower.len() - 2], lower[lower.len() - 1], *p) <= 0.0 {
            lower.pop();
        }
        lower.push(*p);
    }
    let mut upper: Vec<Pt2> = Vec::with_capacity(pts.len());
    for p in pts.iter().rev() {
        while upper.len() >= 2 && turn(upper[upper.len() - 2], upper[upper.len() - 1], *p) <= 0.0 {
            upper.pop();
        }
        upper.push(*p);
    }
    lower.pop();
    upper.pop();
    let mut hull = lower;
    hull.extend(upper);
    if hull.len() < 3 {
        return None;
    }
    Some(hull)
}

/// Opt-in precondition check for clippers: convex, counter-clockwise, winding once.
///
/// Zero-length edges (repeated vertices) are ignored, matching how the engine
/// skips them. Collinear consecutive edges are accepted.
pub fn check_convex_ccw(points: &[Pt2]) -> Result<(), ClipperError> {
    // (start vertex index, edge vector) for every non-degenerate edge
    let mut edges: Vec<(usize, Vec2)> = Vec::with_capacity(points.len());
    for i in 0..points.len() {
        let e = points[(i + 1) % points.len()] - points[i];
        if e.x != 0.0 || e.y != 0.0 {
            edges.push((i, e));
        }
    }
    if edges.len() < 3 {
        return Err(ClipperError::TooFewVertices { n: edges.len() });
    }
    if signed_area(points) <= 0.0 {
        return Err(ClipperError::NotCounterClockwise);
    }
    let mut winding = 0.0;
    for k in 0..edges.len() {
        let (_, e0) = edges[k];
        let (vertex, e1) = edges[(k + 1) % edges.len()];
        let c = cross_product(e0, e1);
        if c < -CONVEX_EPS * e0.norm() * e1.norm() {
            return Err(ClipperError::NotConvex { vertex });
        }
        winding += c.atan2(dot_product(e0, e1));
    }
    // Left turns only, so the total is 2π·(number of windings).
    if winding > 3.0 * std::f64::consts::PI {
        return Err(ClipperError::NotConvex { vertex: 0 });
    }
    Ok(())
}
