//! Curated convenience surface (UNSTABLE).
//!
//! - Tuple-based entry points for callers that do not want to depend on
//!   `nalgebra` types (Python bindings, quick scripts).
//! - Prefer `batch::compute_areas` for bulk work.

pub use crate::batch::{area_of_intersection, compute_areas, BatchCfg, BatchLayout, Stride};
pub use crate::clip::{clip_polygons, polygon_area, ClipScratch};
pub use crate::geom2::{check_convex_ccw, cross_product, dot_product, inside, intersection};

use crate::geom2::Pt2;

/// Intersection area of two polygons given as `(x, y)` tuples.
///
/// Pre: `clipper` is convex and counter-clockwise.
/// Post: returns `0.0` when the intersection collapses below 3 vertices.
pub fn pair_area(subject: &[(f64, f64)], clipper: &[(f64, f64)]) -> f64 {
    let subject: Vec<Pt2> = subject.iter().map(|&(x, y)| Pt2::new(x, y)).collect();
    let clipper: Vec<Pt2> = clipper.iter().map(|&(x, y)| Pt2::new(x, y)).collect();
    clip_polygons(&subject, &clipper)
}
