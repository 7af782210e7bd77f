//! 2D geometry for the clipping engine.
//!
//! Purpose
//! - Provide the four primitives the Sutherland–Hodgman pass is built from
//!   (`cross_product`, `dot_product`, `inside`, `intersection`), written out
//!   component-wise so results are reproducible bit for bit.
//! - Polygon helpers used around the engine: signed area, orientation
//!   fix-up, convex hull, and the opt-in clipper check `check_convex_ccw`.
//!
//! Conventions
//! - Points are `Pt2 = Point2<f64>`, displacements `Vec2 = Vector2<f64>`.
//! - Clippers are counter-clockwise: `inside` keeps the left half-plane of
//!   every directed clipper edge.
//!
//! Code cross-refs: `clip::ClipScratch`, `batch::compute_areas`

mod prims;
pub mod rand;
mod util;

pub use prims::{cross_product, dot_product, inside, intersection};
pub use util::{check_convex_ccw, convex_hull, ensure_ccw, signed_area, ClipperError};

/// Point in the plane.
pub type Pt2 = nalgebra::Point2<f64>;
/// Displacement between two points.
pub type Vec2 = nalgebra::Vector2<f64>;
