//! Intersection areas of polygon pairs (Sutherland–Hodgman clipping).
//!
//! Layers, leaves first:
//! - `geom2`: primitives (cross/dot, half-plane test, line intersection),
//!   polygon utilities, and a reproducible sampler for convex polygons.
//! - `clip`: clips a subject polygon against every edge of a convex clipper and
//!   measures the result by fan triangulation.
//! - `batch`: drives the engine over flat coordinate buffers, one area per pair.
//!
//! API Policy
//! - Numeric contract first: geometric degeneracies give `0.0`, never an error.
//!   Only buffer-shape problems in `batch` are reported as `Err`.
//! - Diagnostics (`ClipStats`, `BatchReport`) are side channels and never change
//!   the areas.

pub mod api;
pub mod batch;
mod cfg;
pub mod clip;
pub mod geom2;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use geom2::{cross_product, dot_product, Pt2, Vec2};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::batch::{
        area_of_intersection, compute_areas, BatchCfg, BatchError, BatchLayout, BatchReport,
        Stride,
    };
    pub use crate::clip::{clip_polygons, polygon_area, ClipScratch, ClipStats};
    pub use crate::geom2::rand::{draw_pair_batch, draw_polygon_radial, RadialCfg, ReplayToken};
    pub use crate::geom2::{check_convex_ccw, ClipperError, Pt2, Vec2};
}
