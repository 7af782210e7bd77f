//! Tolerance defaults (internal).
//!
//! Policy
//! - The clipping engine itself compares exactly (`>` / `== 0.0`); these
//!   constants only serve the opt-in validation and sampling helpers.

/// Relative slack for the turn test in `check_convex_ccw` (scaled by edge lengths).
pub(crate) const CONVEX_EPS: f64 = 1e-12;
/// Polygons with |signed area| below this are rejected by the sampler.
pub(crate) const MIN_SAMPLE_AREA: f64 = 1e-9;
/// Redraw budget per pair when the sampler hits a degenerate polygon.
pub(crate) const MAX_SAMPLE_ATTEMPTS: u64 = 64;
