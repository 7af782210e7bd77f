//! Batch driver: one intersection area per (subject, clipper) pair.
//!
//! Layout
//! - `subjects` and `clippers` are flat row-major `f64` buffers; pair `i`
//!   starts at `i * stride` in both and holds `vertices` points of `dims`
//!   coordinates each.
//! - `Stride::Triangle` reproduces the historical layout: 6 doubles per polygon
//!   whatever `vertices` says. Only triangles are laid out correctly this way;
//!   other vertex counts read overlapping windows. `Stride::VertexCount`
//!   derives the stride from the layout instead.
//!
//! Contract
//! - Buffer shapes are checked before anything is written. After that every
//!   output slot is written exactly once, in pair order; degenerate pairs get `0.0`.
//! - Pairs are independent. `BatchCfg::parallel` spreads them over rayon
//!   workers with one `ClipScratch` each; results are identical to the serial path.

use std::fmt;

use rayon::prelude::*;

use crate::clip::{ClipScratch, ClipStats};
use crate::geom2::{check_convex_ccw, Pt2};

/// Doubles per polygon in the historical triangle-only layout.
pub const TRIANGLE_STRIDE: usize = 6;

/// Shape of a batch job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchLayout {
    pub pairs: usize,
    /// Points per polygon (subject and clipper alike).
    pub vertices: usize,
    /// Coordinates per point; only 2 is supported.
    pub dims: usize,
}

impl BatchLayout {
    #[inline]
    pub fn triangles(pairs: usize) -> Self {
        Self {
            pairs,
            vertices: 3,
            dims: 2,
        }
    }

    /// Offset between consecutive pairs in each coordinate buffer.
    /// `None` if it does not fit in `usize`.
    #[inline]
    pub fn stride(&self, stride: Stride) -> Option<usize> {
        match stride {
            Stride::Triangle => Some(TRIANGLE_STRIDE),
            Stride::VertexCount => self.vertices.checked_mul(self.dims),
        }
    }

    /// Minimum length of each coordinate buffer, `None` on overflow.
    pub fn required_len(&self, stride: Stride) -> Option<usize> {
        match self.pairs {
            0 => Some(0),
            n => (n - 1)
                .checked_mul(self.stride(stride)?)?
                .checked_add(self.vertices.checked_mul(self.dims)?),
        }
    }
}

/// How pair offsets are derived.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Stride {
    /// Fixed 6 doubles per polygon (3 points × 2 coords), ignoring `vertices`.
    #[default]
    Triangle,
    /// `vertices * dims` doubles per polygon.
    VertexCount,
}

/// Batch configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct BatchCfg {
    pub stride: Stride,
    /// Distribute pairs across the rayon thread pool.
    pub parallel: bool,
    /// Run `check_convex_ccw` on every clipper and count failures in the report.
    /// Areas are computed the same way either way.
    pub validate_clippers: bool,
}

/// Buffer-shape errors. Geometric degeneracies are never errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    UnsupportedDims { dims: usize },
    OutputLength { pairs: usize, got: usize },
    BufferTooShort {
        which: &'static str,
        needed: usize,
        got: usize,
    },
    /// Buffer offsets implied by the layout do not fit in `usize`.
    LayoutOverflow { pairs: usize, vertices: usize },
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchError::UnsupportedDims { dims } => {
                write!(f, "only 2D points are supported (got dims = {dims})")
            }
            BatchError::OutputLength { pairs, got } => {
                write!(f, "output buffer holds {got} areas for {pairs} pairs")
            }
            BatchError::BufferTooShort { which, needed, got } => write!(
                f,
                "{which} buffer too short: need {needed} values, got {got}"
            ),
            BatchError::LayoutOverflow { pairs, vertices } => write!(
                f,
                "layout of {pairs} pairs with {vertices} vertices overflows usize"
            ),
        }
    }
}

impl std::error::Error for BatchError {}

/// Diagnostics summed over a batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub pairs: usize,
    /// Pairs whose clip collapsed below 3 vertices (area 0).
    pub collapsed: usize,
    pub skipped_clipper_edges: u64,
    pub skipped_subject_edges: u64,
    pub parallel_fallbacks: u64,
    /// Clippers failing `check_convex_ccw` (only counted when validation is on).
    pub invalid_clippers: usize,
}

impl BatchReport {
    fn record(&mut self, stats: ClipStats, clipper_ok: bool) {
        self.pairs += 1;
        self.collapsed += usize::from(stats.collapsed);
        self.skipped_clipper_edges += u64::from(stats.skipped_clipper_edges);
        self.skipped_subject_edges += u64::from(stats.skipped_subject_edges);
        self.parallel_fallbacks += u64::from(stats.parallel_fallbacks);
        self.invalid_clippers += usize::from(!clipper_ok);
    }

    fn merge(self, other: Self) -> Self {
        Self {
            pairs: self.pairs + other.pairs,
            collapsed: self.collapsed + other.collapsed,
            skipped_clipper_edges: self.skipped_clipper_edges + other.skipped_clipper_edges,
            skipped_subject_edges: self.skipped_subject_edges + other.skipped_subject_edges,
            parallel_fallbacks: self.parallel_fallbacks + other.parallel_fallbacks,
            invalid_clippers: self.invalid_clippers + other.invalid_clippers,
        }
    }
}

/// Per-worker state: scratch buffers plus the two extracted polygons.
struct PairWorker<'a> {
    layout: BatchLayout,
    stride: usize,
    validate: bool,
    subjects: &'a [f64],
    clippers: &'a [f64],
    scratch: ClipScratch,
    subject: Vec<Pt2>,
    clipper: Vec<Pt2>,
}

impl<'a> PairWorker<'a> {
    /// `stride` comes from `validate`, which also bounds `vertices * dims` by
    /// the buffer lengths, so the pre-sizing below cannot overflow.
    fn new(
        layout: BatchLayout,
        stride: usize,
        cfg: &BatchCfg,
        subjects: &'a [f64],
        clippers: &'a [f64],
    ) -> Self {
        let cap = layout.vertices.min(subjects.len() / layout.dims);
        Self {
            layout,
            stride,
            validate: cfg.validate_clippers,
            subjects,
            clippers,
            scratch: ClipScratch::with_capacity(2 * cap),
            subject: Vec::with_capacity(cap),
            clipper: Vec::with_capacity(cap),
        }
    }

    fn area(&mut self, pair: usize, report: &mut BatchReport) -> f64 {
        let start = pair * self.stride;
        extract(self.subjects, start, self.layout, &mut self.subject);
        extract(self.clippers, start, self.layout, &mut self.clipper);
        let clipper_ok = !self.validate || check_convex_ccw(&self.clipper).is_ok();
        let area = self.scratch.intersection_area(&self.subject, &self.clipper);
        report.record(self.scratch.stats(), clipper_ok);
        area
    }
}

fn extract(buf: &[f64], start: usize, layout: BatchLayout, out: &mut Vec<Pt2>) {
    out.clear();
    out.extend(
        buf[start..start + layout.vertices * layout.dims]
            .chunks_exact(layout.dims)
            .map(|xy| Pt2::new(xy[0], xy[1])),
    );
}

fn validate(
    layout: BatchLayout,
    cfg: &BatchCfg,
    subjects: &[f64],
    clippers: &[f64],
    areas: &[f64],
) -> Result<usize, BatchError> {
    if layout.dims != 2 {
        return Err(BatchError::UnsupportedDims { dims: layout.dims });
    }
    if areas.len() != layout.pairs {
        return Err(BatchError::OutputLength {
            pairs: layout.pairs,
            got: areas.len(),
        });
    }
    let overflow = || BatchError::LayoutOverflow {
        pairs: layout.pairs,
        vertices: layout.vertices,
    };
    let stride = layout.stride(cfg.stride).ok_or_else(overflow)?;
    let needed = layout.required_len(cfg.stride).ok_or_else(overflow)?;
    for (which, buf) in [("subject", subjects), ("clipper", clippers)] {
        if buf.len() < needed {
            return Err(BatchError::BufferTooShort {
                which,
                needed,
                got: buf.len(),
            });
        }
    }
    Ok(stride)
}

/// Intersection area of every pair, written to `areas[i]`.
///
/// Pre: clippers are convex and counter-clockwise (see `validate_clippers`).
/// Post: on `Ok`, every slot of `areas` holds an area ≥ 0.
pub fn compute_areas(
    layout: BatchLayout,
    subjects: &[f64],
    clippers: &[f64],
    areas: &mut [f64],
    cfg: &BatchCfg,
) -> Result<BatchReport, BatchError> {
    let stride = validate(layout, cfg, subjects, clippers, areas)?;
    if layout.pairs == 0 {
        return Ok(BatchReport::default());
    }

    let report = if cfg.parallel {
        areas
            .par_iter_mut()
            .enumerate()
            .map_init(
                || PairWorker::new(layout, stride, cfg, subjects, clippers),
                |worker, (i, slot)| {
                    let mut report = BatchReport::default();
                    *slot = worker.area(i, &mut report);
                    report
                },
            )
            .reduce(BatchReport::default, BatchReport::merge)
    } else {
        let mut worker = PairWorker::new(layout, stride, cfg, subjects, clippers);
        let mut report = BatchReport::default();
        for (i, slot) in areas.iter_mut().enumerate() {
            *slot = worker.area(i, &mut report);
        }
        report
    };

    tracing::debug!(
        pairs = report.pairs,
        collapsed = report.collapsed,
        parallel_fallbacks = report.parallel_fallbacks,
        invalid_clippers = report.invalid_clippers,
        "compute_areas"
    );
    Ok(report)
}

/// Allocating variant of `compute_areas` with the default configuration.
pub fn area_of_intersection(
    layout: BatchLayout,
    subjects: &[f64],
    clippers: &[f64],
) -> Result<Vec<f64>, BatchError> {
    let mut areas = vec![0.0; layout.pairs];
    compute_areas(layout, subjects, clippers, &mut areas, &BatchCfg::default())?;
    Ok(areas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::clip_polygons;
    use crate::geom2::rand::{draw_pair_batch, RadialCfg};
    use nalgebra::point;

    fn flat(points: &[Pt2]) -> Vec<f64> {
        points.iter().flat_map(|p| [p.x, p.y]).collect()
    }

    fn points(buf: &[f64]) -> Vec<Pt2> {
        buf.chunks_exact(2).map(|xy| point![xy[0], xy[1]]).collect()
    }

    #[test]
    fn triangle_pairs_match_single_pair_calls() {
        let tri = vec![point![0.0, 0.0], point![4.0, 0.0], point![0.0, 4.0]];
        let far = vec![point![9.0, 9.0], point![10.0, 9.0], point![9.0, 10.0]];
        let half = vec![point![0.0, 0.0], point![2.0, 0.0], point![0.0, 2.0]];
        let pairs = [(&tri, &tri), (&tri, &far), (&half, &tri), (&tri, &half)];
        let subjects: Vec<f64> = pairs.iter().flat_map(|(s, _)| flat(s)).collect();
        let clippers: Vec<f64> = pairs.iter().flat_map(|(_, c)| flat(c)).collect();

        let areas = area_of_intersection(BatchLayout::triangles(4), &subjects, &clippers).unwrap();
        for (slot, (s, c)) in areas.iter().zip(pairs.iter()) {
            assert_eq!(*slot, clip_polygons(s, c));
        }
        assert!((areas[0] - 8.0).abs() < 1e-12);
        assert_eq!(areas[1], 0.0);
        assert!((areas[2] - 2.0).abs() < 1e-12);
        assert!((areas[3] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn report_counts_collapses() {
        let tri = [point![0.0, 0.0], point![4.0, 0.0], point![0.0, 4.0]];
        let far = [point![9.0, 9.0], point![10.0, 9.0], point![9.0, 10.0]];
        let subjects = [flat(&tri), flat(&tri)].concat();
        let clippers = [flat(&tri), flat(&far)].concat();
        let mut areas = [f64::NAN; 2];
        let report = compute_areas(
            BatchLayout::triangles(2),
            &subjects,
            &clippers,
            &mut areas,
            &BatchCfg::default(),
        )
        .unwrap();
        assert_eq!(report.pairs, 2);
        assert_eq!(report.collapsed, 1);
        assert!(areas.iter().all(|a| !a.is_nan()));
    }

    #[test]
    fn parallel_matches_serial() {
        let batch = draw_pair_batch(RadialCfg::default(), 5, 500, 3).unwrap();
        let mut serial = vec![0.0; 500];
        let mut parallel = vec![0.0; 500];
        let cfg = BatchCfg::default();
        let r1 = compute_areas(batch.layout, &batch.subjects, &batch.clippers, &mut serial, &cfg)
            .unwrap();
        let par_cfg = BatchCfg {
            parallel: true,
            ..cfg
        };
        let r2 = compute_areas(
            batch.layout,
            &batch.subjects,
            &batch.clippers,
            &mut parallel,
            &par_cfg,
        )
        .unwrap();
        assert_eq!(serial, parallel);
        assert_eq!(r1, r2);
        assert!(serial.iter().any(|&a| a > 0.0));
    }

    #[test]
    fn vertex_count_stride_handles_quads() {
        let sq = vec![
            point![0.0, 0.0],
            point![1.0, 0.0],
            point![1.0, 1.0],
            point![0.0, 1.0],
        ];
        let shifted = vec![
            point![0.5, 0.5],
            point![1.5, 0.5],
            point![1.5, 1.5],
            point![0.5, 1.5],
        ];
        let subjects = [flat(&sq), flat(&sq)].concat();
        let clippers = [flat(&shifted), flat(&sq)].concat();
        let layout = BatchLayout {
            pairs: 2,
            vertices: 4,
            dims: 2,
        };
        let cfg = BatchCfg {
            stride: Stride::VertexCount,
            ..BatchCfg::default()
        };
        let mut areas = vec![0.0; 2];
        compute_areas(layout, &subjects, &clippers, &mut areas, &cfg).unwrap();
        assert!((areas[0] - 0.25).abs() < 1e-12);
        assert!((areas[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn triangle_stride_ignores_vertex_count() {
        // Two quads packed back to back; the triangle stride starts pair 1 at
        // offset 6, i.e. at the last point of the first quad.
        let subjects: Vec<f64> = (0..16).map(|k| k as f64).collect();
        let clippers = subjects.clone();
        let layout = BatchLayout {
            pairs: 2,
            vertices: 4,
            dims: 2,
        };
        assert_eq!(layout.required_len(Stride::Triangle), Some(14));
        assert_eq!(layout.required_len(Stride::VertexCount), Some(16));

        let mut areas = vec![f64::NAN; 2];
        compute_areas(layout, &subjects, &clippers, &mut areas, &BatchCfg::default()).unwrap();
        let second = points(&subjects[6..14]);
        assert_eq!(areas[1], clip_polygons(&second, &second));
    }

    #[test]
    fn shape_errors_leave_output_untouched() {
        let buf = vec![0.0; 12];
        let mut areas = vec![f64::NAN; 2];
        let cfg = BatchCfg::default();

        let bad_dims = BatchLayout {
            pairs: 2,
            vertices: 3,
            dims: 3,
        };
        assert_eq!(
            compute_areas(bad_dims, &buf, &buf, &mut areas, &cfg),
            Err(BatchError::UnsupportedDims { dims: 3 })
        );

        let mut short_out = vec![0.0; 1];
        assert_eq!(
            compute_areas(BatchLayout::triangles(2), &buf, &buf, &mut short_out, &cfg),
            Err(BatchError::OutputLength { pairs: 2, got: 1 })
        );

        assert_eq!(
            compute_areas(BatchLayout::triangles(2), &buf[..11], &buf, &mut areas, &cfg),
            Err(BatchError::BufferTooShort {
                which: "subject",
                needed: 12,
                got: 11
            })
        );
        assert_eq!(
            compute_areas(BatchLayout::triangles(2), &buf, &buf[..5], &mut areas, &cfg),
            Err(BatchError::BufferTooShort {
                which: "clipper",
                needed: 12,
                got: 5
            })
        );
        assert!(areas.iter().all(|a| a.is_nan()));
    }

    #[test]
    fn oversized_layouts_are_rejected() {
        let cfg = BatchCfg {
            stride: Stride::VertexCount,
            ..BatchCfg::default()
        };

        // No pairs means nothing to read, whatever the vertex count.
        let empty = BatchLayout {
            pairs: 0,
            vertices: usize::MAX / 2,
            dims: 2,
        };
        assert_eq!(
            compute_areas(empty, &[], &[], &mut [], &cfg),
            Ok(BatchReport::default())
        );
        assert_eq!(
            compute_areas(empty, &[], &[], &mut [], &BatchCfg { parallel: true, ..cfg }),
            Ok(BatchReport::default())
        );

        let huge = BatchLayout {
            pairs: 1,
            vertices: 1 << 63,
            dims: 2,
        };
        let mut areas = [f64::NAN; 1];
        let overflow = Err(BatchError::LayoutOverflow {
            pairs: 1,
            vertices: 1 << 63,
        });
        assert_eq!(compute_areas(huge, &[], &[], &mut areas, &cfg), overflow);
        assert_eq!(
            compute_areas(huge, &[], &[], &mut areas, &BatchCfg::default()),
            overflow
        );
        assert!(areas[0].is_nan());
        assert_eq!(huge.stride(Stride::VertexCount), None);
        assert_eq!(huge.stride(Stride::Triangle), Some(TRIANGLE_STRIDE));

        // Fits in usize but no buffer can be that long.
        let long = BatchLayout {
            pairs: 1,
            vertices: usize::MAX / 4,
            dims: 2,
        };
        assert_eq!(
            compute_areas(long, &[0.0; 6], &[0.0; 6], &mut areas, &cfg),
            Err(BatchError::BufferTooShort {
                which: "subject",
                needed: (usize::MAX / 4) * 2,
                got: 6
            })
        );
        assert!(areas[0].is_nan());
    }

    #[test]
    fn empty_batch_is_ok() {
        let areas = area_of_intersection(BatchLayout::triangles(0), &[], &[]).unwrap();
        assert!(areas.is_empty());
    }

    #[test]
    fn validation_counts_without_changing_areas() {
        let tri = [point![0.0, 0.0], point![4.0, 0.0], point![0.0, 4.0]];
        let cw = [point![0.0, 0.0], point![0.0, 4.0], point![4.0, 0.0]];
        let subjects = [flat(&tri), flat(&tri)].concat();
        let clippers = [flat(&tri), flat(&cw)].concat();
        let layout = BatchLayout::triangles(2);

        let mut plain = vec![0.0; 2];
        compute_areas(layout, &subjects, &clippers, &mut plain, &BatchCfg::default()).unwrap();
        let mut checked = vec![0.0; 2];
        let cfg = BatchCfg {
            validate_clippers: true,
            ..BatchCfg::default()
        };
        let report = compute_areas(layout, &subjects, &clippers, &mut checked, &cfg).unwrap();
        assert_eq!(plain, checked);
        assert_eq!(report.invalid_clippers, 1);
        assert_eq!(checked[1], 0.0);
    }
}
