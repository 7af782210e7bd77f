//! Sutherland–Hodgman clipping of a subject polygon against a convex clipper.
//!
//! Purpose
//! - Compute the intersection polygon (and its area) of one subject/clipper
//!   pair, one clipper edge at a time, in a pair of reusable buffers.
//!
//! Degenerate-input policy
//! - Zero-length clipper edges impose no constraint and are skipped.
//! - A zero-length subject edge (`b == a` exactly) emits nothing and leaves the
//!   previous vertex untouched. This suppresses exact duplicates only; nearly
//!   coincident points go through the normal path.
//! - When an exiting edge is parallel to the clipper edge in floating point,
//!   the far vertex is kept and treated as inside.
//! - Fewer than 3 vertices after any edge: the pair has no intersection and
//!   the remaining clipper edges are not processed.
//!
//! Precondition (not checked here): the clipper is convex and counter-clockwise.
//! `geom2::check_convex_ccw` validates it on demand.
//!
//! Code cross-refs: `geom2::{inside, intersection}`, `area::polygon_area`,
//! `batch::compute_areas`

mod area;

pub use area::polygon_area;

use crate::geom2::{inside, intersection, Pt2, Vec2};

/// Diagnostics of one clip call. Never affects the computed area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClipStats {
    /// Clipper edges of zero length.
    pub skipped_clipper_edges: u32,
    /// Subject (working polygon) edges of zero length, summed over all passes.
    pub skipped_subject_edges: u32,
    /// Exiting edges with no resolvable crossing; the far vertex was kept.
    pub parallel_fallbacks: u32,
    /// The working polygon dropped below 3 vertices (area reported as 0).
    pub collapsed: bool,
}

/// Working buffers for the clipping engine.
///
/// One instance per worker; reuse it across pairs to avoid reallocating.
/// Buffers are pre-sized for `capacity` vertices and grow if a pass needs more.
#[derive(Clone, Debug, Default)]
pub struct ClipScratch {
    output: Vec<Pt2>,
    subject: Vec<Pt2>,
    stats: ClipStats,
}

impl ClipScratch {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            output: Vec::with_capacity(capacity),
            subject: Vec::with_capacity(capacity),
            stats: ClipStats::default(),
        }
    }

    /// Diagnostics of the most recent `clip`/`intersection_area` call.
    #[inline]
    pub fn stats(&self) -> ClipStats {
        self.stats
    }

    /// Clip `subject` by every edge of `clipper`.
    ///
    /// Returns the clipped vertex sequence, or `None` if it collapsed below 3
    /// vertices. Subjects or clippers with fewer than 3 vertices collapse.
    pub fn clip(&mut self, subject: &[Pt2], clipper: &[Pt2]) -> Option<&[Pt2]> {
        self.stats = ClipStats::default();
        self.output.clear();
        if subject.len() < 3 || clipper.len() < 3 {
            self.stats.collapsed = true;
            return None;
        }
        self.output.extend_from_slice(subject);

        let mut r = clipper[clipper.len() - 1];
        for &s in clipper {
            let u = s - r;
            if u.x == 0.0 && u.y == 0.0 {
                self.stats.skipped_clipper_edges += 1;
                continue;
            }
            self.clip_edge(r, u);
            if self.output.len() < 3 {
                self.stats.collapsed = true;
                return None;
            }
            r = s;
        }
        Some(self.output.as_slice())
    }

    /// Area of `subject ∩ clipper`, `0.0` if the clip collapses.
    pub fn intersection_area(&mut self, subject: &[Pt2], clipper: &[Pt2]) -> f64 {
        match self.clip(subject, clipper) {
            Some(poly) => polygon_area(poly),
            None => 0.0,
        }
    }

    /// One Sutherland–Hodgman pass: keep the part of the working polygon left
    /// of the directed edge starting at `r` with direction `u`.
    fn clip_edge(&mut self, r: Pt2, u: Vec2) {
        let n = Vec2::new(-u.y, u.x);
        std::mem::swap(&mut self.subject, &mut self.output);
        self.output.clear();

        let Some(&last) = self.subject.last() else {
            return;
        };
        let mut a = last;
        let mut a_inside = inside(a, r, u);
        for &b in &self.subject {
            let v = b - a;
            if v.x == 0.0 && v.y == 0.0 {
                // `a` stays put; it equals `b` anyway.
                self.stats.skipped_subject_edges += 1;
                continue;
            }

            let mut b_inside = inside(b, r, u);
            if b_inside {
                if !a_inside {
                    // entering
                    if let Some(p) = intersection(a, v, r, n) {
                        self.output.push(p);
                    }
                }
                self.output.push(b);
            } else if a_inside {
                // exiting
                if let Some(p) = intersection(a, v, r, n) {
                    self.output.push(p);
                } else {
                    b_inside = true;
                    self.stats.parallel_fallbacks += 1;
                    self.output.push(b);
                }
            }
            a = b;
            a_inside = b_inside;
        }
    }
}

/// Intersection area of one pair with a freshly allocated scratch of
/// `2 * subject.len()` vertices.
pub fn clip_polygons(subject: &[Pt2], clipper: &[Pt2]) -> f64 {
    ClipScratch::with_capacity(2 * subject.len()).intersection_area(subject, clipper)
}
