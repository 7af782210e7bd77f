//! Pure primitives over points and vectors. No allocation, no tolerances.

use super::{Pt2, Vec2};

/// Signed area of the parallelogram spanned by `u` and `v`.
/// Positive when `v` lies counter-clockwise of `u`.
#[inline]
pub fn cross_product(u: Vec2, v: Vec2) -> f64 {
    u.x * v.y - u.y * v.x
}

#[inline]
pub fn dot_product(u: Vec2, v: Vec2) -> f64 {
    u.x * v.x + u.y * v.y
}

/// Half-plane test: is `p` strictly left of the directed edge starting at `r`
/// with direction `u`?
///
/// Points exactly on the edge are outside.
#[inline]
pub fn inside(p: Pt2, r: Pt2, u: Vec2) -> bool {
    u.x * (p.y - r.y) > u.y * (p.x - r.x)
}

/// Where the line `a + t·v` crosses the line through `r` with normal `n`.
///
/// Solves `t = n·(r − a) / n·v`. Returns `None` iff `n·v == 0` (parallel,
/// including coincident lines). `t` is not clamped to `[0, 1]`; the caller only
/// asks when `a` and `a + v` straddle the line.
#[inline]
pub fn intersection(a: Pt2, v: Vec2, r: Pt2, n: Vec2) -> Option<Pt2> {
    let w = r - a;
    let nw = dot_product(n, w);
    let nv = dot_product(n, v);
    if nv != 0.0 {
        let t = nw / nv;
        Some(Pt2::new(a.x + t * v.x, a.y + t * v.y))
    } else {
        None
    }
}
