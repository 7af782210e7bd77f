//! Random convex polygons in 2D (radial jitter + replay tokens).
//!
//! Purpose
//! - Deterministic inputs for property tests, benches and the CLI `sample`
//!   command. Every polygon is convex and counter-clockwise, so it is a valid
//!   clipper as well as a subject.
//!
//! Model
//! - Start from `n` equally spaced angles on [0, 2π), add bounded angular and
//!   radial jitter, take the convex hull, then translate by a random offset.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.
//!
//! Code cross-refs: `util::convex_hull`, `batch::BatchLayout`

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::util::{convex_hull, signed_area};
use super::Pt2;
use crate::batch::BatchLayout;
use crate::cfg::{MAX_SAMPLE_ATTEMPTS, MIN_SAMPLE_AREA};

/// Vertex count distribution.
#[derive(Clone, Copy, Debug)]
pub enum VertexCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}
impl VertexCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            VertexCount::Fixed(n) => n.max(3),
            VertexCount::Uniform { min, max } => {
                let lo = min.max(3);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

/// Radial-jitter sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct RadialCfg {
    pub vertex_count: VertexCount,
    /// Angular jitter as a fraction of the base spacing Δ=2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Radial jitter (relative amplitude). Radii = `base_radius * (1 + u)`, with `u∈[-radial_jitter, radial_jitter]`.
    pub radial_jitter: f64,
    pub base_radius: f64,
    /// Random global phase in [0, 2π)?
    pub random_phase: bool,
    /// Center is drawn uniformly from `[-center_spread, center_spread]²`.
    pub center_spread: f64,
}
impl Default for RadialCfg {
    fn default() -> Self {
        Self {
            vertex_count: VertexCount::Fixed(3),
            angle_jitter_frac: 0.3,
            radial_jitter: 0.25,
            base_radius: 1.0,
            random_phase: true,
            center_spread: 1.0,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}
impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw a random convex polygon (CCW vertex list) via radial jitter + convex hull.
///
/// The hull may drop jittered points, so the result can have fewer vertices
/// than sampled. `None` if the hull degenerates.
pub fn draw_polygon_radial(cfg: RadialCfg, tok: ReplayToken) -> Option<Vec<Pt2>> {
    let mut rng = tok.to_std_rng();
    let n = cfg.vertex_count.sample(&mut rng);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.max(0.0);
    let r0 = cfg.base_radius.max(1e-9);
    let spread = cfg.center_spread.max(0.0);
    let delta = 2.0 * std::f64::consts::PI / (n as f64);
    let phase = if cfg.random_phase {
        rng.gen::<f64>() * 2.0 * std::f64::consts::PI
    } else {
        0.0
    };
    let cx = (rng.gen::<f64>() * 2.0 - 1.0) * spread;
    let cy = (rng.gen::<f64>() * 2.0 - 1.0) * spread;
    let pts: Vec<Pt2> = (0..n)
        .map(|k| {
            let th = phase + (k as f64) * delta + (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            let u = (rng.gen::<f64>() * 2.0 - 1.0) * rj;
            let r = (1.0 + u).max(1e-6) * r0;
            Pt2::new(cx + th.cos() * r, cy + th.sin() * r)
        })
        .collect();
    let hull = convex_hull(&pts)?;
    if signed_area(&hull) < MIN_SAMPLE_AREA {
        return None;
    }
    Some(hull)
}

/// Flat coordinate buffers for `pairs` random (subject, clipper) pairs.
///
/// Polygons are packed back to back with `vertices * 2` doubles each, i.e. the
/// `Stride::VertexCount` layout (identical to `Stride::Triangle` for triangles).
#[derive(Clone, Debug)]
pub struct PairBatch {
    pub layout: BatchLayout,
    pub subjects: Vec<f64>,
    pub clippers: Vec<f64>,
}

/// Draw a batch of pairs whose polygons all have exactly `vertices` vertices.
///
/// `cfg.vertex_count` is ignored. Draws that lose a hull vertex are redrawn
/// with a fresh token; `None` if the redraw budget runs out for some polygon.
pub fn draw_pair_batch(cfg: RadialCfg, seed: u64, pairs: usize, vertices: usize) -> Option<PairBatch> {
    let vertices = vertices.max(3);
    let cfg = RadialCfg {
        vertex_count: VertexCount::Fixed(vertices),
        ..cfg
    };
    let mut subjects = Vec::with_capacity(pairs * vertices * 2);
    let mut clippers = Vec::with_capacity(pairs * vertices * 2);
    for i in 0..pairs as u64 {
        for (side, out) in [(0u64, &mut subjects), (1u64, &mut clippers)] {
            let poly = (0..MAX_SAMPLE_ATTEMPTS)
                .filter_map(|attempt| {
                    let tok = ReplayToken {
                        seed,
                        index: (attempt << 32) | (2 * i + side),
                    };
                    draw_polygon_radial(cfg, tok)
                })
                .find(|p| p.len() == vertices)?;
            out.extend(poly.iter().flat_map(|p| [p.x, p.y]));
        }
    }
    Some(PairBatch {
        layout: BatchLayout {
            pairs,
            vertices,
            dims: 2,
        },
        subjects,
        clippers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom2::check_convex_ccw;

    #[test]
    fn reproducible_draw() {
        let cfg = RadialCfg {
            vertex_count: VertexCount::Fixed(10),
            angle_jitter_frac: 0.2,
            radial_jitter: 0.1,
            ..RadialCfg::default()
        };
        let tok = ReplayToken { seed: 42, index: 7 };
        let p1 = draw_polygon_radial(cfg, tok).expect("poly");
        let p2 = draw_polygon_radial(cfg, tok).expect("poly");
        assert_eq!(p1, p2);
    }

    #[test]
    fn draws_are_valid_clippers() {
        let cfg = RadialCfg {
            vertex_count: VertexCount::Uniform { min: 3, max: 12 },
            ..RadialCfg::default()
        };
        for index in 0..200 {
            if let Some(p) = draw_polygon_radial(cfg, ReplayToken { seed: 3, index }) {
                assert!(check_convex_ccw(&p).is_ok(), "draw {index} not convex/CCW");
            }
        }
    }

    #[test]
    fn pair_batch_shapes() {
        let batch = draw_pair_batch(RadialCfg::default(), 11, 25, 3).expect("batch");
        assert_eq!(batch.layout.pairs, 25);
        assert_eq!(batch.subjects.len(), 25 * 6);
        assert_eq!(batch.clippers.len(), 25 * 6);
        let again = draw_pair_batch(RadialCfg::default(), 11, 25, 3).expect("batch");
        assert_eq!(batch.subjects, again.subjects);
        assert_eq!(batch.clippers, again.clippers);
    }
}
