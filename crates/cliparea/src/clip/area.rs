use crate::geom2::{cross_product, Pt2};

/// Area by fan triangulation from vertex 0.
///
/// Sums `|cross(p[i-1] − p[0], p[i] − p[0])|` and halves it. Exact for
/// polygons star-shaped from vertex 0 (every convex clip result); `0.0` for
/// fewer than 3 vertices.
pub fn polygon_area(polygon: &[Pt2]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let apex = polygon[0];
    let mut u = polygon[1] - apex;
    let mut twice = 0.0;
    for &c in &polygon[2..] {
        let v = apex - c;
        twice += cross_product(u, v).abs();
        u = v;
    }
    0.5 * twice
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::point;

    #[test]
    fn unit_square() {
        let sq = [
            point![0.0, 0.0],
            point![1.0, 0.0],
            point![1.0, 1.0],
            point![0.0, 1.0],
        ];
        assert_eq!(polygon_area(&sq), 1.0);
    }

    #[test]
    fn orientation_does_not_matter() {
        let ccw = [point![0.0, 0.0], point![4.0, 0.0], point![0.0, 4.0]];
        let cw = [point![0.0, 0.0], point![0.0, 4.0], point![4.0, 0.0]];
        assert_eq!(polygon_area(&ccw), 8.0);
        assert_eq!(polygon_area(&cw), 8.0);
    }

    #[test]
    fn fewer_than_three_points() {
        assert_eq!(polygon_area(&[]), 0.0);
        assert_eq!(polygon_area(&[point![1.0, 2.0], point![3.0, 4.0]]), 0.0);
    }
}
