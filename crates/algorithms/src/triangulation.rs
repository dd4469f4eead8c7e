//! Delaunay triangulation of station positions
//!
//! Incremental Bowyer-Watson insertion with exact `orient2d` / `incircle`
//! predicates. The outside of the convex hull is covered by ghost triangles
//! sharing a single vertex at infinity, so there is no finite super-triangle
//! to distort hull triangles. Output triangles refer to stations by their
//! index in the input slice, so no coordinate matching is ever needed to get
//! back to the velocity records.

use std::collections::{HashMap, HashSet};

use geostrain_core::{Error, Result};
use robust::{incircle, orient2d, Coord};
use tracing::debug;

/// Relative threshold below which all stations count as collinear
const COLLINEAR_RTOL: f64 = 1e-12;

/// The vertex at infinity shared by all ghost triangles
const GHOST: usize = usize::MAX;

/// A Delaunay triangle over the input positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Indices into the input positions, counter-clockwise
    pub vertices: [usize; 3],
    /// Arithmetic mean of the three vertices (lon, lat)
    pub centroid: (f64, f64),
}

impl Triangle {
    fn new(vertices: [usize; 3], points: &[(f64, f64)]) -> Self {
        let [a, b, c] = vertices.map(|i| points[i]);
        Self {
            vertices,
            centroid: ((a.0 + b.0 + c.0) / 3.0, (a.1 + b.1 + c.1) / 3.0),
        }
    }

    /// Vertex positions in triangle order
    pub fn positions(&self, points: &[(f64, f64)]) -> [(f64, f64); 3] {
        self.vertices.map(|i| points[i])
    }
}

#[inline]
fn coord(p: (f64, f64)) -> Coord<f64> {
    Coord { x: p.0, y: p.1 }
}

/// Exact sign of twice the signed area; positive when a, b, c turn counter-clockwise
#[inline]
fn orient(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    orient2d(coord(a), coord(b), coord(c))
}

/// `p` lies on the open segment `ab`, given that the three are collinear
fn strictly_between(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> bool {
    if a.0 != b.0 {
        (a.0 < p.0 && p.0 < b.0) || (b.0 < p.0 && p.0 < a.0)
    } else {
        (a.1 < p.1 && p.1 < b.1) || (b.1 < p.1 && p.1 < a.1)
    }
}

/// Whether inserting `p` destroys the triangle `v` (CCW, possibly a ghost).
///
/// A real triangle conflicts when `p` is strictly inside its circumcircle. A
/// ghost triangle `(a, b, ∞)` conflicts when `p` is strictly left of `a → b`
/// or on the open hull edge `ab`.
fn in_conflict(v: [usize; 3], p: (f64, f64), points: &[(f64, f64)]) -> bool {
    match v.iter().position(|&i| i == GHOST) {
        None => incircle(
            coord(points[v[0]]),
            coord(points[v[1]]),
            coord(points[v[2]]),
            coord(p),
        ) > 0.0,
        Some(k) => {
            let a = points[v[(k + 1) % 3]];
            let b = points[v[(k + 2) % 3]];
            let o = orient(a, b, p);
            o > 0.0 || (o == 0.0 && strictly_between(a, b, p))
        }
    }
}

/// Indices of the first occurrence of every distinct position
fn distinct_indices(points: &[(f64, f64)]) -> Vec<usize> {
    let mut seen = HashSet::with_capacity(points.len());
    let mut keep = Vec::with_capacity(points.len());
    for (i, &(x, y)) in points.iter().enumerate() {
        // + 0.0 folds -0.0 into 0.0
        if seen.insert(((x + 0.0).to_bits(), (y + 0.0).to_bits())) {
            keep.push(i);
        } else {
            debug!("Ignoring duplicate station position #{} ({}, {})", i, x, y);
        }
    }
    keep
}

fn all_collinear(points: &[(f64, f64)], source: &[usize]) -> bool {
    let a = points[source[0]];
    let dist_sq = |p: (f64, f64)| (p.0 - a.0).powi(2) + (p.1 - a.1).powi(2);
    let far = source
        .iter()
        .map(|&i| points[i])
        .max_by(|p, q| dist_sq(*p).total_cmp(&dist_sq(*q)))
        .unwrap_or(a);
    let scale = dist_sq(far);
    source
        .iter()
        .all(|&i| orient(a, far, points[i]).abs() <= COLLINEAR_RTOL * scale)
}

/// Build the Delaunay triangulation of `points` (lon, lat).
///
/// Exact duplicate positions are triangulated once (first occurrence wins).
/// Every other station is a vertex of the result, the triangles tile the
/// convex hull, and no station lies strictly inside any circumcircle.
///
/// # Errors
/// `DegenerateInput` when there are fewer than 3 distinct finite positions or
/// when all positions lie on one line.
pub fn triangulate(points: &[(f64, f64)]) -> Result<Vec<Triangle>> {
    if let Some(i) = points.iter().position(|p| !p.0.is_finite() || !p.1.is_finite()) {
        return Err(Error::DegenerateInput(format!(
            "station #{} has a non-finite position",
            i
        )));
    }

    let source = distinct_indices(points);
    if source.len() < 3 {
        return Err(Error::DegenerateInput(format!(
            "triangulation needs at least 3 distinct stations, got {}",
            source.len()
        )));
    }

    let collinear = || {
        Error::DegenerateInput(format!(
            "all {} distinct stations are collinear",
            source.len()
        ))
    };
    if all_collinear(points, &source) {
        return Err(collinear());
    }

    // Seed with the first two stations and the first one off their line
    let (mut a, mut b) = (source[0], source[1]);
    let c = source[2..]
        .iter()
        .copied()
        .find(|&i| orient(points[a], points[b], points[i]) != 0.0)
        .ok_or_else(collinear)?;
    if orient(points[a], points[b], points[c]) < 0.0 {
        std::mem::swap(&mut a, &mut b);
    }
    let mut cells: Vec<[usize; 3]> = vec![[a, b, c], [b, a, GHOST], [c, b, GHOST], [a, c, GHOST]];

    for &vi in source.iter().filter(|&&i| i != a && i != b && i != c) {
        let p = points[vi];

        let (bad, good): (Vec<[usize; 3]>, Vec<[usize; 3]>) = cells
            .into_iter()
            .partition(|&v| in_conflict(v, p, points));
        cells = good;

        // The cavity boundary is every edge used by exactly one bad triangle
        let mut edge_use: HashMap<(usize, usize), usize> = HashMap::new();
        for v in &bad {
            for k in 0..3 {
                let (u, w) = (v[k], v[(k + 1) % 3]);
                *edge_use.entry((u.min(w), u.max(w))).or_insert(0) += 1;
            }
        }

        for v in &bad {
            for k in 0..3 {
                let (u, w) = (v[k], v[(k + 1) % 3]);
                if edge_use[&(u.min(w), u.max(w))] == 1 {
                    cells.push([u, w, vi]);
                }
            }
        }
    }

    let triangles: Vec<Triangle> = cells
        .into_iter()
        .filter(|v| !v.contains(&GHOST))
        .filter_map(|[a, b, d]| {
            let area2 = orient(points[a], points[b], points[d]);
            if area2 > 0.0 {
                Some(Triangle::new([a, b, d], points))
            } else if area2 < 0.0 {
                Some(Triangle::new([a, d, b], points))
            } else {
                None
            }
        })
        .collect();

    if triangles.is_empty() {
        return Err(Error::DegenerateInput(
            "triangulation produced no triangles".into(),
        ));
    }

    debug!(
        "Triangulated {} stations into {} triangles",
        source.len(),
        triangles.len()
    );
    Ok(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn corner_points() -> Vec<(f64, f64)> {
        vec![(0.0, 10.0), (10.0, 10.0), (0.0, 0.0), (10.0, 0.0)]
    }

    fn signed_area(t: &Triangle, points: &[(f64, f64)]) -> f64 {
        let [a, b, c] = t.positions(points);
        0.5 * orient(a, b, c)
    }

    #[test]
    fn test_square_gives_two_triangles() {
        let points = corner_points();
        let tris = triangulate(&points).unwrap();
        assert_eq!(tris.len(), 2, "Expected 2 triangles, got {}", tris.len());

        let total: f64 = tris.iter().map(|t| signed_area(t, &points)).sum();
        assert_relative_eq!(total, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_single_triangle_centroid_and_orientation() {
        let points = vec![(0.0, 0.0), (0.0, 1.0), (1.0, 0.0)];
        let tris = triangulate(&points).unwrap();
        assert_eq!(tris.len(), 1);

        let t = tris[0];
        let mut sorted = t.vertices;
        sorted.sort_unstable();
        assert_eq!(sorted, [0, 1, 2]);
        assert!(signed_area(&t, &points) > 0.0);
        assert_relative_eq!(t.centroid.0, 1.0 / 3.0, epsilon = 1e-15);
        assert_relative_eq!(t.centroid.1, 1.0 / 3.0, epsilon = 1e-15);
    }

    #[test]
    fn test_too_few_points() {
        let err = triangulate(&[(0.0, 0.0), (1.0, 0.0)]).unwrap_err();
        assert!(matches!(err, Error::DegenerateInput(_)));
    }

    #[test]
    fn test_duplicates_do_not_count() {
        let points = vec![(0.0, 0.0), (1.0, 1.0), (0.0, 0.0), (-0.0, 0.0)];
        assert!(matches!(
            triangulate(&points),
            Err(Error::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_duplicate_is_skipped_not_triangulated() {
        let points = vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 0.0)];
        let tris = triangulate(&points).unwrap();
        assert_eq!(tris.len(), 1);
        assert!(!tris[0].vertices.contains(&3));
    }

    #[test]
    fn test_collinear_points() {
        let points: Vec<(f64, f64)> = (0..6).map(|i| (i as f64, 2.0 * i as f64 + 1.0)).collect();
        assert!(matches!(
            triangulate(&points),
            Err(Error::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_collinear_prefix_then_offset_station() {
        // The first stations share a line; the seed must look past them
        let points = vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (1.5, 1.0)];
        let tris = triangulate(&points).unwrap();
        assert_eq!(tris.len(), 3);
        assert_valid_delaunay(&points, &tris);
    }

    #[test]
    fn test_non_finite_position() {
        let points = vec![(0.0, 0.0), (1.0, 0.0), (f64::NAN, 1.0)];
        assert!(triangulate(&points).is_err());
    }

    /// Deterministic pseudo-random value in [0, 1)
    fn noise(t: f64, k: f64) -> f64 {
        ((t * k).sin() * 43758.5453).fract().abs()
    }

    /// Deterministic scatter in the unit square, in general position
    fn scattered_points(n: usize) -> Vec<(f64, f64)> {
        (0..n)
            .map(|i| {
                let t = i as f64 + 1.0;
                (noise(t, 12.9898), noise(t, 78.233))
            })
            .collect()
    }

    /// Stations along a 3 degree line sagging south in the middle, plus one
    /// station 1 degree south of the line
    fn bowed_line(sag: f64) -> Vec<(f64, f64)> {
        let mut points: Vec<(f64, f64)> = (0..30)
            .map(|i| {
                let x = 3.0 * i as f64 / 29.0;
                let u = (x - 1.5) / 1.5;
                (x, -sag * (1.0 - u * u))
            })
            .collect();
        points.push((1.5, -1.0));
        points
    }

    /// 40 stations in a 4 x 1e-4 degree strip
    fn thin_strip() -> Vec<(f64, f64)> {
        (0..40)
            .map(|i| {
                let t = i as f64 + 1.0;
                (4.0 * noise(t, 12.9898), 1e-4 * noise(t, 78.233))
            })
            .collect()
    }

    /// 50 stations in a 0.001 degree box with three stations 20-40 degrees away
    fn cluster_plus_far() -> Vec<(f64, f64)> {
        let mut points: Vec<(f64, f64)> = (0..50)
            .map(|i| {
                let t = i as f64 + 1.0;
                (-120.0 + 0.001 * noise(t, 12.9898), 35.0 + 0.001 * noise(t, 78.233))
            })
            .collect();
        points.extend([(-95.0, 40.0), (-150.0, 60.0), (-130.0, 0.0)]);
        points
    }

    /// Regular grid: every cell's four corners are co-circular
    fn grid(n: usize) -> Vec<(f64, f64)> {
        (0..n * n)
            .map(|i| ((i % n) as f64 * 0.5, (i / n) as f64 * 0.5))
            .collect()
    }

    /// Andrew's monotone chain, counter-clockwise, strict corners only
    fn convex_hull(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
        let mut pts = points.to_vec();
        pts.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
        let mut lower: Vec<(f64, f64)> = Vec::new();
        for &p in &pts {
            while lower.len() >= 2 && orient(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
                lower.pop();
            }
            lower.push(p);
        }
        let mut upper: Vec<(f64, f64)> = Vec::new();
        for &p in pts.iter().rev() {
            while upper.len() >= 2 && orient(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
                upper.pop();
            }
            upper.push(p);
        }
        lower.pop();
        upper.pop();
        lower.extend(upper);
        lower
    }

    fn on_hull_boundary(hull: &[(f64, f64)], p: (f64, f64)) -> bool {
        (0..hull.len()).any(|i| {
            let (a, b) = (hull[i], hull[(i + 1) % hull.len()]);
            p == a || (orient(a, b, p) == 0.0 && strictly_between(a, b, p))
        })
    }

    /// Triangle count, hull tiling and empty circumcircles
    fn assert_valid_delaunay(points: &[(f64, f64)], tris: &[Triangle]) {
        let hull = convex_hull(points);
        let boundary = points.iter().filter(|&&p| on_hull_boundary(&hull, p)).count();

        // Euler: 2n - b - 2 triangles for n stations with b on the hull boundary
        assert_eq!(tris.len(), 2 * points.len() - boundary - 2);
        assert!(tris.iter().all(|t| signed_area(t, points) > 0.0));

        let hull_area: f64 = (0..hull.len())
            .map(|i| {
                let (a, b) = (hull[i], hull[(i + 1) % hull.len()]);
                0.5 * (a.0 * b.1 - b.0 * a.1)
            })
            .sum();
        let total: f64 = tris.iter().map(|t| signed_area(t, points)).sum();
        assert_relative_eq!(total, hull_area, max_relative = 1e-9);

        for t in tris {
            let [a, b, c] = t.positions(points);
            for (i, &p) in points.iter().enumerate() {
                if t.vertices.contains(&i) {
                    continue;
                }
                assert!(
                    incircle(coord(a), coord(b), coord(c), coord(p)) <= 0.0,
                    "station {} lies inside the circumcircle of {:?}",
                    i,
                    t.vertices
                );
            }
        }
    }

    #[test]
    fn test_scatter_is_delaunay() {
        let points = scattered_points(60);
        let tris = triangulate(&points).unwrap();
        assert_valid_delaunay(&points, &tris);
    }

    #[test]
    fn test_bowed_line_does_not_overlap() {
        for sag in [3e-4, 1e-4, 1e-6] {
            let points = bowed_line(sag);
            let tris = triangulate(&points).unwrap();
            assert_eq!(tris.len(), 57, "sag {}", sag);
            assert_valid_delaunay(&points, &tris);
        }
    }

    #[test]
    fn test_thin_strip_covers_hull() {
        let points = thin_strip();
        let tris = triangulate(&points).unwrap();
        assert_valid_delaunay(&points, &tris);
    }

    #[test]
    fn test_dense_cluster_with_far_stations() {
        let points = cluster_plus_far();
        let tris = triangulate(&points).unwrap();
        assert_valid_delaunay(&points, &tris);
    }

    #[test]
    fn test_cocircular_grid() {
        let points = grid(12);
        let tris = triangulate(&points).unwrap();
        // 144 stations, 44 on the boundary
        assert_eq!(tris.len(), 242);
        assert_valid_delaunay(&points, &tris);
    }

    #[test]
    fn test_geographic_coordinates() {
        let points = vec![
            (-121.5, 36.0),
            (-121.0, 36.2),
            (-120.6, 35.8),
            (-121.2, 35.5),
            (-120.9, 35.9),
        ];
        let tris = triangulate(&points).unwrap();
        assert_valid_delaunay(&points, &tris);
    }
}
