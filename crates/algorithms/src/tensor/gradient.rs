//! Velocity gradient of a single triangle
//!
//! First-order Taylor expansion of the velocity field about the triangle
//! centroid. For each vertex i with planar offset (dEᵢ, dNᵢ) from the
//! centroid:
//!
//! ```text
//! VEᵢ = VE_c + dVE/dE · dEᵢ + dVE/dN · dNᵢ
//! VNᵢ = VN_c + dVN/dE · dEᵢ + dVN/dN · dNᵢ
//! ```
//!
//! Three vertices give six equations in six unknowns, solved by inverting
//! the design matrix.
//!
//! Reference:
//! Cai, J. & Grafarend, E.W. (2007). Statistical analysis of geodetic
//! deformation (strain rate) derived from the space geodetic measurements of
//! BIFROST Project in Fennoscandia. Journal of Geodynamics 43, 214-238.

use geostrain_core::strain::VelocityGradient;
use geostrain_core::{Error, Result, StationVelocity, VelocityField};
use ndarray::{Array1, Array2};

use crate::triangulation::Triangle;

/// Kilometres per degree of latitude in the flat-earth approximation
pub const KM_PER_DEGREE: f64 = 111.0;

/// Pivot magnitude, relative to the largest matrix entry, treated as zero
const SINGULAR_RTOL: f64 = 1e-12;

/// Planar (east, north) offset in km of `point` from `origin`, both (lon, lat).
///
/// Longitude degrees are shortened by the cosine of the origin latitude.
/// Adequate for triangles up to a few tens of km across.
#[inline]
pub fn local_offset_km(point: (f64, f64), origin: (f64, f64)) -> (f64, f64) {
    let east = (point.0 - origin.0) * KM_PER_DEGREE * origin.1.to_radians().cos();
    let north = (point.1 - origin.1) * KM_PER_DEGREE;
    (east, north)
}

/// 6x6 design matrix; unknowns ordered (VE_c, VN_c, dVE/dE, dVE/dN, dVN/dE, dVN/dN)
pub fn design_matrix(offsets: &[(f64, f64); 3]) -> Array2<f64> {
    let mut g = Array2::<f64>::zeros((6, 6));
    for (i, &(de, dn)) in offsets.iter().enumerate() {
        let r = 2 * i;
        g[[r, 0]] = 1.0;
        g[[r, 2]] = de;
        g[[r, 3]] = dn;
        g[[r + 1, 1]] = 1.0;
        g[[r + 1, 4]] = de;
        g[[r + 1, 5]] = dn;
    }
    g
}

/// Invert a square matrix by Gauss-Jordan elimination with partial pivoting.
///
/// Returns `None` when a pivot falls below `SINGULAR_RTOL` times the largest
/// absolute entry.
pub fn invert(matrix: &Array2<f64>) -> Option<Array2<f64>> {
    let n = matrix.nrows();
    if n != matrix.ncols() {
        return None;
    }

    let scale = matrix.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return None;
    }
    let tol = SINGULAR_RTOL * scale;

    let mut a = matrix.clone();
    let mut inv = Array2::<f64>::eye(n);

    for col in 0..n {
        // Find pivot (max absolute value in column)
        let (pivot_row, pivot_abs) = (col..n)
            .map(|r| (r, a[[r, col]].abs()))
            .fold((col, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });

        if pivot_abs <= tol {
            return None;
        }

        if pivot_row != col {
            for j in 0..n {
                a.swap([col, j], [pivot_row, j]);
                inv.swap([col, j], [pivot_row, j]);
            }
        }

        let pivot = a[[col, col]];
        for j in 0..n {
            a[[col, j]] /= pivot;
            inv[[col, j]] /= pivot;
        }

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = a[[row, col]];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                a[[row, j]] -= factor * a[[col, j]];
                inv[[row, j]] -= factor * inv[[col, j]];
            }
        }
    }

    Some(inv)
}

/// Solve for the velocity gradient at `centroid` from three vertex stations.
///
/// Returns `None` if the design matrix is singular (collinear or coincident
/// vertices).
pub fn solve_velocity_gradient(
    stations: [&StationVelocity; 3],
    centroid: (f64, f64),
) -> Option<VelocityGradient> {
    let offsets = stations.map(|s| local_offset_km(s.position(), centroid));
    let g_inv = invert(&design_matrix(&offsets))?;

    let obs = Array1::from(vec![
        stations[0].ve,
        stations[0].vn,
        stations[1].ve,
        stations[1].vn,
        stations[2].ve,
        stations[2].vn,
    ]);
    let m = g_inv.dot(&obs);

    Some(VelocityGradient {
        ve_centroid: m[0],
        vn_centroid: m[1],
        dve_de: m[2],
        dve_dn: m[3],
        dvn_de: m[4],
        dvn_dn: m[5],
    })
}

/// Velocity gradient of triangle `index` of a triangulation over `field`.
///
/// # Errors
/// - `VertexLookup` if a vertex index does not address `field`
/// - `SingularSystem` if the design matrix cannot be inverted
pub fn solve_triangle(
    field: &VelocityField,
    index: usize,
    triangle: &Triangle,
) -> Result<VelocityGradient> {
    let lookup = |v: usize| {
        field.get(v).ok_or(Error::VertexLookup {
            triangle: index,
            index: v,
            stations: field.len(),
        })
    };
    let [a, b, c] = triangle.vertices;
    let stations = [lookup(a)?, lookup(b)?, lookup(c)?];

    solve_velocity_gradient(stations, triangle.centroid).ok_or(Error::SingularSystem {
        triangle: index,
        vertices: triangle.vertices,
    })
}
