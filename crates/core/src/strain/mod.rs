//! Strain result types
//!
//! Gradients are expressed per kilometre of local planar distance, so with
//! velocities in mm/yr every tensor component is in 1e-6/yr (microstrain per
//! year).

/// Horizontal velocity gradient tensor at a triangle centroid.
///
/// The two translation terms fall out of the same linear solve as the four
/// partial derivatives.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VelocityGradient {
    /// East velocity at the centroid
    pub ve_centroid: f64,
    /// North velocity at the centroid
    pub vn_centroid: f64,
    /// ∂VE/∂E
    pub dve_de: f64,
    /// ∂VE/∂N
    pub dve_dn: f64,
    /// ∂VN/∂E
    pub dvn_de: f64,
    /// ∂VN/∂N
    pub dvn_dn: f64,
}

/// Symmetric part of the velocity gradient
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StrainRate {
    pub exx: f64,
    pub exy: f64,
    pub eyy: f64,
}

impl StrainRate {
    #[inline]
    pub fn trace(&self) -> f64 {
        self.exx + self.eyy
    }
}

/// Antisymmetric part of the velocity gradient, `0.5 * (dVN/dE - dVE/dN)`.
///
/// Positive values are counter-clockwise rotation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationRate(pub f64);

impl RotationRate {
    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Unsigned rotation rate, as written to output files
    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.0.abs()
    }
}

/// Eigen decomposition of the 2x2 strain rate tensor.
///
/// `e1 >= e2` always holds: `e1` is the most extensional principal rate and
/// `e2` the most compressive. Eigenvectors are unit length, mutually
/// orthogonal, and stored as (east, north) components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PrincipalStrains {
    pub e1: f64,
    pub e2: f64,
    /// Eigenvector of `e1`
    pub v1: [f64; 2],
    /// Eigenvector of `e2`
    pub v2: [f64; 2],
}

impl PrincipalStrains {
    /// East component of the `e1` eigenvector
    pub fn v00(&self) -> f64 {
        self.v1[0]
    }

    /// North component of the `e1` eigenvector
    pub fn v10(&self) -> f64 {
        self.v1[1]
    }

    /// East component of the `e2` eigenvector
    pub fn v01(&self) -> f64 {
        self.v2[0]
    }

    /// North component of the `e2` eigenvector
    pub fn v11(&self) -> f64 {
        self.v2[1]
    }

    /// Both eigenpairs, `e1` first
    pub fn pairs(&self) -> [(f64, [f64; 2]); 2] {
        [(self.e1, self.v1), (self.e2, self.v2)]
    }
}

/// Scalar invariants derived from the principal strain rates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DerivedScalars {
    /// `sqrt(e1² + e2²)`
    pub second_invariant: f64,
    /// `(e1 - e2) / 2`
    pub max_shear: f64,
    /// `e1 + e2`
    pub dilatation: f64,
    /// Bearing of the principal shortening axis, degrees clockwise from north in [0, 180)
    pub azimuth: f64,
}

/// Everything derived from one velocity gradient tensor
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TensorDecomposition {
    pub strain: StrainRate,
    pub rotation: RotationRate,
    pub principal: PrincipalStrains,
    pub scalars: DerivedScalars,
}

/// Strain estimate for a single triangle of the station network
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleStrain {
    /// Station indices into the source velocity field
    pub vertices: [usize; 3],
    /// (lon, lat) of each vertex, same order as `vertices`
    pub positions: [(f64, f64); 3],
    /// (lon, lat) of the centroid
    pub centroid: (f64, f64),
    pub gradient: VelocityGradient,
    pub strain: StrainRate,
    pub rotation: RotationRate,
    pub principal: PrincipalStrains,
    pub scalars: DerivedScalars,
}

/// Per-triangle strain estimates for a whole station network.
///
/// Triangles keep the order produced by the triangulation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StrainField {
    method: String,
    triangles: Vec<TriangleStrain>,
    skipped: usize,
}

/// Extremes reported after a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrainSummary {
    pub triangles: usize,
    pub skipped: usize,
    pub max_second_invariant: f64,
    pub max_rotation: f64,
    pub min_rotation: f64,
}

impl StrainField {
    pub fn new(method: impl Into<String>, triangles: Vec<TriangleStrain>, skipped: usize) -> Self {
        Self {
            method: method.into(),
            triangles,
            skipped,
        }
    }

    /// Name of the method that produced this field
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn triangles(&self) -> &[TriangleStrain] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Triangles dropped because their design matrix was singular
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn iter(&self) -> impl Iterator<Item = &TriangleStrain> {
        self.triangles.iter()
    }

    /// Max I2 and rotation-magnitude range, `None` when there are no triangles
    pub fn summary(&self) -> Option<StrainSummary> {
        if self.triangles.is_empty() {
            return None;
        }
        let mut max_i2 = f64::MIN;
        let mut max_rot = f64::MIN;
        let mut min_rot = f64::MAX;
        for t in &self.triangles {
            max_i2 = max_i2.max(t.scalars.second_invariant);
            max_rot = max_rot.max(t.rotation.magnitude());
            min_rot = min_rot.min(t.rotation.magnitude());
        }
        Some(StrainSummary {
            triangles: self.triangles.len(),
            skipped: self.skipped,
            max_second_invariant: max_i2,
            max_rotation: max_rot,
            min_rotation: min_rot,
        })
    }
}
