//! Strain and rotation from a velocity gradient tensor
//!
//! Conventions used throughout:
//! - `e1 >= e2`; `e1` is the most extensional principal rate, `e2` the most
//!   compressive.
//! - Eigenvectors are (east, north) unit vectors; `v1 = (cos θ, sin θ)` and
//!   `v2 = (-sin θ, cos θ)` with `θ = ½·atan2(2·exy, exx - eyy)`.
//! - Rotation is positive counter-clockwise.
//! - Azimuth is the bearing of `v2` (principal shortening), clockwise from
//!   north, folded into [0°, 180°).

use geostrain_core::strain::{
    DerivedScalars, PrincipalStrains, RotationRate, StrainRate, TensorDecomposition,
    VelocityGradient,
};

/// Symmetric part of the gradient
#[inline]
pub fn strain_rate(g: &VelocityGradient) -> StrainRate {
    StrainRate {
        exx: g.dve_de,
        exy: 0.5 * (g.dve_dn + g.dvn_de),
        eyy: g.dvn_dn,
    }
}

/// Antisymmetric part of the gradient
#[inline]
pub fn rotation_rate(g: &VelocityGradient) -> RotationRate {
    RotationRate(0.5 * (g.dvn_de - g.dve_dn))
}

/// Closed-form eigen decomposition of the symmetric 2x2 strain rate tensor
pub fn principal_strains(s: &StrainRate) -> PrincipalStrains {
    let mean = 0.5 * (s.exx + s.eyy);
    let half_diff = 0.5 * (s.exx - s.eyy);
    let radius = half_diff.hypot(s.exy);

    // Isotropic tensors have no preferred axis; use east/north
    let theta = if radius == 0.0 {
        0.0
    } else {
        0.5 * (2.0 * s.exy).atan2(s.exx - s.eyy)
    };
    let (sin, cos) = theta.sin_cos();

    PrincipalStrains {
        e1: mean + radius,
        e2: mean - radius,
        v1: [cos, sin],
        v2: [-sin, cos],
    }
}

/// Bearing of an (east, north) axis in degrees from north, in [0, 180)
pub fn axis_azimuth(v: [f64; 2]) -> f64 {
    let az = v[0].atan2(v[1]).to_degrees().rem_euclid(180.0);
    // rem_euclid can round up to exactly 180 for tiny negative angles
    if az >= 180.0 {
        0.0
    } else {
        az
    }
}

/// Second invariant, maximum shear, dilatation and shortening azimuth
pub fn derived_scalars(p: &PrincipalStrains) -> DerivedScalars {
    DerivedScalars {
        second_invariant: (p.e1 * p.e1 + p.e2 * p.e2).sqrt(),
        max_shear: 0.5 * (p.e1 - p.e2),
        dilatation: p.e1 + p.e2,
        azimuth: axis_azimuth(p.v2),
    }
}

/// Full decomposition of one velocity gradient tensor
pub fn decompose(g: &VelocityGradient) -> TensorDecomposition {
    let strain = strain_rate(g);
    let principal = principal_strains(&strain);
    TensorDecomposition {
        strain,
        rotation: rotation_rate(g),
        principal,
        scalars: derived_scalars(&principal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn gradient(dve_de: f64, dve_dn: f64, dvn_de: f64, dvn_dn: f64) -> VelocityGradient {
        VelocityGradient {
            dve_de,
            dve_dn,
            dvn_de,
            dvn_dn,
            ..Default::default()
        }
    }

    /// A spread of symmetric tensors, including isotropic and pure shear
    fn tensors() -> Vec<StrainRate> {
        let mut out = vec![
            StrainRate { exx: 0.0, exy: 0.0, eyy: 0.0 },
            StrainRate { exx: 2.0, exy: 0.0, eyy: 2.0 },
            StrainRate { exx: 0.0, exy: 1.0, eyy: 0.0 },
            StrainRate { exx: -3.0, exy: 0.0, eyy: 1.0 },
            StrainRate { exx: 1e-9, exy: -4e-9, eyy: 2e-9 },
        ];
        for i in 0..20 {
            let t = i as f64;
            out.push(StrainRate {
                exx: (t * 0.7).sin() * 50.0,
                exy: (t * 1.3).cos() * 30.0,
                eyy: (t * 0.4 + 1.0).sin() * 40.0,
            });
        }
        out
    }

    #[test]
    fn test_symmetric_and_antisymmetric_parts() {
        let d = decompose(&gradient(1.0, 2.0, 4.0, -3.0));
        assert_relative_eq!(d.strain.exx, 1.0);
        assert_relative_eq!(d.strain.eyy, -3.0);
        assert_relative_eq!(d.strain.exy, 3.0);
        assert_relative_eq!(d.rotation.value(), 1.0);
    }

    #[test]
    fn test_eigenvectors_orthonormal() {
        for s in tensors() {
            let p = principal_strains(&s);
            assert_relative_eq!(p.v1[0].hypot(p.v1[1]), 1.0, epsilon = 1e-12);
            assert_relative_eq!(p.v2[0].hypot(p.v2[1]), 1.0, epsilon = 1e-12);
            assert_relative_eq!(p.v1[0] * p.v2[0] + p.v1[1] * p.v2[1], 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_eigenpairs_satisfy_tensor() {
        for s in tensors() {
            let p = principal_strains(&s);
            let scale = s.exx.abs().max(s.eyy.abs()).max(s.exy.abs()).max(1e-300);
            for (e, v) in p.pairs() {
                let tx = s.exx * v[0] + s.exy * v[1];
                let ty = s.exy * v[0] + s.eyy * v[1];
                assert_relative_eq!(tx / scale, e * v[0] / scale, epsilon = 1e-10);
                assert_relative_eq!(ty / scale, e * v[1] / scale, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_invariant_identities() {
        for s in tensors() {
            let p = principal_strains(&s);
            let d = derived_scalars(&p);
            let scale = s.exx.abs().max(s.eyy.abs()).max(s.exy.abs()).max(1e-300);
            assert!(p.e1 >= p.e2);
            assert_relative_eq!(d.dilatation / scale, s.trace() / scale, epsilon = 1e-12);
            assert_relative_eq!(d.max_shear, 0.5 * (p.e1 - p.e2));
            assert!(d.max_shear >= 0.0);
            assert_relative_eq!(d.second_invariant, p.e1.hypot(p.e2), epsilon = 1e-12 * scale);
            assert!((0.0..180.0).contains(&d.azimuth));
        }
    }

    #[test]
    fn test_uniform_extension_east() {
        let k = 0.05;
        let d = decompose(&gradient(k, 0.0, 0.0, 0.0));
        assert_relative_eq!(d.principal.e1, k);
        assert_relative_eq!(d.principal.e2, 0.0);
        assert_relative_eq!(d.scalars.dilatation, k);
        assert_relative_eq!(d.scalars.max_shear, k / 2.0);
        // Extension east, so the (zero) shortening axis points north
        assert_relative_eq!(d.scalars.azimuth, 0.0);
    }

    #[test]
    fn test_north_south_shortening_azimuth() {
        let d = decompose(&gradient(0.0, 0.0, 0.0, -2.0));
        assert_relative_eq!(d.principal.e2, -2.0);
        assert_relative_eq!(d.principal.e1, 0.0);
        assert_relative_eq!(d.scalars.azimuth, 0.0, epsilon = 1e-12);

        let d = decompose(&gradient(-2.0, 0.0, 0.0, 0.0));
        assert_relative_eq!(d.scalars.azimuth, 90.0, epsilon = 1e-12);
    }

    #[test]
    fn test_oblique_shortening_azimuth() {
        // Shortening along the NE-SW diagonal: T = -1 * n nᵀ with n = (1, 1)/√2
        let d = decompose(&gradient(-0.5, -0.5, -0.5, -0.5));
        assert_relative_eq!(d.principal.e2, -1.0, epsilon = 1e-12);
        assert_relative_eq!(d.scalars.azimuth, 45.0, epsilon = 1e-9);

        // NW-SE shortening
        let d = decompose(&gradient(-0.5, 0.5, 0.5, -0.5));
        assert_relative_eq!(d.scalars.azimuth, 135.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pure_rotation_has_no_strain() {
        let w = 0.3;
        let d = decompose(&gradient(0.0, -w, w, 0.0));
        assert_relative_eq!(d.strain.exx, 0.0);
        assert_relative_eq!(d.strain.exy, 0.0);
        assert_relative_eq!(d.strain.eyy, 0.0);
        assert_relative_eq!(d.rotation.value(), w);
        assert_relative_eq!(d.scalars.second_invariant, 0.0);
    }

    #[test]
    fn test_axis_azimuth_folding() {
        assert_relative_eq!(axis_azimuth([0.0, 1.0]), 0.0);
        assert_relative_eq!(axis_azimuth([0.0, -1.0]), 0.0);
        assert_relative_eq!(axis_azimuth([-1.0, 0.0]), 90.0);
        assert_relative_eq!(axis_azimuth([-1.0, 1.0]), 135.0, epsilon = 1e-12);
    }
}
