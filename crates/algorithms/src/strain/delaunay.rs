//! Delaunay flat-earth strain rate estimation
//!
//! Triangulates the stations, fits an affine velocity field inside every
//! triangle and decomposes its gradient. Triangles are independent, so the
//! per-triangle work runs in parallel when the `parallel` feature is on.

use geostrain_core::strain::{StrainField, TriangleStrain};
use geostrain_core::{
    Error, Result, SingularPolicy, StrainConfig, StrainMethod, VelocityField,
};
use tracing::{debug, info, warn};

use crate::maybe_rayon::*;
use crate::tensor::{decompose, solve_triangle};
use crate::triangulation::{triangulate, Triangle};

/// Registry key of the method
pub const DELAUNAY_FLAT: &str = "delaunay_flat";

/// Delaunay triangulation strain with a local flat-earth approximation
#[derive(Debug, Clone, Copy, Default)]
pub struct DelaunayStrain;

impl StrainMethod for DelaunayStrain {
    fn name(&self) -> &'static str {
        DELAUNAY_FLAT
    }

    fn description(&self) -> &'static str {
        "Uniform strain per Delaunay triangle, flat-earth offsets about each centroid"
    }

    fn compute(&self, field: &VelocityField, config: &StrainConfig) -> Result<StrainField> {
        delaunay_strain(field, config)
    }
}

/// Strain rate of every Delaunay triangle of the station network.
///
/// Triangles keep the triangulation order. Under
/// [`SingularPolicy::Abort`] the first singular triangle in that order is
/// reported; under [`SingularPolicy::Skip`] singular triangles are dropped
/// and counted in [`StrainField::skipped`].
///
/// # Errors
/// - `DegenerateInput` if the stations cannot be triangulated
/// - `SingularSystem` for a singular triangle under the abort policy
/// - `VertexLookup` if a triangle refers outside `field`
pub fn delaunay_strain(field: &VelocityField, config: &StrainConfig) -> Result<StrainField> {
    let positions = field.positions();
    let triangles = triangulate(&positions)?;
    info!(
        "Triangulated {} stations into {} triangles",
        field.len(),
        triangles.len()
    );

    let results: Vec<Result<TriangleStrain>> = triangles
        .par_iter()
        .enumerate()
        .map(|(index, triangle)| triangle_strain(field, &positions, index, triangle))
        .collect();

    let (strains, skipped) = apply_singular_policy(results, config.singular_policy)?;

    if skipped > 0 {
        info!("Skipped {} singular triangles", skipped);
    }
    debug!("Computed strain for {} triangles", strains.len());

    Ok(StrainField::new(DELAUNAY_FLAT, strains, skipped))
}

/// Keep successful triangles in order; singular ones abort or are counted
fn apply_singular_policy(
    results: Vec<Result<TriangleStrain>>,
    policy: SingularPolicy,
) -> Result<(Vec<TriangleStrain>, usize)> {
    let mut strains = Vec::with_capacity(results.len());
    let mut skipped = 0usize;
    for result in results {
        match result {
            Ok(strain) => strains.push(strain),
            Err(Error::SingularSystem { triangle, vertices }) if policy == SingularPolicy::Skip => {
                warn!(
                    "Skipping triangle {} with singular design matrix (stations {:?})",
                    triangle, vertices
                );
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }
    Ok((strains, skipped))
}

fn triangle_strain(
    field: &VelocityField,
    positions: &[(f64, f64)],
    index: usize,
    triangle: &Triangle,
) -> Result<TriangleStrain> {
    let gradient = solve_triangle(field, index, triangle)?;
    let d = decompose(&gradient);
    Ok(TriangleStrain {
        vertices: triangle.vertices,
        positions: triangle.positions(positions),
        centroid: triangle.centroid,
        gradient,
        strain: d.strain,
        rotation: d.rotation,
        principal: d.principal,
        scalars: d.scalars,
    })
}
