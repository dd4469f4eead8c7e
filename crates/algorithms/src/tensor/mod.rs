//! Velocity gradient tensors
//!
//! - gradient: per-triangle 6x6 linear solve for translation and gradient
//! - decompose: strain rate, rotation, principal axes and invariants

mod decompose;
mod gradient;

pub use decompose::{
    axis_azimuth, decompose, derived_scalars, principal_strains, rotation_rate, strain_rate,
};
pub use gradient::{
    design_matrix, invert, local_offset_km, solve_triangle, solve_velocity_gradient,
    KM_PER_DEGREE,
};
