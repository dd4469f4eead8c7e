//! # GeoStrain Algorithms
//!
//! Strain rate estimation from GNSS station velocities.
//!
//! ## Components
//!
//! - **triangulation**: index-preserving Delaunay triangulation of stations
//! - **tensor**: per-triangle velocity gradient solve and tensor decomposition
//! - **strain**: the Delaunay flat-earth estimator and the method registry

pub mod maybe_rayon;
pub mod strain;
pub mod tensor;
pub mod triangulation;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::strain::{delaunay_strain, DelaunayStrain, MethodRegistry, DELAUNAY_FLAT};
    pub use crate::tensor::{decompose, solve_triangle, solve_velocity_gradient};
    pub use crate::triangulation::{triangulate, Triangle};
    pub use geostrain_core::prelude::*;
}
