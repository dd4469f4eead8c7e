//! Strain rate estimators
//!
//! - delaunay: flat-earth estimate on the Delaunay triangulation of the stations
//! - registry: name to method lookup used by the command line

mod delaunay;
mod registry;

pub use delaunay::{delaunay_strain, DelaunayStrain, DELAUNAY_FLAT};
pub use registry::MethodRegistry;
