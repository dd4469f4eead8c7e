//! # GeoStrain Core
//!
//! Core types, configuration and I/O for the GeoStrain strain rate library.
//!
//! This crate provides:
//! - `VelocityField`: ordered GNSS station velocities
//! - Strain result types (`StrainField`, `TriangleStrain`, tensors and invariants)
//! - `RunConfig`: JSON run configuration
//! - Velocity file readers and GMT/GeoJSON result writers
//! - The `StrainMethod` trait implemented by every estimator

pub mod config;
pub mod error;
pub mod io;
pub mod strain;
pub mod vector;
pub mod velocity;

pub use config::{RunConfig, SingularPolicy, StrainConfig};
pub use error::{Error, Result};
pub use strain::{StrainField, TriangleStrain};
pub use velocity::{Region, StationVelocity, VelocityField};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{RunConfig, SingularPolicy, StrainConfig};
    pub use crate::error::{Error, Result};
    pub use crate::strain::{
        DerivedScalars, PrincipalStrains, RotationRate, StrainField, StrainRate,
        TensorDecomposition, TriangleStrain, VelocityGradient,
    };
    pub use crate::velocity::{Region, StationVelocity, VelocityField};
    pub use crate::StrainMethod;
}

/// Common contract of all strain rate estimators.
///
/// Methods are stateless: `compute` is a pure function of the velocity field
/// and the strain settings.
pub trait StrainMethod: Send + Sync {
    /// Registry key of the method
    fn name(&self) -> &'static str;

    /// Returns a description of what the method does
    fn description(&self) -> &'static str;

    /// Estimate strain for the whole station network
    fn compute(&self, field: &VelocityField, config: &StrainConfig) -> Result<StrainField>;

    /// Estimate with default settings
    fn compute_default(&self, field: &VelocityField) -> Result<StrainField> {
        self.compute(field, &StrainConfig::default())
    }
}
