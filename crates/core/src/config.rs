//! Run configuration
//!
//! A run is described by a JSON document with `inputs` and `strain`
//! sections:
//!
//! ```json
//! {
//!   "method": "delaunay_flat",
//!   "output_dir": "output",
//!   "inputs": { "vel_file": "vels.txt", "format": "stationvel", "max_sigma": 100.0 },
//!   "strain": { "range_strain": "[-125/-121/32/35]", "singular_policy": "abort" }
//! }
//! ```

use crate::error::{Error, Result};
use crate::io::VelocityFormat;
use crate::velocity::Region;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_method() -> String {
    "delaunay_flat".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_max_sigma() -> f64 {
    100.0
}

/// Complete description of one strain run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Registry key of the strain method
    #[serde(default = "default_method")]
    pub method: String,
    /// Parent output directory; results land in `<output_dir>/<method>/`
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    pub inputs: InputConfig,
    #[serde(default)]
    pub strain: StrainConfig,
}

/// Where the station velocities come from and which stations to keep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    pub vel_file: PathBuf,
    #[serde(default)]
    pub format: VelocityFormat,
    /// File of station names to exclude, one per line
    #[serde(default)]
    pub blacklist: Option<PathBuf>,
    /// Stations with an east or north sigma above this are dropped
    #[serde(default = "default_max_sigma")]
    pub max_sigma: f64,
}

/// What to do when a triangle's design matrix is singular
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SingularPolicy {
    /// Fail the whole estimate on the first singular triangle
    #[default]
    Abort,
    /// Drop the triangle, log a warning and continue
    Skip,
}

/// Settings consumed by strain methods
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StrainConfig {
    /// Region of interest for the strain calculation
    #[serde(default)]
    pub range_strain: Option<Region>,
    /// Region from which stations are taken; defaults to `range_strain`
    #[serde(default)]
    pub range_data: Option<Region>,
    #[serde(default)]
    pub singular_policy: SingularPolicy,
    /// Also write the triangles as GeoJSON
    #[serde(default)]
    pub write_geojson: bool,
}

impl StrainConfig {
    /// Region used to select stations
    pub fn data_region(&self) -> Option<Region> {
        self.range_data.or(self.range_strain)
    }
}

impl RunConfig {
    /// Minimal configuration for a velocity file with all defaults
    pub fn for_file(vel_file: impl Into<PathBuf>) -> Self {
        Self {
            method: default_method(),
            output_dir: default_output_dir(),
            inputs: InputConfig {
                vel_file: vel_file.into(),
                format: VelocityFormat::default(),
                blacklist: None,
                max_sigma: default_max_sigma(),
            },
            strain: StrainConfig::default(),
        }
    }

    /// Load and validate a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Parse and validate a configuration document
    pub fn from_json(content: &str) -> Result<Self> {
        let config: RunConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.method.trim().is_empty() {
            return Err(Error::InvalidParameter {
                name: "method",
                value: self.method.clone(),
                reason: "must not be empty".into(),
            });
        }

        if self.inputs.vel_file.as_os_str().is_empty() {
            return Err(Error::InvalidParameter {
                name: "inputs.vel_file",
                value: String::new(),
                reason: "must name a velocity file".into(),
            });
        }

        if !(self.inputs.max_sigma > 0.0) {
            return Err(Error::InvalidParameter {
                name: "inputs.max_sigma",
                value: self.inputs.max_sigma.to_string(),
                reason: "must be positive".into(),
            });
        }

        if let Some(region) = &self.strain.range_strain {
            region.validate()?;
        }
        if let Some(region) = &self.strain.range_data {
            region.validate()?;
        }

        Ok(())
    }

    /// Directory this run writes into: `<output_dir>/<method>`
    pub fn method_output_dir(&self) -> PathBuf {
        self.output_dir.join(&self.method)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
