//! Error types for GeoStrain

use thiserror::Error;

/// Main error type for GeoStrain operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Singular design matrix for triangle {triangle} (stations {vertices:?}); vertices are collinear or coincident")]
    SingularSystem { triangle: usize, vertices: [usize; 3] },

    #[error("Triangle {triangle} references station {index}, but the velocity field has {stations} stations")]
    VertexLookup {
        triangle: usize,
        index: usize,
        stations: usize,
    },

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Unknown strain method '{name}' (available: {available})")]
    UnknownMethod { name: String, available: String },
}

/// Result type alias for GeoStrain operations
pub type Result<T> = std::result::Result<T, Error>;
