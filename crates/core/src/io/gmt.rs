//! GMT-readable text outputs for per-triangle strain
//!
//! Scalar quantities are written as multisegment polygon files, one segment
//! per triangle:
//!
//! ```text
//! > -Z<value>
//! lon0 lat0
//! lon1 lat1
//! lon2 lat2
//! ```
//!
//! Principal strain axes are written as `psvelo`-style arrow pairs at each
//! centroid, split by the sign of the eigenvalue.

use crate::error::Result;
use crate::strain::{StrainField, TriangleStrain};
use crate::velocity::VelocityField;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Arrow length for an eigenvalue is `EIGEN_ARROW_SCALE * e`
const EIGEN_ARROW_SCALE: f64 = 0.4;
/// Arrows longer than this are shortened to it
const EIGEN_ARROW_MAX: f64 = 40.0;

/// Per-triangle scalar written to its own polygon file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrainQuantity {
    /// Absolute rotation rate
    Rotation,
    SecondInvariant,
    Dilatation,
    MaxShear,
    Azimuth,
}

impl StrainQuantity {
    pub const ALL: [StrainQuantity; 5] = [
        StrainQuantity::Rotation,
        StrainQuantity::SecondInvariant,
        StrainQuantity::Dilatation,
        StrainQuantity::MaxShear,
        StrainQuantity::Azimuth,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            StrainQuantity::Rotation => "rotation.txt",
            StrainQuantity::SecondInvariant => "I2nd.txt",
            StrainQuantity::Dilatation => "Dilatation.txt",
            StrainQuantity::MaxShear => "max_shear.txt",
            StrainQuantity::Azimuth => "azimuth.txt",
        }
    }

    pub fn value(&self, t: &TriangleStrain) -> f64 {
        match self {
            StrainQuantity::Rotation => t.rotation.magnitude(),
            StrainQuantity::SecondInvariant => t.scalars.second_invariant,
            StrainQuantity::Dilatation => t.scalars.dilatation,
            StrainQuantity::MaxShear => t.scalars.max_shear,
            StrainQuantity::Azimuth => t.scalars.azimuth,
        }
    }
}

/// Write one quantity as a multisegment polygon file
pub fn write_polygon_values<W: Write>(
    field: &StrainField,
    quantity: StrainQuantity,
    writer: &mut W,
) -> Result<()> {
    for t in field.iter() {
        writeln!(writer, "> -Z{}", quantity.value(t))?;
        for (lon, lat) in &t.positions {
            writeln!(writer, "{} {}", lon, lat)?;
        }
    }
    Ok(())
}

/// Scaled (vx, vy) arrow for an eigenpair, saturated at `EIGEN_ARROW_MAX`
pub fn eigen_arrow(eigenvalue: f64, vector: [f64; 2]) -> (f64, f64) {
    let mut scale = EIGEN_ARROW_SCALE * eigenvalue;
    let mut vx = vector[0] * scale;
    let mut vy = vector[1] * scale;
    let len = (vx * vx + vy * vy).sqrt();
    if len > EIGEN_ARROW_MAX {
        scale *= EIGEN_ARROW_MAX / len;
        vx = vector[0] * scale;
        vy = vector[1] * scale;
    }
    (vx, vy)
}

/// Write both principal axes of every triangle.
///
/// Positive (extensional) eigenvalues go to `positive`, the rest to `negative`.
/// Each axis is drawn as two opposite arrows from the centroid.
pub fn write_eigenvectors<W: Write>(
    field: &StrainField,
    positive: &mut W,
    negative: &mut W,
) -> Result<()> {
    for t in field.iter() {
        let (x, y) = t.centroid;
        for (e, v) in t.principal.pairs() {
            let (vx, vy) = eigen_arrow(e, v);
            let out: &mut W = if e > 0.0 { &mut *positive } else { &mut *negative };
            writeln!(out, "{} {} {} {} 0 0 0", x, y, vx, vy)?;
            writeln!(out, "{} {} {} {} 0 0 0", x, y, -vx, -vy)?;
        }
    }
    Ok(())
}

/// `lon lat VU` per station
pub fn write_uplift<W: Write>(velocities: &VelocityField, writer: &mut W) -> Result<()> {
    for s in velocities.iter() {
        writeln!(writer, "{:.6} {:.6} {:.6} ", s.lon, s.lat, s.vu)?;
    }
    Ok(())
}

/// Write every polygon and eigenvector file plus the station tables into `dir`.
///
/// Returns the paths written, in write order.
pub fn write_strain_outputs<P: AsRef<Path>>(
    dir: P,
    field: &StrainField,
    velocities: &VelocityField,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    for quantity in StrainQuantity::ALL {
        let path = dir.join(quantity.file_name());
        let mut w = BufWriter::new(File::create(&path)?);
        write_polygon_values(field, quantity, &mut w)?;
        w.flush()?;
        written.push(path);
    }

    let pos_path = dir.join("positive_eigs.txt");
    let neg_path = dir.join("negative_eigs.txt");
    {
        let mut pos = BufWriter::new(File::create(&pos_path)?);
        let mut neg = BufWriter::new(File::create(&neg_path)?);
        write_eigenvectors(field, &mut pos, &mut neg)?;
        pos.flush()?;
        neg.flush()?;
    }
    written.push(pos_path);
    written.push(neg_path);

    let gps_path = dir.join("tempgps.txt");
    let mut gps = BufWriter::new(File::create(&gps_path)?);
    super::velocity::write_gmt_vels(velocities, &mut gps)?;
    gps.flush()?;
    written.push(gps_path);

    let up_path = dir.join("uplift.txt");
    let mut up = BufWriter::new(File::create(&up_path)?);
    write_uplift(velocities, &mut up)?;
    up.flush()?;
    written.push(up_path);

    Ok(written)
}
