//! Plain-text station velocity formats
//!
//! Two whitespace-separated formats are supported:
//! - station-vel: `lon lat VE VN VU SE SN SU [name]`
//! - GMT: `lon lat VE VN ...`, horizontal rates only
//!
//! Blank lines and lines whose first token starts with `#` are ignored.

use crate::error::{Error, Result};
use crate::velocity::{StationVelocity, VelocityField};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

const STATIONVEL_HEADER: &str =
    "# Format: lon(deg) lat(deg) VE(mm) VN(mm) VU(mm) SE(mm) SN(mm) SU(mm) name(optional)";

/// Text layout of a velocity file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VelocityFormat {
    /// Eight numeric columns plus an optional name
    #[default]
    StationVel,
    /// lon, lat, VE, VN; remaining columns ignored
    Gmt,
}

impl FromStr for VelocityFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "stationvel" | "station-vel" | "station_vel" => Ok(VelocityFormat::StationVel),
            "gmt" | "simple" => Ok(VelocityFormat::Gmt),
            _ => Err(Error::InvalidParameter {
                name: "format",
                value: s.to_string(),
                reason: "expected 'stationvel' or 'gmt'".into(),
            }),
        }
    }
}

/// Read a velocity file in the given format
pub fn read_velocities<P: AsRef<Path>>(path: P, format: VelocityFormat) -> Result<VelocityField> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let field = match format {
        VelocityFormat::StationVel => parse_station_vels(reader)?,
        VelocityFormat::Gmt => parse_gmt_vels(reader)?,
    };
    debug!("Read {} stations from {}", field.len(), path.as_ref().display());
    Ok(field)
}

/// Write a velocity file in the given format
pub fn write_velocities<P: AsRef<Path>>(
    field: &VelocityField,
    path: P,
    format: VelocityFormat,
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    match format {
        VelocityFormat::StationVel => write_station_vels(field, &mut writer)?,
        VelocityFormat::Gmt => write_gmt_vels(field, &mut writer)?,
    }
    writer.flush()?;
    Ok(())
}

/// Parse station-vel records from a reader
pub fn parse_station_vels<R: BufRead>(reader: R) -> Result<VelocityField> {
    let mut stations = Vec::new();
    for (line_no, tokens) in data_lines(reader) {
        let tokens = tokens?;
        if tokens.len() < 8 {
            return Err(Error::Parse {
                line: line_no,
                message: format!("expected at least 8 columns, found {}", tokens.len()),
            });
        }
        let v = parse_columns::<8>(&tokens, line_no)?;
        stations.push(StationVelocity {
            lon: v[0],
            lat: v[1],
            ve: v[2],
            vn: v[3],
            vu: v[4],
            se: v[5],
            sn: v[6],
            su: v[7],
            name: tokens.get(8).cloned().unwrap_or_default(),
        });
    }
    Ok(VelocityField::new(stations))
}

/// Parse GMT-style `lon lat VE VN` records from a reader
pub fn parse_gmt_vels<R: BufRead>(reader: R) -> Result<VelocityField> {
    let mut stations = Vec::new();
    for (line_no, tokens) in data_lines(reader) {
        let tokens = tokens?;
        if tokens.len() < 4 {
            return Err(Error::Parse {
                line: line_no,
                message: format!("expected at least 4 columns, found {}", tokens.len()),
            });
        }
        let v = parse_columns::<4>(&tokens, line_no)?;
        stations.push(StationVelocity::horizontal(v[0], v[1], v[2], v[3]));
    }
    Ok(VelocityField::new(stations))
}

/// Write station-vel records, with the format header line
pub fn write_station_vels<W: Write>(field: &VelocityField, writer: &mut W) -> Result<()> {
    writeln!(writer, "{}", STATIONVEL_HEADER)?;
    for s in field.iter() {
        writeln!(
            writer,
            "{:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {}",
            s.lon, s.lat, s.ve, s.vn, s.vu, s.se, s.sn, s.su, s.name
        )?;
    }
    Ok(())
}

/// Write GMT `lon lat VE VN SE SN corr` records (correlation is always 0)
pub fn write_gmt_vels<W: Write>(field: &VelocityField, writer: &mut W) -> Result<()> {
    for s in field.iter() {
        writeln!(
            writer,
            "{:.6} {:.6} {:.6} {:.6} {:.6} {:.6} 0.0",
            s.lon, s.lat, s.ve, s.vn, s.se, s.sn
        )?;
    }
    Ok(())
}

/// Read a station blacklist: one name per line, first token only
pub fn read_blacklist<P: AsRef<Path>>(path: P) -> Result<HashSet<String>> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    parse_blacklist(reader)
}

pub fn parse_blacklist<R: BufRead>(reader: R) -> Result<HashSet<String>> {
    let mut names = HashSet::new();
    for (_, tokens) in data_lines(reader) {
        if let Some(name) = tokens?.into_iter().next() {
            names.insert(name);
        }
    }
    Ok(names)
}

/// Non-empty, non-comment lines split into tokens, with 1-based line numbers
fn data_lines<R: BufRead>(reader: R) -> impl Iterator<Item = (usize, Result<Vec<String>>)> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let line_no = i + 1;
            match line {
                Err(e) => Some((line_no, Err(Error::Io(e)))),
                Ok(line) => {
                    let tokens: Vec<String> =
                        line.split_whitespace().map(str::to_string).collect();
                    match tokens.first() {
                        None => None,
                        Some(first) if first.starts_with('#') => None,
                        Some(_) => Some((line_no, Ok(tokens))),
                    }
                }
            }
        })
}

fn parse_columns<const N: usize>(tokens: &[String], line: usize) -> Result<[f64; N]> {
    let mut values = [0.0_f64; N];
    for (i, value) in values.iter_mut().enumerate() {
        let parsed: f64 = tokens[i].parse().map_err(|_| Error::Parse {
            line,
            message: format!("column {} ('{}') is not a number", i + 1, tokens[i]),
        })?;
        if !parsed.is_finite() {
            return Err(Error::Parse {
                line,
                message: format!("column {} ('{}') is not finite", i + 1, tokens[i]),
            });
        }
        *value = parsed;
    }
    Ok(values)
}
