//! Geographic bounding regions in GMT `-R` notation

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longitude/latitude box, written `[lon_min/lon_max/lat_min/lat_max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Region {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl Region {
    /// Create a region, checking that it is non-empty and on the globe
    pub fn new(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> Result<Self> {
        let region = Self {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        };
        region.validate()?;
        Ok(region)
    }

    pub fn validate(&self) -> Result<()> {
        let values = [self.lon_min, self.lon_max, self.lat_min, self.lat_max];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidRegion(format!("{self}: non-finite bound")));
        }
        if self.lon_min >= self.lon_max || self.lat_min >= self.lat_max {
            return Err(Error::InvalidRegion(format!(
                "{self}: minimum must be below maximum"
            )));
        }
        if self.lat_min < -90.0 || self.lat_max > 90.0 {
            return Err(Error::InvalidRegion(format!(
                "{self}: latitude outside [-90, 90]"
            )));
        }
        Ok(())
    }

    /// Inclusive containment test
    #[inline]
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.lon_min && lon <= self.lon_max && lat >= self.lat_min && lat <= self.lat_max
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}/{}/{}/{}]",
            self.lon_min, self.lon_max, self.lat_min, self.lat_max
        )
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let inner = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(trimmed);

        let parts: Vec<&str> = inner.split('/').collect();
        if parts.len() != 4 {
            return Err(Error::InvalidRegion(format!(
                "'{s}': expected lon_min/lon_max/lat_min/lat_max"
            )));
        }

        let mut bounds = [0.0_f64; 4];
        for (bound, part) in bounds.iter_mut().zip(&parts) {
            *bound = part
                .trim()
                .parse()
                .map_err(|_| Error::InvalidRegion(format!("'{s}': '{part}' is not a number")))?;
        }

        Region::new(bounds[0], bounds[1], bounds[2], bounds[3])
    }
}

impl TryFrom<String> for Region {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gmt_range() {
        let r: Region = "[-125/-121/32/35]".parse().unwrap();
        assert_eq!(r.lon_min, -125.0);
        assert_eq!(r.lon_max, -121.0);
        assert_eq!(r.lat_min, 32.0);
        assert_eq!(r.lat_max, 35.0);
        assert_eq!(r.to_string(), "[-125/-121/32/35]");
    }

    #[test]
    fn test_parse_without_brackets() {
        let r: Region = "-120.5/-119/36.25/37".parse().unwrap();
        assert_eq!(r.lon_min, -120.5);
        assert_eq!(r.lat_min, 36.25);
    }

    #[test]
    fn test_reject_bad_ranges() {
        assert!("[-121/-125/32/35]".parse::<Region>().is_err());
        assert!("[-125/-121/32]".parse::<Region>().is_err());
        assert!("[-125/-121/32/abc]".parse::<Region>().is_err());
        assert!("[0/1/-95/10]".parse::<Region>().is_err());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let r = Region::new(0.0, 1.0, 0.0, 1.0).unwrap();
        assert!(r.contains(0.0, 1.0));
        assert!(r.contains(0.5, 0.5));
        assert!(!r.contains(1.0001, 0.5));
    }

    #[test]
    fn test_serde_as_string() {
        let r = Region::new(-125.0, -121.0, 32.0, 35.0).unwrap();
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, "\"[-125/-121/32/35]\"");
        let back: Region = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
