//! Station velocity data model

mod region;

pub use region::Region;

use std::collections::HashSet;

/// Horizontal and vertical velocity of a single GNSS station.
///
/// Positions are geographic degrees; rates and sigmas share one linear unit
/// (mm/yr throughout the file formats).
#[derive(Debug, Clone, PartialEq)]
pub struct StationVelocity {
    /// Longitude (degrees east)
    pub lon: f64,
    /// Latitude (degrees north)
    pub lat: f64,
    /// East rate
    pub ve: f64,
    /// North rate
    pub vn: f64,
    /// Vertical rate
    pub vu: f64,
    /// East sigma
    pub se: f64,
    /// North sigma
    pub sn: f64,
    /// Vertical sigma
    pub su: f64,
    /// Station name, empty when the source has none
    pub name: String,
}

impl StationVelocity {
    /// Station with horizontal velocity only (no vertical, no sigmas, no name)
    pub fn horizontal(lon: f64, lat: f64, ve: f64, vn: f64) -> Self {
        Self {
            lon,
            lat,
            ve,
            vn,
            vu: 0.0,
            se: 0.0,
            sn: 0.0,
            su: 0.0,
            name: String::new(),
        }
    }

    /// Attach a station name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[inline]
    pub fn position(&self) -> (f64, f64) {
        (self.lon, self.lat)
    }
}

/// Ordered collection of station velocities.
///
/// Station order is significant: triangulation output refers to stations by
/// their index in this collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VelocityField {
    stations: Vec<StationVelocity>,
}

impl VelocityField {
    pub fn new(stations: Vec<StationVelocity>) -> Self {
        Self { stations }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StationVelocity> {
        self.stations.get(index)
    }

    pub fn stations(&self) -> &[StationVelocity] {
        &self.stations
    }

    pub fn iter(&self) -> impl Iterator<Item = &StationVelocity> {
        self.stations.iter()
    }

    /// (lon, lat) of every station, in field order
    pub fn positions(&self) -> Vec<(f64, f64)> {
        self.stations.iter().map(StationVelocity::position).collect()
    }

    /// Geographic extent as (lon_min, lon_max, lat_min, lat_max), `None` when empty
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        if self.stations.is_empty() {
            return None;
        }
        let mut b = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
        for s in &self.stations {
            b.0 = b.0.min(s.lon);
            b.1 = b.1.max(s.lon);
            b.2 = b.2.min(s.lat);
            b.3 = b.3.max(s.lat);
        }
        Some(b)
    }

    /// Stations inside `region` (inclusive)
    pub fn within(&self, region: &Region) -> Self {
        self.filtered(|s| region.contains(s.lon, s.lat))
    }

    /// Stations whose east and north sigmas do not exceed `max_sigma`
    pub fn with_max_sigma(&self, max_sigma: f64) -> Self {
        self.filtered(|s| s.se <= max_sigma && s.sn <= max_sigma)
    }

    /// Stations whose name is not in `blacklist`
    pub fn without_names(&self, blacklist: &HashSet<String>) -> Self {
        self.filtered(|s| !blacklist.contains(&s.name))
    }

    fn filtered(&self, keep: impl Fn(&StationVelocity) -> bool) -> Self {
        Self {
            stations: self.stations.iter().filter(|s| keep(s)).cloned().collect(),
        }
    }
}

impl From<Vec<StationVelocity>> for VelocityField {
    fn from(stations: Vec<StationVelocity>) -> Self {
        Self::new(stations)
    }
}

impl FromIterator<StationVelocity> for VelocityField {
    fn from_iter<I: IntoIterator<Item = StationVelocity>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for VelocityField {
    type Item = StationVelocity;
    type IntoIter = std::vec::IntoIter<StationVelocity>;

    fn into_iter(self) -> Self::IntoIter {
        self.stations.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> VelocityField {
        let mut a = StationVelocity::horizontal(-120.0, 35.0, 1.0, 2.0).with_name("P001");
        a.se = 0.5;
        a.sn = 0.5;
        let mut b = StationVelocity::horizontal(-118.0, 34.0, 3.0, 4.0).with_name("P002");
        b.se = 2.5;
        b.sn = 0.4;
        let c = StationVelocity::horizontal(-110.0, 40.0, 5.0, 6.0).with_name("P003");
        VelocityField::new(vec![a, b, c])
    }

    #[test]
    fn test_bounds() {
        let (lon_min, lon_max, lat_min, lat_max) = field().bounds().unwrap();
        assert_eq!((lon_min, lon_max), (-120.0, -110.0));
        assert_eq!((lat_min, lat_max), (34.0, 40.0));
        assert!(VelocityField::default().bounds().is_none());
    }

    #[test]
    fn test_region_filter_preserves_order() {
        let region = Region::new(-121.0, -117.0, 33.0, 36.0).unwrap();
        let kept = field().within(&region);
        let names: Vec<&str> = kept.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["P001", "P002"]);
    }

    #[test]
    fn test_sigma_filter() {
        let kept = field().with_max_sigma(1.0);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|s| s.name != "P002"));
    }

    #[test]
    fn test_blacklist_filter() {
        let blacklist: HashSet<String> = ["P003".to_string()].into_iter().collect();
        let kept = field().without_names(&blacklist);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept.get(1).unwrap().name, "P002");
    }
}
