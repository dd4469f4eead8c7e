//! Polygon features for per-triangle strain
//!
//! Each triangle of a [`StrainField`] becomes a closed `geo_types::Polygon`
//! with its tensor components and invariants attached as attributes.

use crate::strain::{StrainField, TriangleStrain};
use geo_types::{LineString, Polygon};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Int(i64),
    Float(f64),
    String(String),
}

/// A triangle polygon with attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Polygon<f64>,
    /// Attributes, keyed by name (sorted for stable output)
    pub properties: BTreeMap<String, AttributeValue>,
    pub id: Option<String>,
}

impl Feature {
    pub fn new(geometry: Polygon<f64>) -> Self {
        Self {
            geometry,
            properties: BTreeMap::new(),
            id: None,
        }
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: AttributeValue) {
        self.properties.insert(key.into(), value);
    }

    pub fn get_property(&self, key: &str) -> Option<&AttributeValue> {
        self.properties.get(key)
    }

    /// Build the polygon feature for one triangle
    pub fn from_triangle(index: usize, t: &TriangleStrain) -> Self {
        let ring: Vec<(f64, f64)> = t.positions.to_vec();
        let mut feature = Feature::new(Polygon::new(LineString::from(ring), vec![]));
        feature.id = Some(index.to_string());

        for (k, v) in ["v0", "v1", "v2"].iter().zip(t.vertices) {
            feature.set_property(*k, AttributeValue::Int(v as i64));
        }

        let floats = [
            ("centroid_lon", t.centroid.0),
            ("centroid_lat", t.centroid.1),
            ("ve_centroid", t.gradient.ve_centroid),
            ("vn_centroid", t.gradient.vn_centroid),
            ("dve_de", t.gradient.dve_de),
            ("dve_dn", t.gradient.dve_dn),
            ("dvn_de", t.gradient.dvn_de),
            ("dvn_dn", t.gradient.dvn_dn),
            ("exx", t.strain.exx),
            ("exy", t.strain.exy),
            ("eyy", t.strain.eyy),
            ("rotation", t.rotation.value()),
            ("e1", t.principal.e1),
            ("e2", t.principal.e2),
            ("v00", t.principal.v00()),
            ("v10", t.principal.v10()),
            ("v01", t.principal.v01()),
            ("v11", t.principal.v11()),
            ("I2nd", t.scalars.second_invariant),
            ("max_shear", t.scalars.max_shear),
            ("dilatation", t.scalars.dilatation),
            ("azimuth", t.scalars.azimuth),
        ];
        for (k, v) in floats {
            feature.set_property(k, AttributeValue::Float(v));
        }

        feature
    }
}

/// Collection of features
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self { features: Vec::new() }
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }
}

impl From<&StrainField> for FeatureCollection {
    fn from(field: &StrainField) -> Self {
        Self {
            features: field
                .iter()
                .enumerate()
                .map(|(i, t)| Feature::from_triangle(i, t))
                .collect(),
        }
    }
}
