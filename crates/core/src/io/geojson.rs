//! GeoJSON export of triangle features

use crate::error::Result;
use crate::vector::{Feature, FeatureCollection};
use serde_json::{json, Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

fn feature_to_json(feature: &Feature) -> Result<Value> {
    let ring: Vec<Value> = feature
        .geometry
        .exterior()
        .coords()
        .map(|c| json!([c.x, c.y]))
        .collect();

    let mut properties = Map::new();
    for (k, v) in &feature.properties {
        properties.insert(k.clone(), serde_json::to_value(v)?);
    }

    let mut obj = json!({
        "type": "Feature",
        "geometry": { "type": "Polygon", "coordinates": [ring] },
        "properties": properties,
    });
    if let Some(id) = &feature.id {
        obj["id"] = Value::String(id.clone());
    }
    Ok(obj)
}

/// Serialize a feature collection as a GeoJSON `FeatureCollection` value
pub fn to_geojson(collection: &FeatureCollection) -> Result<Value> {
    let features = collection
        .iter()
        .map(feature_to_json)
        .collect::<Result<Vec<_>>>()?;
    Ok(json!({ "type": "FeatureCollection", "features": features }))
}

pub fn write_geojson<P: AsRef<Path>>(collection: &FeatureCollection, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(&mut writer, &to_geojson(collection)?)?;
    writer.flush()?;
    Ok(())
}
