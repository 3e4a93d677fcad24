use std::{fs::File, io::{BufReader, BufWriter}, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{json, Value};

/// Read named (Multi)Polygon features from a GeoJSON FeatureCollection file.
/// The feature name is taken from the `name_property` property.
pub(crate) fn read_named_polygons_from_geojson(path: &Path, name_property: &str) -> Result<Vec<(String, MultiPolygon<f64>)>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open GeoJSON file: {}", path.display()))?;
    let value: Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse GeoJSON file: {}", path.display()))?;

    read_named_polygons(&value, name_property)
        .with_context(|| format!("Invalid GeoJSON in {}", path.display()))
}

/// Extract named (Multi)Polygon features from a parsed FeatureCollection.
pub(crate) fn read_named_polygons(value: &Value, name_property: &str) -> Result<Vec<(String, MultiPolygon<f64>)>> {
    let features = value["features"].as_array()
        .ok_or_else(|| anyhow!("Expected a FeatureCollection with a `features` array"))?;

    features.iter().enumerate()
        .map(|(i, feature)| {
            let name = match &feature["properties"][name_property] {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => bail!("Feature {i} has no `{name_property}` property"),
            };
            let geometry = &feature["geometry"];
            let coords = geometry["coordinates"].as_array()
                .ok_or_else(|| anyhow!("Feature {i} ({name}) has no coordinates"))?;

            let shape = match geometry["type"].as_str() {
                Some("Polygon") => MultiPolygon(vec![parse_polygon_coords(coords)?]),
                Some("MultiPolygon") => MultiPolygon(coords.iter()
                    .map(|polygon| polygon.as_array()
                        .ok_or_else(|| anyhow!("Invalid MultiPolygon: polygon is not an array"))
                        .and_then(|rings| parse_polygon_coords(rings)))
                    .collect::<Result<Vec<_>>>()?),
                other => bail!("Feature {i} ({name}) has unsupported geometry type {other:?}"),
            };
            Ok((name, shape))
        })
        .collect()
}

/// Parse GeoJSON Polygon coordinates: `[exterior, hole, hole, ...]`.
fn parse_polygon_coords(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter()
        .map(|ring| ring.as_array()
            .ok_or_else(|| anyhow!("Invalid Polygon: ring is not an array"))
            .and_then(|coords| parse_ring_coords(coords)));

    let exterior = rings.next()
        .ok_or_else(|| anyhow!("Invalid Polygon: missing exterior ring"))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;

    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring from GeoJSON coordinates: `[[x, y], [x, y], ...]`.
fn parse_ring_coords(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = coords.iter()
        .map(|pair| match pair.as_array().map(Vec::as_slice) {
            Some([x, y, ..]) => Ok(Coord {
                x: x.as_f64().ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?,
                y: y.as_f64().ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?,
            }),
            _ => bail!("Invalid coordinate: expected [x, y]"),
        })
        .collect::<Result<Vec<_>>>()?;

    // Ensure ring is closed (first point == last point)
    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if first != last { points.push(first) }
    }

    Ok(LineString(points))
}

/// Write polygons as a GeoJSON FeatureCollection; each feature's `index` property is its position.
pub(crate) fn write_to_geojson_file(path: &Path, geoms: &[MultiPolygon<f64>]) -> Result<()> {
    fn ring(ls: &LineString<f64>) -> Vec<[f64; 2]> {
        ls.coords().map(|c| [c.x, c.y]).collect()
    }

    let features = geoms.iter().enumerate()
        .map(|(idx, mp)| {
            let polygons = mp.0.iter()
                .map(|polygon| std::iter::once(ring(polygon.exterior()))
                    .chain(polygon.interiors().iter().map(ring))
                    .collect::<Vec<_>>())
                .collect::<Vec<_>>();

            json!({
                "type": "Feature",
                "geometry": { "type": "MultiPolygon", "coordinates": polygons },
                "properties": { "index": idx },
            })
        })
        .collect::<Vec<_>>();

    let file = File::create(path)
        .with_context(|| format!("Failed to create GeoJSON file: {}", path.display()))?;
    serde_json::to_writer(BufWriter::new(file), &json!({ "type": "FeatureCollection", "features": features }))
        .context("Failed to serialize GeoJSON")
}
