//! GeoJSON decoding for boundary and populated-place datasets.
//!
//! Boundary files keep only `Polygon`/`MultiPolygon` features; anything else
//! (points, lines, null geometry) is skipped. Place files keep only `Point`
//! features with usable coordinates. A malformed feature is dropped on its
//! own and never fails the rest of the file.

use foundation::math::GeoPoint;
use layers::feature::{Feature, FeatureCollection, FeatureGeometry, Polygon, Ring};
use layers::places::PopulatedPlace;
use layers::properties::{PLACE_NAME, PLACE_POPULATION};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoJsonError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected GeoJSON FeatureCollection")]
    NotAFeatureCollection,
}

/// Decodes a boundary dataset (land, countries, states).
pub fn parse_boundaries(payload: &str) -> Result<FeatureCollection, GeoJsonError> {
    let value: Value = serde_json::from_str(payload)?;
    boundaries_from_value(&value)
}

pub fn boundaries_from_value(value: &Value) -> Result<FeatureCollection, GeoJsonError> {
    let raw = raw_features(value)?;
    let mut features = Vec::with_capacity(raw.len());
    let mut skipped = 0usize;

    for feat in raw {
        let Some(geometry_val) = feat.geometry.filter(|g| !g.is_null()) else {
            skipped += 1;
            continue;
        };
        match areal_geometry(geometry_val) {
            Ok(Some(geometry)) => features.push(Feature::new(geometry, feat.properties)),
            Ok(None) => skipped += 1,
            Err(reason) => {
                tracing::warn!(index = feat.index, %reason, "skipping malformed feature");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        tracing::debug!(skipped, kept = features.len(), "skipped features");
    }
    Ok(FeatureCollection::new(features))
}

/// `Ok(None)` for well-formed geometry that is not areal.
fn areal_geometry(value: &Value) -> Result<Option<FeatureGeometry>, String> {
    let (ty, coords) = geometry_parts(value)?;
    Ok(match ty {
        "Polygon" => Some(FeatureGeometry::Polygon(parse_polygon(coords)?)),
        "MultiPolygon" => Some(FeatureGeometry::MultiPolygon(parse_multi_polygon(coords)?)),
        _ => None,
    })
}

/// Decodes a populated-places dataset.
pub fn parse_populated_places(payload: &str) -> Result<Vec<PopulatedPlace>, GeoJsonError> {
    let value: Value = serde_json::from_str(payload)?;
    places_from_value(&value)
}

pub fn places_from_value(value: &Value) -> Result<Vec<PopulatedPlace>, GeoJsonError> {
    let raw = raw_features(value)?;
    let mut places = Vec::with_capacity(raw.len());

    for feat in raw {
        let Some(Ok(("Point", coords))) = feat.geometry.map(geometry_parts) else {
            continue;
        };
        let Ok([lon, lat]) = parse_position(coords) else {
            continue;
        };
        places.push(PopulatedPlace::new(
            GeoPoint::new(lat, lon),
            PLACE_NAME.text(&feat.properties),
            PLACE_POPULATION.number(&feat.properties),
        ));
    }

    Ok(places)
}

struct RawFeature<'a> {
    index: usize,
    geometry: Option<&'a Value>,
    properties: Map<String, Value>,
}

fn raw_features(value: &Value) -> Result<Vec<RawFeature<'_>>, GeoJsonError> {
    let obj = value.as_object().ok_or(GeoJsonError::NotAFeatureCollection)?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or(GeoJsonError::NotAFeatureCollection)?;
    if ty != "FeatureCollection" {
        return Err(GeoJsonError::NotAFeatureCollection);
    }
    let features_val = obj
        .get("features")
        .and_then(|v| v.as_array())
        .ok_or(GeoJsonError::NotAFeatureCollection)?;

    let mut out = Vec::with_capacity(features_val.len());
    for (index, feat_val) in features_val.iter().enumerate() {
        let Some(feat_obj) = feat_val.as_object() else {
            tracing::warn!(index, "skipping feature that is not an object");
            continue;
        };
        let properties = feat_obj
            .get("properties")
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default();
        out.push(RawFeature {
            index,
            geometry: feat_obj.get("geometry"),
            properties,
        });
    }
    Ok(out)
}

fn geometry_parts(value: &Value) -> Result<(&str, &Value), String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;
    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;
    Ok((ty, coords))
}

fn parse_position(coords: &Value) -> Result<[f64; 2], String> {
    let arr = coords
        .as_array()
        .ok_or("position must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("position must have [lon, lat]".to_string());
    }
    let lon = arr[0].as_f64().ok_or("lon must be a number".to_string())?;
    let lat = arr[1].as_f64().ok_or("lat must be a number".to_string())?;
    Ok([lon, lat])
}

fn parse_ring(coords: &Value) -> Result<Ring, String> {
    let arr = coords
        .as_array()
        .ok_or("ring must be an array of positions".to_string())?;
    let mut points = Vec::with_capacity(arr.len());
    for item in arr {
        points.push(parse_position(item)?);
    }
    Ok(Ring::new(points))
}

fn parse_polygon(coords: &Value) -> Result<Polygon, String> {
    let rings = coords
        .as_array()
        .ok_or("Polygon coordinates must be an array of rings".to_string())?;
    let mut out = Vec::with_capacity(rings.len());
    for ring in rings {
        out.push(parse_ring(ring)?);
    }
    Ok(Polygon::new(out))
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Polygon>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    let mut out = Vec::with_capacity(polys.len());
    for poly in polys {
        out.push(parse_polygon(poly)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{GeoJsonError, parse_boundaries, parse_populated_places};
    use foundation::math::GeoPoint;
    use layers::feature::GeometryKind;
    use layers::query::find_containing_feature;
    use pretty_assertions::assert_eq;

    const COUNTRIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": { "ADMIN": "Squareland" },
              "geometry": { "type": "Polygon",
                "coordinates": [[[0,0],[10,0],[10,10],[0,10],[0,0]]] } },
            { "type": "Feature", "properties": { "name": "Isles" },
              "geometry": { "type": "MultiPolygon",
                "coordinates": [[[[20,20],[21,20],[21,21],[20,21]]],
                                [[[30,30,5],[31,30,5],[31,31,5],[30,31,5]]]] } },
            { "type": "Feature", "properties": { "name": "Capital" },
              "geometry": { "type": "Point", "coordinates": [5, 5] } },
            { "type": "Feature", "properties": {}, "geometry": null }
        ]
    }"#;

    #[test]
    fn keeps_only_areal_features_in_order() {
        let fc = parse_boundaries(COUNTRIES).expect("parse");
        assert_eq!(fc.len(), 2);
        assert_eq!(fc.features[0].kind(), GeometryKind::Polygon);
        assert_eq!(fc.features[1].kind(), GeometryKind::MultiPolygon);

        let hit = find_containing_feature(GeoPoint::new(30.5, 30.5), &fc).expect("hit");
        assert_eq!(hit.properties.get("name").and_then(|v| v.as_str()), Some("Isles"));
    }

    #[test]
    fn rejects_non_collections() {
        assert!(matches!(
            parse_boundaries(r#"{"type":"Feature"}"#),
            Err(GeoJsonError::NotAFeatureCollection)
        ));
        assert!(matches!(parse_boundaries("not json"), Err(GeoJsonError::Json(_))));
    }

    #[test]
    fn malformed_polygon_is_skipped_and_neighbours_kept() {
        let payload = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"name":"Good"},
             "geometry":{"type":"Polygon","coordinates":[[[0,0],[10,0],[10,10],[0,10],[0,0]]]}},
            {"type":"Feature","properties":{"name":"Broken"},
             "geometry":{"type":"Polygon","coordinates":[[[20,20],[21,null],[21,21],[20,20]]]}},
            "stray",
            {"type":"Feature","properties":{"name":"Also good"},
             "geometry":{"type":"MultiPolygon","coordinates":[[[[30,30],[31,30],[31,31],[30,31]]]]}}
        ]}"#;
        let fc = parse_boundaries(payload).expect("parse");
        assert_eq!(fc.len(), 2);

        let name = |lat, lon| {
            find_containing_feature(GeoPoint::new(lat, lon), &fc)
                .and_then(|f| f.properties.get("name").and_then(|v| v.as_str()))
        };
        assert_eq!(name(5.0, 5.0), Some("Good"));
        assert_eq!(name(20.5, 20.5), None);
        assert_eq!(name(30.5, 30.5), Some("Also good"));
    }

    #[test]
    fn places_read_name_and_population_aliases() {
        let payload = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"NAMEASCII":"Delhi","POP_MAX":"16000000"},
             "geometry":{"type":"Point","coordinates":[77.2,28.6]}},
            {"type":"Feature","properties":{"NAME":"Nowhere"},"geometry":null},
            {"type":"Feature","properties":{"NAME":"Bad"},
             "geometry":{"type":"Point","coordinates":[1]}},
            {"type":"Feature","properties":{"GN_POP":42},
             "geometry":{"type":"Point","coordinates":[2.35,48.85]}}
        ]}"#;
        let places = parse_populated_places(payload).expect("parse");
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].name.as_deref(), Some("Delhi"));
        assert_eq!(places[0].position, GeoPoint::new(28.6, 77.2));
        assert_eq!(places[0].population, Some(16_000_000.0));
        assert_eq!(places[1].name, None);
        assert_eq!(places[1].population, Some(42.0));
    }
}
