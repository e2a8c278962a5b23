//! Boundary document loading.
//!
//! Only the parts of GeoJSON a puzzle needs are modelled: a feature
//! collection whose features carry a name property, an optional label
//! property and a polygon or multipolygon geometry.

use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::PuzzleError;
use crate::models::Region;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Map<String, Value>,
    geometry: Geometry,
}

type Ring = Vec<Vec<f64>>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
enum Geometry {
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

/// Parse a feature collection into regions named by `name_field`. The label
/// comes from `label_field` and falls back to the name when a feature lacks it.
pub fn parse_regions(
    text: &str,
    name_field: &str,
    label_field: &str,
) -> Result<Vec<Region>, PuzzleError> {
    let fc: FeatureCollection = serde_json::from_str(text)?;
    let mut regions = Vec::with_capacity(fc.features.len());
    for (index, feature) in fc.features.into_iter().enumerate() {
        let name = feature
            .properties
            .get(name_field)
            .and_then(Value::as_str)
            .ok_or_else(|| PuzzleError::MissingName {
                index,
                field: name_field.to_string(),
            })?
            .to_string();
        let display_name = feature
            .properties
            .get(label_field)
            .and_then(Value::as_str)
            .map_or_else(|| name.clone(), str::to_string);
        let shape = match feature.geometry {
            Geometry::Polygon(rings) => MultiPolygon::new(vec![polygon(&rings, index)?]),
            Geometry::MultiPolygon(polys) => MultiPolygon::new(
                polys
                    .iter()
                    .map(|rings| polygon(rings, index))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        };
        regions.push(Region {
            name,
            display_name,
            shape,
        });
    }
    log::debug!("parsed {} regions", regions.len());
    Ok(regions)
}

fn polygon(rings: &[Ring], index: usize) -> Result<Polygon<f64>, PuzzleError> {
    let mut it = rings.iter().map(|r| ring(r, index));
    let exterior = match it.next() {
        Some(r) => r?,
        None => LineString::new(Vec::new()),
    };
    let interiors = it.collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn ring(positions: &Ring, index: usize) -> Result<LineString<f64>, PuzzleError> {
    positions
        .iter()
        .map(|p| match p.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err(PuzzleError::InvalidPosition { index }),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "ilad": "Ankara", "plaka": 6, "kisa": "ANK" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[32.0, 39.0], [33.0, 39.0], [33.0, 40.0], [32.0, 39.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "ilad": "Mersin" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[34.0, 36.0, 12.0], [35.0, 36.0, 8.0], [35.0, 37.0, 3.0], [34.0, 36.0, 12.0]]],
                        [[[33.0, 35.0], [33.5, 35.0], [33.5, 35.5], [33.0, 35.0]]]
                    ]
                }
            }
        ]
    }"#;

    #[test]
    fn parses_polygons_and_multipolygons() {
        let regions = parse_regions(DOC, "ilad", "ilad").unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].name, "Ankara");
        assert_eq!(regions[0].shape.0.len(), 1);
        assert_eq!(regions[1].name, "Mersin");
        assert_eq!(regions[1].shape.0.len(), 2);
        // altitude is dropped
        let first = regions[1].shape.0[0].exterior().0[0];
        assert_eq!((first.x, first.y), (34.0, 36.0));
    }

    #[test]
    fn label_property_is_separate_from_the_name() {
        let regions = parse_regions(DOC, "ilad", "kisa").unwrap();
        assert_eq!(regions[0].name, "Ankara");
        assert_eq!(regions[0].display_name, "ANK");
        // no `kisa` on Mersin
        assert_eq!(regions[1].display_name, "Mersin");
    }

    #[test]
    fn missing_name_is_fatal() {
        let err = parse_regions(DOC, "name", "name").unwrap_err();
        assert!(matches!(err, PuzzleError::MissingName { index: 0, .. }));
    }

    #[test]
    fn short_position_is_fatal() {
        let doc = r#"{"features":[{"properties":{"ilad":"X"},
            "geometry":{"type":"Polygon","coordinates":[[[1.0],[2.0,3.0]]]}}]}"#;
        let err = parse_regions(doc, "ilad", "ilad").unwrap_err();
        assert!(matches!(err, PuzzleError::InvalidPosition { index: 0 }));
    }

    #[test]
    fn unsupported_geometry_is_rejected() {
        let doc = r#"{"features":[{"properties":{"ilad":"X"},
            "geometry":{"type":"Point","coordinates":[1.0,2.0]}}]}"#;
        assert!(matches!(parse_regions(doc, "ilad", "ilad"), Err(PuzzleError::Json(_))));
    }
}
