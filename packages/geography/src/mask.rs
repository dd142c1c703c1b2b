//! Mask polygon and bounding box computation.
//!
//! Source rings are `GeoJSON` positions (`lng`, `lat`). Each ring is
//! transposed to render order and otherwise kept exactly as given: no
//! winding correction, no closing-point insertion or removal.

use geo::{
    BoundingRect as _, Contains as _, Coord, LineString, MultiPoint, MultiPolygon, Point, Polygon,
};
use geojson::{GeoJson, Geometry, Value};
use stray_map_geography_models::{BoundingBox, LatLng, MaskPolygon, RegionGeometry};

use crate::GeometryError;

/// Parses a `GeoJSON` boundary dataset and computes its mask and bounds.
///
/// # Errors
///
/// * [`GeometryError::GeoJson`] if `dataset` is not valid `GeoJSON`
/// * [`GeometryError::MalformedGeometry`] if it holds no usable polygon
pub fn region_geometry_from_str(dataset: &str) -> Result<RegionGeometry, GeometryError> {
    let geojson: GeoJson = dataset.parse().map_err(Box::new)?;
    compute_mask_and_bounds(&geojson)
}

/// Computes the world mask (with the region cut out) and the region's
/// bounding box.
///
/// Accepts a bare `Polygon`/`MultiPolygon` geometry, a `Feature`, or a
/// `FeatureCollection` whose first feature holds the geometry. Every
/// polygon contributes its exterior ring as one hole of the mask; the
/// bounding box encloses every position of every ring.
///
/// # Errors
///
/// Returns [`GeometryError::MalformedGeometry`] when the wrapper is empty,
/// the geometry is missing or not polygonal, or a ring or position is
/// unusable. An empty mask is never produced.
pub fn compute_mask_and_bounds(dataset: &GeoJson) -> Result<RegionGeometry, GeometryError> {
    let geometry = unwrap_geometry(dataset)?;

    let polygons: Vec<&geojson::PolygonType> = match &geometry.value {
        Value::Polygon(rings) => vec![rings],
        Value::MultiPolygon(polygons) => polygons.iter().collect(),
        other => {
            return Err(GeometryError::malformed(format!(
                "expected Polygon or MultiPolygon, found {}",
                value_kind(other)
            )));
        }
    };

    if polygons.is_empty() {
        return Err(GeometryError::malformed("MultiPolygon has no polygons"));
    }

    let mut holes = Vec::with_capacity(polygons.len());
    let mut extent = Vec::new();

    for (index, rings) in polygons.into_iter().enumerate() {
        let Some((exterior, interiors)) = rings.split_first() else {
            return Err(GeometryError::malformed(format!(
                "polygon {index} has no rings"
            )));
        };

        let exterior = transpose_ring(exterior)?;
        extent.extend(exterior.iter().copied());
        holes.push(exterior);

        for interior in interiors {
            extent.extend(transpose_ring(interior)?);
        }
    }

    let bounds = bounding_box(&extent)?;
    log::debug!(
        "Computed region mask with {} hole(s), bounds {bounds:?}",
        holes.len()
    );

    Ok(RegionGeometry {
        mask: MaskPolygon::with_holes(holes),
        bounds,
    })
}

/// Whether `point` falls inside one of the region's boundary rings.
#[must_use]
pub fn region_contains(geometry: &RegionGeometry, point: LatLng) -> bool {
    if !geometry.bounds.contains(point) {
        return false;
    }

    let region: MultiPolygon<f64> = geometry
        .mask
        .holes()
        .iter()
        .map(|ring| {
            let exterior: LineString<f64> = ring
                .iter()
                .map(|p| Coord { x: p.lng, y: p.lat })
                .collect();
            Polygon::new(exterior, vec![])
        })
        .collect();

    region.contains(&Point::new(point.lng, point.lat))
}

fn unwrap_geometry(dataset: &GeoJson) -> Result<&Geometry, GeometryError> {
    match dataset {
        GeoJson::Geometry(geometry) => Ok(geometry),
        GeoJson::Feature(feature) => feature
            .geometry
            .as_ref()
            .ok_or_else(|| GeometryError::malformed("feature has no geometry")),
        GeoJson::FeatureCollection(collection) => collection
            .features
            .first()
            .ok_or_else(|| GeometryError::malformed("feature collection has no features"))?
            .geometry
            .as_ref()
            .ok_or_else(|| GeometryError::malformed("first feature has no geometry")),
    }
}

/// Swaps each `[lng, lat]` position into a [`LatLng`], preserving order.
fn transpose_ring(ring: &[geojson::Position]) -> Result<Vec<LatLng>, GeometryError> {
    if ring.is_empty() {
        return Err(GeometryError::malformed("ring has no positions"));
    }

    ring.iter()
        .map(|position| match (position.first(), position.get(1)) {
            (Some(&lng), Some(&lat)) if lng.is_finite() && lat.is_finite() => {
                Ok(LatLng::new(lat, lng))
            }
            _ => Err(GeometryError::malformed(format!(
                "invalid position {position:?}"
            ))),
        })
        .collect()
}

fn bounding_box(points: &[LatLng]) -> Result<BoundingBox, GeometryError> {
    let points: MultiPoint<f64> = points.iter().map(|p| Point::new(p.lng, p.lat)).collect();

    points
        .bounding_rect()
        .map(|rect| BoundingBox::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y))
        .ok_or_else(|| GeometryError::malformed("boundary has no positions"))
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stray_map_geography_models::WORLD_RING;

    fn geometry(json: &str) -> Result<RegionGeometry, GeometryError> {
        region_geometry_from_str(json)
    }

    fn assert_malformed(json: &str) {
        match geometry(json) {
            Err(GeometryError::MalformedGeometry { .. }) => {}
            other => panic!("expected MalformedGeometry for {json}, got {other:?}"),
        }
    }

    #[test]
    fn transposes_lng_lat_into_lat_lng() {
        let region = geometry(r#"{"type":"Polygon","coordinates":[[[16.0,38.0]]]}"#).unwrap();

        assert_eq!(region.mask.outer(), WORLD_RING.as_slice());
        assert_eq!(region.mask.holes(), &[vec![LatLng::new(38.0, 16.0)]]);
    }

    #[test]
    fn preserves_ring_order_without_winding_correction() {
        // Clockwise ring, closing point included.
        let region = geometry(
            r#"{"type":"Polygon","coordinates":[[[16.0,38.0],[16.0,39.0],[17.0,39.0],[17.0,38.0],[16.0,38.0]]]}"#,
        )
        .unwrap();

        assert_eq!(
            region.mask.holes()[0],
            vec![
                LatLng::new(38.0, 16.0),
                LatLng::new(39.0, 16.0),
                LatLng::new(39.0, 17.0),
                LatLng::new(38.0, 17.0),
                LatLng::new(38.0, 16.0),
            ]
        );
    }

    #[test]
    fn multipolygon_contributes_one_hole_per_member() {
        let region = geometry(
            r#"{"type":"MultiPolygon","coordinates":[
                [[[16.0,38.0],[16.5,38.0],[16.5,38.5],[16.0,38.0]]],
                [[[17.0,39.0],[17.5,39.0],[17.5,39.5],[17.0,39.0]]]
            ]}"#,
        )
        .unwrap();

        assert_eq!(region.mask.holes().len(), 2);
        assert_eq!(region.bounds, BoundingBox::new(16.0, 38.0, 17.5, 39.5));
    }

    #[test]
    fn interior_rings_extend_bounds_but_are_not_holes() {
        let region = geometry(
            r#"{"type":"Polygon","coordinates":[
                [[16.0,38.0],[17.0,38.0],[17.0,39.0],[16.0,38.0]],
                [[16.2,38.2],[16.4,38.2],[16.4,39.4],[16.2,38.2]]
            ]}"#,
        )
        .unwrap();

        assert_eq!(region.mask.holes().len(), 1);
        assert_eq!(region.bounds, BoundingBox::new(16.0, 38.0, 17.0, 39.4));
    }

    #[test]
    fn unwraps_first_feature_of_collection() {
        let region = geometry(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{},"geometry":{"type":"Polygon","coordinates":[[[16.0,38.0],[16.1,38.1]]]}},
                {"type":"Feature","properties":{},"geometry":{"type":"Polygon","coordinates":[[[1.0,1.0]]]}}
            ]}"#,
        )
        .unwrap();

        assert_eq!(region.mask.holes().len(), 1);
        assert_eq!(region.bounds, BoundingBox::new(16.0, 38.0, 16.1, 38.1));
    }

    #[test]
    fn unwraps_single_feature() {
        let region = geometry(
            r#"{"type":"Feature","properties":{},"geometry":{"type":"Polygon","coordinates":[[[16.0,38.0]]]}}"#,
        )
        .unwrap();

        assert_eq!(region.mask.holes()[0], vec![LatLng::new(38.0, 16.0)]);
    }

    #[test]
    fn empty_collection_is_malformed() {
        assert_malformed(r#"{"type":"FeatureCollection","features":[]}"#);
    }

    #[test]
    fn feature_without_geometry_is_malformed() {
        assert_malformed(r#"{"type":"Feature","properties":{},"geometry":null}"#);
    }

    #[test]
    fn non_polygon_geometry_is_malformed() {
        assert_malformed(r#"{"type":"Point","coordinates":[16.0,38.0]}"#);
    }

    #[test]
    fn polygon_without_rings_is_malformed() {
        assert_malformed(r#"{"type":"Polygon","coordinates":[]}"#);
        assert_malformed(r#"{"type":"MultiPolygon","coordinates":[]}"#);
    }

    #[test]
    fn empty_ring_is_malformed() {
        assert_malformed(r#"{"type":"Polygon","coordinates":[[]]}"#);
    }

    #[test]
    fn invalid_json_is_a_geojson_error() {
        assert!(matches!(geometry("not json"), Err(GeometryError::GeoJson(_))));
    }

    #[test]
    fn contains_distinguishes_inside_and_outside() {
        let region = geometry(
            r#"{"type":"Polygon","coordinates":[[[16.0,38.0],[17.0,38.0],[17.0,39.0],[16.0,39.0],[16.0,38.0]]]}"#,
        )
        .unwrap();

        assert!(region_contains(&region, LatLng::new(38.5, 16.5)));
        assert!(!region_contains(&region, LatLng::new(40.0, 16.5)));
    }
}
