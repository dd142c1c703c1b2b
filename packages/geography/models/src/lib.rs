#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coordinate, bounding box and region mask types.
//!
//! All coordinates in this crate are in render order (`lat`, `lng`), WGS84.
//! Source datasets in `GeoJSON` order (`lng`, `lat`) are transposed by
//! `stray_map_geography` before they reach these types.

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair in render order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl LatLng {
    /// Creates a new coordinate pair.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// A geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western longitude boundary.
    pub west: f64,
    /// Southern latitude boundary.
    pub south: f64,
    /// Eastern longitude boundary.
    pub east: f64,
    /// Northern latitude boundary.
    pub north: f64,
}

impl BoundingBox {
    /// Creates a new bounding box from the given coordinates.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Returns the smallest box enclosing every point, or `None` when the
    /// iterator is empty.
    pub fn from_points(points: impl IntoIterator<Item = LatLng>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(acc.map_or_else(
                || Self::new(p.lng, p.lat, p.lng, p.lat),
                |b: Self| {
                    Self::new(
                        b.west.min(p.lng),
                        b.south.min(p.lat),
                        b.east.max(p.lng),
                        b.north.max(p.lat),
                    )
                },
            ))
        })
    }

    /// South-west corner.
    #[must_use]
    pub const fn south_west(&self) -> LatLng {
        LatLng::new(self.south, self.west)
    }

    /// North-east corner.
    #[must_use]
    pub const fn north_east(&self) -> LatLng {
        LatLng::new(self.north, self.east)
    }

    /// Geometric center of the box.
    #[must_use]
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    /// Latitude extent in degrees.
    #[must_use]
    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    /// Longitude extent in degrees.
    #[must_use]
    pub fn lng_span(&self) -> f64 {
        self.east - self.west
    }

    /// Returns a copy expanded on every side by `ratio` times the
    /// corresponding span (`0.2` grows each edge by 20% of the extent).
    #[must_use]
    pub fn pad(&self, ratio: f64) -> Self {
        let lat_buffer = self.lat_span().abs() * ratio;
        let lng_buffer = self.lng_span().abs() * ratio;
        Self::new(
            self.west - lng_buffer,
            self.south - lat_buffer,
            self.east + lng_buffer,
            self.north + lat_buffer,
        )
    }

    /// Whether `point` lies inside the box (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lng >= self.west
            && point.lng <= self.east
    }

    /// Whether the two boxes share any area or edge.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.west <= other.east
            && other.west <= self.east
            && self.south <= other.north
            && other.south <= self.north
    }

    /// Moves `point` to the nearest position inside the box.
    #[must_use]
    pub fn clamp(&self, point: LatLng) -> LatLng {
        LatLng::new(
            point.lat.clamp(self.south, self.north),
            point.lng.clamp(self.west, self.east),
        )
    }
}

/// Corners of the world-covering outer ring of every mask, in render order.
pub const WORLD_RING: [LatLng; 4] = [
    LatLng::new(-90.0, -180.0),
    LatLng::new(-90.0, 180.0),
    LatLng::new(90.0, 180.0),
    LatLng::new(90.0, -180.0),
];

/// A polygon covering the whole world with the target region cut out.
///
/// `rings[0]` is always [`WORLD_RING`]; every following ring is one hole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskPolygon {
    /// Outer ring followed by the hole rings.
    pub rings: Vec<Vec<LatLng>>,
}

impl MaskPolygon {
    /// Builds a mask from the given hole rings.
    #[must_use]
    pub fn with_holes(holes: Vec<Vec<LatLng>>) -> Self {
        let mut rings = Vec::with_capacity(holes.len() + 1);
        rings.push(WORLD_RING.to_vec());
        rings.extend(holes);
        Self { rings }
    }

    /// The world-covering outer ring.
    #[must_use]
    pub fn outer(&self) -> &[LatLng] {
        self.rings.first().map_or(&[], Vec::as_slice)
    }

    /// The region rings cut out of the world ring.
    #[must_use]
    pub fn holes(&self) -> &[Vec<LatLng>] {
        self.rings.get(1..).unwrap_or(&[])
    }
}

/// Mask and bounds derived once from a region's boundary dataset.
///
/// Read-only after construction; shared between views by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionGeometry {
    /// Darkening overlay with the region as a hole.
    pub mask: MaskPolygon,
    /// Minimal box enclosing every boundary point.
    pub bounds: BoundingBox,
}

/// A target region, deserialized from an embedded TOML definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDefinition {
    /// Unique region identifier (e.g., `"calabria"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// File name of the `GeoJSON` boundary dataset, relative to `regions/`.
    pub boundary: String,
    /// Camera center used before a live position is known.
    pub fallback_center: LatLng,
}
