//! Base-map tile layer and tile request gating.
//!
//! Tiles are only requested when they intersect the region's bounds and
//! the zoom is inside the layer limits; with `no_wrap` set, the world is
//! not repeated horizontally.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use stray_map_geography_models::{BoundingBox, LatLng};

use crate::config::mercator_y;

/// Standard `OpenStreetMap` tile server template.
pub const OSM_URL_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Attribution required by the `OpenStreetMap` tile usage policy.
pub const OSM_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

/// Slippy-map tile address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level.
    pub z: u8,
    /// Column, from the antimeridian eastward.
    pub x: u32,
    /// Row, from the north edge southward.
    pub y: u32,
}

impl TileCoord {
    /// Creates a tile address.
    #[must_use]
    pub const fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }
}

/// Geographic extent of a tile.
#[must_use]
pub fn tile_bounds(coord: TileCoord) -> BoundingBox {
    let n = f64::from(tiles_per_axis(coord.z));
    let lng = |x: f64| x / n * 360.0 - 180.0;
    let lat = |y: f64| (PI * (1.0 - 2.0 * y / n)).sinh().atan().to_degrees();

    let x = f64::from(coord.x);
    let y = f64::from(coord.y);
    BoundingBox::new(lng(x), lat(y + 1.0), lng(x + 1.0), lat(y))
}

/// Tile containing `point` at `zoom`, clamped to the tile grid.
#[must_use]
pub fn tile_at(point: LatLng, zoom: u8) -> TileCoord {
    let n = f64::from(tiles_per_axis(zoom));
    let max_index = n - 1.0;

    let x = ((point.lng + 180.0) / 360.0 * n).floor().clamp(0.0, max_index);
    let y = ((1.0 - mercator_y(point.lat) / PI) / 2.0 * n)
        .floor()
        .clamp(0.0, max_index);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    TileCoord::new(zoom, x as u32, y as u32)
}

fn tiles_per_axis(zoom: u8) -> u32 {
    1u32.checked_shl(u32::from(zoom)).unwrap_or(u32::MAX)
}

/// Configuration of the base-map tile layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayerConfig {
    /// URL template with `{s}`, `{z}`, `{x}` and `{y}` placeholders.
    pub url_template: String,
    /// Values substituted for `{s}`, rotated per tile.
    pub subdomains: Vec<String>,
    /// Attribution shown on the map.
    pub attribution: String,
    /// Tiles outside these bounds are never requested.
    pub bounds: Option<BoundingBox>,
    /// Lowest zoom at which tiles load.
    pub min_zoom: u8,
    /// Highest zoom at which tiles load.
    pub max_zoom: u8,
    /// Do not repeat the world horizontally.
    pub no_wrap: bool,
    /// Request higher-resolution tiles on high-density displays.
    pub detect_retina: bool,
    /// Only load tiles once panning stops.
    pub update_when_idle: bool,
}

impl TileLayerConfig {
    /// `OpenStreetMap` tiles limited to `bounds`.
    #[must_use]
    pub fn openstreetmap(bounds: BoundingBox, min_zoom: u8, max_zoom: u8) -> Self {
        Self {
            url_template: OSM_URL_TEMPLATE.to_string(),
            subdomains: ["a", "b", "c"].map(str::to_string).to_vec(),
            attribution: OSM_ATTRIBUTION.to_string(),
            bounds: Some(bounds),
            min_zoom,
            max_zoom,
            no_wrap: true,
            detect_retina: true,
            update_when_idle: true,
        }
    }

    /// Whether `coord` may be fetched from the tile server.
    #[must_use]
    pub fn should_request(&self, coord: TileCoord) -> bool {
        if coord.z < self.min_zoom || coord.z > self.max_zoom {
            return false;
        }
        let n = tiles_per_axis(coord.z);
        if coord.y >= n || (self.no_wrap && coord.x >= n) {
            return false;
        }
        self.bounds
            .is_none_or(|bounds| bounds.intersects(&tile_bounds(coord)))
    }

    /// Every tile needed to draw `view` at `zoom`, row by row, already
    /// filtered through [`Self::should_request`].
    #[must_use]
    pub fn tiles_covering(&self, view: &BoundingBox, zoom: u8) -> Vec<TileCoord> {
        let top_left = tile_at(LatLng::new(view.north, view.west), zoom);
        let bottom_right = tile_at(LatLng::new(view.south, view.east), zoom);

        (top_left.y..=bottom_right.y)
            .flat_map(|y| (top_left.x..=bottom_right.x).map(move |x| TileCoord::new(zoom, x, y)))
            .filter(|coord| self.should_request(*coord))
            .collect()
    }

    /// URL of one tile.
    #[must_use]
    pub fn url_for(&self, coord: TileCoord) -> String {
        let subdomain = if self.subdomains.is_empty() {
            ""
        } else {
            let rotation = u64::from(coord.x) + u64::from(coord.y);
            let index = usize::try_from(rotation % self.subdomains.len() as u64).unwrap_or(0);
            self.subdomains[index].as_str()
        };

        self.url_template
            .replace("{s}", subdomain)
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
    }
}
