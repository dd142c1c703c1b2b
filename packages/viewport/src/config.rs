//! Viewport configuration.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use stray_map_geography_models::{BoundingBox, LatLng};

/// Edge length of one map tile in pixels.
pub const TILE_SIZE_PX: f64 = 256.0;

/// Latitude limit of the Web-Mercator projection.
const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Fixed camera parameters for one map view.
///
/// Zoom limits are independent of the region's size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportConfig {
    /// Zoom used before the region bounds are known.
    pub default_zoom: f64,
    /// Lowest zoom the user can reach.
    pub min_zoom: f64,
    /// Highest zoom the user can reach.
    pub max_zoom: f64,
    /// Zoom of the one-shot fly-to when a live position arrives.
    pub recenter_zoom: f64,
    /// Fraction of the region's extent added on each side of the pan limit.
    pub bounds_padding: f64,
    /// Camera center used until a region or live position is known.
    pub fallback_center: LatLng,
    /// Width of the map container in pixels.
    pub viewport_width_px: f64,
    /// Height of the map container in pixels.
    pub viewport_height_px: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            default_zoom: 13.0,
            min_zoom: 10.0,
            max_zoom: 18.0,
            recenter_zoom: 14.0,
            bounds_padding: 0.2,
            fallback_center: LatLng::new(39.0, 16.25),
            viewport_width_px: 1024.0,
            viewport_height_px: 768.0,
        }
    }
}

impl ViewportConfig {
    /// Uses `center` as the fallback camera center.
    #[must_use]
    pub const fn with_fallback_center(mut self, center: LatLng) -> Self {
        self.fallback_center = center;
        self
    }

    /// Sets the map container size used for fit-to-bounds.
    #[must_use]
    pub const fn with_viewport_size(mut self, width_px: f64, height_px: f64) -> Self {
        self.viewport_width_px = width_px;
        self.viewport_height_px = height_px;
        self
    }

    /// The zoom limits as `(lowest, highest)`, whichever order the two
    /// fields were configured in.
    #[must_use]
    pub fn zoom_limits(&self) -> (f64, f64) {
        (
            self.min_zoom.min(self.max_zoom),
            self.max_zoom.max(self.min_zoom),
        )
    }

    /// Clamps `zoom` into the zoom limits.
    #[must_use]
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        let (lowest, highest) = self.zoom_limits();
        zoom.max(lowest).min(highest)
    }

    /// Largest whole zoom at which `bounds` fits inside the viewport,
    /// clamped to the zoom limits.
    #[must_use]
    pub fn fit_zoom(&self, bounds: &BoundingBox) -> f64 {
        let lng_fraction = bounds.lng_span().abs() / 360.0;
        let lat_fraction = (mercator_y(bounds.north) - mercator_y(bounds.south)).abs() / (2.0 * PI);

        let zoom_for = |pixels: f64, fraction: f64| {
            if fraction > 0.0 {
                (pixels / (TILE_SIZE_PX * fraction)).log2()
            } else {
                f64::INFINITY
            }
        };

        let zoom = zoom_for(self.viewport_width_px, lng_fraction)
            .min(zoom_for(self.viewport_height_px, lat_fraction));

        if zoom.is_finite() {
            self.clamp_zoom(zoom.floor())
        } else {
            self.zoom_limits().1
        }
    }
}

/// Projected Web-Mercator `y` (radians) for a latitude in degrees.
pub(crate) fn mercator_y(lat: f64) -> f64 {
    let lat = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    (PI / 4.0 + lat / 2.0).tan().ln()
}
