//! The map layer a [`MapView`](crate::view::MapView) draws on.

use serde::Serialize;
use stray_map_geography_models::{LatLng, MaskPolygon};

use crate::controller::CameraCommand;
use crate::markers::Marker;
use crate::tiles::TileLayerConfig;

/// Handle of an overlay added to a [`MapSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct OverlayId(pub u64);

/// Stroke and fill of a vector overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStyle {
    /// Draw the outline.
    pub stroke: bool,
    /// Outline color.
    pub color: &'static str,
    /// Outline width in pixels.
    pub weight: f64,
    /// Fill color.
    pub fill_color: &'static str,
    /// Fill opacity in `[0, 1]`.
    pub fill_opacity: f64,
    /// Whether the overlay receives pointer events.
    pub interactive: bool,
}

/// White outline around the region, no fill.
pub const BOUNDARY_STYLE: PathStyle = PathStyle {
    stroke: true,
    color: "#fff",
    weight: 1.0,
    fill_color: "#fff",
    fill_opacity: 0.0,
    interactive: false,
};

/// Dark fill over everything outside the region.
pub const MASK_STYLE: PathStyle = PathStyle {
    stroke: false,
    color: "black",
    weight: 0.0,
    fill_color: "black",
    fill_opacity: 0.75,
    interactive: false,
};

/// Something a [`MapSurface`] can draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Overlay {
    /// Region outline.
    Boundary {
        /// Closed rings to stroke.
        rings: Vec<Vec<LatLng>>,
        /// Line style.
        style: PathStyle,
    },
    /// World polygon with the region cut out.
    Mask {
        /// Outer world ring plus region holes.
        polygon: MaskPolygon,
        /// Fill style.
        style: PathStyle,
    },
    /// Base-map tiles.
    Tiles(TileLayerConfig),
}

/// A map rendering backend.
pub trait MapSurface {
    /// Draws `overlay` and returns a handle for removing it.
    fn add_overlay(&mut self, overlay: Overlay) -> OverlayId;

    /// Removes a previously added overlay. Unknown ids are ignored.
    fn remove_overlay(&mut self, id: OverlayId);

    /// Moves or constrains the camera.
    fn apply_camera(&mut self, command: CameraCommand);

    /// Replaces every marker on the map.
    fn set_markers(&mut self, markers: Vec<Marker>);
}

/// A [`MapSurface`] that records what it was asked to draw.
///
/// Backs headless hosts and tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    next_id: u64,
    overlays: Vec<(OverlayId, Overlay)>,
    camera: Vec<CameraCommand>,
    markers: Vec<Marker>,
}

impl RecordingSurface {
    /// Creates an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlays currently drawn, in insertion order.
    #[must_use]
    pub fn overlays(&self) -> &[(OverlayId, Overlay)] {
        &self.overlays
    }

    /// Every camera command received, oldest first.
    #[must_use]
    pub fn camera_log(&self) -> &[CameraCommand] {
        &self.camera
    }

    /// Markers currently drawn.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Last center the camera was moved to, if any.
    #[must_use]
    pub fn center(&self) -> Option<LatLng> {
        self.camera.iter().rev().find_map(|command| match command {
            CameraCommand::SetView { center, .. } | CameraCommand::FlyTo { center, .. } => {
                Some(*center)
            }
            CameraCommand::FitBounds { bounds, .. } => Some(bounds.center()),
            CameraCommand::SetMaxBounds(_) => None,
        })
    }
}

impl MapSurface for RecordingSurface {
    fn add_overlay(&mut self, overlay: Overlay) -> OverlayId {
        self.next_id += 1;
        let id = OverlayId(self.next_id);
        self.overlays.push((id, overlay));
        id
    }

    fn remove_overlay(&mut self, id: OverlayId) {
        self.overlays.retain(|(existing, _)| *existing != id);
    }

    fn apply_camera(&mut self, command: CameraCommand) {
        self.camera.push(command);
    }

    fn set_markers(&mut self, markers: Vec<Marker>) {
        self.markers = markers;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removing_overlay_keeps_others() {
        let mut surface = RecordingSurface::new();
        let mask = surface.add_overlay(Overlay::Mask {
            polygon: MaskPolygon::with_holes(Vec::new()),
            style: MASK_STYLE,
        });
        let outline = surface.add_overlay(Overlay::Boundary {
            rings: Vec::new(),
            style: BOUNDARY_STYLE,
        });

        surface.remove_overlay(mask);
        surface.remove_overlay(OverlayId(99));

        assert_eq!(surface.overlays().len(), 1);
        assert_eq!(surface.overlays()[0].0, outline);
    }

    #[test]
    fn styles_match_region_rendering() {
        assert!(!MASK_STYLE.stroke);
        assert!((MASK_STYLE.fill_opacity - 0.75).abs() < f64::EPSILON);
        assert!(BOUNDARY_STYLE.stroke);
        assert!(BOUNDARY_STYLE.fill_opacity.abs() < f64::EPSILON);
        assert!((BOUNDARY_STYLE.weight - 1.0).abs() < f64::EPSILON);
    }
}
