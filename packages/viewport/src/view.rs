//! One mounted map: overlays, camera and markers on a [`MapSurface`].
//!
//! The view owns the handles of every overlay it adds and releases all of
//! them on [`MapView::unmount`] (or drop). Position callbacks hold only a
//! [`Weak`] handle, so a fix that arrives after teardown is dropped instead
//! of moving a camera nobody is looking at.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use stray_map_animal_models::AnimalRecord;
use stray_map_geography_models::{LatLng, RegionGeometry};
use tokio::sync::oneshot;

use crate::config::ViewportConfig;
use crate::controller::ViewportController;
use crate::geolocation::Geolocator;
use crate::markers::markers_for;
use crate::surface::{BOUNDARY_STYLE, MASK_STYLE, MapSurface, Overlay, OverlayId};
use crate::tiles::TileLayerConfig;

/// A map bound to one region.
pub struct MapView<S: MapSurface> {
    surface: S,
    controller: ViewportController,
    region: Arc<RegionGeometry>,
    overlays: Vec<OverlayId>,
    mounted: bool,
}

impl<S: MapSurface> MapView<S> {
    /// Creates an unmounted view.
    #[must_use]
    pub fn new(surface: S, region: Arc<RegionGeometry>, config: ViewportConfig) -> Self {
        Self {
            surface,
            controller: ViewportController::new(config),
            region,
            overlays: Vec::new(),
            mounted: false,
        }
    }

    /// The backing surface.
    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// The camera controller.
    #[must_use]
    pub const fn controller(&self) -> &ViewportController {
        &self.controller
    }

    /// The region this view is confined to.
    #[must_use]
    pub fn region(&self) -> &RegionGeometry {
        &self.region
    }

    /// Whether the view is currently on screen.
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Handles of the overlays this view currently owns.
    #[must_use]
    pub fn overlays(&self) -> &[OverlayId] {
        &self.overlays
    }

    /// Draws the base map, the region outline and mask, and frames the
    /// region. A view mounts at most once.
    pub fn mount(&mut self) {
        if self.mounted || self.controller.is_disposed() {
            return;
        }

        self.surface.apply_camera(self.controller.initial_view());

        let (min_zoom, max_zoom) = self.controller.config().zoom_limits();
        let tiles = TileLayerConfig::openstreetmap(
            self.region.bounds,
            zoom_level(min_zoom),
            zoom_level(max_zoom),
        );
        self.overlays.push(self.surface.add_overlay(Overlay::Tiles(tiles)));
        self.overlays.push(self.surface.add_overlay(Overlay::Mask {
            polygon: self.region.mask.clone(),
            style: MASK_STYLE,
        }));
        self.overlays.push(self.surface.add_overlay(Overlay::Boundary {
            rings: self.region.mask.holes().to_vec(),
            style: BOUNDARY_STYLE,
        }));

        for command in self.controller.apply_region(self.region.bounds) {
            self.surface.apply_camera(command);
        }

        self.mounted = true;
        log::info!("Map view mounted with {} overlays", self.overlays.len());
    }

    /// Removes every overlay and marker and disposes the controller.
    pub fn unmount(&mut self) {
        if !self.mounted {
            self.controller.dispose();
            return;
        }

        for id in self.overlays.drain(..) {
            self.surface.remove_overlay(id);
        }
        self.surface.set_markers(Vec::new());
        self.controller.dispose();
        self.mounted = false;
        log::info!("Map view unmounted");
    }

    /// Replaces the markers with one per record.
    pub fn show_markers<'a>(&mut self, records: impl IntoIterator<Item = &'a AnimalRecord>) {
        if !self.mounted {
            return;
        }
        self.surface.set_markers(markers_for(records));
    }

    /// Feeds a live position to the controller. Returns whether the
    /// camera moved.
    pub fn on_position(&mut self, position: LatLng) -> bool {
        if !self.mounted {
            return false;
        }
        self.controller.on_position(position).is_some_and(|command| {
            self.surface.apply_camera(command);
            true
        })
    }
}

impl<S: MapSurface + 'static> MapView<S> {
    /// Asks `geolocator` for the device position and recenters `view` when
    /// it arrives. Errors leave the camera where it is.
    pub fn request_position(view: &Rc<RefCell<Self>>, geolocator: &dyn Geolocator) {
        let weak = Rc::downgrade(view);
        geolocator.current_position(
            Box::new(move |position| {
                deliver(&weak, position);
            }),
            Some(Box::new(|error| {
                log::debug!("No live position, keeping fallback center: {error}");
            })),
        );
    }
}

/// Waits for the one-shot position signal and recenters `view` if it is
/// still alive. Returns whether the camera moved.
pub async fn recenter_when_ready<S: MapSurface>(
    view: Weak<RefCell<MapView<S>>>,
    position: oneshot::Receiver<LatLng>,
) -> bool {
    match position.await {
        Ok(position) => deliver(&view, position),
        Err(_) => {
            log::debug!("Position signal closed without a fix");
            false
        }
    }
}

fn deliver<S: MapSurface>(view: &Weak<RefCell<MapView<S>>>, position: LatLng) -> bool {
    view.upgrade().map_or_else(
        || {
            log::debug!("Dropping position {position}: map view is gone");
            false
        },
        |view| view.borrow_mut().on_position(position),
    )
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn zoom_level(zoom: f64) -> u8 {
    zoom.round().clamp(0.0, f64::from(u8::MAX)) as u8
}

impl<S: MapSurface> Drop for MapView<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}
