#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map viewport for the stray map.
//!
//! Confines the camera to one region, darkens everything outside it,
//! recenters once on the user's live position and draws one marker per
//! visible animal. Rendering itself is left to a [`MapSurface`]
//! implementation; this crate only decides what goes on it.
//!
//! Typical use:
//!
//! 1. build a [`MapView`] from a surface, the region geometry and a
//!    [`ViewportConfig`]
//! 2. [`MapView::mount`] it
//! 3. feed it markers and at most one useful position
//! 4. [`MapView::unmount`] (or drop) it to release every overlay

pub mod config;
pub mod controller;
pub mod geolocation;
pub mod markers;
pub mod surface;
pub mod tiles;
pub mod view;

pub use config::ViewportConfig;
pub use controller::{CameraCommand, ViewportController, ViewportPhase, ViewportState};
pub use geolocation::{GeolocationError, Geolocator, ManualGeolocator, PositionOutcome};
pub use markers::{Marker, MarkerIcon, Popup, PopupAction, markers_for};
pub use surface::{MapSurface, Overlay, OverlayId, RecordingSurface};
pub use tiles::{TileCoord, TileLayerConfig};
pub use view::{MapView, recenter_when_ready};
