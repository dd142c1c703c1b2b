#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region geometry for the stray map.
//!
//! Turns a region's `GeoJSON` boundary dataset into the darkening mask
//! polygon and the bounding box the map viewport is clamped to. Region
//! definitions and their boundary datasets are embedded at compile time,
//! following the same registry pattern as the other data definitions in
//! this workspace.
//!
//! The computed [`RegionGeometry`] is an explicit value: build it once with
//! [`registry::load_region`] (or [`mask::compute_mask_and_bounds`]) and
//! hand it to every consumer.

pub mod mask;
pub mod registry;

pub use mask::{compute_mask_and_bounds, region_contains, region_geometry_from_str};
pub use stray_map_geography_models::{
    BoundingBox, LatLng, MaskPolygon, RegionDefinition, RegionGeometry,
};

use thiserror::Error;

/// Errors that can occur while building region geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// The boundary dataset is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] Box<geojson::Error>),

    /// The dataset parsed but does not hold the expected polygon shape.
    #[error("Malformed geometry: {message}")]
    MalformedGeometry {
        /// Description of what was missing or invalid.
        message: String,
    },

    /// No region with this id is registered.
    #[error("Unknown region: {0}")]
    UnknownRegion(String),
}

impl GeometryError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedGeometry {
            message: message.into(),
        }
    }
}
