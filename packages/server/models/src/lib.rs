#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the stray map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the record types to allow independent evolution of the API
//! contract.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use stray_map_animal_models::{AnimalRecord, AnimalStatus, FedMode};
use stray_map_geography_models::{
    BoundingBox, LatLng, MaskPolygon, RegionDefinition, RegionGeometry,
};

/// An animal sighting as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAnimal {
    /// Unique record id.
    pub id: String,
    /// Species tag.
    pub species: String,
    /// Workflow status.
    pub status: AnimalStatus,
    /// Whether the animal has been fed.
    pub fed: bool,
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
    /// Place label.
    pub location_name: Option<String>,
    /// Date of the most recent sighting.
    pub last_observed_date: Option<NaiveDate>,
    /// Volunteer looking after the animal.
    pub assigned_volunteer: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Contact phone number.
    pub contact_phone: Option<String>,
}

impl From<&AnimalRecord> for ApiAnimal {
    fn from(record: &AnimalRecord) -> Self {
        Self {
            id: record.id.clone(),
            species: record.species.clone(),
            status: record.status,
            fed: record.fed,
            latitude: record.location.lat,
            longitude: record.location.lng,
            location_name: record.location_name.clone(),
            last_observed_date: record.last_observed_date,
            assigned_volunteer: record.assigned_volunteer.clone(),
            notes: record.notes.clone(),
            contact_phone: record.contact_phone.clone(),
        }
    }
}

/// Query parameters for the animals endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalQueryParams {
    /// Comma-separated statuses to include; all when absent.
    pub statuses: Option<String>,
    /// Fed-state mode.
    pub fed: Option<FedMode>,
    /// Only animals that need medical attention.
    pub medical_only: Option<bool>,
    /// Free-text search.
    pub q: Option<String>,
}

/// Region geometry as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRegion {
    /// Region identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Minimal box around the boundary.
    pub bounds: BoundingBox,
    /// World polygon with the region cut out, in `lat,lng` order.
    pub mask: MaskPolygon,
    /// Camera center used before a live position is known.
    pub fallback_center: LatLng,
}

impl ApiRegion {
    /// Combines a region's definition with its computed geometry.
    #[must_use]
    pub fn new(definition: &RegionDefinition, geometry: &RegionGeometry) -> Self {
        Self {
            id: definition.id.clone(),
            name: definition.name.clone(),
            bounds: geometry.bounds,
            mask: geometry.mask.clone(),
            fallback_center: definition.fallback_center,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}
