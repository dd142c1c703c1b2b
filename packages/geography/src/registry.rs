//! Compile-time registry of target regions.
//!
//! Each entry pairs a TOML region definition with its `GeoJSON` boundary
//! dataset, both embedded via `include_str!`. Adding a region requires a
//! TOML file and a boundary file in `regions/` plus an entry here.

use stray_map_geography_models::{RegionDefinition, RegionGeometry};

use crate::{GeometryError, region_geometry_from_str};

/// Region used when no other region is requested.
pub const DEFAULT_REGION_ID: &str = "calabria";

/// Embedded `(id, definition_toml, boundary_geojson)` triples.
const REGIONS: &[(&str, &str, &str)] = &[(
    "calabria",
    include_str!("../regions/calabria.toml"),
    include_str!("../regions/calabria.geojson"),
)];

/// Returns all registered region definitions.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. Since these are
/// compile-time constants, parse failures indicate a development error.
#[must_use]
pub fn all_regions() -> Vec<RegionDefinition> {
    REGIONS
        .iter()
        .map(|(id, toml_str, _)| parse_definition(id, toml_str))
        .collect()
}

/// Looks up a single region definition by id.
#[must_use]
pub fn region(id: &str) -> Option<RegionDefinition> {
    REGIONS
        .iter()
        .find(|(region_id, _, _)| *region_id == id)
        .map(|(id, toml_str, _)| parse_definition(id, toml_str))
}

/// Loads a region definition and computes its geometry from the embedded
/// boundary dataset.
///
/// # Errors
///
/// * [`GeometryError::UnknownRegion`] if `id` is not registered
/// * [`GeometryError::MalformedGeometry`] or [`GeometryError::GeoJson`] if
///   the boundary dataset is unusable
pub fn load_region(id: &str) -> Result<(RegionDefinition, RegionGeometry), GeometryError> {
    let (region_id, toml_str, boundary) = REGIONS
        .iter()
        .find(|(region_id, _, _)| *region_id == id)
        .ok_or_else(|| GeometryError::UnknownRegion(id.to_string()))?;

    let definition = parse_definition(region_id, toml_str);
    let geometry = region_geometry_from_str(boundary)?;

    log::info!(
        "Loaded region '{}' ({} boundary ring(s))",
        definition.name,
        geometry.mask.holes().len()
    );

    Ok((definition, geometry))
}

fn parse_definition(id: &str, toml_str: &str) -> RegionDefinition {
    toml::de::from_str(toml_str)
        .unwrap_or_else(|e| panic!("Failed to parse region definition '{id}': {e}"))
}
