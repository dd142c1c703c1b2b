//! Plain-text rendering of sightings and regions.

use std::fmt::Write as _;

use stray_map_animal_models::AnimalRecord;
use stray_map_geography::region_contains;
use stray_map_geography_models::{RegionDefinition, RegionGeometry};

/// Longest location label printed before truncation.
const MAX_LOCATION_CHARS: usize = 32;

/// Table of sightings, one per line, with a header and a count footer.
pub fn animal_table(records: &[&AnimalRecord], total: usize) -> String {
    if records.is_empty() {
        return format!("No animals match (0 of {total}).\n");
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:<8} {:<14} {:<8} {:<34} LAST SEEN",
        "ID", "SPECIES", "STATUS", "FED", "LOCATION"
    );
    let _ = writeln!(out, "{}", "-".repeat(90));

    for record in records {
        let location = record.location_name.as_deref().unwrap_or("Unknown spot");
        let last_seen = record
            .last_observed_date
            .map_or_else(|| "-".to_string(), |d| d.to_string());
        let _ = writeln!(
            out,
            "{:<8} {:<8} {:<14} {:<8} {:<34} {}",
            record.id,
            record.species,
            record.status,
            if record.fed { "yes" } else { "no" },
            truncate(location, MAX_LOCATION_CHARS),
            last_seen
        );
    }

    let _ = writeln!(out, "\n{} of {total} animal(s)", records.len());
    out
}

/// Human-readable summary of a region and the sightings inside it.
pub fn region_summary(
    definition: &RegionDefinition,
    geometry: &RegionGeometry,
    records: &[AnimalRecord],
) -> String {
    let bounds = geometry.bounds;
    let inside = records
        .iter()
        .filter(|r| region_contains(geometry, r.location))
        .count();
    let points: usize = geometry.mask.holes().iter().map(Vec::len).sum();

    let mut out = String::new();
    let _ = writeln!(out, "Region:          {} ({})", definition.name, definition.id);
    let _ = writeln!(
        out,
        "Bounds:          west {:.4}, south {:.4}, east {:.4}, north {:.4}",
        bounds.west, bounds.south, bounds.east, bounds.north
    );
    let _ = writeln!(out, "Center:          {}", bounds.center());
    let _ = writeln!(out, "Fallback center: {}", definition.fallback_center);
    let _ = writeln!(
        out,
        "Mask:            {} hole(s), {points} boundary point(s)",
        geometry.mask.holes().len()
    );
    let _ = writeln!(
        out,
        "Sightings:       {inside} of {} inside the boundary",
        records.len()
    );
    out
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars - 3).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
