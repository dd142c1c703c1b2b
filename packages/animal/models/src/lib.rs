#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Animal sighting records and filter criteria.
//!
//! These are the shapes shared by the record store, the filter engine, the
//! map markers and the JSON API. Records are immutable once loaded.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use stray_map_geography_models::LatLng;

/// Where an animal is in the rescue workflow.
///
/// Deserialization is tolerant: any string that is not one of the four
/// known statuses becomes [`AnimalStatus::Unrecognized`], which no filter
/// ever selects.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case", from = "String")]
#[strum(serialize_all = "kebab-case")]
pub enum AnimalStatus {
    /// Sighted and reported, nobody assigned yet
    Reported,
    /// A volunteer is working on it
    InProgress,
    /// Needs a vet
    NeedsMedical,
    /// Taken in by a shelter or adopter
    Rescued,
    /// A status string outside the known set
    Unrecognized,
}

impl AnimalStatus {
    /// Returns the four selectable statuses, in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Reported,
            Self::InProgress,
            Self::NeedsMedical,
            Self::Rescued,
        ]
    }

    /// Whether this is one of the selectable statuses.
    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unrecognized)
    }
}

impl From<String> for AnimalStatus {
    fn from(value: String) -> Self {
        value
            .parse::<Self>()
            .ok()
            .filter(|status| status.is_known())
            .unwrap_or(Self::Unrecognized)
    }
}

/// Fed-state filter mode.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FedMode {
    /// Fed state is ignored
    #[default]
    Any,
    /// Only animals that have been fed
    Fed,
    /// Only animals that have not been fed
    NotFed,
}

impl FedMode {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Any, Self::Fed, Self::NotFed]
    }

    /// Whether an animal with the given fed state passes this mode.
    #[must_use]
    pub const fn accepts(self, fed: bool) -> bool {
        match self {
            Self::Any => true,
            Self::Fed => fed,
            Self::NotFed => !fed,
        }
    }
}

/// A single stray animal sighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalRecord {
    /// Unique, stable identifier (e.g. `"rc-002"`).
    pub id: String,
    /// Free-text species tag ("Dog", "Cat", ...).
    pub species: String,
    /// Workflow status.
    pub status: AnimalStatus,
    /// Whether the animal has been fed.
    pub fed: bool,
    /// Where the animal was seen.
    pub location: LatLng,
    /// Human-readable place label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    /// Date of the most recent sighting. Values that are not `YYYY-MM-DD`
    /// are read as absent.
    #[serde(
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_observed_date: Option<NaiveDate>,
    /// Volunteer or association looking after the animal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_volunteer: Option<String>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Phone number to call about this animal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|date| NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()))
}

/// The user's current filter selection.
///
/// Every combination is valid, including an empty status set (which hides
/// every record).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Statuses to show. Defaults to every known status.
    pub statuses: BTreeSet<AnimalStatus>,
    /// Fed-state mode.
    pub fed_mode: FedMode,
    /// Only show animals that need medical attention.
    pub medical_only: bool,
    /// Free-text search, matched case-insensitively after trimming.
    pub search_term: String,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            statuses: AnimalStatus::all().iter().copied().collect(),
            fed_mode: FedMode::Any,
            medical_only: false,
            search_term: String::new(),
        }
    }
}

impl FilterCriteria {
    /// Criteria that hide every record.
    #[must_use]
    pub fn none() -> Self {
        Self {
            statuses: BTreeSet::new(),
            ..Self::default()
        }
    }

    /// Adds or removes `status` from the selection.
    ///
    /// [`AnimalStatus::Unrecognized`] is never added. Returns whether the
    /// selection changed.
    pub fn set_status(&mut self, status: AnimalStatus, enabled: bool) -> bool {
        if enabled {
            status.is_known() && self.statuses.insert(status)
        } else {
            self.statuses.remove(&status)
        }
    }
}
