//! Map markers and detail popups for animal records.

use serde::Serialize;
use stray_map_animal_models::{AnimalRecord, AnimalStatus};
use stray_map_geography_models::LatLng;

/// Badge drawn on the pin of a fed animal.
pub const FED_BADGE: &str = "🍗";
/// Badge drawn on the pin of an animal that still needs food.
pub const NOT_FED_BADGE: &str = "🐾";

/// Directions provider; `q=<lat>,<lng>` is appended.
const DIRECTIONS_BASE_URL: &str = "https://www.google.com/maps?q=";

/// A pixel offset or size, `(x, y)`.
pub type PixelPoint = (i32, i32);

/// Visual style of one marker, keyed by `(status, fed)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerIcon {
    /// CSS classes, e.g. `"animal-marker needs-medical"`.
    pub class_name: String,
    /// Fed-state badge.
    pub badge: &'static str,
    /// Icon size.
    pub size: PixelPoint,
    /// Icon point that sits on the coordinate.
    pub anchor: PixelPoint,
    /// Where the popup opens relative to the anchor.
    pub popup_anchor: PixelPoint,
}

impl MarkerIcon {
    /// Builds the icon for a record's status and fed state.
    #[must_use]
    pub fn for_status(status: AnimalStatus, fed: bool) -> Self {
        Self {
            class_name: format!("animal-marker {status}"),
            badge: if fed { FED_BADGE } else { NOT_FED_BADGE },
            size: (48, 48),
            anchor: (18, 36),
            popup_anchor: (0, -28),
        }
    }

    /// Inner HTML of the pin.
    #[must_use]
    pub fn html(&self) -> String {
        format!(r#"<div class="pin">{}</div>"#, self.badge)
    }
}

/// One pin on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// Id of the record this pin represents.
    pub animal_id: String,
    /// Where the pin sits.
    pub position: LatLng,
    /// How the pin looks.
    pub icon: MarkerIcon,
}

impl From<&AnimalRecord> for Marker {
    fn from(record: &AnimalRecord) -> Self {
        Self {
            animal_id: record.id.clone(),
            position: record.location,
            icon: MarkerIcon::for_status(record.status, record.fed),
        }
    }
}

/// One marker per record, in record order.
pub fn markers_for<'a>(records: impl IntoIterator<Item = &'a AnimalRecord>) -> Vec<Marker> {
    records.into_iter().map(Marker::from).collect()
}

/// A labelled line in the popup body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopupField {
    /// Field label without the trailing colon.
    pub label: &'static str,
    /// Display value.
    pub value: String,
}

/// A button in the popup footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PopupAction {
    /// Phone the contact.
    Call {
        /// `tel:` link.
        href: String,
    },
    /// Mark the animal as fed. Handling the action is up to the host.
    Feed {
        /// Record to update.
        animal_id: String,
    },
    /// Open turn-by-turn directions in a new tab.
    Directions {
        /// External maps link.
        href: String,
    },
}

/// Detail panel shown when a marker is clicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Popup {
    /// Status tag text, also used as its CSS class.
    pub status_tag: String,
    /// `"<species> — <location>"`.
    pub title: String,
    /// Body lines; optional ones are left out when absent.
    pub fields: Vec<PopupField>,
    /// Footer buttons.
    pub actions: Vec<PopupAction>,
}

impl Popup {
    /// Builds the popup for `record`.
    #[must_use]
    pub fn for_record(record: &AnimalRecord) -> Self {
        let species = non_empty(Some(&record.species)).unwrap_or("Unknown");
        let location = non_empty(record.location_name.as_ref()).unwrap_or("Unknown spot");

        let mut fields = vec![PopupField {
            label: "Fed",
            value: if record.fed { "Yes" } else { "No" }.to_string(),
        }];
        let optional = [
            ("Volunteer", record.assigned_volunteer.clone()),
            (
                "Last seen",
                record.last_observed_date.map(|date| date.to_string()),
            ),
            ("Notes", record.notes.clone()),
        ];
        fields.extend(
            optional
                .into_iter()
                .filter_map(|(label, value)| {
                    value
                        .filter(|value| !value.is_empty())
                        .map(|value| PopupField { label, value })
                }),
        );

        let mut actions = Vec::new();
        if let Some(phone) = non_empty(record.contact_phone.as_ref()) {
            actions.push(PopupAction::Call {
                href: format!("tel:{phone}"),
            });
        }
        if !record.fed {
            actions.push(PopupAction::Feed {
                animal_id: record.id.clone(),
            });
        }
        actions.push(PopupAction::Directions {
            href: directions_url(record.location),
        });

        Self {
            status_tag: record.status.to_string(),
            title: format!("{species} — {location}"),
            fields,
            actions,
        }
    }
}

/// External directions link for a coordinate.
#[must_use]
pub fn directions_url(position: LatLng) -> String {
    format!("{DIRECTIONS_BASE_URL}{position}")
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.trim().is_empty())
}
