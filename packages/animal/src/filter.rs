//! Pure, order-preserving filtering of animal records.
//!
//! A record is visible when all four clauses hold:
//!
//! 1. its status is in the selected status set
//! 2. its fed state passes the [`FedMode`](stray_map_animal_models::FedMode)
//! 3. it needs medical attention, if only those are requested
//! 4. the trimmed, lowercased search term is a substring of its search text
//!
//! Missing optional fields simply do not contribute to the search text.

use stray_map_animal_models::{AnimalRecord, AnimalStatus, FilterCriteria};

/// Returns the records that pass `criteria`, in input order.
pub fn filter_records<'a, I>(records: I, criteria: &FilterCriteria) -> Vec<&'a AnimalRecord>
where
    I: IntoIterator<Item = &'a AnimalRecord>,
{
    let term = normalize_term(&criteria.search_term);
    records
        .into_iter()
        .filter(|record| matches_with_term(record, criteria, term.as_deref()))
        .collect()
}

/// Positions of the records that pass `criteria`, ascending.
#[must_use]
pub fn filter_indices(records: &[AnimalRecord], criteria: &FilterCriteria) -> Vec<usize> {
    let term = normalize_term(&criteria.search_term);
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| matches_with_term(record, criteria, term.as_deref()))
        .map(|(index, _)| index)
        .collect()
}

/// Whether a single record passes `criteria`.
#[must_use]
pub fn matches(record: &AnimalRecord, criteria: &FilterCriteria) -> bool {
    let term = normalize_term(&criteria.search_term);
    matches_with_term(record, criteria, term.as_deref())
}

/// The lowercased, space-joined text the search term is matched against:
/// species, status, notes, volunteer and location label.
#[must_use]
pub fn search_text(record: &AnimalRecord) -> String {
    [
        Some(record.species.as_str()),
        Some(record.status.as_ref()),
        record.notes.as_deref(),
        record.assigned_volunteer.as_deref(),
        record.location_name.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

/// `None` when the term is empty after trimming.
fn normalize_term(term: &str) -> Option<String> {
    let term = term.trim();
    (!term.is_empty()).then(|| term.to_lowercase())
}

fn matches_with_term(record: &AnimalRecord, criteria: &FilterCriteria, term: Option<&str>) -> bool {
    let status_ok = record.status.is_known() && criteria.statuses.contains(&record.status);
    let fed_ok = criteria.fed_mode.accepts(record.fed);
    let health_ok = !criteria.medical_only || record.status == AnimalStatus::NeedsMedical;
    let search_ok = term.is_none_or(|term| search_text(record).contains(term));

    status_ok && fed_ok && health_ok && search_ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use stray_map_animal_models::FedMode;
    use stray_map_geography_models::LatLng;

    use crate::store::RecordStore;

    fn record(id: &str, status: AnimalStatus, fed: bool) -> AnimalRecord {
        AnimalRecord {
            id: id.to_string(),
            species: "Dog".to_string(),
            status,
            fed,
            location: LatLng::new(38.9, 16.6),
            location_name: None,
            last_observed_date: None,
            assigned_volunteer: None,
            notes: None,
            contact_phone: None,
        }
    }

    fn ids(records: &[&AnimalRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    fn all_criteria() -> Vec<FilterCriteria> {
        let mut out = Vec::new();
        let status_sets: Vec<Vec<AnimalStatus>> = vec![
            vec![],
            vec![AnimalStatus::Reported],
            vec![AnimalStatus::NeedsMedical, AnimalStatus::Rescued],
            AnimalStatus::all().to_vec(),
        ];
        for statuses in &status_sets {
            for fed_mode in FedMode::all() {
                for medical_only in [false, true] {
                    for search_term in ["", "  ", "dog", "LIMPING", "zampa"] {
                        out.push(FilterCriteria {
                            statuses: statuses.iter().copied().collect(),
                            fed_mode: *fed_mode,
                            medical_only,
                            search_term: search_term.to_string(),
                        });
                    }
                }
            }
        }
        out
    }

    #[test]
    fn empty_status_set_hides_everything() {
        let store = RecordStore::seed().unwrap();
        let mut criteria = FilterCriteria::none();
        for fed_mode in FedMode::all() {
            criteria.fed_mode = *fed_mode;
            assert!(filter_records(store.records(), &criteria).is_empty());
        }
    }

    #[test]
    fn status_scenario_keeps_only_first_record() {
        let records = vec![
            record("first", AnimalStatus::Reported, false),
            record("second", AnimalStatus::Rescued, true),
        ];
        let criteria = FilterCriteria {
            statuses: [AnimalStatus::Reported].into_iter().collect(),
            ..FilterCriteria::default()
        };

        assert_eq!(ids(&filter_records(&records, &criteria)), ["first"]);
    }

    #[test]
    fn search_is_case_insensitive_over_notes() {
        let store = RecordStore::seed().unwrap();
        let criteria = FilterCriteria {
            search_term: "limping".to_string(),
            ..FilterCriteria::default()
        };

        assert_eq!(ids(&filter_records(store.records(), &criteria)), ["rc-002"]);
    }

    #[test]
    fn search_covers_status_volunteer_and_location() {
        let store = RecordStore::seed().unwrap();
        let search = |term: &str| {
            let criteria = FilterCriteria {
                search_term: term.to_string(),
                ..FilterCriteria::default()
            };
            ids(&filter_records(store.records(), &criteria))
        };

        assert_eq!(search("in-progress"), ["cz-003"]);
        assert_eq!(search("associazione"), ["kr-004"]);
        assert_eq!(search("  VIBO  "), ["vv-005"]);
        assert_eq!(search("cat"), ["rc-002", "cz-003", "kr-004"]);
    }

    #[test]
    fn whitespace_only_search_matches_everything() {
        let store = RecordStore::seed().unwrap();
        let criteria = FilterCriteria {
            search_term: " \t ".to_string(),
            ..FilterCriteria::default()
        };

        assert_eq!(filter_records(store.records(), &criteria).len(), store.len());
    }

    #[test]
    fn absent_fields_are_not_rendered_as_placeholders() {
        let bare = record("bare", AnimalStatus::Reported, false);

        assert_eq!(search_text(&bare), "dog reported");
        for term in ["none", "undefined", "null"] {
            let criteria = FilterCriteria {
                search_term: term.to_string(),
                ..FilterCriteria::default()
            };
            assert!(!matches(&bare, &criteria), "{term} should not match");
        }
    }

    #[test]
    fn unrecognized_status_never_matches() {
        let stray = record("odd", AnimalStatus::Unrecognized, false);
        let mut criteria = FilterCriteria::default();
        criteria.statuses.insert(AnimalStatus::Unrecognized);

        assert!(!matches(&stray, &FilterCriteria::default()));
        assert!(!matches(&stray, &criteria));
    }

    #[test]
    fn medical_only_requires_needs_medical() {
        let records = vec![
            record("a", AnimalStatus::Reported, false),
            record("b", AnimalStatus::NeedsMedical, false),
            record("c", AnimalStatus::NeedsMedical, true),
        ];
        let criteria = FilterCriteria {
            medical_only: true,
            fed_mode: FedMode::NotFed,
            ..FilterCriteria::default()
        };

        assert_eq!(ids(&filter_records(&records, &criteria)), ["b"]);
    }

    #[test]
    fn single_record_passes_iff_every_clause_holds() {
        let store = RecordStore::seed().unwrap();
        for criteria in all_criteria() {
            for record in store.records() {
                let term = criteria.search_term.trim().to_lowercase();
                let expected = criteria.statuses.contains(&record.status)
                    && match criteria.fed_mode {
                        FedMode::Any => true,
                        FedMode::Fed => record.fed,
                        FedMode::NotFed => !record.fed,
                    }
                    && (!criteria.medical_only || record.status == AnimalStatus::NeedsMedical)
                    && (term.is_empty() || search_text(record).contains(&term));

                assert_eq!(
                    !filter_records(std::slice::from_ref(record), &criteria).is_empty(),
                    expected,
                    "record {} with {criteria:?}",
                    record.id
                );
            }
        }
    }

    #[test]
    fn filtering_is_idempotent_and_order_preserving() {
        let store = RecordStore::seed().unwrap();
        for criteria in all_criteria() {
            let once = filter_records(store.records(), &criteria);
            let twice = filter_records(once.iter().copied(), &criteria);
            assert_eq!(ids(&once), ids(&twice), "{criteria:?}");

            let positions: Vec<usize> = once
                .iter()
                .map(|r| store.records().iter().position(|s| s.id == r.id).unwrap())
                .collect();
            assert!(
                positions.windows(2).all(|w| w[0] < w[1]),
                "order changed for {criteria:?}"
            );
        }
    }
}
