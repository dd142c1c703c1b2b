//! Reactive owner of the filter criteria for one view.
//!
//! Every mutation bumps a revision; the visible subset is recomputed lazily
//! on the next read and only if the revision moved. Several edits between
//! two reads therefore cost a single filter pass over the latest snapshot.

use std::sync::Arc;

use stray_map_animal_models::{AnimalRecord, AnimalStatus, FedMode, FilterCriteria};

use crate::filter::filter_indices;

struct Computed {
    revision: u64,
    visible: Vec<usize>,
}

/// Owns one [`FilterCriteria`] snapshot and its derived visible records.
pub struct FilterController {
    records: Arc<[AnimalRecord]>,
    criteria: FilterCriteria,
    revision: u64,
    computed: Option<Computed>,
    recomputations: u64,
}

impl FilterController {
    /// Creates a controller with default criteria (everything visible).
    #[must_use]
    pub fn new(records: Arc<[AnimalRecord]>) -> Self {
        Self {
            records,
            criteria: FilterCriteria::default(),
            revision: 0,
            computed: None,
            recomputations: 0,
        }
    }

    /// The current criteria snapshot.
    #[must_use]
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// All records, visible or not.
    #[must_use]
    pub fn records(&self) -> &[AnimalRecord] {
        &self.records
    }

    /// How many filter passes have run so far.
    #[must_use]
    pub const fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// Toggles one status checkbox.
    pub fn set_status_enabled(&mut self, status: AnimalStatus, enabled: bool) {
        if self.criteria.set_status(status, enabled) {
            self.touch();
        }
    }

    /// Selects the fed-state radio option.
    pub fn set_fed_mode(&mut self, fed_mode: FedMode) {
        if self.criteria.fed_mode != fed_mode {
            self.criteria.fed_mode = fed_mode;
            self.touch();
        }
    }

    /// Sets the "only needs medical attention" checkbox.
    pub fn set_medical_only(&mut self, medical_only: bool) {
        if self.criteria.medical_only != medical_only {
            self.criteria.medical_only = medical_only;
            self.touch();
        }
    }

    /// Replaces the search box contents.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        if self.criteria.search_term != term {
            self.criteria.search_term = term;
            self.touch();
        }
    }

    /// Replaces the whole criteria snapshot.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        if self.criteria != criteria {
            self.criteria = criteria;
            self.touch();
        }
    }

    /// Restores the default criteria.
    pub fn reset(&mut self) {
        self.set_criteria(FilterCriteria::default());
    }

    /// Swaps in a new record set.
    pub fn set_records(&mut self, records: Arc<[AnimalRecord]>) {
        self.records = records;
        self.touch();
    }

    /// The records passing the current criteria, in store order.
    pub fn visible(&mut self) -> Vec<&AnimalRecord> {
        self.refresh();
        self.computed
            .as_ref()
            .map(|computed| {
                computed
                    .visible
                    .iter()
                    .map(|&index| &self.records[index])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of records passing the current criteria.
    pub fn visible_count(&mut self) -> usize {
        self.refresh();
        self.computed.as_ref().map_or(0, |c| c.visible.len())
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn refresh(&mut self) {
        if self
            .computed
            .as_ref()
            .is_some_and(|c| c.revision == self.revision)
        {
            return;
        }

        let visible = filter_indices(&self.records, &self.criteria);

        self.recomputations += 1;
        log::debug!(
            "Filter pass {} at revision {}: {}/{} records visible",
            self.recomputations,
            self.revision,
            visible.len(),
            self.records.len()
        );

        self.computed = Some(Computed {
            revision: self.revision,
            visible,
        });
    }
}
