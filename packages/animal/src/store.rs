//! In-memory store of animal sightings.

use std::collections::BTreeSet;
use std::sync::Arc;

use stray_map_animal_models::AnimalRecord;

use crate::RecordStoreError;

/// Seed sightings embedded at compile time.
const SEED_JSON: &str = include_str!("../data/seed.json");

/// Immutable, id-unique collection of animal records.
///
/// Cloning is cheap; the records are shared.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Arc<[AnimalRecord]>,
}

impl RecordStore {
    /// Builds a store, keeping the given order.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError::DuplicateId`] if two records share an id.
    pub fn new(records: Vec<AnimalRecord>) -> Result<Self, RecordStoreError> {
        let mut seen = BTreeSet::new();
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                return Err(RecordStoreError::DuplicateId {
                    id: record.id.clone(),
                });
            }
        }

        Ok(Self {
            records: records.into(),
        })
    }

    /// Parses a JSON array of records.
    ///
    /// # Errors
    ///
    /// * [`RecordStoreError::Json`] if the JSON is invalid
    /// * [`RecordStoreError::DuplicateId`] if two records share an id
    pub fn from_json(json: &str) -> Result<Self, RecordStoreError> {
        let records: Vec<AnimalRecord> = serde_json::from_str(json)?;
        Self::new(records)
    }

    /// Loads the embedded seed sightings.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded fixture is invalid, which indicates
    /// a development error.
    pub fn seed() -> Result<Self, RecordStoreError> {
        let store = Self::from_json(SEED_JSON)?;
        log::debug!("Loaded {} seed records", store.len());
        Ok(store)
    }

    /// All records, in load order.
    #[must_use]
    pub fn records(&self) -> &[AnimalRecord] {
        &self.records
    }

    /// Shared handle to the records.
    #[must_use]
    pub fn shared(&self) -> Arc<[AnimalRecord]> {
        Arc::clone(&self.records)
    }

    /// Looks up a record by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&AnimalRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
