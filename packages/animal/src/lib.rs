#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Animal record store and filter engine.
//!
//! The [`store::RecordStore`] holds the immutable set of sightings, the
//! [`filter`] module derives the visible subset for a
//! [`FilterCriteria`](stray_map_animal_models::FilterCriteria) snapshot,
//! and [`controller::FilterController`] keeps that subset up to date as the
//! user edits the criteria.

pub mod controller;
pub mod filter;
pub mod store;

use thiserror::Error;

/// Errors that can occur while loading animal records.
#[derive(Debug, Error)]
pub enum RecordStoreError {
    /// The record data is not valid JSON or does not match the record shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Two records share the same id.
    #[error("Duplicate record id: {id}")]
    DuplicateId {
        /// The repeated id.
        id: String,
    },
}
