//! HTTP handler functions for the stray map API.

use actix_web::{HttpResponse, web};
use stray_map_animal::filter::filter_records;
use stray_map_animal_models::{AnimalStatus, FilterCriteria};
use stray_map_server_models::{AnimalQueryParams, ApiAnimal, ApiHealth, ApiRegion};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/animals`
///
/// Returns the sightings passing the given filters, in store order.
pub async fn animals(
    state: web::Data<AppState>,
    params: web::Query<AnimalQueryParams>,
) -> HttpResponse {
    let criteria = criteria_from_params(&params);
    let animals: Vec<ApiAnimal> = filter_records(state.store.records(), &criteria)
        .into_iter()
        .map(ApiAnimal::from)
        .collect();

    log::debug!(
        "Serving {}/{} animals for {criteria:?}",
        animals.len(),
        state.store.len()
    );
    HttpResponse::Ok().json(animals)
}

/// `GET /api/region`
///
/// Returns the mask polygon and bounds of the configured region.
pub async fn region(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiRegion::new(&state.region, &state.geometry))
}

/// Maps query parameters onto filter criteria. Unknown status names are
/// skipped; absent parameters keep their defaults.
fn criteria_from_params(params: &AnimalQueryParams) -> FilterCriteria {
    let mut criteria = FilterCriteria::default();

    if let Some(statuses) = params.statuses.as_deref() {
        criteria.statuses = statuses
            .split(',')
            .filter_map(|s| s.trim().parse::<AnimalStatus>().ok())
            .filter(|status| status.is_known())
            .collect();
    }
    if let Some(fed) = params.fed {
        criteria.fed_mode = fed;
    }
    criteria.medical_only = params.medical_only.unwrap_or(false);
    criteria.search_term = params.q.clone().unwrap_or_default();

    criteria
}
