//! Signed-in screen: filter sidebar next to the map.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use stray_map_animal::controller::FilterController;
use stray_map_animal_models::AnimalRecord;
use stray_map_geography::region_contains;
use stray_map_geography_models::RegionGeometry;
use stray_map_viewport::{Geolocator, MapSurface, MapView, Popup, ViewportConfig};

/// The filter controls and map of one signed-in session.
pub struct Dashboard<S: MapSurface> {
    filters: FilterController,
    view: Rc<RefCell<MapView<S>>>,
    sidebar_visible: bool,
    rendered_pass: Option<u64>,
}

impl<S: MapSurface + 'static> Dashboard<S> {
    /// Builds and mounts the map and draws the initial markers.
    ///
    /// Records outside the region are kept (and filtered like any other)
    /// but logged, since the mask will hide their markers.
    #[must_use]
    pub fn new(
        surface: S,
        records: Arc<[AnimalRecord]>,
        region: Arc<RegionGeometry>,
        config: ViewportConfig,
    ) -> Self {
        for record in records.iter() {
            if !region_contains(&region, record.location) {
                log::warn!(
                    "Record {} at {} lies outside the region",
                    record.id,
                    record.location
                );
            }
        }

        let mut view = MapView::new(surface, region, config);
        view.mount();

        let mut dashboard = Self {
            filters: FilterController::new(records),
            view: Rc::new(RefCell::new(view)),
            sidebar_visible: true,
            rendered_pass: None,
        };
        dashboard.render();
        dashboard
    }

    /// Asks `geolocator` for the one-shot recenter.
    pub fn locate(&self, geolocator: &dyn Geolocator) {
        MapView::request_position(&self.view, geolocator);
    }
}

impl<S: MapSurface> Dashboard<S> {
    /// The filter controls. Call [`Self::render`] after editing them.
    pub const fn filters(&mut self) -> &mut FilterController {
        &mut self.filters
    }

    /// Shared handle to the map view.
    #[must_use]
    pub const fn view(&self) -> &Rc<RefCell<MapView<S>>> {
        &self.view
    }

    /// Whether the filter sidebar is expanded.
    #[must_use]
    pub const fn sidebar_visible(&self) -> bool {
        self.sidebar_visible
    }

    /// Label of the sidebar toggle button.
    #[must_use]
    pub const fn sidebar_toggle_label(&self) -> &'static str {
        if self.sidebar_visible { "<<" } else { ">>" }
    }

    /// Collapses or expands the sidebar. Filters are unaffected.
    pub const fn toggle_sidebar(&mut self) {
        self.sidebar_visible = !self.sidebar_visible;
    }

    /// Pushes the visible records to the map if the filter result changed
    /// since the last render. Returns whether markers were redrawn.
    pub fn render(&mut self) -> bool {
        self.filters.visible_count();
        let pass = self.filters.recomputations();
        if self.rendered_pass == Some(pass) {
            return false;
        }

        self.view.borrow_mut().show_markers(self.filters.visible());
        self.rendered_pass = Some(pass);
        true
    }

    /// Number of markers currently on the map.
    pub fn visible_count(&mut self) -> usize {
        self.filters.visible_count()
    }

    /// Detail panel for a visible record.
    pub fn popup(&mut self, animal_id: &str) -> Option<Popup> {
        self.filters
            .visible()
            .into_iter()
            .find(|record| record.id == animal_id)
            .map(Popup::for_record)
    }

    /// Removes the map's overlays and markers.
    pub fn teardown(&self) {
        self.view.borrow_mut().unmount();
    }
}

impl<S: MapSurface> Drop for Dashboard<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stray_map_animal::store::RecordStore;
    use stray_map_animal_models::{AnimalStatus, FedMode};
    use stray_map_geography::registry::load_region;
    use stray_map_geography_models::LatLng;
    use stray_map_viewport::{ManualGeolocator, PopupAction, PositionOutcome, RecordingSurface};

    fn dashboard() -> Dashboard<RecordingSurface> {
        let (_, region) = load_region("calabria").unwrap();
        Dashboard::new(
            RecordingSurface::new(),
            RecordStore::seed().unwrap().shared(),
            Arc::new(region),
            ViewportConfig::default(),
        )
    }

    fn marker_ids(dashboard: &Dashboard<RecordingSurface>) -> Vec<String> {
        dashboard
            .view()
            .borrow()
            .surface()
            .markers()
            .iter()
            .map(|m| m.animal_id.clone())
            .collect()
    }

    #[test]
    fn starts_with_every_marker() {
        let dashboard = dashboard();

        assert_eq!(marker_ids(&dashboard).len(), 5);
        assert!(dashboard.view().borrow().is_mounted());
    }

    #[test]
    fn markers_follow_filters() {
        let mut dashboard = dashboard();
        dashboard.filters().set_fed_mode(FedMode::NotFed);
        dashboard.filters().set_search_term("vibo");

        assert!(dashboard.render());
        assert_eq!(marker_ids(&dashboard), ["vv-005"]);
        assert!(!dashboard.render());
    }

    #[test]
    fn sidebar_toggle_keeps_filters() {
        let mut dashboard = dashboard();
        dashboard.filters().set_status_enabled(AnimalStatus::Reported, false);
        dashboard.toggle_sidebar();

        assert!(!dashboard.sidebar_visible());
        assert_eq!(dashboard.sidebar_toggle_label(), ">>");
        assert_eq!(dashboard.visible_count(), 3);
    }

    #[test]
    fn popup_only_for_visible_records() {
        let mut dashboard = dashboard();
        let popup = dashboard.popup("cs-001").unwrap();
        assert!(
            popup
                .actions
                .iter()
                .any(|a| matches!(a, PopupAction::Feed { .. }))
        );

        dashboard.filters().set_medical_only(true);
        assert!(dashboard.popup("cs-001").is_none());
        assert!(dashboard.popup("rc-002").is_some());
    }

    #[test]
    fn teardown_releases_map() {
        let dashboard = dashboard();
        let view = Rc::clone(dashboard.view());
        drop(dashboard);

        let view = view.borrow();
        assert!(!view.is_mounted());
        assert!(view.surface().overlays().is_empty());
    }

    #[test]
    fn locate_recenters_once() {
        let dashboard = dashboard();
        let geolocator = ManualGeolocator::new();
        dashboard.locate(&geolocator);
        dashboard.locate(&geolocator);

        geolocator.resolve(PositionOutcome::Fix(LatLng::new(38.9, 16.6)));
        geolocator.resolve(PositionOutcome::Fix(LatLng::new(38.1, 15.7)));

        let view = dashboard.view().borrow();
        assert_eq!(view.surface().center(), Some(LatLng::new(38.9, 16.6)));
    }
}
