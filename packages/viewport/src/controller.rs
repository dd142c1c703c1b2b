//! Camera state machine for one map view.
//!
//! ```text
//! Initial --apply_region--> BoundsApplied --on_position--> Recentered
//!    \_____________________on_position_____________________/
//! ```
//!
//! `Recentered` is terminal: the fly-to happens at most once per
//! controller, and later positions (GPS drift, repeated fixes) are ignored.
//! A disposed controller emits no further camera commands.

use serde::{Deserialize, Serialize};
use stray_map_geography_models::{BoundingBox, LatLng};

use crate::config::ViewportConfig;

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewportPhase {
    /// Fallback center, no region bounds yet.
    Initial,
    /// Panning is clamped to the padded region bounds.
    BoundsApplied,
    /// The one-shot recenter to the live position has happened.
    Recentered,
}

/// Camera state owned by a [`ViewportController`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportState {
    /// Current camera center.
    pub center: LatLng,
    /// Current zoom.
    pub zoom: f64,
    /// Pan limit (padded region bounds), once known.
    pub max_bounds: Option<BoundingBox>,
    /// Set once the live position has been flown to; never cleared.
    pub has_recentered: bool,
}

/// An instruction for the map surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraCommand {
    /// Jump to `center` at `zoom`.
    SetView {
        /// Target center.
        center: LatLng,
        /// Target zoom.
        zoom: f64,
    },
    /// Frame `bounds` exactly; the controller already resolved the zoom.
    FitBounds {
        /// Box to frame.
        bounds: BoundingBox,
        /// Zoom at which `bounds` fits.
        zoom: f64,
    },
    /// Restrict panning to `bounds`.
    SetMaxBounds(BoundingBox),
    /// Animate to `center` at `zoom`.
    FlyTo {
        /// Target center.
        center: LatLng,
        /// Target zoom.
        zoom: f64,
    },
}

/// Owns the [`ViewportState`] of one map view.
#[derive(Debug)]
pub struct ViewportController {
    config: ViewportConfig,
    state: ViewportState,
    phase: ViewportPhase,
    disposed: bool,
}

impl ViewportController {
    /// Starts in [`ViewportPhase::Initial`] at the configured fallback
    /// center and default zoom.
    #[must_use]
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            state: ViewportState {
                center: config.fallback_center,
                zoom: config.clamp_zoom(config.default_zoom),
                max_bounds: None,
                has_recentered: false,
            },
            config,
            phase: ViewportPhase::Initial,
            disposed: false,
        }
    }

    /// Current camera state.
    #[must_use]
    pub const fn state(&self) -> &ViewportState {
        &self.state
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> ViewportPhase {
        self.phase
    }

    /// The configuration this controller was built with.
    #[must_use]
    pub const fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Whether [`Self::dispose`] has been called.
    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Command that puts the camera at the current state.
    #[must_use]
    pub const fn initial_view(&self) -> CameraCommand {
        CameraCommand::SetView {
            center: self.state.center,
            zoom: self.state.zoom,
        }
    }

    /// Clamps panning to `bounds` grown by the configured padding and,
    /// unless the live position was already flown to, frames `bounds`.
    pub fn apply_region(&mut self, bounds: BoundingBox) -> Vec<CameraCommand> {
        if self.disposed {
            return Vec::new();
        }

        let max_bounds = bounds.pad(self.config.bounds_padding);
        self.state.max_bounds = Some(max_bounds);
        let mut commands = vec![CameraCommand::SetMaxBounds(max_bounds)];

        if self.state.has_recentered {
            log::debug!("Region bounds applied after recenter; keeping camera");
            return commands;
        }

        let zoom = self.config.fit_zoom(&bounds);
        self.state.center = bounds.center();
        self.state.zoom = zoom;
        self.phase = ViewportPhase::BoundsApplied;
        commands.insert(0, CameraCommand::FitBounds { bounds, zoom });

        log::info!(
            "Viewport bounds applied: center {} zoom {zoom}",
            self.state.center
        );
        commands
    }

    /// Handles a live position fix.
    ///
    /// Only the first fix of a live controller produces a
    /// [`CameraCommand::FlyTo`]; every later call returns `None`.
    pub fn on_position(&mut self, position: LatLng) -> Option<CameraCommand> {
        if self.disposed {
            log::debug!("Ignoring position {position}: viewport disposed");
            return None;
        }
        if self.state.has_recentered {
            log::debug!("Ignoring position {position}: already recentered");
            return None;
        }

        let center = self
            .state
            .max_bounds
            .map_or(position, |bounds| bounds.clamp(position));
        let zoom = self.config.clamp_zoom(self.config.recenter_zoom);

        self.state.center = center;
        self.state.zoom = zoom;
        self.state.has_recentered = true;
        self.phase = ViewportPhase::Recentered;

        log::info!("Recentering viewport on live position {center}");
        Some(CameraCommand::FlyTo { center, zoom })
    }

    /// User zoom, clamped to the configured limits.
    pub fn set_zoom(&mut self, zoom: f64) -> CameraCommand {
        self.state.zoom = self.config.clamp_zoom(zoom);
        self.initial_view()
    }

    /// User pan, clamped to the pan limit once one is set.
    pub fn pan_to(&mut self, center: LatLng) -> CameraCommand {
        self.state.center = self
            .state
            .max_bounds
            .map_or(center, |bounds| bounds.clamp(center));
        self.initial_view()
    }

    /// Ends the controller's life; no further commands are produced by
    /// [`Self::apply_region`] or [`Self::on_position`].
    pub fn dispose(&mut self) {
        self.disposed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> BoundingBox {
        BoundingBox::new(15.63, 37.92, 17.16, 40.11)
    }

    #[test]
    fn starts_at_fallback_center() {
        let controller = ViewportController::new(ViewportConfig::default());

        assert_eq!(controller.phase(), ViewportPhase::Initial);
        assert_eq!(controller.state().center, LatLng::new(39.0, 16.25));
        assert!((controller.state().zoom - 13.0).abs() < f64::EPSILON);
        assert!(controller.state().max_bounds.is_none());
        assert!(!controller.state().has_recentered);
    }

    #[test]
    fn applying_region_frames_bounds_and_pads_pan_limit() {
        let mut controller = ViewportController::new(ViewportConfig::default());
        let commands = controller.apply_region(region());

        let padded = region().pad(0.2);
        assert_eq!(
            commands,
            vec![
                CameraCommand::FitBounds {
                    bounds: region(),
                    zoom: 10.0
                },
                CameraCommand::SetMaxBounds(padded),
            ]
        );
        assert_eq!(controller.phase(), ViewportPhase::BoundsApplied);
        assert_eq!(controller.state().max_bounds, Some(padded));
        assert_eq!(controller.state().center, region().center());
    }

    #[test]
    fn recenter_fires_exactly_once() {
        let mut controller = ViewportController::new(ViewportConfig::default());
        controller.apply_region(region());

        let first = controller.on_position(LatLng::new(38.9, 16.6));
        assert_eq!(
            first,
            Some(CameraCommand::FlyTo {
                center: LatLng::new(38.9, 16.6),
                zoom: 14.0
            })
        );
        assert_eq!(controller.phase(), ViewportPhase::Recentered);

        let second = controller.on_position(LatLng::new(38.1, 15.7));
        assert_eq!(second, None);
        assert_eq!(controller.state().center, LatLng::new(38.9, 16.6));
        assert!(controller.state().has_recentered);
    }

    #[test]
    fn position_outside_pan_limit_is_clamped() {
        let mut controller = ViewportController::new(ViewportConfig::default());
        controller.apply_region(region());

        let Some(CameraCommand::FlyTo { center, .. }) =
            controller.on_position(LatLng::new(45.46, 9.19))
        else {
            panic!("expected a fly-to");
        };

        let padded = region().pad(0.2);
        assert!((center.lat - padded.north).abs() < 1e-9);
        assert!((center.lng - padded.west).abs() < 1e-9);
    }

    #[test]
    fn region_after_recenter_keeps_camera() {
        let mut controller = ViewportController::new(ViewportConfig::default());
        controller.on_position(LatLng::new(38.9, 16.6));

        let commands = controller.apply_region(region());

        assert_eq!(commands, vec![CameraCommand::SetMaxBounds(region().pad(0.2))]);
        assert_eq!(controller.phase(), ViewportPhase::Recentered);
        assert_eq!(controller.state().center, LatLng::new(38.9, 16.6));
    }

    #[test]
    fn no_position_stays_in_bounds_applied() {
        let mut controller = ViewportController::new(ViewportConfig::default());
        controller.apply_region(region());

        assert_eq!(controller.phase(), ViewportPhase::BoundsApplied);
        assert!(!controller.state().has_recentered);
    }

    #[test]
    fn disposed_controller_ignores_position() {
        let mut controller = ViewportController::new(ViewportConfig::default());
        controller.apply_region(region());
        controller.dispose();

        assert_eq!(controller.on_position(LatLng::new(38.9, 16.6)), None);
        assert!(controller.apply_region(region()).is_empty());
        assert!(!controller.state().has_recentered);
    }

    #[test]
    fn zoom_and_pan_are_clamped() {
        let mut controller = ViewportController::new(ViewportConfig::default());
        controller.apply_region(region());

        controller.set_zoom(3.0);
        assert!((controller.state().zoom - 10.0).abs() < f64::EPSILON);
        controller.set_zoom(22.0);
        assert!((controller.state().zoom - 18.0).abs() < f64::EPSILON);

        controller.pan_to(LatLng::new(0.0, 0.0));
        assert!(region().pad(0.2).contains(controller.state().center));
    }
}
