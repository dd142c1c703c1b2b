//! Device position boundary.
//!
//! A [`Geolocator`] is asked once for the current position. It may call
//! the success callback, the error callback, or neither; a request that
//! never answers leaves the map on its fallback center.

use std::cell::RefCell;
use std::collections::VecDeque;

use stray_map_geography_models::LatLng;
use thiserror::Error;

/// Why no position was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    /// The user refused location access.
    #[error("Location permission denied")]
    PermissionDenied,
    /// The device could not determine a position.
    #[error("Position unavailable")]
    PositionUnavailable,
    /// No fix arrived in time.
    #[error("Timed out waiting for a position")]
    Timeout,
}

/// Success callback of [`Geolocator::current_position`].
pub type PositionCallback = Box<dyn FnOnce(LatLng)>;

/// Error callback of [`Geolocator::current_position`].
pub type PositionErrorCallback = Box<dyn FnOnce(GeolocationError)>;

/// Single-shot position source.
pub trait Geolocator {
    /// Requests the current position. At most one of the callbacks runs,
    /// at most once, possibly after this call has returned.
    fn current_position(
        &self,
        on_success: PositionCallback,
        on_error: Option<PositionErrorCallback>,
    );
}

/// Outcome a [`ManualGeolocator`] delivers when resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionOutcome {
    /// Report this position.
    Fix(LatLng),
    /// Report this failure.
    Failure(GeolocationError),
}

type Pending = (PositionCallback, Option<PositionErrorCallback>);

/// A [`Geolocator`] that holds requests until told how to answer them.
///
/// Used by hosts without a device position (CLI, tests) and to simulate
/// late or missing fixes.
#[derive(Default)]
pub struct ManualGeolocator {
    pending: RefCell<VecDeque<Pending>>,
}

impl ManualGeolocator {
    /// Creates a geolocator with no pending requests.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests still waiting for an answer.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Answers the oldest pending request. Returns `false` if none was
    /// waiting.
    pub fn resolve(&self, outcome: PositionOutcome) -> bool {
        let Some((on_success, on_error)) = self.pending.borrow_mut().pop_front() else {
            return false;
        };

        match outcome {
            PositionOutcome::Fix(position) => on_success(position),
            PositionOutcome::Failure(error) => {
                log::debug!("Geolocation failed: {error}");
                if let Some(on_error) = on_error {
                    on_error(error);
                }
            }
        }
        true
    }
}

impl Geolocator for ManualGeolocator {
    fn current_position(
        &self,
        on_success: PositionCallback,
        on_error: Option<PositionErrorCallback>,
    ) {
        self.pending.borrow_mut().push_back((on_success, on_error));
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    #[test]
    fn fix_runs_success_callback() {
        let geolocator = ManualGeolocator::new();
        let seen = Rc::new(RefCell::new(None));

        let sink = Rc::clone(&seen);
        geolocator.current_position(Box::new(move |p| *sink.borrow_mut() = Some(p)), None);
        assert_eq!(geolocator.pending(), 1);

        assert!(geolocator.resolve(PositionOutcome::Fix(LatLng::new(38.9, 16.6))));
        assert_eq!(*seen.borrow(), Some(LatLng::new(38.9, 16.6)));
        assert_eq!(geolocator.pending(), 0);
    }

    #[test]
    fn failure_runs_error_callback_only() {
        let geolocator = ManualGeolocator::new();
        let error = Rc::new(RefCell::new(None));

        let sink = Rc::clone(&error);
        geolocator.current_position(
            Box::new(|_| panic!("no fix expected")),
            Some(Box::new(move |e| *sink.borrow_mut() = Some(e))),
        );

        geolocator.resolve(PositionOutcome::Failure(GeolocationError::PermissionDenied));
        assert_eq!(*error.borrow(), Some(GeolocationError::PermissionDenied));
    }

    #[test]
    fn resolve_without_request_is_noop() {
        assert!(!ManualGeolocator::new().resolve(PositionOutcome::Failure(
            GeolocationError::Timeout
        )));
    }
}
