//! Top-level screen selection.

use std::rc::Rc;
use std::sync::Arc;

use serde::Serialize;
use strum_macros::{AsRefStr, Display};
use stray_map_animal_models::AnimalRecord;
use stray_map_geography_models::RegionGeometry;
use stray_map_viewport::{Geolocator, MapSurface, ViewportConfig};

use crate::auth::{AuthError, AuthProvider, User};
use crate::dashboard::Dashboard;
use crate::login::LoginForm;
use crate::session::{Session, SessionState};

/// What the app currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Screen {
    /// Waiting for the auth provider's first answer.
    Loading,
    /// Nobody signed in.
    Login,
    /// Signed in; the dashboard is mounted.
    Map,
}

/// Factory for the map surface of each new dashboard.
pub type SurfaceFactory<S> = Box<dyn FnMut() -> S>;

/// Root of the presentation layer.
///
/// The dashboard exists exactly while a user is signed in: it is built on
/// the first [`Self::screen`] call after sign-in and torn down (overlays
/// released) on the first call after sign-out.
pub struct AppShell<S: MapSurface> {
    auth: Arc<dyn AuthProvider>,
    session: Session,
    login: LoginForm,
    records: Arc<[AnimalRecord]>,
    region: Arc<RegionGeometry>,
    config: ViewportConfig,
    surfaces: SurfaceFactory<S>,
    geolocator: Option<Rc<dyn Geolocator>>,
    dashboard: Option<Dashboard<S>>,
}

impl<S: MapSurface + 'static> AppShell<S> {
    /// Subscribes to `auth` and starts on the loading screen.
    #[must_use]
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        records: Arc<[AnimalRecord]>,
        region: Arc<RegionGeometry>,
        config: ViewportConfig,
        surfaces: SurfaceFactory<S>,
    ) -> Self {
        let session = Session::start(auth.as_ref());
        Self {
            auth,
            session,
            login: LoginForm::new(),
            records,
            region,
            config,
            surfaces,
            geolocator: None,
            dashboard: None,
        }
    }

    /// Position source used to recenter each new dashboard.
    #[must_use]
    pub fn with_geolocator(mut self, geolocator: Rc<dyn Geolocator>) -> Self {
        self.geolocator = Some(geolocator);
        self
    }

    /// Current session state.
    #[must_use]
    pub fn session(&self) -> SessionState {
        self.session.state()
    }

    /// Syncs the dashboard with the session and returns the screen to show.
    pub fn screen(&mut self) -> Screen {
        match self.session.state() {
            SessionState::Loading => {
                self.close_dashboard();
                Screen::Loading
            }
            SessionState::SignedOut => {
                self.close_dashboard();
                Screen::Login
            }
            SessionState::SignedIn(user) => {
                if self.dashboard.is_none() {
                    log::info!("Opening dashboard for {}", user.email);
                    let dashboard = Dashboard::new(
                        (self.surfaces)(),
                        Arc::clone(&self.records),
                        Arc::clone(&self.region),
                        self.config,
                    );
                    if let Some(geolocator) = &self.geolocator {
                        dashboard.locate(geolocator.as_ref());
                    }
                    self.dashboard = Some(dashboard);
                }
                Screen::Map
            }
        }
    }

    /// The login form.
    pub const fn login_form(&mut self) -> &mut LoginForm {
        &mut self.login
    }

    /// Submits the login form.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`AuthError`]; the form keeps its message.
    pub async fn submit_login(&mut self) -> Result<User, AuthError> {
        self.login.submit(self.auth.as_ref()).await
    }

    /// Signs out; the dashboard closes on the next [`Self::screen`] call.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`AuthError`].
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.auth.sign_out().await
    }

    /// The dashboard, while signed in.
    pub const fn dashboard(&mut self) -> Option<&mut Dashboard<S>> {
        self.dashboard.as_mut()
    }

    fn close_dashboard(&mut self) {
        if self.dashboard.take().is_some() {
            log::info!("Dashboard closed");
        }
    }
}
