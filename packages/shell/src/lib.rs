#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Presentation shell for the stray map.
//!
//! Glues the identity provider, the filter controls and the map together:
//! a loading screen until the provider reports, a login form while nobody
//! is signed in, and the map dashboard while someone is.

pub mod app;
pub mod auth;
pub mod dashboard;
pub mod login;
pub mod session;

pub use app::{AppShell, Screen};
pub use auth::{AuthError, AuthProvider, InMemoryAuth, Subscription, User};
pub use dashboard::Dashboard;
pub use login::{LoginForm, LoginMode};
pub use session::{Session, SessionState};
