//! Email/password form shown while nobody is signed in.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::auth::{AuthError, AuthProvider, User};

/// Whether the form signs in or creates an account.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum LoginMode {
    /// Sign in with an existing account
    #[default]
    Login,
    /// Create a new account
    Register,
}

impl LoginMode {
    /// Form heading and submit button text.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Register => "Register",
        }
    }

    /// Text next to the mode toggle.
    #[must_use]
    pub const fn toggle_prompt(self) -> &'static str {
        match self {
            Self::Login => "Don't have an account?",
            Self::Register => "Already have an account?",
        }
    }

    /// The other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Login => Self::Register,
            Self::Register => Self::Login,
        }
    }
}

/// Login form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Email field.
    pub email: String,
    /// Password field.
    pub password: String,
    mode: LoginMode,
    error: Option<String>,
}

impl LoginForm {
    /// An empty form in login mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> LoginMode {
        self.mode
    }

    /// Message from the last failed submit, if it has not been cleared.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Switches between login and register, clearing any error.
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
        self.error = None;
    }

    /// Submits the form to `auth`.
    ///
    /// On success the fields and error are cleared; on failure the
    /// provider's message is kept for display and the fields are left for
    /// the user to correct and resubmit.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`AuthError`].
    pub async fn submit(&mut self, auth: &dyn AuthProvider) -> Result<User, AuthError> {
        let result = match self.mode {
            LoginMode::Login => auth.sign_in(&self.email, &self.password).await,
            LoginMode::Register => auth.register(&self.email, &self.password).await,
        };

        match &result {
            Ok(_) => {
                self.email.clear();
                self.password.clear();
                self.error = None;
            }
            Err(e) => {
                log::warn!("{} failed: {e}", self.mode.title());
                self.error = Some(e.to_string());
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::InMemoryAuth;

    fn filled(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.to_string(),
            password: password.to_string(),
            ..LoginForm::default()
        }
    }

    #[tokio::test]
    async fn failed_login_keeps_fields_and_shows_error() {
        let auth = InMemoryAuth::ready();
        let mut form = filled("giulia@example.org", "secret1");

        assert!(form.submit(&auth).await.is_err());
        assert_eq!(form.error(), Some("Invalid email or password"));
        assert_eq!(form.email, "giulia@example.org");
    }

    #[tokio::test]
    async fn successful_register_clears_form() {
        let auth = InMemoryAuth::ready();
        let mut form = filled("giulia@example.org", "abc");
        form.toggle_mode();
        assert_eq!(form.mode(), LoginMode::Register);

        assert!(form.submit(&auth).await.is_err());
        assert!(form.error().is_some());

        form.password = "secret1".to_string();
        let user = form.submit(&auth).await.unwrap();

        assert_eq!(user.email, "giulia@example.org");
        assert!(form.email.is_empty());
        assert!(form.password.is_empty());
        assert_eq!(form.error(), None);
    }

    #[tokio::test]
    async fn toggling_mode_clears_error() {
        let auth = InMemoryAuth::ready();
        let mut form = LoginForm::new();

        form.submit(&auth).await.unwrap_err();
        assert_eq!(form.error(), Some("Email and password are required"));

        form.toggle_mode();
        assert_eq!(form.error(), None);
        form.toggle_mode();
        assert_eq!(form.mode(), LoginMode::Login);
    }

    #[test]
    fn labels_follow_mode() {
        assert_eq!(LoginMode::Login.title(), "Login");
        assert_eq!(LoginMode::Register.toggle_prompt(), "Already have an account?");
        assert_eq!(LoginMode::Register.to_string(), "register");
    }
}
