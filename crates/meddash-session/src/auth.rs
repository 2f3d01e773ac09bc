//! Login gate: credential checking and the current session.
//!
//! Session state is an explicit [`SessionManager`] handed to whoever needs
//! it; nothing is kept in globals.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use meddash_model::{Notice, Notifier, TracingNotifier};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{AuthError, AuthResult};

/// Email and password as typed on the login form.
///
/// Deserializable from a submitted form but never serialized, and `Debug`
/// redacts the password.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Creates credentials.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Returns true if both email and password are filled in.
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Access level of a signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access to the roster.
    Admin,
    /// Regular dashboard user.
    User,
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Account email.
    pub email: String,
    /// Access level.
    pub role: Role,
    /// Display name.
    pub name: String,
}

impl UserProfile {
    /// Creates a profile.
    pub fn new(email: impl Into<String>, role: Role, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role,
            name: name.into(),
        }
    }
}

/// Checks credentials against an account source.
///
/// `Ok(None)` means the credentials were checked and rejected; `Err` means
/// they could not be checked at all.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Returns a human-readable name for this backend.
    fn backend_name(&self) -> &'static str;

    /// Returns the profile for `credentials`, or `None` if they are wrong.
    async fn verify(&self, credentials: &Credentials) -> AuthResult<Option<UserProfile>>;
}

/// Authenticator backed by a fixed in-process account list.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthenticator {
    accounts: Vec<(Credentials, UserProfile)>,
}

impl StaticAuthenticator {
    /// Email of the demo account.
    pub const DEMO_EMAIL: &'static str = "admin@meddash.com";
    /// Password of the demo account.
    pub const DEMO_PASSWORD: &'static str = "admin123";

    /// Creates an authenticator with no accounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an authenticator holding only the dashboard's demo account.
    pub fn demo() -> Self {
        Self::new().with_account(
            Credentials::new(Self::DEMO_EMAIL, Self::DEMO_PASSWORD),
            UserProfile::new(Self::DEMO_EMAIL, Role::Admin, "Admin User"),
        )
    }

    /// Adds an account.
    pub fn with_account(mut self, credentials: Credentials, profile: UserProfile) -> Self {
        self.accounts.push((credentials, profile));
        self
    }

    /// Returns the number of accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true if no accounts are registered.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    fn backend_name(&self) -> &'static str {
        "static"
    }

    async fn verify(&self, credentials: &Credentials) -> AuthResult<Option<UserProfile>> {
        Ok(self
            .accounts
            .iter()
            .find(|(account, _)| account == credentials)
            .map(|(_, profile)| profile.clone()))
    }
}

/// Holds the current session and runs logins against an [`Authenticator`].
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use meddash_session::{Credentials, SessionManager, StaticAuthenticator};
///
/// let session = SessionManager::new(Arc::new(StaticAuthenticator::demo()));
/// let user = session.login(&Credentials::new("admin@meddash.com", "admin123")).await?;
/// assert_eq!(user.name, "Admin User");
/// assert!(session.is_authenticated());
/// ```
pub struct SessionManager {
    authenticator: Arc<dyn Authenticator>,
    notifier: Arc<dyn Notifier>,
    current: RwLock<Option<UserProfile>>,
}

impl SessionManager {
    /// Creates a signed-out session.
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            authenticator,
            notifier: Arc::new(TracingNotifier),
            current: RwLock::new(None),
        }
    }

    /// Sets the receiver of login notices.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Checks `credentials` and starts a session on success.
    ///
    /// Incomplete credentials are rejected before the authenticator is
    /// called. A failed login leaves any existing session in place.
    pub async fn login(&self, credentials: &Credentials) -> AuthResult<UserProfile> {
        let result = self.verify(credentials).await;
        match &result {
            Ok(profile) => {
                *self.current.write() = Some(profile.clone());
                info!(email = %profile.email, role = ?profile.role, "user logged in");
                self.notifier.notify(Notice::success("Login successful"));
            }
            Err(err) => {
                warn!(email = %credentials.email, error = %err, "login rejected");
                self.notifier.notify(Notice::error(err.to_string()));
            }
        }
        result
    }

    async fn verify(&self, credentials: &Credentials) -> AuthResult<UserProfile> {
        if !credentials.is_complete() {
            return Err(AuthError::MissingCredentials);
        }
        debug!(
            email = %credentials.email,
            backend = self.authenticator.backend_name(),
            "verifying credentials"
        );
        self.authenticator
            .verify(credentials)
            .await?
            .ok_or(AuthError::InvalidCredentials)
    }

    /// Ends the session and returns the user who was signed in.
    pub fn logout(&self) -> Option<UserProfile> {
        let previous = self.current.write().take();
        if let Some(profile) = &previous {
            info!(email = %profile.email, "user logged out");
        }
        previous
    }

    /// Returns true while a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.current.read().is_some()
    }

    /// Returns the signed-in user.
    pub fn current_user(&self) -> Option<UserProfile> {
        self.current.read().clone()
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("backend", &self.authenticator.backend_name())
            .field("current", &*self.current.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_completeness() {
        assert!(Credentials::new("a@b.com", "pw").is_complete());
        assert!(!Credentials::new("", "pw").is_complete());
        assert!(!Credentials::new("a@b.com", "").is_complete());
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let text = format!("{:?}", Credentials::new("a@b.com", "hunter2"));
        assert!(text.contains("a@b.com"));
        assert!(!text.contains("hunter2"));
    }

    #[test]
    fn test_credentials_from_submitted_form() {
        let credentials: Credentials =
            serde_json::from_str(r#"{"email":"a@b.com","password":"pw"}"#).unwrap();
        assert_eq!(credentials, Credentials::new("a@b.com", "pw"));
    }

    #[test]
    fn test_profile_serializes_role_lowercase() {
        let profile = UserProfile::new("admin@meddash.com", Role::Admin, "Admin User");
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["role"], serde_json::json!("admin"));
    }

    #[tokio::test]
    async fn test_demo_account() {
        let auth = StaticAuthenticator::demo();
        assert_eq!(auth.len(), 1);

        let profile = auth
            .verify(&Credentials::new("admin@meddash.com", "admin123"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.name, "Admin User");
        assert_eq!(profile.role, Role::Admin);

        let wrong = auth
            .verify(&Credentials::new("admin@meddash.com", "admin124"))
            .await
            .unwrap();
        assert!(wrong.is_none());
    }

    #[tokio::test]
    async fn test_failed_login_keeps_existing_session() {
        let session = SessionManager::new(Arc::new(StaticAuthenticator::demo()));
        session
            .login(&Credentials::new("admin@meddash.com", "admin123"))
            .await
            .unwrap();

        let err = session
            .login(&Credentials::new("admin@meddash.com", "nope"))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
        assert!(session.is_authenticated());
    }
}
