//! Integration tests for the login gate and settings persistence.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use meddash_model::{Notice, RecordingNotifier};
use meddash_session::{
    AuthError, AuthResult, Authenticator, Credentials, Role, SessionManager, Settings,
    SettingsStore, StaticAuthenticator, Theme, UserProfile,
};
use tempfile::tempdir;

/// Authenticator that counts calls and delegates to the demo account list.
struct CountingAuthenticator {
    calls: AtomicUsize,
    inner: StaticAuthenticator,
}

impl CountingAuthenticator {
    fn demo() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            inner: StaticAuthenticator::demo(),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Authenticator for CountingAuthenticator {
    fn backend_name(&self) -> &'static str {
        "counting"
    }

    async fn verify(&self, credentials: &Credentials) -> AuthResult<Option<UserProfile>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.verify(credentials).await
    }
}

/// Authenticator whose backend is always unreachable.
struct OfflineAuthenticator;

#[async_trait]
impl Authenticator for OfflineAuthenticator {
    fn backend_name(&self) -> &'static str {
        "offline"
    }

    async fn verify(&self, _credentials: &Credentials) -> AuthResult<Option<UserProfile>> {
        Err(AuthError::Backend("connection refused".to_string()))
    }
}

fn demo_credentials() -> Credentials {
    Credentials::new("admin@meddash.com", "admin123")
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_demo_login_succeeds() {
    let notices = Arc::new(RecordingNotifier::new());
    let session =
        SessionManager::new(Arc::new(StaticAuthenticator::demo())).with_notifier(notices.clone());
    assert!(!session.is_authenticated());

    let user = session.login(&demo_credentials()).await.unwrap();
    assert_eq!(
        user,
        UserProfile::new("admin@meddash.com", Role::Admin, "Admin User")
    );
    assert!(session.is_authenticated());
    assert_eq!(session.current_user(), Some(user));
    assert_eq!(notices.last(), Some(Notice::success("Login successful")));
}

#[tokio::test]
async fn test_empty_fields_rejected_before_verification() {
    let auth = Arc::new(CountingAuthenticator::demo());
    let notices = Arc::new(RecordingNotifier::new());
    let session = SessionManager::new(auth.clone()).with_notifier(notices.clone());

    for credentials in [
        Credentials::new("", "admin123"),
        Credentials::new("admin@meddash.com", ""),
        Credentials::new("", ""),
    ] {
        let err = session.login(&credentials).await.unwrap_err();
        assert_eq!(err, AuthError::MissingCredentials);
    }

    assert_eq!(auth.calls(), 0);
    assert!(!session.is_authenticated());
    assert_eq!(
        notices.last(),
        Some(Notice::error("Please enter both email and password"))
    );
}

#[tokio::test]
async fn test_wrong_password_is_invalid() {
    let auth = Arc::new(CountingAuthenticator::demo());
    let notices = Arc::new(RecordingNotifier::new());
    let session = SessionManager::new(auth.clone()).with_notifier(notices.clone());

    let err = session
        .login(&Credentials::new("admin@meddash.com", "letmein"))
        .await
        .unwrap_err();

    assert_eq!(err, AuthError::InvalidCredentials);
    assert_eq!(auth.calls(), 1);
    assert!(session.current_user().is_none());
    assert_eq!(notices.last(), Some(Notice::error("Invalid credentials")));
}

#[tokio::test]
async fn test_backend_failure_is_reported() {
    let session = SessionManager::new(Arc::new(OfflineAuthenticator));

    let err = session.login(&demo_credentials()).await.unwrap_err();
    assert!(matches!(err, AuthError::Backend(_)));
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_session() {
    let session = SessionManager::new(Arc::new(StaticAuthenticator::demo()));
    session.login(&demo_credentials()).await.unwrap();

    let previous = session.logout();
    assert_eq!(previous.map(|u| u.name), Some("Admin User".to_string()));
    assert!(!session.is_authenticated());
    assert!(session.current_user().is_none());
    assert!(session.logout().is_none());
}

#[tokio::test]
async fn test_custom_accounts() {
    let auth = StaticAuthenticator::new().with_account(
        Credentials::new("nurse@meddash.com", "s3cret"),
        UserProfile::new("nurse@meddash.com", Role::User, "Ward Nurse"),
    );
    let session = SessionManager::new(Arc::new(auth));

    assert!(session.login(&demo_credentials()).await.is_err());
    let user = session
        .login(&Credentials::new("nurse@meddash.com", "s3cret"))
        .await
        .unwrap();
    assert_eq!(user.role, Role::User);
}

// =============================================================================
// Settings
// =============================================================================

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let store = SettingsStore::new(dir.path().join("settings.json"));

    assert_eq!(store.load().unwrap(), Settings::default());
    assert!(!store.path().exists());
}

#[test]
fn test_save_then_load_round_trips_theme() {
    let dir = tempdir().unwrap();
    let notices = Arc::new(RecordingNotifier::new());
    let store = SettingsStore::new(dir.path().join("nested").join("settings.json"))
        .with_notifier(notices.clone());

    for theme in Theme::ALL {
        store.save(&Settings::default().with_theme(theme)).unwrap();
        assert_eq!(store.load().unwrap().theme, theme);
    }

    let received = notices.notices();
    assert_eq!(received.len(), 3);
    assert!(received
        .iter()
        .all(|n| *n == Notice::success("Theme settings saved successfully")));
}

#[test]
fn test_save_failure_is_reported() {
    let dir = tempdir().unwrap();
    let notices = Arc::new(RecordingNotifier::new());
    // A directory where the file should be makes the write fail.
    let store = SettingsStore::new(dir.path()).with_notifier(notices.clone());

    assert!(store.save(&Settings::default()).is_err());
    assert!(!notices.last().unwrap().is_success());
}
