//! # meddash-session
//!
//! Login gate and appearance settings for the MedDash dashboard.
//!
//! This crate provides:
//! - **Login**: [`SessionManager`] checks [`Credentials`] through an
//!   [`Authenticator`] and holds the signed-in [`UserProfile`]
//! - **Settings**: [`Theme`] selection persisted as JSON by [`SettingsStore`]
//!
//! Both report their outcome through the same [`Notifier`](meddash_model::Notifier)
//! channel as the doctor store.
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use meddash_session::{Credentials, SessionManager, Settings, SettingsStore, StaticAuthenticator, Theme};
//!
//! let session = SessionManager::new(Arc::new(StaticAuthenticator::demo()));
//! session.login(&Credentials::new("admin@meddash.com", "admin123")).await?;
//!
//! let settings = SettingsStore::new("meddash/settings.json");
//! settings.save(&Settings::default().with_theme(Theme::Dark))?;
//! assert_eq!(settings.load()?.theme, Theme::Dark);
//! ```
//!
//! ## Messages
//!
//! | Outcome | Notice |
//! |---------|--------|
//! | Login with an empty field | `Please enter both email and password` |
//! | Login rejected | `Invalid credentials` |
//! | Login accepted | `Login successful` |
//! | Settings saved | `Theme settings saved successfully` |

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod auth;
mod error;
pub mod settings;

pub use auth::{Authenticator, Credentials, Role, SessionManager, StaticAuthenticator, UserProfile};
pub use error::{AuthError, AuthResult, SettingsError, SettingsResult};
pub use settings::{Settings, SettingsStore, Theme};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        let _: Option<Credentials> = None;
        let _: Option<UserProfile> = None;
        let _: Option<Box<dyn Authenticator>> = None;
        let _: Option<AuthResult<()>> = None;
        let _: Option<SettingsResult<()>> = None;
        let _: Option<SettingsStore> = None;
    }
}
