//! Error types for the session crate.

use std::path::PathBuf;

/// Result type for login operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Result type for settings persistence.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Errors that can occur while logging in.
///
/// The display strings are the messages shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Email or password was left empty.
    #[error("Please enter both email and password")]
    MissingCredentials,

    /// The authenticator rejected the credentials.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The authenticator itself failed.
    #[error("Authentication backend error: {0}")]
    Backend(String),
}

/// Errors that can occur while loading or saving settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// I/O error on the settings file.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// Settings could not be written as JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The settings file is not valid JSON for [`Settings`](crate::Settings).
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// A theme name other than `light`, `dark` or `system`.
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),
}

impl SettingsError {
    /// Creates an I/O error with path context.
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
