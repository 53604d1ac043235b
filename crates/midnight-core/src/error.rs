//! Preference error types

use thiserror::Error;

/// Errors raised by the preference and theming subsystem
///
/// Every variant has a defined fallback: unknown ids leave state untouched,
/// storage failures degrade to memory-only operation, and catalog failures
/// keep the current catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreferenceError {
    /// Theme id is not one of the known themes
    #[error("theme \"{0}\" not found")]
    UnknownTheme(String),

    /// Wallpaper id is not present in the current catalog
    #[error("wallpaper \"{0}\" not found")]
    UnknownWallpaper(String),

    /// The storage medium rejected a read or write
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The remote wallpaper catalog could not be loaded
    #[error("catalog fetch failed: {0}")]
    CatalogFetchFailed(String),
}

impl PreferenceError {
    /// Whether the error was caused by the caller passing a bad id
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            PreferenceError::UnknownTheme(_) | PreferenceError::UnknownWallpaper(_)
        )
    }
}

impl From<reqwest::Error> for PreferenceError {
    fn from(err: reqwest::Error) -> Self {
        PreferenceError::CatalogFetchFailed(err.to_string())
    }
}
