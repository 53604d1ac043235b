//! Midnight Core - Preference and theming library for the Midnight portal
//!
//! This crate provides the state behind the portal shell:
//! - Key/value preference storage (SQLite or in-memory)
//! - Theme and wallpaper resolution with per-page overrides
//! - Remote wallpaper catalog loading
//! - Consumers that render from resolved preferences (quick settings,
//!   particles, sidebar, header)
//! - Recently visited pages

pub mod config;
pub mod constants;
pub mod consumers;
pub mod error;
pub mod events;
pub mod page;
pub mod paths;
pub mod portal;
pub mod recent;
pub mod storage;
pub mod theme;
pub mod transition;
pub mod wallpaper;

// Re-exports for convenience
pub use config::PortalConfig;
pub use error::PreferenceError;
pub use events::{ChangeNotifier, PreferenceChange, PreferenceScope};
pub use page::PageKey;
pub use portal::Portal;
pub use storage::{Database, Preferences, SharedPreferences};
pub use theme::{ThemeId, ThemeResolver};
pub use wallpaper::{WallpaperDescriptor, WallpaperKind, WallpaperResolver};
