//! Application constants and configuration defaults
//!
//! Centralized location for storage keys, defaults, and timings

use std::time::Duration;

/// Keys used in the preference store
pub mod keys {
    /// Global theme id
    pub const THEME: &str = "midnight_theme";

    /// JSON object of page key -> theme id
    pub const PAGE_THEMES: &str = "midnight_page_themes";

    /// Global wallpaper id
    pub const WALLPAPER: &str = "midnight_wallpaper";

    /// JSON object of page key -> wallpaper id
    pub const PAGE_WALLPAPERS: &str = "midnight_page_wallpapers";

    /// JSON array of recently visited pages
    pub const RECENT_ITEMS: &str = "midnight_recent_items";
}

/// Theme defaults
pub mod theme {
    use super::*;

    /// Theme used when nothing valid is stored
    pub const DEFAULT_THEME: &str = "deep-blue";

    /// How long the transition overlay stays visible
    pub const TRANSITION_DELAY: Duration = Duration::from_millis(200);
}

/// Wallpaper defaults
pub mod wallpaper {
    use super::*;

    /// Wallpaper used when nothing is stored
    pub const DEFAULT_WALLPAPER: &str = "default";

    /// Opacity of the wallpaper layer when an image is shown
    pub const IMAGE_OPACITY: f32 = 0.2;

    /// Catalog request timeout
    pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

    /// Catalog location used when the config does not name one
    pub const DEFAULT_CATALOG_URL: &str = "http://localhost:8080/data/wallpapers.json";
}

/// Page identity
pub mod page {
    /// Page key for the portal root
    pub const INDEX_PAGE: &str = "index";

    /// File name of the portal root
    pub const INDEX_FILE: &str = "index.html";

    /// Maximum number of recently visited pages kept
    pub const MAX_RECENT_ITEMS: usize = 6;
}

/// Local directory layout
pub mod dirs {
    /// Config directory name
    pub const CONFIG_DIR_NAME: &str = ".midnight";

    /// Logs subdirectory name
    pub const LOGS_DIR_NAME: &str = "logs";

    /// Database file name
    pub const DATABASE_FILE_NAME: &str = "midnight.db";

    /// Config file name
    pub const CONFIG_FILE_NAME: &str = "config.toml";
}
