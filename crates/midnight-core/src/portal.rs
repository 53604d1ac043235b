//! Portal session wiring
//!
//! Builds the store, resolvers, and consumers once per page load and hands
//! each consumer the services it needs. Mutations go through the portal so
//! every consumer is synced afterwards.

use tracing::{info, warn};

use crate::config::PortalConfig;
use crate::consumers::{
    Header, ParticleConfig, ParticleEngine, QuickSettings, Sidebar, Viewport,
};
use crate::error::PreferenceError;
use crate::events::ChangeNotifier;
use crate::page::PageKey;
use crate::recent::RecentPages;
use crate::storage::{Database, Preferences, SharedPreferences};
use crate::theme::ThemeResolver;
use crate::wallpaper::{CatalogSource, HttpCatalogSource, WallpaperResolver};

/// Links shown in the sidebar
pub const NAV_LINKS: [&str; 8] = [
    "/", "g.html", "a.html", "p.html", "ai.html", "vm.html", "m.html", "s.html",
];

/// Default drawing surface until the host reports its size
const DEFAULT_VIEWPORT: Viewport = Viewport {
    width: 1920.0,
    height: 1080.0,
};

/// Everything one portal page load needs
#[derive(Debug)]
pub struct Portal {
    config: PortalConfig,
    prefs: SharedPreferences,
    notifier: ChangeNotifier,
    page: PageKey,
    themes: ThemeResolver,
    wallpapers: WallpaperResolver,
    quick_settings: QuickSettings,
    particles: ParticleEngine,
    sidebar: Sidebar,
    header: Header,
    recent: RecentPages,
}

impl Portal {
    /// Open the portal over the configured SQLite database
    ///
    /// If the database cannot be opened the session runs in memory only.
    pub fn open(config: PortalConfig, location: &str) -> Self {
        let path = config.database_path();
        let prefs = match Database::new(&path) {
            Ok(db) => Preferences::with_database(db),
            Err(e) => {
                warn!(
                    "Could not open {}, preferences will not persist: {}",
                    path.display(),
                    e
                );
                Preferences::in_memory()
            }
        };
        Self::new(config, prefs.shared(), location)
    }

    /// Build a portal session for `location`
    pub fn new(config: PortalConfig, prefs: SharedPreferences, location: &str) -> Self {
        let page = PageKey::from_location(location);
        info!("Portal session for page {}", page);

        let notifier = ChangeNotifier::new();
        let themes = ThemeResolver::new(
            prefs.clone(),
            notifier.clone(),
            page.clone(),
            config.transition_delay(),
        );
        let wallpapers = WallpaperResolver::new(prefs.clone(), notifier.clone(), page.clone());
        let quick_settings = QuickSettings::new(&themes, &wallpapers, notifier.subscribe());

        let particle_config = ParticleConfig {
            color: themes.active_theme().accent_color().to_string(),
            ..ParticleConfig::default()
        };
        let mut particles = ParticleEngine::new(particle_config, DEFAULT_VIEWPORT);
        particles.subscribe(notifier.subscribe());

        let recent = RecentPages::new(prefs.clone());

        Self {
            config,
            sidebar: Sidebar::new(location, NAV_LINKS),
            header: Header::new(&page),
            prefs,
            notifier,
            page,
            themes,
            wallpapers,
            quick_settings,
            particles,
            recent,
        }
    }

    /// Record that `location` was loaded
    ///
    /// Called by the page-load host; building a portal records nothing.
    pub fn track_visit(&mut self, location: &str) {
        self.recent.track_visit(location);
    }

    /// Load the remote wallpaper catalog from the configured URL
    ///
    /// Returns whether the catalog was replaced; failures keep the current one.
    pub async fn refresh_catalog(&mut self) -> bool {
        match HttpCatalogSource::new(&self.config.catalog_url, self.config.fetch_timeout()) {
            Ok(source) => self.refresh_catalog_from(&source).await,
            Err(e) => {
                warn!("Catalog client unavailable: {}", e);
                false
            }
        }
    }

    /// Load a wallpaper catalog from any source
    pub async fn refresh_catalog_from(&mut self, source: &dyn CatalogSource) -> bool {
        let replaced = self.wallpapers.load_catalog(source).await.is_ok();
        self.sync();
        replaced
    }

    /// Push pending changes to every consumer
    pub fn sync(&mut self) {
        self.quick_settings.sync(&self.themes, &self.wallpapers);
        self.particles.sync();
    }

    pub fn set_global_theme(&mut self, id: &str) -> Result<(), PreferenceError> {
        let result = self.themes.set_global_theme(id);
        self.sync();
        result
    }

    pub fn set_page_theme(&mut self, page: &PageKey, id: &str) -> Result<(), PreferenceError> {
        let result = self.themes.set_page_theme(page, id);
        self.sync();
        result
    }

    pub fn reset_page_theme(&mut self, page: &PageKey) {
        self.themes.reset_page_theme(page);
        self.sync();
    }

    pub fn set_wallpaper(&mut self, id: &str) -> Result<(), PreferenceError> {
        let result = self.wallpapers.set_wallpaper(id);
        self.sync();
        result
    }

    pub fn set_page_wallpaper(&mut self, page: &PageKey, id: &str) -> Result<(), PreferenceError> {
        let result = self.wallpapers.set_page_wallpaper(page, id);
        self.sync();
        result
    }

    pub fn reset_page_wallpaper(&mut self, page: &PageKey) {
        self.wallpapers.reset_page_wallpaper(page);
        self.sync();
    }

    /// Quick settings theme click
    pub fn select_theme(&mut self, id: &str) -> Result<(), PreferenceError> {
        let result = self.quick_settings.select_theme(&mut self.themes, id);
        self.sync();
        result
    }

    /// Quick settings wallpaper click
    pub fn select_wallpaper(&mut self, id: &str) -> Result<(), PreferenceError> {
        let result = self
            .quick_settings
            .select_wallpaper(&mut self.wallpapers, id);
        self.sync();
        result
    }

    pub fn page(&self) -> &PageKey {
        &self.page
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    pub fn preferences(&self) -> &SharedPreferences {
        &self.prefs
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    pub fn themes(&self) -> &ThemeResolver {
        &self.themes
    }

    pub fn wallpapers(&self) -> &WallpaperResolver {
        &self.wallpapers
    }

    pub fn quick_settings(&self) -> &QuickSettings {
        &self.quick_settings
    }

    pub fn quick_settings_mut(&mut self) -> &mut QuickSettings {
        &mut self.quick_settings
    }

    pub fn particles(&self) -> &ParticleEngine {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut ParticleEngine {
        &mut self.particles
    }

    pub fn sidebar(&self) -> &Sidebar {
        &self.sidebar
    }

    pub fn sidebar_mut(&mut self) -> &mut Sidebar {
        &mut self.sidebar
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn recent(&self) -> &RecentPages {
        &self.recent
    }
}
