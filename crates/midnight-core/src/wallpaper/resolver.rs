//! Wallpaper resolution with per-page overrides

use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::{
    default_catalog, validate_catalog, CatalogSource, WallpaperDescriptor, WallpaperLayer,
};
use crate::constants::wallpaper::DEFAULT_WALLPAPER;
use crate::error::PreferenceError;
use crate::events::{ChangeNotifier, PreferenceChange, PreferenceScope};
use crate::page::PageKey;
use crate::storage::SharedPreferences;

/// Resolves the effective wallpaper of each page against the current catalog
///
/// Stored ids are kept even when the catalog no longer contains them;
/// resolution then falls back to the catalog's first entry.
#[derive(Debug)]
pub struct WallpaperResolver {
    prefs: SharedPreferences,
    notifier: ChangeNotifier,
    current_page: PageKey,
    /// Never empty
    catalog: Vec<WallpaperDescriptor>,
    global_wallpaper: String,
    page_wallpapers: BTreeMap<PageKey, String>,
    layer: WallpaperLayer,
}

impl WallpaperResolver {
    /// Hydrate from preferences and apply the current page's wallpaper
    pub fn new(prefs: SharedPreferences, notifier: ChangeNotifier, current_page: PageKey) -> Self {
        let global_wallpaper = prefs
            .get_wallpaper()
            .unwrap_or_else(|| DEFAULT_WALLPAPER.to_string());
        let page_wallpapers = prefs.get_page_wallpapers();
        info!(
            "Wallpaper hydrated: global {}, {} page override(s)",
            global_wallpaper,
            page_wallpapers.len()
        );

        let mut resolver = Self {
            prefs,
            notifier,
            current_page,
            catalog: default_catalog(),
            global_wallpaper,
            page_wallpapers,
            layer: WallpaperLayer::hidden(),
        };
        resolver.apply_current();
        resolver
    }

    /// Current catalog, first entry is the default
    pub fn catalog(&self) -> &[WallpaperDescriptor] {
        &self.catalog
    }

    pub fn current_page(&self) -> &PageKey {
        &self.current_page
    }

    /// Stored global wallpaper id
    pub fn global_wallpaper(&self) -> &str {
        &self.global_wallpaper
    }

    pub fn page_overrides(&self) -> &BTreeMap<PageKey, String> {
        &self.page_wallpapers
    }

    /// Wallpaper id selected for `page`, before catalog lookup
    pub fn effective_wallpaper_id(&self, page: &PageKey) -> &str {
        self.page_wallpapers
            .get(page)
            .unwrap_or(&self.global_wallpaper)
    }

    /// Wallpaper that applies to `page`
    pub fn effective_wallpaper(&self, page: &PageKey) -> WallpaperDescriptor {
        self.lookup(self.effective_wallpaper_id(page))
    }

    /// Wallpaper layer as currently drawn
    pub fn layer(&self) -> &WallpaperLayer {
        &self.layer
    }

    /// Set the wallpaper for every page without an override
    pub fn set_wallpaper(&mut self, id: &str) -> Result<(), PreferenceError> {
        self.ensure_known(id)?;

        self.global_wallpaper = id.to_string();
        if let Err(e) = self.prefs.set_wallpaper(id) {
            debug!("Global wallpaper kept in memory only: {}", e);
        }

        if !self.page_wallpapers.contains_key(&self.current_page) {
            self.apply_current();
        }
        self.publish(PreferenceScope::Global);
        Ok(())
    }

    /// Override the wallpaper of one page
    pub fn set_page_wallpaper(&mut self, page: &PageKey, id: &str) -> Result<(), PreferenceError> {
        self.ensure_known(id)?;

        self.page_wallpapers.insert(page.clone(), id.to_string());
        self.persist_page_wallpapers();

        if *page == self.current_page {
            self.apply_current();
        }
        self.publish(PreferenceScope::PerPage(page.clone()));
        Ok(())
    }

    /// Remove a page override so the page follows the global wallpaper again
    pub fn reset_page_wallpaper(&mut self, page: &PageKey) {
        self.page_wallpapers.remove(page);
        self.persist_page_wallpapers();

        if *page == self.current_page {
            self.apply_current();
        }
        self.publish(PreferenceScope::PerPage(page.clone()));
    }

    /// Fetch a catalog and replace the current one wholesale
    ///
    /// On failure the current catalog stays authoritative; the error is
    /// returned for information only.
    pub async fn load_catalog(&mut self, source: &dyn CatalogSource) -> Result<(), PreferenceError> {
        match source.fetch().await {
            Ok(catalog) => self.replace_catalog(catalog),
            Err(e) => {
                debug!(
                    "Using current wallpapers, catalog from {} unavailable: {}",
                    source.describe(),
                    e
                );
                Err(e)
            }
        }
    }

    /// Replace the catalog wholesale (no merge)
    ///
    /// Rejects catalogs that fail `validate_catalog`. Overrides pointing at
    /// ids the new catalog lacks are kept and resolve to its first entry.
    pub fn replace_catalog(
        &mut self,
        catalog: Vec<WallpaperDescriptor>,
    ) -> Result<(), PreferenceError> {
        validate_catalog(&catalog)?;

        info!("Wallpaper catalog replaced ({} entries)", catalog.len());
        self.catalog = catalog;
        self.apply_current();
        self.notifier.publish(PreferenceChange::CatalogReplaced {
            len: self.catalog.len(),
        });
        Ok(())
    }

    fn lookup(&self, id: &str) -> WallpaperDescriptor {
        self.catalog
            .iter()
            .find(|w| w.id == id)
            .or_else(|| self.catalog.first())
            .cloned()
            .unwrap_or_else(WallpaperDescriptor::default_gradient)
    }

    fn ensure_known(&self, id: &str) -> Result<(), PreferenceError> {
        if self.catalog.iter().any(|w| w.id == id) {
            Ok(())
        } else {
            let err = PreferenceError::UnknownWallpaper(id.to_string());
            warn!("{}", err);
            Err(err)
        }
    }

    fn apply_current(&mut self) {
        let wallpaper = self.effective_wallpaper(&self.current_page);
        debug!("Applying wallpaper {}", wallpaper.id);
        self.layer = WallpaperLayer::for_wallpaper(&wallpaper);
    }

    fn persist_page_wallpapers(&self) {
        if let Err(e) = self.prefs.set_page_wallpapers(&self.page_wallpapers) {
            debug!("Page wallpapers kept in memory only: {}", e);
        }
    }

    fn publish(&self, scope: PreferenceScope) {
        self.notifier.publish(PreferenceChange::Wallpaper {
            scope,
            effective: self.effective_wallpaper(&self.current_page),
        });
    }
}
