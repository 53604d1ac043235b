//! Quick settings panel
//!
//! The header's theme and wallpaper switcher. Selections apply to the page
//! being viewed. The panel re-renders its own selection right away and
//! re-renders fully when it drains a change published elsewhere.

use crate::error::PreferenceError;
use crate::events::ChangeListener;
use crate::theme::ThemeResolver;
use crate::wallpaper::{WallpaperDescriptor, WallpaperResolver};

/// How a selector entry previews its value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// Swatch styled with a theme class
    ThemeClass(String),
    /// Thumbnail image
    Image(String),
    /// The theme gradient
    Gradient,
}

/// One selectable entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorItem {
    pub id: String,
    pub label: String,
    pub preview: Preview,
    pub active: bool,
}

impl SelectorItem {
    fn for_wallpaper(wallpaper: &WallpaperDescriptor, active_id: &str) -> Self {
        let preview = match wallpaper.image_url() {
            Some(url) => Preview::Image(url.to_string()),
            None => Preview::Gradient,
        };
        Self {
            id: wallpaper.id.clone(),
            label: wallpaper.name.clone(),
            preview,
            active: wallpaper.id == active_id,
        }
    }
}

#[derive(Debug)]
pub struct QuickSettings {
    open: bool,
    theme_items: Vec<SelectorItem>,
    wallpaper_items: Vec<SelectorItem>,
    listener: ChangeListener,
}

impl QuickSettings {
    pub fn new(
        themes: &ThemeResolver,
        wallpapers: &WallpaperResolver,
        listener: ChangeListener,
    ) -> Self {
        let mut panel = Self {
            open: false,
            theme_items: Vec::new(),
            wallpaper_items: Vec::new(),
            listener,
        };
        panel.render(themes, wallpapers);
        panel
    }

    /// Rebuild both selectors from the resolvers
    pub fn render(&mut self, themes: &ThemeResolver, wallpapers: &WallpaperResolver) {
        let page = themes.current_page();
        let active_theme = themes.effective_theme(page);
        self.theme_items = themes
            .themes()
            .iter()
            .map(|theme| SelectorItem {
                id: theme.as_str().to_string(),
                label: theme.label(),
                preview: Preview::ThemeClass(theme.css_class()),
                active: *theme == active_theme,
            })
            .collect();

        let active_wallpaper = wallpapers.effective_wallpaper(wallpapers.current_page());
        self.wallpaper_items = wallpapers
            .catalog()
            .iter()
            .map(|wallpaper| SelectorItem::for_wallpaper(wallpaper, &active_wallpaper.id))
            .collect();
    }

    /// Re-render if any preference changed since the last sync
    ///
    /// Returns true when a re-render happened.
    pub fn sync(&mut self, themes: &ThemeResolver, wallpapers: &WallpaperResolver) -> bool {
        if self.listener.drain().is_empty() {
            return false;
        }
        self.render(themes, wallpapers);
        true
    }

    /// Apply a theme to the page being viewed
    pub fn select_theme(
        &mut self,
        themes: &mut ThemeResolver,
        id: &str,
    ) -> Result<(), PreferenceError> {
        let page = themes.current_page().clone();
        themes.set_page_theme(&page, id)?;

        let active = themes.effective_theme(&page);
        mark_active(&mut self.theme_items, active.as_str());
        Ok(())
    }

    /// Apply a wallpaper to the page being viewed
    pub fn select_wallpaper(
        &mut self,
        wallpapers: &mut WallpaperResolver,
        id: &str,
    ) -> Result<(), PreferenceError> {
        let page = wallpapers.current_page().clone();
        wallpapers.set_page_wallpaper(&page, id)?;

        let active = wallpapers.effective_wallpaper(&page);
        mark_active(&mut self.wallpaper_items, &active.id);
        Ok(())
    }

    pub fn theme_items(&self) -> &[SelectorItem] {
        &self.theme_items
    }

    pub fn wallpaper_items(&self) -> &[SelectorItem] {
        &self.wallpaper_items
    }

    pub fn active_theme_item(&self) -> Option<&SelectorItem> {
        self.theme_items.iter().find(|item| item.active)
    }

    pub fn active_wallpaper_item(&self) -> Option<&SelectorItem> {
        self.wallpaper_items.iter().find(|item| item.active)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Toggle button
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// A click anywhere on the page; outside clicks close the panel
    pub fn click(&mut self, inside_panel: bool) {
        if !inside_panel {
            self.open = false;
        }
    }
}

fn mark_active(items: &mut [SelectorItem], id: &str) {
    for item in items {
        item.active = item.id == id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ChangeNotifier;
    use crate::page::PageKey;
    use crate::storage::{Preferences, SharedPreferences};
    use crate::theme::ThemeId;
    use crate::wallpaper::{WallpaperKind, WallpaperLayer};
    use std::sync::Arc;
    use std::time::Duration;

    struct Fixture {
        themes: ThemeResolver,
        wallpapers: WallpaperResolver,
        panel: QuickSettings,
    }

    fn fixture(location: &str) -> Fixture {
        let prefs: SharedPreferences = Preferences::in_memory().shared();
        let notifier = ChangeNotifier::new();
        let page = PageKey::from_location(location);
        let themes = ThemeResolver::new(
            Arc::clone(&prefs),
            notifier.clone(),
            page.clone(),
            Duration::from_millis(200),
        );
        let wallpapers = WallpaperResolver::new(prefs, notifier.clone(), page);
        let panel = QuickSettings::new(&themes, &wallpapers, notifier.subscribe());
        Fixture {
            themes,
            wallpapers,
            panel,
        }
    }

    #[test]
    fn test_initial_render_marks_effective_values() {
        let f = fixture("/g.html");
        assert_eq!(f.panel.theme_items().len(), 4);
        assert_eq!(f.panel.wallpaper_items().len(), 5);
        assert_eq!(f.panel.active_theme_item().unwrap().id, "deep-blue");
        assert_eq!(f.panel.active_wallpaper_item().unwrap().id, "default");
        assert_eq!(f.panel.wallpaper_items()[0].preview, Preview::Gradient);
        assert_eq!(
            f.panel.theme_items()[1].preview,
            Preview::ThemeClass("theme-midnight-neon".to_string())
        );
    }

    #[test]
    fn test_select_theme_applies_to_current_page() {
        let mut f = fixture("/g.html");
        f.panel.select_theme(&mut f.themes, "slate").unwrap();

        assert_eq!(f.themes.effective_theme(&PageKey::new("g")), ThemeId::Slate);
        assert_eq!(f.themes.global_theme(), ThemeId::DeepBlue);
        assert_eq!(f.panel.active_theme_item().unwrap().id, "slate");
        assert_eq!(
            f.panel.theme_items().iter().filter(|i| i.active).count(),
            1
        );
    }

    #[test]
    fn test_invalid_selection_keeps_marking() {
        let mut f = fixture("/g.html");
        assert!(f.panel.select_theme(&mut f.themes, "sepia").is_err());
        assert_eq!(f.panel.active_theme_item().unwrap().id, "deep-blue");

        assert!(f.panel.select_wallpaper(&mut f.wallpapers, "beach").is_err());
        assert_eq!(f.panel.active_wallpaper_item().unwrap().id, "default");
    }

    #[test]
    fn test_select_wallpaper_updates_layer() {
        let mut f = fixture("/m.html");
        f.panel
            .select_wallpaper(&mut f.wallpapers, "neon-city")
            .unwrap();

        assert_eq!(f.panel.active_wallpaper_item().unwrap().id, "neon-city");
        assert_ne!(f.wallpapers.layer(), &WallpaperLayer::hidden());
    }

    #[test]
    fn test_sync_rerenders_after_external_change() {
        let mut f = fixture("/index.html");
        assert!(!f.panel.sync(&f.themes, &f.wallpapers));

        f.themes.set_global_theme("aqua-haze").unwrap();
        assert!(f.panel.sync(&f.themes, &f.wallpapers));
        assert_eq!(f.panel.active_theme_item().unwrap().id, "aqua-haze");

        f.wallpapers
            .replace_catalog(vec![WallpaperDescriptor {
                id: "only".into(),
                name: "only".into(),
                kind: WallpaperKind::Gradient,
                url: None,
            }])
            .unwrap();
        assert!(f.panel.sync(&f.themes, &f.wallpapers));
        assert_eq!(f.panel.wallpaper_items().len(), 1);
        assert_eq!(f.panel.active_wallpaper_item().unwrap().id, "only");
    }

    #[test]
    fn test_open_close() {
        let mut f = fixture("/index.html");
        assert!(!f.panel.is_open());
        f.panel.toggle();
        assert!(f.panel.is_open());
        f.panel.click(true);
        assert!(f.panel.is_open());
        f.panel.click(false);
        assert!(!f.panel.is_open());
    }
}
