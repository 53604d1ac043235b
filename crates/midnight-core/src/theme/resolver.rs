//! Theme resolution with per-page overrides

use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::ThemeId;
use crate::error::PreferenceError;
use crate::events::{ChangeNotifier, PreferenceChange, PreferenceScope};
use crate::page::PageKey;
use crate::storage::SharedPreferences;
use crate::transition::TransitionOverlay;

/// Resolves the effective theme of each page
///
/// A per-page override always wins over the global theme. Every mutation is
/// persisted immediately and published to listeners.
#[derive(Debug)]
pub struct ThemeResolver {
    prefs: SharedPreferences,
    notifier: ChangeNotifier,
    current_page: PageKey,
    global_theme: ThemeId,
    page_themes: BTreeMap<PageKey, ThemeId>,
    /// Theme currently applied to the page body
    active: ThemeId,
    overlay: TransitionOverlay,
}

impl ThemeResolver {
    /// Hydrate from preferences and apply the current page's theme
    pub fn new(
        prefs: SharedPreferences,
        notifier: ChangeNotifier,
        current_page: PageKey,
        transition_delay: Duration,
    ) -> Self {
        let global_theme = load_global_theme(&prefs);
        let page_themes = load_page_themes(&prefs);
        info!(
            "Theme hydrated: global {}, {} page override(s)",
            global_theme,
            page_themes.len()
        );

        let mut resolver = Self {
            prefs,
            notifier,
            current_page,
            global_theme,
            page_themes,
            active: global_theme,
            overlay: TransitionOverlay::new(transition_delay),
        };
        let initial = resolver.effective_theme(&resolver.current_page);
        resolver.apply_theme(initial);
        resolver
    }

    /// Every selectable theme, in display order
    pub fn themes(&self) -> &'static [ThemeId] {
        &ThemeId::ALL
    }

    /// Page this session is showing
    pub fn current_page(&self) -> &PageKey {
        &self.current_page
    }

    pub fn global_theme(&self) -> ThemeId {
        self.global_theme
    }

    pub fn page_overrides(&self) -> &BTreeMap<PageKey, ThemeId> {
        &self.page_themes
    }

    /// Theme that applies to `page`
    pub fn effective_theme(&self, page: &PageKey) -> ThemeId {
        self.page_themes
            .get(page)
            .copied()
            .unwrap_or(self.global_theme)
    }

    /// Theme applied to the current page body
    pub fn active_theme(&self) -> ThemeId {
        self.active
    }

    /// Whether the transition overlay is showing
    pub fn is_transitioning(&self) -> bool {
        self.overlay.is_visible()
    }

    /// Set the theme for every page without an override
    pub fn set_global_theme(&mut self, id: &str) -> Result<(), PreferenceError> {
        let theme = parse_theme(id)?;

        self.global_theme = theme;
        if let Err(e) = self.prefs.set_theme(theme.as_str()) {
            debug!("Global theme kept in memory only: {}", e);
        }

        if !self.page_themes.contains_key(&self.current_page) {
            self.apply_theme(theme);
        }
        self.publish(PreferenceScope::Global);
        Ok(())
    }

    /// Override the theme of one page
    pub fn set_page_theme(&mut self, page: &PageKey, id: &str) -> Result<(), PreferenceError> {
        let theme = parse_theme(id)?;

        self.page_themes.insert(page.clone(), theme);
        self.persist_page_themes();

        if *page == self.current_page {
            self.apply_theme(theme);
        }
        self.publish(PreferenceScope::PerPage(page.clone()));
        Ok(())
    }

    /// Remove a page override so the page follows the global theme again
    pub fn reset_page_theme(&mut self, page: &PageKey) {
        self.page_themes.remove(page);
        self.persist_page_themes();

        if *page == self.current_page {
            self.apply_theme(self.global_theme);
        }
        self.publish(PreferenceScope::PerPage(page.clone()));
    }

    /// Switch the body class and run the transition overlay
    pub fn apply_theme(&mut self, theme: ThemeId) {
        debug!("Applying theme {}", theme);
        self.overlay.begin();
        self.active = theme;
    }

    fn persist_page_themes(&self) {
        if let Err(e) = self.prefs.set_page_themes(&self.page_themes) {
            debug!("Page themes kept in memory only: {}", e);
        }
    }

    fn publish(&self, scope: PreferenceScope) {
        self.notifier.publish(PreferenceChange::Theme {
            scope,
            effective: self.effective_theme(&self.current_page),
        });
    }
}

fn parse_theme(id: &str) -> Result<ThemeId, PreferenceError> {
    id.parse::<ThemeId>().inspect_err(|e| warn!("{}", e))
}

fn load_global_theme(prefs: &SharedPreferences) -> ThemeId {
    match prefs.get_theme() {
        Some(stored) => stored.parse().unwrap_or_else(|_| {
            warn!("Ignoring stored theme \"{}\"", stored);
            ThemeId::default()
        }),
        None => ThemeId::default(),
    }
}

fn load_page_themes(prefs: &SharedPreferences) -> BTreeMap<PageKey, ThemeId> {
    prefs
        .get_page_themes()
        .into_iter()
        .filter_map(|(page, stored)| match stored.parse() {
            Ok(theme) => Some((page, theme)),
            Err(_) => {
                warn!("Ignoring stored theme \"{}\" for page {}", stored, page);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::keys;
    use crate::storage::{MemoryBackend, Preferences};
    use std::sync::Arc;

    const DELAY: Duration = Duration::from_millis(200);

    fn resolver_on(prefs: &SharedPreferences, location: &str) -> ThemeResolver {
        ThemeResolver::new(
            Arc::clone(prefs),
            ChangeNotifier::new(),
            PageKey::from_location(location),
            DELAY,
        )
    }

    fn fresh(location: &str) -> (ThemeResolver, SharedPreferences) {
        let prefs = Preferences::in_memory().shared();
        (resolver_on(&prefs, location), prefs)
    }

    fn page(key: &str) -> PageKey {
        PageKey::new(key)
    }

    #[test]
    fn test_defaults_to_deep_blue() {
        let (resolver, _) = fresh("/index.html");
        assert_eq!(resolver.global_theme(), ThemeId::DeepBlue);
        assert_eq!(resolver.effective_theme(&page("g")), ThemeId::DeepBlue);
        assert_eq!(resolver.active_theme(), ThemeId::DeepBlue);
        assert_eq!(resolver.themes().len(), 4);
    }

    #[test]
    fn test_page_override_only_affects_that_page() {
        let (mut resolver, _) = fresh("/index.html");
        for theme in ThemeId::ALL {
            resolver.set_page_theme(&page("g"), theme.as_str()).unwrap();
            assert_eq!(resolver.effective_theme(&page("g")), theme);
            assert_eq!(resolver.effective_theme(&page("a")), ThemeId::DeepBlue);
            assert_eq!(resolver.effective_theme(&page("index")), ThemeId::DeepBlue);
        }
    }

    #[test]
    fn test_pages_without_override_follow_global() {
        let (mut resolver, _) = fresh("/index.html");
        resolver.set_page_theme(&page("g"), "slate").unwrap();
        for theme in ThemeId::ALL {
            resolver.set_global_theme(theme.as_str()).unwrap();
            assert_eq!(resolver.effective_theme(&page("a")), theme);
            assert_eq!(resolver.effective_theme(&page("s")), theme);
            assert_eq!(resolver.effective_theme(&page("g")), ThemeId::Slate);
        }
    }

    #[test]
    fn test_override_then_reset_scenario() {
        let (mut resolver, _) = fresh("/index.html");
        assert_eq!(resolver.global_theme(), ThemeId::DeepBlue);

        resolver.set_page_theme(&page("g"), "slate").unwrap();
        assert_eq!(resolver.effective_theme(&page("g")), ThemeId::Slate);
        assert_eq!(resolver.effective_theme(&page("a")), ThemeId::DeepBlue);

        resolver.reset_page_theme(&page("g"));
        assert_eq!(resolver.effective_theme(&page("g")), ThemeId::DeepBlue);
        assert!(resolver.page_overrides().is_empty());
    }

    #[test]
    fn test_unknown_theme_leaves_state_untouched() {
        let (mut resolver, prefs) = fresh("/index.html");
        resolver.set_global_theme("slate").unwrap();

        let err = resolver.set_global_theme("not-a-theme").unwrap_err();
        assert_eq!(err, PreferenceError::UnknownTheme("not-a-theme".to_string()));
        assert_eq!(resolver.global_theme(), ThemeId::Slate);
        assert_eq!(prefs.get_theme().as_deref(), Some("slate"));

        let err = resolver.set_page_theme(&page("g"), "sepia").unwrap_err();
        assert!(matches!(err, PreferenceError::UnknownTheme(_)));
        assert!(resolver.page_overrides().is_empty());
    }

    #[test]
    fn test_overrides_survive_reload() {
        let prefs = Preferences::in_memory().shared();
        {
            let mut resolver = resolver_on(&prefs, "/index.html");
            resolver.set_global_theme("aqua-haze").unwrap();
            resolver.set_page_theme(&page("g"), "slate").unwrap();
            resolver.set_page_theme(&page("s"), "midnight-neon").unwrap();
            resolver.set_page_theme(&page("vm"), "deep-blue").unwrap();
        }

        let reloaded = resolver_on(&prefs, "/g.html");
        assert_eq!(reloaded.global_theme(), ThemeId::AquaHaze);
        assert_eq!(reloaded.effective_theme(&page("g")), ThemeId::Slate);
        assert_eq!(reloaded.effective_theme(&page("s")), ThemeId::MidnightNeon);
        assert_eq!(reloaded.effective_theme(&page("vm")), ThemeId::DeepBlue);
        assert_eq!(reloaded.effective_theme(&page("a")), ThemeId::AquaHaze);
        assert_eq!(reloaded.active_theme(), ThemeId::Slate);
    }

    #[test]
    fn test_corrupt_storage_falls_back() {
        let backend = MemoryBackend::with_values([
            (keys::THEME, "sepia"),
            (keys::PAGE_THEMES, r#"{"g":"slate","a":"sepia"}"#),
        ]);
        let prefs = Preferences::new(Box::new(backend)).shared();
        let resolver = resolver_on(&prefs, "/a.html");

        assert_eq!(resolver.global_theme(), ThemeId::DeepBlue);
        assert_eq!(resolver.effective_theme(&page("g")), ThemeId::Slate);
        assert_eq!(resolver.effective_theme(&page("a")), ThemeId::DeepBlue);
    }

    #[test]
    fn test_global_change_hidden_by_current_page_override() {
        let (mut resolver, _) = fresh("/g.html");
        resolver.set_page_theme(&page("g"), "slate").unwrap();
        assert_eq!(resolver.active_theme(), ThemeId::Slate);

        resolver.set_global_theme("aqua-haze").unwrap();
        assert_eq!(resolver.active_theme(), ThemeId::Slate);

        resolver.reset_page_theme(&page("g"));
        assert_eq!(resolver.active_theme(), ThemeId::AquaHaze);
    }

    #[test]
    fn test_other_page_override_does_not_rerender() {
        let (mut resolver, _) = fresh("/index.html");
        resolver.set_page_theme(&page("g"), "slate").unwrap();
        assert_eq!(resolver.active_theme(), ThemeId::DeepBlue);

        resolver.set_page_theme(&page("index"), "midnight-neon").unwrap();
        assert_eq!(resolver.active_theme(), ThemeId::MidnightNeon);
    }

    #[test]
    fn test_mutations_publish_effective_theme() {
        let prefs = Preferences::in_memory().shared();
        let notifier = ChangeNotifier::new();
        let mut listener = notifier.subscribe();
        let mut resolver = ThemeResolver::new(prefs, notifier, page("g"), DELAY);

        resolver.set_global_theme("slate").unwrap();
        resolver.set_page_theme(&page("g"), "aqua-haze").unwrap();
        resolver.set_global_theme("bogus").unwrap_err();

        let changes = listener.drain();
        assert_eq!(
            changes,
            vec![
                PreferenceChange::Theme {
                    scope: PreferenceScope::Global,
                    effective: ThemeId::Slate,
                },
                PreferenceChange::Theme {
                    scope: PreferenceScope::PerPage(page("g")),
                    effective: ThemeId::AquaHaze,
                },
            ]
        );
    }

    #[test]
    fn test_applying_starts_transition() {
        let (mut resolver, _) = fresh("/index.html");
        resolver.set_global_theme("slate").unwrap();
        assert!(resolver.is_transitioning());
        assert_eq!(resolver.active_theme().css_class(), "theme-slate");
    }
}
