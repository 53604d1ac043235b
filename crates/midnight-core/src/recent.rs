//! Recently visited portal pages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consumers::header::page_title;
use crate::constants::page::{INDEX_FILE, MAX_RECENT_ITEMS};
use crate::page::{page_file, PageKey};
use crate::storage::SharedPreferences;

/// A visited page as shown in the "recent" list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentItem {
    pub title: String,
    /// Font Awesome icon class
    pub icon: String,
    /// Page file, e.g. `g.html`
    pub url: String,
    /// Visit time, milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// Icon of a trackable page, `None` for pages that are not tracked
fn page_icon(page: &PageKey) -> Option<&'static str> {
    let icon = match page.as_str() {
        "g" => "fa-gamepad",
        "a" => "fa-th-large",
        "p" => "fa-globe",
        "ai" => "fa-robot",
        "vm" => "fa-desktop",
        "m" => "fa-film",
        "s" => "fa-gear",
        _ => return None,
    };
    Some(icon)
}

/// Most-recent-first list of visited pages, persisted on every visit
#[derive(Debug)]
pub struct RecentPages {
    prefs: SharedPreferences,
    items: Vec<RecentItem>,
}

impl RecentPages {
    pub fn new(prefs: SharedPreferences) -> Self {
        let items = prefs.get_recent_items();
        Self { prefs, items }
    }

    pub fn items(&self) -> &[RecentItem] {
        &self.items
    }

    /// Record a visit to `location` now
    pub fn track_visit(&mut self, location: &str) {
        self.track_visit_at(location, Utc::now());
    }

    /// Record a visit at a given time (moves to front if present)
    ///
    /// The portal root and unknown pages are not tracked.
    pub fn track_visit_at(&mut self, location: &str, at: DateTime<Utc>) {
        let file = page_file(location);
        if file == INDEX_FILE {
            return;
        }

        let page = PageKey::from_location(&file);
        let Some(icon) = page_icon(&page) else {
            return;
        };

        self.items.retain(|item| item.url != file);
        self.items.insert(
            0,
            RecentItem {
                title: page_title(&page),
                icon: icon.to_string(),
                url: file,
                timestamp: at.timestamp_millis(),
            },
        );
        self.items.truncate(MAX_RECENT_ITEMS);

        if let Err(e) = self.prefs.set_recent_items(&self.items) {
            debug!("Recent pages kept in memory only: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Preferences;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn urls(recent: &RecentPages) -> Vec<&str> {
        recent.items().iter().map(|i| i.url.as_str()).collect()
    }

    #[test]
    fn test_tracks_known_pages_most_recent_first() {
        let mut recent = RecentPages::new(Preferences::in_memory().shared());
        recent.track_visit_at("/g.html", at(1));
        recent.track_visit_at("/m.html", at(2));

        assert_eq!(urls(&recent), vec!["m.html", "g.html"]);
        let movies = &recent.items()[0];
        assert_eq!(movies.title, "movies");
        assert_eq!(movies.icon, "fa-film");
        assert_eq!(movies.timestamp, 2000);
    }

    #[test]
    fn test_skips_index_and_unknown_pages() {
        let mut recent = RecentPages::new(Preferences::in_memory().shared());
        recent.track_visit_at("/", at(1));
        recent.track_visit_at("/index.html", at(2));
        recent.track_visit_at("/about.html", at(3));
        assert!(recent.items().is_empty());
    }

    #[test]
    fn test_revisit_moves_to_front() {
        let mut recent = RecentPages::new(Preferences::in_memory().shared());
        recent.track_visit_at("/g.html", at(1));
        recent.track_visit_at("/a.html", at(2));
        recent.track_visit_at("/g.html", at(3));

        assert_eq!(urls(&recent), vec!["g.html", "a.html"]);
        assert_eq!(recent.items()[0].timestamp, 3000);
    }

    #[test]
    fn test_keeps_at_most_six() {
        let mut recent = RecentPages::new(Preferences::in_memory().shared());
        for (i, page) in ["g", "a", "p", "ai", "vm", "m", "s"].iter().enumerate() {
            recent.track_visit_at(&format!("/{}.html", page), at(i as i64));
        }
        assert_eq!(
            urls(&recent),
            vec!["s.html", "m.html", "vm.html", "ai.html", "p.html", "a.html"]
        );
    }

    #[test]
    fn test_persists_across_sessions() {
        let prefs = Preferences::in_memory().shared();
        {
            let mut recent = RecentPages::new(Arc::clone(&prefs));
            recent.track_visit_at("https://portal.example/vm.html", at(10));
        }
        let recent = RecentPages::new(prefs);
        assert_eq!(urls(&recent), vec!["vm.html"]);
        assert_eq!(recent.items()[0].title, "browser vm");
    }
}
