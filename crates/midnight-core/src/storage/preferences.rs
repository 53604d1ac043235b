//! User preferences storage

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use super::backend::PreferenceBackend;
use super::database::Database;
use super::memory::MemoryBackend;
use crate::constants::keys;
use crate::error::PreferenceError;
use crate::page::PageKey;
use crate::recent::RecentItem;

/// Preferences shared by every resolver and consumer of a session
pub type SharedPreferences = Arc<Preferences>;

/// Decode a stored JSON value, falling back to `T::default()`
///
/// Missing values, invalid JSON, and JSON of the wrong shape all decode to
/// the default. Never panics, whatever the input.
pub fn decode_or_default<T>(raw: Option<&str>) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = raw else {
        return T::default();
    };
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            debug!("Discarding malformed stored value: {}", e);
            T::default()
        }
    }
}

/// User preferences manager
///
/// Wraps a storage backend. The first medium failure switches the session to
/// memory-only mode: later writes land in an in-process overlay and reads
/// consult that overlay before the backend.
pub struct Preferences {
    backend: Mutex<Box<dyn PreferenceBackend>>,
    /// Writes made while degraded; `None` marks a deletion
    overlay: Mutex<HashMap<String, Option<String>>>,
    degraded: AtomicBool,
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences")
            .field("backend", &self.backend.lock().name())
            .field("degraded", &self.is_degraded())
            .finish()
    }
}

impl Preferences {
    /// Create preferences over any backend
    pub fn new(backend: Box<dyn PreferenceBackend>) -> Self {
        Self {
            backend: Mutex::new(backend),
            overlay: Mutex::new(HashMap::new()),
            degraded: AtomicBool::new(false),
        }
    }

    /// Preferences persisted in a SQLite database
    pub fn with_database(db: Database) -> Self {
        Self::new(Box::new(db))
    }

    /// Volatile preferences
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryBackend::new()))
    }

    pub fn shared(self) -> SharedPreferences {
        Arc::new(self)
    }

    /// Whether the session fell back to memory-only storage
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    fn degrade(&self, reason: &anyhow::Error) -> PreferenceError {
        if !self.degraded.swap(true, Ordering::Relaxed) {
            warn!(
                "Preference storage unavailable, continuing in memory only: {}",
                reason
            );
        }
        PreferenceError::StorageUnavailable(reason.to_string())
    }

    /// Get a preference value
    pub fn get(&self, key: &str) -> Option<String> {
        if self.is_degraded() {
            if let Some(value) = self.overlay.lock().get(key) {
                return value.clone();
            }
        }

        let result = self.backend.lock().read(key);
        match result {
            Ok(value) => value,
            Err(e) => {
                self.degrade(&e);
                None
            }
        }
    }

    /// Set a preference value
    ///
    /// Returns `StorageUnavailable` when the value only reached memory.
    pub fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.store(key, Some(value))
    }

    /// Delete a preference
    pub fn delete(&self, key: &str) -> Result<(), PreferenceError> {
        self.store(key, None)
    }

    fn store(&self, key: &str, value: Option<&str>) -> Result<(), PreferenceError> {
        if !self.is_degraded() {
            let mut backend = self.backend.lock();
            let result = match value {
                Some(value) => backend.write(key, value),
                None => backend.remove(key),
            };
            match result {
                Ok(()) => return Ok(()),
                Err(e) => {
                    drop(backend);
                    let err = self.degrade(&e);
                    self.remember(key, value);
                    return Err(err);
                }
            }
        }

        self.remember(key, value);
        Err(PreferenceError::StorageUnavailable(
            "session is memory-only".to_string(),
        ))
    }

    fn remember(&self, key: &str, value: Option<&str>) {
        self.overlay
            .lock()
            .insert(key.to_string(), value.map(str::to_string));
    }

    /// Get a JSON value, or the default when missing or malformed
    pub fn get_json_or_default<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        decode_or_default(self.get(key).as_deref())
    }

    /// Store a value as JSON
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), PreferenceError> {
        let json = serde_json::to_string(value)
            .map_err(|e| PreferenceError::StorageUnavailable(e.to_string()))?;
        self.set(key, &json)
    }

    /// Get stored global theme id (unvalidated)
    pub fn get_theme(&self) -> Option<String> {
        self.get(keys::THEME)
    }

    /// Save global theme id
    pub fn set_theme(&self, theme: &str) -> Result<(), PreferenceError> {
        self.set(keys::THEME, theme)
    }

    /// Get per-page theme overrides (unvalidated)
    pub fn get_page_themes(&self) -> BTreeMap<PageKey, String> {
        self.get_json_or_default(keys::PAGE_THEMES)
    }

    /// Save per-page theme overrides
    pub fn set_page_themes<V: Serialize>(
        &self,
        themes: &BTreeMap<PageKey, V>,
    ) -> Result<(), PreferenceError> {
        self.set_json(keys::PAGE_THEMES, themes)
    }

    /// Get stored global wallpaper id
    pub fn get_wallpaper(&self) -> Option<String> {
        self.get(keys::WALLPAPER)
    }

    /// Save global wallpaper id
    pub fn set_wallpaper(&self, id: &str) -> Result<(), PreferenceError> {
        self.set(keys::WALLPAPER, id)
    }

    /// Get per-page wallpaper overrides
    pub fn get_page_wallpapers(&self) -> BTreeMap<PageKey, String> {
        self.get_json_or_default(keys::PAGE_WALLPAPERS)
    }

    /// Save per-page wallpaper overrides
    pub fn set_page_wallpapers(
        &self,
        wallpapers: &BTreeMap<PageKey, String>,
    ) -> Result<(), PreferenceError> {
        self.set_json(keys::PAGE_WALLPAPERS, wallpapers)
    }

    /// Get recently visited pages, most recent first
    pub fn get_recent_items(&self) -> Vec<RecentItem> {
        self.get_json_or_default(keys::RECENT_ITEMS)
    }

    /// Save recently visited pages
    pub fn set_recent_items(&self, items: &[RecentItem]) -> Result<(), PreferenceError> {
        self.set_json(keys::RECENT_ITEMS, &items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    /// Backend whose medium is gone (quota exceeded, storage disabled)
    struct UnavailableBackend;

    impl PreferenceBackend for UnavailableBackend {
        fn read(&self, _key: &str) -> anyhow::Result<Option<String>> {
            Err(anyhow!("storage disabled"))
        }

        fn write(&mut self, _key: &str, _value: &str) -> anyhow::Result<()> {
            Err(anyhow!("quota exceeded"))
        }

        fn remove(&mut self, _key: &str) -> anyhow::Result<()> {
            Err(anyhow!("storage disabled"))
        }

        fn name(&self) -> &'static str {
            "unavailable"
        }
    }

    /// Reads work, writes fail
    struct ReadOnlyBackend(MemoryBackend);

    impl PreferenceBackend for ReadOnlyBackend {
        fn read(&self, key: &str) -> anyhow::Result<Option<String>> {
            self.0.read(key)
        }

        fn write(&mut self, _key: &str, _value: &str) -> anyhow::Result<()> {
            Err(anyhow!("quota exceeded"))
        }

        fn remove(&mut self, _key: &str) -> anyhow::Result<()> {
            Err(anyhow!("quota exceeded"))
        }

        fn name(&self) -> &'static str {
            "read-only"
        }
    }

    #[test]
    fn test_get_set_delete() {
        let prefs = Preferences::in_memory();
        assert_eq!(prefs.get("k"), None);
        prefs.set("k", "v").unwrap();
        assert_eq!(prefs.get("k").as_deref(), Some("v"));
        prefs.delete("k").unwrap();
        assert_eq!(prefs.get("k"), None);
        assert!(!prefs.is_degraded());
    }

    #[test]
    fn test_decode_or_default_rejects_garbage() {
        let inputs = [
            "",
            "{",
            "null",
            "[]",
            "42",
            "\"g\"",
            "{\"g\": 7}",
            "{\"g\": [\"slate\"]}",
            "\u{0}\u{1}\u{2}",
            "{\"g\":\"slate\",}",
        ];
        for input in inputs {
            let map: BTreeMap<PageKey, String> = decode_or_default(Some(input));
            assert!(map.is_empty(), "expected empty map for {:?}", input);
        }

        let missing: BTreeMap<PageKey, String> = decode_or_default(None);
        assert!(missing.is_empty());
    }

    #[test]
    fn test_decode_or_default_accepts_valid_map() {
        let map: BTreeMap<PageKey, String> =
            decode_or_default(Some(r#"{"g":"slate","s":"aqua-haze"}"#));
        assert_eq!(map.len(), 2);
        assert_eq!(map[&PageKey::new("g")], "slate");
    }

    #[test]
    fn test_malformed_page_map_reads_as_empty() {
        let backend = MemoryBackend::with_values([(keys::PAGE_THEMES, "{not json")]);
        let prefs = Preferences::new(Box::new(backend));
        assert!(prefs.get_page_themes().is_empty());
    }

    #[test]
    fn test_unavailable_storage_degrades_to_memory() {
        let prefs = Preferences::new(Box::new(UnavailableBackend));

        assert_eq!(prefs.get(keys::THEME), None);
        assert!(prefs.is_degraded());

        let err = prefs.set(keys::THEME, "slate").unwrap_err();
        assert!(matches!(err, PreferenceError::StorageUnavailable(_)));

        // Value still resolves in-process
        assert_eq!(prefs.get(keys::THEME).as_deref(), Some("slate"));

        prefs.delete(keys::THEME).unwrap_err();
        assert_eq!(prefs.get(keys::THEME), None);
    }

    #[test]
    fn test_failed_write_keeps_earlier_values_readable() {
        let backend = ReadOnlyBackend(MemoryBackend::with_values([
            (keys::THEME, "slate"),
            (keys::WALLPAPER, "space"),
        ]));
        let prefs = Preferences::new(Box::new(backend));

        assert!(prefs.set_theme("aqua-haze").is_err());
        assert!(prefs.is_degraded());
        assert_eq!(prefs.get_theme().as_deref(), Some("aqua-haze"));
        assert_eq!(prefs.get_wallpaper().as_deref(), Some("space"));
    }

    #[test]
    fn test_json_round_trip() {
        let prefs = Preferences::in_memory();
        let mut map = BTreeMap::new();
        map.insert(PageKey::new("g"), "neon-city".to_string());
        prefs.set_page_wallpapers(&map).unwrap();
        assert_eq!(prefs.get_page_wallpapers(), map);
    }
}
