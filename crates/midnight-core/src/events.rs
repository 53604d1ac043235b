//! Preference change notifications
//!
//! Resolvers publish a `PreferenceChange` after every successful mutation;
//! consumers hold a receiver and re-render when they drain it.

use tokio::sync::broadcast;
use tracing::trace;

use crate::page::PageKey;
use crate::theme::ThemeId;
use crate::wallpaper::WallpaperDescriptor;

/// Capacity of the change channel; slow consumers skip to the newest events
const CHANNEL_CAPACITY: usize = 64;

/// Which pages a preference mutation applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PreferenceScope {
    /// Every page without an override
    Global,
    /// One page only
    PerPage(PageKey),
}

/// A preference mutation, carrying the value now effective on the current page
#[derive(Debug, Clone, PartialEq)]
pub enum PreferenceChange {
    Theme {
        scope: PreferenceScope,
        effective: ThemeId,
    },
    Wallpaper {
        scope: PreferenceScope,
        effective: WallpaperDescriptor,
    },
    /// The wallpaper catalog was replaced wholesale
    CatalogReplaced { len: usize },
}

/// Publishing side of the change channel
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<PreferenceChange>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Register a new listener; it sees changes published from now on
    pub fn subscribe(&self) -> ChangeListener {
        ChangeListener {
            rx: self.tx.subscribe(),
        }
    }

    /// Publish a change to every listener
    pub fn publish(&self, change: PreferenceChange) {
        // No listeners is not an error
        if self.tx.send(change).is_err() {
            trace!("Preference change published with no listeners");
        }
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side held by a consumer
#[derive(Debug)]
pub struct ChangeListener {
    rx: broadcast::Receiver<PreferenceChange>,
}

impl ChangeListener {
    /// Take every pending change without blocking
    ///
    /// If the listener fell behind, the oldest changes are skipped; the
    /// newest ones are still returned.
    pub fn drain(&mut self) -> Vec<PreferenceChange> {
        let mut changes = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(change) => changes.push(change),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    trace!("Change listener lagged, skipped {} events", skipped);
                }
                Err(_) => break,
            }
        }
        changes
    }
}
