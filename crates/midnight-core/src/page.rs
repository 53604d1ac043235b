//! Page identity
//!
//! Every navigation location maps to a canonical page key: the last path
//! segment with its extension stripped, or `index` for the portal root.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::constants::page::{INDEX_FILE, INDEX_PAGE};

/// Canonical identifier of a logical portal page (`index`, `g`, `s`, ...)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageKey(String);

impl PageKey {
    /// Wrap an already-canonical key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The portal root
    pub fn index() -> Self {
        Self(INDEX_PAGE.to_string())
    }

    /// Derive the key from a location (absolute URL or path)
    pub fn from_location(location: &str) -> Self {
        let file = last_segment(&location_path(location));
        let stem = file.split('.').next().unwrap_or_default();
        if stem.is_empty() {
            Self::index()
        } else {
            Self(stem.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_index(&self) -> bool {
        self.0 == INDEX_PAGE
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for PageKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// File name of the page at `location` (`index.html` for the root)
pub fn page_file(location: &str) -> String {
    let file = last_segment(&location_path(location));
    if file.is_empty() {
        INDEX_FILE.to_string()
    } else {
        file
    }
}

/// Path component of a location, without query or fragment
fn location_path(location: &str) -> String {
    if let Ok(url) = Url::parse(location) {
        return url.path().to_string();
    }
    location
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .to_string()
}

fn last_segment(path: &str) -> String {
    path.rsplit('/').next().unwrap_or_default().to_string()
}
