//! Remote wallpaper catalog
//!
//! The catalog document is a JSON array of
//! `{id, name, url|null, type: "gradient"|"image"}`. Anything else is
//! rejected and the caller keeps its current catalog.

use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;

use super::{WallpaperDescriptor, WallpaperKind};
use crate::error::PreferenceError;

/// Somewhere a wallpaper catalog can be loaded from
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch and validate a full catalog
    async fn fetch(&self) -> Result<Vec<WallpaperDescriptor>, PreferenceError>;

    /// Where the catalog comes from, for logs
    fn describe(&self) -> String;
}

/// Parse and validate a catalog document
pub fn parse_catalog(body: &str) -> Result<Vec<WallpaperDescriptor>, PreferenceError> {
    let catalog: Vec<WallpaperDescriptor> = serde_json::from_str(body)
        .map_err(|e| PreferenceError::CatalogFetchFailed(format!("malformed catalog: {}", e)))?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Check that a catalog can replace the current one
///
/// It must be non-empty, ids must be non-empty and unique, and gradients
/// carry no url.
pub fn validate_catalog(catalog: &[WallpaperDescriptor]) -> Result<(), PreferenceError> {
    if catalog.is_empty() {
        return Err(PreferenceError::CatalogFetchFailed(
            "catalog is empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for wallpaper in catalog {
        if wallpaper.id.is_empty() {
            return Err(PreferenceError::CatalogFetchFailed(
                "wallpaper with empty id".to_string(),
            ));
        }
        if !seen.insert(wallpaper.id.as_str()) {
            return Err(PreferenceError::CatalogFetchFailed(format!(
                "duplicate wallpaper id \"{}\"",
                wallpaper.id
            )));
        }
        if wallpaper.kind == WallpaperKind::Gradient && wallpaper.url.is_some() {
            return Err(PreferenceError::CatalogFetchFailed(format!(
                "gradient wallpaper \"{}\" has a url",
                wallpaper.id
            )));
        }
    }

    Ok(())
}

/// Catalog served over HTTP
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalogSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, PreferenceError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("midnight/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> Result<Vec<WallpaperDescriptor>, PreferenceError> {
        debug!("Fetching wallpaper catalog: {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(PreferenceError::CatalogFetchFailed(format!(
                "catalog server returned: {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        parse_catalog(&body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Catalog held in memory (tests, bundled data)
#[derive(Debug, Clone)]
pub struct StaticCatalogSource {
    result: Result<Vec<WallpaperDescriptor>, PreferenceError>,
}

impl StaticCatalogSource {
    /// Source that returns `catalog`
    pub fn new(catalog: Vec<WallpaperDescriptor>) -> Self {
        Self {
            result: Ok(catalog),
        }
    }

    /// Source that parses `body` when fetched
    pub fn from_json(body: &str) -> Self {
        Self {
            result: parse_catalog(body),
        }
    }

    /// Source that always fails
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            result: Err(PreferenceError::CatalogFetchFailed(reason.into())),
        }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
    async fn fetch(&self) -> Result<Vec<WallpaperDescriptor>, PreferenceError> {
        self.result.clone()
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}
