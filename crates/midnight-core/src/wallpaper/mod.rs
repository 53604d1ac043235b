//! Portal wallpapers
//!
//! Wallpapers are descriptors in a replaceable catalog. The compiled-in
//! catalog is authoritative until a remote one is loaded successfully.

mod catalog;
mod resolver;

pub use catalog::{
    parse_catalog, validate_catalog, CatalogSource, HttpCatalogSource, StaticCatalogSource,
};
pub use resolver::WallpaperResolver;

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::wallpaper::{DEFAULT_WALLPAPER, IMAGE_OPACITY};

/// How a wallpaper is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallpaperKind {
    /// Theme gradient, no image
    Gradient,
    /// Image at `url`
    Image,
}

/// A selectable wallpaper
///
/// Every field must be present in catalog documents; `url` may be `null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WallpaperDescriptor {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: WallpaperKind,
    /// Image location; always `None` for gradients
    #[serde(deserialize_with = "nullable")]
    pub url: Option<String>,
}

/// Deserialize an `Option` whose key is required even when the value is null
fn nullable<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
}

impl WallpaperDescriptor {
    /// The plain gradient wallpaper
    pub fn default_gradient() -> Self {
        Self {
            id: DEFAULT_WALLPAPER.to_string(),
            name: "default gradient".to_string(),
            kind: WallpaperKind::Gradient,
            url: None,
        }
    }

    fn image(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind: WallpaperKind::Image,
            url: Some(format!("img/wallpapers/{}.jpg", id)),
        }
    }

    /// Image to draw, if any
    pub fn image_url(&self) -> Option<&str> {
        match self.kind {
            WallpaperKind::Image => self.url.as_deref(),
            WallpaperKind::Gradient => None,
        }
    }
}

/// The compiled-in catalog; its first entry is the canonical default
pub fn default_catalog() -> Vec<WallpaperDescriptor> {
    vec![
        WallpaperDescriptor::default_gradient(),
        WallpaperDescriptor::image("abstract-blue", "abstract blue"),
        WallpaperDescriptor::image("neon-city", "neon city"),
        WallpaperDescriptor::image("digital-grid", "digital grid"),
        WallpaperDescriptor::image("space", "space"),
    ]
}

/// Render model of the wallpaper layer behind the page
#[derive(Debug, Clone, PartialEq)]
pub struct WallpaperLayer {
    pub background_image: Option<String>,
    pub opacity: f32,
}

impl WallpaperLayer {
    pub fn for_wallpaper(wallpaper: &WallpaperDescriptor) -> Self {
        match wallpaper.image_url() {
            Some(url) => Self {
                background_image: Some(url.to_string()),
                opacity: IMAGE_OPACITY,
            },
            None => Self::hidden(),
        }
    }

    pub fn hidden() -> Self {
        Self {
            background_image: None,
            opacity: 0.0,
        }
    }
}
