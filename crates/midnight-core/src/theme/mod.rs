//! Portal themes
//!
//! A fixed set of four themes plus the static presentation data renderers
//! need for each one.

mod resolver;

pub use resolver::ThemeResolver;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PreferenceError;

/// One of the portal's built-in themes
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeId {
    #[default]
    DeepBlue,
    MidnightNeon,
    Slate,
    AquaHaze,
}

impl ThemeId {
    /// All themes in display order
    pub const ALL: [ThemeId; 4] = [
        ThemeId::DeepBlue,
        ThemeId::MidnightNeon,
        ThemeId::Slate,
        ThemeId::AquaHaze,
    ];

    /// Stored identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeId::DeepBlue => "deep-blue",
            ThemeId::MidnightNeon => "midnight-neon",
            ThemeId::Slate => "slate",
            ThemeId::AquaHaze => "aqua-haze",
        }
    }

    /// Human label shown in selectors
    pub fn label(&self) -> String {
        self.as_str().replace('-', " ")
    }

    /// Class applied to the page body
    pub fn css_class(&self) -> String {
        format!("theme-{}", self.as_str())
    }

    /// Accent colour, used by the particle engine
    pub fn accent_color(&self) -> &'static str {
        match self {
            ThemeId::DeepBlue => "#0066ff",
            ThemeId::MidnightNeon => "#ff00ff",
            ThemeId::Slate => "#8a9bb0",
            ThemeId::AquaHaze => "#00e5cc",
        }
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ThemeId {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThemeId::ALL
            .into_iter()
            .find(|theme| theme.as_str() == s)
            .ok_or_else(|| PreferenceError::UnknownTheme(s.to_string()))
    }
}
