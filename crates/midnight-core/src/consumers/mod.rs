//! Preference consumers
//!
//! Passive renderers that read resolved preferences:
//! - Quick settings panel (header theme/wallpaper switcher)
//! - Particle engine (follows the theme accent colour)
//! - Sidebar and header chrome

pub mod header;
pub mod particles;
pub mod quick_settings;
pub mod sidebar;

pub use header::{page_title, Header};
pub use particles::{ParticleConfig, ParticleEngine, ParticleKind, Sprite, Viewport};
pub use quick_settings::{Preview, QuickSettings, SelectorItem};
pub use sidebar::{KeyPress, NavItem, Popup, Sidebar};
