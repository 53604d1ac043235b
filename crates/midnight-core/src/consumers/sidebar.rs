//! Sidebar state: expansion, hover blur, popups, and the active nav item

use crate::constants::page::INDEX_FILE;
use crate::page::page_file;

/// Popups opened from sidebar buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Popup {
    Extra,
    Links,
    Discord,
}

/// A key event as delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress<'a> {
    pub key: &'a str,
    pub ctrl: bool,
}

impl<'a> KeyPress<'a> {
    pub fn plain(key: &'a str) -> Self {
        Self { key, ctrl: false }
    }

    pub fn ctrl(key: &'a str) -> Self {
        Self { key, ctrl: true }
    }
}

/// Navigation link in the sidebar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub href: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sidebar {
    force_expanded: bool,
    content_blurred: bool,
    popup: Option<Popup>,
    nav: Vec<NavItem>,
}

impl Sidebar {
    /// Build the sidebar for `location`, marking the matching nav link
    pub fn new<I, S>(location: &str, hrefs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let current = page_file(location);
        let nav = hrefs
            .into_iter()
            .map(|href| {
                let href = href.into();
                let active = href == current || (current == INDEX_FILE && href == "/");
                NavItem { href, active }
            })
            .collect();

        Self {
            force_expanded: false,
            content_blurred: false,
            popup: None,
            nav,
        }
    }

    /// Handle a key press; returns true when the key was consumed
    ///
    /// `]` or Ctrl+B toggles forced expansion, Escape closes popups.
    pub fn handle_key(&mut self, key: KeyPress<'_>) -> bool {
        match key {
            KeyPress { key: "]", .. } | KeyPress { key: "b", ctrl: true } => {
                self.force_expanded = !self.force_expanded;
                true
            }
            KeyPress { key: "Escape", .. } => {
                self.close_popups();
                false
            }
            _ => false,
        }
    }

    pub fn hover_enter(&mut self) {
        self.content_blurred = true;
    }

    pub fn hover_leave(&mut self) {
        self.content_blurred = false;
    }

    /// Show a popup (and the overlay behind it)
    pub fn open_popup(&mut self, popup: Popup) {
        self.popup = Some(popup);
    }

    /// Close button, overlay click, or Escape
    pub fn close_popups(&mut self) {
        self.popup = None;
    }

    pub fn is_force_expanded(&self) -> bool {
        self.force_expanded
    }

    pub fn is_content_blurred(&self) -> bool {
        self.content_blurred
    }

    pub fn open_popup_kind(&self) -> Option<Popup> {
        self.popup
    }

    /// Overlay is visible whenever a popup is
    pub fn is_overlay_visible(&self) -> bool {
        self.popup.is_some()
    }

    pub fn nav(&self) -> &[NavItem] {
        &self.nav
    }

    pub fn active_nav(&self) -> Option<&NavItem> {
        self.nav.iter().find(|item| item.active)
    }
}
