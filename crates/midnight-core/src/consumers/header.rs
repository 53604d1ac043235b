//! Page header

use crate::page::PageKey;

/// Title shown in the header for a page
pub fn page_title(page: &PageKey) -> String {
    let title = match page.as_str() {
        "index" => "home",
        "g" => "games",
        "a" => "apps",
        "p" => "proxy",
        "ai" => "cloudai",
        "vm" => "browser vm",
        "m" => "movies",
        "s" => "settings",
        other => other,
    };
    title.to_string()
}

/// Header chrome of the current page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    title: String,
}

impl Header {
    pub fn new(page: &PageKey) -> Self {
        Self {
            title: page_title(page),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}
