//! Terminal output for CLI commands

use chrono::{Local, TimeZone};

use midnight_core::wallpaper::WallpaperKind;
use midnight_core::Portal;

/// Marker for the entry that applies to the current page
fn marker(active: bool) -> &'static str {
    if active {
        "*"
    } else {
        " "
    }
}

pub fn print_themes(portal: &Portal) {
    let items = portal.quick_settings().theme_items();
    println!("Available themes ({}):", items.len());
    for item in items {
        println!("  {} {} - {}", marker(item.active), item.id, item.label);
    }

    let overrides = portal.themes().page_overrides();
    if !overrides.is_empty() {
        println!();
        println!("Page overrides:");
        for (page, theme) in overrides {
            println!("  {:<8} {}", page, theme);
        }
    }
}

pub fn print_wallpapers(portal: &Portal) {
    let wallpapers = portal.wallpapers();
    let active = wallpapers.effective_wallpaper(portal.page());

    println!("Available wallpapers ({}):", wallpapers.catalog().len());
    for wallpaper in wallpapers.catalog() {
        let source = match wallpaper.kind {
            WallpaperKind::Gradient => "gradient".to_string(),
            WallpaperKind::Image => wallpaper.url.clone().unwrap_or_default(),
        };
        println!(
            "  {} {:<14} {:<18} {}",
            marker(wallpaper.id == active.id),
            wallpaper.id,
            wallpaper.name,
            source
        );
    }

    let overrides = wallpapers.page_overrides();
    if !overrides.is_empty() {
        println!();
        println!("Page overrides:");
        for (page, id) in overrides {
            println!("  {:<8} {}", page, id);
        }
    }
}

pub fn print_effective(portal: &Portal) {
    let page = portal.page();
    let theme = portal.themes().effective_theme(page);
    let wallpaper = portal.wallpapers().effective_wallpaper(page);
    let scope = |overridden: bool| if overridden { "page" } else { "global" };

    println!("Page:      {} ({})", page, portal.header().title());
    println!(
        "Theme:     {} [{}]",
        theme,
        scope(portal.themes().page_overrides().contains_key(page))
    );
    println!(
        "Wallpaper: {} [{}]",
        wallpaper.id,
        scope(portal.wallpapers().page_overrides().contains_key(page))
    );
    println!("Accent:    {}", portal.particles().config().color);
}

pub fn print_recent(portal: &Portal) {
    let items = portal.recent().items();
    if items.is_empty() {
        println!("No recent pages.");
        return;
    }

    println!("Recent pages:");
    for item in items {
        let when = Local
            .timestamp_millis_opt(item.timestamp)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!("  {:<10} {:<12} {}", item.url, item.title, when);
    }
}
