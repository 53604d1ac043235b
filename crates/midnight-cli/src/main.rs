//! Midnight - portal preferences from the terminal
//!
//! Reads and writes the same preference store the portal uses:
//! - Global and per-page themes
//! - Global and per-page wallpapers (with remote catalog refresh)
//! - Recently visited pages

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use midnight_core::{paths, PageKey, Portal, PortalConfig};

mod output;

/// Midnight portal preferences
#[derive(Parser)]
#[command(name = "midnight")]
#[command(about = "Inspect and change Midnight portal preferences", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Location of the page being viewed (path or URL)
    #[arg(short, long, default_value = "/index.html", global = true)]
    path: String,

    /// Database file (overrides the config)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Config file (defaults to ~/.midnight/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available themes
    Themes,

    /// List available wallpapers
    Wallpapers {
        /// Load the remote catalog first
        #[arg(long)]
        refresh: bool,
    },

    /// Show the effective theme and wallpaper of the current page
    Show {
        /// Load the remote catalog first
        #[arg(long)]
        refresh: bool,
    },

    /// Change themes
    Theme {
        #[command(subcommand)]
        action: ThemeCommands,
    },

    /// Change wallpapers
    Wallpaper {
        #[command(subcommand)]
        action: WallpaperCommands,
    },

    /// Record a page visit
    Visit { location: String },

    /// List recently visited pages
    Recent,
}

#[derive(Subcommand)]
enum ThemeCommands {
    /// Set the global theme, or one page's theme with --page
    Set {
        id: String,
        #[arg(long)]
        page: Option<String>,
    },
    /// Remove a page override
    Reset { page: String },
}

#[derive(Subcommand)]
enum WallpaperCommands {
    /// Set the global wallpaper, or one page's wallpaper with --page
    Set {
        id: String,
        #[arg(long)]
        page: Option<String>,
        /// Load the remote catalog first
        #[arg(long)]
        refresh: bool,
    },
    /// Remove a page override
    Reset { page: String },
}

fn init_logging() {
    let log_dir = paths::logs_dir();
    std::fs::create_dir_all(&log_dir).ok();

    // Logs go to a file so command output stays clean
    let Ok(log_file) = std::fs::File::create(log_dir.join("midnight.log")) else {
        return;
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<PortalConfig> {
    let mut config = match &cli.config {
        Some(path) => PortalConfig::load_from_path(path)?,
        None => PortalConfig::load()?,
    };
    if let Some(db) = &cli.db {
        config.database = Some(db.clone());
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let mut portal = Portal::open(config, &cli.path);
    tracing::info!("Running command for page {}", portal.page());

    match cli.command {
        Commands::Themes => output::print_themes(&portal),
        Commands::Wallpapers { refresh } => {
            if refresh {
                refresh_catalog(&mut portal).await;
            }
            output::print_wallpapers(&portal);
        }
        Commands::Show { refresh } => {
            if refresh {
                refresh_catalog(&mut portal).await;
            }
            output::print_effective(&portal);
        }
        Commands::Theme { action } => match action {
            ThemeCommands::Set { id, page: None } => {
                portal.set_global_theme(&id)?;
                println!("Global theme set to {}", id);
            }
            ThemeCommands::Set { id, page: Some(page) } => {
                let page = PageKey::new(page);
                portal.set_page_theme(&page, &id)?;
                println!("Theme for {} set to {}", page, id);
            }
            ThemeCommands::Reset { page } => {
                let page = PageKey::new(page);
                portal.reset_page_theme(&page);
                println!(
                    "Theme override for {} removed (now {})",
                    page,
                    portal.themes().effective_theme(&page)
                );
            }
        },
        Commands::Wallpaper { action } => match action {
            WallpaperCommands::Set { id, page, refresh } => {
                if refresh {
                    refresh_catalog(&mut portal).await;
                }
                match page {
                    None => {
                        portal.set_wallpaper(&id)?;
                        println!("Global wallpaper set to {}", id);
                    }
                    Some(page) => {
                        let page = PageKey::new(page);
                        portal.set_page_wallpaper(&page, &id)?;
                        println!("Wallpaper for {} set to {}", page, id);
                    }
                }
            }
            WallpaperCommands::Reset { page } => {
                let page = PageKey::new(page);
                portal.reset_page_wallpaper(&page);
                println!(
                    "Wallpaper override for {} removed (now {})",
                    page,
                    portal.wallpapers().effective_wallpaper(&page).id
                );
            }
        },
        Commands::Visit { location } => {
            portal.track_visit(&location);
            output::print_recent(&portal);
        }
        Commands::Recent => output::print_recent(&portal),
    }

    if portal.preferences().is_degraded() {
        eprintln!("warning: preference storage unavailable, changes were not saved");
    }

    Ok(())
}

async fn refresh_catalog(portal: &mut Portal) {
    if !portal.refresh_catalog().await {
        eprintln!(
            "Catalog at {} unavailable, using built-in wallpapers",
            portal.config().catalog_url
        );
    }
}
