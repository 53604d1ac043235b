//! Local filesystem locations

use std::path::PathBuf;

use crate::constants::dirs::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DATABASE_FILE_NAME, LOGS_DIR_NAME,
};

/// Root config directory (`~/.midnight`)
///
/// Falls back to the current directory when no home directory is known.
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Directory for log files
pub fn logs_dir() -> PathBuf {
    config_dir().join(LOGS_DIR_NAME)
}

/// Default SQLite database location
pub fn database_path() -> PathBuf {
    config_dir().join(DATABASE_FILE_NAME)
}

/// Default config file location
pub fn config_file() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}
