//! Persistence layer
//!
//! Key/value preference storage over:
//! - SQLite (durable, used by the CLI)
//! - An in-memory map (tests, and sessions whose storage is unavailable)

mod backend;
mod database;
#[cfg(test)]
mod database_tests;
mod memory;
mod preferences;

pub use backend::PreferenceBackend;
pub use database::Database;
pub use memory::MemoryBackend;
pub use preferences::{decode_or_default, Preferences, SharedPreferences};
