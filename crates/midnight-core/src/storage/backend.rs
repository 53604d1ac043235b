//! Storage medium abstraction

use anyhow::Result;

/// A string key/value medium the preference store persists into
///
/// Implementations report medium failures (disk full, locked database,
/// disabled storage) as errors; `Preferences` turns those into
/// memory-only operation.
pub trait PreferenceBackend: Send {
    /// Read a value, `Ok(None)` when the key is absent
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace a value
    fn write(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove a value (no-op when absent)
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}
