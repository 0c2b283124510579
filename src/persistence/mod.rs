//! Score ceiling persistence
//!
//! A single float survives across rounds: the score that counts as a win.
//! Persisted to LocalStorage on the web, kept in memory elsewhere.

use anyhow::{Context, Result};

use crate::consts::{CEILING_GROWTH, DEFAULT_MAX_SCORE};

/// Storage for the persisted score ceiling
pub trait CeilingStore {
    /// Stored ceiling, `None` if absent or unreadable
    fn load(&self) -> Option<f64>;
    fn save(&mut self, value: f64);
}

/// Parse a stored ceiling. Only finite positive values are accepted.
pub fn parse_ceiling(raw: &str) -> Result<f64> {
    let value: f64 = serde_json::from_str(raw.trim())
        .with_context(|| format!("stored ceiling {raw:?} is not a number"))?;
    anyhow::ensure!(
        value.is_finite() && value > 0.0,
        "stored ceiling {value} is out of range"
    );
    Ok(value)
}

/// Ceiling for a new round
pub fn read_ceiling(store: &dyn CeilingStore) -> f64 {
    store.load().unwrap_or(DEFAULT_MAX_SCORE)
}

/// Grow the ceiling after a win and persist it. Returns the new value.
pub fn grow_ceiling(store: &mut dyn CeilingStore, current: f64) -> f64 {
    let next = current * CEILING_GROWTH;
    store.save(next);
    log::info!("Score ceiling raised {current} -> {next}");
    next
}

/// In-memory store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub value: Option<f64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: f64) -> Self {
        Self { value: Some(value) }
    }
}

impl CeilingStore for MemoryStore {
    fn load(&self) -> Option<f64> {
        self.value.filter(|v| v.is_finite() && *v > 0.0)
    }

    fn save(&mut self, value: f64) {
        self.value = Some(value);
    }
}

/// LocalStorage-backed store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Result<web_sys::Storage> {
        web_sys::window()
            .context("no window")?
            .local_storage()
            .map_err(|e| anyhow::anyhow!("local storage unavailable: {e:?}"))?
            .context("local storage disabled")
    }

    fn try_load(&self) -> Result<Option<f64>> {
        let raw = Self::storage()?
            .get_item(&self.key)
            .map_err(|e| anyhow::anyhow!("read {} failed: {e:?}", self.key))?;
        raw.map(|raw| parse_ceiling(&raw)).transpose()
    }

    fn try_save(&self, value: f64) -> Result<()> {
        let json = serde_json::to_string(&value)?;
        Self::storage()?
            .set_item(&self.key, &json)
            .map_err(|e| anyhow::anyhow!("write {} failed: {e:?}", self.key))
    }
}

#[cfg(target_arch = "wasm32")]
impl CeilingStore for LocalStorageStore {
    fn load(&self) -> Option<f64> {
        match self.try_load() {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Ignoring stored ceiling: {e:#}");
                None
            }
        }
    }

    fn save(&mut self, value: f64) {
        if let Err(e) = self.try_save(value) {
            log::warn!("Could not persist ceiling: {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ceiling() {
        assert_eq!(read_ceiling(&MemoryStore::new()), 500.0);
    }

    #[test]
    fn test_win_grows_ceiling() {
        let mut store = MemoryStore::new();
        let ceiling = read_ceiling(&store);
        let next = grow_ceiling(&mut store, ceiling);
        assert!((next - 650.0).abs() < 1e-9);
        assert_eq!(read_ceiling(&store), next);
    }

    #[test]
    fn test_parse_ceiling() {
        assert_eq!(parse_ceiling("650").unwrap(), 650.0);
        assert_eq!(parse_ceiling(" 845.0 ").unwrap(), 845.0);
        assert!(parse_ceiling("abc").is_err());
        assert!(parse_ceiling("-3").is_err());
        assert!(parse_ceiling("0").is_err());
    }

    #[test]
    fn test_invalid_memory_value_falls_back() {
        let store = MemoryStore::with_value(f64::NAN);
        assert_eq!(read_ceiling(&store), DEFAULT_MAX_SCORE);
    }
}
