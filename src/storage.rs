//! Key-value persistence for user preferences
//!
//! The dashboard only ever reads each key once at startup and overwrites the
//! whole value on every change, so a store needs nothing beyond `get`/`set`.
//! Typed helpers on top fall back to defaults whenever a value is missing or
//! unreadable: a corrupt preference is never worth failing startup over.

use crate::{
    constants::{ALERTS_KEY, CURRENCY_KEY, FAVORITES_KEY},
    error::StorageError,
    types::{CurrencyState, PriceAlert},
};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// String key-value store the dashboard persists preferences into
pub trait KeyValueStore: Send + Sync {
    /// Reads the raw value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Volatile store, for tests and sessions that should not persist anything
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store keeping one `<key>.json` file per key under a directory
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens (and creates if needed) a store rooted at `dir`
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Reads and decodes a JSON value, returning `None` on any failure
fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read persisted value, using default");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Persisted value is corrupt, using default");
            None
        }
    }
}

fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

/// Favorite symbols, empty when nothing valid is stored
pub fn load_favorites(store: &dyn KeyValueStore) -> Vec<String> {
    load_json(store, FAVORITES_KEY).unwrap_or_default()
}

pub fn save_favorites(store: &dyn KeyValueStore, favorites: &[String]) -> Result<(), StorageError> {
    save_json(store, FAVORITES_KEY, favorites)
}

/// Preferred currency, USD when nothing valid is stored
pub fn load_currency(store: &dyn KeyValueStore) -> CurrencyState {
    load_json(store, CURRENCY_KEY).unwrap_or_default()
}

pub fn save_currency(store: &dyn KeyValueStore, currency: &CurrencyState) -> Result<(), StorageError> {
    save_json(store, CURRENCY_KEY, currency)
}

/// Pending price alerts, empty when nothing valid is stored
pub fn load_alerts(store: &dyn KeyValueStore) -> Vec<PriceAlert> {
    load_json(store, ALERTS_KEY).unwrap_or_default()
}

pub fn save_alerts(store: &dyn KeyValueStore, alerts: &[PriceAlert]) -> Result<(), StorageError> {
    save_json(store, ALERTS_KEY, alerts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_defaults_when_missing() {
        let store = MemoryStore::new();
        assert_eq!(load_currency(&store), CurrencyState::default());
    }

    #[test]
    fn test_currency_defaults_when_corrupt() {
        let store = MemoryStore::new();
        store.set(CURRENCY_KEY, "{not json").unwrap();
        let currency = load_currency(&store);
        assert_eq!(currency.code, "USD");
        assert_eq!(currency.symbol, "$");

        store.set(CURRENCY_KEY, r#"["EUR"]"#).unwrap();
        assert_eq!(load_currency(&store), CurrencyState::default());
    }

    #[test]
    fn test_currency_round_trip_uses_expected_shape() {
        let store = MemoryStore::new();
        let eur = CurrencyState {
            code: "EUR".to_string(),
            symbol: "€".to_string(),
        };
        save_currency(&store, &eur).unwrap();
        assert_eq!(
            store.get(CURRENCY_KEY).unwrap().unwrap(),
            r#"{"code":"EUR","symbol":"€"}"#
        );
        assert_eq!(load_currency(&store), eur);
    }

    #[test]
    fn test_favorites_and_alerts_default_to_empty() {
        let store = MemoryStore::new();
        store.set(FAVORITES_KEY, "42").unwrap();
        assert!(load_favorites(&store).is_empty());
        assert!(load_alerts(&store).is_empty());
    }

    #[test]
    fn test_alerts_read_stored_array() {
        let store = MemoryStore::new();
        store
            .set(ALERTS_KEY, r#"[{"symbol":"BTC","targetPrice":90},{"symbol":"BTC","targetPrice":120.5}]"#)
            .unwrap();
        let alerts = load_alerts(&store);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[1], PriceAlert::new("BTC", 120.5));
    }

    #[test]
    fn test_file_store_overwrites_whole_value() {
        let dir = std::env::temp_dir().join(format!("crypto-predictor-{}", uuid::Uuid::new_v4()));
        let store = FileStore::open(&dir).unwrap();

        assert!(store.get(FAVORITES_KEY).unwrap().is_none());
        save_favorites(&store, &["BTC".to_string(), "ETH".to_string()]).unwrap();
        save_favorites(&store, &["SOL".to_string()]).unwrap();

        assert_eq!(load_favorites(&store), vec!["SOL".to_string()]);
        assert!(!dir.join(".cryptoFavorites.json.tmp").exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
