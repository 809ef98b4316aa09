//! Durable per-device key-value storage.
//!
//! Values are JSON text. The trait is synchronous: writes happen inline with
//! the state change that caused them.

pub mod keys;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// String-keyed storage of JSON-encoded values.
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw JSON stored under `key`, if any.
    fn get_raw(&self, key: &str) -> Result<Option<String>>;

    /// Stores raw JSON under `key`, replacing any previous value.
    fn set_raw(&self, key: &str, value: String) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Reads and decodes the value stored under `key`.
///
/// Returns `Ok(None)` when the key is absent.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.get_raw(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encodes `value` and stores it under `key`.
pub fn store_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set_raw(key, raw)
}
