//! Filter state backed by durable storage.
//!
//! Every mutation updates the in-memory selection first and then writes the
//! affected keys, so the selection survives restarts.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::watch;
use uni_core::storage::{keys, load_json, store_json};
use uni_core::{FilterDimension, FilterSelection, KeyValueStore, Result};

/// The user's filter selection, mirrored to a [`KeyValueStore`].
pub struct FilterState {
    store: Arc<dyn KeyValueStore>,
    selection: watch::Sender<FilterSelection>,
}

impl FilterState {
    /// Creates the state from whatever the store holds.
    ///
    /// Missing keys default to empty / off. Values that cannot be read are
    /// logged and treated as missing.
    pub fn rehydrate(store: Arc<dyn KeyValueStore>) -> Self {
        let mut selection = FilterSelection::new();
        for dimension in FilterDimension::ALL {
            if let Some(values) = read_key::<BTreeSet<String>>(&*store, dimension.storage_key()) {
                selection.set_selected(dimension, values);
            }
        }
        if let Some(show) = read_key::<bool>(&*store, keys::SHOW_FAVORITES) {
            selection.show_favorites_only = show;
        }

        let (sender, _) = watch::channel(selection);
        Self {
            store,
            selection: sender,
        }
    }

    /// Snapshot of the current selection.
    pub fn selection(&self) -> FilterSelection {
        self.selection.borrow().clone()
    }

    /// Receives every selection change.
    pub fn subscribe(&self) -> watch::Receiver<FilterSelection> {
        self.selection.subscribe()
    }

    /// Flips `value` in `dimension`. Returns whether it is now selected.
    pub fn toggle(&self, dimension: FilterDimension, value: &str) -> Result<bool> {
        let mut selected = false;
        self.selection.send_modify(|selection| {
            selected = selection.toggle(dimension, value);
        });
        tracing::debug!(
            "[FilterState] {} '{}' {}",
            dimension,
            value,
            if selected { "selected" } else { "deselected" }
        );
        self.persist_dimension(dimension)?;
        Ok(selected)
    }

    /// Replaces the whole selection of `dimension`.
    pub fn set_selected(&self, dimension: FilterDimension, values: BTreeSet<String>) -> Result<()> {
        self.selection
            .send_modify(|selection| selection.set_selected(dimension, values));
        self.persist_dimension(dimension)
    }

    /// Empties every dimension and turns favorites-only off.
    pub fn clear_all(&self) -> Result<()> {
        self.selection.send_modify(FilterSelection::clear_all);
        tracing::debug!("[FilterState] Cleared all filters");
        for dimension in FilterDimension::ALL {
            self.persist_dimension(dimension)?;
        }
        self.persist_favorites()
    }

    pub fn set_favorites_only(&self, show: bool) -> Result<()> {
        self.selection
            .send_modify(|selection| selection.show_favorites_only = show);
        self.persist_favorites()
    }

    fn persist_dimension(&self, dimension: FilterDimension) -> Result<()> {
        let values = self.selection.borrow().selected(dimension).clone();
        store_json(&*self.store, dimension.storage_key(), &values)
    }

    fn persist_favorites(&self) -> Result<()> {
        let show = self.selection.borrow().show_favorites_only;
        store_json(&*self.store, keys::SHOW_FAVORITES, &show)
    }
}

fn read_key<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    match load_json::<T>(store, key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("[FilterState] Ignoring stored '{}': {}", key, e);
            None
        }
    }
}
