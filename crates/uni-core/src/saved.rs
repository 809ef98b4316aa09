//! Saved items (favorites) domain types.

use async_trait::async_trait;

use crate::error::Result;
use crate::identity::Identity;

/// Remote store of a user's saved company names.
///
/// The protocol replaces the whole list: `replace` sends the complete desired
/// list and returns what the server persisted.
#[async_trait]
pub trait SavedItemsGateway: Send + Sync {
    async fn fetch(&self, identity: &Identity) -> Result<Vec<String>>;

    async fn replace(&self, identity: &Identity, saved: &[String]) -> Result<Vec<String>>;
}

/// A single add/remove request against the saved list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavedIntent {
    Add(String),
    Remove(String),
}

impl SavedIntent {
    pub fn name(&self) -> &str {
        match self {
            SavedIntent::Add(name) | SavedIntent::Remove(name) => name,
        }
    }

    /// Returns `saved` with this intent applied.
    ///
    /// Adding keeps the list ordered by first insertion and never duplicates;
    /// removing drops every occurrence.
    pub fn apply(&self, saved: &[String]) -> Vec<String> {
        match self {
            SavedIntent::Add(name) => {
                let mut updated = saved.to_vec();
                if !updated.iter().any(|existing| existing == name) {
                    updated.push(name.clone());
                }
                updated
            }
            SavedIntent::Remove(name) => saved
                .iter()
                .filter(|existing| *existing != name)
                .cloned()
                .collect(),
        }
    }

    /// User-facing message shown when persisting this intent fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            SavedIntent::Add(_) => "Failed to save unicorn",
            SavedIntent::Remove(_) => "Failed to remove unicorn",
        }
    }
}
