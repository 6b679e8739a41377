//! Per-owner watched-asset selection.
//!
//! An insertion-ordered set: owners read their selection back in the order
//! they added assets. Claim-related removal rules live in the engine, which
//! consults the claim ledger before delegating here.

use crate::types::AssetId;
use serde::{Deserialize, Serialize};

/// The set of assets one owner has marked for inheritance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSelection {
    assets: Vec<AssetId>,
}

impl AssetSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an initial list, dropping repeats (setup accepts a plain
    /// list; selection is set-semantics).
    pub fn from_list(assets: &[AssetId]) -> Self {
        let mut selection = Self::new();
        for asset in assets {
            selection.add(asset.clone());
        }
        selection
    }

    pub fn contains(&self, asset: &AssetId) -> bool {
        self.assets.contains(asset)
    }

    /// Add an asset. Returns false if it was already selected.
    pub fn add(&mut self, asset: AssetId) -> bool {
        if self.contains(&asset) {
            return false;
        }
        self.assets.push(asset);
        true
    }

    /// Remove an asset. Returns false if it was not selected.
    pub fn remove(&mut self, asset: &AssetId) -> bool {
        if let Some(idx) = self.assets.iter().position(|a| a == asset) {
            self.assets.remove(idx);
            true
        } else {
            false
        }
    }

    pub fn as_slice(&self) -> &[AssetId] {
        &self.assets
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetId> {
        self.assets.iter()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
