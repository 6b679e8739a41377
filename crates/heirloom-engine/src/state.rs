//! The per-owner aggregate and the engine's full persisted state.

use crate::assets::AssetSelection;
use crate::claims::ClaimLedger;
use crate::config::InheritanceConfig;
use crate::heirs::HeirList;
use crate::types::Wallet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything the engine tracks for one owner. Created by setup, destroyed
/// as a unit by deactivation (explicit or automatic completion).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerAccount {
    pub config: InheritanceConfig,
    pub heirs: HeirList,
    pub assets: AssetSelection,
    pub claims: ClaimLedger,
}

impl OwnerAccount {
    pub fn new(config: InheritanceConfig, heirs: HeirList, assets: AssetSelection) -> Self {
        Self {
            config,
            heirs,
            assets,
            claims: ClaimLedger::new(),
        }
    }
}

/// Full engine state: one aggregate per active owner.
///
/// Absence from the map *is* the inactive state — deactivation removes the
/// entry, which is what guarantees heirs, assets and claim bookkeeping all
/// read back empty afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineState {
    pub accounts: HashMap<Wallet, OwnerAccount>,
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(&self, owner: &Wallet) -> Option<&OwnerAccount> {
        self.accounts.get(owner)
    }

    pub fn account_mut(&mut self, owner: &Wallet) -> Option<&mut OwnerAccount> {
        self.accounts.get_mut(owner)
    }

    pub fn is_active(&self, owner: &Wallet) -> bool {
        self.accounts.contains_key(owner)
    }

    pub fn insert(&mut self, owner: Wallet, account: OwnerAccount) {
        self.accounts.insert(owner, account);
    }

    pub fn remove(&mut self, owner: &Wallet) -> Option<OwnerAccount> {
        self.accounts.remove(owner)
    }

    /// Owners with an active configuration.
    pub fn owners(&self) -> impl Iterator<Item = &Wallet> {
        self.accounts.keys()
    }
}
