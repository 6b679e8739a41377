//! The external asset ledger collaborator.
//!
//! The engine never holds balances itself. During a claim it reads the
//! owner's balance once (to freeze the snapshot) and requests a transfer
//! it must already be authorized for — the owner grants that authority
//! out-of-band; the engine only consumes it.

use crate::types::{AssetId, Balance, Wallet};
use std::collections::HashMap;
use thiserror::Error;

/// Why a ledger transfer was refused.
///
/// Recoverable by design: the enclosing claim records the failure and the
/// heir may retry once the cause is fixed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("insufficient balance (have {available}, need {requested})")]
    InsufficientBalance {
        available: Balance,
        requested: Balance,
    },

    #[error("transfer not authorized for {asset}")]
    NotAuthorized { asset: AssetId },

    #[error("asset rejected the transfer: {0}")]
    AssetRejected(String),
}

/// System of record for balances and authorized transfers.
pub trait Ledger {
    /// Current live balance of `owner` in `asset`.
    fn balance_of(&self, owner: &Wallet, asset: &AssetId) -> Balance;

    /// Move `amount` of `asset` from `owner` to `heir` under pre-granted
    /// authority. Refusal is an expected outcome, not a fault.
    fn transfer_from(
        &mut self,
        owner: &Wallet,
        heir: &Wallet,
        asset: &AssetId,
        amount: Balance,
    ) -> Result<(), TransferError>;
}

/// In-process ledger: balances in a map, authorization per (owner, asset),
/// and per-asset forced-failure switches for exercising the claim path's
/// failure handling.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    balances: HashMap<(Wallet, AssetId), Balance>,
    authorized: HashMap<Wallet, Vec<AssetId>>,
    failing_assets: Vec<AssetId>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_balance(&mut self, wallet: &Wallet, asset: &AssetId, amount: Balance) {
        self.balances
            .insert((wallet.clone(), asset.clone()), amount);
    }

    /// Grant the engine transfer authority over `asset` for `owner`.
    pub fn authorize(&mut self, owner: &Wallet, asset: &AssetId) {
        let assets = self.authorized.entry(owner.clone()).or_default();
        if !assets.contains(asset) {
            assets.push(asset.clone());
        }
    }

    pub fn revoke(&mut self, owner: &Wallet, asset: &AssetId) {
        if let Some(assets) = self.authorized.get_mut(owner) {
            assets.retain(|a| a != asset);
        }
    }

    /// Make every transfer of `asset` fail, whatever the balances say.
    pub fn fail_asset(&mut self, asset: &AssetId) {
        if !self.failing_assets.contains(asset) {
            self.failing_assets.push(asset.clone());
        }
    }

    fn is_authorized(&self, owner: &Wallet, asset: &AssetId) -> bool {
        self.authorized
            .get(owner)
            .is_some_and(|assets| assets.contains(asset))
    }
}

impl Ledger for MemoryLedger {
    fn balance_of(&self, owner: &Wallet, asset: &AssetId) -> Balance {
        self.balances
            .get(&(owner.clone(), asset.clone()))
            .copied()
            .unwrap_or(0)
    }

    fn transfer_from(
        &mut self,
        owner: &Wallet,
        heir: &Wallet,
        asset: &AssetId,
        amount: Balance,
    ) -> Result<(), TransferError> {
        if self.failing_assets.contains(asset) {
            return Err(TransferError::AssetRejected("transfer failed".into()));
        }
        if !self.is_authorized(owner, asset) {
            return Err(TransferError::NotAuthorized {
                asset: asset.clone(),
            });
        }

        let available = self.balance_of(owner, asset);
        if available < amount {
            return Err(TransferError::InsufficientBalance {
                available,
                requested: amount,
            });
        }

        self.set_balance(owner, asset, available - amount);
        let heir_balance = self.balance_of(heir, asset);
        self.set_balance(heir, asset, heir_balance + amount);
        Ok(())
    }
}
