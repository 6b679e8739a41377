//! Claim bookkeeping: frozen snapshot balances and claimed flags.
//!
//! The first claim against an asset freezes the owner's balance as that
//! asset's snapshot. Every heir's share is computed from the frozen value,
//! never the live balance, so claim order is commutative and the total paid
//! out per asset is bounded by the snapshot.

use crate::heirs::HeirList;
use crate::types::{AssetId, Balance, Wallet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// An heir's pro-rata share of a frozen snapshot.
///
/// Floor division; the rounding remainder is not redistributed. Split into
/// quotient and remainder so `snapshot * percentage` never overflows, even
/// for snapshots near `Balance::MAX`.
pub fn pro_rata_share(snapshot: Balance, percentage: u8) -> Balance {
    let pct = Balance::from(percentage);
    (snapshot / 100) * pct + (snapshot % 100) * pct / 100
}

/// Per-owner claim state across all assets and heirs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimLedger {
    /// Balance frozen at the first claim attempt per asset.
    snapshots: HashMap<AssetId, Balance>,
    /// Which heirs have successfully claimed each asset.
    claimed: HashMap<AssetId, BTreeSet<Wallet>>,
}

impl ClaimLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The frozen snapshot for an asset, if one exists yet.
    pub fn snapshot(&self, asset: &AssetId) -> Option<Balance> {
        self.snapshots.get(asset).copied()
    }

    /// Freeze `live_balance` as the asset's snapshot unless one already
    /// exists; returns the effective snapshot either way.
    pub fn freeze(&mut self, asset: &AssetId, live_balance: Balance) -> Balance {
        *self
            .snapshots
            .entry(asset.clone())
            .or_insert(live_balance)
    }

    pub fn has_claimed(&self, heir: &Wallet, asset: &AssetId) -> bool {
        self.claimed
            .get(asset)
            .is_some_and(|heirs| heirs.contains(heir))
    }

    /// Whether any heir has claimed this asset. Blocks asset removal.
    pub fn any_claimed(&self, asset: &AssetId) -> bool {
        self.claimed.get(asset).is_some_and(|heirs| !heirs.is_empty())
    }

    /// Set the monotonic claimed flag. Only cleared by full deactivation.
    pub fn mark_claimed(&mut self, heir: &Wallet, asset: &AssetId) {
        self.claimed
            .entry(asset.clone())
            .or_default()
            .insert(heir.clone());
    }

    /// Completion check: every (heir, asset) pair claimed.
    ///
    /// O(heirs × assets), re-run after each successful claim. Deliberately
    /// unbounded — neither list is capped.
    pub fn all_claimed(&self, heirs: &HeirList, assets: &[AssetId]) -> bool {
        heirs
            .wallets()
            .all(|heir| assets.iter().all(|asset| self.has_claimed(heir, asset)))
    }
}
