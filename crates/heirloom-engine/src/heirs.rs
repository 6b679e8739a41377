//! Heir list management.
//!
//! An owner's heirs are an ordered list of (wallet, percentage) shares.
//! The list is only ever replaced wholesale — there is no incremental
//! add/remove — so validation happens once, atomically, on construction.

use crate::types::Wallet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation failures when building an heir list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeirListError {
    #[error("heir and percentage lists differ in length ({wallets} vs {percentages})")]
    MismatchedLengths { wallets: usize, percentages: usize },

    #[error("total percentage exceeds 100 (got {total})")]
    ShareSumExceeded { total: u32 },

    #[error("duplicate heir wallet: {0}")]
    DuplicateWallet(Wallet),
}

/// One heir's share of the inheritance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeirShare {
    pub wallet: Wallet,
    /// Integer percentage of each asset's snapshot balance, 0..=100.
    pub percentage: u8,
}

/// An owner's ordered heir list. Share sum is at most 100 by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeirList {
    heirs: Vec<HeirShare>,
}

impl HeirList {
    /// Build from the parallel wallet/percentage lists the caller supplies.
    ///
    /// Empty lists are valid (deferred configuration). Duplicate wallets are
    /// rejected: each (heir, asset) pair carries exactly one claimed flag, so
    /// a repeated wallet could never complete its second entry.
    pub fn from_parallel(wallets: &[Wallet], percentages: &[u8]) -> Result<Self, HeirListError> {
        if wallets.len() != percentages.len() {
            return Err(HeirListError::MismatchedLengths {
                wallets: wallets.len(),
                percentages: percentages.len(),
            });
        }

        let total: u32 = percentages.iter().map(|&p| u32::from(p)).sum();
        if total > 100 {
            return Err(HeirListError::ShareSumExceeded { total });
        }

        for (i, wallet) in wallets.iter().enumerate() {
            if wallets[..i].contains(wallet) {
                return Err(HeirListError::DuplicateWallet(wallet.clone()));
            }
        }

        Ok(Self {
            heirs: wallets
                .iter()
                .zip(percentages)
                .map(|(wallet, &percentage)| HeirShare {
                    wallet: wallet.clone(),
                    percentage,
                })
                .collect(),
        })
    }

    pub fn is_heir(&self, wallet: &Wallet) -> bool {
        self.heirs.iter().any(|h| &h.wallet == wallet)
    }

    /// Percentage share of `wallet`, if it is a registered heir.
    pub fn share_of(&self, wallet: &Wallet) -> Option<u8> {
        self.heirs
            .iter()
            .find(|h| &h.wallet == wallet)
            .map(|h| h.percentage)
    }

    pub fn as_slice(&self) -> &[HeirShare] {
        &self.heirs
    }

    pub fn wallets(&self) -> impl Iterator<Item = &Wallet> {
        self.heirs.iter().map(|h| &h.wallet)
    }

    pub fn len(&self) -> usize {
        self.heirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heirs.is_empty()
    }
}
