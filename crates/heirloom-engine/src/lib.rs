//! Heirloom inheritance engine.
//!
//! A dead-man's-switch over an external asset ledger: an owner registers
//! heirs with percentage shares and a set of watched assets plus an
//! inactivity period. If the owner stops sending heartbeats, heirs claim
//! pro-rata shares of snapshotted balances.
//!
//! # Design
//!
//! - **Lazy time**: no scheduler, no timers. Every operation takes the
//!   caller's current unix time and compares it against stored timestamps.
//! - **Per-owner isolation**: all state hangs off an owner aggregate in a
//!   map; operations addressed at one owner never touch another's.
//! - **Snapshot claims**: the first claim against an asset freezes the
//!   owner's balance; every heir's share is computed from the frozen value,
//!   so claim order is commutative and payouts are bounded.
//! - **One recoverable failure**: a refused ledger transfer inside a claim
//!   is recorded as a notification and does not abort the operation; every
//!   other failure aborts with zero side effects.
//!
//! # Example
//!
//! ```
//! use heirloom_engine::{AssetId, InheritanceEngine, MemoryLedger, Wallet};
//!
//! let owner = Wallet::new("owner");
//! let heir = Wallet::new("heir");
//! let gold = AssetId::new("gold");
//!
//! let mut ledger = MemoryLedger::new();
//! ledger.set_balance(&owner, &gold, 1_000);
//! ledger.authorize(&owner, &gold);
//!
//! let mut engine = InheritanceEngine::new(ledger);
//! engine
//!     .setup_inheritance(&owner, 180 * 86_400, &[heir.clone()], &[100], &[gold.clone()], 0)
//!     .unwrap();
//!
//! // 181 days of silence later, the heir claims.
//! let outcome = engine.claim_asset(&heir, &owner, &gold, 181 * 86_400).unwrap();
//! ```

pub mod assets;
pub mod claims;
pub mod config;
pub mod events;
pub mod heirs;
pub mod ledger;
pub mod state;
pub mod types;

pub use assets::AssetSelection;
pub use claims::{pro_rata_share, ClaimLedger};
pub use config::InheritanceConfig;
pub use events::EngineEvent;
pub use heirs::{HeirList, HeirListError, HeirShare};
pub use ledger::{Ledger, MemoryLedger, TransferError};
pub use state::{EngineState, OwnerAccount};
pub use types::{AssetId, Balance, Wallet};

use thiserror::Error;

/// How an [`EngineError`] classifies: what kind of precondition failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input; nothing about current state could make it valid.
    Validation,
    /// Operation invalid in the owner's current lifecycle state.
    State,
    /// Inheritance not (yet, or while paused: ever) claimable.
    Availability,
}

/// Failures that abort an engine operation with zero side effects.
///
/// A refused ledger transfer inside [`InheritanceEngine::claim_asset`] is
/// deliberately *not* here — it surfaces as [`ClaimOutcome::Failed`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Heirs(#[from] HeirListError),

    #[error("inactivity period must be greater than 0")]
    ZeroPeriod,

    #[error("inheritance already active, deactivate first")]
    AlreadyActive,

    #[error("inheritance not set up or deactivated")]
    NotActive,

    #[error("inheritance already paused")]
    AlreadyPaused,

    #[error("inheritance is not paused")]
    NotPaused,

    #[error("heartbeat rejected while paused; unpause first")]
    HeartbeatWhilePaused,

    #[error("asset already selected: {0}")]
    AssetAlreadySelected(AssetId),

    #[error("asset not selected for inheritance: {0}")]
    AssetNotSelected(AssetId),

    #[error("asset already claimed by someone: {0}")]
    AssetAlreadyClaimed(AssetId),

    #[error("caller is not a registered heir: {0}")]
    NotAnHeir(Wallet),

    #[error("{heir} already claimed asset {asset}")]
    AlreadyClaimed { heir: Wallet, asset: AssetId },

    #[error("inheritance not yet available ({remaining} seconds remaining)")]
    NotYetAvailable { remaining: u64 },

    #[error("inheritance is paused; claims are on indefinite hold")]
    ClaimsOnHold,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Heirs(_) | EngineError::ZeroPeriod => ErrorKind::Validation,
            EngineError::AlreadyActive
            | EngineError::NotActive
            | EngineError::AlreadyPaused
            | EngineError::NotPaused
            | EngineError::HeartbeatWhilePaused
            | EngineError::AssetAlreadySelected(_)
            | EngineError::AssetNotSelected(_)
            | EngineError::AssetAlreadyClaimed(_)
            | EngineError::NotAnHeir(_)
            | EngineError::AlreadyClaimed { .. } => ErrorKind::State,
            EngineError::NotYetAvailable { .. } | EngineError::ClaimsOnHold => {
                ErrorKind::Availability
            }
        }
    }
}

/// Protocol-level result of a claim that passed all preconditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The ledger moved `amount` to the heir. `completed` is set when this
    /// claim was the last open (heir, asset) pair and the configuration
    /// self-retired.
    Transferred { amount: Balance, completed: bool },

    /// The ledger refused the transfer. The claimed flag stays clear; the
    /// heir may retry once the cause (balance, authorization) is fixed.
    Failed { reason: String },
}

/// The engine: per-owner lifecycle state plus the external ledger seam.
///
/// Mutating operations either fully commit or fail with zero side effects;
/// callers provide atomicity across concurrent use (the engine holds plain
/// state and does no locking of its own).
pub struct InheritanceEngine<L: Ledger> {
    ledger: L,
    state: EngineState,
    events: Vec<EngineEvent>,
}

impl<L: Ledger> InheritanceEngine<L> {
    pub fn new(ledger: L) -> Self {
        Self::with_state(ledger, EngineState::new())
    }

    /// Resume from previously persisted state.
    pub fn with_state(ledger: L, state: EngineState) -> Self {
        Self {
            ledger,
            state,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn into_state(self) -> EngineState {
        self.state
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    /// Take all notifications emitted since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Configuration lifecycle ──────────────────────────────────────────

    /// Create an owner's configuration in one step. Empty heir and asset
    /// lists are valid; both can be filled in later.
    pub fn setup_inheritance(
        &mut self,
        owner: &Wallet,
        inactivity_period: u64,
        heir_wallets: &[Wallet],
        percentages: &[u8],
        assets: &[AssetId],
        now: u64,
    ) -> Result<(), EngineError> {
        if self.state.is_active(owner) {
            return Err(EngineError::AlreadyActive);
        }
        if inactivity_period == 0 {
            return Err(EngineError::ZeroPeriod);
        }
        let heirs = HeirList::from_parallel(heir_wallets, percentages)?;

        let account = OwnerAccount::new(
            InheritanceConfig::new(inactivity_period, now),
            heirs,
            AssetSelection::from_list(assets),
        );
        self.state.insert(owner.clone(), account);

        log::info!(
            "inheritance set up for {} (period {}s, {} heirs, {} assets)",
            owner,
            inactivity_period,
            heir_wallets.len(),
            assets.len()
        );
        self.events.push(EngineEvent::InheritanceSetup {
            owner: owner.clone(),
            inactivity_period,
        });
        Ok(())
    }

    /// Heartbeat: reset the countdown. Rejected while paused — a freeze is
    /// total until the owner unpauses (which itself resets the countdown).
    pub fn update_activity(&mut self, owner: &Wallet, now: u64) -> Result<(), EngineError> {
        let account = self.state.account_mut(owner).ok_or(EngineError::NotActive)?;
        if account.config.is_paused {
            return Err(EngineError::HeartbeatWhilePaused);
        }
        account.config.last_activity = now;
        self.events.push(EngineEvent::ActivityUpdated {
            owner: owner.clone(),
            timestamp: now,
        });
        Ok(())
    }

    /// Freeze the countdown indefinitely. While paused, inheritance is
    /// never available regardless of elapsed time.
    pub fn pause_inheritance(&mut self, owner: &Wallet, now: u64) -> Result<(), EngineError> {
        let account = self.state.account_mut(owner).ok_or(EngineError::NotActive)?;
        if account.config.is_paused {
            return Err(EngineError::AlreadyPaused);
        }
        account.config.is_paused = true;
        account.config.paused_at = now;
        self.events.push(EngineEvent::InheritancePaused {
            owner: owner.clone(),
        });
        Ok(())
    }

    /// End the freeze. The countdown restarts from a full fresh window —
    /// an owner suspecting compromise always gets the complete period back,
    /// never the remaining fraction.
    pub fn unpause_inheritance(&mut self, owner: &Wallet, now: u64) -> Result<(), EngineError> {
        let account = self.state.account_mut(owner).ok_or(EngineError::NotActive)?;
        if !account.config.is_paused {
            return Err(EngineError::NotPaused);
        }
        account.config.is_paused = false;
        account.config.last_activity = now;
        self.events.push(EngineEvent::InheritanceUnpaused {
            owner: owner.clone(),
        });
        Ok(())
    }

    /// Change the inactivity period. The countdown origin is untouched.
    pub fn update_inactivity_period(
        &mut self,
        owner: &Wallet,
        new_period: u64,
    ) -> Result<(), EngineError> {
        if new_period == 0 {
            return Err(EngineError::ZeroPeriod);
        }
        let account = self.state.account_mut(owner).ok_or(EngineError::NotActive)?;
        account.config.inactivity_period = new_period;
        self.events.push(EngineEvent::PeriodUpdated {
            owner: owner.clone(),
            new_period,
        });
        Ok(())
    }

    /// Purge the configuration, heir list, asset set and claim bookkeeping,
    /// enabling a later fresh setup.
    pub fn deactivate_inheritance(&mut self, owner: &Wallet) -> Result<(), EngineError> {
        if self.state.remove(owner).is_none() {
            return Err(EngineError::NotActive);
        }
        log::info!("inheritance deactivated for {}", owner);
        self.events.push(EngineEvent::InheritanceDeactivated {
            owner: owner.clone(),
        });
        Ok(())
    }

    // ── Heir and asset management ────────────────────────────────────────

    /// Replace the heir list wholesale. Same validations as setup; there is
    /// no incremental add/remove of a single heir.
    pub fn update_all_heirs(
        &mut self,
        owner: &Wallet,
        heir_wallets: &[Wallet],
        percentages: &[u8],
    ) -> Result<(), EngineError> {
        let heirs = HeirList::from_parallel(heir_wallets, percentages)?;
        let account = self.state.account_mut(owner).ok_or(EngineError::NotActive)?;
        account.heirs = heirs;
        self.events.push(EngineEvent::HeirsUpdated {
            owner: owner.clone(),
            heir_count: heir_wallets.len(),
        });
        Ok(())
    }

    /// Add an asset to the watched set.
    pub fn add_asset(&mut self, owner: &Wallet, asset: &AssetId) -> Result<(), EngineError> {
        let account = self.state.account_mut(owner).ok_or(EngineError::NotActive)?;
        if !account.assets.add(asset.clone()) {
            return Err(EngineError::AssetAlreadySelected(asset.clone()));
        }
        self.events.push(EngineEvent::AssetSelected {
            owner: owner.clone(),
            asset: asset.clone(),
        });
        Ok(())
    }

    /// Remove an asset from the watched set. Refused once any heir has
    /// claimed it — remaining heirs keep their shot at the snapshot.
    pub fn remove_asset(&mut self, owner: &Wallet, asset: &AssetId) -> Result<(), EngineError> {
        let account = self.state.account_mut(owner).ok_or(EngineError::NotActive)?;
        if !account.assets.contains(asset) {
            return Err(EngineError::AssetNotSelected(asset.clone()));
        }
        if account.claims.any_claimed(asset) {
            return Err(EngineError::AssetAlreadyClaimed(asset.clone()));
        }
        account.assets.remove(asset);
        self.events.push(EngineEvent::AssetRemoved {
            owner: owner.clone(),
            asset: asset.clone(),
        });
        Ok(())
    }

    // ── Claim protocol ───────────────────────────────────────────────────

    /// A prospective heir claims their share of one asset.
    ///
    /// Precondition failures abort with zero side effects. Past the
    /// preconditions the snapshot is frozen (first claim only), the share
    /// computed as `floor(snapshot * percentage / 100)`, and the ledger
    /// asked to transfer. A refused transfer is caught: it emits a
    /// [`EngineEvent::ClaimFailed`] notification, leaves the claimed flag
    /// clear, and returns [`ClaimOutcome::Failed`] — never an `Err`.
    ///
    /// After every successful transfer the completion check runs; when all
    /// (heir, asset) pairs are claimed the configuration self-retires as if
    /// by [`Self::deactivate_inheritance`].
    pub fn claim_asset(
        &mut self,
        caller: &Wallet,
        owner: &Wallet,
        asset: &AssetId,
        now: u64,
    ) -> Result<ClaimOutcome, EngineError> {
        let account = self.state.account_mut(owner).ok_or(EngineError::NotActive)?;

        if account.config.is_paused {
            return Err(EngineError::ClaimsOnHold);
        }
        if !account.config.is_available(now) {
            let remaining = account.config.time_until_available(now).unwrap_or(0);
            return Err(EngineError::NotYetAvailable { remaining });
        }
        let percentage = account
            .heirs
            .share_of(caller)
            .ok_or_else(|| EngineError::NotAnHeir(caller.clone()))?;
        if !account.assets.contains(asset) {
            return Err(EngineError::AssetNotSelected(asset.clone()));
        }
        if account.claims.has_claimed(caller, asset) {
            return Err(EngineError::AlreadyClaimed {
                heir: caller.clone(),
                asset: asset.clone(),
            });
        }

        // Freeze the snapshot before the transfer attempt; it persists even
        // if the transfer is refused, so a retry pays from the same basis.
        let live_balance = self.ledger.balance_of(owner, asset);
        let snapshot = account.claims.freeze(asset, live_balance);
        let amount = pro_rata_share(snapshot, percentage);

        match self.ledger.transfer_from(owner, caller, asset, amount) {
            Err(err) => {
                let reason = err.to_string();
                log::warn!(
                    "claim by {} of {} from {} refused: {}",
                    caller,
                    asset,
                    owner,
                    reason
                );
                self.events.push(EngineEvent::ClaimFailed {
                    owner: owner.clone(),
                    heir: caller.clone(),
                    asset: asset.clone(),
                    reason: reason.clone(),
                });
                Ok(ClaimOutcome::Failed { reason })
            }
            Ok(()) => {
                account.claims.mark_claimed(caller, asset);
                log::info!(
                    "{} inherited {} of {} from {}",
                    caller,
                    amount,
                    asset,
                    owner
                );
                self.events.push(EngineEvent::AssetInherited {
                    owner: owner.clone(),
                    heir: caller.clone(),
                    asset: asset.clone(),
                    amount,
                });

                let completed = account
                    .claims
                    .all_claimed(&account.heirs, account.assets.as_slice());
                if completed {
                    self.state.remove(owner);
                    log::info!("inheritance completed for {}", owner);
                    self.events.push(EngineEvent::InheritanceCompleted {
                        owner: owner.clone(),
                    });
                }
                Ok(ClaimOutcome::Transferred { amount, completed })
            }
        }
    }

    // ── Read-only queries ────────────────────────────────────────────────

    pub fn config(&self, owner: &Wallet) -> Option<&InheritanceConfig> {
        self.state.account(owner).map(|a| &a.config)
    }

    /// The owner's heir list; empty when inactive.
    pub fn heirs(&self, owner: &Wallet) -> &[HeirShare] {
        self.state
            .account(owner)
            .map(|a| a.heirs.as_slice())
            .unwrap_or(&[])
    }

    /// The owner's watched assets; empty when inactive.
    pub fn selected_assets(&self, owner: &Wallet) -> &[AssetId] {
        self.state
            .account(owner)
            .map(|a| a.assets.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_available(&self, owner: &Wallet, now: u64) -> bool {
        self.state
            .account(owner)
            .is_some_and(|a| a.config.is_available(now))
    }

    /// Seconds until the countdown completes; zero once claimable. `None`
    /// when there is no countdown pending at all: inactive, or paused (an
    /// indefinite hold with no expiry).
    pub fn time_until_available(&self, owner: &Wallet, now: u64) -> Option<u64> {
        self.state
            .account(owner)
            .and_then(|a| a.config.time_until_available(now))
    }

    pub fn has_claimed(&self, owner: &Wallet, heir: &Wallet, asset: &AssetId) -> bool {
        self.state
            .account(owner)
            .is_some_and(|a| a.claims.has_claimed(heir, asset))
    }

    pub fn is_asset_selected(&self, owner: &Wallet, asset: &AssetId) -> bool {
        self.state
            .account(owner)
            .is_some_and(|a| a.assets.contains(asset))
    }

    pub fn is_heir(&self, owner: &Wallet, wallet: &Wallet) -> bool {
        self.state
            .account(owner)
            .is_some_and(|a| a.heirs.is_heir(wallet))
    }

    /// The frozen snapshot balance for (owner, asset), if any claim has
    /// frozen one yet.
    pub fn snapshot_balance(&self, owner: &Wallet, asset: &AssetId) -> Option<Balance> {
        self.state.account(owner).and_then(|a| a.claims.snapshot(asset))
    }
}
