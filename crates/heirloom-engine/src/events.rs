//! Lifecycle notifications emitted by the engine.
//!
//! Purely observational — consumed by UIs, indexers and the monitoring
//! daemon. Correctness never depends on anyone listening.

use crate::types::{AssetId, Balance, Wallet};
use serde::{Deserialize, Serialize};

/// Events emitted by `InheritanceEngine` operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// A fresh configuration was created.
    InheritanceSetup {
        owner: Wallet,
        inactivity_period: u64,
    },

    /// Heartbeat: the countdown was reset.
    ActivityUpdated { owner: Wallet, timestamp: u64 },

    /// The countdown was frozen indefinitely.
    InheritancePaused { owner: Wallet },

    /// The freeze ended; the countdown restarted from a full window.
    InheritanceUnpaused { owner: Wallet },

    /// The inactivity period changed (countdown origin untouched).
    PeriodUpdated { owner: Wallet, new_period: u64 },

    /// The heir list was replaced wholesale.
    HeirsUpdated { owner: Wallet, heir_count: usize },

    /// An asset joined the watched set.
    AssetSelected { owner: Wallet, asset: AssetId },

    /// An unclaimed asset left the watched set.
    AssetRemoved { owner: Wallet, asset: AssetId },

    /// The configuration and all bookkeeping were purged.
    InheritanceDeactivated { owner: Wallet },

    /// A claim succeeded: `amount` moved from owner to heir.
    AssetInherited {
        owner: Wallet,
        heir: Wallet,
        asset: AssetId,
        amount: Balance,
    },

    /// The external transfer was refused; the claimed flag stays clear and
    /// the heir may retry.
    ClaimFailed {
        owner: Wallet,
        heir: Wallet,
        asset: AssetId,
        reason: String,
    },

    /// Every (heir, asset) pair is claimed; the configuration self-retired.
    InheritanceCompleted { owner: Wallet },
}

impl EngineEvent {
    /// The owner this event concerns.
    pub fn owner(&self) -> &Wallet {
        match self {
            EngineEvent::InheritanceSetup { owner, .. }
            | EngineEvent::ActivityUpdated { owner, .. }
            | EngineEvent::InheritancePaused { owner }
            | EngineEvent::InheritanceUnpaused { owner }
            | EngineEvent::PeriodUpdated { owner, .. }
            | EngineEvent::HeirsUpdated { owner, .. }
            | EngineEvent::AssetSelected { owner, .. }
            | EngineEvent::AssetRemoved { owner, .. }
            | EngineEvent::InheritanceDeactivated { owner }
            | EngineEvent::AssetInherited { owner, .. }
            | EngineEvent::ClaimFailed { owner, .. }
            | EngineEvent::InheritanceCompleted { owner } => owner,
        }
    }

    /// Whether this event reports a refused transfer.
    pub fn is_failure(&self) -> bool {
        matches!(self, EngineEvent::ClaimFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_accessor() {
        let event = EngineEvent::AssetInherited {
            owner: Wallet::new("owner"),
            heir: Wallet::new("h1"),
            asset: AssetId::new("usdc"),
            amount: 600,
        };
        assert_eq!(event.owner(), &Wallet::new("owner"));
        assert!(!event.is_failure());
    }

    #[test]
    fn test_failure_flag() {
        let event = EngineEvent::ClaimFailed {
            owner: Wallet::new("owner"),
            heir: Wallet::new("h1"),
            asset: AssetId::new("bad"),
            reason: "transfer failed".into(),
        };
        assert!(event.is_failure());
    }

    #[test]
    fn test_event_serde() {
        let event = EngineEvent::InheritanceCompleted {
            owner: Wallet::new("owner"),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: EngineEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
