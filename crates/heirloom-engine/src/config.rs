//! Per-owner inheritance configuration and its time queries.
//!
//! Pure logic — no clock, no I/O. Every query takes the caller's current
//! unix time, so availability is evaluated lazily at the call boundary.

use serde::{Deserialize, Serialize};

/// Lifecycle state for one owner's inheritance setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InheritanceConfig {
    /// Seconds of owner silence after which heirs may claim.
    pub inactivity_period: u64,
    /// Unix time of the last heartbeat (or setup/unpause, which also reset it).
    pub last_activity: u64,
    /// False only on a purged config read back as a default.
    pub is_active: bool,
    /// While paused the countdown never completes, regardless of elapsed time.
    pub is_paused: bool,
    /// Unix time of the most recent pause. Zero if never paused.
    pub paused_at: u64,
}

impl InheritanceConfig {
    /// Create an active, unpaused config with the countdown starting at `now`.
    pub fn new(inactivity_period: u64, now: u64) -> Self {
        Self {
            inactivity_period,
            last_activity: now,
            is_active: true,
            is_paused: false,
            paused_at: 0,
        }
    }

    /// Whether heirs may claim at `now`: active, not paused, and the full
    /// inactivity period has elapsed since the last heartbeat.
    pub fn is_available(&self, now: u64) -> bool {
        self.is_active
            && !self.is_paused
            && now.saturating_sub(self.last_activity) >= self.inactivity_period
    }

    /// Seconds until the countdown completes, zero once claimable.
    ///
    /// Returns `None` while paused — an indefinite hold with no expiry.
    pub fn time_until_available(&self, now: u64) -> Option<u64> {
        if self.is_paused {
            return None;
        }
        let deadline = self.last_activity.saturating_add(self.inactivity_period);
        Some(deadline.saturating_sub(now))
    }
}
