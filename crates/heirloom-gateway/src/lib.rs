//! Sliding-window rate limiting for Heirloom's public query endpoints.
//!
//! Single-process, in-memory store keyed by client identifier (typically
//! an IP). Each check drops request timestamps that fell out of the window
//! and admits or refuses the new request. A known scaling limit: state is
//! not shared across processes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors from limiter configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LimiterError {
    #[error("window must be greater than 0 ms")]
    ZeroWindow,

    #[error("request limit must be greater than 0")]
    ZeroLimit,
}

/// Limiter settings. Default: 60 requests per 60-second window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimiterConfig {
    /// Maximum admitted requests per client per window.
    pub limit: u32,
    /// Window length in milliseconds.
    pub window_ms: u64,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            limit: 60,
            window_ms: 60_000,
        }
    }
}

impl LimiterConfig {
    pub fn validate(&self) -> Result<(), LimiterError> {
        if self.window_ms == 0 {
            return Err(LimiterError::ZeroWindow);
        }
        if self.limit == 0 {
            return Err(LimiterError::ZeroLimit);
        }
        Ok(())
    }
}

/// Outcome of one admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Admitted; `remaining` requests left in the current window.
    Allowed { remaining: u32 },
    /// Refused; the client's oldest in-window request expires in
    /// `retry_after_ms`.
    Limited { retry_after_ms: u64 },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed { .. })
    }
}

/// Per-client sliding-window limiter.
///
/// Like the engine, the limiter takes the caller's clock: `now_ms` is
/// milliseconds from any monotonic-enough epoch the caller sticks with.
#[derive(Debug, Default)]
pub struct RateLimiter {
    config: LimiterConfig,
    requests: HashMap<String, Vec<u64>>,
}

impl RateLimiter {
    pub fn new(config: LimiterConfig) -> Result<Self, LimiterError> {
        config.validate()?;
        Ok(Self {
            config,
            requests: HashMap::new(),
        })
    }

    pub fn config(&self) -> &LimiterConfig {
        &self.config
    }

    /// Admit or refuse a request from `client` at `now_ms`.
    pub fn check(&mut self, client: &str, now_ms: u64) -> Decision {
        let window_ms = self.config.window_ms;
        let timestamps = self.requests.entry(client.to_string()).or_default();
        // Elapsed-time form: a plain `t > now - window` cutoff saturates at
        // zero during the first window and forgets timestamps sitting on
        // the boundary.
        timestamps.retain(|&t| now_ms.saturating_sub(t) < window_ms);

        if timestamps.len() >= self.config.limit as usize {
            // Oldest in-window request decides when a slot frees up.
            let oldest = timestamps.iter().copied().min().unwrap_or(now_ms);
            let retry_after_ms = (oldest + self.config.window_ms).saturating_sub(now_ms);
            log::debug!("rate limit hit for {} (retry in {} ms)", client, retry_after_ms);
            return Decision::Limited { retry_after_ms };
        }

        timestamps.push(now_ms);
        let remaining = self.config.limit - timestamps.len() as u32;
        Decision::Allowed { remaining }
    }

    /// Drop clients whose every timestamp has left the window. Call
    /// periodically to keep the store from growing with one-off clients.
    pub fn prune(&mut self, now_ms: u64) {
        let window_ms = self.config.window_ms;
        self.requests.retain(|_, timestamps| {
            timestamps.iter().any(|&t| now_ms.saturating_sub(t) < window_ms)
        });
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.requests.len()
    }
}
