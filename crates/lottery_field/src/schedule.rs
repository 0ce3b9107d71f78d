//! Cooperative scheduling primitives for frame-driven hosts.
//!
//! The field's auto-add loop does not own a thread or a timer. The host (a Bevy
//! `Update` system, a headless loop, a test) advances a [`PeriodicTask`] with the
//! elapsed frame time and performs one unit of work each time a wait completes.
//! Cancellation is a shared flag checked on every advance.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};

/// Shared cancellation flag. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Repeating timer advanced by frame deltas.
#[derive(Debug, Clone)]
pub struct PeriodicTask {
    interval: Duration,
    elapsed: Duration,
    token: CancellationToken,
}

impl PeriodicTask {
    pub fn try_new(interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(Error::InvalidConfig("periodic interval must be > 0".into()));
        }
        Ok(Self::new(interval))
    }

    pub fn new(interval: Duration) -> Self {
        debug_assert!(!interval.is_zero(), "periodic interval must be > 0");
        Self {
            interval,
            elapsed: Duration::ZERO,
            token: CancellationToken::new(),
        }
    }

    /// Use an externally owned token, e.g. one tied to a scene's lifetime.
    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Time left until the next tick.
    pub fn remaining(&self) -> Duration {
        self.interval.saturating_sub(self.elapsed)
    }

    /// Advance by `dt`. Returns `true` when the current wait completed, after which a
    /// fresh wait starts from zero.
    ///
    /// Time beyond the interval is discarded, so a long frame completes one wait rather
    /// than several. A cancelled task never completes a wait, including one that was
    /// already pending.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.token.is_cancelled() || self.interval.is_zero() {
            return false;
        }

        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed < self.interval {
            return false;
        }

        self.elapsed = Duration::ZERO;
        true
    }
}
