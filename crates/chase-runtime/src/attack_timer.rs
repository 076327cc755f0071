//! Attack timer: counts down the attack window.
//!
//! The timer counts metronome units until its budget is spent, then asks its
//! [`AttackWindow`] to close the window. Extending a running timer only
//! raises the budget: elapsed progress is never lost and no second timer is
//! started.

use crate::cancel::CancelSignal;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

/// The side that owns the attack window.
#[async_trait]
pub trait AttackWindow: Send + Sync {
    /// Close the attack window on behalf of an expired timer.
    ///
    /// Returns `false` when the timer was extended after it decided to
    /// expire; the timer then keeps counting.
    async fn disable_attack_mode(&self, timer: &AttackTimer) -> bool;
}

/// A fixed-rate heartbeat. The first beat comes one unit after creation.
pub struct Metronome {
    interval: Interval,
}

impl Metronome {
    pub fn new(unit: Duration) -> Self {
        let mut interval = tokio::time::interval_at(Instant::now() + unit, unit);
        interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
        Self { interval }
    }

    /// Wait for the next beat.
    pub async fn sync(&mut self) {
        self.interval.tick().await;
    }
}

/// Countdown over a budget of metronome units.
#[derive(Debug)]
pub struct AttackTimer {
    id: u64,
    budget: AtomicU64,
    elapsed: AtomicU64,
    unit: Duration,
    cancel: CancelSignal,
}

impl AttackTimer {
    pub fn new(id: u64, units: u64, unit: Duration) -> Self {
        Self {
            id,
            budget: AtomicU64::new(units),
            elapsed: AtomicU64::new(0),
            unit,
            cancel: CancelSignal::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Extend the countdown. Safe to call while the timer runs.
    pub fn add_more(&self, units: u64) {
        let budget = self.budget.fetch_add(units, Ordering::SeqCst) + units;
        info!(timer = self.id, units, budget, "Added more time to the attack timer");
    }

    pub fn budget(&self) -> u64 {
        self.budget.load(Ordering::SeqCst)
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed.load(Ordering::SeqCst)
    }

    pub fn remaining(&self) -> u64 {
        self.budget().saturating_sub(self.elapsed())
    }

    /// Whether the whole budget has been counted.
    pub fn is_due(&self) -> bool {
        self.elapsed() >= self.budget()
    }

    /// Stop the countdown without closing the window.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Count down, then close the window. Returns early on cancellation.
    pub async fn run(self: Arc<Self>, window: Arc<dyn AttackWindow>) {
        info!(timer = self.id, units = self.budget(), "Attack timer started");
        let mut metronome = Metronome::new(self.unit);
        loop {
            while !self.is_due() {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => {
                        debug!(timer = self.id, elapsed = self.elapsed(), "Attack timer cancelled");
                        return;
                    }
                    _ = metronome.sync() => {
                        self.elapsed.fetch_add(1, Ordering::SeqCst);
                    }
                }
            }
            if window.disable_attack_mode(&self).await {
                info!(timer = self.id, elapsed = self.elapsed(), "Attack timer expired");
                return;
            }
        }
    }
}
