//! Hunter attack mode.
//!
//! While an attack window is open every hunter blinks between the two blink
//! symbols, moves slower, and can be killed by a seeker. Engaging spawns two
//! helpers per hunter: a fixed-period blink toggler and a reverter that
//! waits for the window to close and puts the hunter back to normal.

use crate::agent::pacing;
use crate::cancel::CancelSignal;
use crate::controller::{Controller, ControllerState};
use chase_core::types::AgentId;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// How long the reverter waits for the blink toggler to stop.
pub const BLINK_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// Where a hunter is in the attack-mode cycle.
#[derive(Debug, Default)]
pub enum AttackPhase {
    #[default]
    Inactive,
    /// Blinking; the handle belongs to the toggler task.
    Active { blink: JoinHandle<()> },
    /// The window closed and the toggler is being stopped.
    Reverting,
}

impl AttackPhase {
    pub fn label(&self) -> &'static str {
        match self {
            AttackPhase::Inactive => "inactive",
            AttackPhase::Active { .. } => "active",
            AttackPhase::Reverting => "reverting",
        }
    }

    pub fn is_inactive(&self) -> bool {
        matches!(self, AttackPhase::Inactive)
    }
}

/// Put a hunter into attack mode. No-op unless the hunter is `Inactive`.
///
/// Runs under the controller lock.
pub(crate) fn engage(controller: &Arc<Controller>, state: &mut ControllerState, id: AgentId) {
    let blink_symbol = controller.legend().blink[0];
    let Some(record) = state.agents.get_mut(&id) else {
        return;
    };
    if !record.phase.is_inactive() {
        debug!(agent = %record.spec.name, phase = record.phase.label(), "Already in attack mode");
        return;
    }

    record.symbol = blink_symbol;
    record.under_attack = true;
    record.speed_ms = record.spec.slowed_speed_ms();

    let period = pacing(record.spec.blink_period_ms);
    let blink = tokio::spawn(blink(controller.clone(), id, record.cancel.clone(), period));
    tokio::spawn(revert(controller.clone(), id, record.cancel.clone()));
    record.phase = AttackPhase::Active { blink };

    debug!(agent = %record.spec.name, speed_ms = record.speed_ms, "Entered attack mode");
    controller.repaint(state, id);
}

/// Toggle the hunter's symbol every `period` until stopped.
async fn blink(controller: Arc<Controller>, id: AgentId, cancel: CancelSignal, period: Duration) {
    // The first tick completes at once.
    let mut interval = tokio::time::interval(period);
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = interval.tick() => {}
        }
        if !controller.toggle_blink(id).await {
            return;
        }
    }
}

/// Wait for the attack window to close, then restore the hunter.
async fn revert(controller: Arc<Controller>, id: AgentId, cancel: CancelSignal) {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => return,
        _ = controller.has_attack_mode_ended() => {}
    }

    let Some(blink) = controller.begin_revert(id).await else {
        return;
    };
    blink.abort();
    if tokio::time::timeout(BLINK_SHUTDOWN_TIMEOUT, blink).await.is_err() {
        error!(id = %id, "Blink toggler did not stop within {:?}", BLINK_SHUTDOWN_TIMEOUT);
        std::process::exit(1);
    }

    controller.finish_revert(id).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn phase_labels() {
        assert_eq!(AttackPhase::default().label(), "inactive");
        assert_eq!(AttackPhase::Reverting.label(), "reverting");
        let active = AttackPhase::Active {
            blink: tokio::spawn(async {}),
        };
        assert_eq!(active.label(), "active");
        assert!(!active.is_inactive());
    }
}
