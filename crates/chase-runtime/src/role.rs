//! Role policies.
//!
//! Seekers and hunters share one record type and one task; everything that
//! differs between them is answered by a [`RolePolicy`] strategy value.

use crate::attack_mode;
use crate::controller::{Controller, ControllerState};
use chase_core::legend::Legend;
use chase_core::types::{AgentId, Role};
use std::sync::Arc;

/// Behaviour that depends on an agent's role.
pub trait RolePolicy: Send + Sync {
    /// Whether the walker may step onto a cell showing `symbol`.
    fn can_enter(&self, legend: &Legend, symbol: char) -> bool;

    /// Whether the agent announces its spawn cell before its first sweep.
    fn reports_spawn(&self) -> bool;

    /// Whether the agent can stop walking.
    fn objective_reached(&self, points_remaining: usize, endless: bool) -> bool;

    /// Switch the agent into attack mode. Called with the controller lock held.
    fn enter_attack_mode(&self, controller: &Arc<Controller>, state: &mut ControllerState, id: AgentId);
}

/// Point collector.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeekerPolicy;

/// Chaser. Also used for generic hunters.
#[derive(Debug, Clone, Copy, Default)]
pub struct HunterPolicy;

impl RolePolicy for SeekerPolicy {
    fn can_enter(&self, legend: &Legend, symbol: char) -> bool {
        legend.is_open(symbol)
    }

    fn reports_spawn(&self) -> bool {
        true
    }

    fn objective_reached(&self, points_remaining: usize, endless: bool) -> bool {
        points_remaining == 0 && !endless
    }

    fn enter_attack_mode(&self, _controller: &Arc<Controller>, _state: &mut ControllerState, id: AgentId) {
        panic!("seeker {id} has no attack mode");
    }
}

impl RolePolicy for HunterPolicy {
    fn can_enter(&self, legend: &Legend, symbol: char) -> bool {
        legend.is_open(symbol) || symbol == legend.cage_gate
    }

    fn reports_spawn(&self) -> bool {
        false
    }

    fn objective_reached(&self, _points_remaining: usize, _endless: bool) -> bool {
        false
    }

    fn enter_attack_mode(&self, controller: &Arc<Controller>, state: &mut ControllerState, id: AgentId) {
        attack_mode::engage(controller, state, id);
    }
}

static SEEKER: SeekerPolicy = SeekerPolicy;
static HUNTER: HunterPolicy = HunterPolicy;

/// The policy for a role.
pub fn policy_for(role: Role) -> &'static dyn RolePolicy {
    if role.is_hunter() {
        &HUNTER
    } else {
        &SEEKER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_hunters_pass_the_gate() {
        let legend = Legend::default();
        assert!(!policy_for(Role::Seeker).can_enter(&legend, '%'));
        assert!(policy_for(Role::Hunter).can_enter(&legend, '%'));
        assert!(policy_for(Role::GenericHunter).can_enter(&legend, '%'));
    }

    #[test]
    fn marks_block_everyone() {
        let legend = Legend::default();
        for role in [Role::Seeker, Role::Hunter] {
            let policy = policy_for(role);
            for mark in ['o', '+', '*', '#'] {
                assert!(!policy.can_enter(&legend, mark), "{role} entered {mark}");
            }
            for open in [' ', '.', '$', '?', '!', 'X', 'R', 'b'] {
                assert!(policy.can_enter(&legend, open), "{role} refused {open}");
            }
        }
    }

    #[test]
    fn objectives() {
        let seeker = policy_for(Role::Seeker);
        assert!(seeker.reports_spawn());
        assert!(seeker.objective_reached(0, false));
        assert!(!seeker.objective_reached(0, true));
        assert!(!seeker.objective_reached(4, false));

        let hunter = policy_for(Role::Hunter);
        assert!(!hunter.reports_spawn());
        assert!(!hunter.objective_reached(0, false));
    }
}
