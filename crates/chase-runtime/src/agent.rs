//! Agents: spawn parameters, the controller-side record, and the task that
//! walks the grid.
//!
//! The walk is a randomized depth-first search from the spawn cell. Every
//! step is paced, reported to the controller, and remembered in a private
//! [`PathCache`] so the walker does not revisit cells within one sweep.
//! Backtracking is a real move: the agent reports the cell it returns to.

use crate::attack_mode::AttackPhase;
use crate::cancel::{CancelSignal, Cancelled};
use crate::controller::Controller;
use crate::role::{policy_for, RolePolicy};
use chase_core::legend::Legend;
use chase_core::types::{AgentId, Direction, Position, Role};
use rand::seq::SliceRandom;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Immutable spawn parameters. A respawn rebuilds the agent from these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentSpec {
    pub name: String,
    pub role: Role,
    /// Identity symbol painted on the grid.
    pub symbol: char,
    pub spawn: Position,
    /// Initial pacing interval in milliseconds.
    pub speed_ms: u64,
    /// Pacing multiplier while under attack. Unused by seekers.
    pub slowdown: u32,
    /// Blink toggle period while under attack. Unused by seekers.
    pub blink_period_ms: u64,
}

impl AgentSpec {
    pub fn seeker(name: impl Into<String>, symbol: char, spawn: Position, speed_ms: u64) -> Self {
        Self {
            name: name.into(),
            role: Role::Seeker,
            symbol,
            spawn,
            speed_ms,
            slowdown: 1,
            blink_period_ms: 0,
        }
    }

    pub fn hunter(
        name: impl Into<String>,
        role: Role,
        symbol: char,
        spawn: Position,
        speed_ms: u64,
        slowdown: u32,
        blink_period_ms: u64,
    ) -> Self {
        assert!(role.is_hunter(), "hunter spec with role {role}");
        Self {
            name: name.into(),
            role,
            symbol,
            spawn,
            speed_ms,
            slowdown,
            blink_period_ms,
        }
    }

    /// Pacing interval while under attack.
    pub fn slowed_speed_ms(&self) -> u64 {
        self.speed_ms.saturating_mul(u64::from(self.slowdown))
    }
}

/// Controller-owned state of a live agent.
#[derive(Debug)]
pub struct AgentRecord {
    pub id: AgentId,
    pub spec: AgentSpec,
    /// Symbol currently painted for this agent.
    pub symbol: char,
    /// Current pacing interval in milliseconds.
    pub speed_ms: u64,
    /// Last resolved position. After a portal this is the entry cell on the
    /// destination side, not the cell the agent stands on.
    pub last_position: Position,
    /// Cell the agent is painted on, if any.
    pub standing: Option<Position>,
    pub under_attack: bool,
    pub(crate) cancel: CancelSignal,
    pub(crate) phase: AttackPhase,
}

impl AgentRecord {
    pub fn new(spec: AgentSpec) -> Self {
        Self {
            id: AgentId::new(),
            symbol: spec.symbol,
            speed_ms: spec.speed_ms,
            last_position: spec.spawn,
            standing: None,
            under_attack: false,
            cancel: CancelSignal::new(),
            phase: AttackPhase::Inactive,
            spec,
        }
    }

    pub fn role(&self) -> Role {
        self.spec.role
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            name: self.spec.name.clone(),
            role: self.spec.role,
            symbol: self.symbol,
            position: self.last_position,
            standing: self.standing,
            speed_ms: self.speed_ms,
            under_attack: self.under_attack,
            attack_phase: self.phase.label().to_string(),
        }
    }
}

/// Read-only copy of an [`AgentRecord`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub name: String,
    pub role: Role,
    pub symbol: char,
    pub position: Position,
    pub standing: Option<Position>,
    pub speed_ms: u64,
    pub under_attack: bool,
    pub attack_phase: String,
}

/// An agent's private memory of the grid for the current sweep.
///
/// Symbols are fetched from the controller on first look and never
/// refreshed; path marks overwrite them as the agent walks.
#[derive(Debug, Default)]
pub struct PathCache {
    cells: HashMap<Position, char>,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pos: Position) -> Option<char> {
        self.cells.get(&pos).copied()
    }

    pub fn insert(&mut self, pos: Position, symbol: char) {
        self.cells.insert(pos, symbol);
    }

    /// Mark a cell as part of the current walk.
    pub fn mark(&mut self, pos: Position, spawn: Position, legend: &Legend) {
        let mark = if pos == spawn { legend.start_mark } else { legend.current_mark };
        self.cells.insert(pos, mark);
    }

    /// Mark a cell as walked and left. The spawn cell keeps its start mark.
    pub fn unmark(&mut self, pos: Position, spawn: Position, legend: &Legend) {
        if pos != spawn {
            self.cells.insert(pos, legend.visited_mark);
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

struct Frame {
    pos: Position,
    /// Directions not tried yet; popped from the back.
    directions: Vec<Direction>,
}

impl Frame {
    fn new(pos: Position) -> Self {
        let mut directions = Direction::ALL.to_vec();
        directions.shuffle(&mut rand::thread_rng());
        Self { pos, directions }
    }
}

/// The task driving one agent.
pub struct AgentTask {
    controller: Arc<Controller>,
    id: AgentId,
    spec: AgentSpec,
    policy: &'static dyn RolePolicy,
    cancel: CancelSignal,
    cache: PathCache,
    last_position: Position,
}

impl AgentTask {
    pub fn new(controller: Arc<Controller>, id: AgentId, spec: AgentSpec, cancel: CancelSignal) -> Self {
        Self {
            controller,
            id,
            policy: policy_for(spec.role),
            last_position: spec.spawn,
            spec,
            cancel,
            cache: PathCache::new(),
        }
    }

    /// Walk until the game ends, the objective is reached, or the agent is
    /// cancelled.
    pub async fn run(mut self) {
        debug!(agent = %self.spec.name, id = %self.id, spawn = %self.spec.spawn, "Agent started");
        match self.drive().await {
            Ok(()) => debug!(agent = %self.spec.name, id = %self.id, "Agent finished"),
            Err(Cancelled) => info!(
                id = %self.id,
                "{} interrupted at position {}",
                self.spec.name,
                self.last_position
            ),
        }
    }

    async fn drive(&mut self) -> Result<(), Cancelled> {
        let spawn = self.spec.spawn;
        let endless = self.controller.config().endless;

        if self.policy.reports_spawn() {
            self.last_position = self.controller.report_position(self.id, spawn).await;
        }

        while self.controller.game_in_progress().await {
            if !self.sweep(spawn).await? {
                // Spawn cell refused: wait one beat before retrying.
                self.pace().await?;
            }
            if self
                .policy
                .objective_reached(self.controller.points_remaining().await, endless)
            {
                break;
            }
            self.cache.clear();
        }
        Ok(())
    }

    /// One depth-first sweep from `root`. Returns whether the root was entered.
    async fn sweep(&mut self, root: Position) -> Result<bool, Cancelled> {
        let mut stack = match self.enter(root).await? {
            Some(frame) => vec![frame],
            None => return Ok(false),
        };

        while let Some(frame) = stack.last_mut() {
            match frame.directions.pop() {
                Some(direction) => {
                    let next = frame.pos.step(direction);
                    if let Some(child) = self.enter(next).await? {
                        stack.push(child);
                    }
                }
                None => {
                    let pos = frame.pos;
                    stack.pop();
                    self.leave(pos).await?;
                }
            }
        }
        Ok(true)
    }

    /// Step onto `pos` if it is free. Returns the frame for the resolved
    /// cell, which differs from `pos` after a portal.
    async fn enter(&mut self, pos: Position) -> Result<Option<Frame>, Cancelled> {
        if self.cancel.is_cancelled() {
            return Err(Cancelled);
        }
        if !self.controller.is_road(pos).await {
            return Ok(None);
        }
        let symbol = self.lookup(pos).await;
        if !self.policy.can_enter(self.controller.legend(), symbol) {
            return Ok(None);
        }

        self.pace().await?;
        let spawn = self.spec.spawn;
        self.cache.mark(pos, spawn, self.controller.legend());

        let landed = self.controller.report_position(self.id, pos).await;
        self.last_position = landed;
        if landed != pos {
            debug!(agent = %self.spec.name, from = %pos, to = %landed, "Teleported");
            if let Some(entry) = self.controller.last_position(self.id).await {
                self.cache.mark(entry, spawn, self.controller.legend());
            }
            self.cache.mark(landed, spawn, self.controller.legend());
        }
        Ok(Some(Frame::new(landed)))
    }

    /// Walk back onto `pos` after exhausting it.
    async fn leave(&mut self, pos: Position) -> Result<(), Cancelled> {
        self.pace().await?;
        let spawn = self.spec.spawn;
        self.cache.unmark(pos, spawn, self.controller.legend());
        let landed = self.controller.report_position(self.id, pos).await;
        self.last_position = landed;
        self.cache.unmark(landed, spawn, self.controller.legend());
        Ok(())
    }

    async fn lookup(&mut self, pos: Position) -> char {
        if let Some(symbol) = self.cache.get(pos) {
            return symbol;
        }
        let symbol = self
            .controller
            .cached_symbol(pos)
            .await
            .unwrap_or(self.controller.legend().road);
        self.cache.insert(pos, symbol);
        symbol
    }

    /// Sleep for the agent's current pacing interval.
    async fn pace(&self) -> Result<(), Cancelled> {
        let Some(speed) = self.controller.pace(self.id).await else {
            return Err(Cancelled);
        };
        self.cancel.sleep(speed).await
    }
}

/// Pacing interval as a duration.
pub(crate) fn pacing(speed_ms: u64) -> Duration {
    Duration::from_millis(speed_ms)
}
