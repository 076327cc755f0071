//! The controller: the monitor every agent reports to.
//!
//! All shared state lives behind one lock. Each agent move goes through
//! [`Controller::report_position`], which resolves portals, collisions,
//! scoring and painting atomically. Two condition points are exposed on top
//! of the lock: the end of the game and the end of the current attack
//! window.

use crate::agent::{pacing, AgentRecord, AgentSnapshot, AgentSpec, AgentTask};
use crate::attack_mode::{self, AttackPhase};
use crate::attack_timer::{AttackTimer, AttackWindow};
use crate::config::{GameConfig, Lives};
use crate::role::policy_for;
use async_trait::async_trait;
use chase_core::error::{ChaseError, Result};
use chase_core::grid::{CharGrid, GridService};
use chase_core::legend::Legend;
use chase_core::types::{AgentId, Position, Role};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Status line period, in collected points.
const POINTS_LOG_PERIOD: usize = 30;

/// The two portal pairs, in row-major order.
///
/// Entry #0 leads to exit #1 and entry #1 to exit #0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Portals {
    pub entries: [Position; 2],
    pub exits: [Position; 2],
}

impl Portals {
    /// Find the portals on a grid. A map has either none or exactly two
    /// entries and two exits.
    pub fn locate(grid: &dyn GridService, legend: &Legend) -> Result<Option<Self>> {
        let entries = grid.positions_of(legend.portal_entry);
        let exits = grid.positions_of(legend.portal_exit);
        match (entries.as_slice(), exits.as_slice()) {
            ([], []) => Ok(None),
            ([e0, e1], [x0, x1]) => Ok(Some(Self {
                entries: [*e0, *e1],
                exits: [*x0, *x1],
            })),
            _ => Err(ChaseError::PortalMismatch {
                entry: legend.portal_entry,
                exit: legend.portal_exit,
                entries: entries.len(),
                exits: exits.len(),
            }),
        }
    }

    /// Where an entry leads: `(landing exit, entry on the landing side)`.
    pub fn route(&self, pos: Position) -> Option<(Position, Position)> {
        if pos == self.entries[0] {
            Some((self.exits[1], self.entries[1]))
        } else if pos == self.entries[1] {
            Some((self.exits[0], self.entries[0]))
        } else {
            None
        }
    }
}

/// Summary of a game, for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameStats {
    pub points: usize,
    pub total_points: usize,
    pub lives: Lives,
    /// Hunters killed by seekers.
    pub hunters_killed: usize,
    /// Seekers killed by hunters.
    pub seekers_killed: usize,
    pub respawns: usize,
    pub agents: usize,
    pub game_in_progress: bool,
    pub attack_in_progress: bool,
    pub won: bool,
}

/// Everything guarded by the controller lock.
pub struct ControllerState {
    pub(crate) grid: Box<dyn GridService>,
    pub(crate) agents: HashMap<AgentId, AgentRecord>,
    pub(crate) occupancy: HashMap<Position, AgentId>,
    /// What each occupied (or once occupied) cell shows without an agent on it.
    pub(crate) beneath: HashMap<Position, char>,
    pub(crate) points: usize,
    pub(crate) total_points: usize,
    pub(crate) lives: Lives,
    pub(crate) attack_in_progress: bool,
    pub(crate) game_in_progress: bool,
    pub(crate) timer: Option<Arc<AttackTimer>>,
    pub(crate) launched: bool,
    pub(crate) tasks: Vec<JoinHandle<()>>,
    pub(crate) hunters_killed: usize,
    pub(crate) seekers_killed: usize,
    pub(crate) respawns: usize,
}

/// The game monitor.
pub struct Controller {
    state: Mutex<ControllerState>,
    legend: Legend,
    config: GameConfig,
    portals: Option<Portals>,
    game_ended: Notify,
    attack_ended: Notify,
    next_timer_id: AtomicU64,
}

impl Controller {
    /// Create a controller over a grid. No agents are attached yet.
    pub fn new(grid: Box<dyn GridService>, legend: Legend, config: GameConfig) -> Result<Arc<Self>> {
        config.validate(&legend)?;
        let portals = Portals::locate(grid.as_ref(), &legend)?;
        let total_points = grid.positions_of(legend.point).len();
        info!("Game maximum number of points: {}", total_points);

        let state = ControllerState {
            grid,
            agents: HashMap::new(),
            occupancy: HashMap::new(),
            beneath: HashMap::new(),
            points: 0,
            total_points,
            lives: config.lives(),
            attack_in_progress: false,
            game_in_progress: true,
            timer: None,
            launched: false,
            tasks: Vec::new(),
            hunters_killed: 0,
            seekers_killed: 0,
            respawns: 0,
        };

        Ok(Arc::new(Self {
            state: Mutex::new(state),
            legend,
            config,
            portals,
            game_ended: Notify::new(),
            attack_ended: Notify::new(),
            next_timer_id: AtomicU64::new(1),
        }))
    }

    /// Parse a text map with the default legend and create a controller.
    pub fn from_map(text: &str, config: GameConfig) -> Result<Arc<Self>> {
        let legend = Legend::default();
        let grid = CharGrid::parse(text, legend.clone())?;
        Self::new(Box::new(grid), legend, config)
    }

    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn portals(&self) -> Option<Portals> {
        self.portals
    }

    // ---- agent moves ----

    /// Move an agent onto `target` and resolve everything that follows.
    ///
    /// Returns where the agent actually landed, which differs from `target`
    /// only after a portal. Calls from agents that are no longer live, or
    /// made after the game ended, change nothing and return `target`.
    pub async fn report_position(self: &Arc<Self>, id: AgentId, target: Position) -> Position {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        if !state.game_in_progress || !state.agents.contains_key(&id) {
            return target;
        }
        assert!(
            state.grid.is_road(target),
            "agent {id} reported a non-road position {target}"
        );

        // Portal.
        let mut target = target;
        let mut landing_last = target;
        if let Some((exit, entry)) = self.portals.and_then(|p| p.route(target)) {
            if let Some(cell) = state.agents.get_mut(&id).and_then(|r| r.standing.take()) {
                self.vacate(state, id, cell);
            }
            debug!(id = %id, from = %target, to = %exit, "Portal");
            target = exit;
            landing_last = entry;
        }

        // Collision.
        if let Some(&other) = state.occupancy.get(&target) {
            if other != id && self.resolve_collision(state, id, other) == id {
                return target;
            }
        }
        if !state.game_in_progress {
            return target;
        }

        // Scoring.
        let role = state.agents[&id].role();
        let real = self.real_symbol(state, target);
        let collected = role == Role::Seeker && (real == self.legend.point || real == self.legend.bonus);
        if role == Role::Seeker {
            if real == self.legend.point {
                self.collect_point(state);
            } else if real == self.legend.bonus {
                self.open_attack_window(state);
            }
        }

        // Bookkeeping.
        if collected {
            state.beneath.insert(target, self.legend.road);
        } else {
            state.beneath.entry(target).or_insert(real);
        }

        let previous = state.agents[&id].standing;
        if let Some(cell) = previous.filter(|&cell| cell != target) {
            self.vacate(state, id, cell);
        }

        let Some(record) = state.agents.get_mut(&id) else {
            return target;
        };
        record.standing = Some(target);
        record.last_position = landing_last;
        let symbol = record.symbol;
        state.occupancy.insert(target, id);
        state.grid.set_symbol(target, symbol);

        target
    }

    /// Kill one of two opposing agents meeting on a cell. Returns the victim,
    /// or `other` unchanged when the two do not oppose each other.
    fn resolve_collision(self: &Arc<Self>, state: &mut ControllerState, actor: AgentId, other: AgentId) -> AgentId {
        let actor_role = state.agents[&actor].role();
        let Some(other_record) = state.agents.get(&other) else {
            return other;
        };
        if !actor_role.opposes(&other_record.role()) {
            return other;
        }

        let (hunter, seeker) = if actor_role.is_hunter() {
            (actor, other)
        } else {
            (other, actor)
        };
        let hunter_loses = state.agents[&hunter].under_attack || state.lives.is_unlimited();
        let (victim, winner) = if hunter_loses {
            (hunter, seeker)
        } else {
            (seeker, hunter)
        };
        info!(
            "{} killed {}",
            state.agents[&winner].spec.name,
            state.agents[&victim].spec.name
        );
        self.kill(state, victim);
        victim
    }

    /// Remove a live agent, then respawn it or end the game.
    fn kill(self: &Arc<Self>, state: &mut ControllerState, victim: AgentId) {
        let Some(mut record) = state.agents.remove(&victim) else {
            return;
        };
        record.cancel.cancel();
        if let AttackPhase::Active { blink } = std::mem::take(&mut record.phase) {
            blink.abort();
        }
        if let Some(cell) = record.standing {
            self.vacate(state, victim, cell);
        }

        let spec = record.spec;
        if spec.role.is_hunter() {
            state.hunters_killed += 1;
            self.respawn(state, spec);
            return;
        }

        state.seekers_killed += 1;
        if !self.config.endless {
            state.lives.lose_one();
        }
        if state.lives.any_left() {
            match state.lives {
                Lives::Limited(n) => info!("{} has {} lives left", spec.name, n),
                Lives::Unlimited => info!("{} has unlimited lives", spec.name),
            }
            self.respawn(state, spec);
        } else {
            info!("{} has no lives left", spec.name);
            self.end_game(state);
        }
    }

    fn respawn(self: &Arc<Self>, state: &mut ControllerState, spec: AgentSpec) {
        info!("Spawning new {}", spec.name);
        state.respawns += 1;
        let role = spec.role;
        let id = self.register(state, spec);
        // A hunter coming back into an open window joins it.
        if state.attack_in_progress && role.is_hunter() {
            policy_for(role).enter_attack_mode(self, state, id);
        }
        if state.launched {
            self.launch(state, id);
        }
    }

    fn collect_point(&self, state: &mut ControllerState) {
        state.points += 1;
        assert!(
            state.points <= state.total_points,
            "collected {} of {} points",
            state.points,
            state.total_points
        );
        if state.points % POINTS_LOG_PERIOD == 0 || state.points == state.total_points {
            info!("Points {}/{}", state.points, state.total_points);
        }
        if state.points == state.total_points && !self.config.endless {
            self.end_game(state);
        }
    }

    fn open_attack_window(self: &Arc<Self>, state: &mut ControllerState) {
        let hunters: Vec<(AgentId, Role)> = state
            .agents
            .values()
            .filter(|r| r.role().is_hunter())
            .map(|r| (r.id, r.role()))
            .collect();
        if hunters.is_empty() {
            debug!("Bonus eaten with no hunter on the board");
            return;
        }
        state.attack_in_progress = true;
        info!(hunters = hunters.len(), "Attack mode started");
        for (id, role) in hunters {
            policy_for(role).enter_attack_mode(self, state, id);
        }
        self.start_attack_timer(state);
    }

    /// Extend the running attack timer, or start a new one.
    fn start_attack_timer(self: &Arc<Self>, state: &mut ControllerState) {
        if let Some(timer) = &state.timer {
            timer.add_more(self.config.attack_duration);
            return;
        }
        let id = self.next_timer_id.fetch_add(1, Ordering::SeqCst);
        let timer = Arc::new(AttackTimer::new(
            id,
            self.config.attack_duration,
            self.config.attack_unit(),
        ));
        state.timer = Some(timer.clone());
        let window: Arc<dyn AttackWindow> = self.clone();
        tokio::spawn(timer.run(window));
    }

    /// The symbol a cell holds underneath any agent standing on it.
    fn real_symbol(&self, state: &ControllerState, pos: Position) -> char {
        let shown = state.grid.symbol(pos).unwrap_or(self.legend.road);
        if self.legend.is_agent_symbol(shown) {
            state.beneath.get(&pos).copied().unwrap_or(self.legend.road)
        } else {
            shown
        }
    }

    /// `leaving` steps off `cell`. Hand the cell to another agent still
    /// standing there, or restore what lies beneath.
    fn vacate(&self, state: &mut ControllerState, leaving: AgentId, cell: Position) {
        if state.occupancy.get(&cell) == Some(&leaving) {
            state.occupancy.remove(&cell);
        }
        let heir = match state.occupancy.get(&cell) {
            Some(&occupant) => Some(occupant),
            None => state
                .agents
                .values()
                .find(|r| r.id != leaving && r.standing == Some(cell))
                .map(|r| r.id),
        };
        match heir.and_then(|id| state.agents.get(&id)) {
            Some(record) => {
                let (id, symbol) = (record.id, record.symbol);
                state.occupancy.insert(cell, id);
                state.grid.set_symbol(cell, symbol);
            }
            None => {
                let symbol = state.beneath.get(&cell).copied().unwrap_or(self.legend.road);
                state.grid.set_symbol(cell, symbol);
            }
        }
    }

    /// Repaint an agent on the cell it occupies, after a symbol change.
    pub(crate) fn repaint(&self, state: &mut ControllerState, id: AgentId) {
        let Some(record) = state.agents.get(&id) else {
            return;
        };
        if let Some(cell) = record.standing {
            if state.occupancy.get(&cell) == Some(&id) {
                state.grid.set_symbol(cell, record.symbol);
            }
        }
    }

    // ---- lifecycle ----

    /// Register an agent. It is launched right away if the game has started.
    pub async fn attach_extra_entity(self: &Arc<Self>, spec: AgentSpec) -> AgentId {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let id = self.register(state, spec);
        if state.launched {
            self.launch(state, id);
        }
        id
    }

    fn register(&self, state: &mut ControllerState, spec: AgentSpec) -> AgentId {
        assert!(
            state.grid.is_road(spec.spawn),
            "{} spawns on a non-road position {}",
            spec.name,
            spec.spawn
        );
        let mut record = AgentRecord::new(spec);
        let (id, spawn) = (record.id, record.spec.spawn);

        state.beneath.insert(spawn, self.legend.road);
        record.standing = Some(spawn);
        if !state.occupancy.contains_key(&spawn) {
            state.occupancy.insert(spawn, id);
            state.grid.set_symbol(spawn, record.symbol);
        }
        debug!(id = %id, "{} spawned at {}", record.spec.name, spawn);
        state.agents.insert(id, record);

        self.recount_points(state);
        id
    }

    /// Total points are whatever is collected plus whatever is still out
    /// there, shown or hidden under an agent.
    fn recount_points(&self, state: &mut ControllerState) {
        let point = self.legend.point;
        let shown = state.grid.positions_of(point).len();
        let hidden = state
            .beneath
            .iter()
            .filter(|(pos, symbol)| **symbol == point && state.grid.symbol(**pos) != Some(point))
            .count();
        state.total_points = state.points + shown + hidden;
    }

    fn launch(self: &Arc<Self>, state: &mut ControllerState, id: AgentId) {
        let Some(record) = state.agents.get(&id) else {
            return;
        };
        let task = AgentTask::new(self.clone(), id, record.spec.clone(), record.cancel.clone());
        state.tasks.retain(|handle| !handle.is_finished());
        state.tasks.push(tokio::spawn(task.run()));
    }

    /// Launch every attached agent.
    pub async fn start(self: &Arc<Self>) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        if state.launched {
            warn!("Game already started");
            return;
        }
        state.launched = true;
        let ids: Vec<AgentId> = state.agents.keys().copied().collect();
        info!(agents = ids.len(), "Game started");
        for id in ids {
            self.launch(state, id);
        }
    }

    fn end_game(&self, state: &mut ControllerState) {
        assert!(state.game_in_progress, "game ended twice");
        for record in state.agents.values() {
            record.cancel.cancel();
        }
        if let Some(timer) = state.timer.take() {
            timer.cancel();
        }
        state.game_in_progress = false;
        info!("Game over: {}/{} points", state.points, state.total_points);
        self.game_ended.notify_waiters();
    }

    /// End the game early, if it is still running.
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        if state.game_in_progress {
            info!("Game stopped");
            self.end_game(&mut state);
        }
    }

    /// Wait for the game to end. Returns whether every point was collected.
    pub async fn waiting_for_game_to_end(&self) -> bool {
        loop {
            let notified = self.game_ended.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            {
                let state = self.state.lock().await;
                if !state.game_in_progress {
                    info!("Final points: {}", state.points);
                    return state.points == state.total_points;
                }
            }
            notified.await;
        }
    }

    /// Wait until no attack window is open.
    pub async fn has_attack_mode_ended(&self) {
        loop {
            let notified = self.attack_ended.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if !self.state.lock().await.attack_in_progress {
                return;
            }
            notified.await;
        }
    }

    /// Wait for every agent task, including ones spawned while waiting.
    pub async fn join_agents(&self) {
        loop {
            let handles = std::mem::take(&mut self.state.lock().await.tasks);
            if handles.is_empty() {
                return;
            }
            for handle in handles {
                if let Err(e) = handle.await {
                    if e.is_panic() {
                        std::panic::resume_unwind(e.into_panic());
                    }
                }
            }
        }
    }

    // ---- attack mode ----

    /// Put an agent into attack mode through its role policy.
    ///
    /// # Panics
    ///
    /// Seekers have no attack mode.
    pub async fn enter_attack_mode(self: &Arc<Self>, id: AgentId) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let Some(role) = state.agents.get(&id).map(|r| r.role()) else {
            return;
        };
        policy_for(role).enter_attack_mode(self, state, id);
    }

    /// Flip a blinking hunter's symbol. Returns `false` once the hunter is
    /// gone or no longer blinking.
    pub(crate) async fn toggle_blink(&self, id: AgentId) -> bool {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let [first, second] = self.legend.blink;
        let Some(record) = state.agents.get_mut(&id) else {
            return false;
        };
        if !matches!(record.phase, AttackPhase::Active { .. }) {
            return false;
        }
        record.symbol = if record.symbol == first { second } else { first };
        self.repaint(state, id);
        true
    }

    /// Move a blinking hunter to `Reverting` and hand back its toggler.
    pub(crate) async fn begin_revert(&self, id: AgentId) -> Option<JoinHandle<()>> {
        let mut state = self.state.lock().await;
        let record = state.agents.get_mut(&id)?;
        match std::mem::replace(&mut record.phase, AttackPhase::Reverting) {
            AttackPhase::Active { blink } => Some(blink),
            other => {
                record.phase = other;
                None
            }
        }
    }

    /// Restore a hunter after its attack mode, re-engaging if a new window
    /// opened in the meantime.
    pub(crate) async fn finish_revert(self: &Arc<Self>, id: AgentId) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let Some(record) = state.agents.get_mut(&id) else {
            return;
        };
        record.speed_ms = record.spec.speed_ms;
        record.under_attack = false;
        record.symbol = record.spec.symbol;
        record.phase = AttackPhase::Inactive;
        debug!(agent = %record.spec.name, "Left attack mode");
        self.repaint(state, id);

        if state.attack_in_progress && state.game_in_progress {
            attack_mode::engage(self, state, id);
        }
    }

    // ---- queries ----

    pub async fn is_valid(&self, pos: Position) -> bool {
        self.state.lock().await.grid.is_valid(pos)
    }

    pub async fn is_road(&self, pos: Position) -> bool {
        self.state.lock().await.grid.is_road(pos)
    }

    /// The symbol an agent should remember for a cell: what lies beneath
    /// any agent standing there.
    pub async fn cached_symbol(&self, pos: Position) -> Option<char> {
        let state = self.state.lock().await;
        state.grid.symbol(pos)?;
        Some(self.real_symbol(&state, pos))
    }

    /// What the grid shows on a cell, agents included.
    pub async fn shown_symbol(&self, pos: Position) -> Option<char> {
        self.state.lock().await.grid.symbol(pos)
    }

    pub fn is_agent_symbol(&self, symbol: char) -> bool {
        self.legend.is_agent_symbol(symbol)
    }

    pub async fn positions_of(&self, symbol: char) -> Vec<Position> {
        self.state.lock().await.grid.positions_of(symbol)
    }

    /// Current pacing interval of a live agent.
    pub async fn pace(&self, id: AgentId) -> Option<Duration> {
        let state = self.state.lock().await;
        state.agents.get(&id).map(|r| pacing(r.speed_ms))
    }

    pub async fn last_position(&self, id: AgentId) -> Option<Position> {
        let state = self.state.lock().await;
        state.agents.get(&id).map(|r| r.last_position)
    }

    pub async fn game_in_progress(&self) -> bool {
        self.state.lock().await.game_in_progress
    }

    pub async fn attack_in_progress(&self) -> bool {
        self.state.lock().await.attack_in_progress
    }

    pub async fn points(&self) -> usize {
        self.state.lock().await.points
    }

    pub async fn total_points(&self) -> usize {
        self.state.lock().await.total_points
    }

    pub async fn points_remaining(&self) -> usize {
        let state = self.state.lock().await;
        state.total_points - state.points
    }

    pub async fn lives(&self) -> Lives {
        self.state.lock().await.lives
    }

    pub async fn occupant(&self, pos: Position) -> Option<AgentId> {
        self.state.lock().await.occupancy.get(&pos).copied()
    }

    pub async fn occupancy(&self) -> HashMap<Position, AgentId> {
        self.state.lock().await.occupancy.clone()
    }

    pub async fn agent(&self, id: AgentId) -> Option<AgentSnapshot> {
        self.state.lock().await.agents.get(&id).map(AgentRecord::snapshot)
    }

    /// Snapshots of every live agent, ordered by name.
    pub async fn agents(&self) -> Vec<AgentSnapshot> {
        let state = self.state.lock().await;
        let mut agents: Vec<AgentSnapshot> = state.agents.values().map(AgentRecord::snapshot).collect();
        agents.sort_by(|a, b| a.name.cmp(&b.name));
        agents
    }

    pub async fn attack_timer(&self) -> Option<Arc<AttackTimer>> {
        self.state.lock().await.timer.clone()
    }

    pub async fn stats(&self) -> GameStats {
        let state = self.state.lock().await;
        GameStats {
            points: state.points,
            total_points: state.total_points,
            lives: state.lives,
            hunters_killed: state.hunters_killed,
            seekers_killed: state.seekers_killed,
            respawns: state.respawns,
            agents: state.agents.len(),
            game_in_progress: state.game_in_progress,
            attack_in_progress: state.attack_in_progress,
            won: !state.game_in_progress && state.points == state.total_points,
        }
    }

    pub async fn render(&self) -> String {
        self.state.lock().await.grid.render()
    }
}

#[async_trait]
impl AttackWindow for Controller {
    async fn disable_attack_mode(&self, timer: &AttackTimer) -> bool {
        let mut state = self.state.lock().await;
        if !state.game_in_progress {
            return true;
        }
        if !timer.is_due() {
            debug!(timer = timer.id(), remaining = timer.remaining(), "Attack timer extended before expiry");
            return false;
        }
        assert!(state.attack_in_progress, "attack mode disabled while not in progress");
        assert_eq!(
            state.timer.as_ref().map(|t| t.id()),
            Some(timer.id()),
            "attack mode disabled by a stale timer"
        );
        state.attack_in_progress = false;
        state.timer = None;
        info!("Attack mode ended");
        self.attack_ended.notify_waiters();
        true
    }
}
