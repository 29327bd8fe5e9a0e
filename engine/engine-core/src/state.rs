//! The authoritative game state and the turn-execution rules.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::trace;

use crate::action::{Action, ActionResult};
use crate::agent::{Agent, AgentId, Outcome};
use crate::error::{GameError, Result};
use crate::grid::{Cell, Direction, Grid, Position};
use crate::rules::RulesConfig;

/// A refuelling point. Stations stay on the board when empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuelStation {
    pub position: Position,
    pub capacity: u32,
    pub current: u32,
}

impl FuelStation {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.current > 0
    }
}

/// A capturable control point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightNode {
    pub position: Position,
    pub controlled_by: Option<AgentId>,
}

/// Mutable state of a door cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Door {
    pub position: Position,
    pub open: bool,
}

/// How a legal move resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveKind {
    Step(Position),
    OpenDoor(Position),
}

/// Full match state.
///
/// Terrain and rules are shared behind `Arc`s; everything that changes
/// during play lives in flat vectors, so `clone()` is a cheap value copy
/// with no shared mutable substructure.
#[derive(Debug, Clone)]
pub struct GameState {
    grid: Arc<Grid>,
    rules: Arc<RulesConfig>,
    agents: [Agent; 2],
    stations: Vec<FuelStation>,
    nodes: Vec<LightNode>,
    doors: Vec<Door>,
    turn: u32,
    first_player: AgentId,
    active_player: AgentId,
}

impl GameState {
    /// Assemble a state from its parts and verify every invariant.
    pub(crate) fn from_parts(
        grid: Grid,
        rules: RulesConfig,
        agents: [Agent; 2],
        stations: Vec<FuelStation>,
        nodes: Vec<LightNode>,
        doors: Vec<Door>,
        first_player: AgentId,
    ) -> Result<Self> {
        let state = Self {
            grid: Arc::new(grid),
            rules: Arc::new(rules),
            agents,
            stations,
            nodes,
            doors,
            turn: 0,
            first_player,
            active_player: first_player,
        };
        state.check_invariants()?;
        Ok(state)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    pub fn agent(&self, id: AgentId) -> &Agent {
        &self.agents[id.index()]
    }

    pub fn agents(&self) -> &[Agent; 2] {
        &self.agents
    }

    pub fn stations(&self) -> &[FuelStation] {
        &self.stations
    }

    pub fn nodes(&self) -> &[LightNode] {
        &self.nodes
    }

    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn max_turns(&self) -> u32 {
        self.rules.max_turns
    }

    pub fn active_player(&self) -> AgentId {
        self.active_player
    }

    pub fn first_player(&self) -> AgentId {
        self.first_player
    }

    pub fn station_at(&self, pos: Position) -> Option<&FuelStation> {
        self.stations.iter().find(|s| s.position == pos)
    }

    pub fn node_at(&self, pos: Position) -> Option<&LightNode> {
        self.nodes.iter().find(|n| n.position == pos)
    }

    pub fn is_door_open(&self, pos: Position) -> bool {
        self.doors.iter().any(|d| d.position == pos && d.open)
    }

    /// The agent standing on `pos`, if any.
    pub fn occupant(&self, pos: Position) -> Option<AgentId> {
        self.agents
            .iter()
            .find(|a| a.position == pos)
            .map(|a| a.id)
    }

    /// Whether an agent may stand on `pos` given the current door state.
    pub fn is_passable(&self, pos: Position) -> bool {
        match self.grid.terrain_at(pos) {
            Some(Cell::Door) => self.is_door_open(pos),
            Some(cell) => !cell.blocks_movement(),
            None => false,
        }
    }

    /// Line of sight using the live door state.
    pub fn has_line_of_sight(&self, a: Position, b: Position) -> bool {
        self.grid.line_of_sight_with(a, b, |p| self.is_door_open(p))
    }

    /// Whether the two agents can see each other.
    pub fn agents_in_sight(&self) -> bool {
        self.has_line_of_sight(self.agents[0].position, self.agents[1].position)
    }

    /// Path distance from `from` to the nearest light node not owned by
    /// `agent`. Doors count as passable; agents do not block.
    pub fn target_distance_from(&self, from: Position, agent: AgentId) -> Option<u32> {
        if !self.nodes.iter().any(|n| n.controlled_by != Some(agent)) {
            return None;
        }
        self.grid.path_distance(
            from,
            |p| {
                self.grid
                    .terrain_at(p)
                    .is_some_and(|c| c == Cell::Door || !c.blocks_movement())
            },
            |p| {
                self.node_at(p)
                    .is_some_and(|n| n.controlled_by != Some(agent))
            },
        )
    }

    /// [`target_distance_from`](Self::target_distance_from) at the agent's
    /// current position.
    pub fn target_distance(&self, agent: AgentId) -> Option<u32> {
        self.target_distance_from(self.agent(agent).position, agent)
    }

    // ------------------------------------------------------------------
    // Rules
    // ------------------------------------------------------------------

    fn move_kind(&self, agent: AgentId, dir: Direction) -> Option<MoveKind> {
        let me = self.agent(agent);
        if me.fuel < self.rules.move_cost {
            return None;
        }
        let dest = me.position.step(dir);
        let cell = self.grid.terrain_at(dest)?;
        if self.agent(agent.opponent()).position == dest {
            return None;
        }
        match cell {
            Cell::Door if self.is_door_open(dest) => Some(MoveKind::Step(dest)),
            Cell::Door => Some(MoveKind::OpenDoor(dest)),
            c if !c.blocks_movement() => Some(MoveKind::Step(dest)),
            _ => None,
        }
    }

    fn control_cost(&self, agent: AgentId, node: &LightNode) -> Option<u32> {
        match node.controlled_by {
            Some(owner) if owner == agent => None,
            Some(_) => Some(self.rules.capture_cost),
            None => Some(self.rules.control_cost),
        }
    }

    fn node_index_at(&self, pos: Position) -> Option<usize> {
        self.nodes.iter().position(|n| n.position == pos)
    }

    fn station_index_at(&self, pos: Position) -> Option<usize> {
        self.stations.iter().position(|s| s.position == pos)
    }

    fn can_control(&self, agent: AgentId) -> bool {
        let me = self.agent(agent);
        self.node_at(me.position)
            .and_then(|node| self.control_cost(agent, node))
            .is_some_and(|cost| me.fuel >= cost)
    }

    fn can_refuel(&self, agent: AgentId) -> bool {
        self.station_at(self.agent(agent).position)
            .is_some_and(FuelStation::is_active)
    }

    /// Legal actions for `agent` in canonical order:
    /// `ControlNode, Refuel, Move(N), Move(E), Move(S), Move(W), Wait`.
    ///
    /// Depends only on positions, fuel and ownership. Whose turn it is and
    /// whether the match has ended are checked by [`apply`](Self::apply).
    pub fn legal_actions(&self, agent: AgentId) -> Vec<Action> {
        let mut actions = Vec::with_capacity(7);
        if self.can_control(agent) {
            actions.push(Action::ControlNode);
        }
        if self.can_refuel(agent) {
            actions.push(Action::Refuel);
        }
        for dir in Direction::ALL {
            if self.move_kind(agent, dir).is_some() {
                actions.push(Action::Move(dir));
            }
        }
        actions.push(Action::Wait);
        actions
    }

    pub fn is_legal(&self, agent: AgentId, action: Action) -> bool {
        match action {
            Action::ControlNode => self.can_control(agent),
            Action::Refuel => self.can_refuel(agent),
            Action::Move(dir) => self.move_kind(agent, dir).is_some(),
            Action::Wait => true,
        }
    }

    /// Apply `action` for `agent` and advance the turn.
    ///
    /// The action is re-validated; nothing is mutated when it is rejected.
    pub fn apply(&mut self, action: Action, agent: AgentId) -> Result<ActionResult> {
        if self.is_terminal() {
            return Err(GameError::illegal(agent, action, "match is over"));
        }
        if agent != self.active_player {
            return Err(GameError::illegal(
                agent,
                action,
                format!("it is {}'s turn", self.active_player),
            ));
        }

        let result = match action {
            Action::Move(dir) => self.apply_move(agent, dir)?,
            Action::Refuel => self.apply_refuel(agent)?,
            Action::ControlNode => self.apply_control(agent)?,
            Action::Wait => ActionResult::Waited,
        };

        self.turn += 1;
        self.active_player = self.active_player.opponent();
        self.regenerate_stations();

        trace!(turn = self.turn, %agent, %action, "applied action");
        debug_assert!(
            self.check_invariants().is_ok(),
            "invariants broken after {action} by {agent}: {:?}",
            self.check_invariants()
        );
        Ok(result)
    }

    fn apply_move(&mut self, agent: AgentId, dir: Direction) -> Result<ActionResult> {
        let action = Action::Move(dir);
        let kind = self.move_kind(agent, dir).ok_or_else(|| {
            GameError::illegal(agent, action, "destination blocked or not enough fuel")
        })?;

        let cost = self.rules.move_cost;
        let me = &mut self.agents[agent.index()];
        me.fuel -= cost;
        let fuel_after = me.fuel;

        match kind {
            MoveKind::Step(to) => {
                let from = me.position;
                me.position = to;
                Ok(ActionResult::Moved {
                    from,
                    to,
                    fuel_cost: cost,
                    fuel_after,
                })
            }
            MoveKind::OpenDoor(door) => {
                let entry = self
                    .doors
                    .iter_mut()
                    .find(|d| d.position == door)
                    .ok_or_else(|| {
                        GameError::InvariantViolation(format!("no door state for {door}"))
                    })?;
                entry.open = true;
                Ok(ActionResult::DoorOpened {
                    door,
                    fuel_cost: cost,
                    fuel_after,
                })
            }
        }
    }

    fn apply_refuel(&mut self, agent: AgentId) -> Result<ActionResult> {
        if !self.can_refuel(agent) {
            return Err(GameError::illegal(
                agent,
                Action::Refuel,
                "not on an active station",
            ));
        }
        let position = self.agent(agent).position;
        let idx = self
            .station_index_at(position)
            .ok_or_else(|| GameError::InvariantViolation(format!("no station at {position}")))?;

        let max_fuel = self.rules.max_fuel;
        let me = &mut self.agents[agent.index()];
        let station = &mut self.stations[idx];
        let amount = self
            .rules
            .refuel_amount
            .min(max_fuel - me.fuel)
            .min(station.current);
        station.current -= amount;
        me.fuel += amount;

        Ok(ActionResult::Refueled {
            station: position,
            amount,
            fuel_after: me.fuel,
            station_remaining: station.current,
        })
    }

    fn apply_control(&mut self, agent: AgentId) -> Result<ActionResult> {
        if !self.can_control(agent) {
            return Err(GameError::illegal(
                agent,
                Action::ControlNode,
                "not on a capturable node or not enough fuel",
            ));
        }
        let position = self.agent(agent).position;
        let idx = self
            .node_index_at(position)
            .ok_or_else(|| GameError::InvariantViolation(format!("no node at {position}")))?;

        let node = &self.nodes[idx];
        let previous_owner = node.controlled_by;
        let cost = self.control_cost(agent, node).unwrap_or_default();

        self.nodes[idx].controlled_by = Some(agent);
        if let Some(prev) = previous_owner {
            self.agents[prev.index()].nodes_controlled -= 1;
        }
        let me = &mut self.agents[agent.index()];
        me.nodes_controlled += 1;
        me.fuel -= cost;

        Ok(ActionResult::NodeControlled {
            node: position,
            previous_owner,
            new_owner: agent,
            fuel_cost: cost,
            fuel_after: me.fuel,
        })
    }

    fn regenerate_stations(&mut self) {
        let interval = self.rules.regen_interval;
        if interval == 0 || self.turn % interval != 0 {
            return;
        }
        let amount = self.rules.regen_amount;
        for station in &mut self.stations {
            station.current = station.current.saturating_add(amount).min(station.capacity);
        }
    }

    // ------------------------------------------------------------------
    // Termination
    // ------------------------------------------------------------------

    /// The agent owning every light node, if any (requires at least one node).
    pub fn dominant_agent(&self) -> Option<AgentId> {
        let total = self.nodes.len() as u32;
        if total == 0 {
            return None;
        }
        self.agents
            .iter()
            .find(|a| a.nodes_controlled == total)
            .map(|a| a.id)
    }

    pub fn is_terminal(&self) -> bool {
        self.turn >= self.rules.max_turns
            || (self.rules.early_victory && self.dominant_agent().is_some())
    }

    /// Outcome by nodes controlled, then fuel, otherwise a draw.
    ///
    /// Meaningful at any point; callers normally ask once the state is
    /// terminal.
    pub fn winner(&self) -> Outcome {
        let [s, r] = &self.agents;
        match s
            .nodes_controlled
            .cmp(&r.nodes_controlled)
            .then(s.fuel.cmp(&r.fuel))
        {
            Ordering::Greater => Outcome::Strategist,
            Ordering::Less => Outcome::Reactive,
            Ordering::Equal => Outcome::Draw,
        }
    }

    // ------------------------------------------------------------------
    // Invariants
    // ------------------------------------------------------------------

    /// Verify every structural invariant. Nothing is ever auto-corrected.
    pub fn check_invariants(&self) -> Result<()> {
        let fail = |msg: String| Err(GameError::InvariantViolation(msg));

        let expected_active = if self.turn % 2 == 0 {
            self.first_player
        } else {
            self.first_player.opponent()
        };
        if self.active_player != expected_active {
            return fail(format!(
                "active player {} does not alternate from {} at turn {}",
                self.active_player, self.first_player, self.turn
            ));
        }

        for (idx, agent) in self.agents.iter().enumerate() {
            if agent.id.index() != idx {
                return fail(format!("agent {} stored in slot {idx}", agent.id));
            }
            if agent.fuel > self.rules.max_fuel {
                return fail(format!(
                    "{} has {} fuel, above max {}",
                    agent.id, agent.fuel, self.rules.max_fuel
                ));
            }
            if !self.is_passable(agent.position) {
                return fail(format!(
                    "{} stands on impassable cell {}",
                    agent.id, agent.position
                ));
            }
        }
        if self.agents[0].position == self.agents[1].position {
            return fail(format!("agents share cell {}", self.agents[0].position));
        }

        let mut counts = [0u32; 2];
        for node in &self.nodes {
            if self.grid.terrain_at(node.position) != Some(Cell::LightNode) {
                return fail(format!("light node at {} not on node terrain", node.position));
            }
            if let Some(owner) = node.controlled_by {
                counts[owner.index()] += 1;
            }
        }
        for agent in &self.agents {
            if agent.nodes_controlled != counts[agent.id.index()] {
                return fail(format!(
                    "{} caches {} nodes but owns {}",
                    agent.id,
                    agent.nodes_controlled,
                    counts[agent.id.index()]
                ));
            }
        }
        if (counts[0] + counts[1]) as usize > self.nodes.len() {
            return fail("more nodes controlled than exist".into());
        }

        for station in &self.stations {
            if station.current > station.capacity {
                return fail(format!(
                    "station at {} holds {} above capacity {}",
                    station.position, station.current, station.capacity
                ));
            }
            if self.grid.terrain_at(station.position) != Some(Cell::FuelStation) {
                return fail(format!("station at {} not on station terrain", station.position));
            }
        }
        for door in &self.doors {
            if self.grid.terrain_at(door.position) != Some(Cell::Door) {
                return fail(format!("door state at {} not on door terrain", door.position));
            }
        }

        Ok(())
    }
}
