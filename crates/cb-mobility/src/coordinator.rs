//! The per-tick movement coordinator.
//!
//! Every agent that wants to move calls [`MovementCoordinator::move_toward`]
//! once per tick, in ascending `AgentId` order.  The coordinator owns the
//! tick's [`OccupancySnapshot`], commits each accepted step into it
//! immediately, and collects the resulting [`MoveOrder`]s.  Nothing is sent
//! to the world until the caller drains them with
//! [`MovementCoordinator::finish`].
//!
//! # Escalation
//!
//! 1. Follow the cached route, or plan a fresh one on plain terrain costs.
//! 2. If the next cell is held by an agent that wants our cell, swap.
//! 3. If the same agent has held the next cell for more than
//!    `block_threshold` consecutive ticks, drop the route and replan with
//!    occupied cells made expensive, then try once more.
//! 4. If the agent has failed to move for more than `stuck_threshold`
//!    consecutive attempts, step onto a random free neighbour.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use cb_core::{AgentId, AgentRng, Direction, GridCell, MovementPolicy, Tick};
use cb_spatial::{CostWeighting, Pathfinder, RouteRequest};

use crate::{CachedRoute, MobilityError, MobilityResult, OccupancySnapshot, RouteCache, RouteStatus, StuckTracker};

// ── Persistent state ──────────────────────────────────────────────────────────

/// Movement state that survives between ticks.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MobilityState {
    pub routes: RouteCache,
    pub stuck:  StuckTracker,
}

impl MobilityState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget routes and counters of agents for which `alive` is false.
    pub fn retain(&mut self, mut alive: impl FnMut(AgentId) -> bool) {
        self.routes.retain(&mut alive);
        self.stuck.retain(alive);
    }
}

// ── Outcomes ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BlockReason {
    /// The next cell is held by this agent.
    Occupied(AgentId),
    /// No route exists (or a recent search failed and is still cached).
    Unreachable,
    /// Stuck long enough to sidestep, but every neighbour is taken.
    BoxedIn,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Already standing on the destination.
    Arrived,
    Stepped(Direction),
    /// Exchanged cells with `with`, moving in `direction`.
    Swapped { with: AgentId, direction: Direction },
    Sidestepped(Direction),
    Blocked(BlockReason),
}

impl MoveOutcome {
    /// `true` if the agent leaves its cell this tick.
    pub fn moved(self) -> bool {
        matches!(self, Self::Stepped(_) | Self::Swapped { .. } | Self::Sidestepped(_))
    }
}

/// A single-step move instruction for the world.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveOrder {
    pub agent:     AgentId,
    pub direction: Direction,
}

/// Counters for one tick of movement.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementStats {
    pub arrived:        u32,
    pub stepped:        u32,
    /// Agents (not pairs) that moved by swapping.
    pub swapped:        u32,
    pub sidestepped:    u32,
    pub blocked:        u32,
    pub fresh_routes:   u32,
    pub forced_replans: u32,
}

/// Everything one tick of movement produced.
#[derive(Debug)]
pub struct TickMovement {
    pub orders:    Vec<MoveOrder>,
    pub stats:     MovementStats,
    /// Occupancy after every committed step.
    pub occupancy: OccupancySnapshot,
}

enum Attempt {
    Moved(MoveOutcome),
    Failed(BlockReason),
}

// ── MovementCoordinator ───────────────────────────────────────────────────────

pub struct MovementCoordinator<'a, P: Pathfinder + ?Sized> {
    policy:     &'a MovementPolicy,
    pathfinder: &'a P,
    state:      &'a mut MobilityState,
    occupancy:  OccupancySnapshot,
    tick:       Tick,
    seed:       u64,
    /// Agents that already received an outcome this tick.
    resolved:   FxHashMap<AgentId, MoveOutcome>,
    orders:     Vec<MoveOrder>,
    stats:      MovementStats,
}

impl<'a, P: Pathfinder + ?Sized> MovementCoordinator<'a, P> {
    pub fn new(
        policy:     &'a MovementPolicy,
        pathfinder: &'a P,
        state:      &'a mut MobilityState,
        occupancy:  OccupancySnapshot,
        tick:       Tick,
        seed:       u64,
    ) -> Self {
        Self {
            policy,
            pathfinder,
            state,
            occupancy,
            tick,
            seed,
            resolved: FxHashMap::default(),
            orders: Vec::new(),
            stats: MovementStats::default(),
        }
    }

    pub fn occupancy(&self) -> &OccupancySnapshot {
        &self.occupancy
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Move `agent` one step closer to `destination`.
    ///
    /// An agent that already has an outcome this tick (including as the
    /// passive partner of a swap, or a refusal) gets it back unchanged.
    pub fn move_toward(&mut self, agent: AgentId, destination: GridCell) -> MobilityResult<MoveOutcome> {
        if let Some(&done) = self.resolved.get(&agent) {
            return Ok(done);
        }
        let position = self
            .occupancy
            .position(agent)
            .ok_or(MobilityError::UnknownAgent(agent))?;

        if position == destination {
            self.state.stuck.reset(agent);
            self.state.routes.invalidate(agent);
            self.stats.arrived += 1;
            return Ok(self.record(agent, MoveOutcome::Arrived));
        }

        let attempt = if position.is_adjacent(destination) {
            self.direct_step(agent, position, destination)?
        } else {
            self.follow_route(agent, position, destination)?
        };

        match attempt {
            Attempt::Moved(outcome) => Ok(outcome),
            Attempt::Failed(reason) => self.escalate(agent, position, reason),
        }
    }

    /// Drain the tick's move orders.
    pub fn finish(self) -> TickMovement {
        TickMovement {
            orders:    self.orders,
            stats:     self.stats,
            occupancy: self.occupancy,
        }
    }

    // ── Step selection ────────────────────────────────────────────────────────

    fn direct_step(&mut self, agent: AgentId, position: GridCell, destination: GridCell) -> MobilityResult<Attempt> {
        let Some(dir) = position.direction_to(destination) else {
            return Ok(Attempt::Failed(BlockReason::Unreachable));
        };
        if !self.pathfinder.is_walkable(destination) {
            return Ok(Attempt::Failed(BlockReason::Unreachable));
        }
        self.try_enter(agent, position, destination, dir)
    }

    fn follow_route(&mut self, agent: AgentId, position: GridCell, destination: GridCell) -> MobilityResult<Attempt> {
        let mut forced = false;
        loop {
            let (dir, next) = match self.next_step(agent, position, destination, forced) {
                Ok(step) => step,
                Err(reason) => return Ok(Attempt::Failed(reason)),
            };
            match self.try_enter(agent, position, next, dir)? {
                Attempt::Moved(outcome) => {
                    self.state.routes.advance(agent);
                    return Ok(Attempt::Moved(outcome));
                }
                Attempt::Failed(BlockReason::Occupied(blocker)) => {
                    let held_for = self.state.stuck.record_contest(next, blocker, self.tick);
                    if !forced && held_for > self.policy.block_threshold {
                        debug!(%agent, %blocker, cell = %next, held_for, "forcing replan around agents");
                        self.state.routes.invalidate(agent);
                        self.state.stuck.clear_contest(next);
                        self.stats.forced_replans += 1;
                        forced = true;
                        continue;
                    }
                    return Ok(Attempt::Failed(BlockReason::Occupied(blocker)));
                }
                failed => return Ok(failed),
            }
        }
    }

    /// The pending step toward `destination`, from the cache or a fresh search.
    fn next_step(
        &mut self,
        agent:       AgentId,
        position:    GridCell,
        destination: GridCell,
        forced:      bool,
    ) -> Result<(Direction, GridCell), BlockReason> {
        if let Some(cached) = self.state.routes.lookup(agent, destination, position) {
            match cached.status {
                RouteStatus::Unreachable => {
                    cached.reuse_remaining = cached.reuse_remaining.saturating_sub(1);
                    return Err(BlockReason::Unreachable);
                }
                RouteStatus::Walkable => {
                    if let Some(step) = cached.next() {
                        return Ok(step);
                    }
                }
            }
        }

        let weighting = if forced {
            CostWeighting::AvoidAgents { agent_cost: self.policy.agent_avoid_cost }
        } else {
            CostWeighting::Terrain
        };
        let found = {
            let occupancy = &self.occupancy;
            let occupied = |cell: GridCell| occupancy.is_occupied(cell);
            let mut request = RouteRequest::new(position, destination).max_ops(self.policy.max_path_ops);
            if forced {
                request = request.avoiding(weighting, &occupied);
            }
            self.pathfinder.find_route(&request)
        };

        match found {
            Ok(route) => {
                self.stats.fresh_routes += 1;
                let cached = CachedRoute::walkable(position, destination, route, self.policy.route_reuse, weighting);
                let step = cached.next();
                self.state.routes.insert(agent, cached);
                step.ok_or(BlockReason::Unreachable)
            }
            Err(err) => {
                debug!(%agent, %position, %destination, %err, "no route; caching failure");
                self.state.routes.insert(
                    agent,
                    CachedRoute::unreachable(position, destination, self.policy.unreachable_retry),
                );
                Err(BlockReason::Unreachable)
            }
        }
    }

    // ── Commit ────────────────────────────────────────────────────────────────

    fn try_enter(&mut self, agent: AgentId, position: GridCell, next: GridCell, dir: Direction) -> MobilityResult<Attempt> {
        match self.occupancy.occupant(next) {
            None => {
                self.commit_step(agent, next, dir)?;
                self.stats.stepped += 1;
                Ok(Attempt::Moved(self.record(agent, MoveOutcome::Stepped(dir))))
            }
            Some(other) if other != agent && self.wants_cell(other, next, position) => {
                self.commit_swap(agent, other, dir)?;
                Ok(Attempt::Moved(MoveOutcome::Swapped { with: other, direction: dir }))
            }
            Some(other) => Ok(Attempt::Failed(BlockReason::Occupied(other))),
        }
    }

    /// `true` if `other`, standing on `at`, intends to step onto `target` and
    /// has no outcome yet this tick.  An agent already told it is blocked
    /// is never moved afterwards.
    fn wants_cell(&self, other: AgentId, at: GridCell, target: GridCell) -> bool {
        !self.resolved.contains_key(&other) && self.state.routes.peek_next_cell(other, at) == Some(target)
    }

    fn commit_step(&mut self, agent: AgentId, next: GridCell, dir: Direction) -> MobilityResult<()> {
        self.occupancy.relocate(agent, next)?;
        self.orders.push(MoveOrder { agent, direction: dir });
        self.state.stuck.reset(agent);
        self.state.stuck.clear_contest(next);
        Ok(())
    }

    fn commit_swap(&mut self, agent: AgentId, other: AgentId, dir: Direction) -> MobilityResult<()> {
        self.occupancy.swap(agent, other)?;
        let back = dir.reverse();
        self.orders.push(MoveOrder { agent, direction: dir });
        self.orders.push(MoveOrder { agent: other, direction: back });
        self.state.routes.advance(other);
        self.state.stuck.reset(agent);
        self.state.stuck.reset(other);
        self.stats.swapped += 2;
        self.record(agent, MoveOutcome::Swapped { with: other, direction: dir });
        self.record(other, MoveOutcome::Swapped { with: agent, direction: back });
        debug!(%agent, %other, ?dir, "swapped");
        Ok(())
    }

    fn record(&mut self, agent: AgentId, outcome: MoveOutcome) -> MoveOutcome {
        self.resolved.insert(agent, outcome);
        outcome
    }

    // ── Escalation ────────────────────────────────────────────────────────────

    fn escalate(&mut self, agent: AgentId, position: GridCell, reason: BlockReason) -> MobilityResult<MoveOutcome> {
        let failures = self.state.stuck.record_failure(agent, self.tick);
        if failures <= self.policy.stuck_threshold {
            self.stats.blocked += 1;
            return Ok(self.record(agent, MoveOutcome::Blocked(reason)));
        }

        let mut candidates: Vec<(Direction, GridCell)> = position
            .neighbours()
            .filter(|&(_, cell)| self.pathfinder.is_walkable(cell) && !self.occupancy.is_occupied(cell))
            .collect();
        AgentRng::for_tick(self.seed, agent, self.tick).shuffle(&mut candidates);

        let Some(&(dir, cell)) = candidates.first() else {
            debug!(%agent, %position, failures, "stuck and boxed in");
            self.stats.blocked += 1;
            return Ok(self.record(agent, MoveOutcome::Blocked(BlockReason::BoxedIn)));
        };
        debug!(%agent, %position, failures, ?dir, "sidestepping");
        self.commit_step(agent, cell, dir)?;
        self.state.routes.invalidate(agent);
        self.stats.sidestepped += 1;
        Ok(self.record(agent, MoveOutcome::Sidestepped(dir)))
    }
}
