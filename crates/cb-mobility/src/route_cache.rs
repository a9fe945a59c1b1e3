//! The `RouteCache` — per-agent cached routes, reused step by step.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use cb_core::{AgentId, Direction, GridCell};
use cb_spatial::{CostWeighting, Route};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    Walkable,
    /// Pathfinding failed; the entry suppresses retries until its budget runs out.
    Unreachable,
}

/// A route owned by one agent.
///
/// `expected` is the cell the agent must stand on for `steps[cursor]` to
/// apply.  Any position change the cache did not see (a swap partner's move,
/// a sidestep, a push by the world) makes the entry invalid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedRoute {
    pub destination:     GridCell,
    pub steps:           Vec<Direction>,
    pub cursor:          usize,
    pub expected:        GridCell,
    pub reuse_remaining: u32,
    pub weighting:       CostWeighting,
    pub status:          RouteStatus,
}

impl CachedRoute {
    pub fn walkable(
        origin:      GridCell,
        destination: GridCell,
        route:       Route,
        reuse:       u32,
        weighting:   CostWeighting,
    ) -> Self {
        Self {
            destination,
            steps: route.steps,
            cursor: 0,
            expected: origin,
            reuse_remaining: reuse,
            weighting,
            status: RouteStatus::Walkable,
        }
    }

    /// A negative entry: `destination` could not be reached from `origin`.
    pub fn unreachable(origin: GridCell, destination: GridCell, retry: u32) -> Self {
        Self {
            destination,
            steps: Vec::new(),
            cursor: 0,
            expected: origin,
            reuse_remaining: retry,
            weighting: CostWeighting::Terrain,
            status: RouteStatus::Unreachable,
        }
    }

    /// The pending step and the cell it leads to.
    pub fn next(&self) -> Option<(Direction, GridCell)> {
        let dir = *self.steps.get(self.cursor)?;
        self.expected.step(dir).map(|cell| (dir, cell))
    }

    /// `true` if the agent standing on `position` can follow this entry.
    fn follows_from(&self, position: GridCell) -> bool {
        self.reuse_remaining > 0
            && match self.status {
                RouteStatus::Walkable    => self.expected == position && self.next().is_some(),
                RouteStatus::Unreachable => true,
            }
    }

    fn is_valid_for(&self, destination: GridCell, position: GridCell) -> bool {
        self.destination == destination && self.follows_from(position)
    }

    /// Record that the pending step was taken.
    fn advance(&mut self) {
        if let Some((_, cell)) = self.next() {
            self.expected = cell;
            self.cursor += 1;
            self.reuse_remaining = self.reuse_remaining.saturating_sub(1);
        }
    }
}

/// Cached routes keyed by owning agent.
///
/// A route is never shared; it is discarded when invalid and dropped with its
/// agent via [`RouteCache::retain`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RouteCache {
    routes: FxHashMap<AgentId, CachedRoute>,
}

impl RouteCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, agent: AgentId) -> Option<&CachedRoute> {
        self.routes.get(&agent)
    }

    /// The agent's route for `destination` if still usable from `position`.
    ///
    /// An entry for another destination, with no reuse budget left, or whose
    /// expected position no longer matches is removed.
    pub fn lookup(
        &mut self,
        agent:       AgentId,
        destination: GridCell,
        position:    GridCell,
    ) -> Option<&mut CachedRoute> {
        let valid = self
            .routes
            .get(&agent)
            .is_some_and(|r| r.is_valid_for(destination, position));
        if !valid {
            self.routes.remove(&agent);
            return None;
        }
        self.routes.get_mut(&agent)
    }

    /// The cell `agent` intends to enter next, whatever its destination.
    pub fn peek_next_cell(&self, agent: AgentId, position: GridCell) -> Option<GridCell> {
        self.routes
            .get(&agent)
            .filter(|r| r.status == RouteStatus::Walkable && r.follows_from(position))
            .and_then(|r| r.next())
            .map(|(_, cell)| cell)
    }

    pub fn insert(&mut self, agent: AgentId, route: CachedRoute) {
        self.routes.insert(agent, route);
    }

    pub fn invalidate(&mut self, agent: AgentId) -> Option<CachedRoute> {
        self.routes.remove(&agent)
    }

    /// Mark the pending step of `agent`'s route as taken.
    pub fn advance(&mut self, agent: AgentId) {
        if let Some(route) = self.routes.get_mut(&agent) {
            route.advance();
        }
    }

    /// Keep only routes whose owner satisfies `alive`.
    pub fn retain(&mut self, mut alive: impl FnMut(AgentId) -> bool) {
        self.routes.retain(|id, _| alive(*id));
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
