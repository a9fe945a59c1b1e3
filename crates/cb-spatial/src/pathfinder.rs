//! Pathfinding contract and default grid implementation.
//!
//! # Pluggability
//!
//! The movement coordinator only ever talks to the [`Pathfinder`] trait, so
//! hosts can hand it the live world's own search.  [`GridPathfinder`] is a
//! plain Dijkstra over a [`Terrain`] and is what the sandbox and tests use.
//!
//! # Cost model
//!
//! Entering a cell costs its [`Tile::move_cost`](crate::Tile::move_cost), so
//! routes prefer plains over swamp.  With [`CostWeighting::AvoidAgents`], a
//! cell the request marks as occupied costs an extra fixed amount, which
//! steers a replanned route around parked agents without forbidding the cell.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use cb_core::{Direction, GridCell};

use crate::{SpatialError, SpatialResult, Terrain};

// ── Cost weighting ────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostWeighting {
    /// Terrain cost only.
    #[default]
    Terrain,
    /// Terrain cost plus `agent_cost` for every occupied cell.
    AvoidAgents { agent_cost: u32 },
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// Ordered single steps from a request's origin to its goal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub steps: Vec<Direction>,
    /// Total weighted cost of the route.
    pub cost: u32,
}

impl Route {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// `true` if the origin already satisfied the goal.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The cells visited after each step, starting from `origin`.
    pub fn cells(&self, origin: GridCell) -> Vec<GridCell> {
        let mut cur = origin;
        let mut out = Vec::with_capacity(self.steps.len());
        for &dir in &self.steps {
            match cur.step(dir) {
                Some(next) => {
                    out.push(next);
                    cur = next;
                }
                None => break,
            }
        }
        out
    }
}

// ── Route request ─────────────────────────────────────────────────────────────

/// One routing query.
pub struct RouteRequest<'a> {
    pub from: GridCell,
    pub to:   GridCell,
    /// Goal is reached anywhere within this many steps of `to`.
    pub range: u32,
    pub weighting: CostWeighting,
    /// Occupancy oracle consulted under [`CostWeighting::AvoidAgents`].
    pub occupied: Option<&'a dyn Fn(GridCell) -> bool>,
    /// Node expansions allowed before giving up.
    pub max_ops: u32,
}

impl<'a> RouteRequest<'a> {
    /// Exact-destination request with terrain weighting.
    pub fn new(from: GridCell, to: GridCell) -> Self {
        Self {
            from,
            to,
            range:     0,
            weighting: CostWeighting::Terrain,
            occupied:  None,
            max_ops:   4_000,
        }
    }

    pub fn range(mut self, range: u32) -> Self {
        self.range = range;
        self
    }

    pub fn max_ops(mut self, max_ops: u32) -> Self {
        self.max_ops = max_ops;
        self
    }

    /// Weight cells reported by `occupied`.
    pub fn avoiding(mut self, weighting: CostWeighting, occupied: &'a dyn Fn(GridCell) -> bool) -> Self {
        self.weighting = weighting;
        self.occupied = Some(occupied);
        self
    }

    fn extra_cost(&self, cell: GridCell) -> u32 {
        match (self.weighting, self.occupied) {
            (CostWeighting::AvoidAgents { agent_cost }, Some(occupied)) if occupied(cell) => agent_cost,
            _ => 0,
        }
    }

    fn satisfied_at(&self, cell: GridCell) -> bool {
        cell.distance(self.to).is_some_and(|d| d <= self.range)
    }
}

// ── Pathfinder trait ──────────────────────────────────────────────────────────

/// The black-box "find a route" capability.
pub trait Pathfinder {
    /// `true` if an agent may stand on `cell`.
    fn is_walkable(&self, cell: GridCell) -> bool;

    /// Compute a route, or report `NoPath` / `OpsExceeded`.
    fn find_route(&self, request: &RouteRequest<'_>) -> SpatialResult<Route>;

    /// Step count of the terrain-weighted route from `from` to within
    /// `range` of `to`, or `None` if unreachable.
    fn path_distance(&self, from: GridCell, to: GridCell, range: u32) -> Option<u32> {
        self.find_route(&RouteRequest::new(from, to).range(range))
            .ok()
            .map(|r| r.len() as u32)
    }
}

// ── GridPathfinder ────────────────────────────────────────────────────────────

/// Dijkstra's algorithm over a [`Terrain`], eight-connected, single region.
pub struct GridPathfinder<T: Terrain> {
    pub terrain: T,
}

impl<T: Terrain> GridPathfinder<T> {
    pub fn new(terrain: T) -> Self {
        Self { terrain }
    }
}

impl<T: Terrain> Pathfinder for GridPathfinder<T> {
    fn is_walkable(&self, cell: GridCell) -> bool {
        self.terrain.is_passable(cell)
    }

    fn find_route(&self, request: &RouteRequest<'_>) -> SpatialResult<Route> {
        dijkstra(&self.terrain, request)
    }
}

fn dijkstra<T: Terrain>(terrain: &T, req: &RouteRequest<'_>) -> SpatialResult<Route> {
    let no_path = SpatialError::NoPath { from: req.from, to: req.to };

    if req.from.region != req.to.region {
        return Err(no_path);
    }
    if req.satisfied_at(req.from) {
        return Ok(Route { steps: vec![], cost: 0 });
    }
    if req.range == 0 && !terrain.is_passable(req.to) {
        return Err(no_path);
    }

    let mut dist: FxHashMap<GridCell, u32> = FxHashMap::default();
    // prev[c] = (cell we came from, direction taken to reach c)
    let mut prev: FxHashMap<GridCell, (GridCell, Direction)> = FxHashMap::default();

    dist.insert(req.from, 0);

    // Min-heap keyed on (cost, cell); the cell ordering makes ties deterministic.
    let mut heap: BinaryHeap<Reverse<(u32, GridCell)>> = BinaryHeap::new();
    heap.push(Reverse((0, req.from)));

    let mut ops = 0u32;
    while let Some(Reverse((cost, cell))) = heap.pop() {
        if req.satisfied_at(cell) {
            return Ok(reconstruct(&prev, req.from, cell, cost));
        }

        // Skip stale heap entries.
        if dist.get(&cell).is_some_and(|&best| cost > best) {
            continue;
        }

        ops += 1;
        if ops > req.max_ops {
            return Err(SpatialError::OpsExceeded { from: req.from, to: req.to, ops: req.max_ops });
        }

        for (dir, next) in cell.neighbours() {
            let Some(base) = terrain.tile(next).move_cost() else {
                continue;
            };
            let new_cost = cost.saturating_add(base).saturating_add(req.extra_cost(next));
            if dist.get(&next).is_none_or(|&best| new_cost < best) {
                dist.insert(next, new_cost);
                prev.insert(next, (cell, dir));
                heap.push(Reverse((new_cost, next)));
            }
        }
    }

    Err(no_path)
}

fn reconstruct(
    prev:  &FxHashMap<GridCell, (GridCell, Direction)>,
    from:  GridCell,
    goal:  GridCell,
    cost:  u32,
) -> Route {
    let mut steps = Vec::new();
    let mut cur = goal;
    while cur != from {
        match prev.get(&cur) {
            Some(&(before, dir)) => {
                steps.push(dir);
                cur = before;
            }
            None => break,
        }
    }
    steps.reverse();
    Route { steps, cost }
}
