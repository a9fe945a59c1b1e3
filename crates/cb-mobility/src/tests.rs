//! Unit tests for cb-mobility.

use rustc_hash::FxHashSet;

use cb_core::{AgentId, Direction, GridCell, MovementPolicy, RegionId, Tick};
use cb_spatial::{GridPathfinder, TerrainGrid};

use crate::{
    BlockReason, MobilityError, MobilityState, MoveOutcome, MovementCoordinator,
    OccupancySnapshot, RouteStatus, StuckTracker, TickMovement,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const R: RegionId = RegionId(0);
const SEED: u64 = 0xC0FFEE;

fn cell(x: u8, y: u8) -> GridCell {
    GridCell::new(R, x, y)
}

fn a(n: u32) -> AgentId {
    AgentId(n)
}

/// Vertical one-cell corridor at x = 2 running from y = 0 to y = 6.
fn corridor() -> GridPathfinder<TerrainGrid> {
    let rows = [
        "##.##", "##.##", "##.##", "##.##", "##.##", "##.##", "##.##", "#####",
    ];
    GridPathfinder::new(TerrainGrid::from_rows(R, &rows).unwrap())
}

fn open_field() -> GridPathfinder<TerrainGrid> {
    let mut grid = TerrainGrid::new();
    grid.add_region(R);
    GridPathfinder::new(grid)
}

/// Run one tick: every `(agent, destination)` pair moves in the given order.
fn run_tick(
    pf:        &GridPathfinder<TerrainGrid>,
    state:     &mut MobilityState,
    positions: &[(AgentId, GridCell)],
    wants:     &[(AgentId, GridCell)],
    tick:      u64,
) -> (Vec<MoveOutcome>, TickMovement) {
    let policy = MovementPolicy::default();
    let occupancy = OccupancySnapshot::build(positions.iter().copied());
    let mut coord = MovementCoordinator::new(&policy, pf, state, occupancy, Tick(tick), SEED);
    let outcomes = wants
        .iter()
        .map(|&(agent, dest)| coord.move_toward(agent, dest).unwrap())
        .collect();
    (outcomes, coord.finish())
}

fn positions_after(movement: &TickMovement, agents: &[AgentId]) -> Vec<(AgentId, GridCell)> {
    agents
        .iter()
        .map(|&id| (id, movement.occupancy.position(id).unwrap()))
        .collect()
}

// ── Occupancy ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod occupancy {
    use super::*;

    #[test]
    fn duplicate_cell_goes_to_first_listed() {
        let snap = OccupancySnapshot::build([(a(1), cell(3, 3)), (a(2), cell(3, 3))]);
        assert_eq!(snap.occupant(cell(3, 3)), Some(a(1)));
        assert_eq!(snap.position(a(2)), Some(cell(3, 3)));
        assert_eq!(snap.len(), 1);
        assert!(!snap.is_consistent());
    }

    #[test]
    fn relocate_rejects_occupied_target() {
        let mut snap = OccupancySnapshot::build([(a(1), cell(0, 0)), (a(2), cell(1, 0))]);
        let err = snap.relocate(a(1), cell(1, 0)).unwrap_err();
        assert_eq!(err, MobilityError::CellOccupied { cell: cell(1, 0), by: a(2) });
        snap.relocate(a(1), cell(0, 1)).unwrap();
        assert!(!snap.is_occupied(cell(0, 0)));
        assert!(snap.is_consistent());
    }

    #[test]
    fn swap_exchanges_cells() {
        let mut snap = OccupancySnapshot::build([(a(1), cell(0, 0)), (a(2), cell(1, 0))]);
        snap.swap(a(1), a(2)).unwrap();
        assert_eq!(snap.occupant(cell(0, 0)), Some(a(2)));
        assert_eq!(snap.position(a(1)), Some(cell(1, 0)));
        assert!(snap.is_consistent());
    }
}

// ── Stuck tracking ────────────────────────────────────────────────────────────

#[cfg(test)]
mod stuck {
    use super::*;

    #[test]
    fn failure_counts_once_per_tick() {
        let mut t = StuckTracker::new();
        assert_eq!(t.record_failure(a(1), Tick(1)), 1);
        assert_eq!(t.record_failure(a(1), Tick(1)), 1);
        assert_eq!(t.record_failure(a(1), Tick(2)), 2);
        t.reset(a(1));
        assert_eq!(t.failures(a(1)), 0);
    }

    #[test]
    fn contest_counts_consecutive_ticks() {
        let mut t = StuckTracker::new();
        let c = cell(4, 4);
        assert_eq!(t.record_contest(c, a(9), Tick(1)), 1);
        assert_eq!(t.record_contest(c, a(9), Tick(2)), 2);
        assert_eq!(t.record_contest(c, a(9), Tick(2)), 2);
        // A new blocker starts over.
        assert_eq!(t.record_contest(c, a(8), Tick(3)), 1);
        // So does a gap.
        assert_eq!(t.record_contest(c, a(8), Tick(5)), 1);
    }

    #[test]
    fn retain_drops_dead_blockers() {
        let mut t = StuckTracker::new();
        t.record_failure(a(1), Tick(1));
        t.record_contest(cell(0, 0), a(2), Tick(1));
        t.retain(|id| id == a(1));
        assert!(t.contest(cell(0, 0)).is_none());
        assert_eq!(t.failures(a(1)), 1);
    }
}

// ── Coordinator ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod coordinator {
    use super::*;

    #[test]
    fn arrived_when_on_destination() {
        let pf = open_field();
        let mut state = MobilityState::new();
        let (out, movement) = run_tick(&pf, &mut state, &[(a(0), cell(5, 5))], &[(a(0), cell(5, 5))], 1);
        assert_eq!(out, vec![MoveOutcome::Arrived]);
        assert!(movement.orders.is_empty());
        assert_eq!(movement.stats.arrived, 1);
    }

    #[test]
    fn unknown_agent_is_an_error() {
        let pf = open_field();
        let mut state = MobilityState::new();
        let policy = MovementPolicy::default();
        let mut coord = MovementCoordinator::new(
            &policy, &pf, &mut state, OccupancySnapshot::default(), Tick(1), SEED,
        );
        assert_eq!(
            coord.move_toward(a(3), cell(0, 0)),
            Err(MobilityError::UnknownAgent(a(3)))
        );
    }

    #[test]
    fn follows_cached_route_without_replanning() {
        let pf = corridor();
        let mut state = MobilityState::new();
        let mut pos = vec![(a(0), cell(2, 0))];
        let dest = cell(2, 6);

        let (out, movement) = run_tick(&pf, &mut state, &pos, &[(a(0), dest)], 1);
        assert_eq!(out, vec![MoveOutcome::Stepped(Direction::Bottom)]);
        assert_eq!(movement.stats.fresh_routes, 1);
        pos = positions_after(&movement, &[a(0)]);

        let (_, movement) = run_tick(&pf, &mut state, &pos, &[(a(0), dest)], 2);
        assert_eq!(movement.stats.fresh_routes, 0);
        assert_eq!(movement.occupancy.position(a(0)), Some(cell(2, 2)));
        assert_eq!(state.routes.get(a(0)).unwrap().cursor, 2);
    }

    #[test]
    fn adjacent_destination_is_a_direct_step() {
        let pf = open_field();
        let mut state = MobilityState::new();
        let (out, movement) = run_tick(&pf, &mut state, &[(a(0), cell(5, 5))], &[(a(0), cell(6, 6))], 1);
        assert_eq!(out, vec![MoveOutcome::Stepped(Direction::BottomRight)]);
        assert_eq!(movement.stats.fresh_routes, 0);
        assert!(state.routes.is_empty());
    }

    #[test]
    fn blocked_agent_is_not_pulled_into_a_later_swap() {
        let pf = corridor();
        let mut state = MobilityState::new();
        let pos = [(a(0), cell(2, 1)), (a(1), cell(2, 2))];
        let wants = [(a(0), cell(2, 4)), (a(1), cell(2, 0))];

        // a0 plans first and finds a1 without a route yet.  Once a0 has been
        // told it is blocked, a1 may not trade places with it.
        let (out, movement) = run_tick(&pf, &mut state, &pos, &wants, 1);
        assert_eq!(out, vec![
            MoveOutcome::Blocked(BlockReason::Occupied(a(1))),
            MoveOutcome::Blocked(BlockReason::Occupied(a(0))),
        ]);
        assert!(movement.orders.is_empty());
        assert_eq!(movement.occupancy.position(a(0)), Some(cell(2, 1)));
        assert_eq!(movement.occupancy.position(a(1)), Some(cell(2, 2)));
        assert_eq!(movement.stats.blocked, 2);
        assert_eq!(movement.stats.swapped, 0);
    }

    #[test]
    fn head_on_agents_with_cached_routes_swap() {
        let pf = corridor();
        let mut state = MobilityState::new();
        let pos = [(a(0), cell(2, 1)), (a(1), cell(2, 2))];
        let wants = [(a(0), cell(2, 4)), (a(1), cell(2, 0))];

        // Tick 1 leaves both agents holding routes through each other's cell.
        run_tick(&pf, &mut state, &pos, &wants, 1);
        assert_eq!(state.routes.peek_next_cell(a(0), cell(2, 1)), Some(cell(2, 2)));
        assert_eq!(state.routes.peek_next_cell(a(1), cell(2, 2)), Some(cell(2, 1)));

        let (out, movement) = run_tick(&pf, &mut state, &pos, &wants, 2);
        assert_eq!(out, vec![
            MoveOutcome::Swapped { with: a(1), direction: Direction::Bottom },
            MoveOutcome::Swapped { with: a(0), direction: Direction::Top },
        ]);
        assert_eq!(movement.occupancy.position(a(0)), Some(cell(2, 2)));
        assert_eq!(movement.occupancy.position(a(1)), Some(cell(2, 1)));
        assert_eq!(movement.orders.len(), 2);
        assert_eq!(movement.stats.swapped, 2);
        assert_eq!(movement.stats.blocked, 0);
        assert_eq!(state.stuck.failures(a(0)), 0);
        assert_eq!(state.stuck.failures(a(1)), 0);

        // Both routes were advanced past the swap, so tick 3 continues them.
        let pos = positions_after(&movement, &[a(0), a(1)]);
        let (out, _) = run_tick(&pf, &mut state, &pos, &wants, 3);
        assert_eq!(out, vec![
            MoveOutcome::Stepped(Direction::Bottom),
            MoveOutcome::Stepped(Direction::Top),
        ]);
    }

    #[test]
    fn swap_partner_gets_recorded_outcome() {
        let pf = corridor();
        let mut state = MobilityState::new();
        let start = [(a(0), cell(2, 1)), (a(1), cell(2, 2))];
        run_tick(&pf, &mut state, &start, &[(a(0), cell(2, 4)), (a(1), cell(2, 0))], 1);

        let policy = MovementPolicy::default();
        let occupancy = OccupancySnapshot::build(start);
        let mut coord = MovementCoordinator::new(&policy, &pf, &mut state, occupancy, Tick(2), SEED);
        coord.move_toward(a(0), cell(2, 4)).unwrap();
        assert_eq!(
            coord.move_toward(a(1), cell(2, 0)).unwrap(),
            MoveOutcome::Swapped { with: a(0), direction: Direction::Top }
        );
        // Asking again this tick does not move a0 a second time.
        assert_eq!(
            coord.move_toward(a(0), cell(2, 4)).unwrap(),
            MoveOutcome::Swapped { with: a(1), direction: Direction::Bottom }
        );
        assert_eq!(coord.finish().orders.len(), 2);
    }

    #[test]
    fn persistent_blocker_forces_replan_on_fourth_tick() {
        let pf = corridor();
        let mut state = MobilityState::new();
        // a1 sits still in the corridor; a0 wants to pass it.
        let pos = [(a(0), cell(2, 1)), (a(1), cell(2, 2))];
        let wants = [(a(0), cell(2, 5))];

        for tick in 1..=3 {
            let (out, movement) = run_tick(&pf, &mut state, &pos, &wants, tick);
            assert_eq!(out, vec![MoveOutcome::Blocked(BlockReason::Occupied(a(1)))]);
            assert_eq!(movement.stats.forced_replans, 0, "tick {tick}");
        }
        let (_, movement) = run_tick(&pf, &mut state, &pos, &wants, 4);
        assert_eq!(movement.stats.forced_replans, 1);
        let route = state.routes.get(a(0)).unwrap();
        assert!(matches!(route.weighting, cb_spatial::CostWeighting::AvoidAgents { .. }));
    }

    #[test]
    fn stuck_agent_sidesteps_after_threshold() {
        let pf = corridor();
        let mut state = MobilityState::new();
        let pos = [(a(0), cell(2, 1)), (a(1), cell(2, 2))];
        let wants = [(a(0), cell(2, 5))];

        for tick in 1..=5 {
            let (out, _) = run_tick(&pf, &mut state, &pos, &wants, tick);
            assert!(matches!(out[0], MoveOutcome::Blocked(_)), "tick {tick}");
        }
        let (out, movement) = run_tick(&pf, &mut state, &pos, &wants, 6);
        // The only free neighbour in the corridor is behind.
        assert_eq!(out, vec![MoveOutcome::Sidestepped(Direction::Top)]);
        assert_eq!(movement.occupancy.position(a(0)), Some(cell(2, 0)));
        assert_eq!(state.stuck.failures(a(0)), 0);
        assert!(state.routes.get(a(0)).is_none());
    }

    #[test]
    fn boxed_in_agent_stays_put() {
        let pf = corridor();
        let mut state = MobilityState::new();
        let pos = [(a(0), cell(2, 0)), (a(1), cell(2, 1))];
        let wants = [(a(0), cell(2, 5))];

        let mut last = None;
        for tick in 1..=6 {
            let (out, movement) = run_tick(&pf, &mut state, &pos, &wants, tick);
            assert!(movement.orders.is_empty());
            last = Some(out[0]);
        }
        assert_eq!(last, Some(MoveOutcome::Blocked(BlockReason::BoxedIn)));
    }

    #[test]
    fn unreachable_destination_is_cached() {
        let pf = corridor();
        let mut state = MobilityState::new();
        let pos = [(a(0), cell(2, 2))];
        // (0, 0) is a wall.
        let wants = [(a(0), cell(0, 0))];

        let (out, movement) = run_tick(&pf, &mut state, &pos, &wants, 1);
        assert_eq!(out, vec![MoveOutcome::Blocked(BlockReason::Unreachable)]);
        assert_eq!(movement.stats.fresh_routes, 0);
        let entry = state.routes.get(a(0)).unwrap();
        assert_eq!(entry.status, RouteStatus::Unreachable);
        assert_eq!(entry.reuse_remaining, MovementPolicy::default().unreachable_retry);

        run_tick(&pf, &mut state, &pos, &wants, 2);
        assert_eq!(
            state.routes.get(a(0)).unwrap().reuse_remaining,
            MovementPolicy::default().unreachable_retry - 1
        );
    }

    #[test]
    fn crowd_never_shares_a_cell() {
        let pf = open_field();
        let mut state = MobilityState::new();
        let agents: Vec<AgentId> = (0..12).map(a).collect();
        let mut pos: Vec<(AgentId, GridCell)> = agents
            .iter()
            .map(|&id| (id, cell(10 + (id.0 % 4) as u8 * 3, 10 + (id.0 / 4) as u8 * 3)))
            .collect();
        let target = cell(30, 30);
        let wants: Vec<(AgentId, GridCell)> = agents.iter().map(|&id| (id, target)).collect();

        for tick in 1..=40 {
            let (_, movement) = run_tick(&pf, &mut state, &pos, &wants, tick);
            assert!(movement.occupancy.is_consistent(), "tick {tick}");
            let moved: FxHashSet<AgentId> = movement.orders.iter().map(|o| o.agent).collect();
            assert_eq!(moved.len(), movement.orders.len(), "one order per agent");
            pos = positions_after(&movement, &agents);
            let cells: FxHashSet<GridCell> = pos.iter().map(|&(_, c)| c).collect();
            assert_eq!(cells.len(), agents.len(), "tick {tick}");
        }
    }

    #[test]
    fn same_inputs_same_orders() {
        let pf = open_field();
        let pos: Vec<(AgentId, GridCell)> = (0..6).map(|n| (a(n), cell(5 + n as u8, 5))).collect();
        let wants: Vec<(AgentId, GridCell)> = (0..6).map(|n| (a(n), cell(8, 20))).collect();

        let mut s1 = MobilityState::new();
        let mut s2 = MobilityState::new();
        let (_, m1) = run_tick(&pf, &mut s1, &pos, &wants, 7);
        let (_, m2) = run_tick(&pf, &mut s2, &pos, &wants, 7);
        assert_eq!(m1.orders, m2.orders);
        assert_eq!(m1.stats, m2.stats);
    }

    #[test]
    fn retain_forgets_dead_agents() {
        let pf = corridor();
        let mut state = MobilityState::new();
        run_tick(&pf, &mut state, &[(a(0), cell(2, 0))], &[(a(0), cell(2, 6))], 1);
        assert_eq!(state.routes.len(), 1);
        state.retain(|_| false);
        assert!(state.routes.is_empty());
        assert!(state.stuck.is_empty());
    }
}
