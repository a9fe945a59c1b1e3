//! The task allocator: one pickup target per idle carrier, no target twice.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use cb_agent::{AgentStore, WorkPhase};
use cb_core::{AgentId, Role, TargetId};
use cb_spatial::Pathfinder;

use crate::WorldQuery;

// ── ReservationSet ────────────────────────────────────────────────────────────

/// Pickup targets claimed during one allocation pass, with their holders.
///
/// Rebuilt from empty every tick.  A target can be claimed once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReservationSet {
    claims: BTreeMap<TargetId, AgentId>,
}

impl ReservationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `target` for `agent`.  Returns `false` if already claimed.
    pub fn claim(&mut self, target: TargetId, agent: AgentId) -> bool {
        if self.claims.contains_key(&target) {
            return false;
        }
        self.claims.insert(target, agent);
        true
    }

    pub fn contains(&self, target: TargetId) -> bool {
        self.claims.contains_key(&target)
    }

    pub fn holder(&self, target: TargetId) -> Option<AgentId> {
        self.claims.get(&target).copied()
    }

    /// `(target, holder)` pairs in target order.
    pub fn iter(&self) -> impl Iterator<Item = (TargetId, AgentId)> + '_ {
        self.claims.iter().map(|(&t, &a)| (t, a))
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

/// Result of one allocation pass.
#[derive(Clone, Debug, Default)]
pub struct AllocationReport {
    pub reservations: ReservationSet,
    /// Carriers whose existing reservation was still valid.
    pub kept:         u32,
    /// Carriers given a new target.
    pub assigned:     u32,
    /// Stale or duplicate reservations dropped.
    pub cleared:      u32,
}

// ── TaskAllocator ─────────────────────────────────────────────────────────────

pub struct TaskAllocator<'a, P: Pathfinder + ?Sized> {
    pathfinder: &'a P,
}

impl<'a, P: Pathfinder + ?Sized> TaskAllocator<'a, P> {
    pub fn new(pathfinder: &'a P) -> Self {
        Self { pathfinder }
    }

    /// Assign pickup targets to carriers for this tick.
    ///
    /// Carriers are visited in ascending id order, twice.  Each carrier's
    /// work phase is advanced against its current load before anything
    /// else, so a carrier that filled up last tick is already spending and
    /// gives up its pickup.  The first pass then
    /// re-claims every still-valid reservation and clears stale ones; the
    /// second gives each gathering carrier without a reservation the nearest
    /// unclaimed candidate by path distance.  Writes go to each carrier's
    /// memory; the returned set is for inspection only.
    pub fn allocate<W: WorldQuery + ?Sized>(&self, world: &W, agents: &mut AgentStore) -> AllocationReport {
        let candidates = world.pickup_candidates(world.home_region());
        let carriers = agents.ids_with_role(Role::Carrier);
        let mut report = AllocationReport::default();

        // ── Keep valid reservations ───────────────────────────────────────────
        for &id in &carriers {
            let Some(agent) = agents.get_mut(id) else { continue };
            agent.memory.advance_work(agent.capacity);
            let Some(target) = agent.memory.reservation else { continue };
            let valid = candidates.iter().any(|c| c.id == target);
            if valid && report.reservations.claim(target, id) {
                report.kept += 1;
            } else {
                warn!(agent = %id, %target, valid, "dropping reservation");
                agent.memory.reservation = None;
                report.cleared += 1;
            }
        }

        // ── Assign idle carriers ──────────────────────────────────────────────
        for &id in &carriers {
            let Some(agent) = agents.get_mut(id) else { continue };
            agent.memory.advance_work(agent.capacity);
            let gathering = agent.memory.state.work_phase() == Some(WorkPhase::Gathering);
            if agent.memory.reservation.is_some() || !gathering {
                continue;
            }
            let from = agent.cell;
            let best = candidates
                .iter()
                .filter(|c| !report.reservations.contains(c.id))
                .filter_map(|c| self.pathfinder.path_distance(from, c.cell, 1).map(|d| (d, c.id)))
                .min();

            if let Some((distance, target)) = best {
                report.reservations.claim(target, id);
                agent.memory.reservation = Some(target);
                report.assigned += 1;
                debug!(agent = %id, %target, distance, "pickup assigned");
            }
        }

        report
    }
}
