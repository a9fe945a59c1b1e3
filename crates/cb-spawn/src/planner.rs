//! `SpawnPlanner` — ties the scheduler and composer to a production slot.

use tracing::{info, warn};

use cb_core::{Role, RoleMap};

use crate::{Loadout, LoadoutComposer, SlotState, SpawnResult, SpawnScheduler};

/// The production facility, provided by the host.
pub trait Spawner {
    fn is_producing(&self) -> bool;

    /// Energy currently available for production.
    fn energy_available(&self) -> u32;

    /// Start producing `role` with `loadout`.  May refuse, e.g. for lack of
    /// energy.
    fn produce(&mut self, role: Role, loadout: &Loadout) -> SpawnResult<()>;
}

/// "Produce this role with this loadout."
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnOrder {
    pub role:    Role,
    pub loadout: Loadout,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// The slot was already producing.
    Busy,
    /// No role has unmet demand.
    Satisfied,
    Ordered(SpawnOrder),
    /// The spawner refused the order; nothing is retried this tick.
    Rejected { order: SpawnOrder, reason: String },
}

impl SpawnOutcome {
    pub fn order(&self) -> Option<&SpawnOrder> {
        match self {
            Self::Ordered(order) | Self::Rejected { order, .. } => Some(order),
            Self::Busy | Self::Satisfied => None,
        }
    }
}

pub struct SpawnPlanner {
    pub scheduler: SpawnScheduler,
    pub composer:  LoadoutComposer,
}

impl SpawnPlanner {
    pub fn new(scheduler: SpawnScheduler, composer: LoadoutComposer) -> Self {
        Self { scheduler, composer }
    }

    /// Pick at most one role and size its loadout to `energy`.
    pub fn schedule(
        &self,
        slot:       SlotState,
        desired:    &RoleMap<u32>,
        actual:     &RoleMap<u32>,
        node_count: u32,
        energy:     u32,
    ) -> Option<SpawnOrder> {
        let role = self.scheduler.select(slot, desired, actual, node_count)?;
        Some(SpawnOrder {
            role,
            loadout: self.composer.compose(role, energy).clone(),
        })
    }

    /// Run one scheduling pass against `spawner` and dispatch the result.
    pub fn run<S: Spawner + ?Sized>(
        &self,
        spawner:    &mut S,
        desired:    &RoleMap<u32>,
        actual:     &RoleMap<u32>,
        node_count: u32,
    ) -> SpawnOutcome {
        if spawner.is_producing() {
            return SpawnOutcome::Busy;
        }
        let energy = spawner.energy_available();
        let Some(order) = self.schedule(SlotState::Idle, desired, actual, node_count, energy) else {
            return SpawnOutcome::Satisfied;
        };
        match spawner.produce(order.role, &order.loadout) {
            Ok(()) => {
                info!(role = %order.role, loadout = %order.loadout, "spawn ordered");
                SpawnOutcome::Ordered(order)
            }
            Err(err) => {
                warn!(role = %order.role, loadout = %order.loadout, %err, "spawn rejected");
                SpawnOutcome::Rejected { order, reason: err.to_string() }
            }
        }
    }
}
