//! The demand calculator: desired agent count per role.

use serde::{Deserialize, Serialize};

use cb_core::{DemandPolicy, EconomyPolicy, Role, RoleMap};

use crate::{FlowEstimator, SourceRecord};

/// Room-level inputs to demand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomState {
    /// Resource nodes in the home region.
    pub node_count:          u32,
    pub stored_energy:       u32,
    /// Controller-derived maturity tier.
    pub maturity_tier:       u8,
    /// Regions waiting to be explored.
    pub exploration_backlog: u32,
}

/// Pure function of its inputs; no randomness, no hidden state.
#[derive(Clone, Copy, Debug)]
pub struct DemandCalculator<'a> {
    demand:  &'a DemandPolicy,
    economy: &'a EconomyPolicy,
}

impl<'a> DemandCalculator<'a> {
    pub fn new(demand: &'a DemandPolicy, economy: &'a EconomyPolicy) -> Self {
        Self { demand, economy }
    }

    pub fn desired<'r>(
        &self,
        room:    &RoomState,
        sources: impl IntoIterator<Item = &'r SourceRecord>,
    ) -> RoleMap<u32> {
        let carriers = FlowEstimator::new(self.economy)
            .total_carriers(sources)
            .max(self.demand.min_carriers);

        RoleMap::from_fn(|role| match role {
            Role::Extractor => self.demand.extractors_per_node.saturating_mul(room.node_count),
            Role::Carrier   => carriers,
            Role::Scout     => self.scouts(room.exploration_backlog),
            Role::Sustainer => self.sustainers(room),
        })
    }

    fn scouts(&self, backlog: u32) -> u32 {
        backlog.max(1).min(self.demand.scout_cap)
    }

    fn sustainers(&self, room: &RoomState) -> u32 {
        if room.maturity_tier < self.demand.sustainer_maturity_tier {
            return self.demand.sustainer_early;
        }
        self.demand
            .sustainer_energy_tiers
            .iter()
            .find(|tier| room.stored_energy > tier.min_stored_energy)
            .map_or(self.demand.sustainer_floor, |tier| tier.sustainers)
    }
}
