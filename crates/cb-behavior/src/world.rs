//! The read-only world contract.
//!
//! Everything the decision core knows about the room comes through
//! [`WorldQuery`].  Every query returns owned values, so a caller can hold
//! results while also issuing commands to the same host.

use serde::{Deserialize, Serialize};

use cb_agent::Capacity;
use cb_core::{AgentId, GridCell, RegionId, Role, SourceId, TargetId};

/// What the host reports about one of the colony's own agents.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AgentView {
    pub id:       AgentId,
    pub role:     Role,
    pub cell:     GridCell,
    pub capacity: Capacity,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SourceInfo {
    pub id:     SourceId,
    pub cell:   GridCell,
    pub energy: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    Spawn,
    Extension,
    Storage,
    Container,
    Controller,
}

impl StructureKind {
    /// Structures carriers fill before anything else.
    pub fn is_consumer(self) -> bool {
        matches!(self, Self::Spawn | Self::Extension)
    }

    /// Structures carriers may pick energy up from.
    pub fn is_store(self) -> bool {
        matches!(self, Self::Storage | Self::Container)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StructureInfo {
    pub id:       TargetId,
    pub kind:     StructureKind,
    pub cell:     GridCell,
    pub energy:   u32,
    pub capacity: u32,
}

impl StructureInfo {
    pub fn free(&self) -> u32 {
        self.capacity.saturating_sub(self.energy)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SiteInfo {
    pub id:       TargetId,
    pub cell:     GridCell,
    pub progress: u32,
    pub total:    u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DroppedInfo {
    pub id:     TargetId,
    pub cell:   GridCell,
    pub amount: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PickupKind {
    Dropped,
    Stored(StructureKind),
}

/// Anything a carrier can pick energy up from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PickupCandidate {
    pub id:     TargetId,
    pub cell:   GridCell,
    pub amount: u32,
    pub kind:   PickupKind,
}

/// Read-only view of the world, implemented by the host.
pub trait WorldQuery {
    /// The region the colony lives in.
    fn home_region(&self) -> RegionId;

    /// Every live agent of the colony.
    fn agents(&self) -> Vec<AgentView>;

    fn sources(&self, region: RegionId) -> Vec<SourceInfo>;

    fn structures(&self, region: RegionId) -> Vec<StructureInfo>;

    /// Cells of hostile agents.
    fn hostiles(&self, region: RegionId) -> Vec<GridCell>;

    fn construction_sites(&self, region: RegionId) -> Vec<SiteInfo>;

    fn dropped_resources(&self, region: RegionId) -> Vec<DroppedInfo>;

    /// Controller-derived maturity tier of `region`.
    fn maturity_tier(&self, region: RegionId) -> u8;

    /// Regions waiting to be explored.
    fn exploration_backlog(&self) -> Vec<RegionId>;

    /// A cell of `from` through which `to` can be entered.
    fn exit_toward(&self, from: RegionId, to: RegionId) -> Option<GridCell>;

    // ── Provided ──────────────────────────────────────────────────────────────

    fn source(&self, id: SourceId) -> Option<SourceInfo> {
        self.sources(self.home_region()).into_iter().find(|s| s.id == id)
    }

    fn structure(&self, id: TargetId) -> Option<StructureInfo> {
        self.structures(self.home_region()).into_iter().find(|s| s.id == id)
    }

    /// Energy held in storage-type structures.
    fn stored_energy(&self, region: RegionId) -> u32 {
        self.structures(region)
            .iter()
            .filter(|s| s.kind.is_store())
            .fold(0u32, |acc, s| acc.saturating_add(s.energy))
    }

    /// Non-empty dropped resources and stores, ordered by id.
    fn pickup_candidates(&self, region: RegionId) -> Vec<PickupCandidate> {
        let dropped = self.dropped_resources(region).into_iter().map(|d| PickupCandidate {
            id:     d.id,
            cell:   d.cell,
            amount: d.amount,
            kind:   PickupKind::Dropped,
        });
        let stored = self
            .structures(region)
            .into_iter()
            .filter(|s| s.kind.is_store())
            .map(|s| PickupCandidate {
                id:     s.id,
                cell:   s.cell,
                amount: s.energy,
                kind:   PickupKind::Stored(s.kind),
            });
        let mut all: Vec<PickupCandidate> = dropped.chain(stored).filter(|c| c.amount > 0).collect();
        all.sort_by_key(|c| c.id);
        all
    }

    /// A pickup target by id, if it still exists and holds anything.
    fn pickup(&self, id: TargetId) -> Option<PickupCandidate> {
        self.pickup_candidates(self.home_region())
            .into_iter()
            .find(|c| c.id == id)
    }
}
